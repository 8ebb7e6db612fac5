//! Publishing domain - article visibility under the free plan.

mod access_policy;
mod article;

pub use access_policy::{articles_to_lock, articles_to_republish, FREE_PLAN_ARTICLE_LIMIT};
pub use article::{Article, ArticleStatus};
