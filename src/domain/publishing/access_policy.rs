//! Free-plan access policy.
//!
//! A free account keeps its earliest-created article public. Every other
//! published article is locked. The selection is pure; applying it is the
//! repository's job.

use crate::domain::foundation::ArticleId;

use super::article::Article;

/// Articles a free account may keep published.
pub const FREE_PLAN_ARTICLE_LIMIT: usize = 1;

/// Returns the ids of articles that must be locked for a free account.
///
/// Order is by `created_at` ascending with ties broken by id, so the exempt
/// article does not depend on the order the caller supplies. Already-locked
/// articles are never returned, which makes repeated application a no-op.
pub fn articles_to_lock(articles: &[Article]) -> Vec<ArticleId> {
    let mut ordered: Vec<&Article> = articles.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    ordered
        .into_iter()
        .skip(FREE_PLAN_ARTICLE_LIMIT)
        .filter(|a| a.is_published())
        .map(|a| a.id)
        .collect()
}

/// Returns the ids of locked articles, for an explicit re-publish.
pub fn articles_to_republish(articles: &[Article]) -> Vec<ArticleId> {
    articles.iter().filter(|a| a.is_locked()).map(|a| a.id).collect()
}
