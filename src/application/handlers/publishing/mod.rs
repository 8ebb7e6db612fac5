//! Publishing handlers.
//!
//! - Applying the free-plan access policy after a downgrade
//! - Explicitly republishing locked articles for a paid user

mod apply_access_policy;
mod republish_articles;

pub use apply_access_policy::{
    ApplyAccessPolicyCommand, ApplyAccessPolicyHandler, ApplyAccessPolicyResult,
};
pub use republish_articles::{
    RepublishArticlesCommand, RepublishArticlesHandler, RepublishArticlesResult,
};
