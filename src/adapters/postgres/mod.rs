//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - Accounts and entitlement fields
//! - `PostgresMagicLinkRepository` - Tokens with conditional single-use update
//! - `PostgresArticleRepository` - Article visibility

mod article_repository;
mod magic_link_repository;
mod user_repository;

pub use article_repository::PostgresArticleRepository;
pub use magic_link_repository::PostgresMagicLinkRepository;
pub use user_repository::PostgresUserRepository;
