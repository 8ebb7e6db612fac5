//! In-memory adapters.
//!
//! Same semantics as the Postgres adapters, including the atomic single-use
//! token update, for tests and local runs without a database.

mod article_repository;
mod magic_link_repository;
mod magic_link_sender;
mod user_repository;

pub use article_repository::InMemoryArticleRepository;
pub use magic_link_repository::InMemoryMagicLinkRepository;
pub use magic_link_sender::{RecordingMagicLinkSender, SentLink};
pub use user_repository::InMemoryUserRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

fn lock_poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned")
}
