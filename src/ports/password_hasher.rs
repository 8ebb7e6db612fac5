//! Password hashing port.

use crate::domain::foundation::DomainError;

/// Hashes and verifies passwords.
///
/// Synchronous and CPU-bound; callers on the async runtime should run it
/// via `spawn_blocking`.
pub trait PasswordHasher: Send + Sync {
    /// Returns a self-describing hash string (salt included).
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// `Ok(false)` for a wrong password; `Err` only for an unparseable hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
