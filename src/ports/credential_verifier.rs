//! Credential verification port.
//!
//! Magic links and passwords are two ways of proving the same thing: that
//! the caller is a particular user. Each mechanism implements this trait and
//! the sign-in flow dispatches on `Credential`.

use async_trait::async_trait;

use crate::domain::identity::{Credential, CredentialKind, IdentityError, User};

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// The credential variant this verifier accepts.
    fn kind(&self) -> CredentialKind;

    /// Verifies the credential and returns the identified user.
    ///
    /// Passing a credential of another kind is `InvalidCredentials`.
    async fn verify(&self, credential: Credential) -> Result<User, IdentityError>;
}
