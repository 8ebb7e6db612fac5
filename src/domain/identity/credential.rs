//! Credentials a caller can present to establish an identity.

use secrecy::SecretString;

use crate::domain::foundation::EmailAddress;

/// A presented credential, before verification.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Raw token from a magic link.
    MagicLink { token: String },

    /// Email and password checked against the stored hash.
    Password {
        email: EmailAddress,
        password: SecretString,
    },
}

/// Discriminant used in audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    MagicLink,
    Password,
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::MagicLink { .. } => CredentialKind::MagicLink,
            Credential::Password { .. } => CredentialKind::Password,
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialKind::MagicLink => write!(f, "magic_link"),
            CredentialKind::Password => write!(f, "password"),
        }
    }
}
