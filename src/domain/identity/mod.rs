//! Identity domain - users, magic-link tokens, and credentials.

mod credential;
mod errors;
mod magic_link;
mod user;

pub use credential::{Credential, CredentialKind};
pub use errors::IdentityError;
pub use magic_link::{
    generate_token, is_well_formed_token, redact_token, MagicLinkToken, MAGIC_LINK_TTL_MINUTES,
    TOKEN_BYTES,
};
pub use user::{generate_username, User};
