//! Identity command handlers.
//!
//! ## Commands
//!
//! - `RequestMagicLinkCommand` - Issue a single-use sign-in token and email it
//! - `RedeemMagicLinkCommand` - Consume a token and resolve or create the user
//! - `SignInCommand` - Exchange any supported credential for a session
//! - `SetPasswordCommand` - Attach a password to a signed-in account

mod redeem_magic_link;
mod request_magic_link;
mod set_password;
mod sign_in;

pub use redeem_magic_link::{
    RedeemMagicLinkCommand, RedeemMagicLinkHandler, RedeemMagicLinkResult,
};
pub use request_magic_link::{
    MagicLinkSettings, RequestMagicLinkCommand, RequestMagicLinkHandler, RequestMagicLinkResult,
};
pub use set_password::{
    SetPasswordCommand, SetPasswordHandler, MAX_PASSWORD_CHARS, MIN_PASSWORD_CHARS,
};
pub use sign_in::{PasswordCredentialVerifier, SignInCommand, SignInHandler, SignInResult};
