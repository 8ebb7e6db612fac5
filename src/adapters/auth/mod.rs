//! Authentication adapters.
//!
//! - `jwt_session` - HS256 session tokens (`SessionIssuer` + `SessionValidator`)
//! - `argon2_hasher` - Argon2id `PasswordHasher`

mod argon2_hasher;
mod jwt_session;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_session::{JwtSessionConfig, JwtSessionService};
