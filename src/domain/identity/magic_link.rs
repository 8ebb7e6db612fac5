//! Magic-link token entity.
//!
//! A token is created once, redeemed at most once, and never deleted.
//! `used` only ever moves from `false` to `true`.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::foundation::{EmailAddress, MagicLinkTokenId, Timestamp};

use super::IdentityError;

/// Lifetime of a freshly issued token.
pub const MAGIC_LINK_TTL_MINUTES: i64 = 15;

/// Bytes of CSPRNG output per token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Characters of the token kept when writing it to logs.
const REDACTED_PREFIX_LEN: usize = 6;

/// Single-use, time-bounded sign-in token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicLinkToken {
    pub id: MagicLinkTokenId,
    pub email: EmailAddress,
    pub token: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub created_at: Timestamp,
}

impl MagicLinkToken {
    /// Issues a new unused token for `email`, valid for fifteen minutes from `now`.
    pub fn issue(email: EmailAddress, now: Timestamp) -> Self {
        Self {
            id: MagicLinkTokenId::new(),
            email,
            token: generate_token(),
            expires_at: now.plus_minutes(MAGIC_LINK_TTL_MINUTES),
            used: false,
            created_at: now,
        }
    }

    /// Expired strictly after `expires_at`; the boundary instant still redeems.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Checks consumption before expiry so each failure is reported distinctly.
    pub fn ensure_redeemable(&self, now: Timestamp) -> Result<(), IdentityError> {
        if self.used {
            return Err(IdentityError::TokenAlreadyUsed);
        }
        if self.is_expired_at(now) {
            return Err(IdentityError::TokenExpired);
        }
        Ok(())
    }

    /// Log-safe rendering of the token value.
    pub fn redacted(&self) -> String {
        redact_token(&self.token)
    }
}

/// Hex-encodes `TOKEN_BYTES` bytes from the operating system RNG.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// True if `candidate` has the shape of a token this module would generate.
pub fn is_well_formed_token(candidate: &str) -> bool {
    candidate.len() == TOKEN_BYTES * 2 && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Keeps a short prefix of a presented token for audit logs.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(REDACTED_PREFIX_LEN).collect();
    format!("{}…", prefix)
}
