//! Billing webhook signature verification.
//!
//! The provider signs `webhook-id + "." + webhook-timestamp + "." + raw_body`
//! with HMAC-SHA256 and sends the base64 digest as one or more
//! space-separated `v1,<base64>` entries in `webhook-signature`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

use crate::domain::foundation::Timestamp;

use super::webhook_errors::WebhookError;

/// Signature scheme version accepted by the verifier.
const SIGNATURE_VERSION: &str = "v1";

/// Transport headers that accompany a webhook body.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookHeaders<'a> {
    pub id: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

impl<'a> WebhookHeaders<'a> {
    pub fn new(id: &'a str, timestamp: &'a str, signature: &'a str) -> Self {
        Self {
            id: Some(id),
            timestamp: Some(timestamp),
            signature: Some(signature),
        }
    }

    /// Returns all three values, or `MissingHeaders` if any is absent or blank.
    fn require(&self) -> Result<(&'a str, &'a str, &'a str), WebhookError> {
        let present = |v: Option<&'a str>| v.filter(|s| !s.trim().is_empty());
        match (
            present(self.id),
            present(self.timestamp),
            present(self.signature),
        ) {
            (Some(id), Some(ts), Some(sig)) => Ok((id, ts, sig)),
            _ => Err(WebhookError::MissingHeaders),
        }
    }
}

/// Verifier for billing webhook signatures.
pub struct WebhookVerifier {
    secret: SecretString,
    tolerance_secs: Option<i64>,
}

impl WebhookVerifier {
    /// Creates a verifier keyed by the raw bytes of `secret`.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            tolerance_secs: None,
        }
    }

    /// Rejects timestamps further than `secs` from the current time.
    pub fn with_tolerance(mut self, secs: i64) -> Self {
        self.tolerance_secs = Some(secs);
        self
    }

    /// Verifies the signature over the exact received bytes.
    ///
    /// The body is not interpreted here; callers parse it only after this
    /// returns `Ok`.
    pub fn verify(
        &self,
        headers: &WebhookHeaders<'_>,
        body: &[u8],
        now: Timestamp,
    ) -> Result<(), WebhookError> {
        let (id, timestamp, signature_header) = headers.require()?;

        if let Some(tolerance) = self.tolerance_secs {
            validate_timestamp(timestamp, now, tolerance)?;
        }

        let expected = self.sign(id, timestamp, body)?;

        let mut matched = Choice::from(0u8);
        for entry in signature_header.split_whitespace() {
            if let Some((SIGNATURE_VERSION, candidate)) = entry.split_once(',') {
                matched |= constant_time_compare(expected.as_bytes(), candidate.as_bytes());
            }
        }

        if bool::from(matched) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }

    /// Computes the base64 HMAC-SHA256 digest for the given message parts.
    pub fn sign(&self, id: &str, timestamp: &str, body: &[u8]) -> Result<String, WebhookError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn validate_timestamp(raw: &str, now: Timestamp, tolerance: i64) -> Result<(), WebhookError> {
    let sent: i64 = raw.parse().map_err(|_| WebhookError::TimestampOutOfRange)?;
    if (now.as_unix_secs() - sent).abs() > tolerance {
        return Err(WebhookError::TimestampOutOfRange);
    }
    Ok(())
}

/// Length mismatch short-circuits; equal-length inputs compare in constant time.
fn constant_time_compare(a: &[u8], b: &[u8]) -> Choice {
    if a.len() != b.len() {
        return Choice::from(0u8);
    }
    a.ct_eq(b)
}
