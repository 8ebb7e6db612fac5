//! Email address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Longest address accepted, per the SMTP path limit.
const MAX_EMAIL_LENGTH: usize = 254;

/// A syntactically well-formed, normalized (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalizes an address.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(ValidationError::too_long("email", MAX_EMAIL_LENGTH));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("email", "contains whitespace"));
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing @ symbol"))?;

        if local.is_empty() {
            return Err(ValidationError::invalid_format("email", "empty local part"));
        }
        if domain.contains('@') {
            return Err(ValidationError::invalid_format("email", "multiple @ symbols"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ValidationError::invalid_format("email", "invalid domain"));
        }

        Ok(Self(normalized))
    }

    /// Returns the full address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Portion before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    /// Log-safe form: the local part is masked, the domain kept.
    pub fn redacted(&self) -> String {
        let domain = self.0.rsplit('@').next().unwrap_or_default();
        format!("***@{}", domain)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
