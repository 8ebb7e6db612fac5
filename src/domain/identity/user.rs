//! User aggregate.
//!
//! Created by magic-link redemption. Afterwards only the entitlement fields
//! (`is_paid`, `subscription_ref`) change, and only through the methods here.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::entitlement::{EntitlementChange, EntitlementStatus};
use crate::domain::foundation::{EmailAddress, Timestamp, UserId};

/// Random bytes appended to a generated username (six hex characters).
const USERNAME_SUFFIX_BYTES: usize = 3;

/// Longest username stem taken from an email local part.
const MAX_USERNAME_STEM: usize = 24;

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: EmailAddress,
    pub is_paid: bool,
    pub subscription_ref: Option<String>,
    /// Argon2 PHC string for accounts that also sign in with a password.
    pub password_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Provisions a new unpaid account.
    pub fn provision(email: EmailAddress, username: String, now: Timestamp) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            is_paid: false,
            subscription_ref: None,
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored password hash.
    pub fn set_password_hash(&mut self, hash: impl Into<String>, now: Timestamp) {
        self.password_hash = Some(hash.into());
        self.updated_at = now;
    }

    pub fn entitlement(&self) -> EntitlementStatus {
        EntitlementStatus::from_is_paid(self.is_paid)
    }

    /// Applies a confirmed subscription activation.
    ///
    /// Overwrites the subscription reference; replaying the same activation
    /// is `Unchanged`.
    pub fn activate_subscription(
        &mut self,
        subscription_ref: impl Into<String>,
        now: Timestamp,
    ) -> EntitlementChange {
        let subscription_ref = subscription_ref.into();
        let change = match self.entitlement().change_to(EntitlementStatus::Paid) {
            EntitlementChange::Unchanged
                if self.subscription_ref.as_deref() == Some(subscription_ref.as_str()) =>
            {
                EntitlementChange::Unchanged
            }
            EntitlementChange::Unchanged => EntitlementChange::ReferenceUpdated,
            change => change,
        };

        if change.is_write_required() {
            self.is_paid = true;
            self.subscription_ref = Some(subscription_ref);
            self.updated_at = now;
        }
        change
    }

    /// Applies a confirmed subscription end.
    ///
    /// Callers performing a manual cancellation must have revoked the
    /// subscription at the provider first.
    pub fn end_subscription(&mut self, now: Timestamp) -> EntitlementChange {
        let change = match self.entitlement().change_to(EntitlementStatus::Free) {
            EntitlementChange::Unchanged if self.subscription_ref.is_some() => {
                EntitlementChange::ReferenceUpdated
            }
            change => change,
        };

        if change.is_write_required() {
            self.is_paid = false;
            self.subscription_ref = None;
            self.updated_at = now;
        }
        change
    }
}

/// Builds `<stem>_<6 hex chars>` from an email local part.
///
/// The stem keeps ASCII alphanumerics and underscores, lowercased; anything
/// else is dropped. An empty stem falls back to `user`.
pub fn generate_username(email: &EmailAddress) -> String {
    let mut stem: String = email
        .local_part()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_USERNAME_STEM)
        .collect();
    if stem.is_empty() {
        stem.push_str("user");
    }

    let mut suffix = [0u8; USERNAME_SUFFIX_BYTES];
    OsRng.fill_bytes(&mut suffix);
    format!("{}_{}", stem, hex::encode(suffix))
}
