//! Entitlement status state machine.

use serde::{Deserialize, Serialize};

/// Whether a user currently holds a paid subscription.
///
/// Both states may transition to themselves; re-applying the current state
/// is how duplicate provider events become no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementStatus {
    Free,
    Paid,
}

impl EntitlementStatus {
    /// Maps the persisted `is_paid` flag to a status.
    pub fn from_is_paid(is_paid: bool) -> Self {
        if is_paid {
            EntitlementStatus::Paid
        } else {
            EntitlementStatus::Free
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, EntitlementStatus::Paid)
    }

    /// Classifies the move from `self` to `target`.
    ///
    /// Every edge is legal, including the self-loops.
    pub fn change_to(self, target: EntitlementStatus) -> EntitlementChange {
        match (self, target) {
            (EntitlementStatus::Free, EntitlementStatus::Paid) => EntitlementChange::Upgraded,
            (EntitlementStatus::Paid, EntitlementStatus::Free) => EntitlementChange::Downgraded,
            _ => EntitlementChange::Unchanged,
        }
    }
}

/// Outcome of applying an entitlement event to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementChange {
    /// Free to Paid.
    Upgraded,
    /// Paid to Free.
    Downgraded,
    /// Still Paid, subscription reference replaced.
    ReferenceUpdated,
    /// Nothing changed.
    Unchanged,
}

impl EntitlementChange {
    /// True when the record must be written back.
    pub fn is_write_required(&self) -> bool {
        !matches!(self, EntitlementChange::Unchanged)
    }
}
