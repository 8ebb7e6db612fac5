//! Billing provider event payloads.
//!
//! Only parsed after the signature has been verified. Recognised types carry
//! the subscription id in `data.id` and our user id in `data.metadata.userId`,
//! which we attached when creating the checkout session.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::UserId;

use super::webhook_errors::WebhookError;

pub const SUBSCRIPTION_ACTIVE: &str = "subscription.active";
pub const SUBSCRIPTION_CANCELED: &str = "subscription.canceled";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

/// A verified billing event, reduced to what entitlement needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    SubscriptionActive {
        subscription_ref: String,
        user_id: UserId,
    },
    SubscriptionCanceled {
        subscription_ref: String,
        user_id: UserId,
    },
    /// Any other event type; acknowledged and ignored.
    Unrecognized { event_type: String },
}

impl BillingEvent {
    /// Parses a verified body.
    ///
    /// # Errors
    ///
    /// - `MalformedPayload` if the body is not a JSON object with a string `type`
    /// - `MalformedEvent` if a recognised event lacks `data.id` or a UUID `data.metadata.userId`
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        match envelope.event_type.as_str() {
            SUBSCRIPTION_ACTIVE => {
                let (subscription_ref, user_id) = subscription_fields(&envelope.data)?;
                Ok(BillingEvent::SubscriptionActive {
                    subscription_ref,
                    user_id,
                })
            }
            SUBSCRIPTION_CANCELED => {
                let (subscription_ref, user_id) = subscription_fields(&envelope.data)?;
                Ok(BillingEvent::SubscriptionCanceled {
                    subscription_ref,
                    user_id,
                })
            }
            _ => Ok(BillingEvent::Unrecognized {
                event_type: envelope.event_type,
            }),
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            BillingEvent::SubscriptionActive { .. } => SUBSCRIPTION_ACTIVE,
            BillingEvent::SubscriptionCanceled { .. } => SUBSCRIPTION_CANCELED,
            BillingEvent::Unrecognized { event_type } => event_type,
        }
    }
}

fn subscription_fields(data: &Value) -> Result<(String, UserId), WebhookError> {
    let user_id = data
        .pointer("/metadata/userId")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<UserId>().ok())
        .ok_or(WebhookError::MalformedEvent("data.metadata.userId"))?;

    let subscription_ref = data
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(WebhookError::MalformedEvent("data.id"))?
        .to_string();

    Ok((subscription_ref, user_id))
}
