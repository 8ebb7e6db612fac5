//! Response bodies for billing endpoints.

use serde::Serialize;

use crate::domain::foundation::ArticleId;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub message: String,
    pub locked_articles: Vec<String>,
}

impl CancelResponse {
    pub fn new(locked: &[ArticleId]) -> Self {
        Self {
            message: "Subscription canceled".to_string(),
            locked_articles: locked.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Acknowledgement for a processed or ignored webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}
