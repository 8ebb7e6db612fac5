//! HTTP adapter for checkout, cancellation and billing webhooks.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER};
pub use routes::{billing_routes, webhook_routes};
