//! Billing provider adapters.

mod http_billing_provider;
mod mock_payment_provider;

pub use http_billing_provider::{BillingApiConfig, HttpBillingProvider};
pub use mock_payment_provider::{MockPaymentProvider, ProviderCall};
