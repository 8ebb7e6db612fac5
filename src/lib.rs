//! Quillpress - identity and entitlement boundary of the publishing platform.
//!
//! Issues and redeems single-use magic links, verifies signed billing
//! webhooks, and drives each account's paid/free entitlement along with the
//! article locking that follows a downgrade.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
