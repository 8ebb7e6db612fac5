//! Application handlers.
//!
//! Command handlers that orchestrate domain operations, grouped by module.

pub mod entitlement;
pub mod identity;
pub mod publishing;
