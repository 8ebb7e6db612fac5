//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, email, errors, auth context)
//! - `identity` - Users, magic-link tokens, credentials
//! - `entitlement` - Free/Paid state, billing events, webhook verification
//! - `publishing` - Articles and the free-plan access policy

pub mod entitlement;
pub mod foundation;
pub mod identity;
pub mod publishing;
