//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Argon2 password hashing and JWT sessions
//! - `billing` - Billing provider HTTP client and a scriptable mock
//! - `email` - Magic-link delivery (Resend, log-only)
//! - `http` - axum REST API
//! - `memory` - In-memory repositories
//! - `postgres` - sqlx repositories

pub mod auth;
pub mod billing;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
