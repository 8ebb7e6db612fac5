//! HTTP adapter for sign-in.

pub mod dto;
mod handlers;
mod routes;

pub use routes::identity_routes;
