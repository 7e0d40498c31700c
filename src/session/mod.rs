//! Session management and authentication
//!
//! This module owns the authenticated HTTP session (cookie jar, fixed
//! headers, CSRF fetches), the three mutually exclusive login
//! strategies, and firehose token acquisition.

pub mod auth;
pub mod firehose;
pub mod store;

pub use auth::{LoginStrategy, authenticate};
pub use firehose::acquire_token;
pub use store::Session;
