//! Type definitions for the poll bot
//!
//! This module contains the wire-format structures the remote service
//! sends back, plus the serde helpers they need.

pub mod serde_helpers;
pub mod wire;

pub use wire::{CsrfToken, FirehoseEnvelope, PollData, PollOption, RegistrationInfo};
