//! Configuration management for the poll bot
//!
//! This module handles loading and managing bot settings from defaults,
//! an optional TOML file, environment variables, and CLI overrides.

pub mod settings;

pub use settings::{AccountSettings, AnswerSettings, LoginType, Settings, TimingSettings};
