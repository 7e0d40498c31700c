//! PollEv Bot - automated poll responder for PollEverywhere
//!
//! Logs into pollev.com (directly, through UW SSO, or with pre-captured
//! session cookies), watches a presenter host for new polls over the
//! firehose long-poll channel, and submits a randomly selected answer.
//!
//! # Architecture
//!
//! One [`PollBot`] instance owns one [`Session`] (cookie jar + headers)
//! and drives the lifecycle: authenticate, warm up the session, acquire a
//! firehose token for the host, then run the detect/wait/respond cycle
//! until the configured lifetime expires.
//!
//! # Usage
//!
//! ```bash
//! pollev-bot --host uwpsych --user somebody --login-type uw
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use pollev_bot::{PollBot, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut settings = Settings::default();
//! settings.account.host = "uwpsych".to_string();
//! settings.account.user = "somebody".to_string();
//! let mut bot = PollBot::new(settings)?;
//! bot.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod poll;
pub mod session;
pub mod types;
pub mod utils;

pub use bot::PollBot;
pub use config::{LoginType, Settings};
pub use endpoints::Endpoints;
pub use error::{Error, Result};
pub use poll::{PollDetector, PollResponder, SequenceCursor};
pub use session::{LoginStrategy, Session};
