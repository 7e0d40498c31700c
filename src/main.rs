//! CLI entry point for the poll bot
//!
//! Assembles settings from an optional TOML config file, environment
//! variables and command-line flags, provisions session cookies and a
//! cached firehose token when available, then runs one bot instance
//! until its lifetime expires.
//!
//! # Usage
//!
//! ```bash
//! pollev-bot --host uwpsych --user somebody --login-type uw
//! pollev-bot --host demo123 --cookie-string "pe_auth_token=...; pollev_visit=..."
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pollev_bot::utils::cache::{TokenCache, load_cookie_file, parse_cookie_string};
use pollev_bot::{PollBot, Settings};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "pollev-bot")]
struct Cli {
    /// Poll host to watch, i.e. 'uwpsych'
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Account username
    #[arg(short, long, value_name = "USER")]
    user: Option<String>,

    /// Account password (or set POLLEV_PASSWORD)
    #[arg(short, long, value_name = "PASSWORD")]
    password: Option<String>,

    /// Login protocol: 'pollev' or 'uw'
    #[arg(short, long, value_name = "LOGIN_TYPE")]
    login_type: Option<String>,

    /// Minimum option index to select (inclusive, 0-indexed)
    #[arg(long, value_name = "N")]
    min_option: Option<usize>,

    /// Maximum option index to select (exclusive; default: all options)
    #[arg(long, value_name = "N")]
    max_option: Option<usize>,

    /// Seconds to wait while no poll is open
    #[arg(long, value_name = "SECONDS")]
    closed_wait: Option<f64>,

    /// Seconds to wait before answering an open poll
    #[arg(long, value_name = "SECONDS")]
    open_wait: Option<f64>,

    /// Bot lifetime in seconds (default: run forever)
    #[arg(long, value_name = "SECONDS")]
    lifetime: Option<f64>,

    /// JSON file holding a session cookie map
    #[arg(long, value_name = "FILE")]
    cookie_file: Option<PathBuf>,

    /// Browser cookie header, e.g. "pe_auth_token=...; pollev_visit=..."
    #[arg(long, value_name = "COOKIES", conflicts_with = "cookie_file")]
    cookie_string: Option<String>,

    /// Firehose token for the host (also saved to the token cache)
    #[arg(long, value_name = "TOKEN")]
    firehose_token: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = build_settings(&cli)?;

    let mut bot = PollBot::new(settings)?;
    if bot.run().await.is_err() {
        // Already logged by the bot; signal the failure to the shell
        std::process::exit(1);
    }
    Ok(())
}

/// Assemble settings with defaults < config file < environment < CLI flags
fn build_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if let Some(host) = &cli.host {
        settings.account.host = host.clone();
    }
    if let Some(user) = &cli.user {
        settings.account.user = user.clone();
    }
    if let Some(password) = &cli.password {
        settings.account.password = password.clone();
    }
    if let Some(login_type) = &cli.login_type {
        settings.account.login_type = login_type.parse()?;
    }
    if let Some(min_option) = cli.min_option {
        settings.answers.min_option = min_option;
    }
    if let Some(max_option) = cli.max_option {
        settings.answers.max_option = Some(max_option);
    }
    if let Some(closed_wait) = cli.closed_wait {
        settings.timing.closed_wait_secs = closed_wait;
    }
    if let Some(open_wait) = cli.open_wait {
        settings.timing.open_wait_secs = open_wait;
    }
    if let Some(lifetime) = cli.lifetime {
        settings.timing.lifetime_secs = Some(lifetime);
    }

    if let Some(raw) = &cli.cookie_string {
        let cookies = parse_cookie_string(raw);
        if cookies.is_empty() {
            anyhow::bail!("no cookies found in --cookie-string");
        }
        if !cookies.contains_key("pe_auth_token") {
            warn!("pe_auth_token not found in the supplied cookies; login may not stick");
        }
        settings.account.session_cookies = Some(cookies);
    } else if let Some(path) = &cli.cookie_file {
        settings.account.session_cookies = Some(load_cookie_file(path)?);
    }

    resolve_firehose_token(cli, &mut settings);

    settings.validate()?;
    Ok(settings)
}

/// A token given on the CLI is authoritative and saved back to the
/// cache; otherwise the cache may supply one for this host.
fn resolve_firehose_token(cli: &Cli, settings: &mut Settings) {
    let cache = match TokenCache::at_default_location() {
        Ok(cache) => cache,
        Err(e) => {
            warn!("firehose token cache unavailable: {e}");
            return;
        }
    };
    if let Some(token) = &cli.firehose_token {
        settings.account.firehose_token = Some(token.clone());
        if let Err(e) = cache.insert(&settings.account.host, token) {
            warn!("could not save firehose token cache: {e}");
        }
    } else if settings.account.firehose_token.is_none()
        && let Some(token) = cache.get(&settings.account.host)
    {
        info!("Using cached firehose token for {}.", settings.account.host);
        settings.account.firehose_token = Some(token);
    }
}
