//! Bot lifecycle
//!
//! Drives one bot instance through its whole life: authenticate, warm up
//! the session, acquire a firehose token, then run the detect/wait/respond
//! cycle until the configured lifetime expires.
//!
//! Fatal setup conditions (bad credentials, unknown host, no token) end
//! the run with a single logged error; everything that happens inside
//! the loop is absorbed and the loop keeps going. The lifetime is
//! checked only between cycles, so actual termination may overshoot it
//! by up to one long-poll round plus a wait interval.

use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::poll::{PollDetector, PollResponder, SequenceCursor};
use crate::session::{LoginStrategy, Session, authenticate, firehose};

/// Bound for the best-effort warm-up requests
const WARM_UP_TIMEOUT: Duration = Duration::from_secs(5);

/// Cap on the per-cycle idle sleep, so a large closed_wait cannot stall
/// liveness checks
const MAX_IDLE_SLEEP: Duration = Duration::from_secs(1);

/// One bot instance: one session, one host, one detect/respond loop.
///
/// # Examples
///
/// ```rust,no_run
/// use pollev_bot::{PollBot, Settings};
///
/// # async fn example() -> anyhow::Result<()> {
/// let mut settings = Settings::default();
/// settings.account.user = "somebody".to_string();
/// settings.account.password = "hunter2".to_string();
/// settings.account.host = "uwpsych".to_string();
/// let mut bot = PollBot::new(settings)?;
/// bot.run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PollBot {
    settings: Settings,
    session: Session,
    detector: PollDetector,
    responder: PollResponder,
    cursor: SequenceCursor,
    firehose_token: Option<String>,
    started_at: Instant,
}

impl PollBot {
    /// Build a bot from validated settings. The lifetime clock starts here.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let session = Session::new(settings.endpoints.clone())?;
        let detector = PollDetector::new(settings.timing.firehose_timeout());
        let responder =
            PollResponder::new(settings.answers.min_option, settings.answers.max_option);
        Ok(Self {
            session,
            detector,
            responder,
            cursor: SequenceCursor::new(),
            firehose_token: None,
            started_at: Instant::now(),
            settings,
        })
    }

    /// Whether the configured lifetime has not yet expired
    pub fn alive(&self) -> bool {
        match self.settings.timing.lifetime() {
            Some(lifetime) => self.started_at.elapsed() <= lifetime,
            None => true,
        }
    }

    /// Firehose token in use, once the run reached the loop phase
    pub fn firehose_token(&self) -> Option<&str> {
        self.firehose_token.as_deref()
    }

    /// Last observed firehose sequence position
    pub fn last_sequence(&self) -> i64 {
        self.cursor.value()
    }

    /// Run the bot to completion.
    ///
    /// Fatal setup conditions log one error line and return `Err`;
    /// normal completion (lifetime expiry) returns `Ok(())`. All
    /// resources are released on every exit path when the bot drops.
    pub async fn run(&mut self) -> Result<()> {
        if let Err(e) = self.initialize().await {
            error!("{e}");
            return Err(e);
        }
        self.poll_loop().await;
        Ok(())
    }

    /// Log in, prime the session, and resolve the firehose token
    async fn initialize(&mut self) -> Result<()> {
        let strategy = LoginStrategy::from_settings(&self.settings.account);
        authenticate(&self.session, &strategy).await?;

        self.warm_up().await;

        let host = self.settings.account.host.clone();
        let token = match self.settings.account.firehose_token.as_deref() {
            Some(token) if !token.is_empty() => {
                info!("Using firehose token supplied via configuration.");
                Some(token.to_string())
            }
            _ => firehose::acquire_token(&self.session, &host).await?,
        };
        let Some(token) = token else {
            return Err(Error::missing_token(host));
        };
        self.firehose_token = Some(token);
        self.cursor.reset();
        Ok(())
    }

    /// Best-effort session priming; the service does not strictly
    /// require either request, so failures only get debug logs.
    async fn warm_up(&mut self) {
        let referer = self.session.endpoints().home(&self.settings.account.host);
        self.session.set_referer(referer.clone());
        debug!("warming up session via {referer}");
        if let Err(e) = self
            .session
            .get(&referer)
            .timeout(WARM_UP_TIMEOUT)
            .send()
            .await
        {
            debug!("host warm-up failed (non-fatal): {e}");
        }

        let registration_url = self
            .session
            .endpoints()
            .participant_registration(&self.settings.account.host);
        debug!("attempting participant registration -> {registration_url}");
        if let Err(e) = self.register_participant(&registration_url).await {
            debug!("participant registration failed or unavailable: {e}");
        }
    }

    async fn register_participant(&self, url: &str) -> Result<()> {
        let csrf = self.session.csrf_token().await?;
        self.session
            .post(url)
            .header("x-csrf-token", csrf)
            .json(&serde_json::json!({}))
            .timeout(WARM_UP_TIMEOUT)
            .send()
            .await?;
        Ok(())
    }

    /// Detect/wait/respond cycle; lifetime expiry is the only way out
    async fn poll_loop(&mut self) {
        let host = self.settings.account.host.clone();
        while self.alive() {
            let poll_id = self
                .detector
                .next_poll_id(
                    &self.session,
                    &host,
                    self.firehose_token.as_deref(),
                    &mut self.cursor,
                )
                .await;

            match poll_id {
                None => {
                    info!("`{host}` has no new activity yet. Polling again shortly.");
                    let sleep_for = self.settings.timing.closed_wait().min(MAX_IDLE_SLEEP);
                    if !sleep_for.is_zero() {
                        debug!("sleeping for {sleep_for:?} before next firehose check");
                        tokio::time::sleep(sleep_for).await;
                    }
                }
                Some(poll_id) => {
                    info!(
                        "{host} has opened a new poll! Waiting {:?} before responding.",
                        self.settings.timing.open_wait()
                    );
                    tokio::time::sleep(self.settings.timing.open_wait()).await;
                    match self.responder.respond(&self.session, &poll_id).await {
                        Ok(ack) => {
                            if ack_is_empty(&ack) {
                                warn!(
                                    "poll {poll_id} response payload empty; request likely failed"
                                );
                            }
                            info!("Received response: {ack}");
                        }
                        Err(e) => warn!("poll {poll_id} submission failed: {e}"),
                    }
                }
            }
        }
        info!("Lifetime expired; shutting down.");
    }
}

fn ack_is_empty(ack: &serde_json::Value) -> bool {
    match ack {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
