//! Firehose long-poll detection
//!
//! One call is one long-poll round: the server holds the connection open
//! and answers early only when something happened. A timeout therefore
//! means "no new poll", not an error - every transient condition in this
//! module collapses to `None` and the lifecycle simply polls again.

use std::time::Duration;
use tracing::debug;

use crate::poll::{SequenceCursor, preview};
use crate::session::Session;
use crate::types::FirehoseEnvelope;

/// Detects new polls for a host over the firehose channel
#[derive(Debug)]
pub struct PollDetector {
    timeout: Duration,
}

impl PollDetector {
    /// Create a detector with the given long-poll bound
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run one long-poll round and return the uid of a newly opened
    /// poll, or `None` when nothing happened this round.
    ///
    /// Both sequence layers of the response (envelope and nested event
    /// payload) advance the cursor; the server's counters overlap and
    /// are deliberately not reconciled beyond taking the maximum.
    pub async fn next_poll_id(
        &self,
        session: &Session,
        host: &str,
        firehose_token: Option<&str>,
        cursor: &mut SequenceCursor,
    ) -> Option<String> {
        let url = session.endpoints().firehose(
            host,
            firehose_token,
            cursor.value(),
            Session::timestamp_millis(),
        );
        debug!("firehose request -> {url}");

        let response = match session.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                debug!("firehose long-poll timed out (no new activity yet); will retry");
                return None;
            }
            Err(e) => {
                debug!("firehose request failed ({e}); will retry");
                return None;
            }
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("firehose body read failed ({e}); will retry");
                return None;
            }
        };
        debug!("firehose status={status} body={}", preview(&body));

        let envelope: FirehoseEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("firehose response was not valid JSON ({e}); body={}", preview(&body));
                return None;
            }
        };
        cursor.observe(envelope.last_message_sequence.as_ref());

        let message = match envelope.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => {
                debug!("firehose response missing message payload");
                return None;
            }
        };
        let payload: serde_json::Value = match serde_json::from_str(message) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("firehose message payload was not valid JSON ({e}); message={message}");
                return None;
            }
        };
        if !payload.is_object() {
            debug!("firehose message payload not an object; payload={payload}");
            return None;
        }
        let poll_id = match payload.get("uid") {
            Some(serde_json::Value::String(uid)) if !uid.is_empty() => uid.clone(),
            Some(serde_json::Value::Number(uid)) => uid.to_string(),
            _ => {
                debug!("firehose message missing uid payload; message={message}");
                return None;
            }
        };
        cursor.observe(payload.get("sequence"));
        debug!("firehose parsed poll_id={poll_id}");
        Some(poll_id)
    }
}
