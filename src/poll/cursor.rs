//! Long-poll sequence cursor
//!
//! The firehose reports stream positions in two places: an envelope
//! `last_message_sequence` and a `sequence` inside the event payload.
//! Both feed the same cursor; it only ever moves forward, whatever the
//! server sends.

use tracing::debug;

/// Monotonically non-decreasing position in the firehose event stream
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCursor {
    last: i64,
}

impl SequenceCursor {
    /// Cursor at the start of the stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position, passed back on the next long-poll round
    pub fn value(&self) -> i64 {
        self.last
    }

    /// Return to the start of the stream. Only valid at (re)authentication.
    pub fn reset(&mut self) {
        self.last = 0;
    }

    /// Observe a sequence value from a server response. Numbers and
    /// numeric strings are accepted; anything else is ignored. The
    /// cursor advances only on strictly greater values.
    pub fn observe(&mut self, raw: Option<&serde_json::Value>) {
        let Some(raw) = raw else { return };
        let Some(sequence) = coerce(raw) else {
            debug!("firehose sequence value not an int; value={raw}");
            return;
        };
        if sequence > self.last {
            self.last = sequence;
        }
    }
}

fn coerce(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
