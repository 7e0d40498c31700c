//! Poll detection and response
//!
//! The detector runs one firehose long-poll round at a time and tracks
//! the event-stream position with a monotone cursor; the responder turns
//! a detected poll uid into a submitted answer.

pub mod cursor;
pub mod detector;
pub mod responder;

pub use cursor::SequenceCursor;
pub use detector::PollDetector;
pub use responder::PollResponder;

/// Bounded body preview for debug logs, safe on UTF-8 boundaries
pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(512) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
