//! Answer submission
//!
//! Fetches the options of a detected poll and submits one of them,
//! picked uniformly at random within the configured index range.

use rand::Rng;
use tracing::{debug, error};

use crate::error::Result;
use crate::poll::preview;
use crate::session::Session;
use crate::types::PollData;

/// Submits randomized answers to detected polls
#[derive(Debug)]
pub struct PollResponder {
    min_option: usize,
    max_option: Option<usize>,
}

impl PollResponder {
    /// Create a responder selecting within `[min_option, max_option)`;
    /// `None` means up to the last option.
    pub fn new(min_option: usize, max_option: Option<usize>) -> Self {
        Self {
            min_option,
            max_option,
        }
    }

    /// Answer one poll. Returns the raw submission acknowledgment, or
    /// `Value::Null` when the configured range selects no options (the
    /// poll is then skipped without a submission) or when the
    /// acknowledgment body is not JSON.
    pub async fn respond(
        &self,
        session: &Session,
        poll_id: &str,
    ) -> Result<serde_json::Value> {
        let url = session.endpoints().poll_data(poll_id);
        let poll_data: PollData = session.get(&url).send().await?.json().await?;
        let total = poll_data.options.len();

        let end = self.max_option.unwrap_or(total).min(total);
        let start = self.min_option.min(end);
        let options = &poll_data.options[start..end];
        debug!(
            "poll {poll_id} options slice [{}:{:?}] -> {} choices",
            self.min_option,
            self.max_option,
            options.len()
        );
        if options.is_empty() {
            error!(
                "Could not answer poll: poll only has {total} options but \
                 min_option was {} and max_option: {:?}",
                self.min_option, self.max_option
            );
            return Ok(serde_json::Value::Null);
        }

        let choice = &options[rand::rng().random_range(0..options.len())];
        debug!("poll {poll_id} selected option_id={}", choice.id);

        let csrf = session.csrf_token().await?;
        let response = session
            .post(&session.endpoints().poll_results(poll_id))
            .header("x-csrf-token", csrf)
            .form(&[
                ("option_id", choice.id.as_str()),
                ("isPending", "true"),
                ("source", "pollev_page"),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("poll {poll_id} respond status={status} body={}", preview(&body));
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Endpoints;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const POLL_ID: &str = "p1";

    async fn session_for(server: &MockServer) -> Session {
        Session::new(Endpoints::same_origin(server.uri())).unwrap()
    }

    async fn mount_poll_data(server: &MockServer, options: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!(
                "/proxy/api/participant/multiple_choice_polls/{POLL_ID}"
            )))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "options": options })),
            )
            .mount(server)
            .await;
    }

    async fn mount_csrf(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/proxy/api/csrf_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "csrf_xyz"})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_submits_random_option_within_range() {
        let server = MockServer::start().await;
        mount_poll_data(
            &server,
            json!([{"id": 11}, {"id": 22}, {"id": 33}]),
        )
        .await;
        mount_csrf(&server).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/proxy/api/participant/multiple_choice_polls/{POLL_ID}/results"
            )))
            .and(header("x-csrf-token", "csrf_xyz"))
            .and(body_string_contains("isPending=true"))
            .and(body_string_contains("option_id=22"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": "accepted"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        // [1, 2) leaves exactly one candidate, making the pick deterministic
        let responder = PollResponder::new(1, Some(2));
        let session = session_for(&server).await;
        let ack = responder.respond(&session, POLL_ID).await.unwrap();
        assert_eq!(ack, json!({"result": "accepted"}));
    }

    #[tokio::test]
    async fn test_empty_slice_skips_submission() {
        let server = MockServer::start().await;
        mount_poll_data(&server, json!([{"id": 1}, {"id": 2}, {"id": 3}])).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/proxy/api/participant/multiple_choice_polls/{POLL_ID}/results"
            )))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        // min_option beyond the option count
        let responder = PollResponder::new(5, None);
        let session = session_for(&server).await;
        let ack = responder.respond(&session, POLL_ID).await.unwrap();
        assert!(ack.is_null());
    }

    #[tokio::test]
    async fn test_equal_bounds_skip_submission() {
        let server = MockServer::start().await;
        mount_poll_data(&server, json!([{"id": 1}, {"id": 2}, {"id": 3}])).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/proxy/api/participant/multiple_choice_polls/{POLL_ID}/results"
            )))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let responder = PollResponder::new(1, Some(1));
        let session = session_for(&server).await;
        let ack = responder.respond(&session, POLL_ID).await.unwrap();
        assert!(ack.is_null());
    }

    #[tokio::test]
    async fn test_non_json_ack_becomes_null() {
        let server = MockServer::start().await;
        mount_poll_data(&server, json!([{"id": 1}])).await;
        mount_csrf(&server).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/proxy/api/participant/multiple_choice_polls/{POLL_ID}/results"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let responder = PollResponder::new(0, None);
        let session = session_for(&server).await;
        let ack = responder.respond(&session, POLL_ID).await.unwrap();
        assert!(ack.is_null());
    }
}
