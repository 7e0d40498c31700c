//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

/// Test helper functions
pub mod helpers {
    use pollev_bot::{Endpoints, Settings};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const HOST: &str = "demo123";

    /// Settings aimed at a mock server, with timings shrunk so tests
    /// finish quickly. Lifetime 0 keeps the loop from ever running;
    /// scenario tests raise it as needed.
    pub fn test_settings(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.account.user = "somebody".to_string();
        settings.account.password = "hunter2".to_string();
        settings.account.host = HOST.to_string();
        settings.timing.closed_wait_secs = 0.05;
        settings.timing.open_wait_secs = 0.05;
        settings.timing.lifetime_secs = Some(0.0);
        settings.timing.firehose_timeout_secs = 0.3;
        settings.endpoints = Endpoints::same_origin(server.uri());
        settings
    }

    /// CSRF endpoint returning a fixed token
    pub async fn mount_csrf(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/proxy/api/csrf_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "csrf_xyz"})),
            )
            .mount(server)
            .await;
    }

    /// Direct login endpoint answering with the empty body that signals
    /// success
    pub async fn mount_direct_login_success(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/proxy/api/sessions"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    /// Registration info endpoint handing out the given token value
    pub async fn mount_registration_info(server: &MockServer, token: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/proxy/api/users/{HOST}/registration_info")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"firehose_token": token})),
            )
            .mount(server)
            .await;
    }
}
