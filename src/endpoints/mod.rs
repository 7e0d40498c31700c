//! Remote endpoint registry
//!
//! URL templates for every PollEverywhere surface the bot talks to:
//! pollev.com itself, the www.polleverywhere.com auth frontend, the UW
//! identity provider, and the firehose long-poll host. Base URLs are
//! plain fields so tests can point every template at a local mock server.

use serde::{Deserialize, Serialize};

/// URL templates for the remote service, parameterized by base URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Base URL for pollev.com (participant API, CSRF, login)
    pub pollev_base: String,
    /// Base URL for www.polleverywhere.com (SSO entry and callback)
    pub www_base: String,
    /// Base URL for the UW identity provider
    pub idp_base: String,
    /// Base URL for the firehose long-poll host
    pub firehose_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            pollev_base: "https://pollev.com".to_string(),
            www_base: "https://www.polleverywhere.com".to_string(),
            idp_base: "https://idp.u.washington.edu".to_string(),
            firehose_base: "https://firehose-production.polleverywhere.com".to_string(),
        }
    }
}

impl Endpoints {
    /// All templates rooted at a single base URL. Used by tests to aim
    /// every request at one mock server.
    pub fn same_origin(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            pollev_base: base.clone(),
            www_base: base.clone(),
            idp_base: base.clone(),
            firehose_base: base,
        }
    }

    /// Presenter home page, also used as the Referer after login
    pub fn home(&self, host: &str) -> String {
        format!("{}/{host}", self.pollev_base)
    }

    /// Session login endpoint
    pub fn login(&self) -> String {
        format!("{}/proxy/api/sessions", self.pollev_base)
    }

    /// CSRF token endpoint; the timestamp query defeats caches
    pub fn csrf_token(&self, timestamp: i64) -> String {
        format!("{}/proxy/api/csrf_token?_={timestamp}", self.pollev_base)
    }

    /// UW SSO entry point on the auth frontend
    pub fn uw_saml_entry(&self) -> String {
        format!(
            "{}/auth/washington?redirect=https%3A%2F%2Fpollev.com%2F&token_required=false",
            self.www_base
        )
    }

    /// IdP credential POST target, bound to the session id extracted
    /// from the entry form
    pub fn uw_login(&self, session_id: &str) -> String {
        format!(
            "{}/idp/profile/SAML2/Redirect/SSO;jsessionid={session_id}.idp03?execution=e1s1",
            self.idp_base
        )
    }

    /// SAML assertion callback
    pub fn uw_callback(&self) -> String {
        format!("{}/auth/washington/callback", self.www_base)
    }

    /// Exchanges the SSO auth token for session cookies
    pub fn participant_auth_token(&self) -> String {
        format!("{}/proxy/api/participant_auth_token", self.pollev_base)
    }

    /// Registration info for a host; the response carries the firehose token
    pub fn registration_info(&self, host: &str, timestamp: i64) -> String {
        format!(
            "{}/proxy/api/users/{host}/registration_info?_={timestamp}",
            self.pollev_base
        )
    }

    /// Best-effort participant registration for a host
    pub fn participant_registration(&self, host: &str) -> String {
        format!(
            "{}/proxy/api/users/{host}/participant_registration",
            self.pollev_base
        )
    }

    /// Firehose long-poll URL. The tokenless variant is used when the
    /// host is not affiliated with the token authority.
    pub fn firehose(&self, host: &str, token: Option<&str>, sequence: i64, timestamp: i64) -> String {
        match token {
            Some(token) => format!(
                "{}/users/{host}/activity/current.json?firehose_token={token}&last_message_sequence={sequence}&_={timestamp}",
                self.firehose_base
            ),
            None => format!(
                "{}/users/{host}/activity/current.json?last_message_sequence={sequence}&_={timestamp}",
                self.firehose_base
            ),
        }
    }

    /// Poll data for a detected poll uid
    pub fn poll_data(&self, uid: &str) -> String {
        format!(
            "{}/proxy/api/participant/multiple_choice_polls/{uid}?include=collection",
            self.pollev_base
        )
    }

    /// Answer submission endpoint for a poll uid
    pub fn poll_results(&self, uid: &str) -> String {
        format!(
            "{}/proxy/api/participant/multiple_choice_polls/{uid}/results",
            self.pollev_base
        )
    }
}
