//! Authenticated session state
//!
//! One [`Session`] wraps one `reqwest::Client` with a shared cookie jar
//! and the fixed headers the service expects. All requests of a bot
//! instance go through it; it is never shared between instances.

use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::endpoints::Endpoints;
use crate::error::{Error, Result};
use crate::types::CsrfToken;

/// Desktop browser user-agent sent on every request
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36";

/// Mutable HTTP session: cookie jar, fixed headers, optional referer,
/// and the CSRF fetch privileged requests need.
#[derive(Debug)]
pub struct Session {
    client: Client,
    jar: Arc<Jar>,
    endpoints: Endpoints,
    cookie_origin: Url,
    referer: Option<String>,
}

impl Session {
    /// Create a fresh unauthenticated session against the given endpoints
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let cookie_origin = Url::parse(&endpoints.pollev_base)
            .map_err(|e| Error::config(format!("invalid pollev base URL: {e}")))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Self {
            client,
            jar,
            endpoints,
            cookie_origin,
            referer: None,
        })
    }

    /// Endpoint registry this session talks to
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Referer header applied to all subsequent requests
    pub fn set_referer(&mut self, url: impl Into<String>) {
        self.referer = Some(url.into());
    }

    /// Start a GET request with the session's headers applied
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.apply_referer(self.client.get(url))
    }

    /// Start a POST request with the session's headers applied
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.apply_referer(self.client.post(url))
    }

    fn apply_referer(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.referer {
            Some(referer) => builder.header(REFERER, referer.as_str()),
            None => builder,
        }
    }

    /// Add one cookie at the service origin
    pub fn add_cookie(&self, name: &str, value: &str) {
        self.jar
            .add_cookie_str(&format!("{name}={value}"), &self.cookie_origin);
    }

    /// Merge a pre-captured cookie map into the jar
    pub fn import_cookies(&self, cookies: &HashMap<String, String>) {
        for (name, value) in cookies {
            self.add_cookie(name, value);
        }
    }

    /// Fetch a fresh CSRF token for the next privileged request
    pub async fn csrf_token(&self) -> Result<String> {
        let url = self.endpoints.csrf_token(Self::timestamp_millis());
        let token: CsrfToken = self.get(&url).send().await?.json().await?;
        Ok(token.token)
    }

    /// Current time in milliseconds, used as a cache-busting query value
    pub fn timestamp_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
