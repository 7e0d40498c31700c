//! Login strategies
//!
//! Three mutually exclusive ways of populating a [`Session`]: direct
//! login on pollev.com, federated login through MyUW (SAML2 SSO), or a
//! pre-captured cookie map. The strategy is selected once at startup;
//! there is no fallback between them.

use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::config::{AccountSettings, LoginType};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::utils::markup;

const UW_EMAIL_DOMAIN: &str = "@uw.edu";

/// Tagged authentication strategy; each variant carries only what it needs
#[derive(Debug, Clone)]
pub enum LoginStrategy {
    /// Direct login on pollev.com
    PollEv { user: String, password: String },
    /// Federated login through MyUW
    Uw { user: String, password: String },
    /// Pre-captured session cookies, merged into the jar without a login flow
    Cookies(HashMap<String, String>),
}

impl LoginStrategy {
    /// Select the strategy for an account. A supplied cookie map always
    /// wins over credential login.
    pub fn from_settings(account: &AccountSettings) -> Self {
        if let Some(cookies) = &account.session_cookies {
            return Self::Cookies(cookies.clone());
        }
        match account.login_type {
            LoginType::Uw => Self::Uw {
                user: account.user.clone(),
                password: account.password.clone(),
            },
            LoginType::PollEv => {
                if account.user.trim().to_lowercase().ends_with(UW_EMAIL_DOMAIN) {
                    warn!(
                        "{} looks like a UW email. Use login_type 'uw' to log in with MyUW.",
                        account.user
                    );
                }
                Self::PollEv {
                    user: account.user.clone(),
                    password: account.password.clone(),
                }
            }
        }
    }
}

/// Populate the session using the given strategy.
///
/// Credential strategies fail with [`Error::Login`]; the cookie strategy
/// never fails here - an invalid cookie map only surfaces downstream.
pub async fn authenticate(session: &Session, strategy: &LoginStrategy) -> Result<()> {
    let success = match strategy {
        LoginStrategy::Cookies(cookies) => {
            info!("Using provided session cookies for authentication.");
            session.import_cookies(cookies);
            // Lightweight liveness probe; stale cookies fail downstream anyway
            if let Err(e) = session.csrf_token().await {
                warn!("CSRF preflight failed: {e}");
            }
            return Ok(());
        }
        LoginStrategy::PollEv { user, password } => pollev_login(session, user, password).await?,
        LoginStrategy::Uw { user, password } => uw_login(session, user, password).await?,
    };
    if !success {
        return Err(Error::login("Your username or password was incorrect."));
    }
    info!("Login successful.");
    Ok(())
}

/// Direct login on pollev.com. The service signals success with an empty
/// response body, not a status code.
async fn pollev_login(session: &Session, user: &str, password: &str) -> Result<bool> {
    info!("Logging into PollEv through pollev.com.");

    let csrf = session.csrf_token().await?;
    let response = session
        .post(&session.endpoints().login())
        .header("x-csrf-token", csrf)
        .form(&[("login", user), ("password", password)])
        .send()
        .await?;
    Ok(response.text().await?.is_empty())
}

/// Federated login through MyUW: entry form, IdP credential POST, SAML
/// assertion callback, then auth-token exchange for session cookies.
async fn uw_login(session: &Session, user: &str, password: &str) -> Result<bool> {
    info!("Logging into PollEv through MyUW.");

    let entry_page = session
        .get(&session.endpoints().uw_saml_entry())
        .send()
        .await?
        .text()
        .await?;
    let Some(action) = markup::element_attr(&entry_page, "form#idplogindiv", "action") else {
        error!("MyUW entry page had no login form; the SSO frontend may have changed.");
        return Ok(false);
    };
    let Some(session_id) = markup::capture_jsessionid(&action) else {
        error!("MyUW login form carried no session id; the SSO frontend may have changed.");
        return Ok(false);
    };

    let login_page = session
        .post(&session.endpoints().uw_login(&session_id))
        .form(&[
            ("j_username", user),
            ("j_password", password),
            ("_eventId_proceed", "Sign in"),
        ])
        .send()
        .await?
        .text()
        .await?;

    // When user authentication fails, UW sends a page without the
    // hidden assertion input.
    let Some(assertion) = markup::hidden_input_value(&login_page) else {
        return Ok(false);
    };

    let callback = session
        .post(&session.endpoints().uw_callback())
        .form(&[("SAMLResponse", assertion.as_str())])
        .send()
        .await?;
    let redirect_url = callback.url().to_string();
    let Some(auth_token) = markup::capture_auth_token(&redirect_url) else {
        error!(
            "MyUW login returned without an auth token. \
             Check your credentials or login_type."
        );
        return Ok(false);
    };

    let csrf = session.csrf_token().await?;
    session
        .post(&session.endpoints().participant_auth_token())
        .header("x-csrf-token", csrf)
        .form(&[("token", auth_token.as_str())])
        .send()
        .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn account(login_type: LoginType, user: &str) -> AccountSettings {
        let mut settings = Settings::default();
        settings.account.user = user.to_string();
        settings.account.password = "hunter2".to_string();
        settings.account.host = "uwpsych".to_string();
        settings.account.login_type = login_type;
        settings.account
    }

    #[test]
    fn test_strategy_from_login_type() {
        assert!(matches!(
            LoginStrategy::from_settings(&account(LoginType::PollEv, "somebody")),
            LoginStrategy::PollEv { .. }
        ));
        assert!(matches!(
            LoginStrategy::from_settings(&account(LoginType::Uw, "somebody")),
            LoginStrategy::Uw { .. }
        ));
    }

    #[test]
    fn test_cookie_map_wins_over_credentials() {
        let mut account = account(LoginType::Uw, "somebody");
        account.session_cookies = Some(HashMap::from([(
            "pe_auth_token".to_string(),
            "abc".to_string(),
        )]));
        assert!(matches!(
            LoginStrategy::from_settings(&account),
            LoginStrategy::Cookies(_)
        ));
    }
}
