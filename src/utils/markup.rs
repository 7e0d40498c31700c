//! Markup and redirect-URL extraction
//!
//! The SSO flow returns HTML pages and redirect URLs the bot has to pull
//! values out of: a login-form action, a hidden SAML assertion field, a
//! session id and an auth token embedded in URLs. Document values are
//! looked up structurally (tag/attribute), URL values by explicit
//! pattern capture. Everything returns `Option`; absence is a signal the
//! callers interpret, never a panic.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static JSESSIONID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"jsessionid=(.*)\.").expect("static pattern"));

static AUTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pe_auth_token=(.*)").expect("static pattern"));

/// Look up an attribute of the first element matching a CSS selector.
pub fn element_attr(html: &str, selector: &str, attr: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr(attr)
        .map(str::to_string)
}

/// Value of the first hidden input in a page.
///
/// The IdP puts the SAML assertion in the only hidden input of its
/// response form; when credential verification fails the input is absent.
pub fn hidden_input_value(html: &str) -> Option<String> {
    element_attr(html, r#"input[type="hidden"]"#, "value")
}

/// Session id embedded in a login-form action URL.
pub fn capture_jsessionid(action_url: &str) -> Option<String> {
    capture_first(&JSESSIONID, action_url)
}

/// Auth token embedded in the post-callback redirect URL.
pub fn capture_auth_token(redirect_url: &str) -> Option<String> {
    capture_first(&AUTH_TOKEN, redirect_url)
}

fn capture_first(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().to_string())
}
