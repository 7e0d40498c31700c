//! Firehose token acquisition
//!
//! A firehose token scopes the long-poll channel to a host. Hosts not
//! affiliated with the token authority legitimately have none; that is
//! reported as `Ok(None)`, not an error.

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::RegistrationInfo;

/// Marker the service embeds in the body when the host does not exist
const HOST_NOT_FOUND_MARKER: &str = "presenter not found";

/// Fetch the firehose token for a host over an authenticated session.
///
/// Fails with [`Error::UnknownHost`] when the host does not exist.
/// Returns `Ok(None)` when the host has no token authority affiliation.
pub async fn acquire_token(session: &Session, host: &str) -> Result<Option<String>> {
    // The service expects two visitor cookies normally generated by
    // browser script; they are random uuids, synthesized here directly.
    session.add_cookie("pollev_visitor", &Uuid::new_v4().to_string());
    session.add_cookie("pollev_visit", &Uuid::new_v4().to_string());

    let url = session
        .endpoints()
        .registration_info(host, Session::timestamp_millis());
    let response = session.get(&url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    debug!("firehose auth status={status} body={}", crate::poll::preview(&body));

    if body.to_lowercase().contains(HOST_NOT_FOUND_MARKER) {
        return Err(Error::unknown_host(host));
    }
    let info: RegistrationInfo = serde_json::from_str(&body)?;
    debug!("firehose auth token={:?}", info.firehose_token);
    Ok(info.firehose_token)
}
