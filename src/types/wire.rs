//! Wire-format structures
//!
//! Shapes of the JSON payloads the remote service returns. Every struct
//! tolerates missing optional fields; unknown fields are ignored.

use serde::Deserialize;

use crate::types::serde_helpers::deserialize_string_or_number;

/// Response of the CSRF token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CsrfToken {
    /// Anti-forgery token for the next privileged request
    pub token: String,
}

/// Registration info for a poll host.
///
/// `firehose_token` is explicitly null for hosts not affiliated with the
/// token authority; that is a valid state, not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationInfo {
    #[serde(default)]
    pub firehose_token: Option<String>,
}

/// Outer envelope of a firehose long-poll response.
///
/// `message` is itself a JSON document encoded as a string; the sequence
/// field may be a number or a numeric string depending on the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirehoseEnvelope {
    #[serde(default)]
    pub last_message_sequence: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Poll data returned for a detected poll uid
#[derive(Debug, Clone, Deserialize)]
pub struct PollData {
    #[serde(default)]
    pub options: Vec<PollOption>,
}

/// One selectable option of a multiple-choice poll
#[derive(Debug, Clone, Deserialize)]
pub struct PollOption {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_with_all_fields() {
        let envelope: FirehoseEnvelope = serde_json::from_str(
            r#"{"last_message_sequence": 7, "message": "{\"uid\":\"p1\"}"}"#,
        )
        .unwrap();
        assert_eq!(
            envelope.last_message_sequence,
            Some(serde_json::Value::from(7))
        );
        assert_eq!(envelope.message.as_deref(), Some("{\"uid\":\"p1\"}"));
    }

    #[test]
    fn test_envelope_empty_object() {
        let envelope: FirehoseEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.last_message_sequence.is_none());
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_envelope_string_sequence() {
        let envelope: FirehoseEnvelope =
            serde_json::from_str(r#"{"last_message_sequence": "12"}"#).unwrap();
        assert_eq!(
            envelope.last_message_sequence,
            Some(serde_json::Value::from("12"))
        );
    }

    #[test]
    fn test_registration_info_null_token() {
        let info: RegistrationInfo =
            serde_json::from_str(r#"{"firehose_token": null}"#).unwrap();
        assert!(info.firehose_token.is_none());
    }

    #[test]
    fn test_registration_info_present_token() {
        let info: RegistrationInfo =
            serde_json::from_str(r#"{"firehose_token": "tok_abc"}"#).unwrap();
        assert_eq!(info.firehose_token.as_deref(), Some("tok_abc"));
    }

    #[test]
    fn test_poll_data_numeric_option_ids() {
        let data: PollData = serde_json::from_str(
            r#"{"options": [{"id": 1, "value": "Yes"}, {"id": "2", "value": "No"}]}"#,
        )
        .unwrap();
        assert_eq!(data.options.len(), 2);
        assert_eq!(data.options[0].id, "1");
        assert_eq!(data.options[1].id, "2");
    }

    #[test]
    fn test_poll_data_missing_options() {
        let data: PollData = serde_json::from_str("{}").unwrap();
        assert!(data.options.is_empty());
    }

    #[test]
    fn test_csrf_token() {
        let token: CsrfToken = serde_json::from_str(r#"{"token": "csrf_xyz"}"#).unwrap();
        assert_eq!(token.token, "csrf_xyz");
    }
}
