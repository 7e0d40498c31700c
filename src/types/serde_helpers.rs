//! Custom serde deserializers for flexible type handling
//!
//! Provides custom deserializers for fields the remote service sends in
//! more than one JSON shape.

use serde::{Deserialize, Deserializer};

/// Deserialize a value that may arrive as a JSON string or a JSON number
/// into a `String`.
///
/// Poll option ids (and some sequence fields) show up as integers in
/// older API responses and strings in newer ones; downstream code only
/// ever re-serializes them into form bodies, so both collapse to text.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Int(i) => Ok(i.to_string()),
        StringOrNumber::Float(f) => Ok(f.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(deserialize_with = "deserialize_string_or_number")]
        id: String,
    }

    #[test]
    fn test_deserialize_string() {
        let json = json!({"id": "opt_1"});
        let result: TestStruct = serde_json::from_value(json).unwrap();
        assert_eq!(result.id, "opt_1");
    }

    #[test]
    fn test_deserialize_integer() {
        let json = json!({"id": 48213});
        let result: TestStruct = serde_json::from_value(json).unwrap();
        assert_eq!(result.id, "48213");
    }

    #[test]
    fn test_deserialize_negative_integer() {
        let json = json!({"id": -7});
        let result: TestStruct = serde_json::from_value(json).unwrap();
        assert_eq!(result.id, "-7");
    }

    #[test]
    fn test_deserialize_bool_rejected() {
        let json = json!({"id": true});
        let result: Result<TestStruct, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_null_rejected() {
        let json = json!({"id": null});
        let result: Result<TestStruct, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
