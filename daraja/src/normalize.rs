//! Response normalization: capitalized gateway keys to `snake_case`.
//!
//! The gateway names JSON fields in capitalized compound words
//! (`ResponseCode`, `OriginatorConversationID`, `errorMessage`). Every
//! response body is parsed once and its keys converted to a uniform
//! `snake_case` mapping; each operation then selects exactly its declared
//! fields from that mapping. A body that is not a JSON object is an
//! error; there is no partial-result fallback.

use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Converts a gateway JSON key to `snake_case`.
///
/// A separator is inserted before an uppercase letter that follows a
/// lowercase letter or digit, or that precedes a lowercase letter (and is
/// not the first character); the whole key is then lowercased. Runs of
/// uppercase letters stay together until the transition into a trailing
/// lowercase run, so `OriginatorConversationID` becomes
/// `originator_conversation_id` and `QRCode` becomes `qr_code`. The
/// conversion is total and idempotent: already-`snake_case` input passes
/// through unchanged.
#[must_use]
pub fn snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let after_lower = i > 0
                && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let before_lower =
                i > 0 && chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase());
            if after_lower || before_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// A gateway response with its keys normalized.
///
/// Carries the HTTP status, the `succeeded` marker (status 200), the
/// original parsed body, and the `snake_case` field mapping the
/// operation result shapes select from.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    status: u16,
    succeeded: bool,
    raw: Value,
    fields: Map<String, Value>,
}

impl Normalized {
    /// Parses and normalizes a response body.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Parse`] if the body is not valid JSON
    /// (regardless of HTTP status) and [`NormalizeError::NotAnObject`] if
    /// it parses to something other than an object.
    pub fn from_body(status: u16, body: &str) -> Result<Self, NormalizeError> {
        let raw: Value = serde_json::from_str(body)?;
        let object = raw.as_object().ok_or(NormalizeError::NotAnObject)?;
        let fields = object
            .iter()
            .map(|(key, value)| (snake_case(key), value.clone()))
            .collect();
        Ok(Self {
            status,
            succeeded: status == 200,
            raw,
            fields,
        })
    }

    /// Returns the HTTP status code of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` iff the HTTP status was 200.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Returns the original parsed response body.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consumes `self`, returning the original parsed response body.
    #[must_use]
    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Returns the normalized field mapping.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a normalized field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Looks up a normalized field as a string, if present.
    ///
    /// Numbers are stringified; null and structured values count as
    /// absent. Used for the optional fields of error payloads.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<String> {
        match self.fields.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Looks up a declared field as a string.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::MissingField`] if the field is absent
    /// (a declared field disappearing signals an upstream contract
    /// change) and [`NormalizeError::UnexpectedType`] if it is not a
    /// string or number.
    pub fn require_str(&self, field: &'static str) -> Result<String, NormalizeError> {
        match self.fields.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(_) => Err(NormalizeError::UnexpectedType { field }),
            None => Err(NormalizeError::MissingField { field }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_worked_examples() {
        assert_eq!(snake_case("snake_case"), "snake_case");
        assert_eq!(snake_case("snake123"), "snake123");
        assert_eq!(snake_case("SnakeCase"), "snake_case");
        assert_eq!(snake_case("ABCSnakeCase"), "abc_snake_case");
        assert_eq!(snake_case("snakeCaseABC"), "snake_case_abc");
    }

    #[test]
    fn snake_case_gateway_keys() {
        assert_eq!(snake_case("ResponseCode"), "response_code");
        assert_eq!(
            snake_case("OriginatorConversationID"),
            "originator_conversation_id"
        );
        assert_eq!(snake_case("CheckoutRequestID"), "checkout_request_id");
        assert_eq!(snake_case("QRCode"), "qr_code");
        assert_eq!(snake_case("errorMessage"), "error_message");
        assert_eq!(snake_case("requestId"), "request_id");
    }

    #[test]
    fn snake_case_is_idempotent() {
        for key in ["ResponseCode", "snakeCaseABC", "QRCode", "already_snake"] {
            let once = snake_case(key);
            assert_eq!(snake_case(&once), once);
        }
    }

    #[test]
    fn normalizes_a_success_body() {
        let n = Normalized::from_body(200, r#"{"ResponseCode":"0","CustomerMessage":"ok"}"#)
            .unwrap();
        assert!(n.succeeded());
        assert_eq!(n.require_str("response_code").unwrap(), "0");
        assert_eq!(n.require_str("customer_message").unwrap(), "ok");
    }

    #[test]
    fn non_200_is_not_succeeded() {
        let n = Normalized::from_body(500, r#"{"errorCode":"500.001"}"#).unwrap();
        assert!(!n.succeeded());
        assert_eq!(n.get_str("error_code").unwrap(), "500.001");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = Normalized::from_body(200, "<html>busy</html>").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn invalid_json_is_a_parse_error_even_for_error_statuses() {
        let err = Normalized::from_body(503, "Service Unavailable").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = Normalized::from_body(200, "[1,2,3]").unwrap_err();
        assert!(matches!(err, NormalizeError::NotAnObject));
    }

    #[test]
    fn missing_declared_field_is_a_contract_error() {
        let n = Normalized::from_body(200, r#"{"ResponseCode":"0"}"#).unwrap();
        let err = n.require_str("customer_message").unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingField { field: "customer_message" }
        ));
    }

    #[test]
    fn numeric_fields_are_stringified() {
        let n = Normalized::from_body(200, r#"{"ResponseCode":0}"#).unwrap();
        assert_eq!(n.require_str("response_code").unwrap(), "0");
    }
}
