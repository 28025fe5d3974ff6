//! Base64, timestamp and password helpers for request signing.
//!
//! STK push endpoints authenticate each payload with a password derived
//! from the business short code, the merchant's pass key, and a
//! timestamp. The password and the timestamp travel together in the
//! payload, so they must be generated as a pair. [`password_pair`] is
//! the only derivation path, guaranteeing the password was computed from
//! the timestamp actually transmitted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use chrono::Local;

/// Encodes bytes as standard base64.
///
/// Used for the `Basic` authentication credentials of the token endpoint
/// and for request-signing passwords.
pub fn base64_encode<T: AsRef<[u8]>>(input: T) -> String {
    b64.encode(input.as_ref())
}

/// Returns the current local time formatted as `YYYYMMDDHHMMSS`.
///
/// Always 14 zero-padded digits.
#[must_use]
pub fn timestamp_now() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Derives an STK push password.
///
/// The password is `base64(short_code + pass_key + timestamp)` with no
/// delimiter between the parts.
#[must_use]
pub fn generate_password(short_code: &str, pass_key: &str, timestamp: &str) -> String {
    base64_encode(format!("{short_code}{pass_key}{timestamp}"))
}

/// Derives a `(password, timestamp)` pair.
///
/// When `timestamp` is `None` a fresh [`timestamp_now`] is taken; either
/// way the returned password is computed from the returned timestamp.
#[must_use]
pub fn password_pair(
    short_code: &str,
    pass_key: &str,
    timestamp: Option<String>,
) -> (String, String) {
    let timestamp = timestamp.unwrap_or_else(timestamp_now);
    (generate_password(short_code, pass_key, &timestamp), timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Public sandbox pass key published in the Daraja documentation.
    const SANDBOX_PASS_KEY: &str = "bfb279f9aa9bdbcf158e97dd71a467cd2e0c893059b10f78e6b72ada1ed2c919";

    #[test]
    fn timestamp_is_fourteen_digits() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 14);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn password_matches_known_vector() {
        let password = generate_password("174379", SANDBOX_PASS_KEY, "20160216165627");
        assert_eq!(
            password,
            "MTc0Mzc5YmZiMjc5ZjlhYTliZGJjZjE1OGU5N2RkNzFhNDY3Y2QyZTBjODkzMDU5YjEwZjc4ZTZiNzJhZGExZWQyYzkxOTIwMTYwMjE2MTY1NjI3"
        );
    }

    #[test]
    fn pair_uses_the_supplied_timestamp() {
        let (password, timestamp) =
            password_pair("174379", SANDBOX_PASS_KEY, Some("20160216165627".to_owned()));
        assert_eq!(timestamp, "20160216165627");
        assert_eq!(password, generate_password("174379", SANDBOX_PASS_KEY, &timestamp));
    }

    #[test]
    fn pair_generates_a_timestamp_when_absent() {
        let (password, timestamp) = password_pair("174379", SANDBOX_PASS_KEY, None);
        assert_eq!(timestamp.len(), 14);
        assert_eq!(password, generate_password("174379", SANDBOX_PASS_KEY, &timestamp));
    }

    #[test]
    fn base64_uses_the_standard_alphabet() {
        assert_eq!(base64_encode("key:secret"), "a2V5OnNlY3JldA==");
    }
}
