//! Environment selection and application credentials.
//!
//! An [`App`] holds the consumer key/secret pair issued by the Daraja
//! developer portal together with the target [`Environment`]. It is
//! constructed once, never mutated, and shared by every service built on
//! top of it; the base URL is derived from the environment and cannot be
//! set independently.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::credentials::base64_encode;
use crate::endpoints::{PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
use crate::error::ConfigError;

/// Target Daraja environment.
///
/// Each variant is bound to a fixed origin; there is no way to point an
/// [`App`] at an arbitrary URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// `https://sandbox.safaricom.co.ke`
    Sandbox,
    /// `https://api.safaricom.co.ke`
    Production,
}

impl Environment {
    /// Returns the fixed base URL for this environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        })
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    /// Parses a case-insensitive environment name. The production
    /// environment answers to both `"live"` and `"production"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sandbox") {
            Ok(Self::Sandbox)
        } else if s.eq_ignore_ascii_case("live") || s.eq_ignore_ascii_case("production") {
            Ok(Self::Production)
        } else {
            Err(ConfigError::UnknownEnvironment(s.to_owned()))
        }
    }
}

/// Immutable application context: environment plus consumer credentials.
///
/// Cloning is cheap; every clone refers to the same logical application.
/// Safe to share across concurrent calls; nothing here is mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    environment: Environment,
    consumer_key: String,
    consumer_secret: String,
}

impl App {
    /// Creates an app context for the given environment.
    pub fn new(
        environment: Environment,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Creates an app context from an environment *name*.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnvironment`] if `name` is not
    /// `"sandbox"`, `"live"` or `"production"` (case-insensitive).
    pub fn from_name(
        name: &str,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(name.parse()?, consumer_key, consumer_secret))
    }

    /// Creates a sandbox app context.
    pub fn sandbox(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self::new(Environment::Sandbox, consumer_key, consumer_secret)
    }

    /// Creates a production app context.
    pub fn live(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self::new(Environment::Production, consumer_key, consumer_secret)
    }

    /// Returns the selected environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the base URL derived from the environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    /// Returns the consumer key.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Returns the consumer secret.
    #[must_use]
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// Returns `base64(consumer_key:consumer_secret)` for HTTP Basic
    /// authentication against the token endpoint.
    #[must_use]
    pub fn basic_credentials(&self) -> String {
        base64_encode(format!("{}:{}", self.consumer_key, self.consumer_secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_forms_agree_on_base_url() {
        let e0 = App::new(Environment::Sandbox, "", "");
        let e1 = App::from_name("sandbox", "", "").unwrap();
        let e2 = App::sandbox("", "");
        assert_eq!(e0.base_url(), SANDBOX_BASE_URL);
        assert_eq!(e1.base_url(), SANDBOX_BASE_URL);
        assert_eq!(e2.base_url(), SANDBOX_BASE_URL);

        let l0 = App::new(Environment::Production, "", "");
        let l1 = App::from_name("live", "", "").unwrap();
        let l2 = App::live("", "");
        assert_eq!(l0.base_url(), PRODUCTION_BASE_URL);
        assert_eq!(l1.base_url(), PRODUCTION_BASE_URL);
        assert_eq!(l2.base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn environment_names_are_case_insensitive() {
        assert_eq!("SANDBOX".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!("Live".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
    }

    #[test]
    fn unknown_environment_name_is_rejected() {
        let err = App::from_name("staging", "k", "s").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(name) if name == "staging"));
    }

    #[test]
    fn basic_credentials_encode_key_and_secret() {
        let app = App::sandbox("key", "secret");
        // base64("key:secret")
        assert_eq!(app.basic_credentials(), "a2V5OnNlY3JldA==");
    }
}
