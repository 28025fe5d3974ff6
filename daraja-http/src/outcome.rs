//! Operation outcomes: typed success shapes and the gateway error shape.
//!
//! Every operation resolves to a [`Reply`]: the HTTP status, the raw
//! parsed body kept for diagnostics, and an [`Outcome`] that is either
//! the operation's declared success shape (HTTP 200) or the gateway's
//! normalized error payload. Callers discriminate with
//! [`Reply::succeeded`] or by matching the outcome.

use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use reqwest::StatusCode;
use serde_json::Value;

/// Builds a typed success shape from a normalized response.
///
/// Implementations select exactly the fields declared for the operation;
/// extra upstream fields are ignored, and a missing declared field is a
/// [`NormalizeError::MissingField`] contract violation.
pub trait FromNormalized: Sized {
    /// Selects this shape's declared fields from the normalized mapping.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] if a declared field is absent or has an
    /// unexpected type.
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError>;
}

/// The gateway's error payload, normalized.
///
/// Non-200 responses carry `requestId`/`errorCode`/`errorMessage`-style
/// fields; all three are optional because upstream error bodies are not
/// perfectly uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// Gateway-assigned request identifier.
    pub request_id: Option<String>,
    /// Machine-readable error code.
    pub error_code: Option<String>,
    /// Human-readable error message.
    pub error_message: Option<String>,
}

impl GatewayError {
    pub(crate) fn from_normalized(normalized: &Normalized) -> Self {
        Self {
            request_id: normalized.get_str("request_id"),
            error_code: normalized.get_str("error_code"),
            error_message: normalized.get_str("error_message"),
        }
    }
}

/// The two disjoint results of one gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// HTTP 200: the operation's declared result shape.
    Success(T),
    /// Any other status: the gateway's error payload.
    Failure(GatewayError),
}

/// A completed gateway exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    status: StatusCode,
    raw: Value,
    outcome: Outcome<T>,
}

impl<T> Reply<T> {
    pub(crate) fn new(status: StatusCode, raw: Value, outcome: Outcome<T>) -> Self {
        Self { status, raw, outcome }
    }

    /// Returns the HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the raw parsed response body, kept for diagnostics.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns `true` iff the gateway accepted the request (HTTP 200).
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// Returns the outcome.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }

    /// Returns the success shape, if the call succeeded.
    #[must_use]
    pub fn success(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Success(result) => Some(result),
            Outcome::Failure(_) => None,
        }
    }

    /// Returns the gateway error, if the call failed.
    #[must_use]
    pub fn failure(&self) -> Option<&GatewayError> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    /// Consumes the reply, discarding the diagnostics.
    ///
    /// # Errors
    ///
    /// Returns the [`GatewayError`] if the call failed.
    pub fn into_result(self) -> Result<T, GatewayError> {
        match self.outcome {
            Outcome::Success(result) => Ok(result),
            Outcome::Failure(error) => Err(error),
        }
    }
}
