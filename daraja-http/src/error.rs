//! Error types for the HTTP client layer.

use daraja::error::NormalizeError;

/// Errors that can occur while issuing a gateway operation.
///
/// A *well-formed* non-200 gateway response is not an error here; it is
/// the [`Outcome::Failure`](crate::outcome::Outcome::Failure) variant of
/// the returned reply. `ClientError` covers everything that prevents an
/// outcome from being produced at all.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// A sandbox-only operation was invoked against production.
    #[error("{operation} is available in the sandbox environment only")]
    EnvironmentRestriction {
        /// Human-readable operation name.
        operation: &'static str,
    },

    /// HTTP transport failure (connection refused, timeout, TLS).
    /// Propagated from `reqwest` untranslated.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to read the response body.
    #[error("failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be normalized: not valid JSON, not an
    /// object, or missing a declared result field.
    #[error("{context}: {source}")]
    Normalize {
        /// Human-readable context.
        context: &'static str,
        /// The underlying normalization error.
        #[source]
        source: NormalizeError,
    },
}
