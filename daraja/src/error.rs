//! Error taxonomy shared across the Daraja workspace.
//!
//! Gateway-level *business* failures (a well-formed non-200 response) are
//! not errors in this taxonomy; they are returned as the failure variant
//! of an operation outcome by `daraja-http`. The types here cover local
//! misconfiguration and responses that violate the wire contract.

/// Errors raised while constructing an [`App`](crate::app::App).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The environment name matched no known environment.
    #[error(r#"unknown environment name {0:?} (expected "sandbox", "live" or "production")"#)]
    UnknownEnvironment(String),
}

/// Errors raised while normalizing a gateway response body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NormalizeError {
    /// The response body is not valid JSON. Surfaced to the caller
    /// regardless of HTTP status; never swallowed into a partial result.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response body parsed, but is not a JSON object.
    #[error("response body is not a JSON object")]
    NotAnObject,

    /// A field declared by the operation's result shape is absent from
    /// the response. Signals an upstream contract change.
    #[error("response is missing the {field:?} field")]
    MissingField {
        /// Normalized name of the missing field.
        field: &'static str,
    },

    /// A declared field is present but not a string or number.
    #[error("response field {field:?} has an unexpected type")]
    UnexpectedType {
        /// Normalized name of the offending field.
        field: &'static str,
    },
}

/// Errors raised while generating a security credential.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CredentialError {
    /// The certificate file could not be read.
    #[error("failed to read certificate: {0}")]
    Read(#[from] std::io::Error),

    /// The certificate could not be parsed, or carries no usable RSA
    /// public key.
    #[error("failed to parse X.509 certificate: {0}")]
    Certificate(String),

    /// RSA encryption of the password failed.
    #[error("RSA encryption failed: {0}")]
    Encrypt(String),

    /// The crate was built without the `crypto` feature.
    #[error("security credential generation requires the `crypto` feature")]
    Unsupported,
}
