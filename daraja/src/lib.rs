#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the M-Pesa Daraja API.
//!
//! This crate provides the foundational pieces shared by every Daraja
//! operation: the environment/credential model, the registry of endpoint
//! paths, the closed vocabularies of wire values the gateway accepts, the
//! password and timestamp helpers used to sign requests, and the response
//! normalizer that converts the gateway's capitalized JSON keys into a
//! uniform `snake_case` mapping.
//!
//! It is transport-agnostic by design: the HTTP client lives in the
//! companion `daraja-http` crate, which builds each request payload from
//! these types and feeds the raw response back through [`normalize`].
//!
//! # Modules
//!
//! - [`app`] - Environment selection and application credentials
//! - [`credentials`] - Base64, timestamps, and request-signing passwords
//! - [`endpoints`] - Base URLs and per-operation paths
//! - [`enums`] - Enumerated wire values and symbol-or-raw resolvers
//! - [`error`] - Error taxonomy shared across the workspace
//! - [`normalize`] - Response key normalization and field selection
//! - [`security`] - RSA security-credential generation (feature: `crypto`)
//!
//! # Feature Flags
//!
//! - `crypto` - Enables X.509/RSA support for
//!   [`security::generate_security_credential`]

pub mod app;
pub mod credentials;
pub mod endpoints;
pub mod enums;
pub mod error;
pub mod normalize;
pub mod security;
