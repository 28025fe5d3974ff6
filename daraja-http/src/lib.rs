#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async HTTP client for the M-Pesa Daraja API.
//!
//! One service type per API family, all sharing a [`connection::Connection`]
//! that holds the immutable app context, the `reqwest` client, and an
//! optional default access token. Each operation builds its JSON payload
//! with the gateway's exact field names, issues a single HTTP call, and
//! normalizes the response into a typed [`outcome::Reply`]: the declared
//! success shape on HTTP 200, the gateway's error shape otherwise.
//!
//! This layer is a stateless call-and-return façade. There are no
//! retries, no caching and no rate limiting; transport failures and
//! malformed bodies surface as [`error::ClientError`], and reliability
//! semantics belong to the caller.
//!
//! # Example
//!
//! ```no_run
//! use daraja::app::App;
//! use daraja_http::authorization::Authorization;
//! use daraja_http::connection::Connection;
//!
//! # async fn run() -> Result<(), daraja_http::error::ClientError> {
//! let app = App::sandbox("consumer key", "consumer secret");
//! let auth = Authorization::new(Connection::new(app));
//! let reply = auth.generate().await?;
//! if let Some(token) = reply.success() {
//!     println!("token: {}", token.access_token);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `crypto` - Re-enables `daraja`'s security-credential generation
//! - `telemetry` - Records request outcomes on `tracing` spans

pub mod account_balance;
pub mod authorization;
pub mod b2c;
pub mod c2b;
pub mod connection;
pub mod error;
pub mod outcome;
pub mod qrcode;
pub mod reversal;
pub mod stk_push;
pub mod transaction_status;
