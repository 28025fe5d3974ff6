//! C2B: validation/confirmation URL registration and sandbox simulation.

use daraja::app::Environment;
use daraja::endpoints::{PATH_C2B_REGISTER_URL, PATH_C2B_SIMULATE};
use daraja::enums::{ResponseTypeValue, TransactionType, TransactionTypeValue};
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`C2b::register_url`].
#[derive(Debug, Clone)]
pub struct C2bRegisterUrlRequest {
    /// Organization short code the URLs are registered for.
    pub short_code: String,
    /// URL the gateway calls to validate an incoming payment.
    pub validation_url: String,
    /// URL the gateway calls to confirm a completed payment.
    pub confirmation_url: String,
    /// What the gateway should do when the validation URL is unreachable.
    pub response_type: ResponseTypeValue,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl C2bRegisterUrlRequest {
    /// Creates a registration request.
    pub fn new(
        short_code: impl Into<String>,
        validation_url: impl Into<String>,
        confirmation_url: impl Into<String>,
        response_type: impl Into<ResponseTypeValue>,
    ) -> Self {
        Self {
            short_code: short_code.into(),
            validation_url: validation_url.into(),
            confirmation_url: confirmation_url.into(),
            response_type: response_type.into(),
            access_token: None,
        }
    }

    /// Overrides the bearer token for this call.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }
}

/// Inputs for [`C2b::simulate`].
#[derive(Debug, Clone)]
pub struct C2bSimulateRequest {
    /// Organization short code receiving the simulated payment.
    pub short_code: String,
    /// `CustomerPayBillOnline` or `CustomerBuyGoodsOnline`.
    pub command_id: TransactionTypeValue,
    /// Amount in whole currency units.
    pub amount: u64,
    /// Simulated payer phone number.
    pub msisdn: String,
    /// Bill reference; transmitted only for paybill commands.
    pub bill_ref_number: Option<String>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl C2bSimulateRequest {
    /// Creates a simulation request.
    pub fn new(
        short_code: impl Into<String>,
        command_id: impl Into<TransactionTypeValue>,
        amount: u64,
        msisdn: impl Into<String>,
    ) -> Self {
        Self {
            short_code: short_code.into(),
            command_id: command_id.into(),
            amount,
            msisdn: msisdn.into(),
            bill_ref_number: None,
            access_token: None,
        }
    }

    /// Sets the bill reference for paybill simulations.
    #[must_use]
    pub fn with_bill_ref_number(mut self, bill_ref_number: impl Into<String>) -> Self {
        self.bill_ref_number = Some(bill_ref_number.into());
        self
    }

    /// Overrides the bearer token for this call.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }
}

#[derive(Serialize)]
struct RegisterUrlPayload<'a> {
    #[serde(rename = "ShortCode")]
    short_code: &'a str,
    #[serde(rename = "ValidationURL")]
    validation_url: &'a str,
    #[serde(rename = "ConfirmationURL")]
    confirmation_url: &'a str,
    #[serde(rename = "ResponseType")]
    response_type: &'a ResponseTypeValue,
}

#[derive(Serialize)]
struct SimulatePayload<'a> {
    #[serde(rename = "ShortCode")]
    short_code: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'a TransactionTypeValue,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "Msisdn")]
    msisdn: &'a str,
    #[serde(rename = "BillRefNumber", skip_serializing_if = "Option::is_none")]
    bill_ref_number: Option<&'a str>,
}

/// An accepted URL registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct C2bRegisterUrlResult {
    /// Gateway-assigned conversation identifier.
    pub originator_conversation_id: String,
    /// `"0"` when the registration was accepted.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
}

impl FromNormalized for C2bRegisterUrlResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            originator_conversation_id: normalized.require_str("originator_conversation_id")?,
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
        })
    }
}

/// An accepted payment simulation.
///
/// The sandbox's conversation-identifier key arrives under an upstream
/// typo, so only the response code and description are part of the
/// declared contract; everything else stays readable through
/// [`Reply::raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct C2bSimulateResult {
    /// `"0"` when the simulation was accepted.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
}

impl FromNormalized for C2bSimulateResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
        })
    }
}

/// C2B service.
#[derive(Debug, Clone)]
pub struct C2b {
    conn: Connection,
}

impl C2b {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Registers the validation and confirmation URLs for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn register_url(
        &self,
        request: C2bRegisterUrlRequest,
    ) -> Result<Reply<C2bRegisterUrlResult>, ClientError> {
        let payload = RegisterUrlPayload {
            short_code: &request.short_code,
            validation_url: &request.validation_url,
            confirmation_url: &request.confirmation_url,
            response_type: &request.response_type,
        };
        self.conn
            .post_operation(
                PATH_C2B_REGISTER_URL,
                "POST /mpesa/c2b/v1/registerurl",
                request.access_token.as_deref(),
                &payload,
            )
            .await
    }

    /// Simulates a customer payment. Sandbox only: the gateway has no
    /// simulation support in production, so the restriction is enforced
    /// before any HTTP call is issued.
    ///
    /// The `BillRefNumber` field is transmitted only when the resolved
    /// command is `CustomerPayBillOnline`; buy-goods payments carry no
    /// bill reference.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EnvironmentRestriction`] against
    /// production, otherwise [`ClientError`] on transport failure or an
    /// unparseable response body.
    pub async fn simulate(
        &self,
        request: C2bSimulateRequest,
    ) -> Result<Reply<C2bSimulateResult>, ClientError> {
        if self.conn.app().environment() != Environment::Sandbox {
            return Err(ClientError::EnvironmentRestriction {
                operation: "C2B simulate",
            });
        }
        let pay_bill =
            request.command_id.as_str() == TransactionType::CustomerPayBillOnline.as_str();
        let payload = SimulatePayload {
            short_code: &request.short_code,
            command_id: &request.command_id,
            amount: request.amount,
            msisdn: &request.msisdn,
            bill_ref_number: if pay_bill {
                request.bill_ref_number.as_deref()
            } else {
                None
            },
        };
        self.conn
            .post_operation(
                PATH_C2B_SIMULATE,
                "POST /mpesa/c2b/v1/simulate",
                request.access_token.as_deref(),
                &payload,
            )
            .await
    }
}
