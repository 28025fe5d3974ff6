//! Account balance queries.

use daraja::endpoints::PATH_ACCOUNT_BALANCE_QUERY;
use daraja::enums::{CommandId, CommandValue, IdentifierTypeValue};
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`AccountBalance::query`].
#[derive(Debug, Clone)]
pub struct AccountBalanceRequest {
    /// Initiator username on the organization's portal.
    pub initiator: String,
    /// Encrypted initiator password (see `daraja::security`).
    pub security_credential: String,
    /// Type of the identifier in `party_a`.
    pub identifier_type: IdentifierTypeValue,
    /// Organization whose balance is queried.
    pub party_a: String,
    /// Free-form remarks.
    pub remarks: String,
    /// URL notified when the request expires in the queue.
    pub queue_time_out_url: String,
    /// URL receiving the asynchronous result.
    pub result_url: String,
    /// Command; defaults to [`CommandId::AccountBalance`].
    pub command_id: Option<CommandValue>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl AccountBalanceRequest {
    /// Creates a balance query.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        initiator: impl Into<String>,
        security_credential: impl Into<String>,
        identifier_type: impl Into<IdentifierTypeValue>,
        party_a: impl Into<String>,
        remarks: impl Into<String>,
        queue_time_out_url: impl Into<String>,
        result_url: impl Into<String>,
    ) -> Self {
        Self {
            initiator: initiator.into(),
            security_credential: security_credential.into(),
            identifier_type: identifier_type.into(),
            party_a: party_a.into(),
            remarks: remarks.into(),
            queue_time_out_url: queue_time_out_url.into(),
            result_url: result_url.into(),
            command_id: None,
            access_token: None,
        }
    }

    /// Overrides the command identifier.
    #[must_use]
    pub fn with_command_id(mut self, command_id: impl Into<CommandValue>) -> Self {
        self.command_id = Some(command_id.into());
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
struct AccountBalancePayload<'a> {
    #[serde(rename = "Initiator")]
    initiator: &'a str,
    #[serde(rename = "SecurityCredential")]
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'a CommandValue,
    #[serde(rename = "PartyA")]
    party_a: &'a str,
    #[serde(rename = "IdentifierType")]
    identifier_type: &'a IdentifierTypeValue,
    #[serde(rename = "Remarks")]
    remarks: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_time_out_url: &'a str,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
}

/// An accepted balance query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalanceResult {
    /// Echo of the caller-assigned identifier.
    pub originator_conversation_id: String,
    /// Gateway-assigned conversation identifier.
    pub conversation_id: String,
    /// `"0"` when the query was accepted.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
}

impl FromNormalized for AccountBalanceResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            originator_conversation_id: normalized.require_str("originator_conversation_id")?,
            conversation_id: normalized.require_str("conversation_id")?,
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
        })
    }
}

/// Account balance service.
#[derive(Debug, Clone)]
pub struct AccountBalance {
    conn: Connection,
}

impl AccountBalance {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Queries the balance of an organization account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn query(
        &self,
        request: AccountBalanceRequest,
    ) -> Result<Reply<AccountBalanceResult>, ClientError> {
        let command_id = request
            .command_id
            .clone()
            .unwrap_or_else(|| CommandId::AccountBalance.into());
        let payload = AccountBalancePayload {
            initiator: &request.initiator,
            security_credential: &request.security_credential,
            command_id: &command_id,
            party_a: &request.party_a,
            identifier_type: &request.identifier_type,
            remarks: &request.remarks,
            queue_time_out_url: &request.queue_time_out_url,
            result_url: &request.result_url,
        };
        self.conn
            .post_operation(
                PATH_ACCOUNT_BALANCE_QUERY,
                "POST /mpesa/accountbalance/v1/query",
                request.access_token.as_deref(),
                &payload,
            )
            .await
    }
}
