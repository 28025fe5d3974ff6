//! Transaction status queries.

use daraja::endpoints::PATH_TRANSACTION_STATUS_QUERY;
use daraja::enums::{CommandId, CommandValue, IdentifierTypeValue};
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`TransactionStatus::query`].
#[derive(Debug, Clone)]
pub struct TransactionStatusRequest {
    /// Caller-assigned unique identifier for the query.
    pub originator_conversation_id: String,
    /// Initiator username on the organization's portal.
    pub initiator: String,
    /// Encrypted initiator password (see `daraja::security`).
    pub security_credential: String,
    /// Gateway receipt of the transaction being queried.
    pub transaction_id: String,
    /// Type of the identifier in `party_a`.
    pub identifier_type: IdentifierTypeValue,
    /// Organization queried.
    pub party_a: String,
    /// Free-form remarks.
    pub remarks: String,
    /// URL notified when the request expires in the queue.
    pub queue_time_out_url: String,
    /// URL receiving the asynchronous result.
    pub result_url: String,
    /// Command; defaults to [`CommandId::TransactionStatusQuery`].
    pub command_id: Option<CommandValue>,
    /// Optional occasion note, transmitted under the gateway's
    /// misspelled `Occassion` key.
    pub occassion: Option<String>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl TransactionStatusRequest {
    /// Creates a status query.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        originator_conversation_id: impl Into<String>,
        initiator: impl Into<String>,
        security_credential: impl Into<String>,
        transaction_id: impl Into<String>,
        identifier_type: impl Into<IdentifierTypeValue>,
        party_a: impl Into<String>,
        remarks: impl Into<String>,
        queue_time_out_url: impl Into<String>,
        result_url: impl Into<String>,
    ) -> Self {
        Self {
            originator_conversation_id: originator_conversation_id.into(),
            initiator: initiator.into(),
            security_credential: security_credential.into(),
            transaction_id: transaction_id.into(),
            identifier_type: identifier_type.into(),
            party_a: party_a.into(),
            remarks: remarks.into(),
            queue_time_out_url: queue_time_out_url.into(),
            result_url: result_url.into(),
            command_id: None,
            occassion: None,
            access_token: None,
        }
    }

    /// Overrides the command identifier.
    #[must_use]
    pub fn with_command_id(mut self, command_id: impl Into<CommandValue>) -> Self {
        self.command_id = Some(command_id.into());
        self
    }

    /// Sets the occasion note.
    #[must_use]
    pub fn with_occassion(mut self, occassion: impl Into<String>) -> Self {
        self.occassion = Some(occassion.into());
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
struct TransactionStatusPayload<'a> {
    #[serde(rename = "OriginatorConversationID")]
    originator_conversation_id: &'a str,
    #[serde(rename = "Initiator")]
    initiator: &'a str,
    #[serde(rename = "SecurityCredential")]
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'a CommandValue,
    #[serde(rename = "TransactionID")]
    transaction_id: &'a str,
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
    // Upstream misspelling, part of the wire contract.
    #[serde(rename = "Occassion")]
    occassion: &'a str,
}

/// An accepted status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStatusResult {
    /// Gateway-assigned conversation identifier.
    pub conversation_id: String,
    /// Echo of the caller-assigned identifier.
    pub originator_conversation_id: String,
    /// `"0"` when the query was accepted.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
}

impl FromNormalized for TransactionStatusResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            conversation_id: normalized.require_str("conversation_id")?,
            originator_conversation_id: normalized.require_str("originator_conversation_id")?,
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
        })
    }
}

/// Transaction status service.
#[derive(Debug, Clone)]
pub struct TransactionStatus {
    conn: Connection,
}

impl TransactionStatus {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Queries the status of a transaction by its receipt number.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn query(
        &self,
        request: TransactionStatusRequest,
    ) -> Result<Reply<TransactionStatusResult>, ClientError> {
        let command_id = request
            .command_id
            .clone()
            .unwrap_or_else(|| CommandId::TransactionStatusQuery.into());
        let payload = TransactionStatusPayload {
            originator_conversation_id: &request.originator_conversation_id,
            initiator: &request.initiator,
            security_credential: &request.security_credential,
            command_id: &command_id,
            transaction_id: &request.transaction_id,
            party_a: &request.party_a,
            identifier_type: &request.identifier_type,
            remarks: &request.remarks,
            queue_time_out_url: &request.queue_time_out_url,
            result_url: &request.result_url,
            occassion: request.occassion.as_deref().unwrap_or_default(),
        };
        self.conn
            .post_operation(
                PATH_TRANSACTION_STATUS_QUERY,
                "POST /mpesa/transactionstatus/v1/query",
                request.access_token.as_deref(),
                &payload,
            )
            .await
    }
}
