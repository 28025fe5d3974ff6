//! Transaction reversals.

use daraja::endpoints::PATH_REVERSAL_REQUEST;
use daraja::enums::{CommandId, CommandValue, IdentifierTypeValue};
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`Reversal::request`].
#[derive(Debug, Clone)]
pub struct ReversalRequest {
    /// Initiator username on the organization's portal.
    pub initiator: String,
    /// Encrypted initiator password (see `daraja::security`).
    pub security_credential: String,
    /// Gateway receipt of the transaction being reversed.
    pub transaction_id: String,
    /// Amount originally transacted.
    pub amount: u64,
    /// Organization receiving the reversed funds.
    pub receiver_party: String,
    /// Type of the identifier in `receiver_party`. Transmitted under the
    /// gateway's misspelled `RecieverIdentifierType` key.
    pub receiver_identifier_type: IdentifierTypeValue,
    /// URL receiving the asynchronous result.
    pub result_url: String,
    /// URL notified when the request expires in the queue.
    pub queue_time_out_url: String,
    /// Free-form remarks.
    pub remarks: String,
    /// Command; defaults to [`CommandId::TransactionReversal`].
    pub command_id: Option<CommandValue>,
    /// Optional occasion note. Unlike B2C, this endpoint spells the
    /// `Occasion` key correctly.
    pub occasion: Option<String>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl ReversalRequest {
    /// Creates a reversal request.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        initiator: impl Into<String>,
        security_credential: impl Into<String>,
        transaction_id: impl Into<String>,
        amount: u64,
        receiver_party: impl Into<String>,
        receiver_identifier_type: impl Into<IdentifierTypeValue>,
        result_url: impl Into<String>,
        queue_time_out_url: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            initiator: initiator.into(),
            security_credential: security_credential.into(),
            transaction_id: transaction_id.into(),
            amount,
            receiver_party: receiver_party.into(),
            receiver_identifier_type: receiver_identifier_type.into(),
            result_url: result_url.into(),
            queue_time_out_url: queue_time_out_url.into(),
            remarks: remarks.into(),
            command_id: None,
            occasion: None,
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
    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = Some(occasion.into());
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
struct ReversalPayload<'a> {
    #[serde(rename = "Initiator")]
    initiator: &'a str,
    #[serde(rename = "SecurityCredential")]
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'a CommandValue,
    #[serde(rename = "TransactionID")]
    transaction_id: &'a str,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "ReceiverParty")]
    receiver_party: &'a str,
    // Upstream misspelling, part of the wire contract.
    #[serde(rename = "RecieverIdentifierType")]
    receiver_identifier_type: &'a IdentifierTypeValue,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_time_out_url: &'a str,
    #[serde(rename = "Remarks")]
    remarks: &'a str,
    #[serde(rename = "Occasion")]
    occasion: &'a str,
}

/// An accepted reversal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalResult {
    /// Echo of the caller-assigned identifier.
    pub originator_conversation_id: String,
    /// Gateway-assigned conversation identifier.
    pub conversation_id: String,
    /// `"0"` when the request was accepted.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
}

impl FromNormalized for ReversalResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            originator_conversation_id: normalized.require_str("originator_conversation_id")?,
            conversation_id: normalized.require_str("conversation_id")?,
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
        })
    }
}

/// Reversal service.
#[derive(Debug, Clone)]
pub struct Reversal {
    conn: Connection,
}

impl Reversal {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Requests reversal of a completed transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn request(
        &self,
        request: ReversalRequest,
    ) -> Result<Reply<ReversalResult>, ClientError> {
        let command_id = request
            .command_id
            .clone()
            .unwrap_or_else(|| CommandId::TransactionReversal.into());
        let payload = ReversalPayload {
            initiator: &request.initiator,
            security_credential: &request.security_credential,
            command_id: &command_id,
            transaction_id: &request.transaction_id,
            amount: request.amount,
            receiver_party: &request.receiver_party,
            receiver_identifier_type: &request.receiver_identifier_type,
            result_url: &request.result_url,
            queue_time_out_url: &request.queue_time_out_url,
            remarks: &request.remarks,
            occasion: request.occasion.as_deref().unwrap_or_default(),
        };
        self.conn
            .post_operation(
                PATH_REVERSAL_REQUEST,
                "POST /mpesa/reversal/v1/request",
                request.access_token.as_deref(),
                &payload,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daraja::app::App;
    use daraja::enums::IdentifierType;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> Reversal {
        let conn = Connection::new(App::sandbox("key", "secret"))
            .with_access_token("token")
            .with_base_url_override(server.uri());
        Reversal::new(conn)
    }

    #[tokio::test]
    async fn request_defaults_the_command_and_returns_the_success_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/reversal/v1/request"))
            .and(body_partial_json(json!({
                "CommandID": "TransactionReversal",
                "TransactionID": "OEI2AK4Q16",
                "ReceiverParty": "600980",
                "RecieverIdentifierType": 4,
                "Occasion": "",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "OriginatorConversationID": "71840-27539181-07",
                "ConversationID": "AG_20210709_12346c8e6f8858d7b70a",
                "ResponseCode": "0",
                "ResponseDescription": "Accept the service request successfully.",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ReversalRequest::new(
            "testapi",
            "encrypted-credential",
            "OEI2AK4Q16",
            1,
            "600980",
            IdentifierType::OrganizationShortCode,
            "https://mydomain.com/Reversal/result/",
            "https://mydomain.com/Reversal/queue/",
            "Test Remarks",
        );
        let reply = service(&server).request(request).await.unwrap();

        assert!(reply.succeeded());
        let result = reply.success().unwrap();
        assert_eq!(result.conversation_id, "AG_20210709_12346c8e6f8858d7b70a");
        assert_eq!(result.response_code, "0");
    }
}
