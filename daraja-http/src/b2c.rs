//! B2C: business-to-customer disbursements.

use daraja::endpoints::PATH_B2C_PAYMENT_REQUEST;
use daraja::enums::CommandValue;
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`B2c::payment_request`].
#[derive(Debug, Clone)]
pub struct B2cRequest {
    /// Caller-assigned unique identifier for the disbursement.
    pub originator_conversation_id: String,
    /// Initiator username on the organization's portal.
    pub initiator_name: String,
    /// Encrypted initiator password (see `daraja::security`).
    pub security_credential: String,
    /// `BusinessPayment`, `SalaryPayment` or `PromotionPayment`.
    pub command_id: CommandValue,
    /// Amount in whole currency units.
    pub amount: u64,
    /// Disbursing short code.
    pub party_a: String,
    /// Receiving phone number.
    pub party_b: String,
    /// Free-form remarks.
    pub remarks: String,
    /// URL notified when the request expires in the queue.
    pub queue_time_out_url: String,
    /// URL receiving the asynchronous result.
    pub result_url: String,
    /// Optional occasion note. Transmitted under the gateway's
    /// misspelled `Occassion` key.
    pub occassion: Option<String>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl B2cRequest {
    /// Creates a disbursement request.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        originator_conversation_id: impl Into<String>,
        initiator_name: impl Into<String>,
        security_credential: impl Into<String>,
        command_id: impl Into<CommandValue>,
        amount: u64,
        party_a: impl Into<String>,
        party_b: impl Into<String>,
        remarks: impl Into<String>,
        queue_time_out_url: impl Into<String>,
        result_url: impl Into<String>,
    ) -> Self {
        Self {
            originator_conversation_id: originator_conversation_id.into(),
            initiator_name: initiator_name.into(),
            security_credential: security_credential.into(),
            command_id: command_id.into(),
            amount,
            party_a: party_a.into(),
            party_b: party_b.into(),
            remarks: remarks.into(),
            queue_time_out_url: queue_time_out_url.into(),
            result_url: result_url.into(),
            occassion: None,
            access_token: None,
        }
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
struct B2cPayload<'a> {
    #[serde(rename = "OriginatorConversationID")]
    originator_conversation_id: &'a str,
    #[serde(rename = "InitiatorName")]
    initiator_name: &'a str,
    #[serde(rename = "SecurityCredential")]
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'a CommandValue,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "PartyA")]
    party_a: &'a str,
    #[serde(rename = "PartyB")]
    party_b: &'a str,
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

/// An accepted disbursement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B2cResult {
    /// Gateway-assigned conversation identifier.
    pub conversation_id: String,
    /// Echo of the caller-assigned identifier.
    pub originator_conversation_id: String,
    /// `"0"` when the request was accepted.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
}

impl FromNormalized for B2cResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            conversation_id: normalized.require_str("conversation_id")?,
            originator_conversation_id: normalized.require_str("originator_conversation_id")?,
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
        })
    }
}

/// B2C disbursement service.
#[derive(Debug, Clone)]
pub struct B2c {
    conn: Connection,
}

impl B2c {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Requests a disbursement to a customer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn payment_request(&self, request: B2cRequest) -> Result<Reply<B2cResult>, ClientError> {
        let payload = B2cPayload {
            originator_conversation_id: &request.originator_conversation_id,
            initiator_name: &request.initiator_name,
            security_credential: &request.security_credential,
            command_id: &request.command_id,
            amount: request.amount,
            party_a: &request.party_a,
            party_b: &request.party_b,
            remarks: &request.remarks,
            queue_time_out_url: &request.queue_time_out_url,
            result_url: &request.result_url,
            occassion: request.occassion.as_deref().unwrap_or_default(),
        };
        self.conn
            .post_operation(
                PATH_B2C_PAYMENT_REQUEST,
                "POST /mpesa/b2c/v1/paymentrequest",
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
    use daraja::enums::CommandId;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> B2c {
        let conn = Connection::new(App::sandbox("key", "secret"))
            .with_access_token("token")
            .with_base_url_override(server.uri());
        B2c::new(conn)
    }

    #[tokio::test]
    async fn payment_request_returns_the_typed_success_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/b2c/v1/paymentrequest"))
            .and(body_partial_json(json!({
                "OriginatorConversationID": "2dc26700-cdce-41a8-9913-d8a35704cd48",
                "InitiatorName": "testapi",
                "CommandID": "BusinessPayment",
                "Amount": 1,
                "PartyA": "600979",
                "PartyB": "254708374149",
                "QueueTimeOutURL": "https://mydomain.com/b2c/queue",
                "ResultURL": "https://mydomain.com/b2c/result",
                "Occassion": "",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ConversationID": "AG_20250803_0100100304l06pxff5wk",
                "OriginatorConversationID": "2dc26700-cdce-41a8-9913-d8a35704cd48",
                "ResponseCode": "0",
                "ResponseDescription": "Accept the service request successfully.",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = B2cRequest::new(
            "2dc26700-cdce-41a8-9913-d8a35704cd48",
            "testapi",
            "encrypted-credential",
            CommandId::BusinessPayment,
            1,
            "600979",
            "254708374149",
            "Test remarks",
            "https://mydomain.com/b2c/queue",
            "https://mydomain.com/b2c/result",
        );
        let reply = service(&server).payment_request(request).await.unwrap();

        assert!(reply.succeeded());
        let result = reply.success().unwrap();
        assert_eq!(result.conversation_id, "AG_20250803_0100100304l06pxff5wk");
        assert_eq!(
            result.originator_conversation_id,
            "2dc26700-cdce-41a8-9913-d8a35704cd48"
        );
        assert_eq!(result.response_code, "0");
    }

    #[tokio::test]
    async fn raw_command_strings_are_transmitted_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/b2c/v1/paymentrequest"))
            .and(body_partial_json(json!({ "CommandID": "SalaryPayment" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ConversationID": "AG_1",
                "OriginatorConversationID": "2dc2",
                "ResponseCode": "0",
                "ResponseDescription": "ok",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = B2cRequest::new(
            "2dc2",
            "testapi",
            "credential",
            "SalaryPayment",
            1,
            "600979",
            "254708374149",
            "remarks",
            "https://mydomain.com/queue",
            "https://mydomain.com/result",
        );
        let reply = service(&server).payment_request(request).await.unwrap();
        assert!(reply.succeeded());
    }
}
