//! STK push (Lipa na M-Pesa Online): payment initiation and status query.
//!
//! Both operations sign their payload with a password derived from the
//! business short code, the merchant pass key, and a timestamp. The
//! password and timestamp always travel as a pair: either the caller
//! supplies both explicitly via [`StkPushRequest::with_password`], or
//! both are derived together from the pass key at call time.

use daraja::credentials::{password_pair, timestamp_now};
use daraja::endpoints::{PATH_STK_PUSH_PROCESS_REQUEST, PATH_STK_PUSH_QUERY};
use daraja::enums::TransactionTypeValue;
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`StkPush::process_request`].
#[derive(Debug, Clone)]
pub struct StkPushRequest {
    /// Organization short code receiving the payment.
    pub business_short_code: String,
    /// Amount in whole currency units.
    pub amount: u64,
    /// Subscriber phone number prompted to pay.
    pub phone_number: String,
    /// URL receiving the asynchronous payment result.
    pub call_back_url: String,
    /// Account reference shown to the subscriber.
    pub account_reference: String,
    /// Short transaction description.
    pub transaction_desc: String,
    /// `CustomerPayBillOnline` or `CustomerBuyGoodsOnline`.
    pub transaction_type: TransactionTypeValue,
    /// Debit party; defaults to the phone number.
    pub party_a: Option<String>,
    /// Credit party; defaults to the business short code.
    pub party_b: Option<String>,
    /// Pre-computed password, always paired with `timestamp`.
    pub password: Option<String>,
    /// Timestamp the password was (or will be) derived from.
    pub timestamp: Option<String>,
    /// Merchant pass key used to derive the password.
    pub pass_key: Option<String>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl StkPushRequest {
    /// Creates a request with the required fields.
    pub fn new(
        business_short_code: impl Into<String>,
        amount: u64,
        phone_number: impl Into<String>,
        call_back_url: impl Into<String>,
        account_reference: impl Into<String>,
        transaction_desc: impl Into<String>,
        transaction_type: impl Into<TransactionTypeValue>,
    ) -> Self {
        Self {
            business_short_code: business_short_code.into(),
            amount,
            phone_number: phone_number.into(),
            call_back_url: call_back_url.into(),
            account_reference: account_reference.into(),
            transaction_desc: transaction_desc.into(),
            transaction_type: transaction_type.into(),
            party_a: None,
            party_b: None,
            password: None,
            timestamp: None,
            pass_key: None,
            access_token: None,
        }
    }

    /// Overrides the debit party (defaults to the phone number).
    #[must_use]
    pub fn with_party_a(mut self, party_a: impl Into<String>) -> Self {
        self.party_a = Some(party_a.into());
        self
    }

    /// Overrides the credit party (defaults to the short code).
    #[must_use]
    pub fn with_party_b(mut self, party_b: impl Into<String>) -> Self {
        self.party_b = Some(party_b.into());
        self
    }

    /// Sets the pass key the password is derived from.
    #[must_use]
    pub fn with_pass_key(mut self, pass_key: impl Into<String>) -> Self {
        self.pass_key = Some(pass_key.into());
        self
    }

    /// Pins the timestamp used for password derivation.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Supplies a pre-computed password together with the timestamp it
    /// was derived from. The pair is transmitted as given.
    #[must_use]
    pub fn with_password(
        mut self,
        password: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        self.password = Some(password.into());
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Overrides the bearer token for this call.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Resolves the `(password, timestamp)` pair for transmission.
    fn credentials(&self) -> (String, String) {
        match (&self.password, &self.timestamp) {
            (Some(password), timestamp) => (
                password.clone(),
                timestamp.clone().unwrap_or_else(timestamp_now),
            ),
            (None, timestamp) => password_pair(
                &self.business_short_code,
                self.pass_key.as_deref().unwrap_or_default(),
                timestamp.clone(),
            ),
        }
    }
}

/// Inputs for [`StkPush::query`].
#[derive(Debug, Clone)]
pub struct StkPushQueryRequest {
    /// Organization short code the payment was initiated against.
    pub business_short_code: String,
    /// Checkout request identifier returned by the initiation call.
    pub checkout_request_id: String,
    /// Pre-computed password, always paired with `timestamp`.
    pub password: Option<String>,
    /// Timestamp the password was (or will be) derived from.
    pub timestamp: Option<String>,
    /// Merchant pass key used to derive the password.
    pub pass_key: Option<String>,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl StkPushQueryRequest {
    /// Creates a query for the given checkout request.
    pub fn new(
        business_short_code: impl Into<String>,
        checkout_request_id: impl Into<String>,
    ) -> Self {
        Self {
            business_short_code: business_short_code.into(),
            checkout_request_id: checkout_request_id.into(),
            password: None,
            timestamp: None,
            pass_key: None,
            access_token: None,
        }
    }

    /// Sets the pass key the password is derived from.
    #[must_use]
    pub fn with_pass_key(mut self, pass_key: impl Into<String>) -> Self {
        self.pass_key = Some(pass_key.into());
        self
    }

    /// Pins the timestamp used for password derivation.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Supplies a pre-computed password together with the timestamp it
    /// was derived from.
    #[must_use]
    pub fn with_password(
        mut self,
        password: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        self.password = Some(password.into());
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Overrides the bearer token for this call.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    fn credentials(&self) -> (String, String) {
        match (&self.password, &self.timestamp) {
            (Some(password), timestamp) => (
                password.clone(),
                timestamp.clone().unwrap_or_else(timestamp_now),
            ),
            (None, timestamp) => password_pair(
                &self.business_short_code,
                self.pass_key.as_deref().unwrap_or_default(),
                timestamp.clone(),
            ),
        }
    }
}

#[derive(Serialize)]
struct StkPushPayload<'a> {
    #[serde(rename = "BusinessShortCode")]
    business_short_code: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
    #[serde(rename = "Timestamp")]
    timestamp: &'a str,
    #[serde(rename = "TransactionType")]
    transaction_type: &'a TransactionTypeValue,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "PartyA")]
    party_a: &'a str,
    #[serde(rename = "PartyB")]
    party_b: &'a str,
    #[serde(rename = "PhoneNumber")]
    phone_number: &'a str,
    #[serde(rename = "CallBackURL")]
    call_back_url: &'a str,
    #[serde(rename = "AccountReference")]
    account_reference: &'a str,
    #[serde(rename = "TransactionDesc")]
    transaction_desc: &'a str,
}

#[derive(Serialize)]
struct StkPushQueryPayload<'a> {
    #[serde(rename = "BusinessShortCode")]
    business_short_code: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
    #[serde(rename = "Timestamp")]
    timestamp: &'a str,
    #[serde(rename = "CheckoutRequestID")]
    checkout_request_id: &'a str,
}

/// An accepted payment initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPushResult {
    /// Gateway-assigned merchant request identifier.
    pub merchant_request_id: String,
    /// Identifier used to query the payment's final state.
    pub checkout_request_id: String,
    /// `"0"` when the request was accepted for processing.
    pub response_code: String,
    /// Human-readable acceptance description.
    pub response_description: String,
    /// Message shown to the subscriber.
    pub customer_message: String,
}

impl FromNormalized for StkPushResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            merchant_request_id: normalized.require_str("merchant_request_id")?,
            checkout_request_id: normalized.require_str("checkout_request_id")?,
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
            customer_message: normalized.require_str("customer_message")?,
        })
    }
}

/// The queried state of an initiated payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPushQueryResult {
    /// `"0"` when the query itself was accepted.
    pub response_code: String,
    /// Human-readable query description.
    pub response_description: String,
    /// Gateway-assigned merchant request identifier.
    pub merchant_request_id: String,
    /// Checkout request identifier queried.
    pub checkout_request_id: String,
    /// Final result code of the payment.
    pub result_code: String,
    /// Human-readable payment result.
    pub result_desc: String,
}

impl FromNormalized for StkPushQueryResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
            merchant_request_id: normalized.require_str("merchant_request_id")?,
            checkout_request_id: normalized.require_str("checkout_request_id")?,
            result_code: normalized.require_str("result_code")?,
            result_desc: normalized.require_str("result_desc")?,
        })
    }
}

/// STK push service.
#[derive(Debug, Clone)]
pub struct StkPush {
    conn: Connection,
}

impl StkPush {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Initiates a push payment prompt on the subscriber's handset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn process_request(
        &self,
        request: StkPushRequest,
    ) -> Result<Reply<StkPushResult>, ClientError> {
        let (password, timestamp) = request.credentials();
        let payload = StkPushPayload {
            business_short_code: &request.business_short_code,
            password: &password,
            timestamp: &timestamp,
            transaction_type: &request.transaction_type,
            amount: request.amount,
            party_a: request.party_a.as_deref().unwrap_or(&request.phone_number),
            party_b: request
                .party_b
                .as_deref()
                .unwrap_or(&request.business_short_code),
            phone_number: &request.phone_number,
            call_back_url: &request.call_back_url,
            account_reference: &request.account_reference,
            transaction_desc: &request.transaction_desc,
        };
        self.conn
            .post_operation(
                PATH_STK_PUSH_PROCESS_REQUEST,
                "POST /mpesa/stkpush/v1/processrequest",
                request.access_token.as_deref(),
                &payload,
            )
            .await
    }

    /// Queries the state of a previously initiated payment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn query(
        &self,
        request: StkPushQueryRequest,
    ) -> Result<Reply<StkPushQueryResult>, ClientError> {
        let (password, timestamp) = request.credentials();
        let payload = StkPushQueryPayload {
            business_short_code: &request.business_short_code,
            password: &password,
            timestamp: &timestamp,
            checkout_request_id: &request.checkout_request_id,
        };
        self.conn
            .post_operation(
                PATH_STK_PUSH_QUERY,
                "POST /mpesa/stkpushquery/v1/query",
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
    use daraja::enums::TransactionType;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> StkPush {
        let conn = Connection::new(App::sandbox("key", "secret"))
            .with_access_token("token")
            .with_base_url_override(server.uri());
        StkPush::new(conn)
    }

    fn push_request() -> StkPushRequest {
        StkPushRequest::new(
            "174379",
            1,
            "254708374149",
            "https://mydomain.com/path",
            "Test",
            "Test",
            TransactionType::CustomerPayBillOnline,
        )
        .with_password(
            "MTc0Mzc5YmZiMjc5ZjlhYTliZGJjZjE1OGU5N2RkNzFhNDY3Y2QyZTBjODkzMDU5YjEwZjc4ZTZiNzJhZGExZWQyYzkxOTIwMTYwMjE2MTY1NjI3",
            "20160216165627",
        )
    }

    #[tokio::test]
    async fn process_request_returns_the_typed_success_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .and(header("authorization", "Bearer token"))
            .and(body_partial_json(json!({
                "BusinessShortCode": "174379",
                "Timestamp": "20160216165627",
                "TransactionType": "CustomerPayBillOnline",
                "Amount": 1,
                "PartyA": "254708374149",
                "PartyB": "174379",
                "PhoneNumber": "254708374149",
                "CallBackURL": "https://mydomain.com/path",
                "AccountReference": "Test",
                "TransactionDesc": "Test",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": "ws_CO_191220191020363925",
                "ResponseCode": "0",
                "ResponseDescription": "Success. Request accepted for processing",
                "CustomerMessage": "Success. Request accepted for processing",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = service(&server).process_request(push_request()).await.unwrap();

        assert!(reply.succeeded());
        let result = reply.success().unwrap();
        assert_eq!(result.response_code, "0");
        assert_eq!(result.checkout_request_id, "ws_CO_191220191020363925");
        assert_eq!(result.merchant_request_id, "29115-34620561-1");
    }

    #[tokio::test]
    async fn derives_the_password_from_the_pass_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .and(body_partial_json(json!({
                "Password": "MTc0Mzc5YmZiMjc5ZjlhYTliZGJjZjE1OGU5N2RkNzFhNDY3Y2QyZTBjODkzMDU5YjEwZjc4ZTZiNzJhZGExZWQyYzkxOTIwMTYwMjE2MTY1NjI3",
                "Timestamp": "20160216165627",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MerchantRequestID": "1",
                "CheckoutRequestID": "ws_CO_1",
                "ResponseCode": "0",
                "ResponseDescription": "ok",
                "CustomerMessage": "ok",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = StkPushRequest::new(
            "174379",
            1,
            "254708374149",
            "https://mydomain.com/path",
            "Test",
            "Test",
            TransactionType::CustomerPayBillOnline,
        )
        .with_pass_key("bfb279f9aa9bdbcf158e97dd71a467cd2e0c893059b10f78e6b72ada1ed2c919")
        .with_timestamp("20160216165627");

        let reply = service(&server).process_request(request).await.unwrap();
        assert!(reply.succeeded());
    }

    #[tokio::test]
    async fn query_returns_the_typed_success_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpushquery/v1/query"))
            .and(body_partial_json(json!({
                "BusinessShortCode": "174379",
                "CheckoutRequestID": "ws_CO_13012021093521236557",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ResponseCode": "0",
                "ResponseDescription": "The service request has been accepted successfully",
                "MerchantRequestID": "22205-34066-1",
                "CheckoutRequestID": "ws_CO_13012021093521236557",
                "ResultCode": "0",
                "ResultDesc": "The service request is processed successfully.",
            })))
            .mount(&server)
            .await;

        let request = StkPushQueryRequest::new("174379", "ws_CO_13012021093521236557")
            .with_password("cGFzc3dvcmQ=", "20160216165627");
        let reply = service(&server).query(request).await.unwrap();

        assert!(reply.succeeded());
        let result = reply.success().unwrap();
        assert_eq!(result.result_code, "0");
        assert_eq!(result.checkout_request_id, "ws_CO_13012021093521236557");
    }

    #[tokio::test]
    async fn gateway_rejection_is_a_failure_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "requestId": "11728-2929992-1",
                "errorCode": "500.001.1001",
                "errorMessage": "Server busy, please try again later",
            })))
            .mount(&server)
            .await;

        let reply = service(&server).process_request(push_request()).await.unwrap();

        assert!(!reply.succeeded());
        let failure = reply.failure().unwrap();
        assert_eq!(failure.request_id.as_deref(), Some("11728-2929992-1"));
        assert_eq!(failure.error_code.as_deref(), Some("500.001.1001"));
        assert_eq!(
            failure.error_message.as_deref(),
            Some("Server busy, please try again later")
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error_regardless_of_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = service(&server)
            .process_request(push_request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Normalize { source: NormalizeError::Parse(_), .. }
        ));
    }

    #[tokio::test]
    async fn missing_declared_field_is_a_contract_error() {
        let server = MockServer::start().await;
        // CustomerMessage dropped from an otherwise well-formed response.
        Mock::given(method("POST"))
            .and(path("/mpesa/stkpush/v1/processrequest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": "ws_CO_191220191020363925",
                "ResponseCode": "0",
                "ResponseDescription": "Success",
            })))
            .mount(&server)
            .await;

        let err = service(&server)
            .process_request(push_request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Normalize {
                source: NormalizeError::MissingField { field: "customer_message" },
                ..
            }
        ));
    }
}
