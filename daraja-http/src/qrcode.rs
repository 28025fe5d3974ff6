//! Dynamic QR code generation.

use daraja::endpoints::PATH_QRCODE_GENERATE;
use daraja::enums::TrxCodeValue;
use daraja::error::NormalizeError;
use daraja::normalize::Normalized;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::outcome::{FromNormalized, Reply};

/// Inputs for [`QrCode::generate`].
#[derive(Debug, Clone)]
pub struct QrCodeRequest {
    /// Merchant name shown in the scanning app.
    pub merchant_name: String,
    /// Transaction reference.
    pub ref_no: String,
    /// Amount in whole currency units.
    pub amount: u64,
    /// Transaction code selecting the payment kind.
    pub trx_code: TrxCodeValue,
    /// Credit party identifier.
    pub cpi: String,
    /// Image size in pixels.
    pub size: u32,
    /// Per-call bearer token override.
    pub access_token: Option<String>,
}

impl QrCodeRequest {
    /// Creates a QR generation request.
    pub fn new(
        merchant_name: impl Into<String>,
        ref_no: impl Into<String>,
        amount: u64,
        trx_code: impl Into<TrxCodeValue>,
        cpi: impl Into<String>,
        size: u32,
    ) -> Self {
        Self {
            merchant_name: merchant_name.into(),
            ref_no: ref_no.into(),
            amount,
            trx_code: trx_code.into(),
            cpi: cpi.into(),
            size,
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

#[derive(Serialize)]
struct QrCodePayload<'a> {
    #[serde(rename = "MerchantName")]
    merchant_name: &'a str,
    #[serde(rename = "RefNo")]
    ref_no: &'a str,
    #[serde(rename = "Amount")]
    amount: u64,
    #[serde(rename = "TrxCode")]
    trx_code: &'a TrxCodeValue,
    #[serde(rename = "CPI")]
    cpi: &'a str,
    #[serde(rename = "Size")]
    size: u32,
}

/// A generated QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCodeResult {
    /// `"00"` when generation succeeded.
    pub response_code: String,
    /// Human-readable description.
    pub response_description: String,
    /// Base64-encoded QR image.
    pub qr_code: String,
}

impl FromNormalized for QrCodeResult {
    fn from_normalized(normalized: &Normalized) -> Result<Self, NormalizeError> {
        Ok(Self {
            response_code: normalized.require_str("response_code")?,
            response_description: normalized.require_str("response_description")?,
            qr_code: normalized.require_str("qr_code")?,
        })
    }
}

/// QR code service.
#[derive(Debug, Clone)]
pub struct QrCode {
    conn: Connection,
}

impl QrCode {
    /// Creates the service over a connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Generates a dynamic payment QR code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or an unparseable
    /// response body.
    pub async fn generate(&self, request: QrCodeRequest) -> Result<Reply<QrCodeResult>, ClientError> {
        let payload = QrCodePayload {
            merchant_name: &request.merchant_name,
            ref_no: &request.ref_no,
            amount: request.amount,
            trx_code: &request.trx_code,
            cpi: &request.cpi,
            size: request.size,
        };
        self.conn
            .post_operation(
                PATH_QRCODE_GENERATE,
                "POST /mpesa/qrcode/v1/generate",
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
    use daraja::enums::TrxCode;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> QrCode {
        let conn = Connection::new(App::sandbox("key", "secret"))
            .with_access_token("token")
            .with_base_url_override(server.uri());
        QrCode::new(conn)
    }

    #[tokio::test]
    async fn generate_returns_the_typed_success_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mpesa/qrcode/v1/generate"))
            .and(body_partial_json(json!({
                "MerchantName": "Test",
                "RefNo": "Test",
                "Amount": 1,
                "TrxCode": "BG",
                "CPI": "373132",
                "Size": 300,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ResponseCode": "00",
                "ResponseDescription": "QR Code Successfully Generated.",
                "QRCode": "iVBORw0KGgoAAAANSUhEUgAA",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = QrCodeRequest::new("Test", "Test", 1, TrxCode::Bg, "373132", 300);
        let reply = service(&server).generate(request).await.unwrap();

        assert!(reply.succeeded());
        let result = reply.success().unwrap();
        assert_eq!(result.response_code, "00");
        assert_eq!(result.qr_code, "iVBORw0KGgoAAAANSUhEUgAA");
    }
}
