use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

pub mod chapa_client;
#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

pub use chapa_client::ChapaClient;
#[cfg(any(test, feature = "test-utils"))]
pub use fake::{FakeGateway, FakeOutcome};

/// Currency every payment is charged in.
pub const CURRENCY: &str = "ETB";

/// What we ask the gateway to charge.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiateRequest {
    pub amount: Decimal,
    pub email: Option<String>,
    /// Our transaction id, echoed back by the gateway on verification.
    pub tx_ref: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChapaData {
    pub checkout_url: Option<String>,
}

/// Typed view over a gateway response body. The untouched payload is kept
/// in `raw` so it can be handed back to the caller on rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapaResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub data: Option<ChapaData>,
    pub raw: Value,
}

impl ChapaResponse {
    /// Parses a response body; anything that is not JSON is reported with
    /// its raw text.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text)
            .map_err(|_| AppError::GatewayUnavailable(text.to_string()))?;
        Ok(Self::from_value(raw))
    }

    pub fn from_value(raw: Value) -> Self {
        let status = raw.get("status").and_then(Value::as_str).map(str::to_string);
        let message = raw.get("message").and_then(Value::as_str).map(str::to_string);
        let data = raw
            .get("data")
            .filter(|d| d.is_object())
            .and_then(|d| serde_json::from_value::<ChapaData>(d.clone()).ok());

        Self { status, message, data, raw }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    pub fn checkout_url(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.checkout_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub http_status: u16,
    pub response: ChapaResponse,
}

impl GatewayReply {
    /// Both the transport and the gateway's own status must say success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status) && self.response.is_success()
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &str;
    async fn initiate(&self, request: &InitiateRequest) -> Result<GatewayReply>;
    async fn verify(&self, tx_ref: &str) -> Result<GatewayReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_with_checkout_url() {
        let body = r#"{"message":"Hosted Link","status":"success","data":{"checkout_url":"https://checkout.chapa.co/checkout/payment/abc"}}"#;
        let resp = ChapaResponse::parse(body).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.checkout_url(), Some("https://checkout.chapa.co/checkout/payment/abc"));
        assert_eq!(resp.message.as_deref(), Some("Hosted Link"));
    }

    #[test]
    fn test_parse_failure_keeps_raw_payload() {
        let payload = json!({
            "message": {"email": ["validation.email"]},
            "status": "failed",
            "data": null,
        });
        let resp = ChapaResponse::parse(&payload.to_string()).unwrap();
        assert!(!resp.is_success());
        assert!(resp.message.is_none());
        assert!(resp.checkout_url().is_none());
        assert_eq!(resp.raw, payload);
    }

    #[test]
    fn test_parse_non_json() {
        match ChapaResponse::parse("<html>502 Bad Gateway</html>") {
            Err(AppError::GatewayUnavailable(raw)) => assert_eq!(raw, "<html>502 Bad Gateway</html>"),
            other => panic!("expected GatewayUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_needs_http_success() {
        let response = ChapaResponse::from_value(json!({"status": "success"}));
        let ok = GatewayReply { http_status: 200, response: response.clone() };
        let bad = GatewayReply { http_status: 401, response };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
