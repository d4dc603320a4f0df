use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::Serialize;
use std::time::Duration;

use crate::{
    config::ChapaConfig,
    error::{AppError, Result},
    payments::{ChapaResponse, GatewayReply, InitiateRequest, PaymentGateway, CURRENCY},
};

#[derive(Debug, Serialize)]
struct InitializePayload<'a> {
    amount: String,
    currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    tx_ref: &'a str,
    return_url: &'a str,
    callback_url: &'a str,
}

/// Client for the Chapa hosted-checkout API.
pub struct ChapaClient {
    http: Client,
    config: ChapaConfig,
}

impl ChapaClient {
    pub fn new(config: ChapaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Bearer authorization for the configured secret key, plus an optional
    /// content type.
    pub fn build_headers(&self, content_type: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.config.secret_key))
            .map_err(|_| AppError::Internal("Chapa secret key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        if let Some(ct) = content_type {
            let value = HeaderValue::from_str(ct)
                .map_err(|_| AppError::Internal(format!("Invalid content type: {}", ct)))?;
            headers.insert(CONTENT_TYPE, value);
        }

        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn read_reply(response: reqwest::Response) -> Result<GatewayReply> {
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::External(format!("Failed to read Chapa response: {}", e)))?;

        tracing::debug!("Chapa responded with HTTP {}", http_status);

        Ok(GatewayReply {
            http_status,
            response: ChapaResponse::parse(&text)?,
        })
    }
}

#[async_trait]
impl PaymentGateway for ChapaClient {
    fn name(&self) -> &str {
        "chapa"
    }

    async fn initiate(&self, request: &InitiateRequest) -> Result<GatewayReply> {
        let payload = InitializePayload {
            amount: request.amount.to_string(),
            currency: CURRENCY,
            email: request.email.as_deref(),
            tx_ref: &request.tx_ref,
            return_url: &self.config.return_url,
            callback_url: &self.config.callback_url,
        };

        let response = self
            .http
            .post(self.url("transaction/initialize"))
            .headers(self.build_headers(Some("application/json"))?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Chapa initialize request failed: {}", e)))?;

        Self::read_reply(response).await
    }

    async fn verify(&self, tx_ref: &str) -> Result<GatewayReply> {
        let response = self
            .http
            .get(self.url(&format!("transaction/verify/{}", tx_ref)))
            .headers(self.build_headers(None)?)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Chapa verify request failed: {}", e)))?;

        Self::read_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(secret: &str) -> ChapaClient {
        ChapaClient::new(ChapaConfig {
            secret_key: secret.to_string(),
            base_url: "https://api.chapa.co/v1/".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_headers() {
        let c = client("CHASECK_TEST-secret");

        let headers = c.build_headers(None).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer CHASECK_TEST-secret");
        assert!(headers.get(CONTENT_TYPE).is_none());

        let headers = c.build_headers(Some("application/json")).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_rejects_secret_with_newline() {
        assert!(client("bad\nsecret").build_headers(None).is_err());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let c = client("k");
        assert_eq!(c.url("transaction/initialize"), "https://api.chapa.co/v1/transaction/initialize");
    }

    #[test]
    fn test_initialize_payload_shape() {
        let payload = InitializePayload {
            amount: "250.50".to_string(),
            currency: CURRENCY,
            email: None,
            tx_ref: "tx-1",
            return_url: "http://localhost/return",
            callback_url: "http://localhost/callback",
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["currency"], "ETB");
        assert_eq!(value["amount"], "250.50");
        assert!(value.get("email").is_none());
    }

    mod wire {
        use super::*;
        use axum::{
            extract::Path,
            http::{HeaderMap, StatusCode},
            response::IntoResponse,
            routing::{get, post},
            Json, Router,
        };
        use rust_decimal::Decimal;
        use serde_json::{json, Value};

        async fn initialize(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
            let auth = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            // Claims success in the body but fails at the HTTP level
            (StatusCode::UNAUTHORIZED, Json(json!({
                "status": "success",
                "message": "Invalid API Key",
                "auth": auth,
                "received": body,
            })))
        }

        async fn verify(Path(tx_ref): Path<String>) -> axum::response::Response {
            if tx_ref == "garbled" {
                return "<html>oops</html>".into_response();
            }
            Json(json!({
                "status": "success",
                "message": "Payment details",
                "data": { "tx_ref": tx_ref, "status": "success" },
            }))
            .into_response()
        }

        async fn spawn_gateway() -> String {
            let app = Router::new()
                .route("/v1/transaction/initialize", post(initialize))
                .route("/v1/transaction/verify/:tx_ref", get(verify));

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            format!("http://{}/v1", addr)
        }

        fn client_for(base_url: String) -> ChapaClient {
            ChapaClient::new(ChapaConfig {
                base_url,
                secret_key: "sk".to_string(),
                return_url: "http://localhost/return".to_string(),
                callback_url: "http://localhost/callback".to_string(),
                timeout_secs: 5,
            })
            .unwrap()
        }

        #[tokio::test]
        async fn test_initiate_sends_authorized_request() {
            let client = client_for(spawn_gateway().await);

            let reply = client
                .initiate(&InitiateRequest {
                    amount: Decimal::new(1250, 2),
                    email: Some("guest@example.com".to_string()),
                    tx_ref: "tx1".to_string(),
                })
                .await
                .unwrap();

            assert_eq!(reply.http_status, 401);
            assert!(reply.response.is_success());
            assert!(!reply.is_success());

            assert_eq!(reply.response.raw["auth"], "Bearer sk");
            let sent = &reply.response.raw["received"];
            assert_eq!(sent["amount"], "12.50");
            assert_eq!(sent["currency"], "ETB");
            assert_eq!(sent["email"], "guest@example.com");
            assert_eq!(sent["tx_ref"], "tx1");
            assert_eq!(sent["return_url"], "http://localhost/return");
            assert_eq!(sent["callback_url"], "http://localhost/callback");
        }

        #[tokio::test]
        async fn test_verify_parses_reply() {
            let client = client_for(spawn_gateway().await);

            let reply = client.verify("tx1").await.unwrap();
            assert_eq!(reply.http_status, 200);
            assert!(reply.is_success());
            assert_eq!(reply.response.raw["data"]["tx_ref"], "tx1");

            match client.verify("garbled").await {
                Err(AppError::GatewayUnavailable(raw)) => assert_eq!(raw, "<html>oops</html>"),
                other => panic!("expected GatewayUnavailable, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_unreachable_gateway_is_external_error() {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let client = client_for(format!("http://{}/v1", addr));
            assert!(matches!(client.verify("tx1").await, Err(AppError::External(_))));
        }
    }
}
