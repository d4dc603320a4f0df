use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

use crate::{
    error::{AppError, Result},
    payments::{ChapaResponse, GatewayReply, InitiateRequest, PaymentGateway},
};

/// How the fake gateway answers the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeOutcome {
    Success,
    /// HTTP 200 but `status: "failed"` in the body.
    Rejected,
    /// Non-2xx with a JSON body claiming success.
    HttpError(u16),
    /// Body is not JSON.
    Malformed,
    /// Connection never completes.
    Unreachable,
}

/// In-memory stand-in for the gateway, for tests.
pub struct FakeGateway {
    initiate_outcome: Mutex<FakeOutcome>,
    verify_outcome: Mutex<FakeOutcome>,
    initiated: Mutex<Vec<InitiateRequest>>,
    verified: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new(initiate: FakeOutcome, verify: FakeOutcome) -> Self {
        Self {
            initiate_outcome: Mutex::new(initiate),
            verify_outcome: Mutex::new(verify),
            initiated: Mutex::new(Vec::new()),
            verified: Mutex::new(Vec::new()),
        }
    }

    pub fn set_verify_outcome(&self, outcome: FakeOutcome) {
        *self.verify_outcome.lock().unwrap() = outcome;
    }

    pub fn initiated(&self) -> Vec<InitiateRequest> {
        self.initiated.lock().unwrap().clone()
    }

    pub fn verified(&self) -> Vec<String> {
        self.verified.lock().unwrap().clone()
    }

    pub fn checkout_url(tx_ref: &str) -> String {
        format!("https://checkout.example.test/pay/{}", tx_ref)
    }

    fn reply(outcome: FakeOutcome, success_body: serde_json::Value) -> Result<GatewayReply> {
        match outcome {
            FakeOutcome::Success => Ok(GatewayReply {
                http_status: 200,
                response: ChapaResponse::from_value(success_body),
            }),
            FakeOutcome::Rejected => Ok(GatewayReply {
                http_status: 200,
                response: ChapaResponse::from_value(json!({
                    "message": "Payment not paid yet",
                    "status": "failed",
                    "data": null,
                })),
            }),
            FakeOutcome::HttpError(code) => Ok(GatewayReply {
                http_status: code,
                response: ChapaResponse::from_value(json!({
                    "message": "Authorization required",
                    "status": "success",
                    "data": null,
                })),
            }),
            FakeOutcome::Malformed => ChapaResponse::parse("<html>upstream error</html>")
                .map(|response| GatewayReply { http_status: 502, response }),
            FakeOutcome::Unreachable => {
                Err(AppError::External("Chapa request failed: connection refused".to_string()))
            }
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn name(&self) -> &str {
        "fake"
    }

    async fn initiate(&self, request: &InitiateRequest) -> Result<GatewayReply> {
        self.initiated.lock().unwrap().push(request.clone());
        let outcome = *self.initiate_outcome.lock().unwrap();
        Self::reply(outcome, json!({
            "message": "Hosted Link",
            "status": "success",
            "data": { "checkout_url": Self::checkout_url(&request.tx_ref) },
        }))
    }

    async fn verify(&self, tx_ref: &str) -> Result<GatewayReply> {
        self.verified.lock().unwrap().push(tx_ref.to_string());
        let outcome = *self.verify_outcome.lock().unwrap();
        Self::reply(outcome, json!({
            "message": "Payment details",
            "status": "success",
            "data": { "tx_ref": tx_ref, "status": "success", "currency": "ETB" },
        }))
    }
}
