use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{handlers::json_body, state::AppState},
    domain::{Payment, PaymentMethod, PaymentStatus},
    error::{AppError, Result},
    service::InitiatePayment,
};

#[derive(Debug, Deserialize, Validate)]
pub struct InitiatePaymentDto {
    booking_reference: Option<String>,
    amount: Option<Decimal>,
    #[validate(email)]
    email: Option<String>,
    payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    payment_url: String,
    transaction_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    transaction_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    message: String,
    status: PaymentStatus,
}

impl InitiatePaymentDto {
    fn into_request(self) -> Result<InitiatePayment> {
        self.validate()?;

        let booking_reference = self.booking_reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::Validation("booking_reference is required".to_string()))?;

        let amount = self.amount
            .ok_or_else(|| AppError::Validation("amount is required".to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("amount must be greater than zero".to_string()));
        }

        Ok(InitiatePayment {
            booking_reference,
            amount,
            email: self.email,
            payment_method: self.payment_method.unwrap_or_default(),
        })
    }
}

/// `POST /payments/`: create a pending payment and return the gateway's
/// checkout link.
pub async fn initiate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<InitiatePaymentDto>, JsonRejection>,
) -> Result<Json<InitiatePaymentResponse>> {
    let request = json_body(payload)?.into_request()?;

    let initiated = state.service_context.payment_service
        .initiate(request)
        .await?;

    Ok(Json(InitiatePaymentResponse {
        payment_url: initiated.checkout_url,
        transaction_id: initiated.payment.transaction_id,
    }))
}

/// `GET /payments/?transaction_id=...`: settle a payment against the gateway.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<(StatusCode, Json<VerifyResponse>)> {
    let transaction_id = params.transaction_id
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("transaction_id is required".to_string()))?;

    let payment = state.service_context.payment_service
        .verify(&transaction_id)
        .await?;

    let (code, message) = match payment.status {
        PaymentStatus::Completed => (StatusCode::OK, "Payment verified successfully"),
        _ => (StatusCode::BAD_REQUEST, "Payment verification failed"),
    };

    Ok((code, Json(VerifyResponse {
        message: message.to_string(),
        status: payment.status,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Payment>> {
    let payment = state.service_context.payment_service
        .get(&transaction_id)
        .await?;

    Ok(Json(payment))
}
