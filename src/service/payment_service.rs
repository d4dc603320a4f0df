use std::sync::Arc;
use rust_decimal::Decimal;
use crate::{
    domain::*,
    error::{AppError, Result},
    payments::{InitiateRequest, PaymentGateway},
    repository::PaymentRepository,
};

#[derive(Debug, Clone)]
pub struct InitiatePayment {
    pub booking_reference: String,
    pub amount: Decimal,
    pub email: Option<String>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone)]
pub struct InitiatedPayment {
    pub payment: Payment,
    pub checkout_url: String,
}

/// Drives a payment from initiation to its terminal status.
///
/// Status moves `pending -> completed` or `pending -> failed` and nothing
/// leaves a terminal status.
pub struct PaymentService {
    repo: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(
        repo: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self { repo, gateway }
    }

    /// Records a pending payment, then asks the gateway for a checkout link.
    ///
    /// The record is written before the gateway is contacted. A rejected or
    /// unparsable gateway answer marks it failed. A transport error leaves it
    /// pending so a later verification can still settle it.
    pub async fn initiate(&self, request: InitiatePayment) -> Result<InitiatedPayment> {
        let payment = self.repo.create(Payment::new_pending(
            request.booking_reference,
            request.amount,
            request.payment_method,
            request.email,
        )).await?;

        tracing::info!(
            "Created pending payment {} for booking {}",
            payment.transaction_id,
            payment.booking_reference
        );

        let gateway_request = InitiateRequest {
            amount: payment.amount,
            email: payment.email.clone(),
            tx_ref: payment.transaction_id.clone(),
        };

        let reply = match self.gateway.initiate(&gateway_request).await {
            Ok(reply) => reply,
            Err(e @ AppError::GatewayUnavailable(_)) => {
                self.repo.update_status(&payment.transaction_id, PaymentStatus::Failed).await?;
                tracing::warn!("Gateway {} sent an unparsable reply for {}", self.gateway.name(), payment.transaction_id);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Gateway {} unreachable for {}: {}", self.gateway.name(), payment.transaction_id, e);
                return Err(e);
            }
        };

        if reply.is_success() {
            if let Some(url) = reply.response.checkout_url() {
                return Ok(InitiatedPayment {
                    checkout_url: url.to_string(),
                    payment,
                });
            }
        }

        self.repo.update_status(&payment.transaction_id, PaymentStatus::Failed).await?;
        tracing::warn!(
            "Gateway {} rejected payment {} (HTTP {})",
            self.gateway.name(),
            payment.transaction_id,
            reply.http_status
        );

        Err(AppError::GatewayRejected(reply.response.raw))
    }

    /// Asks the gateway whether a pending payment went through and records
    /// the answer. Terminal payments are returned unchanged without a
    /// gateway call.
    pub async fn verify(&self, transaction_id: &str) -> Result<Payment> {
        let payment = self.repo.find_by_transaction_id(transaction_id).await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status.is_terminal() {
            tracing::debug!(
                "Payment {} already {}, skipping gateway",
                transaction_id,
                payment.status.as_str()
            );
            return Ok(payment);
        }

        let reply = self.gateway.verify(transaction_id).await?;

        let status = if reply.is_success() {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        };

        let updated = self.repo.update_status(transaction_id, status).await?;
        tracing::info!("Payment {} verified as {}", transaction_id, status.as_str());

        Ok(updated)
    }

    pub async fn get(&self, transaction_id: &str) -> Result<Payment> {
        self.repo.find_by_transaction_id(transaction_id).await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }
}
