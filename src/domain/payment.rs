use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per payment attempt against the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    /// Our reference, sent to the gateway as `tx_ref`.
    pub transaction_id: String,
    pub booking_reference: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub email: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// A fresh pending attempt with a newly generated transaction id.
    pub fn new_pending(
        booking_reference: String,
        amount: Decimal,
        payment_method: PaymentMethod,
        email: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transaction_id: Uuid::new_v4().to_string(),
            booking_reference,
            amount,
            payment_method,
            status: PaymentStatus::Pending,
            email,
            payment_date: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// Completed and failed payments never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    Stripe,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Stripe => "stripe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "paypal" => Some(PaymentMethod::Paypal),
            "stripe" => Some(PaymentMethod::Stripe),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_pending_payment() {
        let amount = Decimal::from_str("1500.00").unwrap();
        let a = Payment::new_pending("BK-1".into(), amount, PaymentMethod::Paypal, None);
        let b = Payment::new_pending("BK-1".into(), amount, PaymentMethod::Paypal, None);

        assert_eq!(a.status, PaymentStatus::Pending);
        assert_ne!(a.transaction_id, b.transaction_id);
        assert_eq!(a.payment_date, a.updated_at);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(PaymentStatus::Completed.as_str(), "completed");
        assert_eq!(PaymentStatus::from_str("failed"), Some(PaymentStatus::Failed));
        assert_eq!(PaymentStatus::from_str("Failed"), None);
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
    }

    #[test]
    fn test_method_serde_matches_storage() {
        let json = serde_json::to_string(&PaymentMethod::CreditCard).unwrap();
        assert_eq!(json, "\"credit_card\"");
        assert_eq!(PaymentMethod::from_str("credit_card"), Some(PaymentMethod::CreditCard));
    }
}
