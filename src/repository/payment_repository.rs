use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{SqlitePool, FromRow};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    domain::{Payment, PaymentStatus, PaymentMethod},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    transaction_id: String,
    booking_reference: String,
    amount: String,
    payment_method: String,
    status: String,
    email: Option<String>,
    payment_date: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            transaction_id: row.transaction_id,
            booking_reference: row.booking_reference,
            amount: Decimal::from_str(&row.amount).map_err(|e| AppError::Database(e.to_string()))?,
            payment_method: PaymentMethod::from_str(&row.payment_method).ok_or_else(|| {
                AppError::Database(format!("Invalid payment method: {}", row.payment_method))
            })?,
            status: PaymentStatus::from_str(&row.status).ok_or_else(|| {
                AppError::Database(format!("Invalid payment status: {}", row.status))
            })?,
            email: row.email,
            payment_date: DateTime::from_naive_utc_and_offset(row.payment_date, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, transaction_id, booking_reference, amount,
                payment_method, status, email, payment_date, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(payment.id.to_string())
        .bind(&payment.transaction_id)
        .bind(&payment.booking_reference)
        .bind(payment.amount.to_string())
        .bind(payment.payment_method.as_str())
        .bind(payment.status.as_str())
        .bind(&payment.email)
        .bind(payment.payment_date.naive_utc())
        .bind(payment.updated_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_transaction_id(&payment.transaction_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, transaction_id, booking_reference, amount,
                   payment_method, status, email, payment_date, updated_at
            FROM payments
            WHERE transaction_id = ?
            "#
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn update_status(&self, transaction_id: &str, status: PaymentStatus) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?,
                updated_at = ?
            WHERE transaction_id = ?
            "#
        )
        .bind(status.as_str())
        .bind(now)
        .bind(transaction_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        self.find_by_transaction_id(transaction_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated payment".to_string())
        })
    }
}
