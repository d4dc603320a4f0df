use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{SqlitePool, FromRow};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    domain::{Booking, BookingStatus, CreateBookingRequest, UpdateBookingRequest},
    error::{AppError, Result},
    repository::BookingRepository,
};

#[derive(FromRow)]
struct BookingRow {
    id: String,
    listing_id: String,
    guest_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_price: String,
    status: String,
    created_at: NaiveDateTime,
}

pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_booking(row: BookingRow) -> Result<Booking> {
        Ok(Booking {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            listing_id: Uuid::parse_str(&row.listing_id).map_err(|e| AppError::Database(e.to_string()))?,
            guest_id: Uuid::parse_str(&row.guest_id).map_err(|e| AppError::Database(e.to_string()))?,
            start_date: row.start_date,
            end_date: row.end_date,
            total_price: Decimal::from_str(&row.total_price)
                .map_err(|e| AppError::Database(e.to_string()))?,
            status: BookingStatus::from_str(&row.status).ok_or_else(|| {
                AppError::Database(format!("Invalid booking status: {}", row.status))
            })?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create(&self, request: CreateBookingRequest) -> Result<Booking> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, listing_id, guest_id, start_date, end_date,
                total_price, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(request.listing_id.to_string())
        .bind(request.guest_id.to_string())
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.total_price.to_string())
        .bind(BookingStatus::Pending.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created booking".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, listing_id, guest_id, start_date, end_date,
                   total_price, status, created_at
            FROM bookings
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, listing_id, guest_id, start_date, end_date,
                   total_price, status, created_at
            FROM bookings
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_booking)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateBookingRequest) -> Result<Booking> {
        let existing = self.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        let start_date = update.start_date.unwrap_or(existing.start_date);
        let end_date = update.end_date.unwrap_or(existing.end_date);
        if end_date < start_date {
            return Err(AppError::Validation("end_date must not be before start_date".to_string()));
        }

        let total_price = update.total_price.unwrap_or(existing.total_price);
        let status = update.status.unwrap_or(existing.status);

        sqlx::query(
            r#"
            UPDATE bookings
            SET start_date = ?,
                end_date = ?,
                total_price = ?,
                status = ?
            WHERE id = ?
            "#
        )
        .bind(start_date)
        .bind(end_date)
        .bind(total_price.to_string())
        .bind(status.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated booking".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking not found".to_string()));
        }

        Ok(())
    }
}
