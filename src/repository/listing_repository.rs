use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{SqlitePool, FromRow};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    domain::{Listing, CreateListingRequest, UpdateListingRequest},
    error::{AppError, Result},
    repository::ListingRepository,
};

#[derive(FromRow)]
struct ListingRow {
    id: String,
    name: String,
    description: String,
    location: String,
    price_per_night: String,
    host_id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteListingRepository {
    pool: SqlitePool,
}

impl SqliteListingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_listing(row: ListingRow) -> Result<Listing> {
        Ok(Listing {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            description: row.description,
            location: row.location,
            price_per_night: Decimal::from_str(&row.price_per_night)
                .map_err(|e| AppError::Database(e.to_string()))?,
            host_id: Uuid::parse_str(&row.host_id).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ListingRepository for SqliteListingRepository {
    async fn create(&self, request: CreateListingRequest) -> Result<Listing> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO listings (
                id, name, description, location, price_per_night,
                host_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.price_per_night.to_string())
        .bind(request.host_id.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created listing".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, name, description, location, price_per_night,
                   host_id, created_at, updated_at
            FROM listings
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_listing).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Listing>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, name, description, location, price_per_night,
                   host_id, created_at, updated_at
            FROM listings
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
            .map(Self::row_to_listing)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateListingRequest) -> Result<Listing> {
        if self.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("Listing not found".to_string()));
        }

        let now = Utc::now().naive_utc();
        let price = update.price_per_night.map(|p| p.to_string());

        sqlx::query(
            r#"
            UPDATE listings
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                location = COALESCE(?, location),
                price_per_night = COALESCE(?, price_per_night),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.location)
        .bind(price)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated listing".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Bookings and reviews go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Listing not found".to_string()));
        }

        Ok(())
    }
}
