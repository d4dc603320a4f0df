use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Review, CreateReviewRequest, UpdateReviewRequest},
    error::{AppError, Result},
    repository::ReviewRepository,
};

#[derive(FromRow)]
struct ReviewRow {
    id: String,
    listing_id: String,
    user_id: String,
    rating: i32,
    comment: String,
    created_at: NaiveDateTime,
}

pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_review(row: ReviewRow) -> Result<Review> {
        Ok(Review {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            listing_id: Uuid::parse_str(&row.listing_id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id).map_err(|e| AppError::Database(e.to_string()))?,
            rating: row.rating,
            comment: row.comment,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn create(&self, request: CreateReviewRequest) -> Result<Review> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO reviews (id, listing_id, user_id, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(request.listing_id.to_string())
        .bind(request.user_id.to_string())
        .bind(request.rating)
        .bind(&request.comment)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created review".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, listing_id, user_id, rating, comment, created_at FROM reviews WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_review).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, listing_id, user_id, rating, comment, created_at
            FROM reviews
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
            .map(Self::row_to_review)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateReviewRequest) -> Result<Review> {
        if self.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("Review not found".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE reviews
            SET rating = COALESCE(?, rating),
                comment = COALESCE(?, comment)
            WHERE id = ?
            "#
        )
        .bind(update.rating)
        .bind(&update.comment)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated review".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Review not found".to_string()));
        }

        Ok(())
    }
}
