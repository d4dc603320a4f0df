use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub listing_id: Uuid,
    pub user_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 500))]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let mut req = CreateReviewRequest {
            listing_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            rating: 5,
            comment: "Lovely view".to_string(),
        };
        assert!(req.validate().is_ok());

        req.rating = 0;
        assert!(req.validate().is_err());

        req.rating = 6;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_comment_length() {
        let update = UpdateReviewRequest {
            comment: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
