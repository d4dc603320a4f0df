pub mod root;
pub mod payments;
pub mod listings;
pub mod bookings;
pub mod reviews;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

impl ListParams {
    /// SQLite reads a negative LIMIT as "no limit", so keep it in range.
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}

const MAX_LIMIT: i64 = 100;

fn default_limit() -> i64 {
    50
}

/// Turns axum's JSON rejection into our 400 body.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub(crate) fn path_id<T>(path: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    path
        .map(|Path(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_are_bounded() {
        let params: ListParams = serde_json::from_value(serde_json::json!({
            "limit": -1,
            "offset": -5,
        }))
        .unwrap();
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);

        let params: ListParams = serde_json::from_value(serde_json::json!({ "limit": 10_000 })).unwrap();
        assert_eq!(params.limit(), MAX_LIMIT);

        let params: ListParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.limit(), 50);
    }
}
