use crate::storage::{SubscriptionStore, TotalFilter, YearMonth};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: SubscriptionStore,
}

/// Request to create a subscription
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_date: String,
    #[schema(example = "12-2025")]
    pub end_date: Option<String>,
}

/// Request to replace the mutable fields of a subscription
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    #[schema(example = "07-2025")]
    pub start_date: String,
    #[schema(example = "12-2025")]
    pub end_date: Option<String>,
}

/// Response after creating a subscription
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSubscriptionResponse {
    pub id: Uuid,
}

/// Query parameters of the total endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalQuery {
    /// Owner id (UUID)
    pub user_id: Option<String>,
    /// Exact service name
    pub service_name: Option<String>,
    /// Lower bound on start month, MM-YYYY
    pub start_date: Option<String>,
}

/// Sum of prices
#[derive(Debug, Serialize, ToSchema)]
pub struct TotalResponse {
    pub total: i64,
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

fn parse_period(start: &str, end: Option<&str>) -> Result<(YearMonth, Option<YearMonth>), String> {
    let start_date: YearMonth = start
        .parse()
        .map_err(|_| "invalid start date".to_string())?;
    let end_date = end
        .map(str::parse::<YearMonth>)
        .transpose()
        .map_err(|_| "invalid end date".to_string())?;
    Ok((start_date, end_date))
}

impl CreateSubscriptionRequest {
    /// Validate the request and return its parsed months
    pub fn validate(&self) -> Result<(YearMonth, Option<YearMonth>), String> {
        parse_period(&self.start_date, self.end_date.as_deref())
    }
}

impl UpdateSubscriptionRequest {
    /// Validate the request and return its parsed months
    pub fn validate(&self) -> Result<(YearMonth, Option<YearMonth>), String> {
        parse_period(&self.start_date, self.end_date.as_deref())
    }
}

impl TotalQuery {
    /// Keeps the first value of each known key; repeats and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "user_id" => &mut query.user_id,
                "service_name" => &mut query.service_name,
                "start_date" => &mut query.start_date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Empty parameters are treated as absent.
    pub fn into_filter(self) -> Result<TotalFilter, String> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        let user_id = present(self.user_id)
            .map(|raw| raw.parse::<Uuid>())
            .transpose()
            .map_err(|_| "invalid user_id format".to_string())?;
        let start_from = present(self.start_date)
            .map(|raw| raw.parse::<YearMonth>())
            .transpose()
            .map_err(|_| "invalid start_date format".to_string())?;

        Ok(TotalFilter {
            user_id,
            service_name: present(self.service_name),
            start_from,
        })
    }
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Logs `cause` and keeps only the generic `message` for the client.
    pub fn internal(message: &str, cause: impl Display) -> Self {
        error!(error = %cause, "{}", message);
        AppError::Internal(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Internal(msg) => msg,
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message,
        }))
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(start: &str, end: Option<&str>) -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            service_name: "Spotify".to_string(),
            price: 299,
            user_id: Uuid::new_v4(),
            start_date: start.to_string(),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn create_request_accepts_open_ended_period() {
        let (start, end) = create_request("07-2025", None).validate().unwrap();
        assert_eq!(start.to_string(), "07-2025");
        assert!(end.is_none());
    }

    #[test]
    fn create_request_names_the_bad_field() {
        assert_eq!(
            create_request("13-2025", None).validate().unwrap_err(),
            "invalid start date"
        );
        assert_eq!(
            create_request("07-2025", Some("2025-12")).validate().unwrap_err(),
            "invalid end date"
        );
    }

    #[test]
    fn create_request_rejects_non_uuid_user() {
        let body = r#"{"service_name":"x","price":1,"user_id":"not-a-uuid","start_date":"07-2025"}"#;
        assert!(serde_json::from_str::<CreateSubscriptionRequest>(body).is_err());
    }

    #[test]
    fn update_request_has_no_user_id() {
        let body = r#"{"service_name":"x","price":5,"start_date":"01-2025","end_date":"02-2025"}"#;
        let req: UpdateSubscriptionRequest = serde_json::from_str(body).unwrap();
        let (start, end) = req.validate().unwrap();
        assert!(start < end.unwrap());
    }

    #[test]
    fn empty_total_params_are_absent() {
        let query = TotalQuery {
            user_id: Some(String::new()),
            service_name: Some(String::new()),
            start_date: Some(String::new()),
        };
        assert_eq!(query.into_filter().unwrap(), TotalFilter::default());
    }

    #[test]
    fn repeated_total_params_keep_the_first_value() {
        let pairs = vec![
            ("service_name".to_string(), "a".to_string()),
            ("page".to_string(), "2".to_string()),
            ("service_name".to_string(), "b".to_string()),
            ("start_date".to_string(), String::new()),
            ("start_date".to_string(), "07-2025".to_string()),
        ];
        let query = TotalQuery::from_pairs(pairs);
        assert_eq!(query.service_name.as_deref(), Some("a"));
        assert_eq!(query.start_date.as_deref(), Some(""));
        assert!(query.user_id.is_none());

        let filter = query.into_filter().unwrap();
        assert_eq!(filter.service_name.as_deref(), Some("a"));
        assert!(filter.start_from.is_none());
    }

    #[test]
    fn total_rejects_bad_start_date() {
        for bad in ["13-2025", "07-25", "2025-07"] {
            let query = TotalQuery {
                start_date: Some(bad.to_string()),
                ..Default::default()
            };
            assert_eq!(query.into_filter().unwrap_err(), "invalid start_date format");
        }
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::internal("db error", "connection reset").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
