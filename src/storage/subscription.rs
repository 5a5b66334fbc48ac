use crate::storage::month::YearMonth;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A persisted subscription row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "07-2025")]
    pub start_date: YearMonth,
    #[schema(value_type = Option<String>, example = "12-2025")]
    pub end_date: Option<YearMonth>,
}

/// Fields replaced by an update. `user_id` is not updatable.
#[derive(Debug, Clone)]
pub struct SubscriptionChanges {
    pub service_name: String,
    pub price: i32,
    pub start_date: YearMonth,
    pub end_date: Option<YearMonth>,
}
