use crate::api::models::*;
use crate::storage::{Subscription, SubscriptionChanges};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

const NOT_FOUND: &str = "subscription not found";

/// Path ids that are not UUIDs cannot match any row.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Decodes a JSON body regardless of its `Content-Type`.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Failed to decode body");
        AppError::BadRequest("invalid request".to_string())
    })
}

/// Create a subscription
#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = CreateSubscriptionResponse),
        (status = 400, description = "Invalid body or dates", body = ErrorResponse),
        (status = 500, description = "Insert failed", body = ErrorResponse),
    )
)]
pub async fn create_subscription_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateSubscriptionResponse>), AppError> {
    let request: CreateSubscriptionRequest = decode_body(&body)?;
    let (start_date, end_date) = request.validate().map_err(AppError::BadRequest)?;

    let subscription = Subscription {
        id: Uuid::new_v4(),
        service_name: request.service_name,
        price: request.price,
        user_id: request.user_id,
        start_date,
        end_date,
    };

    state
        .store
        .insert(&subscription)
        .await
        .map_err(|e| AppError::internal("failed to insert subscription", e))?;

    info!(id = %subscription.id, user_id = %subscription.user_id, "Created subscription");

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionResponse { id: subscription.id }),
    ))
}

/// List every subscription
#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = [Subscription]),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let subscriptions = state
        .store
        .list()
        .await
        .map_err(|e| AppError::internal("failed to get subscriptions", e))?;

    Ok(Json(subscriptions))
}

/// Sum of prices, optionally filtered by user, service and start month
#[utoipa::path(
    get,
    path = "/subscriptions/total",
    tag = "subscriptions",
    params(TotalQuery),
    responses(
        (status = 200, description = "Sum of matching prices", body = TotalResponse),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse),
    )
)]
pub async fn total_handler(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<TotalResponse>, AppError> {
    let Query(pairs) = params.map_err(|e| {
        warn!(error = %e, "Failed to decode query string");
        AppError::BadRequest("invalid query".to_string())
    })?;
    let filter = TotalQuery::from_pairs(pairs)
        .into_filter()
        .map_err(AppError::BadRequest)?;

    let total = state
        .store
        .total(&filter)
        .await
        .map_err(|e| AppError::internal("db error", e))?;

    info!(
        filters = filter.conditions().len(),
        total,
        "Computed subscription total"
    );

    Ok(Json(TotalResponse { total }))
}

/// Fetch one subscription
#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id (UUID)")),
    responses(
        (status = 200, description = "Subscription", body = Subscription),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get_subscription_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Subscription>, AppError> {
    let Some(id) = parse_id(&raw_id) else {
        info!(id = %raw_id, "Subscription not found");
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    };

    let subscription = state
        .store
        .get(id)
        .await
        .map_err(|e| AppError::internal("db error", e))?;

    match subscription {
        Some(subscription) => Ok(Json(subscription)),
        None => {
            info!(id = %id, "Subscription not found");
            Err(AppError::NotFound(NOT_FOUND.to_string()))
        }
    }
}

/// Replace the mutable fields of a subscription.
///
/// Succeeds with 204 even when no row has the given id.
#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id (UUID)")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 204, description = "Updated (or nothing matched)"),
        (status = 400, description = "Invalid body or dates", body = ErrorResponse),
        (status = 500, description = "Update failed", body = ErrorResponse),
    )
)]
pub async fn update_subscription_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let request: UpdateSubscriptionRequest = decode_body(&body)?;
    let (start_date, end_date) = request.validate().map_err(AppError::BadRequest)?;

    let Some(id) = parse_id(&raw_id) else {
        warn!(id = %raw_id, "Update matched no subscription");
        return Ok(StatusCode::NO_CONTENT);
    };

    let changes = SubscriptionChanges {
        service_name: request.service_name,
        price: request.price,
        start_date,
        end_date,
    };

    let matched = state
        .store
        .update(id, &changes)
        .await
        .map_err(|e| AppError::internal("failed to update", e))?;

    if matched == 0 {
        warn!(id = %id, "Update matched no subscription");
    } else {
        info!(id = %id, "Updated subscription");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a subscription
#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id (UUID)")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 500, description = "Delete failed", body = ErrorResponse),
    )
)]
pub async fn delete_subscription_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    };

    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|e| AppError::internal("db error", e))?;

    if deleted == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!(id = %id, "Deleted subscription");
    Ok(StatusCode::NO_CONTENT)
}
