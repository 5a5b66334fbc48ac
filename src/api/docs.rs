use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::subscriptions::handlers::create_subscription_handler,
        crate::api::subscriptions::handlers::list_subscriptions_handler,
        crate::api::subscriptions::handlers::total_handler,
        crate::api::subscriptions::handlers::get_subscription_handler,
        crate::api::subscriptions::handlers::update_subscription_handler,
        crate::api::subscriptions::handlers::delete_subscription_handler
    ),
    components(
        schemas(
            crate::api::models::CreateSubscriptionRequest,
            crate::api::models::CreateSubscriptionResponse,
            crate::api::models::UpdateSubscriptionRequest,
            crate::api::models::TotalResponse,
            crate::api::models::ErrorResponse,
            crate::storage::Subscription
        )
    ),
    tags(
        (name = "subscriptions", description = "Subscription records and price totals")
    )
)]
pub struct ApiDoc;
