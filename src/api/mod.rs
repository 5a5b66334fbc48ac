pub mod docs;
pub mod models;
pub mod subscriptions;

// Re-exports
pub use models::*;

use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Full application router: subscription routes, Swagger UI and HTTP tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(subscriptions::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
