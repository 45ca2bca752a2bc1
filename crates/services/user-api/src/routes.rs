//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    account_routes, auth_routes, auth_session_routes, family_routes, health_routes,
    member_routes, message_routes, notification_routes, status_routes, tool_routes,
};
use crate::middleware::session_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let session = || middleware::from_fn_with_state(state.clone(), session_middleware);

    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Open routes; GET /accounts/{id} resolves the session itself
        .nest("/accounts", account_routes())
        .nest("/families", family_routes())
        .nest("/members", member_routes())
        .nest("/tools", tool_routes())
        .nest(
            "/auth",
            auth_routes().merge(auth_session_routes().route_layer(session())),
        )
        // Session required
        .nest("/status", status_routes().route_layer(session()))
        .nest("/notifications", notification_routes().route_layer(session()))
        // Short prefix used by the care-bot device
        .nest("/notify", notification_routes().route_layer(session()))
        .nest("/messages", message_routes().route_layer(session()))
        .with_state(state)
}
