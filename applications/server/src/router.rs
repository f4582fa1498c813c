//! HTTP routing
use crate::{api, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
///
/// Moderation routes are only mounted when the state carries an admin token.
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/chat/register", post(api::chat::register));

    // Routes for registered chat users
    let chat_routes = Router::new()
        .route("/chat/me", get(api::chat::me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    let mut api_routes = public_routes.merge(chat_routes);

    if app_state.admin_token.is_some() {
        let admin_routes = Router::new()
            .route("/admin/users", get(api::admin::list_users))
            .route("/admin/users/:id/disable", post(api::admin::disable_user))
            .layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                middleware::admin_middleware,
            ));
        api_routes = api_routes.merge(admin_routes);
    } else {
        tracing::info!("Admin API disabled (no admin token configured)");
    }

    Router::new()
        .nest("/api", api_routes)
        // Headers stay out of spans: they carry access tokens
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
