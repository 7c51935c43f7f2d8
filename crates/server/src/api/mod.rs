pub mod boxes;
pub mod health;
pub mod openapi;
pub mod panic;
pub mod schemas;

use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::service::BoxService;

use self::openapi::ApiDoc;
use self::panic::CreatePanicResponder;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Box creation and lookup.
    pub boxes: BoxService,
    /// Whether 500 responses carry raw diagnostics.
    pub debug: bool,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let create = post(boxes::generate_box).layer(CatchPanicLayer::custom(CreatePanicResponder {
        debug: state.debug,
    }));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/generate-box", create)
        .route("/api/boxes/{id}", get(boxes::get_box))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // 5xx responses are already logged once at error level by the service.
        .layer(TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::WARN)))
        .layer(CorsLayer::permissive())
}
