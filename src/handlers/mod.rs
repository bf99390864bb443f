pub mod convert;
pub mod form;
pub mod health;
pub mod parse;
pub mod ui;
pub mod upload;

pub use convert::*;
pub use health::*;
pub use parse::*;
pub use ui::*;
pub use upload::*;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::logging_middleware;
use crate::state::AppState;

/// Build the application router with its middleware stack.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);
    let body_limit = state.config.body_limit_bytes();
    let upload_limit = state.config.upload_body_limit_bytes();

    Router::new()
        .route("/", get(index_page))
        .route("/api", get(api_index_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/upload",
            get(upload_info_handler)
                .post(upload_handler)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/parse-pdf", post(parse_pdf_handler))
        .route("/api/convert-pdf-to-doc", post(convert_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!("FRONTEND_URL {:?} is not a valid origin ({}); cross-origin requests will be refused", frontend_url, e);
            layer
        }
    }
}
