//! Route modules for the PDF API

pub mod convert;
pub mod health;
pub mod index;

use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Moment the request entered the router, used for `api_response_time_ms`
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

async fn record_request_start(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(RequestStart(Instant::now()));
    next.run(request).await
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let meta = Router::new()
        .merge(index::router())
        .merge(health::router())
        .layer(cors);

    Router::new()
        .merge(meta)
        .merge(convert::router(state.config().server.max_body_bytes))
        .layer(middleware::from_fn(record_request_start))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
