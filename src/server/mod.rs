//! HTTP API. Routing lives in [`routes::route_request`] so it can be exercised without
//! sockets; axum only forwards method, path and body to it.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::OptimizerConfig;

pub mod api;
pub mod routes;

use api::ApiState;
use routes::HttpResponse;

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

async fn dispatch(
    State(state): State<Arc<ApiState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> HttpResponse {
    let body = String::from_utf8_lossy(&body);
    routes::route_request(&state, method.as_str(), uri.path(), &body)
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub fn run_server(bind_addr: &str, config: OptimizerConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!("loadout server listening on http://{bind_addr}");
        axum::serve(listener, router(ApiState::new(config))).await
    })
}
