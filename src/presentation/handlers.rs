// HTTP request handlers
use crate::infrastructure::chunked_svg::chunked_svg_stream;
use crate::infrastructure::http_response::{accepts_brotli, svg_response};
use crate::infrastructure::svg::scene_to_svg;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct NodesQuery {
    /// Comma separated node ids, e.g. `1,2,3`.
    pub nodes: String,
}

#[derive(Deserialize)]
pub struct StreamQuery {
    pub nodes: String,
    /// Stop after this many frames; stream until disconnect when absent.
    pub frames: Option<usize>,
}

fn parse_nodes(nodes: &str) -> Vec<String> {
    nodes
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sparklines/qps", get(qps_sparkline))
        .route("/sparklines/qps/stream", get(stream_qps_sparkline))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Render the current QPS sparkline for a node group once.
pub async fn qps_sparkline(
    Query(query): Query<NodesQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let nodes = parse_nodes(&query.nodes);
    if nodes.is_empty() {
        return (StatusCode::BAD_REQUEST, "no nodes given").into_response();
    }

    match state.sparkline_service.snapshot(&nodes).await {
        Ok(Some(scene)) => {
            let svg = scene_to_svg(state.sparkline_service.config(), &scene);
            match svg_response(svg, accepts_brotli(&headers)).await {
                Ok(response) => response,
                Err(status) => status.into_response(),
            }
        }
        // Nothing to draw.
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::warn!("Sparkline snapshot failed: {:#}", e);
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// Stream a frame per refresh tick for a node group.
pub async fn stream_qps_sparkline(
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let nodes = parse_nodes(&query.nodes);
    if nodes.is_empty() {
        return (StatusCode::BAD_REQUEST, "no nodes given").into_response();
    }

    let rx = state.sparkline_service.stream_sparkline(nodes);
    let frames = ReceiverStream::new(rx);
    let frames = match query.frames {
        Some(limit) => frames.take(limit).boxed(),
        None => frames.boxed(),
    };

    let config = *state.sparkline_service.config();
    match chunked_svg_stream(frames, config, accepts_brotli(&headers)) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
