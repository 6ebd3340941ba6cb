// HTTP response utilities for SVG with optional Brotli encoding
use crate::infrastructure::svg::SVG_CONTENT_TYPE;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
};
use tokio::io::AsyncReadExt;

/// True when the client advertises Brotli in `Accept-Encoding`.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|enc| enc.trim().starts_with("br")))
        .unwrap_or(false)
}

pub async fn brotli_compress(bytes: Vec<u8>) -> Result<Vec<u8>, std::io::Error> {
    let cursor = std::io::Cursor::new(bytes);
    let mut encoder = BrotliEncoder::new(cursor);
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

/// Build a complete SVG response, compressed when `compress` is set.
pub async fn svg_response(svg: String, compress: bool) -> Result<Response<Body>, StatusCode> {
    let svg_bytes = svg.into_bytes();

    let (body_bytes, content_encoding) = if compress {
        let original = svg_bytes.len();
        let compressed = brotli_compress(svg_bytes).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!("Compressed SVG {} -> {} bytes", original, compressed.len());
        (compressed, Some("br"))
    } else {
        (svg_bytes, None)
    };

    let length = HeaderValue::from_str(&body_bytes.len().to_string())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut response_builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, SVG_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-store")
        .header(header::CONTENT_LENGTH, length);

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
