// Chunked SVG streaming utilities
use crate::application::streaming_service::SparklineFrame;
use crate::domain::sparkline::SparklineConfig;
use crate::infrastructure::http_response::brotli_compress;
use crate::infrastructure::svg::scene_to_svg;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;

pub const FRAME_CONTENT_TYPE: &str = "application/x-sparkline-frames";

/// Create a chunked response carrying one length-prefixed frame per refresh.
pub fn chunked_svg_stream<S>(
    frames: S,
    config: SparklineConfig,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = SparklineFrame> + Send + 'static,
{
    let byte_stream = async_stream::stream! {
        futures::pin_mut!(frames);
        while let Some(frame) = frames.next().await {
            tracing::debug!("Streaming frame {} of {}", frame.sequence, frame.key);
            yield encode_frame(&frame, &config, compress).await;
        }
    };

    let body = Body::from_stream(byte_stream);

    // Chunks are compressed individually, so no Content-Encoding header.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single frame: a 4-byte big-endian length, then the SVG
/// document. A frame without a scene has an empty payload.
pub async fn encode_frame(
    frame: &SparklineFrame,
    config: &SparklineConfig,
    compress: bool,
) -> Result<Bytes, std::io::Error> {
    let svg = frame
        .scene
        .as_ref()
        .map(|scene| scene_to_svg(config, scene).into_bytes())
        .unwrap_or_default();

    let payload = if compress && !svg.is_empty() {
        brotli_compress(svg).await?
    } else {
        svg
    };

    let length = u32::try_from(payload.len())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "frame too large"))?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::renderer::render;
    use crate::domain::scene::Scene;
    use crate::domain::series::Datapoint;
    use bytes::Buf;

    fn frame(scene: Option<Scene>) -> SparklineFrame {
        SparklineFrame {
            key: "sparkline.qps.nodes.1".to_string(),
            sequence: 1,
            scene,
        }
    }

    fn rendered() -> Scene {
        let mut scene = Scene::new();
        render(
            &SparklineConfig::default(),
            &vec![Datapoint::new(1, 1.0), Datapoint::new(2, 2.0)],
            &mut scene,
        );
        scene
    }

    #[tokio::test]
    async fn test_frame_length_prefix() {
        let config = SparklineConfig::default();
        let mut chunk = encode_frame(&frame(Some(rendered())), &config, false)
            .await
            .unwrap();

        let length = chunk.get_u32() as usize;
        assert_eq!(length, chunk.len());
        let svg = std::str::from_utf8(&chunk).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[tokio::test]
    async fn test_no_data_frame_is_empty() {
        let chunk = encode_frame(&frame(None), &SparklineConfig::default(), true)
            .await
            .unwrap();
        assert_eq!(&chunk[..], &[0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_compressed_frame_length_prefix() {
        let config = SparklineConfig::default();
        let mut chunk = encode_frame(&frame(Some(rendered())), &config, true)
            .await
            .unwrap();

        let length = chunk.get_u32() as usize;
        assert_eq!(length, chunk.len());
        assert!(length > 0);
        assert!(!chunk.starts_with(b"<svg"));
    }

    #[test]
    fn test_stream_response_headers() {
        let frames = futures::stream::iter(vec![frame(None)]);
        let response = chunked_svg_stream(frames, SparklineConfig::default(), false).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            FRAME_CONTENT_TYPE
        );
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    }
}
