// Infrastructure layer - External dependencies and adapters
pub mod chunked_svg;
pub mod config;
pub mod http_response;
pub mod svg;
pub mod ts_source;
