// Application state for HTTP handlers
use crate::application::streaming_service::StreamingSparklineService;

#[derive(Clone)]
pub struct AppState {
    pub sparkline_service: StreamingSparklineService,
}
