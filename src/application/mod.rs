// Application layer - Sparkline pipeline and refresh orchestration
pub mod aggregator;
pub mod metrics_source;
pub mod renderer;
pub mod scale;
pub mod sparkline_chart;
pub mod streaming_service;
