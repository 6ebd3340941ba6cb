// Streaming sparkline service - Drive refresh ticks for subscribed charts
use crate::application::metrics_source::{MetricsRequest, MetricsSource};
use crate::application::sparkline_chart::SparklineChart;
use crate::domain::scene::Scene;
use crate::domain::sparkline::SparklineConfig;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const FRAME_BUFFER: usize = 16;

/// The outcome of one refresh tick. `scene` is `None` when the provider had
/// no data and nothing should be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct SparklineFrame {
    pub key: String,
    pub sequence: u64,
    pub scene: Option<Scene>,
}

#[derive(Clone)]
pub struct StreamingSparklineService {
    source: Arc<dyn MetricsSource>,
    config: SparklineConfig,
    metrics: Vec<String>,
    refresh_interval: Duration,
}

impl StreamingSparklineService {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        config: SparklineConfig,
        metrics: Vec<String>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source,
            config,
            metrics,
            refresh_interval,
        }
    }

    pub fn config(&self) -> &SparklineConfig {
        &self.config
    }

    /// Fetch once and render a fresh chart. `None` means the provider had no
    /// data for these nodes.
    pub async fn snapshot(&self, nodes: &[String]) -> anyhow::Result<Option<Scene>> {
        let request = MetricsRequest::for_nodes(nodes, &self.metrics);
        let results = self
            .source
            .query(&request)
            .await
            .with_context(|| format!("Failed to query metrics for {}", request.id))?;

        let mut chart = SparklineChart::new(self.config);
        chart.mount();
        Ok(chart.refresh(&results).cloned())
    }

    /// Start a chart for `nodes` and push a frame down the returned channel on
    /// every refresh tick. The chart is unmounted once the receiver is dropped.
    pub fn stream_sparkline(&self, nodes: Vec<String>) -> mpsc::Receiver<SparklineFrame> {
        let (tx, rx) = mpsc::channel(FRAME_BUFFER);

        let source = self.source.clone();
        let request = MetricsRequest::for_nodes(&nodes, &self.metrics);
        let mut chart = SparklineChart::new(self.config);
        let period = self.refresh_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0u64;

            chart.mount();
            tracing::info!("Mounted sparkline {}", request.id);

            loop {
                ticker.tick().await;

                let results = match source.query(&request).await {
                    Ok(results) => results,
                    Err(e) => {
                        // Keep the previous frame on screen.
                        tracing::warn!("Metrics query for {} failed: {:#}", request.id, e);
                        if tx.is_closed() {
                            break;
                        }
                        continue;
                    }
                };

                // Aggregate and render with no await in between.
                let scene = chart.refresh(&results).cloned();

                sequence += 1;
                let frame = SparklineFrame {
                    key: request.id.clone(),
                    sequence,
                    scene,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }

            chart.unmount();
            tracing::info!("Unmounted sparkline {}", request.id);
        });

        rx
    }
}
