// Sparkline chart - Hosting lifecycle around the aggregator and renderer
use crate::application::aggregator::aggregate;
use crate::application::renderer::render;
use crate::domain::scene::Scene;
use crate::domain::series::{is_empty_result, RawSeries};
use crate::domain::sparkline::SparklineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartState {
    Unmounted,
    NoData,
    Rendered,
}

#[derive(Debug)]
enum Lifecycle {
    Unmounted,
    Mounted { scene: Option<Scene> },
}

/// One chart instance. Owns the retained scene between refreshes.
#[derive(Debug)]
pub struct SparklineChart {
    config: SparklineConfig,
    lifecycle: Lifecycle,
}

impl SparklineChart {
    pub fn new(config: SparklineConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::Unmounted,
        }
    }

    pub fn mount(&mut self) {
        if let Lifecycle::Unmounted = self.lifecycle {
            self.lifecycle = Lifecycle::Mounted { scene: None };
        }
    }

    /// Release the scene.
    pub fn unmount(&mut self) {
        self.lifecycle = Lifecycle::Unmounted;
    }

    pub fn state(&self) -> ChartState {
        match &self.lifecycle {
            Lifecycle::Unmounted => ChartState::Unmounted,
            Lifecycle::Mounted { scene: None } => ChartState::NoData,
            Lifecycle::Mounted { scene: Some(_) } => ChartState::Rendered,
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        match &self.lifecycle {
            Lifecycle::Mounted { scene } => scene.as_ref(),
            Lifecycle::Unmounted => None,
        }
    }

    /// Feed one refresh worth of provider results through the pipeline.
    ///
    /// Returns the updated scene, or `None` when there is nothing to draw or
    /// the chart is not mounted.
    pub fn refresh(&mut self, results: &[RawSeries]) -> Option<&Scene> {
        let Lifecycle::Mounted { scene } = &mut self.lifecycle else {
            tracing::debug!("Ignoring refresh for unmounted sparkline");
            return None;
        };

        if is_empty_result(results) {
            tracing::debug!("Sparkline refresh carried no datapoints");
            *scene = None;
            return None;
        }

        let combined = aggregate(results);
        let scene = scene.get_or_insert_with(Scene::new);
        render(&self.config, &combined, scene);

        tracing::debug!(
            "Rendered sparkline from {} series into {} points",
            results.len(),
            combined.len()
        );

        Some(scene)
    }
}
