// Sparkline renderer - Scale a combined series and redraw the scene
use crate::application::scale::LinearScale;
use crate::domain::scene::{PathElement, RectElement, Scene};
use crate::domain::series::{extent, CombinedSeries};
use crate::domain::sparkline::SparklineConfig;

/// Draw `series` into `scene`.
///
/// The background rect and line path are entered on the first call and
/// reused afterwards; only the path geometry changes between calls. Callers
/// must not pass an empty series.
pub fn render(config: &SparklineConfig, series: &CombinedSeries, scene: &mut Scene) {
    let margin = config.margin();

    let (t_min, t_max) = extent(series, |d| d.timestamp).unwrap_or((0, 0));
    let (v_min, v_max) = extent(series, |d| d.value).unwrap_or((0.0, 0.0));

    let x_scale = LinearScale::new(
        (t_min as f64, t_max as f64),
        (margin.left, config.width - margin.right),
    );
    let y_scale = LinearScale::new(
        (v_min, v_max),
        (config.height - margin.bottom, margin.top),
    );

    scene.ensure_background(|| RectElement {
        width: config.width,
        height: config.height,
        fill: config.background_color,
        fill_opacity: 1.0,
        stroke: None,
    });

    let line = scene.ensure_line(|| PathElement::new(config.line_color));
    line.points = series
        .iter()
        .map(|d| (x_scale.apply(d.timestamp as f64), y_scale.apply(d.value)))
        .collect();
}
