// SVG serialization of a sparkline scene
use crate::domain::scene::{PathElement, RectElement, Scene, SceneKey};
use crate::domain::sparkline::{Color, SparklineConfig};
use std::fmt::Write;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

fn paint(color: Option<Color>) -> String {
    color.map_or_else(|| "none".to_string(), |c| c.to_string())
}

fn write_rect(out: &mut String, rect: &RectElement) {
    let _ = write!(
        out,
        r#"<rect data-key="{}" width="{}" height="{}" fill="{}" fill-opacity="{}" stroke="{}"/>"#,
        SceneKey::Background.as_str(),
        rect.width,
        rect.height,
        rect.fill,
        rect.fill_opacity,
        paint(rect.stroke),
    );
}

fn write_path(out: &mut String, path: &PathElement) {
    let _ = write!(
        out,
        r#"<path data-key="{}" fill="{}" stroke="{}" d="{}"/>"#,
        SceneKey::Line.as_str(),
        paint(path.fill),
        path.stroke,
        path.data(),
    );
}

/// Serialize `scene` into a standalone SVG document sized to the canvas.
pub fn scene_to_svg(config: &SparklineConfig, scene: &Scene) -> String {
    let mut out = String::with_capacity(256);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><g>"#,
        w = config.width,
        h = config.height,
    );

    for key in scene.keys() {
        match key {
            SceneKey::Background => {
                if let Some(rect) = scene.background() {
                    write_rect(&mut out, rect);
                }
            }
            SceneKey::Line => {
                if let Some(path) = scene.line() {
                    write_path(&mut out, path);
                }
            }
        }
    }

    out.push_str("</g></svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::renderer::render;
    use crate::domain::series::Datapoint;

    #[test]
    fn test_rendered_scene_to_svg() {
        let config = SparklineConfig::default();
        let mut scene = Scene::new();
        render(
            &config,
            &vec![Datapoint::new(1, 5.0), Datapoint::new(2, 4.0)],
            &mut scene,
        );

        let svg = scene_to_svg(&config, &scene);

        assert_eq!(
            svg,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="69" height="10" viewBox="0 0 69 10"><g>"#,
                r##"<rect data-key="background" width="69" height="10" fill="#B8CCEC" fill-opacity="1" stroke="none"/>"##,
                r##"<path data-key="line" fill="none" stroke="#3A7DE1" d="M1,1L68,9"/>"##,
                "</g></svg>"
            )
        );
    }

    #[test]
    fn test_rerender_does_not_duplicate_elements() {
        let config = SparklineConfig::default();
        let mut scene = Scene::new();
        for i in 0..3 {
            render(&config, &vec![Datapoint::new(i, 1.0)], &mut scene);
        }

        let svg = scene_to_svg(&config, &scene);
        assert_eq!(svg.matches("<rect").count(), 1);
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn test_empty_scene() {
        let svg = scene_to_svg(&SparklineConfig::default(), &Scene::new());
        assert!(!svg.contains("<rect"));
        assert!(!svg.contains("<path"));
    }
}
