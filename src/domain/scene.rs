// Retained scene for one sparkline: a background rect and a line path

use super::sparkline::Color;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Background,
    Line,
}

impl SceneKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKey::Background => "background",
            SceneKey::Line => "line",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub fill_opacity: f64,
    pub stroke: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub fill: Option<Color>,
    pub stroke: Color,
    pub points: Vec<(f64, f64)>,
}

impl PathElement {
    pub fn new(stroke: Color) -> Self {
        Self {
            fill: None,
            stroke,
            points: Vec::new(),
        }
    }

    /// SVG path data tracing `points` with straight segments, e.g. `M1,9L68,1`.
    pub fn data(&self) -> String {
        let mut d = String::new();
        for (i, (x, y)) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            // Writing into a String cannot fail.
            let _ = write!(d, "{}{},{}", cmd, x, y);
        }
        d
    }
}

/// The persistent render state of a chart.
///
/// Holds at most one element per [`SceneKey`]. Elements are created the
/// first time they are ensured and updated in place afterwards, so repeated
/// renders never accumulate primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    background: Option<RectElement>,
    line: Option<PathElement>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the background rect, creating it with `enter` if absent.
    pub fn ensure_background<F>(&mut self, enter: F) -> &mut RectElement
    where
        F: FnOnce() -> RectElement,
    {
        self.background.get_or_insert_with(enter)
    }

    /// Returns the line path, creating it with `enter` if absent.
    pub fn ensure_line<F>(&mut self, enter: F) -> &mut PathElement
    where
        F: FnOnce() -> PathElement,
    {
        self.line.get_or_insert_with(enter)
    }

    pub fn background(&self) -> Option<&RectElement> {
        self.background.as_ref()
    }

    pub fn line(&self) -> Option<&PathElement> {
        self.line.as_ref()
    }

    /// Keys of the elements currently present, in paint order.
    pub fn keys(&self) -> Vec<SceneKey> {
        let mut keys = Vec::with_capacity(2);
        if self.background.is_some() {
            keys.push(SceneKey::Background);
        }
        if self.line.is_some() {
            keys.push(SceneKey::Line);
        }
        keys
    }
}
