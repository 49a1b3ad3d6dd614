//! Stroke definitions for grid lines.
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"black"`, `1` |
//! | `width` | `stroke-width` | `2.0` |
//! | `cap` | `stroke-linecap` | `"butt"`, `"round"`, `"square"` |
//!
//! Use [`apply_stroke!`](crate::apply_stroke!) to set all attributes at once:
//!
//! ```
//! use fretboard_core::draw::StrokeDefinition;
//! use fretboard_core::color::Color;
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
//! let line = svg_element::Line::new().set("x1", 0).set("x2", 10);
//! let line = fretboard_core::apply_stroke!(line, &stroke);
//! ```

use crate::color::Color;

/// How the ends of a line are drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    /// Flat end exactly at the endpoint (default)
    #[default]
    Butt,
    /// Rounded end extending past the endpoint by half the width
    Round,
    /// Square end extending past the endpoint by half the width
    Square,
}

impl StrokeCap {
    /// Returns the SVG `stroke-linecap` value.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Color, width and cap of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    cap: StrokeCap,
}

impl StrokeDefinition {
    /// Creates a solid stroke with butt caps.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: StrokeCap::default(),
        }
    }

    /// Returns a copy with the given cap.
    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::solid(Color::default(), 1.0)
    }
}

/// Applies every stroke attribute of a [`StrokeDefinition`] to an SVG element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
    }};
}
