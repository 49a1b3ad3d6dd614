//! Drawable building blocks for fretboard diagrams.
//!
//! Each drawable renders itself at a given position into a [`LayeredOutput`],
//! keeping z-order independent of draw order.

mod layer;
mod line;
mod marker;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use line::Line;
pub use marker::{MarkerDefinition, NoteMarker};
pub use stroke::{StrokeCap, StrokeDefinition};
pub use text::{Text, TextAnchor, TextDefinition};

use crate::geometry::Point;

/// An element that can be rendered into layered SVG output.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable at `position` into one or more layers.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;
}
