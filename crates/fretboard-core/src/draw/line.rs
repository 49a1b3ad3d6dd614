//! Straight grid lines.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Point,
};

/// A straight line starting at the render position.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    stroke: &'a StrokeDefinition,
    offset: Point,
}

impl<'a> Line<'a> {
    /// Creates a line reaching `offset` away from its start.
    pub fn new(stroke: &'a StrokeDefinition, offset: Point) -> Self {
        Self { stroke, offset }
    }

    /// Creates the line between two absolute points, to be rendered at `start`.
    pub fn between(stroke: &'a StrokeDefinition, start: Point, end: Point) -> Self {
        Self::new(stroke, end.sub_point(start))
    }
}

impl Drawable for Line<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let end = position.add_point(self.offset);
        let line = svg_element::Line::new()
            .set("x1", position.x())
            .set("y1", position.y())
            .set("x2", end.x())
            .set("y2", end.y());
        let line = apply_stroke!(line, self.stroke);

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Grid, Box::new(line));
        output
    }
}
