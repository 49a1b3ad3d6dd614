//! Filled note markers with their note name.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, Text, TextAnchor, TextDefinition},
    geometry::Point,
};

/// Fill color and label style shared by every marker of a diagram.
#[derive(Debug, Clone)]
pub struct MarkerDefinition {
    diameter: f32,
    fill_color: Color,
    text: TextDefinition,
}

impl MarkerDefinition {
    /// Creates a marker style. The label is forced onto the marker text layer
    /// and centred on the circle.
    pub fn new(diameter: f32, fill_color: Color, mut text: TextDefinition) -> Self {
        text.set_anchor(TextAnchor::Center);
        text.set_layer(RenderLayer::MarkerText);
        Self {
            diameter,
            fill_color,
            text,
        }
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }
}

impl Default for MarkerDefinition {
    fn default() -> Self {
        let mut text = TextDefinition::new();
        text.set_color(Some(Color::white()));
        Self::new(30.0, Color::default(), text)
    }
}

/// A single marker: a filled circle with a note name centred inside.
#[derive(Debug, Clone)]
pub struct NoteMarker<'a> {
    definition: &'a MarkerDefinition,
    note: &'a str,
}

impl<'a> NoteMarker<'a> {
    pub fn new(definition: &'a MarkerDefinition, note: &'a str) -> Self {
        Self { definition, note }
    }

    pub fn note(&self) -> &str {
        self.note
    }
}

impl Drawable for NoteMarker<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let fill = self.definition.fill_color();
        let circle = svg_element::Circle::new()
            .set("cx", position.x())
            .set("cy", position.y())
            .set("r", self.definition.diameter() / 2.0)
            .set("fill", fill.to_string())
            .set("fill-opacity", fill.alpha())
            .set("stroke", fill.to_string());

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Marker, Box::new(circle));
        output.merge(Text::new(&self.definition.text, self.note).render_to_layers(position));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_layers() {
        let definition = MarkerDefinition::default();
        let marker = NoteMarker::new(&definition, "A#");
        let output = marker.render_to_layers(Point::new(130.0, 150.0));

        assert_eq!(output.layer_len(RenderLayer::Marker), 1);
        assert_eq!(output.layer_len(RenderLayer::MarkerText), 1);
        assert_eq!(output.layer_len(RenderLayer::Label), 0);
    }

    #[test]
    fn test_marker_geometry() {
        let definition = MarkerDefinition::default();
        let marker = NoteMarker::new(&definition, "C");
        let svg: String = marker
            .render_to_layers(Point::new(30.0, 100.0))
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();
        assert!(svg.contains("cx=\"30\""));
        assert!(svg.contains("cy=\"100\""));
        assert!(svg.contains("r=\"15\""));
        assert!(svg.contains("fill=\"white\""));
        assert!(svg.contains("\nC\n"));
    }

    #[test]
    fn test_text_definition_is_recentred() {
        let mut text = TextDefinition::new();
        text.set_anchor(TextAnchor::TopLeft);
        let definition = MarkerDefinition::new(20.0, Color::default(), text);
        assert_eq!(definition.text.anchor(), TextAnchor::Center);
    }
}
