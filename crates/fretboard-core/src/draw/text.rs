//! Text rendering definitions for titles and labels.
//!
//! - [`TextDefinition`] - Reusable text style configuration
//! - [`Text`] - A renderable text element combining content with a [`TextDefinition`]
//!
//! # Quick Start
//!
//! ```
//! # use fretboard_core::draw::{Drawable, Text, TextAnchor, TextDefinition};
//! # use fretboard_core::geometry::Point;
//! let mut style = TextDefinition::new();
//! style.set_font_size(25);
//! style.set_anchor(TextAnchor::TopCenter);
//!
//! let text = Text::new(&style, "E");
//! let output = text.render_to_layers(Point::new(30.0, 70.0));
//! assert!(!output.is_empty());
//! ```

use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::Point,
};

/// Which point of the text box the render position refers to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Position is the middle of the top edge (titles, string names)
    TopCenter,
    /// Position is the top-left corner (fret numbers)
    TopLeft,
    /// Position is the centre of the text (note names)
    #[default]
    Center,
}

impl TextAnchor {
    /// Returns the SVG `text-anchor` value.
    fn horizontal(self) -> &'static str {
        match self {
            Self::TopCenter | Self::Center => "middle",
            Self::TopLeft => "start",
        }
    }

    /// Returns the SVG `dominant-baseline` value.
    fn vertical(self) -> &'static str {
        match self {
            Self::TopCenter | Self::TopLeft => "hanging",
            Self::Center => "central",
        }
    }
}

/// Defines the visual style for text elements.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Times New Roman, serif"` |
/// | Font size | `20` |
/// | Color | `None` (SVG default, black) |
/// | Anchor | [`TextAnchor::Center`] |
/// | Layer | [`RenderLayer::Label`] |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
    anchor: TextAnchor,
    layer: RenderLayer,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in pixels.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family, as a CSS font-family list.
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the text color. `None` leaves the SVG default (black).
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Sets which point of the text the render position refers to.
    pub fn set_anchor(&mut self, anchor: TextAnchor) {
        self.anchor = anchor;
    }

    /// Sets the layer the text is emitted on.
    pub fn set_layer(&mut self, layer: RenderLayer) {
        self.layer = layer;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman, serif".to_string(),
            font_size: 20,
            color: None,
            anchor: TextAnchor::default(),
            layer: RenderLayer::Label,
        }
    }
}

/// A renderable single-line text element.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    /// Creates a new text element with the given definition and content.
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    /// Returns the text content of this element.
    pub fn content(&self) -> &str {
        self.content
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let anchor = self.definition.anchor();

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", anchor.horizontal())
            .set("dominant-baseline", anchor.vertical())
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size())
            .add(SvgText::new(self.content));

        if let Some(color) = self.definition.color() {
            rendered_text = rendered_text
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        output.add_to_layer(self.definition.layer, Box::new(rendered_text));
        output
    }
}
