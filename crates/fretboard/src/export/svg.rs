//! SVG rendering of fretboard diagrams.

use log::debug;
use svg::{Document, node::element as svg_element};

use fretboard_core::{
    color::Color,
    diagram::Diagram,
    draw::{
        Drawable, LayeredOutput, Line, MarkerDefinition, NoteMarker, RenderLayer,
        StrokeCap, StrokeDefinition, Text, TextAnchor, TextDefinition,
    },
    geometry::Size,
    layout::{FretboardLayout, LayoutMetrics},
    string::GuitarString,
};

use crate::{config::StyleConfig, export};

/// Builder that resolves a [`StyleConfig`] into a drawing theme.
///
/// # Examples
///
/// ```
/// # use fretboard::config::{LayoutMetrics, StyleConfig};
/// # use fretboard::export::svg::SvgBuilder;
/// let style = StyleConfig::default();
/// let svg = SvgBuilder::new(LayoutMetrics::default())
///     .with_style(&style)
///     .build()
///     .unwrap();
/// # let _ = svg;
/// ```
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    metrics: LayoutMetrics,
    style: Option<&'a StyleConfig>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            style: None,
        }
    }

    /// Set the style to use. Without one the default style applies.
    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Parses every configured color and builds the [`Svg`] renderer.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Style`] naming the first invalid color.
    pub fn build(self) -> Result<Svg, export::Error> {
        let default_style;
        let style = match self.style {
            Some(style) => style,
            None => {
                default_style = StyleConfig::default();
                &default_style
            }
        };

        let background = style.background_color().map_err(export::Error::Style)?;
        let line_color = style.line_color().map_err(export::Error::Style)?;
        let text_color = style.text_color().map_err(export::Error::Style)?;
        let marker_color = style.marker_color().map_err(export::Error::Style)?;
        let marker_text_color = style.marker_text_color().map_err(export::Error::Style)?;

        let label = |size: u16, anchor: TextAnchor, color: Color| {
            let mut text = TextDefinition::new();
            text.set_font_family(style.font_family());
            text.set_font_size(size);
            text.set_color(Some(color));
            text.set_anchor(anchor);
            text
        };

        let marker = MarkerDefinition::new(
            self.metrics.marker_size(),
            marker_color,
            label(style.note_font_size(), TextAnchor::Center, marker_text_color),
        );

        Ok(Svg {
            metrics: self.metrics,
            background,
            stroke: StrokeDefinition::solid(line_color, style.line_width())
                .with_cap(StrokeCap::Square),
            title: label(style.title_font_size(), TextAnchor::TopCenter, text_color),
            string_label: label(style.label_font_size(), TextAnchor::TopCenter, text_color),
            fret_label: label(style.label_font_size(), TextAnchor::TopLeft, text_color),
            marker,
        })
    }
}

/// Renders diagrams with a resolved theme.
#[derive(Debug, Clone)]
pub struct Svg {
    metrics: LayoutMetrics,
    background: Color,
    stroke: StrokeDefinition,
    title: TextDefinition,
    string_label: TextDefinition,
    fret_label: TextDefinition,
    marker: MarkerDefinition,
}

impl Svg {
    /// Returns the layout used for `diagram`.
    pub fn layout_for(&self, diagram: &Diagram) -> FretboardLayout {
        FretboardLayout::new(self.metrics, diagram.fret_count())
    }

    /// Renders the complete diagram to an SVG document.
    ///
    /// Output depends only on the diagram and the theme.
    pub fn render_diagram(&self, diagram: &Diagram) -> Document {
        let layout = self.layout_for(diagram);
        let size = layout.canvas_size();

        let doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        let mut output = self.render_background(size);
        output.merge(self.render_labels(&layout, diagram.title()));
        output.merge(self.render_grid(&layout));
        output.merge(self.render_markers(&layout, diagram));

        let doc = output
            .render()
            .into_iter()
            .fold(doc, |doc, node| doc.add(node));

        debug!(width = size.width(), height = size.height(); "SVG document rendered");
        doc
    }

    fn render_background(&self, size: Size) -> LayeredOutput {
        let rect = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", self.background.to_string())
            .set("fill-opacity", self.background.alpha());

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Background, Box::new(rect));
        output
    }

    fn render_labels(&self, layout: &FretboardLayout, title: &str) -> LayeredOutput {
        let mut output = Text::new(&self.title, title).render_to_layers(layout.title_anchor());

        for string in GuitarString::ALL {
            let label = Text::new(&self.string_label, string.label());
            output.merge(label.render_to_layers(layout.string_label_anchor(string)));
        }

        for fret in 1..=layout.fret_count() {
            let number = fret.to_string();
            let label = Text::new(&self.fret_label, &number);
            output.merge(label.render_to_layers(layout.fret_label_anchor(fret)));
        }

        output
    }

    fn render_grid(&self, layout: &FretboardLayout) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        for string in GuitarString::ALL {
            let (top, bottom) = layout.string_line(string);
            output.merge(Line::between(&self.stroke, top, bottom).render_to_layers(top));
        }

        // Line 0 is the nut
        for fret in 0..=layout.fret_count() {
            let (left, right) = layout.fret_line(fret);
            output.merge(Line::between(&self.stroke, left, right).render_to_layers(left));
        }

        output
    }

    fn render_markers(&self, layout: &FretboardLayout, diagram: &Diagram) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for (string, fret, note) in diagram.markers() {
            let marker = NoteMarker::new(&self.marker, note);
            output.merge(marker.render_to_layers(layout.marker_center(string, fret)));
        }
        output
    }
}
