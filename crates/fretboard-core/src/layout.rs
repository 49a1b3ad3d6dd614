//! Pixel geometry of a fretboard diagram.
//!
//! The fretboard is drawn with strings as vertical columns and frets as
//! horizontal rows, nut at the top:
//!
//! ```text
//!                title
//!      E    A    D    G    B    E        <- string labels
//!      │    │    │    │    │    │
//!      ┿━━━━┿━━━━┿━━━━┿━━━━┿━━━━┿        <- fret line 0 (nut), open markers sit here
//!  1   │    ●    │    │    │    │        <- row centre of fret 1
//!      ┼────┼────┼────┼────┼────┼        <- fret line 1
//! ```
//!
//! All positions are derived from [`LayoutMetrics`] and the fret count; the
//! calculations never fail.

use serde::Deserialize;

use crate::{
    geometry::{Bounds, Point, Size},
    string::GuitarString,
};

/// Fixed spacing values used to lay out the fretboard.
///
/// Defaults produce a 550 pixel wide canvas with 100 pixel strings and rows.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// X of the first (low E) string.
    string_margin: f32,
    /// Horizontal distance between adjacent strings.
    string_spacing: f32,
    /// Blank space right of the last string.
    right_padding: f32,
    /// Y of the nut.
    top_margin: f32,
    /// Height of one fret row.
    fret_height: f32,
    /// Blank space below the last fret line.
    bottom_margin: f32,
    /// Top edge of the title text.
    title_y: f32,
    /// Top edge of the string labels.
    string_label_y: f32,
    /// Left edge of the fret-number labels.
    fret_label_x: f32,
    /// Side of the square a marker is inscribed in.
    marker_size: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            string_margin: 30.0,
            string_spacing: 100.0,
            right_padding: 20.0,
            top_margin: 100.0,
            fret_height: 100.0,
            bottom_margin: 50.0,
            title_y: 10.0,
            string_label_y: 70.0,
            fret_label_x: 5.0,
            marker_size: 30.0,
        }
    }
}

impl LayoutMetrics {
    /// Returns the marker diameter.
    pub fn marker_size(&self) -> f32 {
        self.marker_size
    }

    /// Returns the height of one fret row.
    pub fn fret_height(&self) -> f32 {
        self.fret_height
    }
}

/// Maps fretboard positions to canvas coordinates for a given fret count.
///
/// # Examples
///
/// ```
/// # use fretboard_core::{layout::{FretboardLayout, LayoutMetrics}, string::GuitarString};
/// let layout = FretboardLayout::new(LayoutMetrics::default(), 12);
///
/// assert_eq!(layout.canvas_size().width(), 550.0);
/// assert_eq!(layout.canvas_size().height(), 1350.0);
///
/// // Fretted notes sit in the middle of their row, open strings on the nut.
/// assert_eq!(layout.marker_center(GuitarString::A, 1).y(), 150.0);
/// assert_eq!(layout.marker_center(GuitarString::A, 0).y(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FretboardLayout {
    metrics: LayoutMetrics,
    fret_count: u32,
}

impl FretboardLayout {
    /// Creates a layout for a fretboard with `fret_count` frets.
    pub fn new(metrics: LayoutMetrics, fret_count: u32) -> Self {
        Self {
            metrics,
            fret_count,
        }
    }

    /// Returns the metrics this layout was built with.
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Returns the number of frets below the nut.
    pub fn fret_count(&self) -> u32 {
        self.fret_count
    }

    /// Returns the full canvas size.
    pub fn canvas_size(&self) -> Size {
        let m = &self.metrics;
        let last_string = (GuitarString::ALL.len() - 1) as f32;
        let width = m.string_margin + last_string * m.string_spacing + m.right_padding;
        let height = m.top_margin + self.fret_count as f32 * m.fret_height + m.bottom_margin;
        Size::new(width, height)
    }

    /// Returns the X coordinate of a string's column.
    pub fn string_x(&self, string: GuitarString) -> f32 {
        self.metrics.string_margin + string.index() as f32 * self.metrics.string_spacing
    }

    /// Returns the Y coordinate of fret line `fret`; line 0 is the nut.
    pub fn fret_line_y(&self, fret: u32) -> f32 {
        self.metrics.top_margin + fret as f32 * self.metrics.fret_height
    }

    /// Returns the Y coordinate of the centre of fret row `fret`.
    ///
    /// Row `n` lies between fret lines `n - 1` and `n`, so this is a fixed
    /// margin plus `fret × fret_height`.
    pub fn fret_row_y(&self, fret: u32) -> f32 {
        self.fret_line_y(fret) - self.metrics.fret_height / 2.0
    }

    /// Returns the centre of the marker for `string` at `fret`.
    ///
    /// Open strings (fret 0) are drawn half a fret lower than the row formula
    /// gives, so they sit on the nut instead of above it.
    pub fn marker_center(&self, string: GuitarString, fret: u32) -> Point {
        let y = if fret == 0 {
            self.fret_row_y(0) + self.metrics.fret_height / 2.0
        } else {
            self.fret_row_y(fret)
        };
        Point::new(self.string_x(string), y)
    }

    /// Returns the square bounding box of the marker for `string` at `fret`.
    pub fn marker_bounds(&self, string: GuitarString, fret: u32) -> Bounds {
        let size = Size::new(self.metrics.marker_size, self.metrics.marker_size);
        self.marker_center(string, fret).to_bounds(size)
    }

    /// Returns the top-centre anchor of the title.
    pub fn title_anchor(&self) -> Point {
        Point::new(self.canvas_size().width() / 2.0, self.metrics.title_y)
    }

    /// Returns the top-centre anchor of a string's label.
    pub fn string_label_anchor(&self, string: GuitarString) -> Point {
        Point::new(self.string_x(string), self.metrics.string_label_y)
    }

    /// Returns the top end and bottom end of a string's line.
    pub fn string_line(&self, string: GuitarString) -> (Point, Point) {
        let x = self.string_x(string);
        let bottom = self.canvas_size().height() - self.metrics.bottom_margin;
        (
            Point::new(x, self.metrics.top_margin),
            Point::new(x, bottom),
        )
    }

    /// Returns the left end and right end of fret line `fret`.
    pub fn fret_line(&self, fret: u32) -> (Point, Point) {
        let y = self.fret_line_y(fret);
        (
            Point::new(self.string_x(GuitarString::LowE), y),
            Point::new(self.string_x(GuitarString::HighE), y),
        )
    }

    /// Returns the top-left anchor of the number label of fret row `fret`.
    pub fn fret_label_anchor(&self, fret: u32) -> Point {
        Point::new(self.metrics.fret_label_x, self.fret_row_y(fret))
    }
}
