//! Configuration types for fretboard rendering.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! configuration file only needs the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`LayoutMetrics`] - Pixel spacing of the fretboard grid.
//! - [`StyleConfig`] - Colors, fonts and line width.
//! - [`OutputConfig`] - Image format and output directories.
//! - [`LimitsConfig`] - Bounds on accepted requests.
//!
//! # Example
//!
//! ```
//! # use fretboard::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.limits().max_frets(), 24);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use fretboard_core::{color::Color, error::ValidationError};

pub use fretboard_core::layout::LayoutMetrics;

use crate::export::ImageFormat;

/// Top-level configuration combining every section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout section.
    #[serde(default)]
    layout: LayoutMetrics,

    /// Style section.
    #[serde(default)]
    style: StyleConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,

    /// Limits section.
    #[serde(default)]
    limits: LimitsConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutMetrics,
        style: StyleConfig,
        output: OutputConfig,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            layout,
            style,
            output,
            limits,
        }
    }

    /// Returns the layout metrics.
    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the request limits.
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Checks the values that are only parsed when used.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid style color.
    pub fn validate(&self) -> Result<(), String> {
        self.style.validate()
    }

    /// Returns a copy with a different output section.
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}

/// Visual styling configuration.
///
/// Colors are kept as CSS color strings and parsed on access, so a bad value
/// is reported with the name of the offending field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: String,
    line_color: String,
    text_color: String,
    marker_color: String,
    marker_text_color: String,
    font_family: String,
    title_font_size: u16,
    label_font_size: u16,
    note_font_size: u16,
    line_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "white".to_string(),
            line_color: "black".to_string(),
            text_color: "black".to_string(),
            marker_color: "black".to_string(),
            marker_text_color: "white".to_string(),
            font_family: "Times New Roman, serif".to_string(),
            title_font_size: 40,
            label_font_size: 25,
            note_font_size: 20,
            line_width: 2.0,
        }
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}"))
}

impl StyleConfig {
    /// Parses every color, returning the first failure.
    pub fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        self.line_color()?;
        self.text_color()?;
        self.marker_color()?;
        self.marker_text_color()?;
        Ok(())
    }

    /// Returns the parsed canvas background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid CSS color.
    pub fn background_color(&self) -> Result<Color, String> {
        parse_color("background_color", &self.background_color)
    }

    /// Returns the parsed color of string and fret lines.
    pub fn line_color(&self) -> Result<Color, String> {
        parse_color("line_color", &self.line_color)
    }

    /// Returns the parsed color of the title and grid labels.
    pub fn text_color(&self) -> Result<Color, String> {
        parse_color("text_color", &self.text_color)
    }

    /// Returns the parsed marker fill color.
    pub fn marker_color(&self) -> Result<Color, String> {
        parse_color("marker_color", &self.marker_color)
    }

    /// Returns the parsed color of note names inside markers.
    pub fn marker_text_color(&self) -> Result<Color, String> {
        parse_color("marker_text_color", &self.marker_text_color)
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn title_font_size(&self) -> u16 {
        self.title_font_size
    }

    pub fn label_font_size(&self) -> u16 {
        self.label_font_size
    }

    pub fn note_font_size(&self) -> u16 {
        self.note_font_size
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }
}

/// Image format and output locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    format: ImageFormat,
    jpeg_quality: u8,
    save_dir: PathBuf,
    snapshot_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            jpeg_quality: 90,
            save_dir: PathBuf::from("saves"),
            snapshot_dir: PathBuf::from("serialized"),
        }
    }
}

impl OutputConfig {
    /// Returns a copy writing to `format`.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns a copy storing images under `dir`.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    /// Returns a copy storing snapshots under `dir`.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the JPEG quality, clamped to `1..=100`.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }
}

/// Bounds on accepted requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    max_frets: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_frets: 24 }
    }
}

impl LimitsConfig {
    /// Creates limits allowing at most `max_frets` frets.
    pub fn new(max_frets: u32) -> Self {
        Self { max_frets }
    }

    /// Returns the largest accepted fret count.
    pub fn max_frets(&self) -> u32 {
        self.max_frets
    }

    /// Checks a requested fret count and converts it to `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeFretCount`] or
    /// [`ValidationError::TooManyFrets`].
    pub fn check_fret_count(&self, requested: i64) -> Result<u32, ValidationError> {
        if requested < 0 {
            return Err(ValidationError::NegativeFretCount(requested));
        }
        match u32::try_from(requested) {
            Ok(count) if count <= self.max_frets => Ok(count),
            _ => Err(ValidationError::TooManyFrets {
                requested,
                max: self.max_frets,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_parses() {
        let style = StyleConfig::default();
        assert_eq!(style.background_color().unwrap().to_string(), "white");
        assert_eq!(style.marker_text_color().unwrap().to_string(), "white");
        assert!(style.line_color().is_ok());
        assert!(style.text_color().is_ok());
        assert!(style.marker_color().is_ok());
    }

    #[test]
    fn test_partial_style_from_json() {
        let style: StyleConfig =
            serde_json::from_str(r##"{"marker_color": "#336699", "note_font_size": 18}"##).unwrap();
        assert_eq!(style.note_font_size(), 18);
        assert_eq!(style.title_font_size(), 40);
        assert!(style.marker_color().is_ok());
    }

    #[test]
    fn test_invalid_color_names_the_field() {
        let style: StyleConfig = serde_json::from_str(r#"{"line_color": "nope"}"#).unwrap();
        let err = style.line_color().unwrap_err();
        assert!(err.contains("line_color"));
        assert_eq!(style.validate().unwrap_err(), err);
    }

    #[test]
    fn test_app_config_sections_default() {
        let config: AppConfig =
            serde_json::from_str(r#"{"limits": {"max_frets": 30}, "output": {"format": "png"}}"#)
                .unwrap();
        assert_eq!(config.limits().max_frets(), 30);
        assert_eq!(config.output().format(), ImageFormat::Png);
        assert_eq!(config.output().jpeg_quality(), 90);
        assert_eq!(config.layout(), &LayoutMetrics::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_defaults() {
        let output = OutputConfig::default();
        assert_eq!(output.format(), ImageFormat::Jpeg);
        assert_eq!(output.jpeg_quality(), 90);
        assert_eq!(output.save_dir(), Path::new("saves"));
        assert_eq!(output.snapshot_dir(), Path::new("serialized"));
    }

    #[test]
    fn test_jpeg_quality_is_clamped() {
        let output: OutputConfig = serde_json::from_str(r#"{"jpeg_quality": 0}"#).unwrap();
        assert_eq!(output.jpeg_quality(), 1);
        let output: OutputConfig = serde_json::from_str(r#"{"jpeg_quality": 250}"#).unwrap();
        assert_eq!(output.jpeg_quality(), 100);
    }

    #[test]
    fn test_check_fret_count() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.check_fret_count(0), Ok(0));
        assert_eq!(limits.check_fret_count(24), Ok(24));
        assert_eq!(
            limits.check_fret_count(-1),
            Err(ValidationError::NegativeFretCount(-1))
        );
        assert_eq!(
            limits.check_fret_count(25),
            Err(ValidationError::TooManyFrets {
                requested: 25,
                max: 24
            })
        );
        assert!(limits.check_fret_count(i64::MAX).is_err());
    }
}
