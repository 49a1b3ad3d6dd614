//! Fretboard - guitar fretboard diagrams rendered to images.
//!
//! Request validation, SVG scene construction, rasterization and disk output
//! for fretboard diagrams. The domain model lives in `fretboard-core` and is
//! re-exported here.

pub mod config;
pub mod export;
pub mod request;
pub mod storage;

mod error;

pub use fretboard_core::{color, diagram, draw, geometry, layout, note, position, string};

pub use error::FretboardError;
pub use fretboard_core::error::ValidationError;

use std::path::{Path, PathBuf};

use log::{debug, info};

use config::AppConfig;
use diagram::Diagram;
use export::{RenderedImage, raster::Rasterizer, svg::SvgBuilder};
use request::DiagramRequest;
use storage::Snapshot;

/// Builder for validating and rendering fretboard diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use fretboard::{DiagramBuilder, config::AppConfig, request::DiagramRequest};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let request = DiagramRequest::new()
///     .with_title("E minor")
///     .with_frets(5)
///     .with_position("A", [2])
///     .with_position("D", [2]);
///
/// let diagram = builder.diagram(&request)
///     .expect("Invalid request");
///
/// let image = builder.render_image(&diagram)
///     .expect("Failed to render");
///
/// builder.save_image(&diagram, &image, None)
///     .expect("Failed to save");
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout, style, output and limit settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder renders with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate a request into a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Validation`] for unknown strings or modes,
    /// fret counts outside the configured limits, and frets that are
    /// negative or beyond the fret count.
    ///
    /// # Examples
    ///
    /// ```
    /// use fretboard::{DiagramBuilder, FretboardError, request::DiagramRequest};
    ///
    /// let builder = DiagramBuilder::default();
    /// let request = DiagramRequest::new().with_frets(3).with_position("B", [4]);
    ///
    /// let err = builder.diagram(&request).unwrap_err();
    /// assert!(matches!(err, FretboardError::Validation(_)));
    /// ```
    pub fn diagram(&self, request: &DiagramRequest) -> Result<Diagram, FretboardError> {
        info!(title:? = request.title(); "Validating request");
        let diagram = request.validate(self.config.limits())?;
        debug!(markers = diagram.positions().len(); "Request accepted");
        Ok(diagram)
    }

    /// Render a diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Config`] if the style holds an invalid color.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, FretboardError> {
        info!(title = diagram.title(), fret_count = diagram.fret_count(); "Rendering SVG");

        let svg = SvgBuilder::new(*self.config.layout())
            .with_style(self.config.style())
            .build()?;
        let document = svg.render_diagram(diagram);

        Ok(document.to_string())
    }

    /// Render a diagram to an encoded image in the configured format.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Config`] for an invalid style,
    /// [`FretboardError::Render`] if rasterization fails and
    /// [`FretboardError::Encode`] if encoding fails.
    pub fn render_image(&self, diagram: &Diagram) -> Result<RenderedImage, FretboardError> {
        let svg = self.render_svg(diagram)?;

        let output = self.config.output();
        let rasterizer = Rasterizer::new(output.format(), output.jpeg_quality());
        let image = rasterizer.rasterize(&svg)?;

        info!(
            format:% = image.format(),
            width = image.width(),
            height = image.height();
            "Image rendered"
        );
        Ok(image)
    }

    /// Write a rendered image to disk.
    ///
    /// With `path` set the image is written exactly there; otherwise it goes
    /// to `<save_dir>/<title>.<ext>` with the title made file-name safe.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Io`] on write failure.
    pub fn save_image(
        &self,
        diagram: &Diagram,
        image: &RenderedImage,
        path: Option<&Path>,
    ) -> Result<PathBuf, FretboardError> {
        match path {
            Some(path) => {
                storage::write_file(path, image.bytes())?;
                info!(path:? = path; "Image saved");
                Ok(path.to_path_buf())
            }
            None => storage::save_image(self.config.output().save_dir(), diagram.title(), image),
        }
    }

    /// Store a snapshot of the diagram under the configured snapshot directory.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Io`] on write failure.
    pub fn save_snapshot(&self, diagram: &Diagram) -> Result<PathBuf, FretboardError> {
        Snapshot::from(diagram).save(self.config.output().snapshot_dir())
    }

    /// Load the snapshot stored for `title` and rebuild its diagram.
    ///
    /// The stored diagram is checked against the current limits again.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Io`] if no snapshot exists,
    /// [`FretboardError::Json`] if the file is corrupt and
    /// [`FretboardError::Validation`] if it no longer validates.
    pub fn load_snapshot(&self, title: &str) -> Result<Diagram, FretboardError> {
        let snapshot = Snapshot::load(self.config.output().snapshot_dir(), title)?;
        let diagram = snapshot.into_diagram()?;
        self.config
            .limits()
            .check_fret_count(i64::from(diagram.fret_count()))?;
        info!(title = diagram.title(); "Snapshot loaded");
        Ok(diagram)
    }
}
