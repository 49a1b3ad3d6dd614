//! Export of validated diagrams to images.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramRequest
//!     ↓ validate
//! Diagram
//!     ↓ svg (this module)
//! SVG document
//!     ↓ raster (this module)
//! JPEG / PNG bytes
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - Vector output via [`svg::SvgBuilder`] and [`svg::Svg`]
//! - [`raster`] - Rasterization and encoding of the SVG document
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`FretboardError`](crate::FretboardError) at the crate boundary.

pub mod raster;
pub mod svg;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Encoded image formats the raster backend can produce.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Returns the file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Returns the MIME type sent in HTTP responses.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(format!("unsupported image format `{s}` (expected jpeg or png)")),
        }
    }
}

/// An encoded image together with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    format: ImageFormat,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl RenderedImage {
    pub(crate) fn new(format: ImageFormat, width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            format,
            width,
            height,
            bytes,
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the encoded image.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the image and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Shorthand for `self.format().content_type()`.
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A style value could not be turned into a drawing theme.
    Style(String),
    /// The SVG document could not be turned into pixels.
    Render(String),
    /// The pixel buffer could not be encoded.
    Encode(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(msg) => write!(f, "Style error: {msg}"),
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Encode(err) => write!(f, "Encode error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Style(_) | Self::Render(_) => None,
            Self::Encode(err) => Some(err.as_ref()),
        }
    }
}
