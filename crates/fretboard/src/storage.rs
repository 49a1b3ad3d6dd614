//! Disk output: rendered images and diagram snapshots.
//!
//! Both are stored under a file stem derived from the diagram title, so a
//! title maps to exactly one image and one snapshot.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use fretboard_core::{
    diagram::Diagram, error::ValidationError, note::NamingMode, position::PositionMapping,
};

use crate::{error::FretboardError, export::RenderedImage};

/// Stem used when a title has no usable characters.
pub const FALLBACK_STEM: &str = "diagram";

/// Turns a diagram title into a file stem.
///
/// Characters outside `[A-Za-z0-9 _-]` become `_`, surrounding whitespace is
/// trimmed and an empty result falls back to [`FALLBACK_STEM`].
///
/// # Examples
///
/// ```
/// # use fretboard::storage::file_stem;
/// assert_eq!(file_stem("C major"), "C major");
/// assert_eq!(file_stem("../etc/passwd"), "___etc_passwd");
/// assert_eq!(file_stem("   "), "diagram");
/// ```
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = stem.trim();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Writes `image` to `<dir>/<stem>.<ext>` and returns the path written.
///
/// # Errors
///
/// Returns [`FretboardError::Io`] if the directory cannot be created or the
/// file cannot be written.
pub fn save_image(dir: &Path, title: &str, image: &RenderedImage) -> Result<PathBuf, FretboardError> {
    let path = dir.join(format!("{}.{}", file_stem(title), image.format().extension()));
    write_file(&path, image.bytes())?;
    info!(path:? = path, bytes = image.bytes().len(); "Image saved");
    Ok(path)
}

/// Writes `bytes` to `path`, creating missing parent directories.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FretboardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// The stored form of a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    title: String,
    frets: u32,
    #[serde(default)]
    mode: NamingMode,
    #[serde(default)]
    mapping: PositionMapping,
}

impl Snapshot {
    /// Returns the path of the snapshot for `title` inside `dir`.
    pub fn path_for(dir: &Path, title: &str) -> PathBuf {
        dir.join(format!("{}.json", file_stem(title)))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Writes the snapshot as pretty JSON under `dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Io`] on write failure.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, FretboardError> {
        let path = Self::path_for(dir, &self.title);
        let json = serde_json::to_vec_pretty(self)?;
        write_file(&path, &json)?;
        info!(path:? = path; "Snapshot saved");
        Ok(path)
    }

    /// Reads the snapshot stored for `title` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`FretboardError::Io`] if the file is missing or unreadable and
    /// [`FretboardError::Json`] if it is not a snapshot.
    pub fn load(dir: &Path, title: &str) -> Result<Self, FretboardError> {
        let path = Self::path_for(dir, title);
        debug!(path:? = path; "Loading snapshot");
        let json = fs::read(&path)?;
        Ok(serde_json::from_slice(&json)?)
    }

    /// Rebuilds the diagram, re-checking every position.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the stored positions no longer fit
    /// the stored fret count.
    pub fn into_diagram(self) -> Result<Diagram, ValidationError> {
        Diagram::new(self.title, self.frets, self.mode, self.mapping)
    }
}

impl From<&Diagram> for Snapshot {
    fn from(diagram: &Diagram) -> Self {
        Self {
            title: diagram.title().to_string(),
            frets: diagram.fret_count(),
            mode: diagram.mode(),
            mapping: diagram.positions().clone(),
        }
    }
}
