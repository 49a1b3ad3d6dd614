//! Validated diagram parameters.

use log::trace;

use crate::{
    error::ValidationError,
    note::{NamingMode, note_name},
    position::PositionMapping,
    string::GuitarString,
};

/// Title used when a request does not name its diagram.
pub const DEFAULT_TITLE: &str = "Guitar Fretboard";

/// Fret count used when a request does not specify one.
pub const DEFAULT_FRET_COUNT: u32 = 12;

/// Everything needed to render one fretboard diagram.
///
/// A `Diagram` can only be built through [`Diagram::new`], which checks that
/// every marked fret lies on the drawn fretboard. Renderers can therefore
/// take a `&Diagram` without re-validating.
///
/// # Examples
///
/// ```
/// # use fretboard_core::{diagram::Diagram, note::NamingMode, position::PositionMapping, string::GuitarString};
/// let positions = PositionMapping::new().with_frets(GuitarString::A, [3]);
/// let diagram = Diagram::new("C", 5, NamingMode::Sharp, positions).unwrap();
/// assert_eq!(diagram.fret_count(), 5);
///
/// let positions = PositionMapping::new().with_frets(GuitarString::A, [7]);
/// assert!(Diagram::new("C", 5, NamingMode::Sharp, positions).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    title: String,
    fret_count: u32,
    mode: NamingMode,
    positions: PositionMapping,
}

impl Diagram {
    /// Creates a diagram after checking every position against `fret_count`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FretOutOfRange`] for the first marked fret
    /// greater than `fret_count`.
    pub fn new(
        title: impl Into<String>,
        fret_count: u32,
        mode: NamingMode,
        positions: PositionMapping,
    ) -> Result<Self, ValidationError> {
        if let Some((string, fret)) = positions.iter().find(|(_, fret)| *fret > fret_count) {
            return Err(ValidationError::FretOutOfRange {
                string,
                fret: i64::from(fret),
                fret_count,
            });
        }

        let diagram = Self {
            title: title.into(),
            fret_count,
            mode,
            positions,
        };
        trace!(diagram:?; "Diagram validated");
        Ok(diagram)
    }

    /// Returns the diagram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the number of frets drawn below the nut.
    pub fn fret_count(&self) -> u32 {
        self.fret_count
    }

    /// Returns the accidental spelling for marker labels.
    pub fn mode(&self) -> NamingMode {
        self.mode
    }

    /// Returns the marked positions.
    pub fn positions(&self) -> &PositionMapping {
        &self.positions
    }

    /// Iterates over every marker with its resolved note name.
    pub fn markers(&self) -> impl Iterator<Item = (GuitarString, u32, &'static str)> + '_ {
        self.positions
            .iter()
            .map(|(string, fret)| (string, fret, note_name(string, fret, self.mode)))
    }
}
