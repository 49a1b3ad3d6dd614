//! Untrusted diagram requests.
//!
//! A [`DiagramRequest`] mirrors the JSON accepted over HTTP and from request
//! files. Fields are kept loosely typed (signed frets, free-form string keys and
//! mode) so that [`DiagramRequest::validate`] can report exactly what is wrong
//! instead of failing inside the JSON decoder.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use fretboard_core::{
    diagram::{DEFAULT_FRET_COUNT, DEFAULT_TITLE, Diagram},
    error::ValidationError,
    note::NamingMode,
    position::PositionMapping,
    string::GuitarString,
};

use crate::config::LimitsConfig;

/// A diagram request as received from a client.
///
/// # Examples
///
/// ```
/// # use fretboard::{config::LimitsConfig, request::DiagramRequest};
/// let body = br#"{"title": "C", "frets": 3, "mode": "flat", "mapping": {"A": [1]}}"#;
/// let request = DiagramRequest::from_json(body).unwrap();
///
/// let diagram = request.validate(&LimitsConfig::default()).unwrap();
/// assert_eq!(diagram.markers().next().map(|(_, _, note)| note), Some("Bb"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramRequest {
    title: Option<String>,
    frets: Option<i64>,
    mode: Option<String>,
    mapping: BTreeMap<String, Vec<i64>>,
}

impl DiagramRequest {
    /// Creates an empty request; every field falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a request from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the body is not a JSON object of the
    /// expected shape.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_frets(mut self, frets: i64) -> Self {
        self.frets = Some(frets);
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Adds frets for the string `key`, keeping any already requested.
    pub fn with_position(mut self, key: impl Into<String>, frets: impl IntoIterator<Item = i64>) -> Self {
        self.mapping.entry(key.into()).or_default().extend(frets);
        self
    }

    /// Overrides every field set in `other`; mapping entries are merged per string.
    pub fn merge(mut self, other: DiagramRequest) -> Self {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.frets.is_some() {
            self.frets = other.frets;
        }
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        for (key, frets) in other.mapping {
            self = self.with_position(key, frets);
        }
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Checks the request against `limits` and builds a [`Diagram`].
    ///
    /// Checks run in a fixed order (mode, fret count, string keys, fret
    /// values), so the same bad request always reports the same error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self, limits: &LimitsConfig) -> Result<Diagram, ValidationError> {
        let mode = match &self.mode {
            Some(mode) => mode.parse::<NamingMode>()?,
            None => NamingMode::default(),
        };

        let fret_count = match self.frets {
            Some(frets) => limits.check_fret_count(frets)?,
            None => DEFAULT_FRET_COUNT.min(limits.max_frets()),
        };

        let strings = self
            .mapping
            .iter()
            .map(|(key, frets)| Ok((key.parse::<GuitarString>()?, frets)))
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let mut positions = PositionMapping::new();
        for (string, frets) in strings {
            for &fret in frets {
                if fret < 0 {
                    return Err(ValidationError::NegativeFret { string, fret });
                }
                let fret = u32::try_from(fret).map_err(|_| ValidationError::FretOutOfRange {
                    string,
                    fret,
                    fret_count,
                })?;
                positions.insert(string, fret);
            }
        }

        let title = self.title.as_deref().unwrap_or(DEFAULT_TITLE);
        debug!(title, fret_count, mode = mode.as_str(), markers = positions.len(); "Request validated");
        Diagram::new(title, fret_count, mode, positions)
    }
}

impl From<&Diagram> for DiagramRequest {
    fn from(diagram: &Diagram) -> Self {
        let mut request = DiagramRequest::new()
            .with_title(diagram.title())
            .with_frets(i64::from(diagram.fret_count()))
            .with_mode(diagram.mode().as_str());
        for string in GuitarString::ALL {
            let frets = diagram.positions().frets(string);
            if !frets.is_empty() {
                request = request.with_position(string.key(), frets.iter().map(|&f| i64::from(f)));
            }
        }
        request
    }
}
