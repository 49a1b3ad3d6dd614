//! Validation errors for diagram parameters.
//!
//! Every check runs before anything is drawn, so a [`ValidationError`] means
//! no image was produced.

use thiserror::Error;

use crate::string::GuitarString;

/// A diagram request that cannot be rendered as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown string `{0}` (expected one of E, A, D, G, B, e)")]
    UnknownString(String),

    #[error("unknown naming mode `{0}` (expected `sharp` or `flat`)")]
    UnknownMode(String),

    #[error("fret count must not be negative, got {0}")]
    NegativeFretCount(i64),

    #[error("fret count {requested} exceeds the maximum of {max}")]
    TooManyFrets { requested: i64, max: u32 },

    #[error("string {string}: fret {fret} is negative")]
    NegativeFret { string: GuitarString, fret: i64 },

    #[error("string {string}: fret {fret} is beyond the last fret ({fret_count})")]
    FretOutOfRange {
        string: GuitarString,
        fret: i64,
        fret_count: u32,
    },
}

impl ValidationError {
    /// A short hint on how to fix the request.
    pub fn help(&self) -> &'static str {
        match self {
            Self::UnknownString(_) => "use `E` for the low E string and `e` for the high E string",
            Self::UnknownMode(_) => "set `mode` to `sharp` or `flat`",
            Self::NegativeFretCount(_) | Self::TooManyFrets { .. } => {
                "choose a fret count between 0 and the configured maximum"
            }
            Self::NegativeFret { .. } => "use 0 for an open string",
            Self::FretOutOfRange { .. } => "raise the fret count or remove the position",
        }
    }
}
