//! The six strings of a guitar in standard tuning.
//!
//! Strings are ordered from the low E string (index 0, leftmost column) to the
//! high E string (index 5, rightmost column). Each string is addressed in
//! requests by a one-letter key; the two E strings are told apart by case:
//!
//! | Index | Key | Label | Open pitch class |
//! |-------|-----|-------|------------------|
//! | 0     | `E` | E     | 7                |
//! | 1     | `A` | A     | 0                |
//! | 2     | `D` | D     | 5                |
//! | 3     | `G` | G     | 10               |
//! | 4     | `B` | B     | 2                |
//! | 5     | `e` | E     | 7                |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{error::ValidationError, note::PitchClass};

/// Open-string pitch classes, low E to high E.
pub const OPEN_PITCHES: [u8; 6] = [7, 0, 5, 10, 2, 7];

/// A guitar string in standard tuning.
///
/// The derived ordering follows the string index, so maps keyed by
/// `GuitarString` iterate from low E to high E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuitarString {
    LowE,
    A,
    D,
    G,
    B,
    HighE,
}

impl GuitarString {
    /// All strings in column order.
    pub const ALL: [GuitarString; 6] = [
        Self::LowE,
        Self::A,
        Self::D,
        Self::G,
        Self::B,
        Self::HighE,
    ];

    /// Returns the string for a column index, or `None` outside `0..6`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the column index of this string.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the request key identifying this string.
    pub fn key(self) -> &'static str {
        match self {
            Self::LowE => "E",
            Self::A => "A",
            Self::D => "D",
            Self::G => "G",
            Self::B => "B",
            Self::HighE => "e",
        }
    }

    /// Returns the label drawn above the string's column.
    pub fn label(self) -> &'static str {
        match self {
            Self::LowE | Self::HighE => "E",
            other => other.key(),
        }
    }

    /// Returns the pitch class of the unfretted string.
    pub fn open_pitch(self) -> PitchClass {
        PitchClass::new(u32::from(OPEN_PITCHES[self.index()]))
    }
}

impl FromStr for GuitarString {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|string| string.key() == s)
            .ok_or_else(|| ValidationError::UnknownString(s.to_string()))
    }
}

impl fmt::Display for GuitarString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for GuitarString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for GuitarString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (index, string) in GuitarString::ALL.iter().enumerate() {
            assert_eq!(string.index(), index);
            assert_eq!(GuitarString::from_index(index), Some(*string));
        }
        assert_eq!(GuitarString::from_index(6), None);
    }

    #[test]
    fn test_key_parsing_is_case_sensitive() {
        assert_eq!("E".parse::<GuitarString>().unwrap(), GuitarString::LowE);
        assert_eq!("e".parse::<GuitarString>().unwrap(), GuitarString::HighE);
        assert_eq!("B".parse::<GuitarString>().unwrap(), GuitarString::B);
        assert!("b".parse::<GuitarString>().is_err());
        assert!(matches!(
            "el".parse::<GuitarString>(),
            Err(ValidationError::UnknownString(key)) if key == "el"
        ));
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = GuitarString::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["E", "A", "D", "G", "B", "E"]);
    }

    #[test]
    fn test_open_pitches() {
        assert_eq!(GuitarString::LowE.open_pitch().index(), 7);
        assert_eq!(GuitarString::A.open_pitch().index(), 0);
        assert_eq!(GuitarString::B.open_pitch().index(), 2);
        assert_eq!(GuitarString::HighE.open_pitch(), GuitarString::LowE.open_pitch());
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&GuitarString::HighE).unwrap();
        assert_eq!(json, "\"e\"");
        let parsed: GuitarString = serde_json::from_str("\"G\"").unwrap();
        assert_eq!(parsed, GuitarString::G);
        assert!(serde_json::from_str::<GuitarString>("\"X\"").is_err());
    }
}
