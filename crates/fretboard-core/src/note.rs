//! Chromatic pitch classes and note naming.
//!
//! Pitch classes are counted from A, so index `0` is A and index `11` is G#/Ab.
//! The same index can be spelled two ways depending on the [`NamingMode`]:
//!
//! | Index | Sharp | Flat |
//! |-------|-------|------|
//! | 0     | A     | A    |
//! | 1     | A#    | Bb   |
//! | 3     | C     | C    |
//! | 11    | G#    | Ab   |
//!
//! # Examples
//!
//! ```
//! # use fretboard_core::note::{NamingMode, PitchClass};
//! let a_sharp = PitchClass::new(1);
//! assert_eq!(a_sharp.name(NamingMode::Sharp), "A#");
//! assert_eq!(a_sharp.name(NamingMode::Flat), "Bb");
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, string::GuitarString};

/// Number of pitch classes in an octave.
pub const PITCH_CLASS_COUNT: u8 = 12;

/// Chromatic note names starting from A, spelled with sharps.
pub const SHARP_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// Chromatic note names starting from A, spelled with flats.
pub const FLAT_NAMES: [&str; 12] = [
    "A", "Bb", "B", "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab",
];

/// How accidentals are spelled in marker labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    /// Spell accidentals with sharps (`A#`, `C#`, ...)
    #[default]
    Sharp,
    /// Spell accidentals with flats (`Bb`, `Db`, ...)
    Flat,
}

impl NamingMode {
    /// Returns the chromatic table for this mode.
    pub fn table(self) -> &'static [&'static str; 12] {
        match self {
            Self::Sharp => &SHARP_NAMES,
            Self::Flat => &FLAT_NAMES,
        }
    }

    /// Returns the lowercase name used in requests and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sharp => "sharp",
            Self::Flat => "flat",
        }
    }
}

impl FromStr for NamingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharp" => Ok(Self::Sharp),
            "flat" => Ok(Self::Flat),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for NamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position in the 12-tone chromatic scale, counted from A.
///
/// The wrapped index is always reduced modulo 12, so every constructor and
/// operation yields a value in `0..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Creates a pitch class from any index, reducing it modulo 12.
    pub fn new(index: u32) -> Self {
        Self((index % u32::from(PITCH_CLASS_COUNT)) as u8)
    }

    /// Returns the chromatic index in `0..12`.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Moves this pitch class up by `semitones`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fretboard_core::note::PitchClass;
    /// // E (7) up three semitones is G (10); G up three wraps to A# (1).
    /// assert_eq!(PitchClass::new(7).transpose(3).index(), 10);
    /// assert_eq!(PitchClass::new(10).transpose(3).index(), 1);
    /// ```
    pub fn transpose(self, semitones: u32) -> Self {
        Self::new(u32::from(self.0) + semitones % u32::from(PITCH_CLASS_COUNT))
    }

    /// Returns the note name of this pitch class in the given mode.
    pub fn name(self, mode: NamingMode) -> &'static str {
        mode.table()[usize::from(self.0)]
    }
}

/// Returns the pitch class sounded by `string` when fretted at `fret`.
pub fn pitch_at(string: GuitarString, fret: u32) -> PitchClass {
    string.open_pitch().transpose(fret)
}

/// Resolves the note name for a fretted position.
///
/// This is `table[mode][(open_pitch[string] + fret) mod 12]`.
///
/// # Examples
///
/// ```
/// # use fretboard_core::{note::{note_name, NamingMode}, string::GuitarString};
/// assert_eq!(note_name(GuitarString::LowE, 3, NamingMode::Sharp), "G");
/// assert_eq!(note_name(GuitarString::A, 1, NamingMode::Flat), "Bb");
/// ```
pub fn note_name(string: GuitarString, fret: u32, mode: NamingMode) -> &'static str {
    pitch_at(string, fret).name(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_agree_on_naturals() {
        for (sharp, flat) in SHARP_NAMES.iter().zip(FLAT_NAMES.iter()) {
            if sharp.len() == 1 {
                assert_eq!(sharp, flat);
            } else {
                assert_ne!(sharp, flat);
            }
        }
    }

    #[test]
    fn test_pitch_class_wraps() {
        assert_eq!(PitchClass::new(12).index(), 0);
        assert_eq!(PitchClass::new(25).index(), 1);
        assert_eq!(PitchClass::new(11).transpose(1).index(), 0);
        // u32::MAX is 3 mod 12
        assert_eq!(PitchClass::new(7).transpose(u32::MAX).index(), 10);
    }

    #[test]
    fn test_low_e_third_fret_is_g() {
        assert_eq!(note_name(GuitarString::LowE, 3, NamingMode::Sharp), "G");
        assert_eq!(note_name(GuitarString::LowE, 3, NamingMode::Flat), "G");
    }

    #[test]
    fn test_b_first_fret_is_c() {
        assert_eq!(note_name(GuitarString::B, 1, NamingMode::Sharp), "C");
        assert_eq!(note_name(GuitarString::B, 1, NamingMode::Flat), "C");
    }

    #[test]
    fn test_a_first_fret_spellings_differ() {
        assert_eq!(note_name(GuitarString::A, 1, NamingMode::Sharp), "A#");
        assert_eq!(note_name(GuitarString::A, 1, NamingMode::Flat), "Bb");
    }

    #[test]
    fn test_open_strings() {
        let names: Vec<_> = GuitarString::ALL
            .iter()
            .map(|s| note_name(*s, 0, NamingMode::Sharp))
            .collect();
        assert_eq!(names, ["E", "A", "D", "G", "B", "E"]);
    }

    #[test]
    fn test_twelfth_fret_is_octave() {
        for string in GuitarString::ALL {
            assert_eq!(pitch_at(string, 12), pitch_at(string, 0));
        }
    }

    #[test]
    fn test_naming_mode_from_str() {
        assert_eq!("sharp".parse::<NamingMode>().unwrap(), NamingMode::Sharp);
        assert_eq!("FLAT".parse::<NamingMode>().unwrap(), NamingMode::Flat);
        assert!(matches!(
            "natural".parse::<NamingMode>(),
            Err(ValidationError::UnknownMode(mode)) if mode == "natural"
        ));
    }

    #[test]
    fn test_naming_mode_display_roundtrip() {
        for mode in [NamingMode::Sharp, NamingMode::Flat] {
            assert_eq!(mode.to_string().parse::<NamingMode>().unwrap(), mode);
        }
    }
}
