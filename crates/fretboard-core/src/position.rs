//! Marker positions per string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::string::GuitarString;

/// Fret positions to mark, grouped by string.
///
/// Fret lists are kept sorted and free of duplicates. A string with no entry
/// has no markers.
///
/// # Examples
///
/// ```
/// # use fretboard_core::{position::PositionMapping, string::GuitarString};
/// let mut positions = PositionMapping::new();
/// positions.insert(GuitarString::A, 3);
/// positions.insert(GuitarString::A, 0);
/// positions.insert(GuitarString::A, 3);
///
/// assert_eq!(positions.frets(GuitarString::A), &[0, 3]);
/// assert!(positions.frets(GuitarString::D).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<GuitarString, Vec<u32>>",
    into = "BTreeMap<GuitarString, Vec<u32>>"
)]
pub struct PositionMapping {
    frets: BTreeMap<GuitarString, Vec<u32>>,
}

impl PositionMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a marker on `string` at `fret`. Adding an existing marker is a no-op.
    pub fn insert(&mut self, string: GuitarString, fret: u32) {
        let frets = self.frets.entry(string).or_default();
        if let Err(index) = frets.binary_search(&fret) {
            frets.insert(index, fret);
        }
    }

    /// Builder-style [`insert`](Self::insert) for several frets at once.
    pub fn with_frets(mut self, string: GuitarString, frets: impl IntoIterator<Item = u32>) -> Self {
        for fret in frets {
            self.insert(string, fret);
        }
        self
    }

    /// Returns the sorted frets marked on `string`.
    pub fn frets(&self, string: GuitarString) -> &[u32] {
        self.frets.get(&string).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over every `(string, fret)` pair, low E first and frets ascending.
    pub fn iter(&self) -> impl Iterator<Item = (GuitarString, u32)> + '_ {
        self.frets
            .iter()
            .flat_map(|(string, frets)| frets.iter().map(move |fret| (*string, *fret)))
    }

    /// Returns the total number of markers.
    pub fn len(&self) -> usize {
        self.frets.values().map(Vec::len).sum()
    }

    /// Returns `true` if no markers are set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the highest marked fret, if any.
    pub fn max_fret(&self) -> Option<u32> {
        self.frets.values().filter_map(|frets| frets.last()).copied().max()
    }
}

impl From<BTreeMap<GuitarString, Vec<u32>>> for PositionMapping {
    fn from(raw: BTreeMap<GuitarString, Vec<u32>>) -> Self {
        raw.into_iter()
            .fold(Self::new(), |positions, (string, frets)| {
                positions.with_frets(string, frets)
            })
    }
}

impl From<PositionMapping> for BTreeMap<GuitarString, Vec<u32>> {
    fn from(positions: PositionMapping) -> Self {
        positions.frets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mapping() {
        let positions = PositionMapping::new();
        assert!(positions.is_empty());
        assert_eq!(positions.len(), 0);
        assert_eq!(positions.max_fret(), None);
        assert_eq!(positions.iter().count(), 0);
        for string in GuitarString::ALL {
            assert!(positions.frets(string).is_empty());
        }
    }

    #[test]
    fn test_iteration_order() {
        let positions = PositionMapping::new()
            .with_frets(GuitarString::HighE, [5, 0])
            .with_frets(GuitarString::LowE, [3]);

        let pairs: Vec<_> = positions.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (GuitarString::LowE, 3),
                (GuitarString::HighE, 0),
                (GuitarString::HighE, 5),
            ]
        );
        assert_eq!(positions.len(), 3);
        assert_eq!(positions.max_fret(), Some(5));
    }

    #[test]
    fn test_duplicates_collapse() {
        let positions = PositionMapping::new().with_frets(GuitarString::G, [2, 2, 1, 2]);
        assert_eq!(positions.frets(GuitarString::G), &[1, 2]);
    }

    #[test]
    fn test_serde_shape() {
        let positions = PositionMapping::new()
            .with_frets(GuitarString::LowE, [0, 3])
            .with_frets(GuitarString::HighE, [1]);

        let json = serde_json::to_string(&positions).unwrap();
        assert_eq!(json, r#"{"E":[0,3],"e":[1]}"#);

        let parsed: PositionMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, positions);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let parsed: PositionMapping = serde_json::from_str(r#"{"D":[5,2,5]}"#).unwrap();
        assert_eq!(parsed.frets(GuitarString::D), &[2, 5]);
    }
}
