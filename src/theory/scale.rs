// Scales - Fixed catalog of named scales and degree lookup
// Degrees wrap cyclically, adding one octave per full pass through the scale

use super::TheoryError;
use super::note::{NoteName, Pitch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleKind {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    HarmonicMinor,
    #[serde(rename = "hungarianMin")]
    HungarianMinor,
    Locrian,
    PentatonicMaj,
    PentatonicMin,
    Blues,
    WholeTone,
    Chromatic,
}

impl Default for ScaleKind {
    fn default() -> Self {
        Self::Minor
    }
}

impl ScaleKind {
    pub const ALL: [ScaleKind; 14] = [
        ScaleKind::Major,
        ScaleKind::Minor,
        ScaleKind::Dorian,
        ScaleKind::Phrygian,
        ScaleKind::Lydian,
        ScaleKind::Mixolydian,
        ScaleKind::HarmonicMinor,
        ScaleKind::HungarianMinor,
        ScaleKind::Locrian,
        ScaleKind::PentatonicMaj,
        ScaleKind::PentatonicMin,
        ScaleKind::Blues,
        ScaleKind::WholeTone,
        ScaleKind::Chromatic,
    ];

    /// Semitone offsets of each degree from the root, ascending
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ScaleKind::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleKind::Minor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleKind::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleKind::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleKind::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleKind::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleKind::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleKind::HungarianMinor => &[0, 2, 3, 6, 7, 8, 11],
            ScaleKind::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            ScaleKind::PentatonicMaj => &[0, 2, 4, 7, 9],
            ScaleKind::PentatonicMin => &[0, 3, 5, 7, 10],
            ScaleKind::Blues => &[0, 3, 5, 6, 7, 10],
            ScaleKind::WholeTone => &[0, 2, 4, 6, 8, 10],
            ScaleKind::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    /// Catalog name, as used in snapshots
    pub fn name(self) -> &'static str {
        match self {
            ScaleKind::Major => "major",
            ScaleKind::Minor => "minor",
            ScaleKind::Dorian => "dorian",
            ScaleKind::Phrygian => "phrygian",
            ScaleKind::Lydian => "lydian",
            ScaleKind::Mixolydian => "mixolydian",
            ScaleKind::HarmonicMinor => "harmonicMinor",
            ScaleKind::HungarianMinor => "hungarianMin",
            ScaleKind::Locrian => "locrian",
            ScaleKind::PentatonicMaj => "pentatonicMaj",
            ScaleKind::PentatonicMin => "pentatonicMin",
            ScaleKind::Blues => "blues",
            ScaleKind::WholeTone => "wholeTone",
            ScaleKind::Chromatic => "chromatic",
        }
    }

    /// Interval of a degree index, wrapped into the scale (negatives wrap down)
    fn degree_offset(self, degree: i32) -> i32 {
        let intervals = self.intervals();
        let len = intervals.len() as i32;
        intervals[degree.rem_euclid(len) as usize] + degree.div_euclid(len) * 12
    }
}

impl FromStr for ScaleKind {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| TheoryError::UnknownScale(s.to_string()))
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Root and scale pair used by every melodic generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub root: NoteName,
    pub scale: ScaleKind,
}

impl Key {
    pub fn new(root: NoteName, scale: ScaleKind) -> Self {
        Self { root, scale }
    }

    /// Scale run starting at the root in `octave`
    pub fn notes(&self, octave: i32, count: usize) -> Vec<Pitch> {
        scale_notes(self.root, octave, self.scale, count)
    }

    /// Chord built from scale degrees above the root in `octave`
    pub fn chord(&self, octave: i32, degrees: &[i32]) -> Vec<Pitch> {
        chord_notes(self.root, octave, self.scale, degrees)
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::new(NoteName::C, ScaleKind::Minor)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale)
    }
}

/// The first `count` notes of a scale, ascending from `root` in `octave`
pub fn scale_notes(root: NoteName, octave: i32, scale: ScaleKind, count: usize) -> Vec<Pitch> {
    let base = root.at_octave(octave);
    (0..count as i32)
        .map(|i| base.transpose(scale.degree_offset(i)))
        .collect()
}

/// Pitches for an arbitrary list of scale degrees
///
/// Each degree is wrapped independently, so `-1` is the top degree one octave
/// down and `len + 1` is the second degree one octave up.
pub fn chord_notes(root: NoteName, octave: i32, scale: ScaleKind, degrees: &[i32]) -> Vec<Pitch> {
    let base = root.at_octave(octave);
    degrees
        .iter()
        .map(|&d| base.transpose(scale.degree_offset(d)))
        .collect()
}
