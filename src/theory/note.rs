// Note names - Pitch classes and semitone pitch numbers
// Pitch numbering follows MIDI: C4 = 60, octave -1 starts at 0

use super::TheoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the twelve pitch classes, spelled with sharps
///
/// Serialized as its name string ("C#"), so flats are accepted on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NoteName {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl NoteName {
    /// All pitch classes in ascending order from C
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::CSharp,
        NoteName::D,
        NoteName::DSharp,
        NoteName::E,
        NoteName::F,
        NoteName::FSharp,
        NoteName::G,
        NoteName::GSharp,
        NoteName::A,
        NoteName::ASharp,
        NoteName::B,
    ];

    /// Pitch class number (C = 0 ... B = 11)
    pub fn pitch_class(self) -> i32 {
        self as i32
    }

    /// Pitch class for any semitone number, wrapping negatives
    pub fn from_pitch_class(pc: i32) -> Self {
        Self::ALL[pc.rem_euclid(12) as usize]
    }

    /// Sharp spelling ("C#", never "Db")
    pub fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::CSharp => "C#",
            NoteName::D => "D",
            NoteName::DSharp => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::FSharp => "F#",
            NoteName::G => "G",
            NoteName::GSharp => "G#",
            NoteName::A => "A",
            NoteName::ASharp => "A#",
            NoteName::B => "B",
        }
    }

    /// The pitch of this note name in the given octave
    pub fn at_octave(self, octave: i32) -> Pitch {
        Pitch((octave + 1) * 12 + self.pitch_class())
    }

    /// Like `at_octave`, but `None` when the pitch number would overflow
    pub fn checked_at_octave(self, octave: i32) -> Option<Pitch> {
        octave
            .checked_add(1)?
            .checked_mul(12)?
            .checked_add(self.pitch_class())
            .map(Pitch)
    }
}

impl FromStr for NoteName {
    type Err = TheoryError;

    /// Accepts sharp spellings and the five common flats
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "Db" => "C#",
            "Eb" => "D#",
            "Gb" => "F#",
            "Ab" => "G#",
            "Bb" => "A#",
            other => other,
        };

        Self::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == name)
            .ok_or_else(|| TheoryError::InvalidNoteName(s.to_string()))
    }
}

impl TryFrom<String> for NoteName {
    type Error = TheoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NoteName> for String {
    fn from(name: NoteName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semitone pitch number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pitch(pub i32);

impl Pitch {
    pub const fn new(semitones: i32) -> Self {
        Self(semitones)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Shift by a number of semitones
    pub fn transpose(self, semitones: i32) -> Self {
        Self(self.0 + semitones)
    }

    pub fn name(self) -> NoteName {
        NoteName::from_pitch_class(self.0)
    }

    pub fn octave(self) -> i32 {
        self.0.div_euclid(12) - 1
    }
}

impl FromStr for Pitch {
    type Err = TheoryError;

    /// Parse "C#4", "Bb-1", "A0" style strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c == '-' || c.is_ascii_digit())
            .ok_or_else(|| TheoryError::InvalidNoteName(s.to_string()))?;
        let (name, octave) = s.split_at(split);
        let octave: i32 = octave
            .parse()
            .map_err(|_| TheoryError::InvalidOctave(s.to_string()))?;
        name_to_pitch(name, octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}

/// Split a pitch into its sharp-spelled name and octave
pub fn pitch_to_name(pitch: Pitch) -> (NoteName, i32) {
    (pitch.name(), pitch.octave())
}

/// Resolve a note name string and octave to a pitch
///
/// Fails with `InvalidNoteName` for anything outside the twelve sharp names
/// and the five accepted flats, and with `InvalidOctave` when the octave is
/// too large to number.
pub fn name_to_pitch(name: &str, octave: i32) -> Result<Pitch, TheoryError> {
    let note: NoteName = name.parse()?;
    note.checked_at_octave(octave)
        .ok_or_else(|| TheoryError::InvalidOctave(format!("{}{}", name, octave)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitches() {
        assert_eq!(name_to_pitch("C", 4).unwrap(), Pitch(60));
        assert_eq!(name_to_pitch("A", 4).unwrap(), Pitch(69));
        assert_eq!(name_to_pitch("C", -1).unwrap(), Pitch(0));
        assert_eq!(name_to_pitch("C", 1).unwrap(), Pitch(24));
    }

    #[test]
    fn test_round_trip_all_names() {
        for octave in -2..=9 {
            for name in NoteName::ALL {
                let pitch = name_to_pitch(name.as_str(), octave).unwrap();
                let (back_name, back_octave) = pitch_to_name(pitch);
                assert_eq!(back_name, name);
                assert_eq!(back_octave, octave);
                assert_eq!(name_to_pitch(back_name.as_str(), back_octave).unwrap(), pitch);
            }
        }
    }

    #[test]
    fn test_flats_normalize_to_sharps() {
        assert_eq!(name_to_pitch("Bb", 3).unwrap(), name_to_pitch("A#", 3).unwrap());
        assert_eq!(name_to_pitch("Db", 2).unwrap().name(), NoteName::CSharp);
        assert_eq!("Eb".parse::<NoteName>().unwrap(), NoteName::DSharp);
    }

    #[test]
    fn test_invalid_names_fail() {
        assert!(matches!(
            name_to_pitch("H", 4),
            Err(TheoryError::InvalidNoteName(_))
        ));
        assert!(name_to_pitch("", 4).is_err());
        assert!(name_to_pitch("c", 4).is_err());
        assert!("X#3".parse::<Pitch>().is_err());
        assert!("C#".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_huge_octaves_fail() {
        assert!(matches!(
            "C999999999".parse::<Pitch>(),
            Err(TheoryError::InvalidOctave(_))
        ));
        assert!(matches!(
            name_to_pitch("C", i32::MAX),
            Err(TheoryError::InvalidOctave(_))
        ));
        assert!(name_to_pitch("B", i32::MIN).is_err());
        assert!("C99999999999".parse::<Pitch>().is_err());
        assert_eq!(NoteName::G.checked_at_octave(9), Some(Pitch(127)));
    }

    #[test]
    fn test_parse_and_display() {
        let pitch: Pitch = "C#4".parse().unwrap();
        assert_eq!(pitch, Pitch(61));
        assert_eq!(pitch.to_string(), "C#4");

        let low: Pitch = "B-1".parse().unwrap();
        assert_eq!(low, Pitch(11));
        assert_eq!(low.to_string(), "B-1");

        assert_eq!(Pitch(-1).to_string(), "B-2");
    }

    #[test]
    fn test_transpose() {
        let c1 = NoteName::C.at_octave(1);
        assert_eq!(c1.transpose(12), NoteName::C.at_octave(2));
        assert_eq!(c1.transpose(-1).name(), NoteName::B);
    }
}
