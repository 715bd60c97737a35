// Music theory - Note names, pitch numbers, scales and chord degrees
// Pure helpers shared by the pattern generators and the sequencer clock

pub mod note;
pub mod scale;

pub use note::{NoteName, Pitch, name_to_pitch, pitch_to_name};
pub use scale::{Key, ScaleKind, chord_notes, scale_notes};

/// Theory error types
///
/// Only malformed textual input fails; every numeric conversion is total.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TheoryError {
    #[error("Invalid note name: {0:?}")]
    InvalidNoteName(String),

    #[error("Invalid octave in note {0:?}")]
    InvalidOctave(String),

    #[error("Unknown scale: {0:?}")]
    UnknownScale(String),
}
