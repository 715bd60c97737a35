// Cells - One sixteenth-note slot of a step pattern
// A cell is either absent (`None` in a track) or a voicing token plus hit count

use crate::theory::Pitch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pitch every kick cell carries (C1)
pub const KICK_PITCH: Pitch = Pitch::new(24);

/// Hi-hat articulation marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HatKind {
    Closed,
    Open,
    Accent,
    Roll,
}

impl HatKind {
    pub fn name(self) -> &'static str {
        match self {
            HatKind::Closed => "closed",
            HatKind::Open => "open",
            HatKind::Accent => "accent",
            HatKind::Roll => "roll",
        }
    }
}

/// Instrument-specific payload of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoicingToken {
    /// Pitched note (kick, bass, acid, lead)
    Note(Pitch),
    /// Hi-hat articulation
    Hat(HatKind),
    /// Constant marker for clap, perc and stab
    Hit,
}

impl fmt::Display for VoicingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoicingToken::Note(p) => write!(f, "{}", p),
            VoicingToken::Hat(h) => f.write_str(h.name()),
            VoicingToken::Hit => f.write_str("hit"),
        }
    }
}

/// Number of evenly spaced sub-triggers in one step, always 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct HitCount(u8);

impl HitCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub const ONE: HitCount = HitCount(1);

    /// Clamp any value into the valid range
    pub fn new(hits: u8) -> Self {
        Self(hits.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The next count in the toggle cycle; `None` after the maximum
    pub fn next(self) -> Option<Self> {
        (self.0 < Self::MAX).then(|| Self(self.0 + 1))
    }
}

impl Default for HitCount {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<u8> for HitCount {
    fn from(hits: u8) -> Self {
        Self::new(hits)
    }
}

impl From<HitCount> for u8 {
    fn from(hits: HitCount) -> Self {
        hits.0
    }
}

/// A non-empty step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub token: VoicingToken,
    pub hits: HitCount,
}

impl Cell {
    /// Single-hit cell, the shape every generator produces
    pub fn new(token: VoicingToken) -> Self {
        Self {
            token,
            hits: HitCount::ONE,
        }
    }

    pub fn with_hits(token: VoicingToken, hits: u8) -> Self {
        Self {
            token,
            hits: HitCount::new(hits),
        }
    }

    pub fn note(pitch: Pitch) -> Self {
        Self::new(VoicingToken::Note(pitch))
    }

    pub fn hat(kind: HatKind) -> Self {
        Self::new(VoicingToken::Hat(kind))
    }

    pub fn hit() -> Self {
        Self::new(VoicingToken::Hit)
    }

    pub fn kick() -> Self {
        Self::note(KICK_PITCH)
    }
}

/// One instrument's steps; `None` is an empty cell
pub type Track = Vec<Option<Cell>>;

/// Hit count of an optional cell, 0 when empty
pub fn hits_of(cell: Option<&Cell>) -> u8 {
    cell.map_or(0, |c| c.hits.get())
}
