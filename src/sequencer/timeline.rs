// Timeline - Tempo and note-length arithmetic
// A step is one sixteenth note; a bar is sixteen steps in 4/4

use std::fmt;

/// Tempo in BPM (Beats Per Minute)
///
/// Always kept inside [`Tempo::MIN_BPM`, `Tempo::MAX_BPM`]; out-of-range
/// values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub const MIN_BPM: f64 = 20.0;
    pub const MAX_BPM: f64 = 999.0;

    /// Creates a new tempo, clamping into the supported range
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: Self::clamp_bpm(bpm),
        }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set BPM value (clamped)
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = Self::clamp_bpm(bpm);
    }

    /// Whether `bpm` would be stored unchanged
    pub fn is_in_range(bpm: f64) -> bool {
        (Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm)
    }

    fn clamp_bpm(bpm: f64) -> f64 {
        if bpm.is_nan() {
            log::warn!("NaN tempo replaced by {} BPM", Self::MIN_BPM);
            return Self::MIN_BPM;
        }
        bpm.clamp(Self::MIN_BPM, Self::MAX_BPM)
    }

    /// Duration of one beat (quarter note) in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one step (sixteenth note) in seconds
    pub fn sixteenth_seconds(&self) -> f64 {
        self.beat_duration_seconds() / 4.0
    }

    /// Duration of one 4/4 bar in seconds
    pub fn bar_duration_seconds(&self) -> f64 {
        self.beat_duration_seconds() * 4.0
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(128.0)
    }
}

impl From<f64> for Tempo {
    fn from(bpm: f64) -> Self {
        Self::new(bpm)
    }
}

impl From<Tempo> for f64 {
    fn from(tempo: Tempo) -> Self {
        tempo.bpm
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

/// Symbolic note length used as a duration hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLength {
    Bar,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl NoteLength {
    /// Length as a fraction of a whole note
    pub fn fraction(self) -> f64 {
        match self {
            NoteLength::Bar => 1.0,
            NoteLength::Quarter => 0.25,
            NoteLength::Eighth => 0.125,
            NoteLength::Sixteenth => 0.0625,
            NoteLength::ThirtySecond => 0.03125,
            NoteLength::SixtyFourth => 0.015625,
        }
    }

    /// Length in seconds at a given tempo
    pub fn seconds(self, tempo: &Tempo) -> f64 {
        tempo.bar_duration_seconds() * self.fraction()
    }

    /// Conventional shorthand ("4n", "16n", "1m")
    pub fn notation(self) -> &'static str {
        match self {
            NoteLength::Bar => "1m",
            NoteLength::Quarter => "4n",
            NoteLength::Eighth => "8n",
            NoteLength::Sixteenth => "16n",
            NoteLength::ThirtySecond => "32n",
            NoteLength::SixtyFourth => "64n",
        }
    }
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}
