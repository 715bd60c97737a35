// Trigger events - What the clock hands to the voice layer
// Events are plain values; the voice layer owns nothing from the engine

use super::playback::ArrangementPosition;
use super::timeline::{NoteLength, Tempo};
use crate::pattern::{HatKind, Instrument, VoicingToken};
use crate::theory::Pitch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Destination voice of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// One of the eight sequenced instruments
    Instrument(Instrument),
    /// Sub-bass companion of the kick
    Sub,
    /// Bar-start harmonic pad
    Pad,
    /// One-shot riser before the loop turns over
    Riser,
}

impl Voice {
    /// Duration hint for a voicing on this voice
    pub fn duration_hint(self, voicing: &Voicing) -> NoteLength {
        match self {
            Voice::Instrument(inst) => match (inst, voicing) {
                (Instrument::Hat, Voicing::Hat(kind)) => hat_length(*kind),
                (Instrument::Kick | Instrument::Lead, _) => NoteLength::Eighth,
                (Instrument::Clap | Instrument::Acid | Instrument::Hat, _) => NoteLength::Sixteenth,
                (Instrument::Bass | Instrument::Perc | Instrument::Stab, _) => NoteLength::ThirtySecond,
            },
            Voice::Sub => NoteLength::Quarter,
            Voice::Pad | Voice::Riser => NoteLength::Bar,
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Voice::Instrument(inst) => f.write_str(inst.label()),
            Voice::Sub => f.write_str("SUB"),
            Voice::Pad => f.write_str("PAD"),
            Voice::Riser => f.write_str("RSR"),
        }
    }
}

fn hat_length(kind: HatKind) -> NoteLength {
    match kind {
        HatKind::Open => NoteLength::Sixteenth,
        HatKind::Closed | HatKind::Accent => NoteLength::ThirtySecond,
        HatKind::Roll => NoteLength::SixtyFourth,
    }
}

/// Resolved payload of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voicing {
    Note(Pitch),
    Chord(Vec<Pitch>),
    Hat(HatKind),
    Hit,
}

impl From<VoicingToken> for Voicing {
    fn from(token: VoicingToken) -> Self {
        match token {
            VoicingToken::Note(p) => Voicing::Note(p),
            VoicingToken::Hat(h) => Voicing::Hat(h),
            VoicingToken::Hit => Voicing::Hit,
        }
    }
}

impl fmt::Display for Voicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Voicing::Note(p) => write!(f, "{}", p),
            Voicing::Chord(notes) => {
                let names: Vec<String> = notes.iter().map(Pitch::to_string).collect();
                write!(f, "[{}]", names.join(" "))
            }
            Voicing::Hat(h) => f.write_str(h.name()),
            Voicing::Hit => f.write_str("hit"),
        }
    }
}

/// One trigger for the voice layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub voice: Voice,
    pub voicing: Voicing,
    /// 0-based sub-trigger index within the step
    pub hit_index: u8,
    /// Transport time in seconds
    pub time: f64,
    pub duration: NoteLength,
}

impl TriggerEvent {
    pub fn new(voice: Voice, voicing: Voicing, hit_index: u8, time: f64) -> Self {
        let duration = voice.duration_hint(&voicing);
        Self {
            voice,
            voicing,
            hit_index,
            time,
            duration,
        }
    }

    pub fn duration_seconds(&self, tempo: &Tempo) -> f64 {
        self.duration.seconds(tempo)
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8.4}s {} {} #{} ({})",
            self.time, self.voice, self.voicing, self.hit_index, self.duration
        )
    }
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Cursor into the playback order
    pub cursor: usize,
    /// Absolute pattern step the cursor resolved to
    pub step: usize,
    pub time: f64,
    /// Set in song mode only
    pub position: Option<ArrangementPosition>,
    pub events: Vec<TriggerEvent>,
}

impl TickReport {
    pub fn events_for(&self, voice: Voice) -> impl Iterator<Item = &TriggerEvent> + '_ {
        self.events.iter().filter(move |e| e.voice == voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_hints() {
        let kick = Voice::Instrument(Instrument::Kick);
        assert_eq!(kick.duration_hint(&Voicing::Note(Pitch::new(24))), NoteLength::Eighth);
        let hat = Voice::Instrument(Instrument::Hat);
        assert_eq!(hat.duration_hint(&Voicing::Hat(HatKind::Open)), NoteLength::Sixteenth);
        assert_eq!(hat.duration_hint(&Voicing::Hat(HatKind::Roll)), NoteLength::SixtyFourth);
        assert_eq!(Voice::Pad.duration_hint(&Voicing::Hit), NoteLength::Bar);
        assert_eq!(Voice::Sub.duration_hint(&Voicing::Hit), NoteLength::Quarter);
    }

    #[test]
    fn test_display() {
        let e = TriggerEvent::new(
            Voice::Pad,
            Voicing::Chord(vec![Pitch::new(48), Pitch::new(51)]),
            0,
            0.5,
        );
        let text = e.to_string();
        assert!(text.contains("PAD"));
        assert!(text.contains("[C3 D#3]"));
    }
}
