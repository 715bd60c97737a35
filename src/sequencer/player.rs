// Step player - Turns one resolved step into trigger events
// Chord voicings are fixed when the playback order is rebuilt

use super::event::{TriggerEvent, Voice, Voicing};
use crate::config::AmbientConfig;
use crate::pattern::chance::coin;
use crate::pattern::{Instrument, STEPS_PER_BAR};
use crate::session::Session;
use crate::theory::{Key, Pitch};
use rand::Rng;

/// Sub-trigger times for a step: `hits` evenly spaced within one sixteenth
pub fn hit_times(time: f64, hits: u8, sixteenth: f64) -> impl Iterator<Item = (u8, f64)> {
    let hits = hits.max(1);
    let spacing = sixteenth / hits as f64;
    (0..hits).map(move |h| (h, time + spacing * h as f64))
}

/// Sequencer player - converts session cells into trigger events
#[derive(Debug, Clone, PartialEq)]
pub struct StepPlayer {
    ambient: AmbientConfig,
    stab_chord: Vec<Pitch>,
    pad_root: Vec<Pitch>,
    pad_alt: Vec<Pitch>,
    sub: Pitch,
}

impl StepPlayer {
    pub fn new(key: Key, ambient: AmbientConfig) -> Self {
        Self {
            ambient,
            stab_chord: key.chord(4, &[0, 2, 4]),
            pad_root: key.chord(3, &[0, 2, 4]),
            pad_alt: key.chord(3, &[5, 0, 2]),
            sub: key.root.at_octave(1),
        }
    }

    /// Re-voice the chords for a new key
    pub fn set_key(&mut self, key: Key) {
        *self = Self::new(key, self.ambient);
    }

    pub fn ambient(&self) -> &AmbientConfig {
        &self.ambient
    }

    /// Events of every playable instrument at `step`, in role order
    pub fn render_step(&self, session: &Session, step: usize, time: f64, out: &mut Vec<TriggerEvent>) {
        let sixteenth = session.tempo.sixteenth_seconds();

        for inst in Instrument::ALL {
            let Some(cell) = session.playable_cell(inst, step) else {
                continue;
            };
            let voicing = match inst {
                Instrument::Stab => Voicing::Chord(self.stab_chord.clone()),
                _ => Voicing::from(cell.token),
            };
            let voice = Voice::Instrument(inst);
            for (h, t) in hit_times(time, cell.hits.get(), sixteenth) {
                out.push(TriggerEvent::new(voice, voicing.clone(), h, t));
            }
            if inst == Instrument::Kick {
                out.push(TriggerEvent::new(Voice::Sub, Voicing::Note(self.sub), 0, time));
            }
        }
    }

    /// Pad on bar starts and the riser `riser_lead_steps` before the end
    ///
    /// `remaining` is the playback length minus the current cursor.
    pub fn render_ambient<R: Rng + ?Sized>(
        &self,
        session: &Session,
        step: usize,
        remaining: usize,
        time: f64,
        rng: &mut R,
        out: &mut Vec<TriggerEvent>,
    ) {
        let intensity = session.intensity();

        if step % STEPS_PER_BAR == 0 && intensity >= self.ambient.pad_min_intensity {
            let alt = step > 0 && coin(rng, self.ambient.pad_alt_chord_probability);
            let chord = if alt { &self.pad_alt } else { &self.pad_root };
            out.push(TriggerEvent::new(Voice::Pad, Voicing::Chord(chord.clone()), 0, time));
        }

        if remaining == self.ambient.riser_lead_steps
            && intensity >= self.ambient.riser_min_intensity
            && coin(rng, self.ambient.riser_probability)
        {
            out.push(TriggerEvent::new(Voice::Riser, Voicing::Hit, 0, time));
        }
    }
}
