// Instrument gate - Per-instrument normal/forced/muted override
// Combines the gate state with the fixed intensity threshold

use crate::pattern::Instrument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback override for one instrument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    /// Plays when intensity reaches the instrument threshold
    #[default]
    Normal,
    /// Always plays
    Forced,
    /// Never plays
    Muted,
}

impl GateState {
    /// Next state in the normal, forced, muted rotation
    pub fn next(self) -> Self {
        match self {
            GateState::Normal => GateState::Forced,
            GateState::Forced => GateState::Muted,
            GateState::Muted => GateState::Normal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GateState::Normal => "normal",
            GateState::Forced => "forced",
            GateState::Muted => "muted",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an instrument in `state` may sound at `intensity`
pub fn can_play(state: GateState, instrument: Instrument, intensity: f32) -> bool {
    match state {
        GateState::Muted => false,
        GateState::Forced => true,
        GateState::Normal => intensity >= instrument.intensity_threshold(),
    }
}

/// Gate state for every instrument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gates([GateState; Instrument::COUNT]);

impl Gates {
    pub fn get(&self, instrument: Instrument) -> GateState {
        self.0[instrument.index()]
    }

    pub fn set(&mut self, instrument: Instrument, state: GateState) {
        self.0[instrument.index()] = state;
    }

    /// Rotate one instrument's state and return the new one
    pub fn cycle(&mut self, instrument: Instrument) -> GateState {
        let next = self.get(instrument).next();
        self.set(instrument, next);
        next
    }

    pub fn can_play(&self, instrument: Instrument, intensity: f32) -> bool {
        can_play(self.get(instrument), instrument, intensity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Instrument, GateState)> + '_ {
        Instrument::ALL.iter().map(|&inst| (inst, self.get(inst)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_never_forced_always() {
        for inst in Instrument::ALL {
            for intensity in [0.0, 0.3, 0.79, 1.0] {
                assert!(!can_play(GateState::Muted, inst, intensity));
                assert!(can_play(GateState::Forced, inst, intensity));
            }
        }
    }

    #[test]
    fn test_normal_uses_threshold() {
        assert!(can_play(GateState::Normal, Instrument::Kick, 0.0));
        assert!(!can_play(GateState::Normal, Instrument::Stab, 0.79));
        assert!(can_play(GateState::Normal, Instrument::Stab, 0.8));
        assert!(!can_play(GateState::Normal, Instrument::Lead, 0.5));
    }

    #[test]
    fn test_cycle_rotation() {
        let mut gates = Gates::default();
        assert_eq!(gates.cycle(Instrument::Hat), GateState::Forced);
        assert_eq!(gates.cycle(Instrument::Hat), GateState::Muted);
        assert_eq!(gates.cycle(Instrument::Hat), GateState::Normal);
        assert_eq!(gates.get(Instrument::Kick), GateState::Normal);
    }
}
