// Bridge bars - Rule-based transition bars appended to the loop
// Placement is structural; only a few accents are left to chance

use super::PatternError;
use super::STEPS_PER_BAR;
use super::cell::{Cell, HatKind, VoicingToken};
use super::chance::{coin, pick};
use super::instrument::Instrument;
use super::store::PatternStore;
use crate::theory::Key;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of transition bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeKind {
    /// Hats ramp up in density and hit count; kick drops out near the end
    #[default]
    Buildup,
    /// Stripped back to a sparse acid line and one stab
    Breakdown,
    /// Dense drum fill with clap rolls
    Fill,
    /// Full energy: four-on-the-floor, octave bass, accented hats
    Drop,
}

impl BridgeKind {
    pub const ALL: [BridgeKind; 4] = [
        BridgeKind::Buildup,
        BridgeKind::Breakdown,
        BridgeKind::Fill,
        BridgeKind::Drop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BridgeKind::Buildup => "buildup",
            BridgeKind::Breakdown => "breakdown",
            BridgeKind::Fill => "fill",
            BridgeKind::Drop => "drop",
        }
    }
}

impl FromStr for BridgeKind {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| PatternError::UnknownBridgeKind(s.to_string()))
    }
}

impl fmt::Display for BridgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Append a bar to `store` and fill it according to `kind`
///
/// Returns the index of the new bar.
pub fn append_bridge<R: Rng + ?Sized>(
    store: &mut PatternStore,
    kind: BridgeKind,
    key: Key,
    rng: &mut R,
) -> usize {
    let bar = store.append_bar();
    store.clear_bar(bar);
    fill_bridge(store, bar, kind, key, rng);
    bar
}

/// Write the `kind` rules into an existing bar, leaving untouched cells as they are
pub fn fill_bridge<R: Rng + ?Sized>(
    store: &mut PatternStore,
    bar: usize,
    kind: BridgeKind,
    key: Key,
    rng: &mut R,
) {
    let base = bar * STEPS_PER_BAR;
    let notes = key.notes(2, 8);
    let bass_root = key.root.at_octave(1);
    let mut put = |inst: Instrument, i: usize, cell: Cell| {
        store.set_cell(inst, base + i, Some(cell));
    };

    for i in 0..STEPS_PER_BAR {
        match kind {
            BridgeKind::Buildup => {
                if i >= 12 {
                    put(Instrument::Hat, i, Cell::with_hits(VoicingToken::Hat(HatKind::Roll), 3));
                } else if i >= 8 {
                    put(Instrument::Hat, i, Cell::with_hits(VoicingToken::Hat(HatKind::Closed), 2));
                } else if i >= 4 && i % 2 == 0 {
                    put(Instrument::Hat, i, Cell::hat(HatKind::Closed));
                }
                if i % 4 == 0 && i < 12 {
                    put(Instrument::Kick, i, Cell::kick());
                }
                if i >= 12 && coin(rng, 0.7) {
                    put(Instrument::Perc, i, Cell::with_hits(VoicingToken::Hit, 2));
                }
                if i >= 14 {
                    put(Instrument::Clap, i, Cell::with_hits(VoicingToken::Hit, 3));
                }
                if i % 4 == 0 {
                    put(Instrument::Bass, i, Cell::note(bass_root.transpose((i / 4) as i32 * 2)));
                }
            }
            BridgeKind::Breakdown => {
                if i % 8 == 0 {
                    put(Instrument::Acid, i, Cell::note(pick(rng, &notes)));
                }
                if i == 0 {
                    put(Instrument::Stab, i, Cell::hit());
                }
            }
            BridgeKind::Fill => {
                if matches!(i, 0 | 3 | 6 | 10 | 13) && coin(rng, 0.8) {
                    put(Instrument::Kick, i, Cell::kick());
                }
                if i >= 4 {
                    let hits = if i >= 12 { 3 } else if i >= 8 { 2 } else { 1 };
                    put(Instrument::Clap, i, Cell::with_hits(VoicingToken::Hit, hits));
                }
                let hat = if i % 4 == 2 { HatKind::Open } else { HatKind::Closed };
                put(Instrument::Hat, i, Cell::hat(hat));
                if i % 3 == 0 {
                    put(Instrument::Perc, i, Cell::hit());
                }
            }
            BridgeKind::Drop => {
                if i % 4 == 0 {
                    put(Instrument::Kick, i, Cell::kick());
                }
                let octave_up = if i % 2 == 1 { 12 } else { 0 };
                put(Instrument::Bass, i, Cell::note(bass_root.transpose(octave_up)));
                let hat = if i % 4 == 2 { HatKind::Open } else { HatKind::Accent };
                put(Instrument::Hat, i, Cell::hat(hat));
                if i % 8 == 4 {
                    put(Instrument::Clap, i, Cell::hit());
                }
                if i % 2 == 0 && coin(rng, 0.7) {
                    put(Instrument::Acid, i, Cell::note(pick(rng, &notes)));
                }
                if matches!(i, 0 | 6 | 12) && coin(rng, 0.6) {
                    put(Instrument::Stab, i, Cell::hit());
                }
            }
        }
    }
}
