// Pattern store - Per-instrument step arrays with bar-level editing
// Every track always has the same length, a whole number of bars

use super::STEPS_PER_BAR;
use super::cell::{Cell, HatKind, Track, hits_of};
use super::chance::pick;
use super::instrument::Instrument;
use crate::theory::Key;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Step patterns for all eight instruments
///
/// Deserialized data goes through `from_tracks`, so loaded tracks are fitted
/// to the bar count before any bar edit can see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoreData", into = "StoreData")]
pub struct PatternStore {
    bars: usize,
    tracks: [Track; Instrument::COUNT],
}

/// Wire form of a store, trusted only after normalization
#[derive(Serialize, Deserialize)]
struct StoreData {
    bars: usize,
    tracks: [Track; Instrument::COUNT],
}

impl From<StoreData> for PatternStore {
    fn from(data: StoreData) -> Self {
        Self::from_tracks(data.bars, data.tracks)
    }
}

impl From<PatternStore> for StoreData {
    fn from(store: PatternStore) -> Self {
        Self {
            bars: store.bars,
            tracks: store.tracks,
        }
    }
}

impl PatternStore {
    /// Empty store of `bars` bars (at least one)
    pub fn new(bars: usize) -> Self {
        let bars = bars.max(1);
        Self {
            bars,
            tracks: std::array::from_fn(|_| vec![None; bars * STEPS_PER_BAR]),
        }
    }

    /// Build from generated tracks, fitting each one to `bars`
    pub fn from_tracks(bars: usize, tracks: [Track; Instrument::COUNT]) -> Self {
        let mut store = Self { bars: bars.max(1), tracks };
        let len = store.len();
        for track in &mut store.tracks {
            track.resize(len, None);
        }
        store
    }

    pub fn bars(&self) -> usize {
        self.bars
    }

    /// Steps per track
    pub fn len(&self) -> usize {
        self.bars * STEPS_PER_BAR
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(|t| t.iter().all(Option::is_none))
    }

    pub fn track(&self, instrument: Instrument) -> &[Option<Cell>] {
        &self.tracks[instrument.index()]
    }

    pub fn tracks(&self) -> &[Track; Instrument::COUNT] {
        &self.tracks
    }

    pub fn cell(&self, instrument: Instrument, step: usize) -> Option<&Cell> {
        self.tracks[instrument.index()].get(step)?.as_ref()
    }

    /// Hit count at a step, 0 for empty or out-of-range cells
    pub fn hits(&self, instrument: Instrument, step: usize) -> u8 {
        hits_of(self.cell(instrument, step))
    }

    /// Step range covered by a bar
    pub fn bar_range(bar: usize) -> Range<usize> {
        bar * STEPS_PER_BAR..(bar + 1) * STEPS_PER_BAR
    }

    /// Overwrite one cell; returns false when `step` is out of range
    pub fn set_cell(&mut self, instrument: Instrument, step: usize, cell: Option<Cell>) -> bool {
        match self.tracks[instrument.index()].get_mut(step) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => {
                log::debug!("set_cell ignored: {} step {} out of range", instrument, step);
                false
            }
        }
    }

    /// Replace a whole track, padding or truncating it to the store length
    ///
    /// Returns the length the track arrived with.
    pub fn replace_track(&mut self, instrument: Instrument, mut track: Track) -> usize {
        let original = track.len();
        track.resize(self.len(), None);
        self.tracks[instrument.index()] = track;
        original
    }

    /// Cycle a cell through empty, 1, 2 and 3 hits, then back to empty
    ///
    /// Entering from empty synthesizes the instrument's default token. Returns
    /// the resulting cell, or `None` when the cell is now empty or the step is
    /// out of range.
    pub fn toggle_step<R: Rng + ?Sized>(
        &mut self,
        instrument: Instrument,
        step: usize,
        key: Key,
        rng: &mut R,
    ) -> Option<Cell> {
        let Some(slot) = self.tracks[instrument.index()].get_mut(step) else {
            log::debug!("toggle_step ignored: {} step {} out of range", instrument, step);
            return None;
        };

        *slot = match *slot {
            None => Some(default_cell(instrument, step, key, rng)),
            Some(cell) => cell.hits.next().map(|hits| Cell { hits, ..cell }),
        };
        *slot
    }

    /// Truncate or pad every track to `bars` bars
    ///
    /// Zero is rejected as a no-op. Returns true when the length changed.
    pub fn resize(&mut self, bars: usize) -> bool {
        if bars == 0 {
            log::debug!("resize to 0 bars ignored");
            return false;
        }
        if bars == self.bars {
            return false;
        }
        self.bars = bars;
        let len = self.len();
        for track in &mut self.tracks {
            track.resize(len, None);
        }
        true
    }

    /// Grow by one empty bar and return its index
    pub fn append_bar(&mut self) -> usize {
        let bar = self.bars;
        self.resize(bar + 1);
        bar
    }

    /// Empty every instrument's cells in one bar
    pub fn clear_bar(&mut self, bar: usize) -> bool {
        if bar >= self.bars {
            log::debug!("clear_bar ignored: bar {} of {}", bar, self.bars);
            return false;
        }
        for track in &mut self.tracks {
            track[Self::bar_range(bar)].fill(None);
        }
        true
    }

    /// Copy one bar over another for every instrument, hit counts included
    ///
    /// Both bars must already exist.
    pub fn copy_bar(&mut self, src: usize, dst: usize) -> bool {
        if src >= self.bars || dst >= self.bars {
            log::debug!("copy_bar ignored: {} -> {} of {} bars", src, dst, self.bars);
            return false;
        }
        if src != dst {
            let dst_start = dst * STEPS_PER_BAR;
            for track in &mut self.tracks {
                track.copy_within(Self::bar_range(src), dst_start);
            }
        }
        true
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Token a freshly toggled cell receives
fn default_cell<R: Rng + ?Sized>(instrument: Instrument, step: usize, key: Key, rng: &mut R) -> Cell {
    match instrument {
        Instrument::Kick => Cell::kick(),
        Instrument::Bass => {
            let octave_up = if step % 2 == 1 { 12 } else { 0 };
            Cell::note(key.root.at_octave(1).transpose(octave_up))
        }
        Instrument::Hat => Cell::hat(HatKind::Closed),
        Instrument::Acid => Cell::note(pick(rng, &key.notes(2, 8))),
        Instrument::Lead => Cell::note(pick(rng, &key.notes(4, 10))),
        Instrument::Clap | Instrument::Perc | Instrument::Stab => Cell::hit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::cell::VoicingToken;
    use crate::theory::{NoteName, Pitch, ScaleKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn key() -> Key {
        Key::new(NoteName::A, ScaleKind::Minor)
    }

    fn filled_store(bars: usize) -> PatternStore {
        let mut store = PatternStore::new(bars);
        for inst in Instrument::ALL {
            for step in (0..store.len()).step_by(3) {
                let hits = (step % 3 + inst.index()) as u8 % 3 + 1;
                store.set_cell(inst, step, Some(Cell::with_hits(VoicingToken::Hit, hits)));
            }
        }
        store
    }

    #[test]
    fn test_new_store_lengths() {
        let store = PatternStore::new(2);
        assert_eq!(store.len(), 32);
        assert!(store.is_empty());
        for inst in Instrument::ALL {
            assert_eq!(store.track(inst).len(), 32);
        }
        assert_eq!(PatternStore::new(0).bars(), 1);
    }

    #[test]
    fn test_toggle_is_four_cycle() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = PatternStore::new(1);
        for inst in Instrument::ALL {
            let hits: Vec<u8> = (0..4)
                .map(|_| {
                    store.toggle_step(inst, 5, key(), &mut rng);
                    store.hits(inst, 5)
                })
                .collect();
            assert_eq!(hits, vec![1, 2, 3, 0]);
            assert!(store.cell(inst, 5).is_none());
        }
    }

    #[test]
    fn test_toggle_keeps_token_across_hits() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = PatternStore::new(1);
        let first = store.toggle_step(Instrument::Lead, 2, key(), &mut rng).unwrap();
        let second = store.toggle_step(Instrument::Lead, 2, key(), &mut rng).unwrap();
        assert_eq!(first.token, second.token);
        assert_eq!(second.hits.get(), 2);
    }

    #[test]
    fn test_toggle_default_tokens() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut store = PatternStore::new(1);
        let kick = store.toggle_step(Instrument::Kick, 0, key(), &mut rng).unwrap();
        assert_eq!(kick.token, VoicingToken::Note(Pitch::new(24)));
        let bass = store.toggle_step(Instrument::Bass, 3, key(), &mut rng).unwrap();
        assert_eq!(bass.token, VoicingToken::Note(Pitch::new(33 + 12)));
        let hat = store.toggle_step(Instrument::Hat, 1, key(), &mut rng).unwrap();
        assert_eq!(hat.token, VoicingToken::Hat(HatKind::Closed));
        let clap = store.toggle_step(Instrument::Clap, 1, key(), &mut rng).unwrap();
        assert_eq!(clap.token, VoicingToken::Hit);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut store = PatternStore::new(1);
        assert!(store.toggle_step(Instrument::Kick, 16, key(), &mut rng).is_none());
        assert!(store.is_empty());
        assert_eq!(store.hits(Instrument::Kick, 99), 0);
    }

    #[test]
    fn test_resize_idempotent_and_truncates_back() {
        let mut store = filled_store(2);
        let original = store.clone();
        assert!(!store.resize(2));
        assert_eq!(store, original);

        assert!(store.resize(5));
        assert_eq!(store.len(), 80);
        assert!(store.track(Instrument::Kick)[32..].iter().all(Option::is_none));
        store.resize(2);
        assert_eq!(store, original);

        assert!(!store.resize(0));
        assert_eq!(store.bars(), 2);
    }

    #[test]
    fn test_copy_bar_matches_source() {
        let mut store = filled_store(3);
        let before = store.clone();
        assert!(store.copy_bar(0, 2));
        for inst in Instrument::ALL {
            assert_eq!(store.track(inst)[32..48], before.track(inst)[0..16]);
            assert_eq!(store.track(inst)[0..32], before.track(inst)[0..32]);
        }
    }

    #[test]
    fn test_copy_bar_requires_existing_bars() {
        let mut store = filled_store(2);
        let before = store.clone();
        assert!(!store.copy_bar(0, 2));
        assert!(!store.copy_bar(4, 1));
        assert_eq!(store, before);
    }

    #[test]
    fn test_clear_bar() {
        let mut store = filled_store(2);
        assert!(store.clear_bar(1));
        for inst in Instrument::ALL {
            assert!(store.track(inst)[16..].iter().all(Option::is_none));
            assert!(store.track(inst)[..16].iter().any(Option::is_some));
        }
        assert!(!store.clear_bar(2));
    }

    #[test]
    fn test_replace_track_normalizes_length() {
        let mut store = PatternStore::new(2);
        let arrived = store.replace_track(Instrument::Hat, vec![Some(Cell::hit()); 40]);
        assert_eq!(arrived, 40);
        assert_eq!(store.track(Instrument::Hat).len(), 32);
        store.replace_track(Instrument::Hat, vec![Some(Cell::hit()); 4]);
        assert_eq!(store.track(Instrument::Hat).len(), 32);
        assert_eq!(store.hits(Instrument::Hat, 3), 1);
        assert_eq!(store.hits(Instrument::Hat, 4), 0);
    }

    #[test]
    fn test_deserialized_short_tracks_are_fitted() {
        let json = r#"{"bars":2,"tracks":[[],[],[],[],[],[],[],[]]}"#;
        let mut store: PatternStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.bars(), 2);
        for inst in Instrument::ALL {
            assert_eq!(store.track(inst).len(), 32);
        }
        assert!(store.clear_bar(1));
        assert!(store.copy_bar(0, 1));

        let zero: PatternStore =
            serde_json::from_str(r#"{"bars":0,"tracks":[[],[],[],[],[],[],[],[]]}"#).unwrap();
        assert_eq!(zero.len(), 16);
    }

    #[test]
    fn test_serialized_store_reloads_unchanged() {
        let store = filled_store(2);
        let text = serde_json::to_string(&store).unwrap();
        assert_eq!(serde_json::from_str::<PatternStore>(&text).unwrap(), store);
    }

    #[test]
    fn test_append_bar() {
        let mut store = PatternStore::new(2);
        assert_eq!(store.append_bar(), 2);
        assert_eq!(store.bars(), 3);
        assert_eq!(store.track(Instrument::Stab).len(), 48);
    }
}
