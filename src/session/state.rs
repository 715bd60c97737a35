// Session state - The aggregate every edit and tick works against
// Owns the patterns, gates and arrangement; the clock only borrows it

use super::arrangement::Arrangement;
use crate::config::EngineConfig;
use crate::pattern::bridge::append_bridge;
use crate::pattern::chance::pick;
use crate::pattern::generators::{generate, generate_all};
use crate::pattern::{BridgeKind, Cell, Instrument, InstrumentStyle, PatternStore, StyleSet};
use crate::sequencer::{Gates, Tempo};
use crate::theory::{Key, NoteName, ScaleKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Audio analysis values supplied by the host
///
/// Stored for observers only; the sequencing core never reads or fills them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFrame {
    pub bass: bool,
    pub mid: bool,
    pub high: bool,
    pub kick: bool,
}

/// Sequencer session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub tempo: Tempo,
    pub key: Key,
    pub styles: StyleSet,
    pub gates: Gates,
    pub song_mode: bool,
    pub analysis: AnalysisFrame,
    intensity: f32,
    store: PatternStore,
    arrangement: Arrangement,
}

impl Session {
    /// Empty session with the configured defaults
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tempo: Tempo::new(config.default_bpm),
            key: Key::default(),
            styles: StyleSet::default(),
            gates: Gates::default(),
            song_mode: false,
            analysis: AnalysisFrame::default(),
            intensity: config.default_intensity.clamp(0.0, 1.0),
            store: PatternStore::new(config.default_loop_bars),
            arrangement: Arrangement::new(),
        }
    }

    /// Session with a random key, random styles and freshly generated patterns
    pub fn generate<R: Rng + ?Sized>(config: &EngineConfig, rng: &mut R) -> Self {
        let mut session = Self::new(config);
        session.key = random_key(rng);
        session.styles = StyleSet::random(rng);
        session.regenerate(rng);
        session
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Set intensity, clamped into [0, 1]
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
    }

    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    /// Cell-level access; structural changes go through the session methods
    pub fn store_mut(&mut self) -> &mut PatternStore {
        &mut self.store
    }

    pub fn bars(&self) -> usize {
        self.store.bars()
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn arrangement_mut(&mut self) -> ArrangementEdit<'_> {
        ArrangementEdit {
            arrangement: &mut self.arrangement,
            bars: self.store.bars(),
        }
    }

    /// Regenerate every track from the current key and styles
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let tracks = generate_all(&self.styles, self.store.len(), self.key, rng);
        self.store = PatternStore::from_tracks(self.store.bars(), tracks);
        log::info!("Regenerated {} bars in {}", self.store.bars(), self.key);
    }

    /// Store a style and regenerate only that instrument's track
    pub fn apply_style<R: Rng + ?Sized>(&mut self, style: InstrumentStyle, rng: &mut R) {
        self.styles.set(style);
        let track = generate(style, self.store.len(), self.key, rng);
        self.store.replace_track(style.instrument(), track);
        log::debug!("Regenerated {} as {}", style.instrument(), style.name());
    }

    /// Resize to `bars` (capped at `max_bars`); prunes the arrangement
    ///
    /// Returns true when the length changed.
    pub fn resize(&mut self, bars: usize, max_bars: usize) -> bool {
        let capped = bars.min(max_bars);
        if capped != bars {
            log::debug!("Loop length {} capped at {}", bars, max_bars);
        }
        if !self.store.resize(capped) {
            return false;
        }
        let pruned = self.arrangement.prune(capped);
        if pruned > 0 {
            log::debug!("Pruned {} arrangement entries after resize", pruned);
        }
        true
    }

    /// Append a bridge bar; `None` when the loop is already at `max_bars`
    pub fn append_bridge<R: Rng + ?Sized>(
        &mut self,
        kind: BridgeKind,
        max_bars: usize,
        rng: &mut R,
    ) -> Option<usize> {
        if self.store.bars() >= max_bars {
            log::warn!("Bridge {} skipped: loop already has {} bars", kind, max_bars);
            return None;
        }
        let bar = append_bridge(&mut self.store, kind, self.key, rng);
        log::info!("Appended {} bridge as bar {}", kind, bar);
        Some(bar)
    }

    /// Cell at an absolute step, if the instrument may currently sound
    pub fn playable_cell(&self, instrument: Instrument, step: usize) -> Option<&Cell> {
        let cell = self.store.cell(instrument, step)?;
        self.gates.can_play(instrument, self.intensity).then_some(cell)
    }
}

/// Borrowed arrangement editor that knows the current bar count
pub struct ArrangementEdit<'a> {
    arrangement: &'a mut Arrangement,
    bars: usize,
}

impl ArrangementEdit<'_> {
    pub fn set(&mut self, indices: &[usize]) -> usize {
        self.arrangement.set(indices, self.bars)
    }

    pub fn push(&mut self, bar: usize) -> bool {
        self.arrangement.push(bar, self.bars)
    }

    pub fn clear(&mut self) {
        self.arrangement.clear();
    }
}

/// Uniform root over the twelve pitch classes and scale over the catalog
pub fn random_key<R: Rng + ?Sized>(rng: &mut R) -> Key {
    let root = pick(rng, &NoteName::ALL);
    let scale = pick(rng, &ScaleKind::ALL);
    Key::new(root, scale)
}
