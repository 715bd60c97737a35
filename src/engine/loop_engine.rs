// Loop engine - Single owner of the session, clock, RNG and trigger output
// Every host-facing operation goes through here

use crate::config::EngineConfig;
use crate::messaging::TriggerSender;
use crate::pattern::{BridgeKind, Cell, Genre, Instrument, InstrumentStyle, StyleSet};
use crate::sequencer::{ClockError, GateState, PositionObserver, SequencerClock, TickReport};
use crate::session::{AnalysisFrame, Inconsistency, Session, Snapshot, random_key};
use crate::theory::{Key, NoteName, ScaleKind};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

/// Whether the playback order has been built yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Ready,
}

/// What a randomize call picked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomizeSummary {
    /// `None` for a plain randomize
    pub genre: Option<Genre>,
    pub key: Key,
    pub bpm: f64,
    pub styles: StyleSet,
}

impl fmt::Display for RandomizeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(genre) = self.genre {
            write!(f, "[{}] ", genre)?;
        }
        write!(f, "{} @ {:.0} BPM", self.key, self.bpm)?;
        for inst in Instrument::ALL {
            write!(f, " {}={}", inst.name(), self.styles.get(inst).name())?;
        }
        Ok(())
    }
}

pub struct LoopEngine<R: Rng = StdRng> {
    config: EngineConfig,
    session: Session,
    clock: SequencerClock,
    lifecycle: Lifecycle,
    rng: R,
    triggers: Option<TriggerSender>,
}

impl LoopEngine<StdRng> {
    /// Engine with a deterministic RNG
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LoopEngine<R> {
    /// Generate an initial session; call `init` before starting playback
    pub fn new(config: EngineConfig, mut rng: R) -> Self {
        let session = Session::generate(&config, &mut rng);
        let clock = SequencerClock::new(&session, config.ambient);
        log::info!(
            "Loop engine created: {} bars in {} at {:.0} BPM",
            session.bars(),
            session.key,
            session.tempo.bpm()
        );
        Self {
            config,
            session,
            clock,
            lifecycle: Lifecycle::Uninitialized,
            rng,
            triggers: None,
        }
    }

    /// Build the playback order and accept transport calls
    pub fn init(&mut self) {
        if self.lifecycle == Lifecycle::Ready {
            log::debug!("init ignored: engine already ready");
            return;
        }
        self.lifecycle = Lifecycle::Ready;
        self.clock.rebuild(&self.session);
        log::info!("Loop engine ready ({} steps)", self.clock.order().len());
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &SequencerClock {
        &self.clock
    }

    // ----- Output -----

    /// Forward every emitted event to `sender` from now on
    pub fn attach_trigger_sender(&mut self, sender: TriggerSender) {
        self.triggers = Some(sender);
    }

    pub fn detach_trigger_sender(&mut self) -> Option<TriggerSender> {
        self.triggers.take()
    }

    pub fn set_position_observer(&mut self, observer: PositionObserver) {
        self.clock.set_observer(observer);
    }

    pub fn clear_position_observer(&mut self) {
        self.clock.clear_observer();
    }

    // ----- Transport -----

    pub fn start(&mut self, at: f64) -> Result<(), ClockError> {
        if self.lifecycle != Lifecycle::Ready {
            return Err(ClockError::NotReady);
        }
        self.clock.start(at)
    }

    pub fn stop(&mut self) -> Result<(), ClockError> {
        self.clock.stop()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    pub fn loop_progress(&self) -> f64 {
        self.clock.loop_progress()
    }

    /// Emit every tick due at or before `now`
    pub fn process_until(&mut self, now: f64) -> Result<Vec<TickReport>, ClockError> {
        let reports = self.clock.process_until(
            &self.session,
            now,
            self.config.max_catch_up_ticks,
            &mut self.rng,
        )?;
        for report in &reports {
            self.forward(report);
        }
        Ok(reports)
    }

    /// Process one tick at a host-supplied time
    pub fn tick(&mut self, time: f64) -> Result<TickReport, ClockError> {
        let report = self.clock.tick(&self.session, time, &mut self.rng)?;
        self.forward(&report);
        Ok(report)
    }

    fn forward(&mut self, report: &TickReport) {
        if let Some(sender) = self.triggers.as_mut() {
            sender.send_all(report.events.iter().cloned());
        }
    }

    // ----- Cell and gate edits (live, no rebuild) -----

    pub fn toggle_step(&mut self, instrument: Instrument, step: usize) -> Option<Cell> {
        let key = self.session.key;
        self.session
            .store_mut()
            .toggle_step(instrument, step, key, &mut self.rng)
    }

    pub fn hits(&self, instrument: Instrument, step: usize) -> u8 {
        self.session.store().hits(instrument, step)
    }

    pub fn cycle_gate(&mut self, instrument: Instrument) -> GateState {
        let state = self.session.gates.cycle(instrument);
        log::debug!("{} gate -> {}", instrument, state);
        state
    }

    pub fn gate(&self, instrument: Instrument) -> GateState {
        self.session.gates.get(instrument)
    }

    pub fn set_gate(&mut self, instrument: Instrument, state: GateState) {
        self.session.gates.set(instrument, state);
    }

    pub fn can_play(&self, instrument: Instrument) -> bool {
        self.session
            .gates
            .can_play(instrument, self.session.intensity())
    }

    pub fn set_style(&mut self, style: InstrumentStyle) {
        self.session.apply_style(style, &mut self.rng);
    }

    /// Set the key
    ///
    /// Stab, pad and sub voicings follow from the next tick. Stored pattern
    /// notes keep their pitches until the next regeneration.
    pub fn set_key(&mut self, root: NoteName, scale: ScaleKind) {
        self.session.key = Key::new(root, scale);
        log::info!("Key set to {}", self.session.key);
        self.rebuild();
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.session.tempo.set_bpm(bpm);
    }

    pub fn bpm(&self) -> f64 {
        self.session.tempo.bpm()
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.session.set_intensity(intensity);
    }

    pub fn intensity(&self) -> f32 {
        self.session.intensity()
    }

    pub fn set_analysis(&mut self, frame: AnalysisFrame) {
        self.session.analysis = frame;
    }

    pub fn analysis(&self) -> AnalysisFrame {
        self.session.analysis
    }

    // ----- Structural edits (rebuild the playback order) -----

    pub fn loop_length(&self) -> usize {
        self.session.bars()
    }

    /// Change the loop length in bars; returns true when it changed
    pub fn resize(&mut self, bars: usize) -> bool {
        let changed = self.session.resize(bars, self.config.max_bars);
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn clear_bar(&mut self, bar: usize) -> bool {
        self.session.store_mut().clear_bar(bar)
    }

    pub fn copy_bar(&mut self, src: usize, dst: usize) -> bool {
        self.session.store_mut().copy_bar(src, dst)
    }

    /// Append a transition bar; returns its index
    pub fn generate_bridge(&mut self, kind: BridgeKind) -> Option<usize> {
        let bar = self
            .session
            .append_bridge(kind, self.config.max_bars, &mut self.rng)?;
        self.rebuild();
        Some(bar)
    }

    /// Replace the arrangement; returns how many indices were dropped
    pub fn set_arrangement(&mut self, bars: &[usize]) -> usize {
        let dropped = self.session.arrangement_mut().set(bars);
        self.rebuild();
        dropped
    }

    pub fn append_to_arrangement(&mut self, bar: usize) -> bool {
        let pushed = self.session.arrangement_mut().push(bar);
        if pushed {
            self.rebuild();
        }
        pushed
    }

    pub fn clear_arrangement(&mut self) {
        self.session.arrangement_mut().clear();
        self.rebuild();
    }

    pub fn set_song_mode(&mut self, enabled: bool) {
        if self.session.song_mode == enabled {
            return;
        }
        self.session.song_mode = enabled;
        log::info!("Song mode {}", if enabled { "on" } else { "off" });
        self.rebuild();
    }

    // ----- Generation -----

    /// Regenerate every track from the current key and styles
    pub fn regenerate(&mut self) {
        self.session.regenerate(&mut self.rng);
        self.rebuild();
    }

    /// New random key and styles, then regenerate; tempo is kept
    pub fn randomize(&mut self) -> RandomizeSummary {
        self.session.key = random_key(&mut self.rng);
        self.session.styles = StyleSet::random(&mut self.rng);
        self.regenerate();
        self.summary(None)
    }

    /// Draw key, tempo and styles from a genre preset
    ///
    /// An unknown genre name falls back to `randomize`.
    pub fn randomize_genre(&mut self, name: &str) -> RandomizeSummary {
        match name.parse::<Genre>() {
            Ok(genre) => self.apply_genre(genre),
            Err(e) => {
                log::warn!("{}; randomizing without a preset", e);
                self.randomize()
            }
        }
    }

    pub fn apply_genre(&mut self, genre: Genre) -> RandomizeSummary {
        let draw = genre.preset().draw(&mut self.rng);
        self.session.key = draw.key;
        self.session.tempo.set_bpm(f64::from(draw.bpm));
        self.session.styles = draw.styles;
        self.regenerate();
        log::info!("Applied {} preset", genre);
        self.summary(Some(genre))
    }

    fn summary(&self, genre: Option<Genre>) -> RandomizeSummary {
        RandomizeSummary {
            genre,
            key: self.session.key,
            bpm: self.session.tempo.bpm(),
            styles: self.session.styles,
        }
    }

    // ----- Snapshots -----

    pub fn export(&self) -> Snapshot {
        Snapshot::capture(&self.session)
    }

    /// Merge a snapshot into the session and rebuild
    pub fn import(&mut self, snapshot: &Snapshot) -> Vec<Inconsistency> {
        let issues = snapshot.apply_to(&mut self.session, self.config.max_bars);
        self.rebuild();
        log::info!(
            "Snapshot imported: {} bars, {} normalization(s)",
            self.session.bars(),
            issues.len()
        );
        issues
    }

    fn rebuild(&mut self) {
        if self.lifecycle == Lifecycle::Ready {
            self.clock.rebuild(&self.session);
        }
    }
}

impl<R: Rng> fmt::Debug for LoopEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopEngine")
            .field("lifecycle", &self.lifecycle)
            .field("bars", &self.session.bars())
            .field("key", &self.session.key)
            .field("clock", &self.clock)
            .finish()
    }
}
