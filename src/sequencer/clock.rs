// Sequencer clock - Stopped/running state machine over the playback order
// Borrows the session on every tick; emits events and song positions

use super::event::TickReport;
use super::playback::{ArrangementPosition, PlaybackOrder};
use super::player::StepPlayer;
use super::transport::{Transport, TransportState};
use crate::config::AmbientConfig;
use crate::session::Session;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    #[error("Clock is already running")]
    AlreadyRunning,

    #[error("Clock is not running")]
    NotRunning,

    #[error("Engine is not initialized")]
    NotReady,

    #[error("Transport fault: {0}")]
    TransportFault(String),
}

/// Song-position callback, invoked once per tick in song mode
pub type PositionObserver = Box<dyn FnMut(ArrangementPosition) + Send>;

pub struct SequencerClock {
    transport: Transport,
    order: PlaybackOrder,
    player: StepPlayer,
    cursor: usize,
    observer: Option<PositionObserver>,
}

impl SequencerClock {
    /// Clock with a playback order already built from `session`
    pub fn new(session: &Session, ambient: AmbientConfig) -> Self {
        Self {
            transport: Transport::new(),
            order: PlaybackOrder::build(session.bars(), session.arrangement().as_slice(), session.song_mode),
            player: StepPlayer::new(session.key, ambient),
            cursor: 0,
            observer: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn is_running(&self) -> bool {
        self.transport.state().is_playing()
    }

    pub fn order(&self) -> &PlaybackOrder {
        &self.order
    }

    /// Next position in the playback order
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_observer(&mut self, observer: PositionObserver) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Fraction of the playback order already played, 0 when stopped
    pub fn loop_progress(&self) -> f64 {
        if !self.is_running() || self.order.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.order.len() as f64
    }

    /// Start with the first tick due at transport time `at`
    pub fn start(&mut self, at: f64) -> Result<(), ClockError> {
        self.transport.start(at)?;
        log::info!("Clock started at {:.3}s ({} steps)", at, self.order.len());
        Ok(())
    }

    /// Stop and rewind to the start of the playback order
    pub fn stop(&mut self) -> Result<(), ClockError> {
        self.transport.stop()?;
        self.cursor = 0;
        log::info!("Clock stopped");
        Ok(())
    }

    /// Rebuild the playback order and chord voicings from the session
    ///
    /// The transport is left alone, so a running clock keeps its tick
    /// schedule and its last observed host time. The cursor survives when it
    /// still points inside the new order.
    pub fn rebuild(&mut self, session: &Session) {
        self.order = PlaybackOrder::build(
            session.bars(),
            session.arrangement().as_slice(),
            session.song_mode,
        );
        self.player.set_key(session.key);
        if self.cursor >= self.order.len() {
            self.cursor = 0;
        }
        log::debug!(
            "Playback order rebuilt: {} steps, song mode {}",
            self.order.len(),
            self.order.is_song()
        );
    }

    /// Process exactly one tick at a host-supplied time
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        session: &Session,
        time: f64,
        rng: &mut R,
    ) -> Result<TickReport, ClockError> {
        if !self.is_running() {
            return Err(ClockError::NotRunning);
        }
        if let Err(e) = self.transport.observe(time) {
            return Err(self.fault(e));
        }
        Ok(self.fire(session, time, rng))
    }

    /// Process every tick due at or before `now`
    ///
    /// At most `max_ticks` are emitted; a larger backlog is skipped and the
    /// schedule re-anchored to `now`. A stopped clock returns no ticks.
    pub fn process_until<R: Rng + ?Sized>(
        &mut self,
        session: &Session,
        now: f64,
        max_ticks: usize,
        rng: &mut R,
    ) -> Result<Vec<TickReport>, ClockError> {
        if !self.is_running() {
            return Ok(Vec::new());
        }
        if let Err(e) = self.transport.observe(now) {
            return Err(self.fault(e));
        }

        let mut reports = Vec::new();
        while self.transport.is_due(now) && reports.len() < max_ticks {
            let time = self.transport.advance(&session.tempo);
            reports.push(self.fire(session, time, rng));
        }

        if self.transport.is_due(now) {
            log::warn!(
                "Clock fell behind at {:.3}s: skipped backlog after {} ticks",
                now,
                max_ticks
            );
            self.transport.reanchor(now, &session.tempo);
        }

        Ok(reports)
    }

    /// Stop after a transport error and hand the error back
    fn fault(&mut self, error: ClockError) -> ClockError {
        log::error!("{}; stopping clock", error);
        let _ = self.stop();
        error
    }

    fn fire<R: Rng + ?Sized>(&mut self, session: &Session, time: f64, rng: &mut R) -> TickReport {
        let len = self.order.len();
        let cursor = self.cursor;
        let Some(step) = self.order.resolve(cursor) else {
            return TickReport {
                cursor,
                time,
                ..TickReport::default()
            };
        };

        let position = self.order.position(cursor);
        if let (Some(pos), Some(observer)) = (position, self.observer.as_mut()) {
            observer(pos);
        }

        let mut events = Vec::new();
        self.player.render_step(session, step, time, &mut events);
        self.player
            .render_ambient(session, step, len - cursor, time, rng, &mut events);

        self.cursor = (cursor + 1) % len;

        TickReport {
            cursor,
            step,
            time,
            position,
            events,
        }
    }
}

impl std::fmt::Debug for SequencerClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencerClock")
            .field("state", &self.transport.state())
            .field("steps", &self.order.len())
            .field("cursor", &self.cursor)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
