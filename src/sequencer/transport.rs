// Transport - Running state and sixteenth-note tick scheduling
// Tick times are derived from a host-supplied clock, never from wall time

use super::clock::ClockError;
use super::timeline::Tempo;

/// Transport state (stopped/running)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Stopped,
    Running,
}

impl TransportState {
    /// Check if transport is running
    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Running)
    }

    /// Check if transport is stopped
    pub fn is_stopped(&self) -> bool {
        matches!(self, TransportState::Stopped)
    }
}

/// Tick scheduler
///
/// Holds the time of the next due tick. Each consumed tick advances it by one
/// sixteenth at the tempo current at that moment, so tempo changes apply from
/// the next tick on.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    state: TransportState,
    next_tick: f64,
    last_now: Option<f64>,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current state
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Start with tick 0 due at `at`
    pub fn start(&mut self, at: f64) -> Result<(), ClockError> {
        if self.state.is_playing() {
            return Err(ClockError::AlreadyRunning);
        }
        if !at.is_finite() {
            return Err(ClockError::TransportFault(format!("start time {} is not finite", at)));
        }
        self.state = TransportState::Running;
        self.next_tick = at;
        self.last_now = None;
        Ok(())
    }

    /// Stop scheduling; no tick is due afterwards
    pub fn stop(&mut self) -> Result<(), ClockError> {
        if self.state.is_stopped() {
            return Err(ClockError::NotRunning);
        }
        self.state = TransportState::Stopped;
        self.last_now = None;
        Ok(())
    }

    /// Time of the next due tick while running
    pub fn next_tick_time(&self) -> Option<f64> {
        self.state.is_playing().then_some(self.next_tick)
    }

    /// Reject host times that are not finite or run backwards
    pub fn observe(&mut self, now: f64) -> Result<(), ClockError> {
        if !now.is_finite() {
            return Err(ClockError::TransportFault(format!("transport time {} is not finite", now)));
        }
        if let Some(last) = self.last_now {
            if now < last {
                return Err(ClockError::TransportFault(format!(
                    "transport time went backwards: {:.6} < {:.6}",
                    now, last
                )));
            }
        }
        self.last_now = Some(now);
        Ok(())
    }

    /// Whether a tick is due at or before `now`
    pub fn is_due(&self, now: f64) -> bool {
        self.state.is_playing() && self.next_tick <= now
    }

    /// Consume the due tick and return its time
    pub fn advance(&mut self, tempo: &Tempo) -> f64 {
        let time = self.next_tick;
        self.next_tick += tempo.sixteenth_seconds();
        time
    }

    /// Drop the backlog: the next tick falls one sixteenth after `now`
    pub fn reanchor(&mut self, now: f64, tempo: &Tempo) {
        self.next_tick = now + tempo.sixteenth_seconds();
    }
}
