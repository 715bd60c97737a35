// Playback order - Flat step sequence for loop and song mode
// Rebuilt on structural changes, never mutated mid-tick

use crate::pattern::STEPS_PER_BAR;
use serde::{Deserialize, Serialize};

/// Position inside the arrangement, reported in song mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementPosition {
    pub arrangement_index: usize,
    pub bar: usize,
}

/// The ordered absolute step indices the clock walks through
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackOrder {
    steps: Vec<usize>,
    song: bool,
}

impl PlaybackOrder {
    /// Song mode with a non-empty arrangement concatenates the listed bars;
    /// anything else plays every bar in order.
    pub fn build(bars: usize, arrangement: &[usize], song_mode: bool) -> Self {
        if song_mode && !arrangement.is_empty() {
            let steps = arrangement
                .iter()
                .flat_map(|&bar| bar * STEPS_PER_BAR..(bar + 1) * STEPS_PER_BAR)
                .collect();
            Self { steps, song: true }
        } else {
            Self {
                steps: (0..bars * STEPS_PER_BAR).collect(),
                song: false,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when playing an arrangement
    pub fn is_song(&self) -> bool {
        self.song
    }

    /// Absolute pattern step for a cursor position
    pub fn resolve(&self, cursor: usize) -> Option<usize> {
        self.steps.get(cursor).copied()
    }

    /// Arrangement slot and bar for a cursor position (song mode only)
    pub fn position(&self, cursor: usize) -> Option<ArrangementPosition> {
        if !self.song {
            return None;
        }
        let step = self.resolve(cursor)?;
        Some(ArrangementPosition {
            arrangement_index: cursor / STEPS_PER_BAR,
            bar: step / STEPS_PER_BAR,
        })
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_mode_length() {
        let order = PlaybackOrder::build(2, &[], false);
        assert_eq!(order.len(), 32);
        assert_eq!(order.resolve(31), Some(31));
        assert!(!order.is_song());
    }

    #[test]
    fn test_song_mode_concatenates_bars() {
        let order = PlaybackOrder::build(2, &[0, 1, 0], true);
        assert_eq!(order.len(), 48);
        // Step 16 of the sequence is the first step of bar 1
        assert_eq!(order.resolve(16), Some(16));
        assert_eq!(order.resolve(32), Some(0));
        assert_eq!(
            order.position(40),
            Some(ArrangementPosition { arrangement_index: 2, bar: 0 })
        );
    }

    #[test]
    fn test_empty_arrangement_falls_back_to_loop() {
        let order = PlaybackOrder::build(3, &[], true);
        assert_eq!(order.len(), 48);
        assert_eq!(order.position(0), None);
    }

    #[test]
    fn test_arrangement_ignored_outside_song_mode() {
        let order = PlaybackOrder::build(1, &[0, 0, 0], false);
        assert_eq!(order.len(), 16);
    }
}
