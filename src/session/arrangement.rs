// Arrangement - Song-mode bar order
// Every stored index references an existing bar

use serde::{Deserialize, Serialize};

/// Ordered bar indices played in song mode; bars may repeat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arrangement(Vec<usize>);

impl Arrangement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace the order, dropping indices `>= bars`; returns how many were dropped
    pub fn set(&mut self, indices: &[usize], bars: usize) -> usize {
        self.0 = indices.iter().copied().filter(|&b| b < bars).collect();
        let dropped = indices.len() - self.0.len();
        if dropped > 0 {
            log::debug!("Arrangement dropped {} indices outside {} bars", dropped, bars);
        }
        dropped
    }

    /// Append one bar; returns false if it does not exist
    pub fn push(&mut self, bar: usize, bars: usize) -> bool {
        if bar >= bars {
            log::debug!("Arrangement append ignored: bar {} of {}", bar, bars);
            return false;
        }
        self.0.push(bar);
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Remove indices that no longer reference a bar after a resize
    pub fn prune(&mut self, bars: usize) -> usize {
        let before = self.0.len();
        self.0.retain(|&b| b < bars);
        before - self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_drops_invalid() {
        let mut arr = Arrangement::new();
        assert_eq!(arr.set(&[0, 1, 5, 0, 2], 2), 2);
        assert_eq!(arr.as_slice(), &[0, 1, 0]);
    }

    #[test]
    fn test_push_and_prune() {
        let mut arr = Arrangement::new();
        assert!(arr.push(3, 4));
        assert!(!arr.push(4, 4));
        arr.push(0, 4);
        assert_eq!(arr.prune(2), 1);
        assert_eq!(arr.as_slice(), &[0]);
        arr.clear();
        assert!(arr.is_empty());
    }
}
