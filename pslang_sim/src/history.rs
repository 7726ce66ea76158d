//! Rolling buffer of recent simulation results.

use crate::engine::SimulationResult;
use std::collections::VecDeque;

/// Number of results kept.
pub const HISTORY_CAPACITY: usize = 5;

/// The most recent results, newest first.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    entries: VecDeque<SimulationResult>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Records a result, evicting the oldest once full.
    pub fn push(&mut self, result: SimulationResult) {
        self.entries.push_front(result);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_back();
        }
    }

    /// Newest result, if any.
    pub fn latest(&self) -> Option<&SimulationResult> {
        self.entries.front()
    }

    /// Iterates newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &SimulationResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Results in newest-first order.
    pub fn to_vec(&self) -> Vec<SimulationResult> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_simulation;
    use crate::params::SimulationParams;

    fn result(seed: u64) -> SimulationResult {
        run_simulation(&SimulationParams::new(seed).unwrap()).unwrap()
    }

    #[test]
    fn test_history_keeps_newest_five() {
        let mut history = RunHistory::new();
        assert!(history.is_empty());

        for seed in 0..8 {
            history.push(result(seed));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        let seeds: Vec<u64> = history.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![7, 6, 5, 4, 3]);
        assert_eq!(history.latest().unwrap().seed, 7);
    }

    #[test]
    fn test_history_clear() {
        let mut history = RunHistory::new();
        history.push(result(1));
        history.clear();
        assert!(history.latest().is_none());
        assert!(history.to_vec().is_empty());
    }
}
