use std::collections::HashSet;

/// Identity pair of two compared handles: (left address, right address).
pub type IdentityPair = (usize, usize);

/// Tracks the handle pairs currently being compared higher up the stack.
///
/// A pair that is already in flight is treated as equivalent, which keeps
/// the descent finite on cyclic graphs. Each top-level comparison owns its
/// own guard; it is never shared between calls.
#[derive(Debug, Default)]
pub struct CycleGuard {
    in_flight: HashSet<IdentityPair>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `pair` as in flight. Returns `false` if it already was.
    pub fn enter(&mut self, pair: IdentityPair) -> bool {
        self.in_flight.insert(pair)
    }

    /// Remove `pair` once its comparison has finished.
    pub fn exit(&mut self, pair: IdentityPair) {
        self.in_flight.remove(&pair);
    }

    pub fn contains(&self, pair: IdentityPair) -> bool {
        self.in_flight.contains(&pair)
    }

    /// Number of pairs currently in flight.
    pub fn depth(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentering_a_pair_is_refused() {
        let mut guard = CycleGuard::new();
        assert!(guard.enter((1, 2)));
        assert!(!guard.enter((1, 2)));
        assert!(guard.contains((1, 2)));
    }

    #[test]
    fn pairs_are_directional() {
        let mut guard = CycleGuard::new();
        guard.enter((1, 2));
        assert!(guard.enter((2, 1)));
        assert_eq!(guard.depth(), 2);
    }

    #[test]
    fn exit_allows_reentry() {
        let mut guard = CycleGuard::new();
        guard.enter((7, 7));
        guard.exit((7, 7));
        assert_eq!(guard.depth(), 0);
        assert!(guard.enter((7, 7)));
    }
}
