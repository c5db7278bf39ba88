//! Fingerprints of every position seen in a game

use rustc_hash::FxHashMap;

use crate::board::{Board, Fingerprint};

/// Ordered record of seen positions with O(1) membership.
///
/// Only the owner of a game grows or truncates this; the engine just asks
/// whether a fingerprint has been seen.
#[derive(Clone, Debug, Default)]
pub struct PositionHistory {
    order: Vec<Fingerprint>,
    counts: FxHashMap<Fingerprint, usize>,
}

impl PositionHistory {
    /// History holding just the starting position
    pub fn new(initial: &Board) -> Self {
        let mut history = Self::default();
        history.push(initial.fingerprint());
        history
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.counts.contains_key(fingerprint)
    }

    pub fn push(&mut self, fingerprint: Fingerprint) {
        *self.counts.entry(fingerprint.clone()).or_insert(0) += 1;
        self.order.push(fingerprint);
    }

    /// Drop the most recent entry
    pub fn pop(&mut self) -> Option<Fingerprint> {
        let fingerprint = self.order.pop()?;
        if let Some(count) = self.counts.get_mut(&fingerprint) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&fingerprint);
            }
        }
        Some(fingerprint)
    }

    /// Keep only the first `len` entries
    pub fn truncate(&mut self, len: usize) {
        while self.order.len() > len {
            self.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn last(&self) -> Option<&Fingerprint> {
        self.order.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.order.iter()
    }
}

impl FromIterator<Fingerprint> for PositionHistory {
    fn from_iter<I: IntoIterator<Item = Fingerprint>>(iter: I) -> Self {
        let mut history = Self::default();
        for fingerprint in iter {
            history.push(fingerprint);
        }
        history
    }
}
