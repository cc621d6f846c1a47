//! Identifier allocation for new individuals.

use crate::types::IndividualId;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

/// Source of fresh individual ids.
///
/// Implementations must never hand out the same id twice over their
/// lifetime, including ids reported through [`IdAllocator::observe`].
pub trait IdAllocator: Debug + Send + Sync {
    /// Hand out an id that has not been used before.
    fn next_id(&mut self) -> IndividualId;

    /// Record an id that entered the tree from elsewhere (e.g. an import).
    fn observe(&mut self, _id: &IndividualId) {}
}

/// Monotonic decimal counter starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Counter starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Counter whose first id is `next`.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// The number the next id will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> IndividualId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        IndividualId::new(id.to_string())
    }

    fn observe(&mut self, id: &IndividualId) {
        if let Ok(n) = id.as_str().parse::<u64>() {
            if n >= self.next {
                self.next = n.saturating_add(1);
            }
        }
    }
}

/// Random v4 UUIDs; collisions are not a practical concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdAllocator for UuidIds {
    fn next_id(&mut self) -> IndividualId {
        IndividualId::new(Uuid::new_v4().to_string())
    }
}

/// Which allocator a tree is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// `1`, `2`, `3`, ...
    #[default]
    Sequential,
    /// Random v4 UUIDs.
    Uuid,
}

impl IdStrategy {
    /// Fresh allocator for this strategy.
    pub fn allocator(self) -> Box<dyn IdAllocator> {
        match self {
            IdStrategy::Sequential => Box::new(SequentialIds::new()),
            IdStrategy::Uuid => Box::new(UuidIds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_are_monotonic() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id().as_str(), "1");
        assert_eq!(ids.next_id().as_str(), "2");
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn observe_skips_past_imported_numeric_ids() {
        let mut ids = SequentialIds::new();
        ids.observe(&IndividualId::from("1719912345678"));
        ids.observe(&IndividualId::from("42"));
        ids.observe(&IndividualId::from("not-a-number"));
        assert_eq!(ids.next_id().as_str(), "1719912345679");
    }

    #[test]
    fn uuid_ids_do_not_repeat() {
        let mut ids = UuidIds;
        let seen: HashSet<_> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn strategy_builds_matching_allocator() {
        let mut seq = IdStrategy::Sequential.allocator();
        assert_eq!(seq.next_id().as_str(), "1");
        let mut uuid = IdStrategy::Uuid.allocator();
        assert_eq!(uuid.next_id().as_str().len(), 36);
    }
}
