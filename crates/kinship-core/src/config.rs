//! Tree configuration

use crate::ids::IdStrategy;
use crate::layout::CanvasRegion;
use serde::{Deserialize, Serialize};

/// Settings a [`crate::FamilyTree`] is built with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Region new individuals are placed in
    pub canvas: CanvasRegion,
    /// How ids are allocated
    pub id_strategy: IdStrategy,
    /// Fixed seed for placement; `None` seeds from the OS
    pub placement_seed: Option<u64>,
    /// Reject updates that make someone their own ancestor
    pub reject_lineage_cycles: bool,
}

impl TreeConfig {
    /// Fix the placement seed so layouts are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.placement_seed = Some(seed);
        self
    }

    /// Choose how new ids are allocated.
    #[must_use]
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Refuse edits and imports that make someone their own ancestor.
    #[must_use]
    pub fn rejecting_lineage_cycles(mut self) -> Self {
        self.reject_lineage_cycles = true;
        self
    }
}
