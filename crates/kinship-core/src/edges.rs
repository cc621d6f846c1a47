//! Edge projection: drawable connections derived from the store.
//!
//! Nothing here is cached. Call [`project`] again after any change to the
//! tree or its layout.

use crate::layout::Position;
use crate::store::Store;
use serde::{Deserialize, Serialize};

/// What a drawn line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    /// Parent to child.
    ParentChild,
    /// Between two partners.
    Partnership,
}

/// One line to draw between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Parent-child or partnership.
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    /// Position of the parent, or the first partner.
    pub from: Position,
    /// Position of the child, or the second partner.
    pub to: Position,
    /// Stable key, `"{from_id}-{to_id}"`.
    pub key: String,
}

/// Derive every connection in store order.
///
/// Parent/child lines come from each individual's `children`. A partnership
/// is emitted once, from the side whose id sorts first. References to
/// individuals that are no longer present are skipped.
pub fn project(store: &Store) -> Vec<Connection> {
    let mut lines = Vec::new();

    for individual in store.all() {
        for child_id in individual.children() {
            if let Some(child) = store.get(child_id) {
                lines.push(Connection {
                    kind: ConnectionKind::ParentChild,
                    from: individual.position(),
                    to: child.position(),
                    key: format!("{}-{}", individual.id(), child_id),
                });
            }
        }

        if let Some(partner) = individual.partner().and_then(|id| store.get(id)) {
            if individual.id() < partner.id() {
                lines.push(Connection {
                    kind: ConnectionKind::Partnership,
                    from: individual.position(),
                    to: partner.position(),
                    key: format!("{}-{}", individual.id(), partner.id()),
                });
            }
        }
    }

    lines
}
