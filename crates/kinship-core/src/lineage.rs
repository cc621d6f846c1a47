//! Ancestry queries over parent/child edges.
//!
//! The tree does not forbid cycles by default. These helpers back the opt-in
//! `reject_lineage_cycles` setting and ancestry lookups for presentation.

use crate::store::Store;
use crate::types::Individual;
use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graphmap::DiGraphMap;

/// Parent → child graph over the given records.
fn descent_graph<'a>(records: impl Iterator<Item = &'a Individual>) -> DiGraphMap<&'a str, ()> {
    let mut graph = DiGraphMap::new();
    for record in records {
        graph.add_node(record.id().as_str());
        for child in record.children() {
            graph.add_edge(record.id().as_str(), child.as_str(), ());
        }
    }
    graph
}

/// True if some individual is (transitively) its own ancestor.
pub(crate) fn has_cycle<'a>(records: impl Iterator<Item = &'a Individual>) -> bool {
    is_cyclic_directed(&descent_graph(records))
}

/// True if `ancestor` reaches `descendant` by following child edges.
///
/// An individual is not its own ancestor.
pub fn is_ancestor(store: &Store, ancestor: &str, descendant: &str) -> bool {
    if ancestor == descendant || !store.contains(ancestor) || !store.contains(descendant) {
        return false;
    }
    let graph = descent_graph(store.all());
    has_path_connecting(&graph, ancestor, descendant, None)
}
