//! Kinship core - family relationship graph with a consistency engine
//!
//! A [`FamilyTree`] holds individuals keyed by id. Every write keeps the
//! relationship edges mutually consistent:
//!
//! - `a.partner == b` exactly when `b.partner == a`
//! - `p` lists `c` as a child exactly when `c` lists `p` as a parent
//! - no record refers to an id that is not in the tree, or to itself
//!
//! Writes are planned against a read-only view of the store and applied in
//! one step, so a rejected operation leaves the tree untouched.
//!
//! ```
//! use kinship_core::{FamilyTree, IndividualDraft};
//!
//! let mut tree = FamilyTree::new();
//! let alice = tree.add(IndividualDraft::named("Alice")).unwrap();
//! let bob = tree.add(IndividualDraft::named("Bob").with_partner(alice.clone())).unwrap();
//! assert_eq!(tree.get(&alice).unwrap().partner(), Some(&bob));
//! ```

pub mod config;
pub mod edges;
pub(crate) mod engine;
pub mod error;
pub mod handle;
pub mod ids;
pub mod invariants;
pub mod layout;
pub mod lineage;
pub mod shared;
pub mod snapshot;
pub mod store;
pub mod test_harness;
pub mod types;

pub use config::TreeConfig;
pub use edges::{Connection, ConnectionKind};
pub use error::{FormatError, SnapshotError, TreeError, TreeResult, ValidationError};
pub use handle::{FamilyTree, Relatives};
pub use ids::{IdAllocator, IdStrategy, SequentialIds, UuidIds};
pub use invariants::{InvariantCheck, InvariantViolation};
pub use layout::{CanvasRegion, Position};
pub use shared::SharedFamilyTree;
pub use store::Store;
pub use types::{Gender, Individual, IndividualDraft, IndividualId};

/// Re-export test harness for external use
pub use test_harness::{run_simulator, SimulatorConfig, TestHarness};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
