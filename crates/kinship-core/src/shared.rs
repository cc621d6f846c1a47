//! Thread-safe handle for multi-threaded hosts.
//!
//! One `RwLock` guards the whole tree. Each write operation holds the write
//! lock from planning through apply, so no reader ever sees half an
//! operation.

use crate::edges::Connection;
use crate::error::{SnapshotError, TreeError, TreeResult};
use crate::handle::FamilyTree;
use crate::layout::Position;
use crate::snapshot;
use crate::types::{Individual, IndividualDraft, IndividualId};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Cloneable, lock-guarded [`FamilyTree`].
#[derive(Debug, Clone, Default)]
pub struct SharedFamilyTree {
    inner: Arc<RwLock<FamilyTree>>,
}

impl SharedFamilyTree {
    /// Wrap an existing tree.
    pub fn new(tree: FamilyTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&FamilyTree) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Owned copy of one record.
    pub fn get(&self, id: &IndividualId) -> Option<Individual> {
        self.inner.read().get(id).cloned()
    }

    /// Owned copy of every record.
    pub fn all(&self) -> Vec<Individual> {
        self.inner.read().snapshot()
    }

    /// See [`FamilyTree::edges`].
    pub fn edges(&self) -> Vec<Connection> {
        self.inner.read().edges()
    }

    /// See [`FamilyTree::add`].
    pub fn add(&self, draft: IndividualDraft) -> TreeResult<IndividualId> {
        self.inner.write().add(draft)
    }

    /// See [`FamilyTree::update`].
    pub fn update(&self, id: &IndividualId, draft: IndividualDraft) -> TreeResult<()> {
        self.inner.write().update(id, draft)
    }

    /// See [`FamilyTree::remove`].
    pub fn remove(&self, id: &IndividualId) -> TreeResult<Individual> {
        self.inner.write().remove(id)
    }

    /// See [`FamilyTree::set_position`].
    pub fn set_position(&self, id: &IndividualId, position: Position) -> TreeResult<()> {
        self.inner.write().set_position(id, position)
    }

    /// See [`FamilyTree::import`].
    pub fn import(&self, text: &str) -> TreeResult<usize> {
        self.inner.write().import(text)
    }

    /// See [`FamilyTree::export`].
    pub fn export(&self) -> Result<String, TreeError> {
        Ok(self.inner.read().export()?)
    }

    /// Read a snapshot file, then replace the tree with it.
    ///
    /// The file is read and decoded before the lock is taken; the lock is
    /// held only for the validated swap.
    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
        let records = snapshot::read_file(path).await?;
        Ok(self.inner.write().replace_all(records)?)
    }

    /// Write the current tree to a snapshot file.
    pub async fn export_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let records = self.all();
        snapshot::write_file(path, &records).await
    }
}

impl From<FamilyTree> for SharedFamilyTree {
    fn from(tree: FamilyTree) -> Self {
        Self::new(tree)
    }
}
