//! Working-file session: load the tree, let a command edit it, save it back.

use anyhow::Context;
use kinship_core::{snapshot, FamilyTree, SnapshotError, TreeConfig};
use std::io::ErrorKind;
use std::path::Path;

/// Load `path` into a new tree. A missing file is an empty tree.
pub(crate) async fn open(path: &Path, config: TreeConfig) -> anyhow::Result<FamilyTree> {
    let mut tree = FamilyTree::with_config(config);
    match snapshot::read_file(path).await {
        Ok(records) => {
            tree.replace_all(records)
                .with_context(|| format!("loading {}", path.display()))?;
        }
        Err(SnapshotError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no family file yet, starting empty");
        }
        Err(e) => return Err(e).with_context(|| format!("loading {}", path.display())),
    }
    Ok(tree)
}

pub(crate) async fn save(path: &Path, tree: &FamilyTree) -> anyhow::Result<()> {
    snapshot::write_file(path, &tree.snapshot())
        .await
        .with_context(|| format!("saving {}", path.display()))
}
