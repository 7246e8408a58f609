//! Vector index snapshot persistence
//!
//! Saves a persistable store's full item list as pretty-printed JSON and
//! loads it back. Load replaces items by id (upsert semantics); any I/O or
//! decode failure names the offending path.

use std::path::Path;

use docqa_core::IndexedItem;

use crate::vector_store::PersistableVectorStore;
use crate::RagError;

fn persistence_err(path: &Path, reason: impl ToString) -> RagError {
    RagError::Persistence {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Export the store's items to `path`, creating parent directories as
/// needed.
pub async fn save_index(
    store: &dyn PersistableVectorStore,
    path: impl AsRef<Path>,
) -> Result<(), RagError> {
    let path = path.as_ref();

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| persistence_err(path, e))?;
        }
    }

    let items = store.export_items().await?;
    let json = serde_json::to_string_pretty(&items).map_err(|e| persistence_err(path, e))?;
    std::fs::write(path, json).map_err(|e| persistence_err(path, e))?;

    tracing::info!(path = %path.display(), items = items.len(), "saved vector index snapshot");
    Ok(())
}

/// Load a snapshot from `path` into the store.
pub async fn load_index(
    store: &dyn PersistableVectorStore,
    path: impl AsRef<Path>,
) -> Result<(), RagError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(RagError::NotFound(path.display().to_string()));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| persistence_err(path, e))?;
    let items: Vec<IndexedItem> =
        serde_json::from_str(&raw).map_err(|e| persistence_err(path, e))?;

    let count = items.len();
    store.import_items(items).await?;

    tracing::info!(path = %path.display(), items = count, "loaded vector index snapshot");
    Ok(())
}
