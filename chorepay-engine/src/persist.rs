//! Whole-blob persistence collaborator. The entire [`AppState`] is
//! serialized as one JSON document under a fixed storage key and
//! rehydrated wholesale; writes are snapshot-then-rename so a crash can
//! never leave a partially written blob behind.

use std::path::{Path, PathBuf};

use chorepay_shared::domain::AppState;
use tracing::debug;

/// Fixed storage key the blob lives under.
pub const STORAGE_KEY: &str = "chorepay-storage.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn blob_path(&self) -> PathBuf {
        self.dir.join(STORAGE_KEY)
    }

    fn tmp_path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.tmp"))
    }

    /// Snapshot the full state to disk. The snapshot is encoded first,
    /// written to a sibling temp file, then renamed over the blob.
    pub async fn save(&self, state: &AppState) -> Result<(), PersistError> {
        let encoded = serde_json::to_vec(state)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &encoded).await?;
        tokio::fs::rename(&tmp, self.blob_path()).await?;
        debug!(path = %self.blob_path().display(), bytes = encoded.len(), "state saved");
        Ok(())
    }

    /// Load the persisted state, or `None` on first start.
    pub async fn load(&self) -> Result<Option<AppState>, PersistError> {
        let path = self.blob_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), "state loaded");
        Ok(Some(state))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
