//! Real file storage service implementation
//!
//! Stores each key as `<data_dir>/<key>.json`, writing through a temporary
//! file and a rename so a crash never leaves a half-written document.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{RosterError, RosterResult};
use crate::traits::StateStorage;
use shared::{process_debug, ProcessId};

/// Real file storage implementation
#[derive(Debug, Clone)]
pub struct RealFileStorage {
    /// Base directory for all stored documents
    base_dir: PathBuf,
}

impl RealFileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the document stored under `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StateStorage for RealFileStorage {
    async fn load(&self, key: &str) -> RosterResult<Option<String>> {
        let path = self.document_path(key);

        match fs::read_to_string(&path).await {
            Ok(blob) => {
                process_debug!(ProcessId::current(), "📂 Loaded {} ({} bytes)", path.display(), blob.len());
                Ok(Some(blob))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RosterError::storage("read", &path, e)),
        }
    }

    async fn save(&self, key: &str, blob: &str) -> RosterResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| RosterError::storage("create directory", &self.base_dir, e))?;

        let path = self.document_path(key);
        let staging = self.base_dir.join(format!(".{key}.json.tmp"));

        fs::write(&staging, blob)
            .await
            .map_err(|e| RosterError::storage("write", &staging, e))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| RosterError::storage("rename", &path, e))?;

        process_debug!(ProcessId::current(), "💾 Saved {} ({} bytes)", path.display(), blob.len());
        Ok(())
    }
}
