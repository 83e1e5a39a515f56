//! Artifact sinks.
//!
//! A sink persists one JSON document per artifact key. The pipeline never
//! reads back what it wrote.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use super::StorageError;

/// Destination for aggregated artifacts.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Sink identifier for logging.
    fn name(&self) -> &'static str;

    /// Persist `document` under `key`, replacing any previous version.
    async fn store(&self, key: &str, document: &Value) -> Result<(), StorageError>;
}

/// Writes artifacts as JSON files below a root directory.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    root: PathBuf,
    pretty: bool,
}

impl FsArtifactSink {
    pub fn new(root: PathBuf) -> Self {
        Self { root, pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Path a key is written to. Keys must stay inside the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ArtifactSink for FsArtifactSink {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn store(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let body = if self.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        fs::write(&path, body).await?;

        debug!("Stored artifact {} at {:?}", key, path);
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.documents.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn store(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), document.clone());
        Ok(())
    }
}
