//! Remembers the last-used player between dialogue sessions

use crate::core::error::{Result, SkillError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Storage for the name of the most recently used player
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// The remembered player name, `None` if nothing was stored yet
    async fn retrieve(&self) -> Result<Option<String>>;

    /// Replace the remembered player name
    async fn store(&self, name: &str) -> Result<()>;
}

/// On-disk record
#[derive(Debug, Serialize, Deserialize)]
struct LastPlayer {
    player: String,
}

/// Player store backed by a small JSON file
pub struct FilePlayerStore {
    path: PathBuf,
}

impl FilePlayerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlayerStore for FilePlayerStore {
    async fn retrieve(&self) -> Result<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: LastPlayer = serde_json::from_str(&content).map_err(|e| {
            SkillError::Persist(format!("Invalid state file {}: {}", self.path.display(), e))
        })?;
        Ok(Some(record.player))
    }

    async fn store(&self, name: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let record = LastPlayer {
            player: name.to_string(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Process-local player store
#[derive(Default)]
pub struct MemoryPlayerStore {
    player: Mutex<Option<String>>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(name: impl Into<String>) -> Self {
        Self {
            player: Mutex::new(Some(name.into())),
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn retrieve(&self) -> Result<Option<String>> {
        Ok(self.player.lock().await.clone())
    }

    async fn store(&self, name: &str) -> Result<()> {
        *self.player.lock().await = Some(name.to_string());
        Ok(())
    }
}
