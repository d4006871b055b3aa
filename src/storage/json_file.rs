use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, info};
use tokio::fs;

use super::{LinkStore, Result, StoredLink};
use crate::errors::StoreError;

/// Keeps the whole collection as one pretty-printed JSON array on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Using local link store at {}", path.display());
        Self { path }
    }
}

#[async_trait]
impl LinkStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<StoredLink>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            StoreError::Corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write_all(&self, links: &[StoredLink]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(links)
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        fs::write(&self.path, json).await?;
        debug!("Wrote {} links to {}", links.len(), self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::ShortLink;

    fn sample(id: i64) -> StoredLink {
        StoredLink::from(&ShortLink::new(
            id,
            format!("code{id}"),
            "https://example.com".to_string(),
            None,
            Utc::now(),
        ))
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("links.json"));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/data/links.json"));

        let written = vec![sample(1), sample(2)];
        store.write_all(&written).await.unwrap();

        assert_eq!(store.read_all().await.unwrap(), written);
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
