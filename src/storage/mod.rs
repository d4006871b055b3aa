//! Whole-collection persistence behind the local link repository.
//!
//! A store only knows how to read and write the full blob; Id assignment,
//! uniqueness and ordering live in the repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::models::ShortLink;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Reads every persisted record, in stored order
    async fn read_all(&self) -> Result<Vec<StoredLink>>;

    /// Replaces the persisted collection
    async fn write_all(&self, links: &[StoredLink]) -> Result<()>;

    fn name(&self) -> &'static str;
}

fn default_active() -> bool {
    true
}

/// On-disk shape of one link.
///
/// Carries the legacy string key `id` (`"link-<Id>"`) next to the numeric
/// `Id`, and accepts snake_case field names from older blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLink {
    #[serde(rename = "Id")]
    pub key: i64,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(alias = "short_code")]
    pub short_code: String,

    #[serde(alias = "original_url")]
    pub original_url: String,

    #[serde(default, alias = "custom_alias")]
    pub custom_alias: Option<String>,

    #[serde(default)]
    pub clicks: u64,

    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,

    #[serde(default, alias = "last_clicked_at")]
    pub last_clicked_at: Option<DateTime<Utc>>,

    #[serde(default = "default_active", alias = "is_active")]
    pub is_active: bool,
}

impl From<&ShortLink> for StoredLink {
    fn from(link: &ShortLink) -> Self {
        Self {
            key: link.id,
            id: Some(format!("link-{}", link.id)),
            short_code: link.short_code.clone(),
            original_url: link.original_url.clone(),
            custom_alias: link.custom_alias.clone(),
            clicks: link.clicks,
            created_at: link.created_at,
            last_clicked_at: link.last_clicked_at,
            is_active: link.is_active,
        }
    }
}

impl From<StoredLink> for ShortLink {
    fn from(stored: StoredLink) -> Self {
        Self {
            id: stored.key,
            short_code: stored.short_code,
            original_url: stored.original_url,
            custom_alias: stored.custom_alias,
            clicks: stored.clicks,
            created_at: stored.created_at,
            last_clicked_at: stored.last_clicked_at,
            is_active: stored.is_active,
        }
    }
}
