use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::errors::{AppError, RepositoryError};
use crate::models::ShortLink;
use crate::storage::{JsonFileStore, MemoryStore};
use crate::utils::short_code::{generate_short_code, resolve_short_code, ShortCodePolicy};
use crate::validations::{validate_custom_alias, validate_url};

mod local;
mod record_client;
mod remote;
#[cfg(test)]
pub(crate) mod testing;

pub use local::LocalLinkRepository;
pub use record_client::{HttpRecordClient, RecordClient};
pub use remote::RemoteLinkRepository;

type Result<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Lists every stored link, most recently created first
    ///
    /// ### Returns
    /// * `Vec<ShortLink>` - All links; empty when the backend cannot be read
    ///   (the failure is logged, never returned)
    async fn list_all(&self) -> Vec<ShortLink>;

    /// Finds a link by its numeric Id
    ///
    /// ### Returns
    /// * `Option<ShortLink>` - `None` when missing or when the backend fails
    async fn get_by_id(&self, id: i64) -> Option<ShortLink>;

    /// Creates a link for `original_url`, keyed by `custom_alias` or a generated code
    ///
    /// ### Arguments
    /// * `original_url` - Absolute http(s) URL; surrounding whitespace is ignored
    /// * `custom_alias` - Optional user alias, stored as typed and lower-cased into the code
    ///
    /// ### Errors
    /// * `RepositoryError::Validation` - Malformed URL or alias; nothing is persisted
    /// * `RepositoryError::Conflict` - The alias is already in use
    /// * `RepositoryError::Generation` - No free code within the attempt cap
    /// * `RepositoryError::Backend` - Storage or network failure
    async fn create(&self, original_url: &str, custom_alias: Option<&str>) -> Result<ShortLink>;

    /// Deletes a link. A missing Id counts as success.
    ///
    /// ### Errors
    /// * `RepositoryError::Backend` - Storage or network failure
    async fn delete(&self, id: i64) -> Result<()>;

    /// Adds one click and stamps `last_clicked_at`
    ///
    /// Read-modify-write without concurrency control: two concurrent
    /// increments of the same link may count once.
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - No link with this Id
    /// * `RepositoryError::Backend` - Storage or network failure
    async fn increment_click(&self, id: i64) -> Result<ShortLink>;

    /// Sets the informational active flag
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - No link with this Id
    /// * `RepositoryError::Backend` - Storage or network failure
    async fn set_active(&self, id: i64, is_active: bool) -> Result<ShortLink>;

    /// Name reported by the health endpoint
    fn backend_name(&self) -> &'static str;
}

/// Validated, trimmed input of a create call
#[derive(Debug)]
pub(crate) struct NewLink {
    pub original_url: String,
    pub custom_alias: Option<String>,
}

impl NewLink {
    pub fn parse(original_url: &str, custom_alias: Option<&str>) -> Result<Self> {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return Err(RepositoryError::Validation(
                "Please enter a URL to shorten".to_string(),
            ));
        }
        validate_url(original_url)?;

        let custom_alias = custom_alias
            .map(str::trim)
            .filter(|alias| !alias.is_empty());
        if let Some(alias) = custom_alias {
            validate_custom_alias(alias)?;
        }

        Ok(Self {
            original_url: original_url.to_string(),
            custom_alias: custom_alias.map(str::to_string),
        })
    }

    /// Resolves the short code against the codes already in use
    pub fn resolve_code(
        &self,
        taken: &HashSet<String>,
        policy: &ShortCodePolicy,
    ) -> Result<String> {
        resolve_short_code(self.custom_alias.as_deref(), taken, policy, || {
            generate_short_code(policy.length)
        })
    }
}

/// Every short code and lower-cased alias in use by `links`
pub(crate) fn taken_codes<'a>(
    links: impl IntoIterator<Item = &'a ShortLink>,
) -> HashSet<String> {
    let mut taken = HashSet::new();
    for link in links {
        taken.insert(link.short_code.clone());
        if let Some(alias) = &link.custom_alias {
            taken.insert(alias.to_lowercase());
        }
    }
    taken
}

/// Builds the repository selected by configuration
pub fn build(
    storage: &StorageConfig,
    policy: ShortCodePolicy,
) -> std::result::Result<Arc<dyn LinkRepository>, AppError> {
    let repository: Arc<dyn LinkRepository> = match storage.backend {
        StorageBackend::Local => Arc::new(LocalLinkRepository::new(
            Arc::new(JsonFileStore::new(storage.local_path.clone())),
            policy,
        )),
        StorageBackend::Memory => Arc::new(LocalLinkRepository::new(
            Arc::new(MemoryStore::new()),
            policy,
        )),
        StorageBackend::Remote => {
            let remote = storage.remote.as_ref().ok_or_else(|| {
                AppError::Config("remote storage selected without REMOTE_BASE_URL".to_string())
            })?;
            let client = HttpRecordClient::new(remote)
                .map_err(|e| AppError::Config(format!("Failed to build record client: {}", e)))?;
            Arc::new(RemoteLinkRepository::new(
                Arc::new(client),
                remote.collection.clone(),
                policy,
            ))
        }
    };

    info!("Link repository ready (backend: {})", repository.backend_name());
    Ok(repository)
}
