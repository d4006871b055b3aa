// src/repositories/local.rs - Links kept in a whole-collection store
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};

use super::{taken_codes, LinkRepository, NewLink, Result};
use crate::errors::RepositoryError;
use crate::models::{sort_newest_first, ShortLink};
use crate::storage::{LinkStore, StoredLink};
use crate::utils::short_code::ShortCodePolicy;

/// Repository over a [`LinkStore`]: every operation reads the full
/// collection, edits it in memory and writes it back
pub struct LocalLinkRepository<S: LinkStore> {
    store: Arc<S>,
    policy: ShortCodePolicy,
}

impl<S: LinkStore> LocalLinkRepository<S> {
    pub fn new(store: Arc<S>, policy: ShortCodePolicy) -> Self {
        Self { store, policy }
    }

    async fn load(&self) -> Result<Vec<ShortLink>> {
        let stored = self.store.read_all().await.map_err(|e| {
            error!("Failed to read {} link store: {}", self.store.name(), e);
            RepositoryError::from(e)
        })?;
        Ok(stored.into_iter().map(ShortLink::from).collect())
    }

    async fn persist(&self, links: &[ShortLink]) -> Result<()> {
        let stored: Vec<StoredLink> = links.iter().map(StoredLink::from).collect();
        self.store.write_all(&stored).await.map_err(|e| {
            error!("Failed to write {} link store: {}", self.store.name(), e);
            RepositoryError::from(e)
        })
    }

    /// Applies `change` to the link with `id` and persists the collection
    async fn modify<F>(&self, id: i64, change: F) -> Result<ShortLink>
    where
        F: FnOnce(&mut ShortLink) + Send,
    {
        let mut links = self.load().await?;
        let link = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Link with Id {} not found", id)))?;

        change(link);
        let updated = link.clone();

        self.persist(&links).await?;
        Ok(updated)
    }
}

#[async_trait]
impl<S: LinkStore> LinkRepository for LocalLinkRepository<S> {
    async fn list_all(&self) -> Vec<ShortLink> {
        match self.load().await {
            Ok(mut links) => {
                sort_newest_first(&mut links);
                links
            }
            Err(_) => Vec::new(),
        }
    }

    async fn get_by_id(&self, id: i64) -> Option<ShortLink> {
        match self.load().await {
            Ok(links) => links.into_iter().find(|l| l.id == id),
            Err(e) => {
                warn!("Lookup of link {} failed: {}", id, e);
                None
            }
        }
    }

    async fn create(&self, original_url: &str, custom_alias: Option<&str>) -> Result<ShortLink> {
        let request = NewLink::parse(original_url, custom_alias)?;
        let mut links = self.load().await?;

        let short_code = request.resolve_code(&taken_codes(&links), &self.policy)?;
        let id = links.iter().map(|l| l.id).max().unwrap_or(0) + 1;

        let link = ShortLink::new(
            id,
            short_code,
            request.original_url,
            request.custom_alias,
            Utc::now(),
        );
        links.push(link.clone());
        self.persist(&links).await?;

        info!("Created link {} -> {}", link.short_code, link.original_url);
        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut links = self.load().await?;
        let before = links.len();
        links.retain(|l| l.id != id);

        if links.len() == before {
            debug!("Delete of missing link {} ignored", id);
            return Ok(());
        }

        self.persist(&links).await?;
        info!("Deleted link {}", id);
        Ok(())
    }

    async fn increment_click(&self, id: i64) -> Result<ShortLink> {
        let link = self.modify(id, |l| l.register_click(Utc::now())).await?;
        debug!("Link {} now has {} clicks", id, link.clicks);
        Ok(link)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<ShortLink> {
        self.modify(id, |l| l.is_active = is_active).await
    }

    fn backend_name(&self) -> &'static str {
        self.store.name()
    }
}
