use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LinkStore, Result, StoredLink};

/// Process-local store; contents vanish on restart
#[derive(Default)]
pub struct MemoryStore {
    links: RwLock<Vec<StoredLink>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_links(links: Vec<StoredLink>) -> Self {
        Self {
            links: RwLock::new(links),
        }
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<StoredLink>> {
        Ok(self.links.read().await.clone())
    }

    async fn write_all(&self, links: &[StoredLink]) -> Result<()> {
        *self.links.write().await = links.to_vec();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
