// src/services/short_link.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{
    CreateShortLinkDto, LinkStats, ShortLink, ShortLinkView, UpdateShortLinkDto,
};
use crate::repositories::LinkRepository;
use crate::types::Result;

#[async_trait]
pub trait ShortLinkServiceTrait {
    async fn list(&self) -> Vec<ShortLinkView>;
    async fn stats(&self) -> LinkStats;
    async fn get(&self, id: i64) -> Result<ShortLinkView>;
    async fn create(&self, dto: CreateShortLinkDto) -> Result<ShortLinkView>;
    async fn record_click(&self, id: i64) -> Result<ShortLinkView>;
    async fn set_active(&self, id: i64, dto: UpdateShortLinkDto) -> Result<ShortLinkView>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct ShortLinkService {
    repository: Arc<dyn LinkRepository>,
    domain: String,
}

impl ShortLinkService {
    pub fn new(repository: Arc<dyn LinkRepository>, domain: impl Into<String>) -> Self {
        Self {
            repository,
            domain: domain.into(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    fn view(&self, link: ShortLink) -> ShortLinkView {
        ShortLinkView::new(link, &self.domain, Utc::now())
    }
}

#[async_trait]
impl ShortLinkServiceTrait for ShortLinkService {
    async fn list(&self) -> Vec<ShortLinkView> {
        let now = Utc::now();
        self.repository
            .list_all()
            .await
            .into_iter()
            .map(|link| ShortLinkView::new(link, &self.domain, now))
            .collect()
    }

    async fn stats(&self) -> LinkStats {
        LinkStats::from_links(&self.repository.list_all().await)
    }

    async fn get(&self, id: i64) -> Result<ShortLinkView> {
        self.repository
            .get_by_id(id)
            .await
            .map(|link| self.view(link))
            .ok_or_else(|| AppError::NotFound(format!("Link with Id {} not found", id)))
    }

    async fn create(&self, dto: CreateShortLinkDto) -> Result<ShortLinkView> {
        let dto = dto.normalized();
        dto.validate()?;

        let link = self
            .repository
            .create(&dto.original_url, dto.custom_alias.as_deref())
            .await?;
        Ok(self.view(link))
    }

    async fn record_click(&self, id: i64) -> Result<ShortLinkView> {
        let link = self.repository.increment_click(id).await?;
        Ok(self.view(link))
    }

    async fn set_active(&self, id: i64, dto: UpdateShortLinkDto) -> Result<ShortLinkView> {
        let link = self.repository.set_active(id, dto.is_active).await?;
        Ok(self.view(link))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::LocalLinkRepository;
    use crate::storage::MemoryStore;
    use crate::utils::short_code::ShortCodePolicy;

    fn service() -> ShortLinkService {
        let repository = LocalLinkRepository::new(
            Arc::new(MemoryStore::new()),
            ShortCodePolicy::default(),
        );
        ShortLinkService::new(Arc::new(repository), "snip.link")
    }

    fn dto(url: &str, alias: Option<&str>) -> CreateShortLinkDto {
        CreateShortLinkDto {
            original_url: url.to_string(),
            custom_alias: alias.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_renders_share_url() {
        let svc = service();
        let view = svc
            .create(dto(" https://example.com/path ", Some(" Promo ")))
            .await
            .unwrap();

        assert_eq!(view.link.short_code, "promo");
        assert_eq!(view.link.original_url, "https://example.com/path");
        assert_eq!(view.short_url, "https://snip.link/promo");
        assert_eq!(view.created_ago, "less than a minute ago");
    }

    #[tokio::test]
    async fn test_blank_alias_generates_code() {
        let svc = service();
        let view = svc.create(dto("https://example.com", Some(""))).await.unwrap();
        assert_eq!(view.link.short_code.len(), 6);
        assert_eq!(view.link.custom_alias, None);
    }

    #[tokio::test]
    async fn test_validation_and_conflict_errors() {
        let svc = service();

        let err = svc.create(dto("not-a-url", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("original_url")));

        svc.create(dto("https://example.com", Some("Promo"))).await.unwrap();
        let err = svc
            .create(dto("https://example.com", Some("promo")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_click_stats_and_delete() {
        let svc = service();
        let link = svc.create(dto("https://example.com/path", None)).await.unwrap();
        svc.create(dto("https://example.com/other", None)).await.unwrap();

        let clicked = svc.record_click(link.link.id).await.unwrap();
        assert_eq!(clicked.link.clicks, 1);

        assert_eq!(
            svc.stats().await,
            LinkStats {
                total_links: 2,
                total_clicks: 1
            }
        );

        svc.delete(link.link.id).await.unwrap();
        assert!(matches!(svc.get(link.link.id).await, Err(AppError::NotFound(_))));
        assert_eq!(svc.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_set_active() {
        let svc = service();
        let link = svc.create(dto("https://example.com", None)).await.unwrap();

        let view = svc
            .set_active(link.link.id, UpdateShortLinkDto { is_active: false })
            .await
            .unwrap();
        assert!(!view.link.is_active);
        assert!(matches!(
            svc.record_click(99).await,
            Err(AppError::NotFound(_))
        ));
    }
}
