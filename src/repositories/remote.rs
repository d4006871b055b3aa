// src/repositories/remote.rs - Links kept in an external record backend
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;

use super::{LinkRepository, NewLink, RecordClient, Result};
use crate::errors::{RecordClientError, RepositoryError};
use crate::models::{sort_newest_first, ShortLink};
use crate::utils::short_code::ShortCodePolicy;

/// A link in the backend's generic record schema. Every field is optional so
/// partial records and partial updates share one type.
#[derive(Debug, Default, Serialize)]
struct RemoteRecord {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<i64>,

    #[serde(rename = "short_code_c", skip_serializing_if = "Option::is_none")]
    short_code: Option<String>,

    #[serde(rename = "original_url_c", skip_serializing_if = "Option::is_none")]
    original_url: Option<String>,

    #[serde(rename = "custom_alias_c", skip_serializing_if = "Option::is_none")]
    custom_alias: Option<String>,

    #[serde(rename = "clicks_c", skip_serializing_if = "Option::is_none")]
    clicks: Option<i64>,

    #[serde(rename = "created_at_c", skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,

    /// Backend-managed creation stamp, used when `created_at_c` is unusable
    #[serde(rename = "CreatedOn", skip_serializing)]
    created_on: Option<DateTime<Utc>>,

    #[serde(rename = "last_clicked_at_c", skip_serializing_if = "Option::is_none")]
    last_clicked_at: Option<DateTime<Utc>>,

    #[serde(rename = "is_active_c", skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

/// Integer field; numeric strings are accepted
fn int_field(value: &Value, key: &str) -> Option<i64> {
    match value.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

fn bool_field(value: &Value, key: &str) -> Option<bool> {
    match value.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// RFC 3339 timestamp; ISO timestamps without an offset are read as UTC
fn time_field(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = value.get(key)?.as_str()?.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl RemoteRecord {
    /// Reads each field on its own, so one mistyped field never hides the rest
    fn decode(value: &Value) -> std::result::Result<Self, String> {
        if !value.is_object() {
            return Err(format!("record is not an object: {}", value));
        }

        Ok(Self {
            id: int_field(value, "Id"),
            short_code: str_field(value, "short_code_c"),
            original_url: str_field(value, "original_url_c"),
            custom_alias: str_field(value, "custom_alias_c"),
            clicks: int_field(value, "clicks_c"),
            created_at: time_field(value, "created_at_c"),
            created_on: time_field(value, "CreatedOn"),
            last_clicked_at: time_field(value, "last_clicked_at_c"),
            is_active: bool_field(value, "is_active_c"),
        })
    }

    fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Fields written when a link is first created
    fn for_new_link(link: &ShortLink) -> Self {
        Self {
            id: None,
            short_code: Some(link.short_code.clone()),
            original_url: Some(link.original_url.clone()),
            custom_alias: link.custom_alias.clone(),
            clicks: Some(0),
            created_at: Some(link.created_at),
            created_on: None,
            last_clicked_at: None,
            is_active: Some(link.is_active),
        }
    }

    fn into_link(self) -> std::result::Result<ShortLink, String> {
        let id = self.id.ok_or("record has no Id")?;
        let short_code = self
            .short_code
            .ok_or_else(|| format!("record {} has no short code", id))?;
        let original_url = self
            .original_url
            .ok_or_else(|| format!("record {} has no original URL", id))?;
        let created_at = self
            .created_at
            .or(self.created_on)
            .ok_or_else(|| format!("record {} has no creation time", id))?;

        Ok(ShortLink {
            id,
            short_code,
            original_url,
            custom_alias: self.custom_alias,
            clicks: u64::try_from(self.clicks.unwrap_or(0)).unwrap_or(0),
            created_at,
            last_clicked_at: self.last_clicked_at,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

fn decode_link(value: &Value) -> std::result::Result<ShortLink, String> {
    RemoteRecord::decode(value)?.into_link()
}

/// Codes and lower-cased aliases reserved by raw backend records, whatever
/// shape their other fields are in
fn taken_codes(records: &[Value]) -> HashSet<String> {
    let mut taken = HashSet::new();
    for record in records {
        if let Some(code) = record.get("short_code_c").and_then(Value::as_str) {
            taken.insert(code.to_string());
        }
        if let Some(alias) = record.get("custom_alias_c").and_then(Value::as_str) {
            taken.insert(alias.to_lowercase());
        }
    }
    taken
}

/// Repository backed by a [`RecordClient`] collection
pub struct RemoteLinkRepository<C: RecordClient> {
    client: Arc<C>,
    collection: String,
    policy: ShortCodePolicy,
}

impl<C: RecordClient> RemoteLinkRepository<C> {
    pub fn new(client: Arc<C>, collection: String, policy: ShortCodePolicy) -> Self {
        Self {
            client,
            collection,
            policy,
        }
    }

    /// Fetches the record for `id`, failing with `NotFound` when absent
    async fn fetch_link(&self, id: i64) -> Result<ShortLink> {
        let value = self
            .client
            .get_record(&self.collection, id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Link with Id {} not found", id)))?;
        decode_link(&value).map_err(RepositoryError::Backend)
    }

    /// Sends `patch` and returns the backend's echo, or `fallback` when the
    /// echo is not a complete record
    async fn patch(&self, id: i64, patch: RemoteRecord, fallback: ShortLink) -> Result<ShortLink> {
        let echoed = self
            .client
            .update_record(&self.collection, id, patch.encode())
            .await
            .map_err(|e| {
                error!("Failed to update link {}: {}", id, e);
                RepositoryError::from(e)
            })?;

        if echoed.is_null() {
            debug!("Link {} update echoed nothing; using local copy", id);
            return Ok(fallback);
        }
        match decode_link(&echoed) {
            Ok(link) => Ok(link),
            Err(reason) => {
                warn!(
                    "Link {} update echoed an unusable record ({}); using local copy",
                    id, reason
                );
                Ok(fallback)
            }
        }
    }
}

#[async_trait]
impl<C: RecordClient> LinkRepository for RemoteLinkRepository<C> {
    async fn list_all(&self) -> Vec<ShortLink> {
        let records = match self.client.fetch_records(&self.collection).await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to fetch links from {}: {}", self.collection, e);
                return Vec::new();
            }
        };

        let mut links: Vec<ShortLink> = records
            .into_iter()
            .filter_map(|value| match decode_link(&value) {
                Ok(link) => Some(link),
                Err(reason) => {
                    warn!("Skipping malformed link record: {}", reason);
                    None
                }
            })
            .collect();
        sort_newest_first(&mut links);
        links
    }

    async fn get_by_id(&self, id: i64) -> Option<ShortLink> {
        match self.fetch_link(id).await {
            Ok(link) => Some(link),
            Err(RepositoryError::NotFound(_)) => None,
            Err(e) => {
                warn!("Lookup of link {} failed: {}", id, e);
                None
            }
        }
    }

    async fn create(&self, original_url: &str, custom_alias: Option<&str>) -> Result<ShortLink> {
        let request = NewLink::parse(original_url, custom_alias)?;

        let existing = self
            .client
            .fetch_records(&self.collection)
            .await
            .map_err(|e| {
                error!("Failed to fetch links for uniqueness check: {}", e);
                RepositoryError::from(e)
            })?;

        let short_code = request.resolve_code(&taken_codes(&existing), &self.policy)?;
        let draft = ShortLink::new(
            0,
            short_code,
            request.original_url,
            request.custom_alias,
            Utc::now(),
        );

        let created = self
            .client
            .create_record(&self.collection, RemoteRecord::for_new_link(&draft).encode())
            .await
            .map_err(|e| {
                error!("Failed to create link {}: {}", draft.short_code, e);
                RepositoryError::from(e)
            })?;
        let link = decode_link(&created).map_err(RepositoryError::Backend)?;

        info!("Created link {} -> {}", link.short_code, link.original_url);
        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.client.delete_record(&self.collection, id).await {
            Ok(()) => {
                info!("Deleted link {}", id);
                Ok(())
            }
            Err(RecordClientError::NotFound(_)) => {
                debug!("Delete of missing link {} ignored", id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete link {}: {}", id, e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn increment_click(&self, id: i64) -> Result<ShortLink> {
        let mut link = self.fetch_link(id).await?;
        link.register_click(Utc::now());

        let patch = RemoteRecord {
            clicks: i64::try_from(link.clicks).ok(),
            last_clicked_at: link.last_clicked_at,
            ..Default::default()
        };
        self.patch(id, patch, link).await
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<ShortLink> {
        let mut link = self.fetch_link(id).await?;
        link.is_active = is_active;

        let patch = RemoteRecord {
            is_active: Some(is_active),
            ..Default::default()
        };
        self.patch(id, patch, link).await
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}
