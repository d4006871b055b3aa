// src/models/short_link.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::time::relative_time;
use crate::validations::{validate_custom_alias, validate_url};

/// A short link as every caller sees it, whichever backend stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    /// Unique numeric identifier, assigned on creation
    #[serde(rename = "Id")]
    pub id: i64,

    /// Code appended to the share domain
    pub short_code: String,

    /// The long URL the code stands for
    pub original_url: String,

    /// Alias as typed by the user, if one was given
    pub custom_alias: Option<String>,

    pub clicks: u64,

    pub created_at: DateTime<Utc>,

    pub last_clicked_at: Option<DateTime<Utc>>,

    /// Informational only; nothing filters on it
    pub is_active: bool,
}

impl ShortLink {
    /// A freshly created link, before any click-through
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        custom_alias: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            custom_alias,
            clicks: 0,
            created_at,
            last_clicked_at: None,
            is_active: true,
        }
    }

    /// Counts one click-through. `last_clicked_at` never moves backwards.
    pub fn register_click(&mut self, now: DateTime<Utc>) {
        self.clicks = self.clicks.saturating_add(1);
        self.last_clicked_at = Some(match self.last_clicked_at {
            Some(previous) if previous > now => previous,
            _ => now,
        });
    }

    /// Fully-qualified share URL, e.g. `https://snip.link/abc123`
    pub fn short_url(&self, domain: &str) -> String {
        format!(
            "https://{}/{}",
            domain
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/'),
            self.short_code
        )
    }
}

/// Newest first, ties broken by the higher Id
pub fn sort_newest_first(links: &mut [ShortLink]) {
    links.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

// DTO for creating a new short link
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortLinkDto {
    #[validate(
        length(min = 1, max = 2048, message = "Please enter a URL to shorten"),
        custom(function = "validate_url")
    )]
    pub original_url: String,

    #[validate(custom(function = "validate_custom_alias"))]
    pub custom_alias: Option<String>,
}

impl CreateShortLinkDto {
    /// Trims both fields; a blank alias counts as no alias
    pub fn normalized(self) -> Self {
        Self {
            original_url: self.original_url.trim().to_string(),
            custom_alias: self
                .custom_alias
                .map(|alias| alias.trim().to_string())
                .filter(|alias| !alias.is_empty()),
        }
    }
}

// DTO for toggling the informational active flag
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShortLinkDto {
    pub is_active: bool,
}

// Response view with the share URL and a relative creation time
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkView {
    #[serde(flatten)]
    pub link: ShortLink,
    pub short_url: String,
    pub created_ago: String,
}

impl ShortLinkView {
    pub fn new(link: ShortLink, domain: &str, now: DateTime<Utc>) -> Self {
        Self {
            short_url: link.short_url(domain),
            created_ago: relative_time(link.created_at, now),
            link,
        }
    }
}

/// Aggregate counters shown next to the link list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total_links: usize,
    pub total_clicks: u64,
}

impl LinkStats {
    pub fn from_links(links: &[ShortLink]) -> Self {
        Self {
            total_links: links.len(),
            total_clicks: links.iter().map(|l| l.clicks).sum(),
        }
    }
}
