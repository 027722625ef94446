//! What a catalog list shows for one entry.

use geofacet_interchange::CatalogEntry;
use serde::Serialize;

/// Shown in place of the list when no entry matches.
pub const NO_MATCHES: &str = "没有找到符合筛选条件的数据。";

/// Reported when a downloadable entry has no link.
pub const LINK_UNAVAILABLE: &str = "下载链接不可用。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Verified,
    Unverified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DownloadAction {
    /// Downloadable with a link to open.
    Open { url: String },
    /// Marked downloadable but there is no link.
    Unavailable,
    /// Not downloadable yet; the action is disabled.
    Disabled,
}

impl DownloadAction {
    pub fn for_entry(entry: &CatalogEntry) -> Self {
        if !entry.is_downloadable {
            return DownloadAction::Disabled;
        }
        match entry.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => DownloadAction::Open {
                url: url.to_string(),
            },
            None => DownloadAction::Unavailable,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, DownloadAction::Disabled)
    }

    pub fn label(&self) -> &'static str {
        if self.is_enabled() {
            "立即下载"
        } else {
            "暂不可下载"
        }
    }

    /// The link to open, or the message to show instead.
    pub fn activate(&self) -> Result<&str, &'static str> {
        match self {
            DownloadAction::Open { url } => Ok(url),
            DownloadAction::Unavailable | DownloadAction::Disabled => Err(LINK_UNAVAILABLE),
        }
    }
}

/// Display-ready view of a [`CatalogEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub title: String,
    pub description: String,
    pub size: String,
    pub update_time: String,
    pub provider: String,
    pub status: String,
    pub badge: Badge,
    pub tags: Vec<String>,
    pub formats: Vec<String>,
    pub download: DownloadAction,
}

impl CatalogItem {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        CatalogItem {
            title: entry.title.clone(),
            description: entry.description.clone(),
            size: entry.size.clone(),
            update_time: entry.update_time.clone().unwrap_or_default(),
            provider: entry.provider.clone(),
            status: entry.status.clone(),
            badge: if entry.is_verified {
                Badge::Verified
            } else {
                Badge::Unverified
            },
            tags: entry.tags.clone(),
            formats: entry.formats.clone(),
            download: DownloadAction::for_entry(entry),
        }
    }
}
