//! Source adapters: where catalog and map documents come from.
//!
//! A [`SourceAdapter`] turns a location (a path relative to the data root)
//! into the text of one document. [`file::FileAdapter`] reads a local
//! directory, [`http::HttpAdapter`] fetches from a static file server.

pub mod file;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;

/// Fetches ONE document from ONE location.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch the raw text of the document at `location`.
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError>;

    /// This adapter's identifier ("file", "http").
    fn adapter_id(&self) -> &str;
}

/// Pick the adapter for a data root: an `http://` or `https://` URL is
/// fetched over HTTP, anything else is a local directory.
pub fn adapter_for(root: &str) -> Arc<dyn SourceAdapter> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Arc::new(http::HttpAdapter::new(root))
    } else {
        Arc::new(file::FileAdapter::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_use_http_and_paths_use_files() {
        assert_eq!(adapter_for("https://example.org/data").adapter_id(), "http");
        assert_eq!(adapter_for("http://localhost:8000").adapter_id(), "http");
        assert_eq!(adapter_for("./data").adapter_id(), "file");
        assert_eq!(adapter_for("/srv/geofacet").adapter_id(), "file");
    }
}
