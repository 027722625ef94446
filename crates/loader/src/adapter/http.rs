//! HTTP adapter for data served as static files.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime.

use async_trait::async_trait;

use super::SourceAdapter;
use crate::error::LoadError;

/// Fetches documents with plain HTTP GET relative to a base URL.
///
/// No retries and no timeout beyond the agent defaults.
pub struct HttpAdapter {
    base_url: String,
}

impl HttpAdapter {
    pub fn new(base_url: &str) -> Self {
        HttpAdapter {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base_url}/{location}`; absolute URLs pass through unchanged.
    pub fn url_for(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl SourceAdapter for HttpAdapter {
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        let url = self.url_for(location);
        let loc = location.to_string();
        tracing::debug!(%url, "fetching source");

        tokio::task::spawn_blocking(move || {
            let agent = ureq::Agent::new_with_defaults();
            let response = agent.get(&url).call().map_err(|e| match e {
                ureq::Error::StatusCode(404) => LoadError::NotFound {
                    location: loc.clone(),
                },
                ureq::Error::StatusCode(status) => LoadError::Status {
                    location: loc.clone(),
                    status,
                },
                other => LoadError::Io {
                    location: loc.clone(),
                    message: other.to_string(),
                },
            })?;

            response
                .into_body()
                .read_to_string()
                .map_err(|e| LoadError::Io {
                    location: loc,
                    message: format!("failed to read response body: {}", e),
                })
        })
        .await
        .map_err(|e| LoadError::Join(e.to_string()))?
    }

    fn adapter_id(&self) -> &str {
        "http"
    }
}
