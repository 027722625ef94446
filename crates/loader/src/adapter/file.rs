//! Local directory adapter.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SourceAdapter;
use crate::error::LoadError;

/// Reads documents from files under a root directory.
pub struct FileAdapter {
    root: PathBuf,
}

impl FileAdapter {
    pub fn new(root: impl AsRef<Path>) -> Self {
        FileAdapter {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve `location` against the root. Leading slashes are ignored so
    /// site-absolute paths stay inside the root.
    pub fn resolve(&self, location: &str) -> PathBuf {
        self.root.join(location.trim_start_matches('/'))
    }
}

#[async_trait]
impl SourceAdapter for FileAdapter {
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        let path = self.resolve(location);
        tracing::debug!(path = %path.display(), "reading source");
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LoadError::NotFound {
                    location: location.to_string(),
                }
            } else {
                LoadError::Io {
                    location: location.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn adapter_id(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stays_under_root() {
        let adapter = FileAdapter::new("/srv/data");
        assert_eq!(
            adapter.resolve("/data/catalog.json"),
            PathBuf::from("/srv/data/data/catalog.json")
        );
        assert_eq!(
            adapter.resolve("geodata/poi/全国(2020).json"),
            PathBuf::from("/srv/data/geodata/poi/全国(2020).json")
        );
    }

    #[tokio::test]
    async fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        let adapter = FileAdapter::new(dir.path());
        assert_eq!(adapter.fetch_text("a.json").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileAdapter::new(dir.path());
        let err = adapter.fetch_text("nope.json").await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { ref location } if location == "nope.json"));
    }
}
