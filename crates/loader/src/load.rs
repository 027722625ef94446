//! Document loaders built on a [`SourceAdapter`].

use std::sync::Arc;

use geofacet_interchange::{
    from_catalog, from_feature_collection, from_map_catalog, from_province_counts, CatalogEntry,
    FeatureCollection, MapDataset, ProvinceCounts,
};
use tokio::task::JoinSet;

use crate::adapter::SourceAdapter;
use crate::error::LoadError;

/// Fetch `location` and parse it as JSON.
pub async fn fetch_json(
    adapter: &dyn SourceAdapter,
    location: &str,
) -> Result<serde_json::Value, LoadError> {
    let text = adapter.fetch_text(location).await?;
    serde_json::from_str(&text).map_err(|e| LoadError::parse(location, e))
}

/// Load every catalog source concurrently and concatenate them in the
/// order given.
///
/// All or nothing: the first failed source aborts the fetches still in
/// flight and is the error returned.
pub async fn load_catalog(
    adapter: Arc<dyn SourceAdapter>,
    sources: &[String],
) -> Result<Vec<CatalogEntry>, LoadError> {
    let mut tasks = JoinSet::new();
    for (index, source) in sources.iter().enumerate() {
        let adapter = Arc::clone(&adapter);
        let source = source.clone();
        tasks.spawn(async move {
            let doc = fetch_json(adapter.as_ref(), &source).await?;
            let entries = from_catalog(&doc).map_err(|e| LoadError::parse(&source, e))?;
            Ok::<_, LoadError>((index, entries))
        });
    }

    let mut batches: Vec<Option<Vec<CatalogEntry>>> = (0..sources.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, entries) = match joined {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "catalog load failed");
                tasks.abort_all();
                return Err(e);
            }
            Err(e) => {
                tasks.abort_all();
                return Err(LoadError::Join(e.to_string()));
            }
        };
        tracing::debug!(source = %sources[index], entries = entries.len(), "catalog source loaded");
        batches[index] = Some(entries);
    }

    let entries: Vec<CatalogEntry> = batches.into_iter().flatten().flatten().collect();
    tracing::info!(sources = sources.len(), entries = entries.len(), "catalog loaded");
    Ok(entries)
}

/// Load one GeoJSON FeatureCollection.
pub async fn load_features(
    adapter: &dyn SourceAdapter,
    location: &str,
) -> Result<FeatureCollection, LoadError> {
    let doc = fetch_json(adapter, location).await?;
    let features = from_feature_collection(&doc).map_err(|e| LoadError::parse(location, e))?;
    if features.is_empty() {
        tracing::warn!(location, "feature collection is empty");
    } else {
        tracing::debug!(location, features = features.len(), "features loaded");
    }
    Ok(features)
}

/// Load the map page's dataset catalog.
pub async fn load_map_catalog(
    adapter: &dyn SourceAdapter,
    location: &str,
) -> Result<Vec<MapDataset>, LoadError> {
    let doc = fetch_json(adapter, location).await?;
    from_map_catalog(&doc).map_err(|e| LoadError::parse(location, e))
}

/// Load one year's province count table.
///
/// A missing table is not fatal: it reads as no counts, so every province
/// draws with count 0.
pub async fn load_province_counts(
    adapter: &dyn SourceAdapter,
    location: &str,
) -> Result<ProvinceCounts, LoadError> {
    let doc = match fetch_json(adapter, location).await {
        Ok(doc) => doc,
        Err(LoadError::NotFound { location }) => {
            tracing::warn!(%location, "no province counts for this year");
            return Ok(ProvinceCounts::new());
        }
        Err(e) => return Err(e),
    };
    from_province_counts(&doc).map_err(|e| LoadError::parse(location, e))
}
