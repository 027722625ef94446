pub(crate) mod breaks;
pub(crate) mod catalog;
pub(crate) mod datasets;
pub(crate) mod layer;
pub(crate) mod search;
pub(crate) mod validate;

use std::path::Path;

use geofacet_interchange::{from_feature_collection, FeatureCollection};

/// Read a local GeoJSON FeatureCollection, with a printable error.
pub(crate) fn read_features(path: &Path) -> Result<FeatureCollection, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading file '{}': {}", path.display(), e))?;
    let doc: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| format!("error parsing JSON in '{}': {}", path.display(), e))?;
    from_feature_collection(&doc).map_err(|e| format!("error in '{}': {}", path.display(), e))
}
