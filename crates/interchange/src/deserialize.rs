//! Deserialization from raw JSON documents into typed structs.
//!
//! One entry point per document kind: [`from_catalog`],
//! [`from_feature_collection`], [`from_map_catalog`] and
//! [`from_province_counts`].

use crate::types::*;
use std::fmt;

/// Errors during input document deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    MissingField { field: String },
    /// An element of the document could not be read.
    RecordError { index: usize, message: String },
    /// The document structure is invalid.
    InvalidDocument(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "document missing required field: '{}'", field)
            }
            InterchangeError::RecordError { index, message } => {
                write!(f, "record #{}: {}", index, message)
            }
            InterchangeError::InvalidDocument(msg) => {
                write!(f, "invalid document: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a catalog source: a JSON array of catalog entries.
pub fn from_catalog(doc: &serde_json::Value) -> Result<Vec<CatalogEntry>, InterchangeError> {
    let items = doc.as_array().ok_or_else(|| {
        InterchangeError::InvalidDocument("catalog source must be a JSON array".to_string())
    })?;

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(InterchangeError::RecordError {
                index,
                message: "catalog entry must be an object".to_string(),
            });
        }
        let entry: CatalogEntry =
            serde_json::from_value(item.clone()).map_err(|e| InterchangeError::RecordError {
                index,
                message: e.to_string(),
            })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Deserialize a GeoJSON FeatureCollection.
///
/// Features with a `null` properties member get an empty property map.
pub fn from_feature_collection(
    doc: &serde_json::Value,
) -> Result<FeatureCollection, InterchangeError> {
    if let Some(kind) = doc.get("type").and_then(|t| t.as_str()) {
        if kind != "FeatureCollection" {
            return Err(InterchangeError::InvalidDocument(format!(
                "expected a FeatureCollection, got '{}'",
                kind
            )));
        }
    }

    let features_arr = doc
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "features".to_string(),
        })?;

    let mut features = Vec::with_capacity(features_arr.len());
    for (index, obj) in features_arr.iter().enumerate() {
        if !obj.is_object() {
            return Err(InterchangeError::RecordError {
                index,
                message: "feature must be an object".to_string(),
            });
        }
        let geometry = obj.get("geometry").filter(|g| !g.is_null()).cloned();
        let properties = match obj.get("properties") {
            None | Some(serde_json::Value::Null) => serde_json::Map::new(),
            Some(serde_json::Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(InterchangeError::RecordError {
                    index,
                    message: "feature properties must be an object".to_string(),
                })
            }
        };
        features.push(Feature {
            geometry,
            properties,
        });
    }

    Ok(FeatureCollection { features })
}

/// Deserialize the map dataset catalog: a JSON array of
/// `{type, title: [...], description}` groups.
pub fn from_map_catalog(doc: &serde_json::Value) -> Result<Vec<MapDataset>, InterchangeError> {
    let items = doc.as_array().ok_or_else(|| {
        InterchangeError::InvalidDocument("map catalog must be a JSON array".to_string())
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<MapDataset>(item.clone()).map_err(|e| {
                InterchangeError::RecordError {
                    index,
                    message: e.to_string(),
                }
            })
        })
        .collect()
}

/// Deserialize a provincial count table: a JSON object mapping province
/// full names to counts. Non-numeric counts are read as 0.
pub fn from_province_counts(doc: &serde_json::Value) -> Result<ProvinceCounts, InterchangeError> {
    let obj = doc.as_object().ok_or_else(|| {
        InterchangeError::InvalidDocument("province counts must be a JSON object".to_string())
    })?;

    Ok(obj
        .iter()
        .map(|(name, count)| (name.clone(), count.as_f64().unwrap_or(0.0)))
        .collect())
}
