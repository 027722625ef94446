//! Typed structs for the catalog and map input documents.
//!
//! Facet-bearing fields are kept as `Option<String>`: a JSON number in such
//! a field is normalized to its decimal text, anything else that is not a
//! string (null, bool, object) is treated as absent. Feature properties stay
//! as a raw `serde_json::Map` because each map layer reads a different set
//! of attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ── Catalog ─────────────────────────────────────────────────────────

/// One downloadable dataset described in a catalog source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Data type (e.g. "POI", "AOI", "OD流").
    #[serde(rename = "type", default, deserialize_with = "facet_text")]
    pub data_type: Option<String>,
    /// Administrative level (e.g. "国家级", "省级", "市级").
    #[serde(default, deserialize_with = "facet_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "facet_text")]
    pub city: Option<String>,
    /// Year-bearing update stamp; its leading four characters are the year.
    #[serde(default, deserialize_with = "facet_text")]
    pub update_time: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_downloadable: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CatalogEntry {
    /// Look up a facet-bearing field by its JSON key.
    pub fn field(&self, key: &str) -> Option<&str> {
        let value = match key {
            "type" => self.data_type.as_deref(),
            "level" => self.level.as_deref(),
            "city" => self.city.as_deref(),
            "updateTime" => self.update_time.as_deref(),
            "title" => Some(self.title.as_str()),
            "provider" => Some(self.provider.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Accept a string or a number for a facet field; everything else is absent.
fn facet_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ── GeoJSON ─────────────────────────────────────────────────────────

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A single GeoJSON Feature. Geometry is carried opaquely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    /// A non-empty string property. Numbers are rendered as text.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// A string property borrowed as-is; numbers are not converted.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// A numeric property. Only JSON numbers count; numeric-looking
    /// strings are not numbers.
    pub fn property_number(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(|v| v.as_f64())
    }

    /// GeoJSON geometry type name ("Point", "MultiPolygon", ...).
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry
            .as_ref()
            .and_then(|g| g.get("type"))
            .and_then(|t| t.as_str())
    }
}

// ── Map dataset catalog ─────────────────────────────────────────────

/// One data type on the map page and the datasets published for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapDataset {
    #[serde(rename = "type")]
    pub data_type: String,
    /// Dataset names; each one names a GeoJSON file under the type's folder.
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Provincial statistics ───────────────────────────────────────────

/// Per-province counts for one year, keyed by the province's full name.
pub type ProvinceCounts = BTreeMap<String, f64>;
