//! `geofacet.toml`: where the data lives and how it is faceted and classed.
//!
//! Every section is optional; a missing file means built-in defaults.
//!
//! # Example
//!
//! ```toml
//! [data]
//! root = "site"
//! catalog = ["data/describe/poi.json", "data/describe/od.json"]
//! map_catalog = "data/describe/all.json"
//! boundary = "data/geodata/china.geojson"
//! geodata = "data/geodata"
//!
//! [catalog]
//! page_size = 10
//!
//! [[facets]]
//! id = "type"
//! key = "type"
//! all_label = "全部类型"
//!
//! [[facets]]
//! id = "time"
//! key = "updateTime"
//! all_label = "全部时间"
//! ordering = { kind = "year_descending" }
//! matcher = "year_range"
//! suffix = "年"
//!
//! [classes]
//! od_widths = [1.0, 1.5, 2.0, 3.0, 4.0]
//! ```

use std::path::Path;
use std::time::Duration;

use geofacet_engine::{catalog_facets, palettes, FacetDefinition};
use serde::{Deserialize, Serialize};

/// Config file read when `--config` is not given, if it exists.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "geofacet.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub data: DataSettings,
    pub catalog: CatalogSettings,
    /// Facet chain override; empty means the catalog's default chain.
    pub facets: Vec<FacetDefinition>,
    pub classes: ClassSettings,
}

/// `[data]`: document locations, relative to `root` (or `base_url`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DataSettings {
    pub root: String,
    /// Fetch over HTTP from here instead of reading `root`.
    pub base_url: Option<String>,
    /// Catalog sources, concatenated in this order.
    pub catalog: Vec<String>,
    pub map_catalog: String,
    /// Province boundaries for the choropleth.
    pub boundary: String,
    /// Directory holding the per-kind GeoJSON folders.
    pub geodata: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            root: ".".to_string(),
            base_url: None,
            catalog: ["weibo", "poi", "aoi", "trajectory", "od", "building"]
                .iter()
                .map(|name| format!("data/describe/{}.json", name))
                .collect(),
            map_catalog: "data/describe/all.json".to_string(),
            boundary: "data/geodata/china.geojson".to_string(),
            geodata: "data/geodata".to_string(),
        }
    }
}

/// `[catalog]`: list behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CatalogSettings {
    pub page_size: usize,
    /// Artificial delay before filters apply.
    pub apply_latency_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            page_size: 5,
            apply_latency_ms: 0,
        }
    }
}

/// `[classes]`: class count and palettes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ClassSettings {
    /// Default class count for `geofacet breaks`.
    pub count: usize,
    pub choropleth_colors: Vec<String>,
    pub od_colors: Vec<String>,
    /// Line widths parallel to `od_colors`.
    pub od_widths: Vec<f64>,
}

impl Default for ClassSettings {
    fn default() -> Self {
        ClassSettings {
            count: 5,
            choropleth_colors: palettes::CHOROPLETH.iter().map(|c| c.to_string()).collect(),
            od_colors: palettes::OD_FLOW.iter().map(|c| c.to_string()).collect(),
            od_widths: palettes::OD_FLOW_WIDTHS.to_vec(),
        }
    }
}

impl Config {
    /// The facet chain in effect.
    pub fn facet_chain(&self) -> Vec<FacetDefinition> {
        if self.facets.is_empty() {
            catalog_facets()
        } else {
            self.facets.clone()
        }
    }

    /// Root every data location is resolved against.
    pub fn source_root(&self) -> &str {
        self.data.base_url.as_deref().unwrap_or(&self.data.root)
    }

    pub fn apply_latency(&self) -> Duration {
        Duration::from_millis(self.catalog.apply_latency_ms)
    }

    /// Check the values serde cannot.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.page_size == 0 {
            return Err("catalog.page_size must be at least 1".to_string());
        }
        if self.classes.count == 0 {
            return Err("classes.count must be at least 1".to_string());
        }
        if self.classes.od_colors.len() != self.classes.od_widths.len() {
            return Err(format!(
                "classes.od_widths has {} entries but classes.od_colors has {}",
                self.classes.od_widths.len(),
                self.classes.od_colors.len()
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for facet in &self.facets {
            if !seen.insert(facet.id.as_str()) {
                return Err(format!("duplicate facet id '{}'", facet.id));
            }
        }
        Ok(())
    }
}

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub(crate) fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;
    config
        .validate()
        .map_err(|e| format!("invalid config '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// The config for this run: `explicit` if given (it must exist), else
/// `geofacet.toml` when present, else defaults. `data_root` replaces
/// `data.root` and turns off `data.base_url`.
pub(crate) fn load_config(
    explicit: Option<&Path>,
    data_root: Option<&str>,
) -> Result<Config, String> {
    let mut config = match explicit {
        Some(path) => read_config(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            read_config(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => Config::default(),
    };
    if let Some(root) = data_root {
        config.data.root = root.to_string();
        config.data.base_url = None;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofacet_engine::{FacetOrdering, MatchRule};

    #[test]
    fn defaults_match_the_site_layout() {
        let config = Config::default();
        assert_eq!(config.catalog.page_size, 5);
        assert_eq!(config.data.catalog.len(), 6);
        assert_eq!(config.data.catalog[1], "data/describe/poi.json");
        assert_eq!(config.source_root(), ".");
        assert_eq!(config.facet_chain().len(), 4);
        assert_eq!(config.apply_latency(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            page_size = 10

            [data]
            base_url = "https://example.org/site"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.page_size, 10);
        assert_eq!(config.catalog.apply_latency_ms, 0);
        assert_eq!(config.source_root(), "https://example.org/site");
        assert_eq!(config.data.geodata, "data/geodata");
        assert_eq!(config.classes.od_widths, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn facet_chain_override() {
        let config: Config = toml::from_str(
            r#"
            [[facets]]
            id = "level"
            key = "level"
            all_label = "全部级别"
            ordering = { kind = "priority", ranks = ["国家级", "省级"] }

            [[facets]]
            id = "time"
            key = "updateTime"
            all_label = "全部时间"
            ordering = { kind = "year_descending" }
            matcher = "year_range"
            suffix = "年"
            "#,
        )
        .unwrap();
        let chain = config.facet_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain[0].ordering,
            FacetOrdering::Priority {
                ranks: vec!["国家级".to_string(), "省级".to_string()]
            }
        );
        assert_eq!(chain[1].matcher, MatchRule::YearRange);
        assert_eq!(chain[1].suffix.as_deref(), Some("年"));
    }

    #[test]
    fn invalid_values_rejected() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        assert!(config.validate().unwrap_err().contains("page_size"));

        let mut config = Config::default();
        config.classes.od_widths.pop();
        assert!(config.validate().unwrap_err().contains("od_widths"));

        let mut config = Config::default();
        config.facets = vec![catalog_facets()[0].clone(), catalog_facets()[0].clone()];
        assert!(config.validate().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn data_root_override_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geofacet.toml");
        std::fs::write(&path, "[data]\nroot = \"site\"\n").unwrap();

        let config = load_config(Some(&path), Some("/srv/other")).unwrap();
        assert_eq!(config.data.root, "/srv/other");

        let err = load_config(Some(&dir.path().join("missing.toml")), None).unwrap_err();
        assert!(err.contains("could not read"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[catalog]\npage_size = \"five\"\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.starts_with("could not parse"));
        assert!(err.contains("bad.toml"));
    }
}
