//! The map page's dataset catalog: data type → dataset → layer request.

use geofacet_interchange::MapDataset;
use serde::Serialize;

use crate::error::EngineError;
use crate::style::DataKind;

pub const NO_DESCRIPTION: &str = "No description available for this data type.";

/// Prefix of the POI datasets that are drawn as a provincial choropleth.
const PROVINCIAL_PREFIX: &str = "全国(";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapCatalog {
    groups: Vec<MapDataset>,
}

impl MapCatalog {
    pub fn new(groups: Vec<MapDataset>) -> Self {
        MapCatalog { groups }
    }

    /// Data types in catalog order.
    pub fn type_options(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.data_type.as_str()).collect()
    }

    fn group(&self, data_type: &str) -> Option<&MapDataset> {
        self.groups.iter().find(|g| g.data_type == data_type)
    }

    /// Datasets published for `data_type`; empty for unknown types.
    pub fn titles_for(&self, data_type: &str) -> &[String] {
        self.group(data_type).map(|g| g.title.as_slice()).unwrap_or(&[])
    }

    pub fn description_for(&self, data_type: &str) -> &str {
        self.group(data_type)
            .and_then(|g| g.description.as_deref())
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }

    /// First type and its first dataset, as after a reset.
    pub fn initial_selection(&self) -> MapSelection {
        let mut selection = MapSelection::default();
        if let Some(first) = self.groups.first() {
            selection.select_type(self, &first.data_type);
        }
        selection
    }
}

/// Current data type and dataset on the map page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapSelection {
    pub data_type: Option<String>,
    pub title: Option<String>,
}

impl MapSelection {
    /// Change the data type; the dataset moves to the type's first entry.
    pub fn select_type(&mut self, catalog: &MapCatalog, data_type: &str) {
        self.data_type = Some(data_type.to_string());
        self.title = catalog.titles_for(data_type).first().cloned();
    }

    pub fn select_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn reset(&mut self, catalog: &MapCatalog) {
        *self = catalog.initial_selection();
    }

    pub fn layer(&self, geodata: &str) -> Result<LayerRequest, EngineError> {
        resolve_layer(
            self.data_type.as_deref().unwrap_or(""),
            self.title.as_deref().unwrap_or(""),
            geodata,
        )
    }
}

/// What the map needs to load for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerRequest {
    /// Restyle the province boundaries from one year's count table.
    ProvinceChoropleth { year: String, counts_path: String },
    /// Load a GeoJSON dataset and draw it as `data_kind`.
    Dataset { data_kind: DataKind, path: String },
}

/// Join path segments with single slashes, keeping a leading `/`.
fn join_path(parts: &[&str]) -> String {
    let mut out = String::new();
    for part in parts {
        let part = if out.is_empty() {
            part.trim_end_matches('/')
        } else {
            part.trim_matches('/')
        };
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(part);
    }
    out
}

/// The `YYYY` in the first `(YYYY)` of `title`.
pub fn title_year(title: &str) -> Option<&str> {
    let mut rest = title;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let bytes = after.as_bytes();
        if bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b')' {
            return Some(&after[..4]);
        }
        rest = after;
    }
    None
}

/// Resolve a data type and dataset title to the layer to load.
///
/// POI datasets titled `全国(YYYY)` become a provincial choropleth backed by
/// `poi/全国(YYYY).json`; everything else is `{folder}/{title}.geojson`.
pub fn resolve_layer(
    data_type: &str,
    title: &str,
    geodata: &str,
) -> Result<LayerRequest, EngineError> {
    if data_type.is_empty() || title.is_empty() {
        return Err(EngineError::IncompleteSelection);
    }

    let data_kind = DataKind::parse(data_type);
    if data_kind == DataKind::Poi && title.starts_with(PROVINCIAL_PREFIX) {
        let year = title_year(title).ok_or_else(|| EngineError::MissingYear {
            title: title.to_string(),
        })?;
        let file = format!("全国({}).json", year);
        return Ok(LayerRequest::ProvinceChoropleth {
            year: year.to_string(),
            counts_path: join_path(&[geodata, "poi", &file]),
        });
    }

    let file = format!("{}.geojson", title);
    let path = join_path(&[geodata, data_kind.folder().unwrap_or(""), &file]);
    Ok(LayerRequest::Dataset { data_kind, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MapCatalog {
        MapCatalog::new(vec![
            MapDataset {
                data_type: "POI".to_string(),
                title: vec!["全国(2020)".to_string(), "成都".to_string()],
                description: Some("兴趣点".to_string()),
            },
            MapDataset {
                data_type: "OD流".to_string(),
                title: vec!["成都".to_string()],
                description: None,
            },
        ])
    }

    #[test]
    fn type_and_title_cascade() {
        let c = catalog();
        assert_eq!(c.type_options(), vec!["POI", "OD流"]);
        let mut sel = c.initial_selection();
        assert_eq!(sel.title.as_deref(), Some("全国(2020)"));
        sel.select_type(&c, "OD流");
        assert_eq!(sel.title.as_deref(), Some("成都"));
        sel.select_type(&c, "missing");
        assert_eq!(sel.title, None);
        sel.reset(&c);
        assert_eq!(sel.data_type.as_deref(), Some("POI"));
    }

    #[test]
    fn description_fallback() {
        let c = catalog();
        assert_eq!(c.description_for("POI"), "兴趣点");
        assert_eq!(c.description_for("OD流"), NO_DESCRIPTION);
        assert_eq!(c.description_for("nope"), NO_DESCRIPTION);
    }

    #[test]
    fn provincial_poi_resolves_to_choropleth() {
        let req = resolve_layer("POI", "全国(2020)", "data/geodata").unwrap();
        assert_eq!(
            req,
            LayerRequest::ProvinceChoropleth {
                year: "2020".to_string(),
                counts_path: "data/geodata/poi/全国(2020).json".to_string(),
            }
        );
    }

    #[test]
    fn provincial_without_year_is_an_error() {
        assert_eq!(
            resolve_layer("POI", "全国(最新)", "geodata").unwrap_err(),
            EngineError::MissingYear {
                title: "全国(最新)".to_string()
            }
        );
    }

    #[test]
    fn datasets_resolve_under_kind_folder() {
        match resolve_layer("OD流", "成都", "geodata/").unwrap() {
            LayerRequest::Dataset { data_kind, path } => {
                assert_eq!(data_kind, DataKind::OdFlow);
                assert_eq!(path, "geodata/od/成都.geojson");
            }
            other => panic!("expected Dataset, got {:?}", other),
        }
        match resolve_layer("AOI", "成都", "/srv/geodata").unwrap() {
            LayerRequest::Dataset { path, .. } => assert_eq!(path, "/srv/geodata/aoi/成都.geojson"),
            other => panic!("expected Dataset, got {:?}", other),
        }
        match resolve_layer("建筑", "北京", "geodata").unwrap() {
            LayerRequest::Dataset { path, .. } => assert_eq!(path, "geodata/北京.geojson"),
            other => panic!("expected Dataset, got {:?}", other),
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            resolve_layer("", "成都", "g").unwrap_err(),
            EngineError::IncompleteSelection
        );
        assert_eq!(
            MapSelection::default().layer("g").unwrap_err(),
            EngineError::IncompleteSelection
        );
    }

    #[test]
    fn year_extraction() {
        assert_eq!(title_year("全国(2019)"), Some("2019"));
        assert_eq!(title_year("x(ab)(2021)"), Some("2021"));
        assert_eq!(title_year("(20211)"), None);
        assert_eq!(title_year("2020"), None);
    }
}
