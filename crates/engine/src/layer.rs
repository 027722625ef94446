//! Thematic layers: the provincial choropleth and graduated OD flows.

use geofacet_interchange::{FeatureCollection, ProvinceCounts};
use serde::Serialize;

use crate::classify::BreakMethod;
use crate::error::EngineError;
use crate::record::Record;
use crate::scheme::{ClassStyle, ClassificationScheme};
use crate::style::{choropleth_style, flow_style, Style};

/// Boundary feature property naming the province.
pub const PROVINCE_NAME_KEY: &str = "fullname";

/// Numeric attribute of an OD flow feature.
pub const FLOW_VALUE_KEY: &str = "num";

/// Give every boundary province a count, 0 where the table has none.
pub fn fill_missing_provinces(counts: &mut ProvinceCounts, boundary: &FeatureCollection) {
    for feature in &boundary.features {
        if let Some(name) = feature.facet(PROVINCE_NAME_KEY) {
            counts.entry(name.to_string()).or_insert(0.0);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceClass {
    pub name: Option<String>,
    pub count: f64,
    pub class: ClassStyle,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethLayer {
    pub scheme: ClassificationScheme,
    /// One entry per boundary feature, in feature order.
    pub provinces: Vec<ProvinceClass>,
}

/// Class every boundary province by its count.
///
/// Breakpoints are quantiles of the positive counts. Polygon features get
/// a count label; other geometries are filled without one.
pub fn province_choropleth<S: AsRef<str>>(
    boundary: &FeatureCollection,
    counts: &ProvinceCounts,
    colors: &[S],
) -> Result<ChoroplethLayer, EngineError> {
    let positive = counts.values().copied().filter(|&c| c > 0.0);
    let scheme = ClassificationScheme::from_values(positive, BreakMethod::Quantile, colors, None)?;
    tracing::debug!(breaks = ?scheme.breaks(), provinces = counts.len(), "choropleth breaks");

    let provinces = boundary
        .features
        .iter()
        .map(|feature| {
            let name = feature.facet(PROVINCE_NAME_KEY).map(str::to_string);
            let count = name
                .as_deref()
                .and_then(|n| counts.get(n))
                .copied()
                .unwrap_or(0.0);
            let class = scheme.style(Some(count));
            let mut style = choropleth_style(&class, &count.to_string());
            let is_polygon = feature
                .geometry_type()
                .is_some_and(|t| t.contains("Polygon"));
            if !is_polygon {
                style.label = None;
            }
            ProvinceClass {
                name,
                count,
                class,
                style,
            }
        })
        .collect();

    Ok(ChoroplethLayer { scheme, provinces })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowClass {
    pub value: Option<f64>,
    pub class: ClassStyle,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLayer {
    pub scheme: ClassificationScheme,
    pub flows: Vec<FlowClass>,
}

/// Class OD flow lines by `attribute` with natural breaks, coloring and
/// sizing each line by its class.
pub fn flow_layer<S: AsRef<str>>(
    flows: &FeatureCollection,
    attribute: &str,
    colors: &[S],
    widths: &[f64],
) -> Result<FlowLayer, EngineError> {
    let values: Vec<Option<f64>> = flows.features.iter().map(|f| f.number(attribute)).collect();
    let scheme = ClassificationScheme::from_values(
        values.iter().copied(),
        BreakMethod::Natural,
        colors,
        Some(widths),
    )?;

    let flows = values
        .into_iter()
        .map(|value| {
            let class = scheme.style(value);
            let style = flow_style(&class);
            FlowClass {
                value,
                class,
                style,
            }
        })
        .collect();

    Ok(FlowLayer { scheme, flows })
}
