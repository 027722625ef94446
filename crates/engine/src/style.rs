//! Map layer styles and data kinds.
//!
//! Styles are plain data describing fill, stroke, point symbol and label;
//! a renderer turns them into whatever its map library expects.

use geofacet_interchange::Feature;
use serde::Serialize;

use crate::scheme::ClassStyle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: &str, width: f64) -> Self {
        Stroke {
            color: color.to_string(),
            width,
        }
    }
}

/// A filled circle point symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub radius: f64,
    pub fill: String,
    pub stroke: Stroke,
}

/// A text label drawn at the feature's centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub font: String,
    pub fill: String,
    pub halo: Stroke,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<Circle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl Style {
    pub fn polygon(fill: &str, stroke: Stroke) -> Self {
        Style {
            fill: Some(fill.to_string()),
            stroke: Some(stroke),
            ..Style::default()
        }
    }

    pub fn line(stroke: Stroke) -> Self {
        Style {
            stroke: Some(stroke),
            ..Style::default()
        }
    }

    pub fn point(radius: f64, fill: &str, stroke: Stroke) -> Self {
        Style {
            circle: Some(Circle {
                radius,
                fill: fill.to_string(),
                stroke,
            }),
            ..Style::default()
        }
    }

    pub fn with_label(mut self, text: &str) -> Self {
        self.label = Some(Label {
            text: text.to_string(),
            font: "10px Calibri,sans-serif".to_string(),
            fill: "#000".to_string(),
            halo: Stroke::new("#fff", 2.0),
        });
        self
    }
}

/// The province boundary layer's resting style: thin blue outline, no fill.
pub fn boundary_style() -> Style {
    Style::polygon("rgba(255, 255, 255, 0)", Stroke::new("rgba(123, 123, 201, 0.8)", 1.0))
}

/// A classed province: class color fill, dark outline, count label.
pub fn choropleth_style(class: &ClassStyle, label: &str) -> Style {
    Style::polygon(&class.color, Stroke::new("rgba(0, 0, 0, 0.5)", 0.8)).with_label(label)
}

/// A classed flow line. Sentinel classes draw transparent at the
/// narrowest width.
pub fn flow_style(class: &ClassStyle) -> Style {
    Style::line(Stroke::new(&class.color, class.width.unwrap_or(1.0)))
}

/// Search hit: red outline over a translucent red fill.
pub fn highlight_style() -> Style {
    Style::polygon("rgba(255,0,0,0.3)", Stroke::new("red", 3.0))
}

/// The kinds of dataset the map page knows how to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataKind {
    Poi,
    Aoi,
    OdFlow,
    WeiboCheckin,
    Trajectory,
    /// Any other data type; drawn with the fallback style.
    Other(String),
}

impl DataKind {
    pub fn parse(data_type: &str) -> Self {
        match data_type {
            "POI" => DataKind::Poi,
            "AOI" => DataKind::Aoi,
            "OD流" => DataKind::OdFlow,
            "微博签到" => DataKind::WeiboCheckin,
            "移动轨迹" => DataKind::Trajectory,
            other => DataKind::Other(other.to_string()),
        }
    }

    /// Folder under the geodata root holding this kind's GeoJSON files.
    /// Unknown kinds have none and resolve directly under the root.
    pub fn folder(&self) -> Option<&'static str> {
        match self {
            DataKind::Poi => Some("poi"),
            DataKind::Aoi => Some("aoi"),
            DataKind::OdFlow => Some("od"),
            DataKind::WeiboCheckin => Some("weibo"),
            DataKind::Trajectory => Some("trajectory"),
            DataKind::Other(_) => None,
        }
    }

    /// Whether features are styled per value rather than with one style.
    pub fn is_graduated(&self) -> bool {
        matches!(self, DataKind::OdFlow)
    }

    /// The single style for every feature of this kind. Graduated kinds
    /// return `None`.
    pub fn style(&self) -> Option<Style> {
        let style = match self {
            DataKind::Aoi => Style::polygon(
                "rgba(100, 149, 237, 0.4)",
                Stroke::new("rgba(65, 105, 225, 0.8)", 2.0),
            ),
            DataKind::OdFlow => return None,
            DataKind::Poi => {
                Style::point(7.0, "rgba(0, 128, 0, 0.7)", Stroke::new("rgba(0, 100, 0, 1)", 1.0))
            }
            DataKind::WeiboCheckin => Style::point(
                5.0,
                "rgba(255, 99, 132, 0.7)",
                Stroke::new("rgba(255, 0, 0, 1)", 1.0),
            ),
            DataKind::Trajectory => Style::line(Stroke::new("rgba(1, 43, 82, 0.93)", 3.0)),
            DataKind::Other(name) => {
                tracing::warn!(data_type = %name, "unknown data type, using default style");
                Style::polygon("rgba(255, 0, 0, 0.3)", Stroke::new("rgba(255, 0, 0, 0.8)", 2.0))
            }
        };
        Some(style)
    }
}

/// Case-insensitive keyword search over feature names.
///
/// Returns the highlight style for every feature whose `name` contains
/// the keyword and `None` (the layer's own style) for the rest. Features
/// without a name never match.
pub fn highlight_matches(features: &[Feature], keyword: &str) -> Vec<Option<Style>> {
    let needle = keyword.to_lowercase();
    features
        .iter()
        .map(|f| {
            f.property_str("name")
                .filter(|name| name.to_lowercase().contains(&needle))
                .map(|_| highlight_style())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: serde_json::Value) -> Feature {
        let mut f = Feature::default();
        f.properties.insert("name".to_string(), name);
        f
    }

    #[test]
    fn data_kinds_and_folders() {
        assert_eq!(DataKind::parse("OD流"), DataKind::OdFlow);
        assert_eq!(DataKind::parse("微博签到").folder(), Some("weibo"));
        assert_eq!(DataKind::parse("移动轨迹").folder(), Some("trajectory"));
        assert_eq!(DataKind::parse("建筑").folder(), None);
        assert!(DataKind::OdFlow.is_graduated());
        assert!(!DataKind::Poi.is_graduated());
    }

    #[test]
    fn flat_styles() {
        let poi = DataKind::Poi.style().unwrap();
        assert_eq!(poi.circle.as_ref().map(|c| c.radius), Some(7.0));
        let weibo = DataKind::WeiboCheckin.style().unwrap();
        assert_eq!(weibo.circle.as_ref().map(|c| c.radius), Some(5.0));
        let traj = DataKind::Trajectory.style().unwrap();
        assert_eq!(traj.stroke.as_ref().map(|s| s.width), Some(3.0));
        assert!(DataKind::OdFlow.style().is_none());
    }

    #[test]
    fn unknown_kind_gets_default_style() {
        let style = DataKind::parse("建筑").style().unwrap();
        assert_eq!(style.fill.as_deref(), Some("rgba(255, 0, 0, 0.3)"));
    }

    #[test]
    fn highlight_is_case_insensitive() {
        let features = vec![
            named(json!("Chengdu Park")),
            named(json!("Wuhou")),
            Feature::default(),
            named(json!(42)),
        ];
        let hits = highlight_matches(&features, "PARK");
        assert!(hits[0].is_some());
        assert!(hits[1].is_none());
        assert!(hits[2].is_none());
        assert!(hits[3].is_none());
        assert_eq!(hits[0].as_ref(), Some(&highlight_style()));
    }

    #[test]
    fn choropleth_style_labels_count() {
        let class = ClassStyle {
            class: Some(1),
            color: "#bae4b3".to_string(),
            width: None,
        };
        let style = choropleth_style(&class, "12");
        assert_eq!(style.fill.as_deref(), Some("#bae4b3"));
        assert_eq!(style.label.map(|l| l.text), Some("12".to_string()));
    }
}
