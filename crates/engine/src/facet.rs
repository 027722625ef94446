//! Facet definitions, options and selections.
//!
//! A facet chain is an ordered list of [`FacetDefinition`]s. Index 0 is
//! the top of the chain; selecting a value at index `i` narrows the option
//! domains of every facet after it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::filter::parse_leading_int;

/// How a facet's option values are ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetOrdering {
    /// Plain string order.
    #[default]
    Lexical,
    /// Ranked values first, in rank order; unranked values after them in
    /// string order.
    Priority { ranks: Vec<String> },
    /// Newest year first, by the value's leading integer.
    YearDescending,
}

/// How a selection is compared against a record's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Exact string equality.
    #[default]
    Exact,
    /// `"YYYY"` or inclusive `"YYYY-YYYY"` against the year taken from the
    /// record's date-bearing value.
    YearRange,
}

/// One filterable dimension of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDefinition {
    /// Stable facet identifier.
    pub id: String,
    /// Record key the facet's values are read from.
    pub key: String,
    /// Label of the synthetic "no selection" option.
    pub all_label: String,
    #[serde(default)]
    pub ordering: FacetOrdering,
    /// Text appended to each option label (e.g. a unit).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default)]
    pub matcher: MatchRule,
}

impl FacetDefinition {
    pub fn new(id: &str, key: &str, all_label: &str) -> Self {
        FacetDefinition {
            id: id.to_string(),
            key: key.to_string(),
            all_label: all_label.to_string(),
            ordering: FacetOrdering::Lexical,
            suffix: None,
            matcher: MatchRule::Exact,
        }
    }

    pub fn with_ordering(mut self, ordering: FacetOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub fn with_matcher(mut self, matcher: MatchRule) -> Self {
        self.matcher = matcher;
        self
    }

    /// Sort unique option values per this facet's ordering rule.
    pub fn sort_values(&self, values: &mut [String]) {
        match &self.ordering {
            FacetOrdering::Lexical => values.sort(),
            FacetOrdering::Priority { ranks } => {
                let rank = |v: &str| ranks.iter().position(|r| r == v);
                values.sort_by(|a, b| match (rank(a), rank(b)) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.cmp(b),
                });
            }
            FacetOrdering::YearDescending => {
                values.sort_by(|a, b| {
                    match (parse_leading_int(a), parse_leading_int(b)) {
                        (Some(x), Some(y)) => y.cmp(&x),
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    }
                    .then_with(|| a.cmp(b))
                });
            }
        }
    }

    /// Display text for one option value.
    pub fn label(&self, value: &str) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}", value, suffix),
            None => value.to_string(),
        }
    }
}

/// The catalog page's facet chain: type → level → city → time.
pub fn catalog_facets() -> Vec<FacetDefinition> {
    vec![
        FacetDefinition::new("type", "type", "全部类型"),
        FacetDefinition::new("level", "level", "全部级别").with_ordering(FacetOrdering::Priority {
            ranks: vec!["国家级".into(), "省级".into(), "市级".into()],
        }),
        FacetDefinition::new("city", "city", "全部区域"),
        FacetDefinition::new("time", "updateTime", "全部时间")
            .with_ordering(FacetOrdering::YearDescending)
            .with_suffix("年")
            .with_matcher(MatchRule::YearRange),
    ]
}

/// One entry of a facet's option list. The "all" entry has an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

impl FacetOption {
    pub fn all(label: &str) -> Self {
        FacetOption {
            value: String::new(),
            label: label.to_string(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.value.is_empty()
    }
}

/// The ordered option list of one facet, "all" first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub facet: String,
    pub options: Vec<FacetOption>,
}

impl FacetOptions {
    /// Option values without the "all" entry.
    pub fn values(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| !o.is_all())
            .map(|o| o.value.as_str())
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

/// Current selection per facet; `None` means "no selection".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    values: Vec<Option<String>>,
}

impl Selections {
    /// Nothing selected on a chain of `len` facets.
    pub fn empty(len: usize) -> Self {
        Selections {
            values: vec![None; len],
        }
    }

    /// Build from one raw value per facet; `""` means "no selection".
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Selections {
            values: values
                .into_iter()
                .map(|v| {
                    let v = v.as_ref();
                    (!v.is_empty()).then(|| v.to_string())
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The selection at `index`; out-of-range indices read as "no selection".
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    /// Set the selection at `index`, growing the list if needed.
    /// An empty value clears it.
    pub fn set(&mut self, index: usize, value: &str) {
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index] = (!value.is_empty()).then(|| value.to_string());
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = None;
        }
    }

    /// Raw values, `""` for "no selection".
    pub fn to_values(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| v.clone().unwrap_or_default())
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn priority_ordering_ranks_first_then_lexical() {
        let facet = &catalog_facets()[1];
        let mut values = strings(&["区县级", "市级", "国家级", "乡镇级", "省级"]);
        facet.sort_values(&mut values);
        assert_eq!(values, strings(&["国家级", "省级", "市级", "乡镇级", "区县级"]));
    }

    #[test]
    fn year_descending_puts_newest_first() {
        let facet = &catalog_facets()[3];
        let mut values = strings(&["2018", "2021-03", "unknown", "2019"]);
        facet.sort_values(&mut values);
        assert_eq!(values, strings(&["2021-03", "2019", "2018", "unknown"]));
    }

    #[test]
    fn lexical_ordering() {
        let facet = FacetDefinition::new("city", "city", "全部区域");
        let mut values = strings(&["b", "a", "c"]);
        facet.sort_values(&mut values);
        assert_eq!(values, strings(&["a", "b", "c"]));
    }

    #[test]
    fn suffix_formatter() {
        let facet = &catalog_facets()[3];
        assert_eq!(facet.label("2020"), "2020年");
        assert_eq!(catalog_facets()[0].label("POI"), "POI");
    }

    #[test]
    fn selections_treat_empty_as_none() {
        let mut sel = Selections::from_values(["POI", "", "成都"]);
        assert_eq!(sel.get(0), Some("POI"));
        assert_eq!(sel.get(1), None);
        assert_eq!(sel.get(7), None);
        assert_eq!(sel.active_count(), 2);
        sel.set(2, "");
        assert_eq!(sel.get(2), None);
        sel.set(4, "2020");
        assert_eq!(sel.len(), 5);
        assert_eq!(sel.to_values(), strings(&["POI", "", "", "", "2020"]));
    }

    #[test]
    fn facet_definition_from_toml_like_json() {
        let facet: FacetDefinition = serde_json::from_value(serde_json::json!({
            "id": "level",
            "key": "level",
            "all_label": "全部级别",
            "ordering": {"kind": "priority", "ranks": ["国家级"]}
        }))
        .unwrap();
        assert_eq!(facet.matcher, MatchRule::Exact);
        assert_eq!(
            facet.ordering,
            FacetOrdering::Priority {
                ranks: vec!["国家级".to_string()]
            }
        );
    }
}
