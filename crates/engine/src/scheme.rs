//! Classification schemes: breakpoints paired with colors and widths.
//!
//! A scheme answers "which class, which color, which width" for a value
//! in one step and hands back the class index alongside the style, so the
//! width never has to be recovered from the color.

use serde::Serialize;

use crate::classify::{classify, compute_breaks, narrowest, BreakMethod};
use crate::error::EngineError;

/// Fully transparent fill used for values outside every class.
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// Built-in palettes.
pub mod palettes {
    /// 5-class sequential green-blue, for provincial choropleths.
    pub const CHOROPLETH: [&str; 5] = ["#edf8e9", "#bae4b3", "#7bccc4", "#43a2ca", "#0868ac"];
    /// 5-class sequential reds, for OD flow lines.
    pub const OD_FLOW: [&str; 5] = ["#fee0d2", "#fc9272", "#fb6a4a", "#de2d26", "#a50f15"];
    /// Line widths parallel to [`OD_FLOW`]; larger flows draw thicker.
    pub const OD_FLOW_WIDTHS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
}

/// The style picked for one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStyle {
    /// Class index, `None` for the "no class" sentinel.
    pub class: Option<usize>,
    pub color: String,
    /// Stroke width, when the scheme carries a width table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl ClassStyle {
    pub fn is_sentinel(&self) -> bool {
        self.class.is_none()
    }
}

/// Ordered breakpoints with a parallel color palette and optional widths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationScheme {
    breaks: Vec<f64>,
    colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    widths: Option<Vec<f64>>,
}

impl ClassificationScheme {
    /// Build a scheme from explicit breakpoints.
    ///
    /// Breakpoints are sorted and de-duplicated; non-finite ones are
    /// dropped. The width table, when given, must match the palette.
    pub fn new<S: AsRef<str>>(
        breaks: Vec<f64>,
        colors: &[S],
        widths: Option<&[f64]>,
    ) -> Result<Self, EngineError> {
        if colors.is_empty() {
            return Err(EngineError::EmptyPalette);
        }
        if let Some(w) = widths {
            if w.len() != colors.len() {
                return Err(EngineError::SchemeMismatch {
                    colors: colors.len(),
                    widths: w.len(),
                });
            }
        }
        let mut breaks: Vec<f64> = breaks.into_iter().filter(|b| b.is_finite()).collect();
        breaks.sort_by(f64::total_cmp);
        breaks.dedup();

        Ok(ClassificationScheme {
            breaks,
            colors: colors.iter().map(|c| c.as_ref().to_string()).collect(),
            widths: widths.map(|w| w.to_vec()),
        })
    }

    /// Compute breakpoints from `values` with one class per color.
    pub fn from_values<I, S>(
        values: I,
        method: BreakMethod,
        colors: &[S],
        widths: Option<&[f64]>,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
        S: AsRef<str>,
    {
        let breaks = compute_breaks(values, colors.len(), method);
        Self::new(breaks, colors, widths)
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn widths(&self) -> Option<&[f64]> {
        self.widths.as_deref()
    }

    pub fn class_count(&self) -> usize {
        self.colors.len()
    }

    pub fn classify(&self, value: Option<f64>) -> Option<usize> {
        classify(value, &self.breaks, self.colors.len())
    }

    /// The "no class" style: transparent, narrowest width.
    pub fn sentinel(&self) -> ClassStyle {
        ClassStyle {
            class: None,
            color: TRANSPARENT.to_string(),
            width: self.widths.as_deref().map(narrowest),
        }
    }

    /// Class, color and width for `value`.
    pub fn style(&self, value: Option<f64>) -> ClassStyle {
        match self.classify(value) {
            Some(index) => ClassStyle {
                class: Some(index),
                color: self.colors[index].clone(),
                width: self.widths.as_ref().and_then(|w| w.get(index).copied()),
            },
            None => self.sentinel(),
        }
    }
}
