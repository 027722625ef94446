//! Class breakpoints and class lookup.
//!
//! Breakpoints are upper bounds: a value belongs to the first class whose
//! breakpoint is at or above it, and anything above the last breakpoint
//! lands in the last class.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Breakpoint computation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakMethod {
    #[default]
    Quantile,
    /// Jenks-style natural breaks via ckmeans.
    Natural,
}

impl fmt::Display for BreakMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakMethod::Quantile => write!(f, "quantile"),
            BreakMethod::Natural => write!(f, "natural"),
        }
    }
}

impl FromStr for BreakMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quantile" => Ok(BreakMethod::Quantile),
            "natural" | "jenks" => Ok(BreakMethod::Natural),
            other => Err(format!("unknown break method '{}'", other)),
        }
    }
}

/// Finite values only, sorted ascending.
fn sorted_finite<I>(values: I) -> Vec<f64>
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    let mut valid: Vec<f64> = values
        .into_iter()
        .filter_map(|v| Into::<Option<f64>>::into(v))
        .filter(|v| v.is_finite())
        .collect();
    valid.sort_by(f64::total_cmp);
    valid
}

/// Compute at most `class_count` ascending, unique breakpoints.
///
/// Non-finite and missing values are dropped first; no valid values means
/// no breakpoints. The last breakpoint is always the largest valid value.
pub fn compute_breaks<I>(values: I, class_count: usize, method: BreakMethod) -> Vec<f64>
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    let sorted = sorted_finite(values);
    let breaks = match method {
        BreakMethod::Quantile => quantile_sorted(&sorted, class_count),
        BreakMethod::Natural => natural_sorted(&sorted, class_count),
    };
    tracing::debug!(%method, class_count, values = sorted.len(), ?breaks, "computed breaks");
    breaks
}

/// Quantile breakpoints.
pub fn quantile_breaks<I>(values: I, class_count: usize) -> Vec<f64>
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    quantile_sorted(&sorted_finite(values), class_count)
}

/// Natural breakpoints, falling back to quantile breaks when ckmeans cannot
/// produce `class_count` distinct classes.
pub fn natural_breaks<I>(values: I, class_count: usize) -> Vec<f64>
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    natural_sorted(&sorted_finite(values), class_count)
}

fn quantile_sorted(sorted: &[f64], class_count: usize) -> Vec<f64> {
    let Some(&max) = sorted.last() else {
        return Vec::new();
    };
    let len = sorted.len();
    let mut breaks: Vec<f64> = (1..class_count)
        .map(|i| sorted[(len * i / class_count).min(len - 1)])
        .collect();
    breaks.push(max);
    breaks.sort_by(f64::total_cmp);
    breaks.dedup();
    breaks
}

fn natural_sorted(sorted: &[f64], class_count: usize) -> Vec<f64> {
    let Some(&max) = sorted.last() else {
        return Vec::new();
    };

    let clusters = match ckmeans(sorted, class_count) {
        Ok(clusters) => clusters,
        Err(e) => {
            tracing::warn!(error = %e, "natural breaks failed, falling back to quantile breaks");
            return quantile_sorted(sorted, class_count);
        }
    };

    let mut breaks: Vec<f64> = clusters.iter().filter_map(|c| c.last().copied()).collect();
    breaks.sort_by(f64::total_cmp);
    breaks.dedup();
    if breaks.last().is_some_and(|&last| last < max) {
        breaks.push(max);
    }

    if breaks.len() < class_count {
        tracing::warn!(
            classes = class_count,
            unique_breaks = breaks.len(),
            "not enough distinct clusters for natural breaks, falling back to quantile breaks"
        );
        return quantile_sorted(sorted, class_count);
    }
    breaks.truncate(class_count);
    breaks
}

/// Optimal 1-D k-means (Wang & Song's ckmeans) over `values`.
///
/// Returns `clusters` groups of sorted values, minimizing the total
/// within-group sum of squared deviations. A single distinct value yields
/// one group.
pub fn ckmeans(values: &[f64], clusters: usize) -> Result<Vec<Vec<f64>>, EngineError> {
    if clusters == 0 {
        return Err(EngineError::ZeroClusters);
    }
    if clusters > values.len() {
        return Err(EngineError::TooManyClusters {
            clusters,
            values: values.len(),
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();

    if sorted.first() == sorted.last() {
        return Ok(vec![sorted]);
    }

    let mut fill = MatrixFill::new(&sorted, clusters);
    fill.run();

    let mut groups = vec![Vec::new(); clusters];
    let mut right = n - 1;
    for cluster in (0..clusters).rev() {
        let left = fill.backtrack[cluster][right];
        groups[cluster] = sorted[left..=right].to_vec();
        if cluster > 0 {
            right = left.saturating_sub(1);
        }
    }
    Ok(groups)
}

/// Dynamic-programming state for ckmeans: cost and split matrices plus
/// shifted prefix sums for O(1) segment variance.
struct MatrixFill {
    cost: Vec<Vec<f64>>,
    backtrack: Vec<Vec<usize>>,
    sum_x: Vec<f64>,
    sum_x_sq: Vec<f64>,
}

impl MatrixFill {
    fn new(sorted: &[f64], clusters: usize) -> Self {
        let n = sorted.len();
        let shift = sorted[n / 2];
        let mut sum_x = Vec::with_capacity(n);
        let mut sum_x_sq = Vec::with_capacity(n);
        let (mut acc, mut acc_sq) = (0.0, 0.0);
        for &v in sorted {
            let shifted = v - shift;
            acc += shifted;
            acc_sq += shifted * shifted;
            sum_x.push(acc);
            sum_x_sq.push(acc_sq);
        }
        MatrixFill {
            cost: vec![vec![0.0; n]; clusters],
            backtrack: vec![vec![0; n]; clusters],
            sum_x,
            sum_x_sq,
        }
    }

    /// Sum of squared deviations of the segment `j..=i`.
    fn ssq(&self, j: usize, i: usize) -> f64 {
        let s = if j > 0 {
            let count = (i - j + 1) as f64;
            let mean = (self.sum_x[i] - self.sum_x[j - 1]) / count;
            self.sum_x_sq[i] - self.sum_x_sq[j - 1] - count * mean * mean
        } else {
            self.sum_x_sq[i] - self.sum_x[i] * self.sum_x[i] / (i + 1) as f64
        };
        s.max(0.0)
    }

    fn run(&mut self) {
        let n = self.sum_x.len();
        let clusters = self.cost.len();
        for i in 0..n {
            self.cost[0][i] = self.ssq(0, i);
            self.backtrack[0][i] = 0;
        }
        for cluster in 1..clusters {
            // Only the last column of the final row is ever read back.
            let i_min = if cluster < clusters - 1 { cluster } else { n - 1 };
            self.fill_column(i_min, n - 1, cluster);
        }
    }

    fn fill_column(&mut self, i_min: usize, i_max: usize, cluster: usize) {
        if i_min > i_max {
            return;
        }
        let n = self.sum_x.len();
        let i = (i_min + i_max) / 2;

        self.cost[cluster][i] = self.cost[cluster - 1][i - 1];
        self.backtrack[cluster][i] = i;

        let mut j_low = cluster;
        if i_min > cluster {
            j_low = j_low.max(self.backtrack[cluster][i_min - 1]);
        }
        j_low = j_low.max(self.backtrack[cluster - 1][i]);

        let mut j_high = i - 1;
        if i_max < n - 1 {
            j_high = j_high.min(self.backtrack[cluster][i_max + 1]);
        }

        let mut j = j_high;
        while j >= j_low {
            let s_ji = self.ssq(j, i);
            if s_ji + self.cost[cluster - 1][j_low - 1] >= self.cost[cluster][i] {
                break;
            }

            let ssq_low = self.ssq(j_low, i) + self.cost[cluster - 1][j_low - 1];
            if ssq_low < self.cost[cluster][i] {
                self.cost[cluster][i] = ssq_low;
                self.backtrack[cluster][i] = j_low;
            }
            j_low += 1;

            let ssq_j = s_ji + self.cost[cluster - 1][j - 1];
            if ssq_j < self.cost[cluster][i] {
                self.cost[cluster][i] = ssq_j;
                self.backtrack[cluster][i] = j;
            }
            j -= 1;
        }

        self.fill_column(i_min, i - 1, cluster);
        self.fill_column(i + 1, i_max, cluster);
    }
}

/// Class index of `value` against ascending `breaks` for a palette of
/// `class_count` classes.
///
/// `None` is the "no class" sentinel: the value is missing or NaN, the
/// breakpoint list is empty, or there are no classes at all.
pub fn classify(value: Option<f64>, breaks: &[f64], class_count: usize) -> Option<usize> {
    let value = value.filter(|v| !v.is_nan())?;
    if breaks.is_empty() || class_count == 0 {
        return None;
    }
    let index = breaks
        .iter()
        .position(|&b| value <= b)
        .unwrap_or(class_count - 1);
    Some(index.min(class_count - 1))
}

/// Width for a color from a palette-parallel width table.
///
/// An unknown color, or a position past the end of the table, resolves to
/// the narrowest width; an empty table resolves to 0.
pub fn width_for_color<S: AsRef<str>>(color: &str, palette: &[S], widths: &[f64]) -> f64 {
    palette
        .iter()
        .position(|c| c.as_ref() == color)
        .and_then(|i| widths.get(i).copied())
        .unwrap_or_else(|| narrowest(widths))
}

pub(crate) fn narrowest(widths: &[f64]) -> f64 {
    widths.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_with_outlier_ends_at_max() {
        let breaks = compute_breaks([1.0, 2.0, 3.0, 4.0, 100.0], 5, BreakMethod::Quantile);
        assert_eq!(breaks, vec![2.0, 3.0, 4.0, 100.0]);
        assert!(breaks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn quantile_picks_floor_positions() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(quantile_breaks(values, 5), vec![3.0, 5.0, 7.0, 9.0, 10.0]);
    }

    #[test]
    fn invalid_values_are_dropped() {
        let values = vec![Some(5.0), None, Some(f64::NAN), Some(f64::INFINITY), Some(1.0)];
        assert_eq!(quantile_breaks(values, 2), vec![5.0]);
    }

    #[test]
    fn nothing_valid_means_no_breaks() {
        assert!(compute_breaks(Vec::<f64>::new(), 5, BreakMethod::Natural).is_empty());
        assert!(compute_breaks([None, Some(f64::NAN)], 5, BreakMethod::Quantile).is_empty());
    }

    #[test]
    fn ckmeans_separates_obvious_groups() {
        let data = [1.0, 2.0, 4.0, 5.0, 12.0, 43.0, 52.0, 13.0, 6.0, 5.0];
        let groups = ckmeans(&data, 3).unwrap();
        assert_eq!(
            groups,
            vec![
                vec![1.0, 2.0, 4.0, 5.0, 5.0, 6.0],
                vec![12.0, 13.0],
                vec![43.0, 52.0]
            ]
        );
    }

    #[test]
    fn ckmeans_single_distinct_value() {
        assert_eq!(ckmeans(&[3.0, 3.0, 3.0], 2).unwrap(), vec![vec![3.0, 3.0, 3.0]]);
    }

    #[test]
    fn ckmeans_rejects_bad_cluster_counts() {
        assert_eq!(ckmeans(&[1.0, 2.0], 0).unwrap_err(), EngineError::ZeroClusters);
        assert_eq!(
            ckmeans(&[1.0, 2.0], 3).unwrap_err(),
            EngineError::TooManyClusters {
                clusters: 3,
                values: 2
            }
        );
    }

    #[test]
    fn natural_breaks_use_cluster_maxima() {
        let data = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 50.0, 51.0, 90.0, 100.0];
        let breaks = natural_breaks(data, 4);
        assert_eq!(breaks, vec![3.0, 12.0, 51.0, 100.0]);
    }

    #[test]
    fn natural_falls_back_with_few_distinct_values() {
        let data = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        assert_eq!(natural_breaks(data, 5), quantile_breaks(data, 5));
    }

    #[test]
    fn natural_falls_back_with_fewer_values_than_classes() {
        let data = [4.0, 9.0];
        assert_eq!(natural_breaks(data, 5), quantile_breaks(data, 5));
    }

    #[test]
    fn classify_upper_bounds() {
        let breaks = [10.0, 20.0, 30.0];
        assert_eq!(classify(Some(-5.0), &breaks, 5), Some(0));
        assert_eq!(classify(Some(10.0), &breaks, 5), Some(0));
        assert_eq!(classify(Some(10.5), &breaks, 5), Some(1));
        assert_eq!(classify(Some(30.0), &breaks, 5), Some(2));
        assert_eq!(classify(Some(31.0), &breaks, 5), Some(4));
    }

    #[test]
    fn classify_sentinels() {
        assert_eq!(classify(None, &[1.0], 5), None);
        assert_eq!(classify(Some(f64::NAN), &[1.0], 5), None);
        assert_eq!(classify(Some(1.0), &[], 5), None);
        assert_eq!(classify(Some(1.0), &[1.0], 0), None);
    }

    #[test]
    fn width_lookup_defaults_to_narrowest() {
        let palette = ["#a", "#b", "#c"];
        let widths = [2.0, 3.0, 4.0];
        assert_eq!(width_for_color("#b", &palette, &widths), 3.0);
        assert_eq!(width_for_color("#zzz", &palette, &widths), 2.0);
        assert_eq!(width_for_color("#c", &palette, &[5.0]), 5.0);
    }

    #[test]
    fn method_parsing() {
        assert_eq!("natural".parse::<BreakMethod>(), Ok(BreakMethod::Natural));
        assert_eq!("quantile".parse::<BreakMethod>(), Ok(BreakMethod::Quantile));
        assert!("median".parse::<BreakMethod>().is_err());
    }
}
