//! Descriptive statistics over columns with missing values.
//!
//! Columns are `Option<f64>` slices aligned with the dataset's records. Every
//! function skips `None`, so a blank cell never counts as zero.

use serde::Serialize;

/// Sum of present values (an empty column sums to 0).
pub fn sum(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    values.into_iter().flatten().sum()
}

/// Arithmetic mean of present values, or NaN when there are none.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    let (total, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(total, n), v| (total + v, n + 1));
    if n == 0 { f64::NAN } else { total / n as f64 }
}

/// Pearson correlation over pairwise-complete observations.
///
/// Returns NaN with fewer than two complete pairs or when either side has
/// zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Quantile of an ascending-sorted slice with linear interpolation between
/// closest ranks (`q` in `[0, 1]`).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Five-number summary plus Tukey outliers for one box in a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub n: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Highest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        // q1/q3 always lie inside the fences, so both searches succeed.
        let lower_whisker = sorted.iter().copied().find(|v| *v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= hi_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(Self {
            n: sorted.len(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Map each value linearly from the column's observed range onto `[lo, hi]`.
///
/// Missing values map to `lo`; a column with a single distinct value maps
/// everything to the midpoint.
pub fn scale_linear(values: &[Option<f64>], (lo, hi): (f64, f64)) -> Vec<f64> {
    let present = values.iter().flatten().copied();
    let min = present.clone().fold(f64::INFINITY, f64::min);
    let max = present.fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| match v {
            None => lo,
            Some(_) if !(span.is_finite() && span > 0.0) => (lo + hi) / 2.0,
            Some(v) => lo + (v - min) / span * (hi - lo),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_sum_skip_missing() {
        let v = [Some(2.0), None, Some(4.0)];
        assert_eq!(sum(v), 6.0);
        assert_eq!(mean(v), 3.0);
        assert!(mean([None::<f64>, None]).is_nan());
        assert_eq!(sum(Vec::<Option<f64>>::new()), 0.0);
    }

    #[test]
    fn pearson_detects_perfect_relationships() {
        let x = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let up = [Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let down = [Some(8.0), Some(6.0), Some(4.0), Some(2.0)];
        assert!((pearson(&x, &up) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let x = [Some(1.0), Some(2.0), None, Some(3.0)];
        let y = [Some(1.0), Some(2.0), Some(100.0), Some(3.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_nan_for_constant_column() {
        let x = [Some(1.0), Some(1.0), Some(1.0)];
        let y = [Some(1.0), Some(2.0), Some(3.0)];
        assert!(pearson(&x, &y).is_nan());
    }

    #[test]
    fn box_stats_interpolate_quartiles() {
        let stats = BoxStats::from_values([1.0, 2.0, 3.0, 4.0, 5.0].map(Some)).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn box_stats_flag_outliers_beyond_fences() {
        let stats = BoxStats::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 40.0].map(Some)).unwrap();
        assert_eq!(stats.outliers, vec![40.0]);
        assert_eq!(stats.upper_whisker, 5.0);
    }

    #[test]
    fn scale_linear_maps_extremes_to_bounds() {
        let sizes = scale_linear(&[Some(10.0), Some(55.0), Some(100.0), None], (20.0, 200.0));
        assert_eq!(sizes, vec![20.0, 110.0, 200.0, 20.0]);

        let flat = scale_linear(&[Some(7.0), Some(7.0)], (20.0, 200.0));
        assert_eq!(flat, vec![110.0, 110.0]);
    }
}
