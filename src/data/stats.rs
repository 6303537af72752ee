//! Pure statistical reductions feeding the charts. Every function here is
//! deterministic and side-effect free; the UI layer only consumes the
//! results.

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

/// A label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub label: String,
    pub count: usize,
}

/// Counts per label, in first-occurrence order. Missing cells are excluded,
/// matching `pandas.Series.value_counts`.
pub fn value_counts(labels: &[Option<String>]) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = Vec::new();
    for label in labels.iter().flatten() {
        match counts.iter_mut().find(|vc| vc.label == *label) {
            Some(vc) => vc.count += 1,
            None => counts.push(ValueCount {
                label: label.clone(),
                count: 1,
            }),
        }
    }
    counts
}

/// Stable-sort by descending count and keep the `n` most frequent labels.
/// Ties keep their first-occurrence order (no alphabetical re-sort); labels
/// past the cutoff are dropped entirely, not bucketed into "other".
pub fn top_n(mut counts: Vec<ValueCount>, n: usize) -> Vec<ValueCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// One half-open histogram bin `[start, end)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin the finite values of a numeric column. NaN / infinite cells are
/// skipped. Bin count follows numpy's "auto" rule: the larger of
/// Freedman–Diaconis and Sturges.
pub fn histogram(values: &[f64]) -> Vec<HistogramBin> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }
    finite.sort_by(f64::total_cmp);

    let n = finite.len();
    let min = finite[0];
    let max = finite[n - 1];
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: n,
        }];
    }

    let sturges = (n as f64).log2().ceil() as usize + 1;
    let iqr = percentile(&finite, 0.75) - percentile(&finite, 0.25);
    let fd = if iqr > 0.0 {
        let width = 2.0 * iqr / (n as f64).cbrt();
        ((max - min) / width).ceil() as usize
    } else {
        0
    };
    // A tiny IQR against a wide range can blow the FD count up; cap it.
    let n_bins = sturges.max(fd).clamp(1, 512);

    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in &finite {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// Box statistics
// ---------------------------------------------------------------------------

/// Five-number summary with 1.5·IQR whiskers clamped to the data range,
/// matching matplotlib's boxplot defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FiveNumberSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// Summarize the finite values of a slice; `None` when no finite value
/// remains.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);

    let q1 = percentile(&finite, 0.25);
    let median = percentile(&finite, 0.5);
    let q3 = percentile(&finite, 0.75);
    let iqr = q3 - q1;

    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;
    let lower_whisker = finite
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .unwrap_or(q1);
    let upper_whisker = finite
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);

    Some(FiveNumberSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
    })
}

/// Linear-interpolation percentile of sorted data (numpy's default method).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Grouped aggregation
// ---------------------------------------------------------------------------

/// Mean of `values` per label, labels in first-occurrence order. Rows with a
/// missing label or a non-finite value are skipped (seaborn's default
/// barplot estimator is the mean).
pub fn group_means(labels: &[Option<String>], values: &[f64]) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for (label, &v) in labels.iter().zip(values) {
        let (Some(label), true) = (label, v.is_finite()) else {
            continue;
        };
        match groups.iter_mut().find(|(l, _, _)| l == label) {
            Some((_, sum, n)) => {
                *sum += v;
                *n += 1;
            }
            None => groups.push((label.clone(), v, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(label, sum, n)| (label, sum / n as f64))
        .collect()
}

/// The finite `values` belonging to each label, labels in first-occurrence
/// order. Feeds the categorical-vs-numeric box plot.
pub fn group_values(labels: &[Option<String>], values: &[f64]) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (label, &v) in labels.iter().zip(values) {
        let (Some(label), true) = (label, v.is_finite()) else {
            continue;
        };
        match groups.iter_mut().find(|(l, _)| l == label) {
            Some((_, vs)) => vs.push(v),
            None => groups.push((label.clone(), vec![v])),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE evaluated at `n_points` positions across the data range,
/// scaled into histogram count space (density · n · bin_width) so the curve
/// overlays the bars. Bandwidth follows Scott's rule. Empty when the data
/// carries no spread.
pub fn kde_curve(values: &[f64], bin_width: f64, n_points: usize) -> Vec<[f64; 2]> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n < 2 || n_points < 2 {
        return Vec::new();
    }

    let mean = finite.iter().sum::<f64>() / n as f64;
    let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = var.sqrt();
    if std == 0.0 {
        return Vec::new();
    }
    let bandwidth = std * (n as f64).powf(-0.2);

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (n_points - 1) as f64;
    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * bandwidth * n as f64);
    let scale = n as f64 * bin_width;

    (0..n_points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = finite
                .iter()
                .map(|&v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over pairwise-complete observations (rows where
/// either side is non-finite are dropped, as `DataFrame.corr` does).
/// `None` when fewer than two complete pairs remain or a side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Pairwise Pearson matrix over the given columns. Undefined entries are
/// NaN; the diagonal is 1.0.
pub fn correlation_matrix(columns: &[&[f64]]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(columns[i], columns[j]).unwrap_or(f64::NAN);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn value_counts_first_occurrence_order() {
        let counts = value_counts(&labels(&["a", "a", "b", "b", "b", "c"]));
        let named: Vec<(&str, usize)> = counts
            .iter()
            .map(|vc| (vc.label.as_str(), vc.count))
            .collect();
        assert_eq!(named, vec![("a", 2), ("b", 3), ("c", 1)]);
    }

    #[test]
    fn top_n_sorts_descending_with_stable_ties() {
        let counts = value_counts(&labels(&["a", "a", "b", "b", "b", "c"]));
        let top = top_n(counts, 10);
        let named: Vec<(&str, usize)> = top
            .iter()
            .map(|vc| (vc.label.as_str(), vc.count))
            .collect();
        assert_eq!(named, vec![("b", 3), ("a", 2), ("c", 1)]);

        // Ties keep source order: x and y both count 2, x seen first.
        let tied = top_n(value_counts(&labels(&["x", "y", "x", "y", "z"])), 2);
        assert_eq!(tied[0].label, "x");
        assert_eq!(tied[1].label, "y");
    }

    #[test]
    fn top_n_truncates_past_cutoff() {
        let raw: Vec<Option<String>> = (0..15)
            .flat_map(|i| vec![Some(format!("l{i}")); 15 - i])
            .collect();
        let top = top_n(value_counts(&raw), 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].label, "l0");
        assert_eq!(top[0].count, 15);
    }

    #[test]
    fn value_counts_skips_missing() {
        let raw = vec![Some("a".to_string()), None, Some("a".to_string()), None];
        let counts = value_counts(&raw);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn histogram_skips_nan_and_counts_everything_else() {
        let values = vec![1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0, f64::NAN, 2.5];
        let bins = histogram(&values);
        assert!(!bins.is_empty());
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 6);
        assert!((bins[0].start - 1.0).abs() < 1e-12);
        assert!((bins.last().unwrap().end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_constant_column_is_one_bin() {
        let bins = histogram(&[2.0, 2.0, 2.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn five_number_summary_matches_linear_interpolation() {
        let s = five_number_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((s.q1 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q3 - 3.25).abs() < 1e-12);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 4.0);

        assert!(five_number_summary(&[f64::NAN]).is_none());
        assert!(five_number_summary(&[]).is_none());
    }

    #[test]
    fn whiskers_exclude_outliers() {
        let mut values: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        values.push(100.0);
        let s = five_number_summary(&values).unwrap();
        assert!(s.upper_whisker <= 10.0);
    }

    #[test]
    fn group_means_first_occurrence_order() {
        let l = labels(&["b", "a", "b", "a"]);
        let means = group_means(&l, &[10.0, 1.0, 20.0, 3.0]);
        assert_eq!(means, vec![("b".to_string(), 15.0), ("a".to_string(), 2.0)]);
    }

    #[test]
    fn group_means_skips_missing_and_nan() {
        let l = vec![Some("a".to_string()), None, Some("a".to_string())];
        let means = group_means(&l, &[1.0, 5.0, f64::NAN]);
        assert_eq!(means, vec![("a".to_string(), 1.0)]);
    }

    #[test]
    fn kde_peaks_near_the_mean_of_symmetric_data() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 3.0, 3.0];
        let curve = kde_curve(&values, 1.0, 101);
        assert_eq!(curve.len(), 101);
        let peak = curve
            .iter()
            .max_by(|a, b| a[1].total_cmp(&b[1]))
            .unwrap();
        assert!((peak[0] - 3.0).abs() < 0.5);
        assert!(kde_curve(&[2.0, 2.0, 2.0], 1.0, 50).is_empty());
    }

    #[test]
    fn pearson_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_pairwise_complete() {
        let x = [1.0, f64::NAN, 3.0, 4.0];
        let y = [2.0, 100.0, 6.0, 8.0];
        // The NaN row is dropped entirely, leaving a perfect fit.
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, 1.0], &[2.0, 3.0]).is_none());
    }

    #[test]
    fn correlation_matrix_shape_and_diagonal() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 1.0, 0.0];
        let m = correlation_matrix(&[&a, &b]);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[1][1], 1.0);
        assert!((m[0][1] + 1.0).abs() < 1e-12);
        assert_eq!(m[0][1], m[1][0]);
    }
}
