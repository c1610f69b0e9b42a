//! Descriptive statistics and Pearson correlation.

use crate::models::{Column, ColumnSummary, Record};

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). NaN for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile of an ascending slice, interpolating linearly between ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pearson correlation coefficient of two paired series.
///
/// Returns NaN when there are fewer than two pairs or either series has
/// zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if is_constant(xs) || is_constant(ys) {
        return f64::NAN;
    }

    let mx = mean(xs);
    let my = mean(ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    // Rounding can push |r| a hair past 1.
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Non-null values of a column, in dataset order.
pub fn column_values(records: &[Record], column: Column) -> Vec<f64> {
    records.iter().filter_map(|r| column.value(r)).collect()
}

/// Pairs of values where both columns are present.
pub fn paired_values(records: &[Record], a: Column, b: Column) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .filter_map(|r| Some((a.value(r)?, b.value(r)?)))
        .unzip()
}

/// Summary statistics for each requested column.
pub fn describe(records: &[Record], columns: &[Column]) -> Vec<ColumnSummary> {
    columns
        .iter()
        .map(|&column| {
            let mut values = column_values(records, column);
            values.sort_by(f64::total_cmp);

            ColumnSummary {
                column,
                count: values.len(),
                mean: mean(&values),
                std: sample_std(&values),
                min: values.first().copied().unwrap_or(f64::NAN),
                p25: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                p75: quantile(&values, 0.75),
                max: values.last().copied().unwrap_or(f64::NAN),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(mean(&values), 5.0));
        // Sample variance: 32 / 7
        assert!(approx(sample_std(&values), (32.0f64 / 7.0).sqrt()));
        assert!(mean(&[]).is_nan());
        assert!(sample_std(&[1.0]).is_nan());
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile(&sorted, 0.0), 1.0));
        assert!(approx(quantile(&sorted, 0.25), 1.75));
        assert!(approx(quantile(&sorted, 0.5), 2.5));
        assert!(approx(quantile(&sorted, 1.0), 4.0));
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(pearson(&xs, &[2.0, 4.0, 6.0, 8.0]), 1.0));
        assert!(approx(pearson(&xs, &[8.0, 6.0, 4.0, 2.0]), -1.0));
    }

    #[test]
    fn test_pearson_undefined() {
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
    }

    #[test]
    fn test_describe_counts_non_null() {
        let base = Record {
            hours_coding: 1.0,
            commits: 2,
            bugs_reported: 0,
            ai_usage_hours: Some(1.0),
            task_success: true,
            cognitive_load: 5.0,
            coffee_intake_mg: 300.0,
            distractions: 1.0,
            sleep_hours: 7.0,
        };
        let records = vec![
            base.clone(),
            Record {
                hours_coding: 3.0,
                commits: 6,
                ai_usage_hours: None,
                ..base
            },
        ];

        let summary = describe(&records, &[Column::Commits, Column::AiUsageHours]);
        assert_eq!(summary[0].count, 2);
        assert!(approx(summary[0].mean, 4.0));
        assert!(approx(summary[0].min, 2.0));
        assert!(approx(summary[0].max, 6.0));
        assert!(approx(summary[0].median, 4.0));
        assert_eq!(summary[1].count, 1);
        assert!(summary[1].std.is_nan());
    }

    #[test]
    fn test_describe_empty_dataset() {
        let summary = describe(&[], &Column::ALL);
        assert_eq!(summary.len(), 9);
        assert!(summary.iter().all(|s| s.count == 0 && s.mean.is_nan() && s.max.is_nan()));
    }
}
