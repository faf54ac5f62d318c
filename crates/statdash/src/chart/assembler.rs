//! Merging of parallel numeric arrays into per-category chart records.
//!
//! The primary sequence decides how many records there are and where they
//! sit on the categorical axis. Secondary sequences are read by index; a
//! secondary that is too short contributes `0.0` at the missing positions.
//! Length mismatches are never an error.

use crate::types::{DistributionSummary, MonteCarloResult, PcaResult};
use serde::{Deserialize, Serialize};

/// Decimal places used for categorical axis labels.
pub const LABEL_PRECISION: usize = 2;

/// Format a numeric x-position as a categorical axis label.
///
/// The label is for display only; the raw value stays on the record.
pub fn format_label(x: f64) -> String {
    format!("{:.*}", LABEL_PRECISION, x)
}

/// Turn a column identifier into a display label (`Avg_Daily_Usage` → `Avg Daily Usage`).
pub fn humanize_label(name: &str) -> String {
    name.replace('_', " ")
}

/// Value at `index`, or `0.0` when the sequence is too short.
#[inline]
fn value_or_zero(values: &[f64], index: usize) -> f64 {
    values.get(index).copied().unwrap_or(0.0)
}

/// One aligned record: a primary x-position and the secondary values at that index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub label: String,
    pub x: f64,
    pub values: Vec<f64>,
}

/// Merge `primary` with any number of secondary sequences.
///
/// Produces exactly `primary.len()` records, in order.
pub fn assemble_series(primary: &[f64], secondaries: &[&[f64]]) -> Vec<SeriesRecord> {
    primary
        .iter()
        .enumerate()
        .map(|(i, &x)| SeriesRecord {
            label: format_label(x),
            x,
            values: secondaries.iter().map(|s| value_or_zero(s, i)).collect(),
        })
        .collect()
}

/// Histogram bar with the fitted density at the same position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPoint {
    pub label: String,
    pub x: f64,
    pub frequency: f64,
    pub fitted: f64,
}

/// Histogram bins merged with the fitted curve, one record per bin.
pub fn distribution_points(summary: &DistributionSummary) -> Vec<DistributionPoint> {
    assemble_series(
        &summary.histogram.x,
        &[&summary.histogram.y, &summary.fitted.y],
    )
    .into_iter()
    .map(|record| DistributionPoint {
        frequency: record.values[0],
        fitted: record.values[1],
        label: record.label,
        x: record.x,
    })
    .collect()
}

/// Bootstrap histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinRecord {
    pub label: String,
    pub x: f64,
    pub frequency: f64,
}

pub fn monte_carlo_bins(result: &MonteCarloResult) -> Vec<BinRecord> {
    assemble_series(&result.dist.x, &[&result.dist.y])
        .into_iter()
        .map(|record| BinRecord {
            frequency: record.values[0],
            label: record.label,
            x: record.x,
        })
        .collect()
}

/// Scree plot bar and cumulative line point for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeRecord {
    pub component: String,
    pub variance: f64,
    pub cumulative: f64,
}

pub fn scree_records(pca: &PcaResult) -> Vec<ScreeRecord> {
    pca.explained_variance
        .iter()
        .enumerate()
        .map(|(i, &variance)| ScreeRecord {
            component: format!("PC{}", i + 1),
            variance,
            cumulative: value_or_zero(&pca.cumulative_variance, i),
        })
        .collect()
}

/// One feature's loading on every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingRow {
    pub feature: String,
    pub loadings: Vec<f64>,
}

/// Transpose the components × features loadings into feature rows.
pub fn loading_rows(pca: &PcaResult) -> Vec<LoadingRow> {
    pca.feature_names
        .iter()
        .enumerate()
        .map(|(i, feature)| LoadingRow {
            feature: feature.clone(),
            loadings: pca
                .components
                .iter()
                .map(|component| value_or_zero(component, i))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DistributionStats, FittedCurve, Series};
    use pretty_assertions::assert_eq;

    fn summary(hist_x: Vec<f64>, hist_y: Vec<f64>, fitted_y: Vec<f64>) -> DistributionSummary {
        DistributionSummary {
            histogram: Series {
                x: hist_x,
                y: hist_y,
            },
            fitted: FittedCurve {
                x: vec![],
                y: fitted_y,
                params: None,
            },
            stats: DistributionStats {
                mean: 0.0,
                std: 1.0,
                skewness: 0.0,
                kurtosis: 0.0,
            },
        }
    }

    #[test]
    fn test_format_label_two_decimals() {
        assert_eq!(format_label(12.3456), "12.35");
        assert_eq!(format_label(2.0), "2.00");
        assert_eq!(format_label(-0.5), "-0.50");
    }

    #[test]
    fn test_short_fitted_curve_pads_with_zero() {
        let points = distribution_points(&summary(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![0.1, 0.2, 0.3, 0.4],
            vec![0.15, 0.25],
        ));

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].fitted, 0.15);
        assert_eq!(points[1].fitted, 0.25);
        assert_eq!(points[2].fitted, 0.0);
        assert_eq!(points[3].fitted, 0.0);
        assert_eq!(points[3].frequency, 0.4);
        assert_eq!(points[3].label, "4.00");
    }

    #[test]
    fn test_record_count_follows_primary() {
        for n in 0..6 {
            for m in 0..=n {
                let xs: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
                let ys = vec![1.0; n];
                let fitted: Vec<f64> = (0..m).map(|i| i as f64 + 1.0).collect();
                let points = distribution_points(&summary(xs, ys, fitted));
                assert_eq!(points.len(), n);
                assert!(points[m..].iter().all(|p| p.fitted == 0.0));
            }
        }
    }

    #[test]
    fn test_longer_fitted_curve_is_truncated() {
        let points = distribution_points(&summary(vec![1.0], vec![0.5], vec![0.4, 0.3, 0.2]));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].fitted, 0.4);
    }

    #[test]
    fn test_assemble_series_multiple_secondaries() {
        let records = assemble_series(&[10.0, 20.0], &[&[1.0, 2.0], &[5.0]]);
        assert_eq!(
            records,
            vec![
                SeriesRecord {
                    label: "10.00".to_string(),
                    x: 10.0,
                    values: vec![1.0, 5.0],
                },
                SeriesRecord {
                    label: "20.00".to_string(),
                    x: 20.0,
                    values: vec![2.0, 0.0],
                },
            ]
        );
    }

    #[test]
    fn test_monte_carlo_bins() {
        let result = MonteCarloResult {
            dist: Series {
                x: vec![39.5, 40.25],
                y: vec![12.0, 30.0],
            },
            ci_95: [39.0, 41.0],
        };
        let bins = monte_carlo_bins(&result);
        assert_eq!(bins[1].label, "40.25");
        assert_eq!(bins[1].frequency, 30.0);
    }

    #[test]
    fn test_scree_and_loadings() {
        let pca = PcaResult {
            explained_variance: vec![0.4, 0.3, 0.2],
            cumulative_variance: vec![0.4, 0.7],
            components: vec![vec![0.5, -0.2], vec![0.4, 0.7]],
            feature_names: vec!["Usage".to_string(), "Sleep".to_string()],
        };

        let scree = scree_records(&pca);
        assert_eq!(scree[0].component, "PC1");
        assert_eq!(scree[2].cumulative, 0.0);

        let rows = loading_rows(&pca);
        assert_eq!(rows[0].feature, "Usage");
        assert_eq!(rows[0].loadings, vec![0.5, 0.4]);
        assert_eq!(rows[1].loadings, vec![-0.2, 0.7]);
    }

    #[test]
    fn test_humanize_label() {
        assert_eq!(humanize_label("Avg_Daily_Usage_Hours"), "Avg Daily Usage Hours");
    }
}
