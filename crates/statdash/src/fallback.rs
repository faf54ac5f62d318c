//! Static substitute datasets for degraded mode.
//!
//! When the analytics service cannot be reached, the fetch controller shows
//! the matching dataset from a [`FallbackCatalog`] so every view stays
//! populated. Catalogs are immutable once built and shared behind an `Arc`;
//! the controller receives one at construction so tests can inject their own.
//!
//! Regression has no entry: a fabricated model summary would be mistaken for
//! a real fit.

use crate::types::{
    AssociationMatrix, BoxPlotGroup, DatasetSummary, DistributionStats, DistributionSummary,
    FittedCurve, GiniResult, MonteCarloResult, PcaResult, Series, TTestResult, ViewData, ViewKind,
};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

static BUILTIN: Lazy<Arc<FallbackCatalog>> = Lazy::new(|| Arc::new(FallbackCatalog::builtin()));

/// One substitute dataset per view.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackCatalog {
    pub summary: DatasetSummary,
    pub distribution: DistributionSummary,
    pub correlation: AssociationMatrix,
    pub association: AssociationMatrix,
    pub box_plot: Vec<BoxPlotGroup>,
    pub pca: PcaResult,
    pub ttest: TTestResult,
    pub gini: GiniResult,
    pub monte_carlo: MonteCarloResult,
}

// Shared read-only across every view and task.
static_assertions::assert_impl_all!(FallbackCatalog: Send, Sync);

impl FallbackCatalog {
    /// The process-wide built-in catalog.
    pub fn shared() -> Arc<FallbackCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// The substitute for `kind`, or `None` for views that are never faked.
    pub fn for_view(&self, kind: ViewKind) -> Option<ViewData> {
        let data = match kind {
            ViewKind::Summary => ViewData::Summary(self.summary.clone()),
            ViewKind::Distribution => ViewData::Distribution(self.distribution.clone()),
            ViewKind::Correlation => ViewData::Correlation(self.correlation.clone()),
            ViewKind::Association => ViewData::Association(self.association.clone()),
            ViewKind::BoxPlot => ViewData::BoxPlot(self.box_plot.clone()),
            ViewKind::Pca => ViewData::Pca(self.pca.clone()),
            ViewKind::TTest => ViewData::TTest(self.ttest.clone()),
            ViewKind::Gini => ViewData::Gini(self.gini.clone()),
            ViewKind::MonteCarlo => ViewData::MonteCarlo(self.monte_carlo.clone()),
            ViewKind::Regression => return None,
        };
        Some(data)
    }

    /// Build the default catalog.
    pub fn builtin() -> Self {
        Self {
            summary: builtin_summary(),
            distribution: builtin_distribution(),
            correlation: builtin_correlation(),
            association: builtin_association(),
            box_plot: builtin_box_plot(),
            pca: builtin_pca(),
            ttest: builtin_ttest(),
            gini: builtin_gini(),
            monte_carlo: builtin_monte_carlo(),
        }
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_summary() -> DatasetSummary {
    DatasetSummary {
        total_students: 705,
        avg_usage: 4.92,
        avg_addiction: 6.44,
        avg_mental_health: 6.23,
        columns: strings(&[
            "Student_ID",
            "Age",
            "Gender",
            "Academic_Level",
            "Country",
            "Avg_Daily_Usage_Hours",
            "Most_Used_Platform",
            "Affects_Academic_Performance",
            "Sleep_Hours_Per_Night",
            "Mental_Health_Score",
            "Relationship_Status",
            "Conflicts_Over_Social_Media",
            "Addicted_Score",
        ]),
    }
}

/// Normal density with a gentle deterministic wobble on the observed bars.
fn builtin_distribution() -> DistributionSummary {
    const BINS: usize = 30;
    const MEAN: f64 = 4.92;
    const STD: f64 = 1.26;
    const LOW: f64 = 1.5;
    const HIGH: f64 = 8.5;

    let width = (HIGH - LOW) / BINS as f64;
    let centers: Vec<f64> = (0..BINS).map(|i| LOW + width * (i as f64 + 0.5)).collect();
    let pdf = |x: f64| {
        let z = (x - MEAN) / STD;
        (-0.5 * z * z).exp() / (STD * (2.0 * std::f64::consts::PI).sqrt())
    };
    let fitted: Vec<f64> = centers.iter().map(|&x| pdf(x)).collect();
    let observed: Vec<f64> = fitted
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (1.0 + 0.08 * (i as f64 * 1.7).sin()))
        .collect();

    DistributionSummary {
        histogram: Series {
            x: centers.clone(),
            y: observed,
        },
        fitted: FittedCurve {
            x: centers,
            y: fitted,
            params: None,
        },
        stats: DistributionStats {
            mean: MEAN,
            std: STD,
            skewness: -0.04,
            kurtosis: -0.21,
        },
    }
}

fn builtin_correlation() -> AssociationMatrix {
    let cols = strings(&["Age", "Usage_Hrs", "Addiction", "Sleep", "Mental_Health"]);
    AssociationMatrix {
        x: cols.clone(),
        y: cols,
        z: vec![
            vec![1.0, 0.3, 0.1, -0.2, 0.05],
            vec![0.3, 1.0, 0.85, -0.5, 0.4],
            vec![0.1, 0.85, 1.0, -0.6, 0.7],
            vec![-0.2, -0.5, -0.6, 1.0, -0.3],
            vec![0.05, 0.4, 0.7, -0.3, 1.0],
        ],
    }
}

fn builtin_association() -> AssociationMatrix {
    let cols = strings(&[
        "Gender",
        "Academic_Level",
        "Most_Used_Platform",
        "Relationship_Status",
        "Affects_Academic_Performance",
    ]);
    AssociationMatrix {
        x: cols.clone(),
        y: cols,
        z: vec![
            vec![1.0, 0.12, 0.41, 0.08, 0.15],
            vec![0.12, 1.0, 0.22, 0.19, 0.27],
            vec![0.41, 0.22, 1.0, 0.17, 0.46],
            vec![0.08, 0.19, 0.17, 1.0, 0.11],
            vec![0.15, 0.27, 0.46, 0.11, 1.0],
        ],
    }
}

fn builtin_box_plot() -> Vec<BoxPlotGroup> {
    vec![
        BoxPlotGroup {
            category: "Male".to_string(),
            min: 20.0,
            q1: 35.0,
            median: 45.0,
            q3: 55.0,
            max: 70.0,
            outliers: vec![15.0, 75.0, 80.0],
            count: 120,
        },
        BoxPlotGroup {
            category: "Female".to_string(),
            min: 22.0,
            q1: 38.0,
            median: 48.0,
            q3: 60.0,
            max: 75.0,
            outliers: vec![18.0],
            count: 140,
        },
    ]
}

fn builtin_pca() -> PcaResult {
    PcaResult {
        explained_variance: vec![0.4, 0.3, 0.2, 0.1],
        cumulative_variance: vec![0.4, 0.7, 0.9, 1.0],
        components: vec![
            vec![0.5, -0.2, 0.8, 0.1],
            vec![0.4, 0.7, -0.3, 0.2],
            vec![0.6, 0.1, 0.5, -0.4],
            vec![0.2, -0.5, 0.1, 0.8],
        ],
        feature_names: strings(&["Usage", "Sleep", "Addiction", "Mental Health"]),
    }
}

fn builtin_ttest() -> TTestResult {
    TTestResult {
        t_statistic: 1.42,
        p_value: 0.156,
        groups: strings(&["Female", "Male"]),
        means: vec![6.52, 6.36],
    }
}

fn builtin_gini() -> GiniResult {
    GiniResult(BTreeMap::from([
        ("Avg_Daily_Usage_Hours".to_string(), 0.32),
        ("Addicted_Score".to_string(), 0.45),
        ("Mental_Health_Score".to_string(), 0.28),
    ]))
}

/// Bell-shaped bootstrap histogram of the mean addiction score.
fn builtin_monte_carlo() -> MonteCarloResult {
    let x: Vec<f64> = (30..50).map(f64::from).collect();
    let y = x
        .iter()
        .map(|v| 100.0 * (-(v - 40.0).powi(2) / 50.0).exp())
        .collect();
    MonteCarloResult {
        dist: Series { x, y },
        ci_95: [35.2, 44.8],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_is_well_formed() {
        let catalog = FallbackCatalog::builtin();
        for kind in ViewKind::ALL {
            if let Some(data) = catalog.for_view(kind) {
                assert_eq!(data.kind(), kind);
                data.validate().unwrap_or_else(|e| panic!("{kind}: {e}"));
            }
        }
    }

    #[test]
    fn test_regression_is_never_faked() {
        assert!(FallbackCatalog::builtin().for_view(ViewKind::Regression).is_none());
    }

    #[test]
    fn test_shared_is_a_single_instance() {
        let a = FallbackCatalog::shared();
        let b = FallbackCatalog::shared();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, FallbackCatalog::builtin());
    }

    #[test]
    fn test_entries_round_trip_through_json() {
        let catalog = FallbackCatalog::builtin();
        let data = catalog.for_view(ViewKind::BoxPlot).unwrap();
        let ViewData::BoxPlot(groups) = &data else {
            panic!("expected box plot");
        };
        let body = serde_json::to_value(groups).unwrap();
        assert_eq!(ViewData::decode(ViewKind::BoxPlot, body).unwrap(), data);
    }

    #[test]
    fn test_monte_carlo_peak() {
        let mc = builtin_monte_carlo();
        assert_eq!(mc.dist.len(), 20);
        assert_eq!(mc.dist.y[10], 100.0);
        assert!(mc.ci_95[0] <= mc.ci_95[1]);
    }
}
