//! Result shapes returned by the analytics service.
//!
//! Every type here is an immutable value object: it is decoded fresh from
//! each response (or cloned from the fallback catalog) and never mutated.
//! Field names follow the service's JSON exactly.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ============================================================================
// View identity
// ============================================================================

/// The dashboard views that fetch a result from the analytics service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Summary,
    Distribution,
    Correlation,
    Association,
    BoxPlot,
    Pca,
    TTest,
    Gini,
    MonteCarlo,
    Regression,
}

impl ViewKind {
    /// All views, in navigation order.
    pub const ALL: [ViewKind; 10] = [
        ViewKind::Summary,
        ViewKind::Distribution,
        ViewKind::Correlation,
        ViewKind::Association,
        ViewKind::BoxPlot,
        ViewKind::Pca,
        ViewKind::TTest,
        ViewKind::Gini,
        ViewKind::MonteCarlo,
        ViewKind::Regression,
    ];

    /// Stable identifier used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Distribution => "distribution",
            Self::Correlation => "correlation",
            Self::Association => "association",
            Self::BoxPlot => "box_plot",
            Self::Pca => "pca",
            Self::TTest => "ttest",
            Self::Gini => "gini",
            Self::MonteCarlo => "monte_carlo",
            Self::Regression => "regression",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Result entities
// ============================================================================

/// Headline numbers for the landing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_students: u64,
    pub avg_usage: f64,
    pub avg_addiction: f64,
    pub avg_mental_health: f64,
    pub columns: Vec<String>,
}

/// Index-aligned `x`/`y` pairs (bin centers and heights).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn is_aligned(&self) -> bool {
        self.x.len() == self.y.len()
    }
}

/// Samples of the theoretical density fitted to a histogram.
///
/// `params` is whatever the service reports about the fit; it is carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedCurve {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub std: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Histogram of one column plus a fitted distribution curve.
///
/// The fitted curve lines up with the histogram by position and may be
/// shorter; missing positions read as 0 when merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub histogram: Series,
    pub fitted: FittedCurve,
    pub stats: DistributionStats,
}

impl DistributionSummary {
    pub fn validate(&self) -> Result<()> {
        if !self.histogram.is_aligned() {
            return Err(DashboardError::malformed(
                ViewKind::Distribution.as_str(),
                format!(
                    "histogram has {} bin centers but {} frequencies",
                    self.histogram.x.len(),
                    self.histogram.y.len()
                ),
            ));
        }
        Ok(())
    }
}

/// Row-major grid of pairwise coefficients.
///
/// `z[i][j]` relates row label `y[i]` to column label `x[j]`. Values are
/// usually in [-1, 1] (correlation) or [0, 1] (association) but no range is
/// enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationMatrix {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<Vec<f64>>,
}

impl AssociationMatrix {
    pub fn validate(&self, view: ViewKind) -> Result<()> {
        if self.z.len() != self.y.len() {
            return Err(DashboardError::malformed(
                view.as_str(),
                format!("{} row labels but {} rows", self.y.len(), self.z.len()),
            ));
        }
        if let Some((i, row)) = self
            .z
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.x.len())
        {
            return Err(DashboardError::malformed(
                view.as_str(),
                format!(
                    "row {i} has {} values, expected {}",
                    row.len(),
                    self.x.len()
                ),
            ));
        }
        Ok(())
    }
}

/// The five quantities a box-and-whisker glyph is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Box-plot statistics of one category.
///
/// `min`/`max` are the whisker ends (already clipped to 1.5 IQR upstream);
/// `outliers` lie beyond them. Quartile ordering is the service's contract
/// and is not re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotGroup {
    pub category: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    #[serde(default)]
    pub outliers: Vec<f64>,
    pub count: u64,
}

impl BoxPlotGroup {
    pub fn five_number(&self) -> FiveNumberSummary {
        FiveNumberSummary {
            min: self.min,
            q1: self.q1,
            median: self.median,
            q3: self.q3,
            max: self.max,
        }
    }

    /// Categories must be unique within one result set.
    pub fn validate_set(groups: &[BoxPlotGroup]) -> Result<()> {
        let mut seen = HashSet::with_capacity(groups.len());
        for group in groups {
            if !seen.insert(group.category.as_str()) {
                return Err(DashboardError::malformed(
                    ViewKind::BoxPlot.as_str(),
                    format!("duplicate category '{}'", group.category),
                ));
            }
        }
        Ok(())
    }
}

/// Principal component analysis output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaResult {
    pub explained_variance: Vec<f64>,
    pub cumulative_variance: Vec<f64>,
    /// Loadings, one row per component, one column per feature.
    pub components: Vec<Vec<f64>>,
    pub feature_names: Vec<String>,
}

impl PcaResult {
    pub fn validate(&self) -> Result<()> {
        if self.cumulative_variance.len() != self.explained_variance.len() {
            return Err(DashboardError::malformed(
                ViewKind::Pca.as_str(),
                format!(
                    "{} explained variances but {} cumulative values",
                    self.explained_variance.len(),
                    self.cumulative_variance.len()
                ),
            ));
        }
        if let Some((i, row)) = self
            .components
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.feature_names.len())
        {
            return Err(DashboardError::malformed(
                ViewKind::Pca.as_str(),
                format!(
                    "component {i} has {} loadings for {} features",
                    row.len(),
                    self.feature_names.len()
                ),
            ));
        }
        Ok(())
    }
}

/// Independent two-sample t-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub t_statistic: f64,
    pub p_value: f64,
    pub groups: Vec<String>,
    pub means: Vec<f64>,
}

impl TTestResult {
    /// Conventional significance level used to flag the result.
    pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

    pub fn is_significant(&self) -> bool {
        self.p_value < Self::SIGNIFICANCE_LEVEL
    }

    pub fn validate(&self) -> Result<()> {
        if self.means.len() != self.groups.len() {
            return Err(DashboardError::malformed(
                ViewKind::TTest.as_str(),
                format!(
                    "{} groups but {} means",
                    self.groups.len(),
                    self.means.len()
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.p_value) {
            return Err(DashboardError::malformed(
                ViewKind::TTest.as_str(),
                format!("p-value {} outside [0, 1]", self.p_value),
            ));
        }
        Ok(())
    }
}

/// Gini coefficient per metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GiniResult(pub BTreeMap<String, f64>);

impl GiniResult {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Bootstrap distribution of a sample mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub dist: Series,
    pub ci_95: [f64; 2],
}

impl MonteCarloResult {
    pub fn validate(&self) -> Result<()> {
        if !self.dist.is_aligned() {
            return Err(DashboardError::malformed(
                ViewKind::MonteCarlo.as_str(),
                format!(
                    "{} bin centers but {} frequencies",
                    self.dist.x.len(),
                    self.dist.y.len()
                ),
            ));
        }
        let [low, high] = self.ci_95;
        if low > high {
            return Err(DashboardError::malformed(
                ViewKind::MonteCarlo.as_str(),
                format!("confidence interval [{low}, {high}] is inverted"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionDiagnostics {
    pub r_squared: f64,
    pub aic: f64,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    #[serde(default)]
    pub pvalues: BTreeMap<String, f64>,
}

/// Fitted regression model.
///
/// `summary_html` is an opaque table rendered by the service; it is passed to
/// the host as-is and never parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub summary_html: String,
    pub diagnostics: RegressionDiagnostics,
}

// ============================================================================
// Decoded payloads
// ============================================================================

/// A decoded result for one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ViewData {
    Summary(DatasetSummary),
    Distribution(DistributionSummary),
    Correlation(AssociationMatrix),
    Association(AssociationMatrix),
    BoxPlot(Vec<BoxPlotGroup>),
    Pca(PcaResult),
    TTest(TTestResult),
    Gini(GiniResult),
    MonteCarlo(MonteCarloResult),
    Regression(RegressionSummary),
}

impl ViewData {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Summary(_) => ViewKind::Summary,
            Self::Distribution(_) => ViewKind::Distribution,
            Self::Correlation(_) => ViewKind::Correlation,
            Self::Association(_) => ViewKind::Association,
            Self::BoxPlot(_) => ViewKind::BoxPlot,
            Self::Pca(_) => ViewKind::Pca,
            Self::TTest(_) => ViewKind::TTest,
            Self::Gini(_) => ViewKind::Gini,
            Self::MonteCarlo(_) => ViewKind::MonteCarlo,
            Self::Regression(_) => ViewKind::Regression,
        }
    }

    /// Decode a raw response body for `kind` and check its shape.
    ///
    /// Missing fields, wrong types and misaligned arrays all become
    /// [`DashboardError::MalformedResult`].
    pub fn decode(kind: ViewKind, body: serde_json::Value) -> Result<Self> {
        let data = match kind {
            ViewKind::Summary => Self::Summary(from_body(kind, body)?),
            ViewKind::Distribution => Self::Distribution(from_body(kind, body)?),
            ViewKind::Correlation => Self::Correlation(from_body(kind, body)?),
            ViewKind::Association => Self::Association(from_body(kind, body)?),
            ViewKind::BoxPlot => Self::BoxPlot(from_body(kind, body)?),
            ViewKind::Pca => Self::Pca(from_body(kind, body)?),
            ViewKind::TTest => Self::TTest(from_body(kind, body)?),
            ViewKind::Gini => Self::Gini(from_body(kind, body)?),
            ViewKind::MonteCarlo => Self::MonteCarlo(from_body(kind, body)?),
            ViewKind::Regression => Self::Regression(from_body(kind, body)?),
        };
        data.validate()?;
        Ok(data)
    }

    /// Check the cross-field shape rules of the contained result.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Distribution(d) => d.validate(),
            Self::Correlation(m) => m.validate(ViewKind::Correlation),
            Self::Association(m) => m.validate(ViewKind::Association),
            Self::BoxPlot(groups) => BoxPlotGroup::validate_set(groups),
            Self::Pca(p) => p.validate(),
            Self::TTest(t) => t.validate(),
            Self::MonteCarlo(m) => m.validate(),
            Self::Summary(_) | Self::Gini(_) | Self::Regression(_) => Ok(()),
        }
    }
}

fn from_body<T: serde::de::DeserializeOwned>(kind: ViewKind, body: serde_json::Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| DashboardError::malformed(kind.as_str(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_distribution() {
        let body = json!({
            "histogram": { "x": [1.0, 2.0, 3.0], "y": [0.1, 0.5, 0.2] },
            "fitted": { "x": [1.0, 2.0], "y": [0.15, 0.45], "params": [2.0, 0.8] },
            "stats": { "mean": 2.1, "std": 0.7, "skewness": 0.05, "kurtosis": -0.3 }
        });

        let data = ViewData::decode(ViewKind::Distribution, body).unwrap();
        let ViewData::Distribution(dist) = data else {
            panic!("expected distribution");
        };
        assert_eq!(dist.histogram.len(), 3);
        assert_eq!(dist.fitted.y.len(), 2);
        assert!(dist.fitted.params.is_some());
    }

    #[test]
    fn test_decode_missing_field_is_malformed() {
        let body = json!({ "t_statistic": 2.3, "groups": ["A", "B"], "means": [1.0, 2.0] });
        let err = ViewData::decode(ViewKind::TTest, body).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("p_value"));
    }

    #[test]
    fn test_misaligned_histogram_is_malformed() {
        let body = json!({
            "histogram": { "x": [1.0, 2.0, 3.0], "y": [0.1, 0.5] },
            "fitted": { "x": [], "y": [] },
            "stats": { "mean": 0.0, "std": 1.0, "skewness": 0.0, "kurtosis": 0.0 }
        });
        let err = ViewData::decode(ViewKind::Distribution, body).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_RESULT");
    }

    #[test]
    fn test_matrix_row_mismatch() {
        let matrix = AssociationMatrix {
            x: vec!["a".into(), "b".into()],
            y: vec!["a".into(), "b".into()],
            z: vec![vec![1.0, 0.2], vec![0.2]],
        };
        let err = matrix.validate(ViewKind::Correlation).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_matrix_tolerates_out_of_range_values() {
        let matrix = AssociationMatrix {
            x: vec!["a".into()],
            y: vec!["a".into()],
            z: vec![vec![7.5]],
        };
        assert!(matrix.validate(ViewKind::Association).is_ok());
    }

    #[test]
    fn test_duplicate_box_categories() {
        let group = BoxPlotGroup {
            category: "Male".to_string(),
            min: 1.0,
            q1: 2.0,
            median: 3.0,
            q3: 4.0,
            max: 5.0,
            outliers: vec![],
            count: 10,
        };
        let err = BoxPlotGroup::validate_set(&[group.clone(), group]).unwrap_err();
        assert!(err.to_string().contains("duplicate category 'Male'"));
    }

    #[test]
    fn test_box_ordering_not_rechecked() {
        let body = json!([{
            "category": "odd", "min": 9.0, "q1": 1.0, "median": 5.0, "q3": 0.0, "max": 2.0,
            "count": 3
        }]);
        let data = ViewData::decode(ViewKind::BoxPlot, body).unwrap();
        let ViewData::BoxPlot(groups) = data else {
            panic!("expected box plot");
        };
        assert!(groups[0].outliers.is_empty());
    }

    #[test]
    fn test_inverted_confidence_interval() {
        let result = MonteCarloResult {
            dist: Series {
                x: vec![1.0],
                y: vec![4.0],
            },
            ci_95: [44.8, 35.2],
        };
        assert!(result.validate().unwrap_err().is_malformed());
    }

    #[test]
    fn test_pca_loadings_width() {
        let pca = PcaResult {
            explained_variance: vec![0.6, 0.4],
            cumulative_variance: vec![0.6, 1.0],
            components: vec![vec![0.5, 0.5], vec![0.5]],
            feature_names: vec!["a".into(), "b".into()],
        };
        assert!(pca.validate().is_err());
    }

    #[test]
    fn test_ttest_p_value_range_and_significance() {
        let mut ttest = TTestResult {
            t_statistic: 2.1,
            p_value: 0.03,
            groups: vec!["A".into(), "B".into()],
            means: vec![1.0, 1.4],
        };
        assert!(ttest.validate().is_ok());
        assert!(ttest.is_significant());

        ttest.p_value = 1.2;
        assert!(ttest.validate().is_err());
    }

    #[test]
    fn test_gini_is_a_plain_map() {
        let data = ViewData::decode(ViewKind::Gini, json!({ "Addicted_Score": 0.45 })).unwrap();
        let ViewData::Gini(gini) = data else {
            panic!("expected gini");
        };
        assert_eq!(gini.iter().collect::<Vec<_>>(), vec![("Addicted_Score", 0.45)]);
    }

    #[test]
    fn test_regression_html_passes_through() {
        let html = "<table class=\"simpletable\"><tr><td>R-squared</td></tr></table>";
        let body = json!({
            "summary_html": html,
            "diagnostics": { "r_squared": 0.61, "aic": 1234.5, "params": {"const": 1.2}, "pvalues": {"const": 0.001} }
        });
        let ViewData::Regression(reg) = ViewData::decode(ViewKind::Regression, body).unwrap() else {
            panic!("expected regression");
        };
        assert_eq!(reg.summary_html, html);
    }

    #[test]
    fn test_view_data_kind_roundtrips() {
        for kind in ViewKind::ALL {
            assert!(!kind.as_str().is_empty());
        }
        let data = ViewData::Gini(GiniResult::default());
        assert_eq!(data.kind(), ViewKind::Gini);
    }
}
