//! Chart-ready models for every view.
//!
//! [`ChartModel::build`] is the single entry point a host uses after the
//! fetch controller has produced [`ViewData`]: it runs the assembler, the
//! domain calculator and the color mapper so the host only has to paint.

use super::assembler::{
    BinRecord, DistributionPoint, LoadingRow, ScreeRecord, distribution_points, humanize_label,
    loading_rows, monte_carlo_bins, scree_records,
};
use super::box_geometry::{Band, BoxGeometry, box_geometry};
use super::domain::{Domain, LinearScale, box_plot_domain};
use super::heat_color::{HeatCellStyle, heat_cell_style};
use crate::error::{Result, ResultExt};
use crate::types::{
    AssociationMatrix, BoxPlotGroup, DatasetSummary, DistributionStats, DistributionSummary,
    GiniResult, MonteCarloResult, PcaResult, RegressionSummary, TTestResult, ViewData, ViewKind,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Distribution
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionChart {
    pub points: Vec<DistributionPoint>,
    pub stats: DistributionStats,
}

impl DistributionChart {
    pub fn new(summary: &DistributionSummary) -> Self {
        Self {
            points: distribution_points(summary),
            stats: summary.stats,
        }
    }
}

// ============================================================================
// Heatmap
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub column: String,
    pub value: f64,
    /// Value at 2 decimals, shown inside the cell.
    pub display: String,
    /// `"<row> vs <column>: <value at 3 decimals>"`.
    pub tooltip: String,
    pub style: HeatCellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatRow {
    pub label: String,
    pub cells: Vec<HeatCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapChart {
    pub columns: Vec<String>,
    pub rows: Vec<HeatRow>,
}

impl HeatmapChart {
    /// Style every cell. Ragged rows are cut to the shorter of row and header.
    pub fn new(matrix: &AssociationMatrix) -> Self {
        let rows = matrix
            .y
            .iter()
            .zip(&matrix.z)
            .map(|(row_label, values)| HeatRow {
                label: row_label.clone(),
                cells: matrix
                    .x
                    .iter()
                    .zip(values)
                    .map(|(column, &value)| HeatCell {
                        column: column.clone(),
                        value,
                        display: format!("{value:.2}"),
                        tooltip: format!("{row_label} vs {column}: {value:.3}"),
                        style: heat_cell_style(value),
                    })
                    .collect(),
            })
            .collect();

        Self {
            columns: matrix.x.clone(),
            rows,
        }
    }
}

// ============================================================================
// Box plot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotChart {
    /// Padded y-axis domain covering whiskers and outliers of every group.
    pub domain: Domain,
    pub groups: Vec<BoxPlotGroup>,
}

/// One laid-out category: its band and glyph (`None` while unsized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBox {
    pub category: String,
    pub band: Band,
    pub geometry: Option<BoxGeometry>,
}

impl BoxPlotChart {
    pub fn new(groups: &[BoxPlotGroup]) -> Result<Self> {
        let domain = box_plot_domain(groups).context("Computing box plot domain")?;
        Ok(Self {
            domain,
            groups: groups.to_vec(),
        })
    }

    /// Split `width` into equal bands and compute every glyph on a
    /// downward-growing scale of the given `height`.
    pub fn layout(&self, x: f64, width: f64, height: f64) -> Result<Vec<PlacedBox>> {
        let scale = LinearScale::vertical(self.domain, height);
        let band_width = if self.groups.is_empty() {
            0.0
        } else {
            width / self.groups.len() as f64
        };

        self.groups
            .iter()
            .enumerate()
            .map(|(i, group)| -> Result<PlacedBox> {
                let band = Band::new(x + band_width * i as f64, band_width, height);
                let geometry = box_geometry(&group.five_number(), band, |v| scale.apply(v))
                    .context(format!("Laying out box for '{}'", group.category))?;
                Ok(PlacedBox {
                    category: group.category.clone(),
                    band,
                    geometry,
                })
            })
            .collect()
    }
}

// ============================================================================
// PCA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaChart {
    pub scree: Vec<ScreeRecord>,
    pub loadings: Vec<LoadingRow>,
}

impl PcaChart {
    pub fn new(pca: &PcaResult) -> Self {
        Self {
            scree: scree_records(pca),
            loadings: loading_rows(pca),
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestTable {
    pub result: TTestResult,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiniRow {
    pub metric: String,
    pub label: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloChart {
    pub bins: Vec<BinRecord>,
    pub ci_95: [f64; 2],
}

fn gini_rows(gini: &GiniResult) -> Vec<GiniRow> {
    gini.iter()
        .map(|(metric, coefficient)| GiniRow {
            metric: metric.to_string(),
            label: humanize_label(metric),
            coefficient,
        })
        .collect()
}

// ============================================================================
// Chart model
// ============================================================================

/// Everything a host needs to paint one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", content = "model", rename_all = "snake_case")]
pub enum ChartModel {
    Summary(DatasetSummary),
    Distribution(DistributionChart),
    Heatmap { view: ViewKind, heatmap: HeatmapChart },
    BoxPlot(BoxPlotChart),
    Pca(PcaChart),
    TTest(TTestTable),
    Gini(Vec<GiniRow>),
    MonteCarlo(MonteCarloChart),
    /// Regression summaries pass through untouched, HTML included.
    Regression(RegressionSummary),
}

impl ChartModel {
    /// Build the chart model for a decoded view result.
    ///
    /// Only the box plot can fail, when there is nothing to scale.
    pub fn build(data: &ViewData) -> Result<Self> {
        let model = match data {
            ViewData::Summary(summary) => Self::Summary(summary.clone()),
            ViewData::Distribution(summary) => Self::Distribution(DistributionChart::new(summary)),
            ViewData::Correlation(matrix) | ViewData::Association(matrix) => Self::Heatmap {
                view: data.kind(),
                heatmap: HeatmapChart::new(matrix),
            },
            ViewData::BoxPlot(groups) => Self::BoxPlot(BoxPlotChart::new(groups)?),
            ViewData::Pca(pca) => Self::Pca(PcaChart::new(pca)),
            ViewData::TTest(result) => Self::TTest(TTestTable {
                significant: result.is_significant(),
                result: result.clone(),
            }),
            ViewData::Gini(gini) => Self::Gini(gini_rows(gini)),
            ViewData::MonteCarlo(result) => Self::MonteCarlo(monte_carlo_chart(result)),
            ViewData::Regression(summary) => Self::Regression(summary.clone()),
        };
        Ok(model)
    }
}

fn monte_carlo_chart(result: &MonteCarloResult) -> MonteCarloChart {
    MonteCarloChart {
        bins: monte_carlo_bins(result),
        ci_95: result.ci_95,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::heat_color::TextTone;
    use crate::error::DashboardError;
    use crate::fallback::FallbackCatalog;

    #[test]
    fn test_heatmap_cells() {
        let matrix = AssociationMatrix {
            x: vec!["Usage".into(), "Sleep".into()],
            y: vec!["Usage".into(), "Sleep".into()],
            z: vec![vec![1.0, -0.5], vec![-0.5, 1.0]],
        };
        let heatmap = HeatmapChart::new(&matrix);
        let cell = &heatmap.rows[0].cells[1];

        assert_eq!(cell.display, "-0.50");
        assert_eq!(cell.tooltip, "Usage vs Sleep: -0.500");
        assert_eq!(cell.style.text, TextTone::Dark);
        assert_eq!(heatmap.rows[1].label, "Sleep");
    }

    #[test]
    fn test_heatmap_tolerates_ragged_rows() {
        let matrix = AssociationMatrix {
            x: vec!["a".into(), "b".into()],
            y: vec!["a".into(), "b".into(), "c".into()],
            z: vec![vec![1.0], vec![0.2, 1.0, 9.0]],
        };
        let heatmap = HeatmapChart::new(&matrix);
        assert_eq!(heatmap.rows.len(), 2);
        assert_eq!(heatmap.rows[0].cells.len(), 1);
        assert_eq!(heatmap.rows[1].cells.len(), 2);
    }

    #[test]
    fn test_box_plot_layout() {
        let catalog = FallbackCatalog::builtin();
        let chart = BoxPlotChart::new(&catalog.box_plot).unwrap();
        let placed = chart.layout(0.0, 400.0, 300.0).unwrap();

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].category, "Male");
        assert_eq!(placed[1].band.x, 200.0);
        let body = placed[0].geometry.unwrap().body;
        assert!(body.height > 0.0);
    }

    #[test]
    fn test_box_plot_unsized_layout() {
        let catalog = FallbackCatalog::builtin();
        let chart = BoxPlotChart::new(&catalog.box_plot).unwrap();
        let placed = chart.layout(0.0, 0.0, 300.0).unwrap();
        assert!(placed.iter().all(|p| p.geometry.is_none()));
    }

    #[test]
    fn test_empty_box_plot_fails() {
        let err = ChartModel::build(&ViewData::BoxPlot(vec![])).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_DOMAIN");
        assert!(matches!(err, DashboardError::WithContext { .. }));
    }

    #[test]
    fn test_every_fallback_view_builds() {
        let catalog = FallbackCatalog::builtin();
        for kind in ViewKind::ALL {
            if let Some(data) = catalog.for_view(kind) {
                assert!(ChartModel::build(&data).is_ok(), "{kind} should build");
            }
        }
    }

    #[test]
    fn test_gini_rows_humanized() {
        let mut gini = GiniResult::default();
        gini.0.insert("Mental_Health_Score".to_string(), 0.28);
        let ChartModel::Gini(rows) = ChartModel::build(&ViewData::Gini(gini)).unwrap() else {
            panic!("expected gini rows");
        };
        assert_eq!(rows[0].label, "Mental Health Score");
    }
}
