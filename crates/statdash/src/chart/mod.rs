//! Pure transformations from result types to chart geometry.
//!
//! None of these functions suspend or touch shared state; they run on
//! already-resolved data.

pub mod assembler;
pub mod box_geometry;
pub mod domain;
pub mod heat_color;
mod model;

pub use assembler::{
    BinRecord, DistributionPoint, LoadingRow, ScreeRecord, SeriesRecord, assemble_series,
    distribution_points, format_label, humanize_label, loading_rows, monte_carlo_bins,
    scree_records,
};
pub use box_geometry::{Band, BoxGeometry, Rect, Segment, box_geometry};
pub use domain::{Domain, LinearScale, box_plot_domain, padded_domain};
pub use heat_color::{HeatCellStyle, HueFamily, Rgba, TextTone, heat_cell_style};
pub use model::{
    BoxPlotChart, ChartModel, DistributionChart, GiniRow, HeatCell, HeatRow, HeatmapChart,
    MonteCarloChart, PcaChart, PlacedBox, TTestTable,
};
