//! Axis domains and linear scales.
//!
//! A box-plot y-axis has to fit the whiskers and every outlier of every
//! group, with 10% breathing room on each side.

use crate::error::{DashboardError, Result};
use crate::types::BoxPlotGroup;
use serde::{Deserialize, Serialize};

/// Fraction of the data span added on each side of a domain.
pub const DOMAIN_PADDING_RATIO: f64 = 0.1;

/// A closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// A single-point domain, produced when every value is equal.
    ///
    /// Valid, but a scale built on it cannot spread values out.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Global min/max of `values`, widened by [`DOMAIN_PADDING_RATIO`] of the span.
///
/// Non-finite values are skipped. Fails with [`DashboardError::EmptyDomain`]
/// when nothing finite remains.
pub fn padded_domain(values: impl IntoIterator<Item = f64>) -> Result<Domain> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(DashboardError::EmptyDomain)?;

    let pad = (max - min) * DOMAIN_PADDING_RATIO;
    Ok(Domain::new(min - pad, max + pad))
}

/// Y-axis domain for a set of box-plot groups: whisker ends plus outliers.
pub fn box_plot_domain(groups: &[BoxPlotGroup]) -> Result<Domain> {
    padded_domain(groups.iter().flat_map(|g| {
        [g.min, g.max]
            .into_iter()
            .chain(g.outliers.iter().copied())
    }))
}

/// Linear map from a data domain onto a pixel range.
///
/// The range may run backwards (e.g. `(height, 0.0)`) for a y-axis that grows
/// downward on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: Domain,
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Domain, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Vertical pixel scale: `domain.min` at the bottom (`height`), `domain.max` at 0.
    pub fn vertical(domain: Domain, height: f64) -> Self {
        Self::new(domain, (height, 0.0))
    }

    /// Map a data value to a pixel coordinate.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (r0, r1) = self.range;
        if self.domain.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let t = (value - self.domain.min) / self.domain.span();
        r0 + t * (r1 - r0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(category: &str, min: f64, max: f64, outliers: Vec<f64>) -> BoxPlotGroup {
        BoxPlotGroup {
            category: category.to_string(),
            min,
            q1: min,
            median: (min + max) / 2.0,
            q3: max,
            max,
            outliers,
            count: 10,
        }
    }

    #[test]
    fn test_box_domain_includes_outliers_and_padding() {
        let groups = vec![
            group("Male", 20.0, 70.0, vec![15.0, 75.0, 80.0]),
            group("Female", 22.0, 75.0, vec![18.0]),
        ];
        let domain = box_plot_domain(&groups).unwrap();
        // values span 15..80, pad = 6.5
        assert!((domain.min - 8.5).abs() < 1e-9);
        assert!((domain.max - 86.5).abs() < 1e-9);
    }

    #[test]
    fn test_domain_covers_all_groups() {
        let cases = vec![
            vec![group("a", 1.0, 2.0, vec![])],
            vec![group("a", -5.0, 3.0, vec![]), group("b", 0.5, 9.0, vec![12.0])],
            vec![group("a", 100.0, 100.5, vec![99.0, 101.0])],
        ];
        for groups in cases {
            let domain = box_plot_domain(&groups).unwrap();
            let global_min = groups.iter().map(|g| g.min).fold(f64::INFINITY, f64::min);
            let global_max = groups.iter().map(|g| g.max).fold(f64::NEG_INFINITY, f64::max);
            assert!(domain.min <= global_min);
            assert!(domain.max >= global_max);
            assert!(domain.span() >= global_max - global_min);
        }
    }

    #[test]
    fn test_empty_groups_fail() {
        let err = box_plot_domain(&[]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDomain));
    }

    #[test]
    fn test_non_finite_only_is_empty() {
        assert!(padded_domain([f64::NAN, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_single_value_collapses() {
        let domain = box_plot_domain(&[group("flat", 4.0, 4.0, vec![])]).unwrap();
        assert_eq!(domain, Domain::new(4.0, 4.0));
        assert!(domain.is_degenerate());
    }

    #[test]
    fn test_vertical_scale_grows_downward() {
        let scale = LinearScale::vertical(Domain::new(0.0, 100.0), 400.0);
        assert_eq!(scale.apply(0.0), 400.0);
        assert_eq!(scale.apply(100.0), 0.0);
        assert_eq!(scale.apply(25.0), 300.0);
    }

    #[test]
    fn test_degenerate_scale_maps_to_middle() {
        let scale = LinearScale::new(Domain::new(3.0, 3.0), (0.0, 200.0));
        assert_eq!(scale.apply(3.0), 100.0);
        assert_eq!(scale.apply(99.0), 100.0);
    }
}
