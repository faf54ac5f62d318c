//! Box-and-whisker geometry.
//!
//! Maps a five-number summary through a caller-supplied scale into the
//! coordinates of every primitive in the glyph. Nothing is drawn here; the
//! host paints the returned shapes on its own surface.

use crate::error::{DashboardError, Result};
use crate::types::FiveNumberSummary;
use serde::{Deserialize, Serialize};

/// Whisker cap width as a fraction of the band width.
pub const CAP_WIDTH_RATIO: f64 = 0.4;

/// Half of the box body width as a fraction of the band width.
///
/// The body spans `2 * BOX_HALF_WIDTH_RATIO * width` around the band center.
pub const BOX_HALF_WIDTH_RATIO: f64 = 0.4;

/// The horizontal slot the host chart allotted to one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

impl Band {
    pub fn new(x: f64, width: f64, height: f64) -> Self {
        Self { x, width, height }
    }

    /// The host has not sized this band yet.
    fn is_unlaid(&self) -> bool {
        let unset = |v: f64| v == 0.0 || !v.is_finite();
        unset(self.width) || unset(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    fn vertical(x: f64, y1: f64, y2: f64) -> Self {
        Self { x1: x, y1, x2: x, y2 }
    }

    fn horizontal(center: f64, half_width: f64, y: f64) -> Self {
        Self {
            x1: center - half_width,
            y1: y,
            x2: center + half_width,
            y2: y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Absolute coordinates of one box-plot glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub center_x: f64,
    /// From `scale(min)` to `scale(q1)`.
    pub lower_whisker: Segment,
    /// From `scale(q3)` to `scale(max)`.
    pub upper_whisker: Segment,
    pub min_cap: Segment,
    pub max_cap: Segment,
    pub body: Rect,
    pub median: Segment,
}

/// Compute the glyph for `summary` inside `band`.
///
/// Returns `Ok(None)` while the band has no size. Fails with
/// [`DashboardError::DegenerateBox`] when `scale(q1) < scale(q3)`: the body
/// top is placed at `scale(q3)`, so the scale must grow downward in pixels.
pub fn box_geometry<F>(summary: &FiveNumberSummary, band: Band, scale: F) -> Result<Option<BoxGeometry>>
where
    F: Fn(f64) -> f64,
{
    if band.is_unlaid() {
        return Ok(None);
    }

    let y_min = scale(summary.min);
    let y_q1 = scale(summary.q1);
    let y_median = scale(summary.median);
    let y_q3 = scale(summary.q3);
    let y_max = scale(summary.max);

    let body_height = y_q1 - y_q3;
    if body_height < 0.0 {
        return Err(DashboardError::DegenerateBox {
            q1_px: y_q1,
            q3_px: y_q3,
        });
    }

    let center_x = band.x + band.width / 2.0;
    let cap_half = band.width * CAP_WIDTH_RATIO / 2.0;
    let box_half = band.width * BOX_HALF_WIDTH_RATIO;

    Ok(Some(BoxGeometry {
        center_x,
        lower_whisker: Segment::vertical(center_x, y_min, y_q1),
        upper_whisker: Segment::vertical(center_x, y_q3, y_max),
        min_cap: Segment::horizontal(center_x, cap_half, y_min),
        max_cap: Segment::horizontal(center_x, cap_half, y_max),
        body: Rect {
            x: center_x - box_half,
            y: y_q3,
            width: box_half * 2.0,
            height: body_height,
        },
        median: Segment::horizontal(center_x, box_half, y_median),
    }))
}
