//! Heatmap cell colors.
//!
//! Positive coefficients tint blue, zero and negative ones tint red. The
//! tint strength follows `|v|`, and the text switches to a darker token once
//! the tint is strong enough to need contrast.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Background alpha per unit of intensity.
pub const ALPHA_PER_INTENSITY: f64 = 0.2;

/// Intensity above which cell text uses the dark token.
pub const DARK_TEXT_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Which hue a coefficient is tinted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueFamily {
    /// `v > 0`
    Positive,
    /// `v <= 0`
    NonPositive,
}

impl HueFamily {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else {
            Self::NonPositive
        }
    }

    /// Base RGB channels: blue-500 for positive, red-500 otherwise.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Positive => (59, 130, 246),
            Self::NonPositive => (239, 68, 68),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTone {
    Dark,
    Muted,
}

impl TextTone {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Dark => "#0f172a",
            Self::Muted => "#334155",
        }
    }
}

/// Background and text styling for one heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatCellStyle {
    pub hue: HueFamily,
    pub intensity: f64,
    pub background: Rgba,
    pub text: TextTone,
}

/// Map a coefficient to its cell style.
///
/// `intensity = |v|`, clamped to [0, 1] so the alpha stays valid for values
/// outside the coefficient range; NaN reads as 0. Pure and deterministic.
pub fn heat_cell_style(value: f64) -> HeatCellStyle {
    let intensity = if value.is_nan() {
        0.0
    } else {
        value.abs().min(1.0)
    };
    let hue = HueFamily::of(value);
    let (r, g, b) = hue.rgb();
    let text = if intensity > DARK_TEXT_THRESHOLD {
        TextTone::Dark
    } else {
        TextTone::Muted
    };

    HeatCellStyle {
        hue,
        intensity,
        background: Rgba::new(r, g, b, intensity * ALPHA_PER_INTENSITY),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_values_share_alpha() {
        let pos = heat_cell_style(0.85);
        let neg = heat_cell_style(-0.85);

        assert_eq!(pos.intensity, neg.intensity);
        assert_eq!(pos.background.a, neg.background.a);
        assert_eq!(pos.hue, HueFamily::Positive);
        assert_eq!(neg.hue, HueFamily::NonPositive);
        assert_ne!(pos.background.r, neg.background.r);
        assert_eq!(pos.text, TextTone::Dark);
        assert_eq!(neg.text, TextTone::Dark);
    }

    #[test]
    fn test_weak_value_is_muted() {
        assert_eq!(heat_cell_style(0.3).text, TextTone::Muted);
        assert_eq!(heat_cell_style(0.4).text, TextTone::Muted);
        assert_eq!(heat_cell_style(0.41).text, TextTone::Dark);
    }

    #[test]
    fn test_zero_uses_non_positive_hue() {
        let style = heat_cell_style(0.0);
        assert_eq!(style.hue, HueFamily::NonPositive);
        assert_eq!(style.background.a, 0.0);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let style = heat_cell_style(-7.0);
        assert_eq!(style.intensity, 1.0);
        assert!((style.background.a - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_nan_is_treated_as_zero() {
        let style = heat_cell_style(f64::NAN);
        assert_eq!(style.intensity, 0.0);
        assert_eq!(style.text, TextTone::Muted);
    }

    #[test]
    fn test_css_output() {
        let style = heat_cell_style(1.0);
        assert_eq!(style.background.to_css(), "rgba(59, 130, 246, 0.2)");
        assert_eq!(TextTone::Dark.hex(), "#0f172a");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(heat_cell_style(-0.37), heat_cell_style(-0.37));
    }
}
