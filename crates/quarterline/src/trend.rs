//! Trend classification for percentage deltas.
//!
//! A delta is the percentage change between a metric's current and previous
//! values. Positive deltas get a `+X%` label and the positive color, negative
//! deltas a `-X%` label and the negative color. A zero delta is flat and
//! carries no label; an absent delta means there was nothing to compare with.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Default number of decimal places kept in trend labels.
pub const DEFAULT_PRECISION: u8 = 2;

/// Which palette entry a trend renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendColor {
    /// The metric went up.
    Positive,
    /// The metric went down.
    Negative,
    /// No change, or nothing to compare with.
    Neutral,
}

impl TrendColor {
    /// Look up this color's value in `palette`.
    #[must_use]
    pub fn hex(self, palette: &Palette) -> &str {
        match self {
            Self::Positive => &palette.positive,
            Self::Negative => &palette.negative,
            Self::Neutral => &palette.neutral,
        }
    }
}

impl std::fmt::Display for TrendColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Color values for each [`TrendColor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Color for rising metrics.
    pub positive: String,
    /// Color for falling metrics.
    pub negative: String,
    /// Color for flat or missing trends.
    pub neutral: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            positive: "#3fb68b".to_string(),
            negative: "#f0635c".to_string(),
            neutral: "#7f8ba0".to_string(),
        }
    }
}

/// A rendered trend: label plus color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBadge {
    /// Signed percentage label, e.g. `+12.5%`.
    pub label: String,
    /// Palette entry to render the label with.
    pub color: TrendColor,
}

impl TrendBadge {
    /// Classify `delta`, returning `None` for flat or absent trends.
    ///
    /// The color follows the rounded value, so a delta too small to show
    /// at `precision` is flat.
    #[must_use]
    pub fn classify(delta: Option<f64>, precision: u8) -> Option<Self> {
        let rounded = rounded_delta(delta, precision)?;
        Some(Self {
            label: format_label(rounded),
            color: sign_color(rounded),
        })
    }
}

/// Label for `delta` with [`DEFAULT_PRECISION`] decimal places.
///
/// # Examples
///
/// ```
/// use quarterline::trend::trend_label;
///
/// assert_eq!(trend_label(Some(12.5)).as_deref(), Some("+12.5%"));
/// assert_eq!(trend_label(Some(-4.0)).as_deref(), Some("-4%"));
/// assert_eq!(trend_label(Some(0.0)), None);
/// assert_eq!(trend_label(None), None);
/// ```
#[must_use]
pub fn trend_label(delta: Option<f64>) -> Option<String> {
    trend_label_with(delta, DEFAULT_PRECISION)
}

/// Label for `delta` rounded to `precision` decimal places.
///
/// Trailing zeros are dropped. Returns `None` when the delta is absent,
/// non-finite, or rounds to zero.
#[must_use]
pub fn trend_label_with(delta: Option<f64>, precision: u8) -> Option<String> {
    rounded_delta(delta, precision).map(format_label)
}

/// Palette entry for `delta` with [`DEFAULT_PRECISION`] decimal places.
///
/// Agrees with [`trend_label`]: the color is neutral exactly when there is
/// no label.
#[must_use]
pub fn trend_color(delta: Option<f64>) -> TrendColor {
    trend_color_with(delta, DEFAULT_PRECISION)
}

/// Palette entry for `delta` rounded to `precision` decimal places.
#[must_use]
pub fn trend_color_with(delta: Option<f64>, precision: u8) -> TrendColor {
    rounded_delta(delta, precision).map_or(TrendColor::Neutral, sign_color)
}

/// Percentage change from `previous` to `current`.
///
/// Returns `None` when either value is absent or `previous` is zero.
#[must_use]
pub fn percentage_delta(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let (previous, current) = (previous?, current?);
    if previous == 0.0 {
        return None;
    }
    let delta = (current - previous) / previous.abs() * 100.0;
    delta.is_finite().then_some(delta)
}

/// Parse a delta typed by a user, accepting an optional trailing `%`.
///
/// # Errors
///
/// Returns [`Error::InvalidTrend`] if the input is not a finite number.
pub fn parse_delta(input: &str) -> Result<f64> {
    let cleaned = input.trim().trim_end_matches('%').trim();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| Error::InvalidTrend {
            input: input.to_string(),
        })
}

fn rounded_delta(delta: Option<f64>, precision: u8) -> Option<f64> {
    let delta = delta?;
    if !delta.is_finite() {
        warn!(delta, "Ignoring non-finite trend delta");
        return None;
    }
    let factor = 10f64.powi(i32::from(precision));
    let rounded = (delta * factor).round() / factor;
    (rounded != 0.0).then_some(rounded)
}

fn sign_color(rounded: f64) -> TrendColor {
    if rounded > 0.0 {
        TrendColor::Positive
    } else if rounded < 0.0 {
        TrendColor::Negative
    } else {
        TrendColor::Neutral
    }
}

fn format_label(rounded: f64) -> String {
    let sign = if rounded > 0.0 { '+' } else { '-' };
    format!("{sign}{}%", rounded.abs())
}
