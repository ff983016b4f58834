//! Quarter-series gap filling.
//!
//! Chart datasets arrive sparse and in arbitrary order. This module aligns a
//! dataset with a dense [quarter range](crate::quarter::fill_quarters):
//! every range quarter that holds a point between the first and last
//! populated quarter keeps that point, and everything else becomes a
//! placeholder that the chart renders as a gap rather than a zero.
//!
//! # Example
//!
//! ```
//! use quarterline::series::{fill_series, QuarterPoint, SeriesEntry};
//!
//! let dataset = vec![
//!     QuarterPoint::new("Q1-2023", Some(5.0)),
//!     QuarterPoint::new("Q3-2023", Some(7.0)),
//! ];
//! let filled = fill_series(&dataset, &["Q1-2023", "Q2-2023", "Q3-2023"]).unwrap();
//!
//! assert!(filled[1].is_placeholder());
//! assert_eq!(filled[2].as_point().and_then(|p| p.avg), Some(7.0));
//! ```

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::quarter::{fill_quarters_with, LabelStyle, Quarter};

/// How much data a single point carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    /// No metric value at all.
    Absent,
    /// Values present, none of them above zero.
    Present,
    /// At least one value above zero.
    Positive,
}

/// A dataset entry keyed by quarter.
pub trait Periodic {
    /// The entry's quarter label, as received.
    fn quarter_label(&self) -> &str;

    /// What the entry measured.
    fn measurement(&self) -> Measurement;
}

/// One point of an average dataset (audit score, engineering health).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterPoint {
    /// Quarter label, e.g. `Q1-2023`.
    pub quarter: String,
    /// Average for the quarter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// Percentage change against the previous quarter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
}

impl QuarterPoint {
    /// Create a point without a trend.
    #[must_use]
    pub fn new(quarter: impl Into<String>, avg: Option<f64>) -> Self {
        Self {
            quarter: quarter.into(),
            avg,
            trend: None,
        }
    }

    /// Attach a trend delta.
    #[must_use]
    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = Some(trend);
        self
    }
}

impl Periodic for QuarterPoint {
    fn quarter_label(&self) -> &str {
        &self.quarter
    }

    fn measurement(&self) -> Measurement {
        match self.avg {
            None => Measurement::Absent,
            Some(v) if v > 0.0 => Measurement::Positive,
            Some(_) => Measurement::Present,
        }
    }
}

/// One slot of a filled series.
///
/// Serializes as the point itself, or as `{ "quarter": ... }` for a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesEntry<T = QuarterPoint> {
    /// Real data for the quarter.
    Point(T),
    /// No data for the quarter.
    Placeholder {
        /// Quarter label.
        quarter: String,
    },
}

impl<T: Periodic> SeriesEntry<T> {
    /// The quarter label of this slot.
    #[must_use]
    pub fn quarter(&self) -> &str {
        match self {
            Self::Point(point) => point.quarter_label(),
            Self::Placeholder { quarter } => quarter,
        }
    }
}

impl<T> SeriesEntry<T> {
    /// The point, unless this is a placeholder.
    #[must_use]
    pub fn as_point(&self) -> Option<&T> {
        match self {
            Self::Point(point) => Some(point),
            Self::Placeholder { .. } => None,
        }
    }

    /// Consume the entry, keeping only real data.
    #[must_use]
    pub fn into_point(self) -> Option<T> {
        match self {
            Self::Point(point) => Some(point),
            Self::Placeholder { .. } => None,
        }
    }

    /// Check whether this slot is a gap.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Index a dataset by parsed quarter.
///
/// # Errors
///
/// Returns [`Error::InvalidQuarterFormat`] for a malformed label and
/// [`Error::DuplicateQuarter`] when two entries name the same quarter.
pub fn index_by_quarter<T: Periodic>(dataset: &[T]) -> Result<BTreeMap<Quarter, &T>> {
    let mut index = BTreeMap::new();
    for point in dataset {
        let quarter: Quarter = point.quarter_label().parse()?;
        if index.insert(quarter, point).is_some() {
            return Err(Error::duplicate_quarter(point.quarter_label()));
        }
    }
    Ok(index)
}

/// First through last populated quarter of an indexed dataset.
///
/// Populated means a value above zero. When nothing is above zero, any
/// present measurement counts, so an all-zero dataset still keeps its data.
#[must_use]
pub fn populated_bounds<T: Periodic>(
    index: &BTreeMap<Quarter, &T>,
) -> Option<RangeInclusive<Quarter>> {
    let bounds_where = |accept: fn(Measurement) -> bool| {
        let mut populated = index
            .iter()
            .filter(|(_, point)| accept(point.measurement()))
            .map(|(quarter, _)| *quarter);
        let first = populated.next()?;
        let last = populated.last().unwrap_or(first);
        Some(first..=last)
    };

    bounds_where(|m| m == Measurement::Positive)
        .or_else(|| bounds_where(|m| m != Measurement::Absent))
}

/// Align `dataset` with `range`.
///
/// The result has exactly one entry per range label, in range order. A
/// range quarter keeps its dataset point when that point lies within the
/// [populated bounds](populated_bounds); every other slot is a placeholder
/// labeled with the range label.
///
/// # Errors
///
/// Returns [`Error::InvalidQuarterFormat`] for a malformed label in either
/// input and [`Error::DuplicateQuarter`] for a repeated dataset quarter.
pub fn fill_series<T, S>(dataset: &[T], range: &[S]) -> Result<Vec<SeriesEntry<T>>>
where
    T: Periodic + Clone,
    S: AsRef<str>,
{
    let index = index_by_quarter(dataset)?;
    let bounds = populated_bounds(&index);
    trace!(points = index.len(), ?bounds, "Located populated bounds");

    let filled = range
        .iter()
        .map(|label| {
            let label = label.as_ref();
            let quarter: Quarter = label.parse()?;
            let entry = match (index.get(&quarter), &bounds) {
                (Some(point), Some(bounds)) if bounds.contains(&quarter) => {
                    SeriesEntry::Point((*point).clone())
                }
                _ => SeriesEntry::Placeholder {
                    quarter: label.to_string(),
                },
            };
            Ok(entry)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        quarters = filled.len(),
        placeholders = filled.iter().filter(|e| e.is_placeholder()).count(),
        "Filled quarter series"
    );
    Ok(filled)
}

/// Build the quarter range of `dataset` and fill it in one step.
///
/// # Errors
///
/// See [`fill_series`].
pub fn normalize<T>(dataset: &[T]) -> Result<Vec<SeriesEntry<T>>>
where
    T: Periodic + Clone,
{
    normalize_with(dataset, LabelStyle::default())
}

/// Like [`normalize`], labeling placeholders in `style`.
///
/// # Errors
///
/// See [`fill_series`].
pub fn normalize_with<T>(dataset: &[T], style: LabelStyle) -> Result<Vec<SeriesEntry<T>>>
where
    T: Periodic + Clone,
{
    let labels: Vec<&str> = dataset.iter().map(Periodic::quarter_label).collect();
    let range = fill_quarters_with(&labels, style)?;
    fill_series(dataset, &range)
}

/// Sort a dataset chronologically.
///
/// # Errors
///
/// Returns [`Error::InvalidQuarterFormat`] for a malformed label.
pub fn chronological<T: Periodic>(dataset: &[T]) -> Result<Vec<&T>> {
    let mut keyed = dataset
        .iter()
        .map(|point| Ok((point.quarter_label().parse::<Quarter>()?, point)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(quarter, _)| *quarter);
    Ok(keyed.into_iter().map(|(_, point)| point).collect())
}
