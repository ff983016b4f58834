//! Quarter labels and quarter arithmetic.
//!
//! A [`Quarter`] is a three-month period identified by year and quarter
//! number. Labels are parsed from the canonical `Qn-YYYY` form or the
//! year-first `YYYY-Qn` form, and ordering is always chronological.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// Accepts `Q1-2023` and `2023-Q1`, case-insensitive on the `Q`.
static QUARTER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:q([1-4])-(\d{4})|(\d{4})-q([1-4]))$").expect("quarter label regex is valid")
});

/// How quarter labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// `Q1-2023`
    #[default]
    QuarterFirst,
    /// `2023-Q1`
    YearFirst,
}

/// A calendar quarter.
///
/// Field order matters: the derived `Ord` compares year first, then number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    number: u8,
}

impl Quarter {
    /// Create a quarter, returning `None` unless `number` is in `1..=4`.
    #[must_use]
    pub fn new(year: i32, number: u8) -> Option<Self> {
        (1..=4).contains(&number).then_some(Self { year, number })
    }

    /// The quarter containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        // month0 is 0..=11, so the quotient is always 0..=3
        let number = u8::try_from(date.month0() / 3).unwrap_or(0) + 1;
        Self {
            year: date.year(),
            number,
        }
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Quarter number, `1..=4`.
    #[must_use]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// The following quarter, rolling over into the next year after Q4.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.number == 4 {
            Self {
                year: self.year + 1,
                number: 1,
            }
        } else {
            Self {
                year: self.year,
                number: self.number + 1,
            }
        }
    }

    /// The preceding quarter, rolling back into the previous year before Q1.
    #[must_use]
    pub fn prev(&self) -> Self {
        if self.number == 1 {
            Self {
                year: self.year - 1,
                number: 4,
            }
        } else {
            Self {
                year: self.year,
                number: self.number - 1,
            }
        }
    }

    /// First calendar day of the quarter.
    ///
    /// Returns `None` only for years outside chrono's supported range.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        let month = u32::from(self.number - 1) * 3 + 1;
        NaiveDate::from_ymd_opt(self.year, month, 1)
    }

    /// Last calendar day of the quarter.
    #[must_use]
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }

    /// Render the label in the given style.
    #[must_use]
    pub fn label(&self, style: LabelStyle) -> String {
        match style {
            LabelStyle::QuarterFirst => format!("Q{}-{}", self.number, self.year),
            LabelStyle::YearFirst => format!("{}-Q{}", self.year, self.number),
        }
    }

    /// Iterate every quarter from `self` through `end`, inclusive.
    ///
    /// Yields nothing when `end` precedes `self`.
    #[must_use]
    pub fn through(self, end: Quarter) -> QuarterSpan {
        QuarterSpan {
            next: (self <= end).then_some(self),
            end,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{}", self.number, self.year)
    }
}

impl FromStr for Quarter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = QUARTER_LABEL
            .captures(s.trim())
            .ok_or_else(|| Error::invalid_quarter(s))?;

        let (number, year) = match (caps.get(1), caps.get(2)) {
            (Some(number), Some(year)) => (number, year),
            _ => match (caps.get(4), caps.get(3)) {
                (Some(number), Some(year)) => (number, year),
                _ => return Err(Error::invalid_quarter(s)),
            },
        };

        let year: i32 = year
            .as_str()
            .parse()
            .map_err(|_| Error::invalid_quarter(s))?;
        let number: u8 = number
            .as_str()
            .parse()
            .map_err(|_| Error::invalid_quarter(s))?;

        Self::new(year, number).ok_or_else(|| Error::invalid_quarter(s))
    }
}

/// Inclusive iterator over consecutive quarters.
#[derive(Debug, Clone)]
pub struct QuarterSpan {
    next: Option<Quarter>,
    end: Quarter,
}

impl Iterator for QuarterSpan {
    type Item = Quarter;

    fn next(&mut self) -> Option<Quarter> {
        let current = self.next?;
        self.next = (current < self.end).then(|| current.next());
        Some(current)
    }
}

/// Parse every label, failing on the first malformed one.
///
/// # Errors
///
/// Returns [`Error::InvalidQuarterFormat`] for a label that is not a quarter.
pub fn parse_quarters<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Quarter>> {
    labels.iter().map(|label| label.as_ref().parse()).collect()
}

/// Every quarter from the earliest through the latest of `quarters`.
///
/// Input order and duplicates do not matter. Empty input yields an empty range.
#[must_use]
pub fn quarter_range(quarters: &[Quarter]) -> Vec<Quarter> {
    match (quarters.iter().min(), quarters.iter().max()) {
        (Some(&first), Some(&last)) => first.through(last).collect(),
        _ => Vec::new(),
    }
}

/// Fill the gaps in a set of quarter labels.
///
/// Returns canonical `Qn-YYYY` labels for every quarter from the
/// chronologically earliest to the latest input label.
///
/// # Errors
///
/// Returns [`Error::InvalidQuarterFormat`] if any label is malformed.
///
/// # Examples
///
/// ```
/// use quarterline::quarter::fill_quarters;
///
/// let filled = fill_quarters(&["Q3-2023", "Q1-2023"]).unwrap();
/// assert_eq!(filled, vec!["Q1-2023", "Q2-2023", "Q3-2023"]);
/// ```
pub fn fill_quarters<S: AsRef<str>>(labels: &[S]) -> Result<Vec<String>> {
    fill_quarters_with(labels, LabelStyle::default())
}

/// Like [`fill_quarters`], rendering labels in `style`.
///
/// # Errors
///
/// Returns [`Error::InvalidQuarterFormat`] if any label is malformed.
pub fn fill_quarters_with<S: AsRef<str>>(labels: &[S], style: LabelStyle) -> Result<Vec<String>> {
    let quarters = parse_quarters(labels)?;
    let range = quarter_range(&quarters);
    trace!(
        inputs = labels.len(),
        quarters = range.len(),
        "Built quarter range"
    );
    Ok(range.iter().map(|q| q.label(style)).collect())
}
