//! `quarterline` - Quarter-series reconciliation for dashboard charts
//!
//! This library fills sparse quarterly datasets into dense, chronologically
//! ordered series, and classifies the trend deltas shown next to them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod groups;
pub mod logging;
pub mod quarter;
pub mod render;
pub mod series;
pub mod summary;
pub mod trend;

pub use config::Config;
pub use error::{Error, Result};
pub use groups::GroupPoint;
pub use logging::init_logging;
pub use quarter::{fill_quarters, LabelStyle, Quarter};
pub use series::{fill_series, normalize, QuarterPoint, SeriesEntry};
pub use summary::StatisticBlock;
pub use trend::{trend_color, trend_label, TrendBadge, TrendColor};
