//! Headline statistic for an average chart.
//!
//! The dashboard shows the latest average above each chart, followed by a
//! trend badge once there is more than one quarter to compare.

use serde::Serialize;

use crate::config::SummaryConfig;
use crate::error::Result;
use crate::series::{chronological, QuarterPoint};
use crate::trend::TrendBadge;

/// Latest value and its trend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticBlock {
    /// Quarter the statistic was taken from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<String>,
    /// Formatted latest average.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
    /// Trend of the latest quarter, when it moved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<TrendBadge>,
}

impl StatisticBlock {
    /// Build the block from a dataset.
    ///
    /// An empty dataset has no statistic. A missing average counts as zero
    /// and a missing trend as flat.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidQuarterFormat`] for a malformed label.
    pub fn from_series(
        dataset: &[QuarterPoint],
        config: &SummaryConfig,
        trend_precision: u8,
    ) -> Result<Self> {
        let sorted = chronological(dataset)?;
        let Some(latest) = sorted.last() else {
            return Ok(Self::default());
        };

        let stat = format!(
            "{:.*}",
            usize::from(config.precision),
            latest.avg.unwrap_or(0.0)
        );
        let badge = if sorted.len() > 1 {
            TrendBadge::classify(Some(latest.trend.unwrap_or(0.0)), trend_precision)
        } else {
            None
        };

        Ok(Self {
            quarter: Some(latest.quarter.clone()),
            stat: Some(stat),
            badge,
        })
    }
}

/// Tooltip text for an average.
///
/// Zero and missing values render as the configured empty marker.
#[must_use]
pub fn format_average(value: Option<f64>, config: &SummaryConfig) -> String {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => {
            format!("{:.*}", usize::from(config.precision), v)
        }
        _ => config.empty_value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::TrendColor;

    fn block(dataset: &[QuarterPoint]) -> StatisticBlock {
        StatisticBlock::from_series(dataset, &SummaryConfig::default(), 2).unwrap()
    }

    #[test]
    fn test_empty_dataset_has_no_stat() {
        assert_eq!(block(&[]), StatisticBlock::default());
    }

    #[test]
    fn test_single_point_has_no_badge() {
        let dataset = vec![QuarterPoint::new("Q1-2023", Some(3.27)).with_trend(10.0)];
        let result = block(&dataset);

        assert_eq!(result.stat.as_deref(), Some("3.3"));
        assert!(result.badge.is_none());
    }

    #[test]
    fn test_latest_is_chronological() {
        let dataset = vec![
            QuarterPoint::new("Q4-2023", Some(4.0)).with_trend(-12.5),
            QuarterPoint::new("Q2-2023", Some(2.0)),
        ];
        let result = block(&dataset);

        assert_eq!(result.quarter.as_deref(), Some("Q4-2023"));
        assert_eq!(result.stat.as_deref(), Some("4.0"));
        let badge = result.badge.unwrap();
        assert_eq!(badge.label, "-12.5%");
        assert_eq!(badge.color, TrendColor::Negative);
    }

    #[test]
    fn test_missing_values_default_to_zero() {
        let dataset = vec![
            QuarterPoint::new("Q1-2023", Some(2.0)),
            QuarterPoint::new("Q2-2023", None),
        ];
        let result = block(&dataset);

        assert_eq!(result.stat.as_deref(), Some("0.0"));
        assert!(result.badge.is_none());
    }

    #[test]
    fn test_malformed_label_is_error() {
        let dataset = vec![QuarterPoint::new("last quarter", Some(2.0))];
        assert!(StatisticBlock::from_series(&dataset, &SummaryConfig::default(), 2).is_err());
    }

    #[test]
    fn test_format_average() {
        let config = SummaryConfig::default();
        assert_eq!(format_average(Some(3.456), &config), "3.5");
        assert_eq!(format_average(Some(0.0), &config), "-");
        assert_eq!(format_average(None, &config), "-");
    }

    #[test]
    fn test_format_average_custom_config() {
        let config = SummaryConfig {
            precision: 2,
            empty_value: "No data".to_string(),
        };
        assert_eq!(format_average(Some(4.0), &config), "4.00");
        assert_eq!(format_average(None, &config), "No data");
    }

    #[test]
    fn test_block_serialization_omits_empty_fields() {
        let json = serde_json::to_string(&StatisticBlock::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
