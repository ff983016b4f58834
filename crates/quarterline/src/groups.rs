//! Per-group quarterly datasets.
//!
//! Group datasets carry one record per quarter with several named metrics
//! (`delivery`, `quality`, `backend`, ...) and a trend map keyed by the same
//! names. They are gap-filled exactly like average datasets; a record counts
//! as populated when any of its metrics is above zero. Metrics and trends
//! sent as `null` are dropped on the way in.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::series::{Measurement, Periodic};
use crate::trend::TrendBadge;

/// One quarter of a group dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPoint {
    /// Quarter label, e.g. `Q1-2023`.
    pub quarter: String,
    /// Per-metric percentage change against the previous quarter.
    #[serde(
        default,
        deserialize_with = "trend_without_nulls",
        skip_serializing_if = "Option::is_none"
    )]
    pub trend: Option<BTreeMap<String, f64>>,
    /// Metric values keyed by group name.
    #[serde(flatten, deserialize_with = "metrics_without_nulls")]
    pub metrics: BTreeMap<String, f64>,
}

impl GroupPoint {
    /// Create an empty group point.
    #[must_use]
    pub fn new(quarter: impl Into<String>) -> Self {
        Self {
            quarter: quarter.into(),
            trend: None,
            metrics: BTreeMap::new(),
        }
    }

    /// Add a metric value.
    #[must_use]
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Add a metric trend.
    #[must_use]
    pub fn with_trend(mut self, name: impl Into<String>, delta: f64) -> Self {
        self.trend
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), delta);
        self
    }
}

fn metrics_without_nulls<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect())
}

fn trend_without_nulls<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, Option<f64>>>::deserialize(deserializer).map(|raw| {
        raw.map(|trend| {
            trend
                .into_iter()
                .filter_map(|(name, delta)| delta.map(|d| (name, d)))
                .collect()
        })
    })
}

impl Periodic for GroupPoint {
    fn quarter_label(&self) -> &str {
        &self.quarter
    }

    fn measurement(&self) -> Measurement {
        if self.metrics.values().any(|v| *v > 0.0) {
            Measurement::Positive
        } else if self.metrics.is_empty() {
            Measurement::Absent
        } else {
            Measurement::Present
        }
    }
}

/// Trend badges for every metric of `point` that moved.
///
/// Flat metrics are left out.
#[must_use]
pub fn metric_trend_badges(point: &GroupPoint, precision: u8) -> BTreeMap<String, TrendBadge> {
    point
        .trend
        .iter()
        .flatten()
        .filter_map(|(name, delta)| {
            TrendBadge::classify(Some(*delta), precision).map(|badge| (name.clone(), badge))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{normalize, SeriesEntry};
    use crate::trend::TrendColor;

    #[test]
    fn test_deserialize_flattened_metrics() {
        let json = r#"{
            "quarter": "Q2-2023",
            "delivery": 3.5,
            "quality": 4.0,
            "trend": { "delivery": 12.5, "quality": 0 }
        }"#;
        let point: GroupPoint = serde_json::from_str(json).unwrap();

        assert_eq!(point.quarter, "Q2-2023");
        assert_eq!(point.metrics.get("delivery"), Some(&3.5));
        assert_eq!(point.metrics.get("quality"), Some(&4.0));
        assert!(!point.metrics.contains_key("trend"));
        assert_eq!(point.trend.as_ref().and_then(|t| t.get("delivery")), Some(&12.5));
    }

    #[test]
    fn test_deserialize_null_trend() {
        let json = r#"{"quarter":"Q1-2023","backend":2,"trend":null}"#;
        let point: GroupPoint = serde_json::from_str(json).unwrap();
        assert!(point.trend.is_none());
        assert_eq!(point.metrics.get("backend"), Some(&2.0));
    }

    #[test]
    fn test_deserialize_null_metrics_are_dropped() {
        let json = r#"{"quarter":"Q1-2023","backend":2.5,"mobile":null,"trend":{"backend":null,"mobile":-3}}"#;
        let point: GroupPoint = serde_json::from_str(json).unwrap();

        assert_eq!(point.metrics.len(), 1);
        assert_eq!(point.metrics.get("backend"), Some(&2.5));
        assert!(!point.metrics.contains_key("mobile"));
        let trend = point.trend.as_ref().unwrap();
        assert!(!trend.contains_key("backend"));
        assert_eq!(trend.get("mobile"), Some(&-3.0));
    }

    #[test]
    fn test_all_null_metrics_are_absent() {
        let json = r#"{"quarter":"Q2-2023","backend":null,"frontend":null}"#;
        let point: GroupPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.measurement(), Measurement::Absent);
    }

    #[test]
    fn test_null_metric_point_outside_bounds_is_placeholder() {
        let json = r#"[
            {"quarter":"Q1-2023","backend":null},
            {"quarter":"Q2-2023","backend":3.0},
            {"quarter":"Q3-2023","backend":4.0,"mobile":null}
        ]"#;
        let dataset: Vec<GroupPoint> = serde_json::from_str(json).unwrap();
        let filled = normalize(&dataset).unwrap();

        assert!(filled[0].is_placeholder());
        assert_eq!(filled[2], SeriesEntry::Point(dataset[2].clone()));
        assert_eq!(
            serde_json::to_string(&filled[2]).unwrap(),
            r#"{"quarter":"Q3-2023","backend":4.0}"#
        );
    }

    #[test]
    fn test_measurement() {
        assert_eq!(GroupPoint::new("Q1-2023").measurement(), Measurement::Absent);
        assert_eq!(
            GroupPoint::new("Q1-2023")
                .with_metric("backend", 0.0)
                .measurement(),
            Measurement::Present
        );
        assert_eq!(
            GroupPoint::new("Q1-2023")
                .with_metric("backend", 0.0)
                .with_metric("frontend", 1.5)
                .measurement(),
            Measurement::Positive
        );
    }

    #[test]
    fn test_group_series_fills_gaps() {
        let dataset = vec![
            GroupPoint::new("Q1-2023").with_metric("quality", 0.0),
            GroupPoint::new("Q2-2023").with_metric("quality", 3.0),
            GroupPoint::new("Q4-2023").with_metric("quality", 4.0),
        ];
        let filled = normalize(&dataset).unwrap();

        assert_eq!(filled.len(), 4);
        assert!(filled[0].is_placeholder());
        assert_eq!(filled[1], SeriesEntry::Point(dataset[1].clone()));
        assert!(filled[2].is_placeholder());
        assert_eq!(filled[3], SeriesEntry::Point(dataset[2].clone()));
    }

    #[test]
    fn test_metric_trend_badges_skip_flat() {
        let point = GroupPoint::new("Q3-2023")
            .with_metric("delivery", 4.0)
            .with_trend("delivery", 25.0)
            .with_trend("quality", 0.0)
            .with_trend("feedback", -10.0);
        let badges = metric_trend_badges(&point, 2);

        assert_eq!(badges.len(), 2);
        assert_eq!(badges["delivery"].label, "+25%");
        assert_eq!(badges["feedback"].color, TrendColor::Negative);
        assert!(!badges.contains_key("quality"));
    }

    #[test]
    fn test_metric_trend_badges_without_trend() {
        let point = GroupPoint::new("Q3-2023").with_metric("delivery", 4.0);
        assert!(metric_trend_badges(&point, 2).is_empty());
    }

    #[test]
    fn test_serialize_flattens_metrics() {
        let point = GroupPoint::new("Q1-2023").with_metric("system", 2.5);
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"quarter":"Q1-2023","system":2.5}"#
        );
    }
}
