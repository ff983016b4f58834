//! Plain-text rendering for the CLI.

use std::fmt::Write as _;

use crate::config::Config;
use crate::groups::{metric_trend_badges, GroupPoint};
use crate::series::{QuarterPoint, SeriesEntry};
use crate::summary::{format_average, StatisticBlock};
use crate::trend::TrendBadge;

/// Width of the quarter column.
const QUARTER_WIDTH: usize = 9;

/// One line per quarter: label, formatted average, trend badge.
///
/// Placeholders show only their label.
#[must_use]
pub fn series_table(entries: &[SeriesEntry], config: &Config) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            SeriesEntry::Point(point) => {
                let _ = writeln!(out, "{}", point_line(point, config));
            }
            SeriesEntry::Placeholder { quarter } => {
                let _ = writeln!(out, "{quarter}");
            }
        }
    }
    out
}

fn point_line(point: &QuarterPoint, config: &Config) -> String {
    let value = format_average(point.avg, &config.summary);
    let badge = TrendBadge::classify(point.trend, config.trend.precision);
    let mut line = format!("{:<QUARTER_WIDTH$} {value:>6}", point.quarter);
    if let Some(badge) = badge {
        let _ = write!(line, "  {}", badge_text(&badge, config));
    }
    line
}

/// One line per quarter with `name=value` pairs for each metric.
#[must_use]
pub fn group_table(entries: &[SeriesEntry<GroupPoint>], config: &Config) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            SeriesEntry::Point(point) => {
                let badges = metric_trend_badges(point, config.trend.precision);
                let metrics: Vec<String> = point
                    .metrics
                    .iter()
                    .map(|(name, value)| {
                        let value = format_average(Some(*value), &config.summary);
                        match badges.get(name) {
                            Some(badge) => format!("{name}={value} ({})", badge.label),
                            None => format!("{name}={value}"),
                        }
                    })
                    .collect();
                let _ = writeln!(
                    out,
                    "{:<QUARTER_WIDTH$} {}",
                    point.quarter,
                    metrics.join("  ")
                );
            }
            SeriesEntry::Placeholder { quarter } => {
                let _ = writeln!(out, "{quarter}");
            }
        }
    }
    out
}

/// The headline block, e.g. `Q4-2023  4.2  +12.5% (#3fb68b)`.
#[must_use]
pub fn statistic(block: &StatisticBlock, config: &Config) -> String {
    let Some(stat) = &block.stat else {
        return config.summary.empty_value.clone();
    };
    let mut line = match &block.quarter {
        Some(quarter) => format!("{quarter}  {stat}"),
        None => stat.clone(),
    };
    if let Some(badge) = &block.badge {
        let _ = write!(line, "  {}", badge_text(badge, config));
    }
    line
}

/// A badge with its palette color, e.g. `-4% (#f0635c)`.
#[must_use]
pub fn badge_text(badge: &TrendBadge, config: &Config) -> String {
    format!(
        "{} ({})",
        badge.label,
        badge.color.hex(&config.trend.palette)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::normalize;

    #[test]
    fn test_series_table() {
        let dataset = vec![
            QuarterPoint::new("Q1-2023", Some(3.0)),
            QuarterPoint::new("Q3-2023", Some(4.0)).with_trend(33.333),
        ];
        let filled = normalize(&dataset).unwrap();
        let table = series_table(&filled, &Config::default());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Q1-2023      3.0");
        assert_eq!(lines[1], "Q2-2023");
        assert_eq!(lines[2], "Q3-2023      4.0  +33.33% (#3fb68b)");
    }

    #[test]
    fn test_series_table_zero_value() {
        let filled = normalize(&[QuarterPoint::new("Q1-2023", Some(0.0))]).unwrap();
        let table = series_table(&filled, &Config::default());
        assert_eq!(table, "Q1-2023        -\n");
    }

    #[test]
    fn test_group_table() {
        let dataset = vec![
            GroupPoint::new("Q1-2023")
                .with_metric("backend", 3.0)
                .with_metric("frontend", 2.5)
                .with_trend("backend", -10.0),
            GroupPoint::new("Q3-2023").with_metric("backend", 4.0),
        ];
        let filled = normalize(&dataset).unwrap();
        let table = group_table(&filled, &Config::default());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Q1-2023   backend=3.0 (-10%)  frontend=2.5");
        assert_eq!(lines[1], "Q2-2023");
        assert_eq!(lines[2], "Q3-2023   backend=4.0");
    }

    #[test]
    fn test_statistic_empty() {
        let config = Config::default();
        assert_eq!(statistic(&StatisticBlock::default(), &config), "-");
    }

    #[test]
    fn test_statistic_with_badge() {
        let config = Config::default();
        let dataset = vec![
            QuarterPoint::new("Q3-2023", Some(4.0)),
            QuarterPoint::new("Q4-2023", Some(4.2)).with_trend(5.0),
        ];
        let block = StatisticBlock::from_series(&dataset, &config.summary, 2).unwrap();
        assert_eq!(statistic(&block, &config), "Q4-2023  4.2  +5% (#3fb68b)");
    }
}
