//! Admin dashboard view-model
//!
//! Turns raw `PlaytimeStats` into the labels the dashboard shows: chart
//! buckets in minutes, a ranked theme list and a total.

use crate::types::{PlaytimeStats, StatsPeriod};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::time::Duration;
use story_playback::format_clock;

/// Shown instead of the ranking when there is nothing to rank
pub const NO_DATA_PLACEHOLDER: &str = "Keine Daten vorhanden";

/// One chart bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub minutes: u64,
}

/// One row of the theme ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTheme {
    pub rank: String,
    pub theme: String,
    pub time: String,
    pub plays: String,
}

/// Everything the dashboard renders for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    pub period: StatsPeriod,
    pub total: String,
    pub chart: Vec<ChartPoint>,
    pub ranking: Vec<RankedTheme>,
    pub placeholder: Option<&'static str>,
}

impl StatsView {
    pub fn from_stats(period: StatsPeriod, stats: &PlaytimeStats) -> Self {
        let chart = stats
            .daily_data
            .iter()
            .map(|(bucket, seconds)| ChartPoint {
                label: bucket_label(period, bucket),
                minutes: round_minutes(*seconds),
            })
            .collect();

        let ranking: Vec<RankedTheme> = stats
            .theme_stats
            .iter()
            .enumerate()
            .map(|(index, stat)| RankedTheme {
                rank: format!("#{}", index + 1),
                theme: stat.theme.clone(),
                time: format_clock(Duration::from_secs(stat.seconds)),
                plays: format!("{} plays", stat.count),
            })
            .collect();

        let placeholder = ranking.is_empty().then_some(NO_DATA_PLACEHOLDER);

        Self {
            period,
            total: format_clock(Duration::from_secs(stats.total_seconds)),
            chart,
            ranking,
            placeholder,
        }
    }
}

/// Seconds to whole minutes, halves rounded up
pub fn round_minutes(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

/// Chart tooltip: "N Minuten" below an hour, "Xh Ym" or "Xh" above
pub fn tooltip_label(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{} Minuten", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}h", hours)
    }
}

/// Chart label for a bucket: "{hour}:00" for 24h, "{day}.{month}" otherwise
///
/// Buckets that don't parse are shown as sent.
pub fn bucket_label(period: StatsPeriod, bucket: &str) -> String {
    let Some(timestamp) = parse_bucket(bucket) else {
        return bucket.to_string();
    };

    match period {
        StatsPeriod::Day => format!("{}:00", timestamp.hour()),
        _ => format!("{}.{}", timestamp.day(), timestamp.month()),
    }
}

fn parse_bucket(bucket: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(bucket, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(bucket, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
