//! Types for Story Player API requests and responses.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for connecting to the story backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "http://localhost:8000")
    pub url: String,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

// =============================================================================
// Admin Types
// =============================================================================

/// Admin username and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Authorization` header value: `Basic base64(user:pass)`.
    pub fn basic_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Reporting window for the admin statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsPeriod {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "alltime")]
    AllTime,
}

impl StatsPeriod {
    /// Path segment used by the stats endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            StatsPeriod::Day => "24h",
            StatsPeriod::Week => "7d",
            StatsPeriod::Month => "30d",
            StatsPeriod::AllTime => "alltime",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "24h" => Ok(StatsPeriod::Day),
            "7d" => Ok(StatsPeriod::Week),
            "30d" => Ok(StatsPeriod::Month),
            "alltime" => Ok(StatsPeriod::AllTime),
            other => Err(format!(
                "invalid period '{}', expected one of: 24h, 7d, 30d, alltime",
                other
            )),
        }
    }
}

/// Playtime statistics returned by `/api/admin/stats/{period}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaytimeStats {
    /// Total listening time in the period
    pub total_seconds: u64,

    /// Chart buckets: `("YYYY-MM-DD HH:00" | "YYYY-MM-DD", seconds)`
    #[serde(default)]
    pub daily_data: Vec<(String, u64)>,

    /// Per-theme totals, largest first
    #[serde(default)]
    pub theme_stats: Vec<ThemeStat>,
}

/// Per-theme playtime totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeStat {
    pub theme: String,
    pub seconds: u64,
    pub count: u64,
}

// =============================================================================
// Download Types
// =============================================================================

/// Progress information for an audio download.
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub theme: String,
    pub title: String,
    pub bytes_received: u64,
    pub bytes_total: Option<u64>,
    /// Progress as a fraction (0.0 - 1.0), 0.0 when the size is unknown
    pub progress: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_encodes_user_and_password() {
        let credentials = Credentials::new("admin", "secret");
        assert_eq!(credentials.basic_header(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn debug_hides_password() {
        let credentials = Credentials::new("admin", "secret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn period_round_trips_through_str() {
        for period in [
            StatsPeriod::Day,
            StatsPeriod::Week,
            StatsPeriod::Month,
            StatsPeriod::AllTime,
        ] {
            assert_eq!(period.as_str().parse::<StatsPeriod>().unwrap(), period);
        }
        assert!("1y".parse::<StatsPeriod>().is_err());
    }

    #[test]
    fn stats_parse_tuple_buckets() {
        let json = r#"{
            "total_seconds": 3600,
            "daily_data": [["2024-05-01", 1800], ["2024-05-02", 1800]],
            "theme_stats": [{"theme": "Piraten", "seconds": 3600, "count": 4}]
        }"#;
        let stats: PlaytimeStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.daily_data[1], ("2024-05-02".to_string(), 1800));
        assert_eq!(stats.theme_stats[0].count, 4);
    }
}
