/// Player configuration
use crate::error::{PlayerAppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use story_playback::{
    gesture::GestureThresholds, EndOfStoryPolicy, PlayerConfig, PlayerFeatures, ViewMode,
};

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "story-player.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,

    #[serde(default = "default_admin")]
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_layout")]
    pub layout: ViewMode,

    /// Overrides the layout's end-of-story behaviour
    #[serde(default)]
    pub end_of_story: Option<EndOfStoryPolicy>,

    #[serde(default)]
    pub autoplay: bool,

    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default = "default_swipe_distance")]
    pub swipe_distance: f32,

    /// Length the headless media element pretends every story has
    #[serde(default = "default_story_seconds")]
    pub story_seconds: u64,

    #[serde(default = "default_data_path")]
    pub data_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminSettings {
    /// Where the admin credential is cached (default: user config dir)
    #[serde(default)]
    pub credential_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerAppError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (STORY_PLAYER__VOLUME=40)
        settings = settings.add_source(
            config::Environment::with_prefix("STORY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlayerAppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PlayerAppError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.server.url.starts_with("http://") && !self.server.url.starts_with("https://") {
            return Err(PlayerAppError::Config(format!(
                "Server URL must start with http:// or https:// (got '{}')",
                self.server.url
            )));
        }

        if self.player.volume > 100 {
            return Err(PlayerAppError::Config(format!(
                "Volume must be between 0 and 100 (got {})",
                self.player.volume
            )));
        }

        if !(50.0..=80.0).contains(&self.player.swipe_distance) {
            return Err(PlayerAppError::Config(format!(
                "Swipe distance must be between 50 and 80 (got {})",
                self.player.swipe_distance
            )));
        }

        if self.player.story_seconds == 0 {
            return Err(PlayerAppError::Config(
                "Story length must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    /// Controller configuration for the chosen layout
    pub fn player_config(&self) -> PlayerConfig {
        let settings = &self.player;
        let mut config = match settings.layout {
            ViewMode::Grid => PlayerConfig::grid(),
            ViewMode::Carousel => PlayerConfig::carousel(),
        };

        if let Some(policy) = settings.end_of_story {
            config.end_of_story = policy;
        }
        config.autoplay_on_navigate = settings.autoplay;
        config.transition = Duration::from_millis(settings.transition_ms);
        config.initial_volume = settings.volume;
        config.gestures = GestureThresholds {
            min_horizontal: settings.swipe_distance,
            ..GestureThresholds::default()
        };
        config.data_base_path = settings.data_path.clone();

        // The terminal always offers volume and seek
        config.features = PlayerFeatures {
            volume: true,
            seek: true,
        };

        config
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings { url: default_url() }
}

fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        layout: default_layout(),
        end_of_story: None,
        autoplay: false,
        transition_ms: default_transition_ms(),
        volume: default_volume(),
        swipe_distance: default_swipe_distance(),
        story_seconds: default_story_seconds(),
        data_path: default_data_path(),
    }
}

fn default_layout() -> ViewMode {
    ViewMode::Carousel
}

fn default_transition_ms() -> u64 {
    300
}

fn default_volume() -> u8 {
    70
}

fn default_swipe_distance() -> f32 {
    80.0
}

fn default_story_seconds() -> u64 {
    180
}

fn default_data_path() -> String {
    "/data/".to_string()
}

fn default_admin() -> AdminSettings {
    AdminSettings {
        credential_dir: None,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            player: default_player(),
            admin: default_admin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();

        let player = config.player_config();
        assert_eq!(player.view_mode, ViewMode::Carousel);
        assert_eq!(player.end_of_story, EndOfStoryPolicy::NextStory);
        assert_eq!(player.transition, Duration::from_millis(300));
        assert_eq!(player.initial_volume, 70);
    }

    #[test]
    fn loads_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
url = "http://stories.local:9000"

[player]
layout = "grid"
end_of_story = "advance_theme"
volume = 40
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.url, "http://stories.local:9000");
        assert_eq!(config.player.layout, ViewMode::Grid);

        let player = config.player_config();
        assert_eq!(player.end_of_story, EndOfStoryPolicy::AdvanceTheme);
        assert_eq!(player.initial_volume, 40);
        // Unset fields keep their defaults
        assert_eq!(config.player.transition_ms, 300);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/story-player.toml")));
        assert!(matches!(result, Err(PlayerAppError::Config(_))));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.url = "localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.player.swipe_distance = 20.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.player.volume = 120;
        assert!(config.validate().is_err());
    }
}
