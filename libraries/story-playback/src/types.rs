//! Core types for story playback

use crate::gesture::GestureThresholds;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// A single playable story
///
/// Only the title matters to the controller; the audio locator is derived
/// from theme + title. The backend also sends a file path, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Display title, unique within its theme
    #[serde(rename = "titel")]
    pub title: String,

    /// Server-side file path (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Story {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: None,
        }
    }
}

/// Ordered mapping of theme name to its stories
///
/// Key order is kept exactly as received; it drives the carousel order.
/// Immutable once loaded, replaced wholesale on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeCatalog {
    themes: Vec<(String, Vec<Story>)>,
}

impl ThemeCatalog {
    /// Build a catalog from `(theme, stories)` pairs.
    ///
    /// A repeated theme name replaces the earlier entry in place.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Story>)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (theme, stories) in pairs {
            catalog.insert(theme.into(), stories);
        }
        catalog
    }

    fn insert(&mut self, theme: String, stories: Vec<Story>) {
        if let Some(entry) = self.themes.iter_mut().find(|(name, _)| *name == theme) {
            entry.1 = stories;
        } else {
            self.themes.push((theme, stories));
        }
    }

    /// Number of themes
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Theme names in catalog order
    pub fn theme_names(&self) -> Vec<String> {
        self.themes.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Stories of a theme, if the theme exists
    pub fn stories(&self, theme: &str) -> Option<&[Story]> {
        self.themes
            .iter()
            .find(|(name, _)| name == theme)
            .map(|(_, stories)| stories.as_slice())
    }

    /// Position of a theme in catalog order
    pub fn position(&self, theme: &str) -> Option<usize> {
        self.themes.iter().position(|(name, _)| name == theme)
    }

    /// Theme at a catalog position
    pub fn get(&self, index: usize) -> Option<(&str, &[Story])> {
        self.themes
            .get(index)
            .map(|(name, stories)| (name.as_str(), stories.as_slice()))
    }

    /// Total number of stories across all themes
    pub fn story_count(&self) -> usize {
        self.themes.iter().map(|(_, stories)| stories.len()).sum()
    }
}

impl Serialize for ThemeCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.themes.len()))?;
        for (theme, stories) in &self.themes {
            map.serialize_entry(theme, stories)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ThemeCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = ThemeCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of theme names to story lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = ThemeCatalog::default();
                while let Some((theme, stories)) = access.next_entry::<String, Vec<Story>>()? {
                    catalog.insert(theme, stories);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Playback phase of the media source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// No story loaded
    Idle,

    /// Story loaded, not playing
    Paused,

    /// Currently playing
    Playing,
}

/// Layout the controller drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Theme cards in a grid, one selected at a time
    Grid,

    /// Wrap-around carousel, one theme focused at a time
    Carousel,
}

/// What happens when a story finishes on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfStoryPolicy {
    /// Pick another random story in the same theme
    Reroll,

    /// Same as the "next" button on the focused theme
    NextStory,

    /// Move to the next theme and play from there
    AdvanceTheme,
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Signed index step (-1 or +1)
    pub fn step(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Optional player features (only the grid layout ships them by default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFeatures {
    /// Volume slider and mute button
    pub volume: bool,

    /// Seek bar
    pub seek: bool,
}

/// Configuration for the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Grid or carousel layout
    pub view_mode: ViewMode,

    /// Behaviour on natural end of a story
    pub end_of_story: EndOfStoryPolicy,

    /// Start playback after a carousel move (default: load only)
    pub autoplay_on_navigate: bool,

    /// Carousel slide animation duration (default: 300ms)
    pub transition: Duration,

    /// Swipe classification thresholds
    pub gestures: GestureThresholds,

    /// Initial volume (0-100, default: 70)
    pub initial_volume: u8,

    /// Volume/seek controls
    pub features: PlayerFeatures,

    /// Prefix for theme images
    pub data_base_path: String,
}

/// Default carousel animation length
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Default volume level
pub const DEFAULT_VOLUME: u8 = 70;

impl PlayerConfig {
    /// Grid layout: toggleable theme cards, volume + seek, re-roll on end
    pub fn grid() -> Self {
        Self {
            view_mode: ViewMode::Grid,
            end_of_story: EndOfStoryPolicy::Reroll,
            features: PlayerFeatures {
                volume: true,
                seek: true,
            },
            ..Self::carousel()
        }
    }

    /// Carousel layout: swipe navigation, next-story on end
    pub fn carousel() -> Self {
        Self {
            view_mode: ViewMode::Carousel,
            end_of_story: EndOfStoryPolicy::NextStory,
            autoplay_on_navigate: false,
            transition: DEFAULT_TRANSITION,
            gestures: GestureThresholds::default(),
            initial_volume: DEFAULT_VOLUME,
            features: PlayerFeatures {
                volume: false,
                seek: false,
            },
            data_base_path: "/data/".to_string(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::carousel()
    }
}

/// Path of the audio stream for a story
///
/// Both segments are percent-encoded the way `encodeURIComponent` would,
/// so titles with spaces or umlauts survive the round trip.
pub fn audio_path(theme: &str, title: &str) -> String {
    format!("/api/audio/{}/{}", encode_segment(theme), encode_segment(title))
}

/// Theme backdrop image (derived from the theme alone)
pub fn image_path(data_base_path: &str, theme: &str) -> String {
    format!("{}{}/image.jpg", data_base_path, theme)
}

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_COMPONENT).to_string()
}

/// Card emoji for the grid layout
pub fn theme_emoji(theme: &str) -> &'static str {
    match theme {
        "Piraten" => "🏴‍☠️",
        "Drachen" => "🐉",
        "Einhörner" => "🦄",
        "Weltraum" => "🚀",
        "Ritter" => "⚔️",
        "Hexen" => "🧙‍♀️",
        "Detektive" => "🔍",
        "Grusel" => "👻",
        "Dinosaurier" => "🦕",
        "Elfen" => "🧚",
        "Monster" => "👾",
        "Weihnachten" => "🎄",
        _ => "📚",
    }
}

/// Format a duration as `m:ss` (or `h:mm:ss` past one hour)
pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keeps_wire_order() {
        let json = r#"{"Piraten": [{"titel":"A"},{"titel":"B"}], "Drachen": [{"titel":"C"}]}"#;
        let catalog: ThemeCatalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.theme_names(), vec!["Piraten", "Drachen"]);
        assert_eq!(catalog.stories("Drachen").unwrap()[0].title, "C");
        assert_eq!(catalog.story_count(), 3);
    }

    #[test]
    fn catalog_order_not_alphabetical() {
        let json = r#"{"Zauberer": [], "Affen": [], "Monster": []}"#;
        let catalog: ThemeCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.theme_names(), vec!["Zauberer", "Affen", "Monster"]);
    }

    #[test]
    fn catalog_accepts_extra_story_fields() {
        let json = r#"{"Hexen": [{"titel":"Der Besen","path":"/data/Hexen/Der Besen.mp3","extra":1}]}"#;
        let catalog: ThemeCatalog = serde_json::from_str(json).unwrap();
        let story = &catalog.stories("Hexen").unwrap()[0];
        assert_eq!(story.title, "Der Besen");
        assert_eq!(story.path.as_deref(), Some("/data/Hexen/Der Besen.mp3"));
    }

    #[test]
    fn catalog_rejects_non_map_body() {
        assert!(serde_json::from_str::<ThemeCatalog>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<ThemeCatalog>(r#"{"Piraten": "oops"}"#).is_err());
    }

    #[test]
    fn catalog_serializes_as_map() {
        let catalog = ThemeCatalog::from_pairs(vec![("Elfen", vec![Story::new("Lied")])]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"Elfen":[{"titel":"Lied"}]}"#);
    }

    #[test]
    fn duplicate_theme_replaces_in_place() {
        let catalog = ThemeCatalog::from_pairs(vec![
            ("A", vec![Story::new("1")]),
            ("B", vec![]),
            ("A", vec![Story::new("2")]),
        ]);
        assert_eq!(catalog.theme_names(), vec!["A", "B"]);
        assert_eq!(catalog.stories("A").unwrap()[0].title, "2");
    }

    #[test]
    fn audio_path_encodes_title() {
        assert_eq!(
            audio_path("Piraten", "Der große Schatz"),
            "/api/audio/Piraten/Der%20gro%C3%9Fe%20Schatz"
        );
        assert_eq!(audio_path("Monster", "A+B"), "/api/audio/Monster/A%2BB");
    }

    #[test]
    fn audio_path_keeps_uri_component_marks() {
        assert_eq!(
            audio_path("Piraten", "Peter's (kleine) Reise!~"),
            "/api/audio/Piraten/Peter's%20(kleine)%20Reise!~"
        );
        assert_eq!(encode_segment("a/b?c#d&e"), "a%2Fb%3Fc%23d%26e");
    }

    #[test]
    fn image_path_uses_theme_only() {
        assert_eq!(image_path("/data/", "Drachen"), "/data/Drachen/image.jpg");
    }

    #[test]
    fn unknown_theme_gets_book_emoji() {
        assert_eq!(theme_emoji("Drachen"), "🐉");
        assert_eq!(theme_emoji("Kochen"), "📚");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(Duration::from_secs(0)), "0:00");
        assert_eq!(format_clock(Duration::from_secs(65)), "1:05");
        assert_eq!(format_clock(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn layout_presets() {
        let grid = PlayerConfig::grid();
        assert_eq!(grid.view_mode, ViewMode::Grid);
        assert_eq!(grid.end_of_story, EndOfStoryPolicy::Reroll);
        assert!(grid.features.volume && grid.features.seek);

        let carousel = PlayerConfig::default();
        assert_eq!(carousel.view_mode, ViewMode::Carousel);
        assert_eq!(carousel.end_of_story, EndOfStoryPolicy::NextStory);
        assert_eq!(carousel.transition, Duration::from_millis(300));
        assert_eq!(carousel.initial_volume, 70);
    }
}
