//! Player events and effects
//!
//! The controller is a pure transition function: a `PlayerEvent` goes in,
//! a list of `Effect`s comes out. Inputs cover user actions, media element
//! callbacks and timer continuations. Effects are instructions for the host:
//! media commands, visual updates, timers and playtime reports.

use crate::gesture::{HitTarget, Key, Point};
use crate::playtime::PlaytimeReport;
use crate::types::{Direction, ThemeCatalog};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inputs to the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Catalog fetched successfully
    CatalogLoaded(ThemeCatalog),

    /// Catalog fetch failed (network, status or body)
    CatalogFailed { message: String },

    /// Theme card clicked (grid) or theme chosen by name
    ThemeSelected { theme: String },

    /// Navigation indicator tapped
    IndicatorTapped { index: usize },

    /// Explicit previous/next request
    Navigate(Direction),

    /// Keyboard input
    KeyPressed(Key),

    /// Pointer/touch pressed
    GestureStarted { point: Point, target: HitTarget },

    /// Pointer/touch moved while pressed
    GestureMoved { point: Point },

    /// Pointer/touch released
    GestureEnded { point: Point },

    /// Pointer left or touch cancelled
    GestureCancelled,

    /// Play/pause button
    PlayPauseClicked,

    /// "Next story" button on a slide
    NextClicked { theme_index: usize },

    /// Shuffle button (grid)
    ShuffleClicked,

    /// Volume slider (0-100)
    VolumeInput { level: u8 },

    /// Mute button
    MuteClicked,

    /// Seek bar (0-100)
    SeekInput { percent: f32 },

    /// Media element started playing
    MediaPlayed,

    /// Media element paused
    MediaPaused,

    /// Media element reached the end
    MediaEnded,

    /// Media metadata available
    MetadataLoaded { duration: Duration },

    /// Periodic position update
    TimeUpdate { position: Duration },

    /// Media element could not load or play the source
    MediaFailed { message: String },

    /// Carousel animation timer fired
    TransitionSettled,

    /// Page/process is going away
    Unload,
}

/// One rendered slide or card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub theme: String,
    pub image_path: String,
    pub emoji: String,

    /// Wrap-around duplicate at either end of the carousel
    pub is_clone: bool,
}

/// Instructions for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Rebuild the slide strip / card grid
    RenderSlides(Vec<Slide>),

    /// Highlight the active card (grid), `None` clears
    HighlightTheme(Option<String>),

    /// Animate the strip to a visual offset
    AnimateTo { offset: isize, duration: Duration },

    /// Jump the strip to a visual offset without animating
    SnapTo { offset: isize },

    /// Deliver `TransitionSettled` after the delay
    ScheduleSettle { after: Duration },

    /// Story title label, `None` shows the placeholder
    SetTitle(Option<String>),

    /// Show or hide the player bar
    ShowPlayer(bool),

    /// Assign the media source
    LoadSource { url: String },

    /// Remove the media source
    ClearSource,

    /// Start the media element
    Play,

    /// Pause the media element
    Pause,

    /// Play/pause affordance
    SetPlayIcon { playing: bool },

    /// Mute affordance
    SetMuteIcon { muted: bool },

    /// Media element volume and slider position (0-100)
    SetVolume { level: u8 },

    /// Enable the seek bar
    EnableSeek,

    /// Move playback position
    Seek { position: Duration },

    /// Seek bar and time labels
    Progress {
        percent: f32,
        current: String,
        total: String,
    },

    /// Send a playtime report (fire-and-forget)
    ReportPlaytime(PlaytimeReport),

    /// Show an inline error
    ShowError(String),
}

impl Effect {
    /// Effects the media element has to execute
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            Effect::LoadSource { .. }
                | Effect::ClearSource
                | Effect::Play
                | Effect::Pause
                | Effect::SetVolume { .. }
                | Effect::Seek { .. }
        )
    }
}

/// Placeholder shown when nothing is loaded
pub const NO_TITLE_PLACEHOLDER: &str = "Kein Titel ausgewählt";

/// Message shown when a story cannot be played
pub const MEDIA_ERROR_MESSAGE: &str = "Audio konnte nicht geladen werden";
