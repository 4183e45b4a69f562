//! Session state owned by the controller
//!
//! One instance per page/process. Only `PlayerController` mutates it; hosts
//! and tests get read access through the accessors below.

use crate::carousel::Carousel;
use crate::gesture::{GestureStart, GestureThresholds, GestureTracker};
use crate::playtime::PlaytimeTracker;
use crate::selector::StorySelector;
use crate::types::PlaybackPhase;
use crate::volume::VolumeControl;
use std::time::Duration;

/// The story currently assigned to the media source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentStory {
    pub theme: String,
    pub title: String,

    /// Index within the theme's playlist
    pub index: usize,
}

/// Mutable per-session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) theme_order: Vec<String>,
    pub(crate) carousel: Carousel,
    pub(crate) selected_theme: Option<String>,
    pub(crate) current: Option<CurrentStory>,
    pub(crate) selector: StorySelector,
    pub(crate) phase: PlaybackPhase,
    pub(crate) playtime: PlaytimeTracker,
    pub(crate) gesture: GestureTracker,
    pub(crate) media_duration: Option<Duration>,
    pub(crate) volume: VolumeControl,
}

impl SessionState {
    pub(crate) fn new(thresholds: GestureThresholds, initial_volume: u8) -> Self {
        Self {
            theme_order: Vec::new(),
            carousel: Carousel::default(),
            selected_theme: None,
            current: None,
            selector: StorySelector::new(),
            phase: PlaybackPhase::Idle,
            playtime: PlaytimeTracker::new(),
            gesture: GestureTracker::new(thresholds),
            media_duration: None,
            volume: VolumeControl::new(initial_volume),
        }
    }

    /// Theme names in carousel order
    pub fn theme_order(&self) -> &[String] {
        &self.theme_order
    }

    /// Focused theme index (already wrapped mid-animation)
    pub fn current_theme_index(&self) -> Option<usize> {
        self.carousel.focused()
    }

    /// Raw carousel index; may sit at -1 or `len` until the animation settles
    pub fn logical_theme_index(&self) -> isize {
        self.carousel.logical_index()
    }

    /// Theme chosen in the grid layout
    pub fn selected_theme(&self) -> Option<&str> {
        self.selected_theme.as_deref()
    }

    pub fn current_story(&self) -> Option<&CurrentStory> {
        self.current.as_ref()
    }

    pub fn current_story_title(&self) -> Option<&str> {
        self.current.as_ref().map(|story| story.title.as_str())
    }

    /// Last-played exclusion for a theme
    pub fn last_played_index(&self, theme: &str) -> Option<usize> {
        self.selector.last_played(theme)
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn play_started_at(&self) -> Option<Duration> {
        self.playtime.started_at()
    }

    pub fn is_transitioning(&self) -> bool {
        self.carousel.is_transitioning()
    }

    pub fn gesture(&self) -> Option<&GestureStart> {
        self.gesture.current()
    }

    pub fn media_duration(&self) -> Option<Duration> {
        self.media_duration
    }

    pub fn volume(&self) -> &VolumeControl {
        &self.volume
    }

    /// Check the session invariants
    ///
    /// - a running playtime clock implies `Playing`
    /// - `Idle` exactly when no story is loaded
    /// - a settled carousel index lies inside the catalog
    pub fn invariants_hold(&self) -> bool {
        let clock_only_while_playing =
            !self.playtime.is_running() || self.phase == PlaybackPhase::Playing;

        let idle_iff_unloaded = (self.phase == PlaybackPhase::Idle) == self.current.is_none();

        let index = self.carousel.logical_index();
        let index_in_range = self.carousel.is_transitioning()
            || self.carousel.is_empty()
            || (index >= 0 && (index as usize) < self.carousel.len());

        clock_only_while_playing && idle_iff_unloaded && index_in_range
    }
}
