//! Player controller - core orchestration
//!
//! Owns the catalog and session state and turns every `PlayerEvent` into a
//! list of `Effect`s. Timestamps are passed in with each event; the
//! controller never reads a clock, sleeps or touches the network.

use crate::{
    carousel::Carousel,
    error::{PlaybackError, Result},
    events::{Effect, PlayerEvent, Slide, MEDIA_ERROR_MESSAGE},
    gesture::{HitTarget, Point},
    session::{CurrentStory, SessionState},
    types::{
        audio_path, format_clock, image_path, theme_emoji, Direction, EndOfStoryPolicy,
        PlaybackPhase, PlayerConfig, ThemeCatalog, ViewMode,
    },
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Playback & navigation controller
pub struct PlayerController<R = StdRng> {
    config: PlayerConfig,
    catalog: ThemeCatalog,
    session: SessionState,
    rng: R,
}

impl PlayerController<StdRng> {
    /// Create a controller seeded from system entropy
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for PlayerController<StdRng> {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl<R: Rng> PlayerController<R> {
    /// Create a controller with a caller-supplied RNG (seeded in tests)
    pub fn with_rng(config: PlayerConfig, rng: R) -> Self {
        let session = SessionState::new(config.gestures, config.initial_volume);
        Self {
            config,
            catalog: ThemeCatalog::default(),
            session,
            rng,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Effects to apply once at startup (initial volume)
    pub fn startup(&self) -> Vec<Effect> {
        if !self.config.features.volume {
            return Vec::new();
        }
        let volume = &self.session.volume;
        vec![
            Effect::SetVolume {
                level: volume.level(),
            },
            Effect::SetMuteIcon {
                muted: volume.is_muted(),
            },
        ]
    }

    /// Dispatch one event
    ///
    /// Misuse (unknown theme, index out of range) is logged and yields no
    /// effects; use the individual methods to observe those errors.
    pub fn handle(&mut self, event: PlayerEvent, now: Duration) -> Vec<Effect> {
        let result = match event {
            PlayerEvent::CatalogLoaded(catalog) => Ok(self.load_catalog(catalog, now)),
            PlayerEvent::CatalogFailed { message } => {
                self.catalog_failed(&message);
                Ok(Vec::new())
            }
            PlayerEvent::ThemeSelected { theme } => self.select_theme(&theme, now),
            PlayerEvent::IndicatorTapped { index } => self.go_to(index, now),
            PlayerEvent::Navigate(direction) => Ok(self.navigate(direction, now)),
            PlayerEvent::KeyPressed(key) => Ok(self.navigate(key.direction(), now)),
            PlayerEvent::GestureStarted { point, target } => {
                self.gesture_started(point, target, now);
                Ok(Vec::new())
            }
            PlayerEvent::GestureMoved { point } => {
                self.session.gesture.drag(point);
                Ok(Vec::new())
            }
            PlayerEvent::GestureEnded { point } => Ok(self.gesture_ended(point, now)),
            PlayerEvent::GestureCancelled => {
                self.session.gesture.cancel();
                Ok(Vec::new())
            }
            PlayerEvent::PlayPauseClicked => Ok(self.toggle_play_pause()),
            PlayerEvent::NextClicked { theme_index } => Ok(self.pick_next_story(theme_index, now)),
            PlayerEvent::ShuffleClicked => Ok(self.shuffle(now)),
            PlayerEvent::VolumeInput { level } => Ok(self.set_volume(level)),
            PlayerEvent::MuteClicked => Ok(self.toggle_mute()),
            PlayerEvent::SeekInput { percent } => Ok(self.seek_percent(percent)),
            PlayerEvent::MediaPlayed => Ok(self.media_played(now)),
            PlayerEvent::MediaPaused => Ok(self.media_paused(now)),
            PlayerEvent::MediaEnded => Ok(self.media_ended(now)),
            PlayerEvent::MetadataLoaded { duration } => Ok(self.metadata_loaded(duration)),
            PlayerEvent::TimeUpdate { position } => Ok(self.time_update(position)),
            PlayerEvent::MediaFailed { message } => Ok(self.media_failed(&message, now)),
            PlayerEvent::TransitionSettled => Ok(self.settle()),
            PlayerEvent::Unload => Ok(self.unload(now)),
        };

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Event rejected");
            Vec::new()
        })
    }

    // ===== Catalog =====

    /// Install a freshly fetched catalog
    ///
    /// Stops whatever was playing, renders one slide per theme (plus the two
    /// wrap-around clones in carousel view) and, in carousel view, loads a
    /// story for the first theme without starting it.
    pub fn load_catalog(&mut self, catalog: ThemeCatalog, now: Duration) -> Vec<Effect> {
        let mut effects = self.stop_playback(now);

        self.session.theme_order = catalog.theme_names();
        self.session.carousel.reset(catalog.len());
        self.session.selector.clear();
        self.session.selected_theme = None;
        self.session.gesture.cancel();

        info!(
            themes = catalog.len(),
            stories = catalog.story_count(),
            "Catalog loaded"
        );
        self.catalog = catalog;

        effects.push(Effect::RenderSlides(self.slides()));

        if self.config.view_mode == ViewMode::Carousel && !self.catalog.is_empty() {
            effects.push(Effect::SnapTo {
                offset: Carousel::offset_of(0),
            });
            effects.extend(self.load_focused(now, false));
        }

        effects
    }

    /// Catalog could not be fetched; the UI stays empty
    pub fn catalog_failed(&mut self, message: &str) {
        error!(error = %message, "Failed to load themes");
    }

    /// Slides for the current catalog and layout
    pub fn slides(&self) -> Vec<Slide> {
        let slide = |theme: &str, is_clone: bool| Slide {
            theme: theme.to_string(),
            image_path: image_path(&self.config.data_base_path, theme),
            emoji: theme_emoji(theme).to_string(),
            is_clone,
        };

        let order = &self.session.theme_order;
        let mut slides: Vec<Slide> = Vec::with_capacity(order.len() + 2);

        if self.config.view_mode == ViewMode::Carousel {
            if let (Some(first), Some(last)) = (order.first(), order.last()) {
                slides.push(slide(last, true));
                slides.extend(order.iter().map(|theme| slide(theme, false)));
                slides.push(slide(first, true));
            }
        } else {
            slides.extend(order.iter().map(|theme| slide(theme, false)));
        }

        slides
    }

    // ===== Story selection =====

    /// Choose a theme by name
    ///
    /// Grid view toggles: choosing the selected theme again deselects it and
    /// stops playback. Carousel view moves the focus to the theme.
    pub fn select_theme(&mut self, theme: &str, now: Duration) -> Result<Vec<Effect>> {
        if self.catalog.is_empty() {
            return Err(PlaybackError::EmptyCatalog);
        }
        let index = self
            .catalog
            .position(theme)
            .ok_or_else(|| PlaybackError::UnknownTheme(theme.to_string()))?;

        if self.config.view_mode == ViewMode::Carousel {
            return self.go_to(index, now);
        }

        if self.session.selected_theme.as_deref() == Some(theme) {
            debug!(theme = %theme, "Theme deselected");
            self.session.selected_theme = None;
            let mut effects = vec![Effect::HighlightTheme(None)];
            effects.extend(self.stop_playback(now));
            return Ok(effects);
        }

        debug!(theme = %theme, "Theme selected");
        self.session.selected_theme = Some(theme.to_string());
        self.session.selector.forget(theme);

        let mut effects = vec![Effect::HighlightTheme(Some(theme.to_string()))];
        effects.extend(self.play_random_story(theme, now, true));
        Ok(effects)
    }

    /// "Next story" on a slide
    ///
    /// Only acts on the focused theme; taps on other slides are ignored.
    pub fn pick_next_story(&mut self, theme_index: usize, now: Duration) -> Vec<Effect> {
        if self.active_index() != Some(theme_index) {
            debug!(theme_index, "Next ignored, theme not focused");
            return Vec::new();
        }
        let theme = self.session.theme_order[theme_index].clone();
        self.play_random_story(&theme, now, true)
    }

    /// Re-roll within the active theme (grid shuffle button)
    pub fn shuffle(&mut self, now: Duration) -> Vec<Effect> {
        match self.active_theme() {
            Some(theme) => self.play_random_story(&theme, now, true),
            None => Vec::new(),
        }
    }

    /// Draw a story from `theme` and assign it to the media source
    ///
    /// Flushes the outgoing story's playtime first. The playtime clock is
    /// reset and restarts on the media element's play event.
    fn play_random_story(&mut self, theme: &str, now: Duration, play: bool) -> Vec<Effect> {
        let len = self.catalog.stories(theme).map_or(0, <[_]>::len);
        if len == 0 {
            debug!(theme = %theme, "Theme has no stories");
            return Vec::new();
        }

        let mut effects = self.flush_playtime(now);

        let Some(index) = self.session.selector.pick(theme, len, &mut self.rng) else {
            return effects;
        };
        let Some(title) = self
            .catalog
            .stories(theme)
            .and_then(|stories| stories.get(index))
            .map(|story| story.title.clone())
        else {
            return effects;
        };

        debug!(theme = %theme, title = %title, index, play, "Story loaded");

        effects.push(Effect::SetTitle(Some(title.clone())));
        effects.push(Effect::LoadSource {
            url: audio_path(theme, &title),
        });
        effects.push(Effect::ShowPlayer(true));

        self.session.current = Some(CurrentStory {
            theme: theme.to_string(),
            title,
            index,
        });
        self.session.phase = PlaybackPhase::Paused;
        self.session.media_duration = None;
        self.session.playtime.reset();

        if play {
            effects.push(Effect::Play);
        }
        effects.push(Effect::SetPlayIcon { playing: play });
        effects
    }

    /// Load a story for the focused carousel theme
    fn load_focused(&mut self, now: Duration, play: bool) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.session.phase == PlaybackPhase::Playing {
            effects.extend(self.flush_playtime(now));
            effects.push(Effect::Pause);
            effects.push(Effect::SetPlayIcon { playing: false });
            self.session.phase = PlaybackPhase::Paused;
        }

        let Some(theme) = self.active_theme() else {
            return effects;
        };

        let has_stories = self
            .catalog
            .stories(&theme)
            .is_some_and(|stories| !stories.is_empty());

        if has_stories {
            effects.extend(self.play_random_story(&theme, now, play));
        } else {
            effects.extend(self.stop_playback(now));
        }
        effects
    }

    /// Unload the current story and reset the player bar
    fn stop_playback(&mut self, now: Duration) -> Vec<Effect> {
        if self.session.current.is_none() {
            return Vec::new();
        }

        let mut effects = self.flush_playtime(now);
        effects.extend([
            Effect::Pause,
            Effect::ClearSource,
            Effect::ShowPlayer(false),
            Effect::SetTitle(None),
            Effect::Progress {
                percent: 0.0,
                current: format_clock(Duration::ZERO),
                total: format_clock(Duration::ZERO),
            },
            Effect::SetPlayIcon { playing: false },
        ]);

        self.session.current = None;
        self.session.phase = PlaybackPhase::Idle;
        self.session.media_duration = None;
        self.session.playtime.reset();
        effects
    }

    // ===== Carousel =====

    /// Move the carousel one theme
    pub fn navigate(&mut self, direction: Direction, now: Duration) -> Vec<Effect> {
        let autoplay = self.config.autoplay_on_navigate;
        self.navigate_with(direction, now, autoplay)
    }

    fn navigate_with(&mut self, direction: Direction, now: Duration, autoplay: bool) -> Vec<Effect> {
        if self.config.view_mode != ViewMode::Carousel {
            debug!(?direction, "Navigation ignored in grid view");
            return Vec::new();
        }
        if self.session.carousel.is_transitioning() {
            debug!(?direction, "Navigation ignored, transition in progress");
            return Vec::new();
        }
        if self.session.carousel.is_empty() {
            return Vec::new();
        }

        let mut effects = self.flush_playtime(now);

        let Some(offset) = self.session.carousel.step(direction) else {
            return effects;
        };
        debug!(
            ?direction,
            index = self.session.carousel.logical_index(),
            offset,
            "Carousel moving"
        );

        effects.push(Effect::AnimateTo {
            offset,
            duration: self.config.transition,
        });
        effects.push(Effect::ScheduleSettle {
            after: self.config.transition,
        });
        effects.extend(self.load_focused(now, autoplay));
        effects
    }

    /// Move straight to a theme (indicator tap)
    pub fn go_to(&mut self, index: usize, now: Duration) -> Result<Vec<Effect>> {
        if self.session.theme_order.is_empty() {
            return Err(PlaybackError::EmptyCatalog);
        }
        if index >= self.session.theme_order.len() {
            return Err(PlaybackError::ThemeIndexOutOfBounds(index));
        }

        if self.config.view_mode == ViewMode::Grid {
            let theme = self.session.theme_order[index].clone();
            return self.select_theme(&theme, now);
        }

        if self.session.carousel.is_transitioning() || self.session.carousel.focused() == Some(index) {
            return Ok(Vec::new());
        }

        let mut effects = self.flush_playtime(now);
        let Some(offset) = self.session.carousel.jump(index) else {
            return Ok(effects);
        };

        effects.push(Effect::AnimateTo {
            offset,
            duration: self.config.transition,
        });
        effects.push(Effect::ScheduleSettle {
            after: self.config.transition,
        });
        let autoplay = self.config.autoplay_on_navigate;
        effects.extend(self.load_focused(now, autoplay));
        Ok(effects)
    }

    /// Animation timer fired: wrap the index and snap if we landed on a clone
    pub fn settle(&mut self) -> Vec<Effect> {
        let Some(settled) = self.session.carousel.settle() else {
            return Vec::new();
        };

        debug!(
            index = settled.index,
            wrapped = settled.snap_to.is_some(),
            "Carousel settled"
        );

        settled
            .snap_to
            .map(|offset| vec![Effect::SnapTo { offset }])
            .unwrap_or_default()
    }

    fn gesture_started(&mut self, point: Point, target: HitTarget, now: Duration) {
        if self.config.view_mode != ViewMode::Carousel {
            return;
        }
        self.session.gesture.begin(point, now, target);
    }

    fn gesture_ended(&mut self, point: Point, now: Duration) -> Vec<Effect> {
        match self.session.gesture.end(point, now) {
            Some(direction) => self.navigate(direction, now),
            None => Vec::new(),
        }
    }

    // ===== Playback =====

    /// Play/pause button; no-op without a story
    pub fn toggle_play_pause(&mut self) -> Vec<Effect> {
        if self.session.current.is_none() {
            return Vec::new();
        }
        match self.session.phase {
            PlaybackPhase::Playing => vec![Effect::Pause],
            PlaybackPhase::Paused | PlaybackPhase::Idle => vec![Effect::Play],
        }
    }

    fn media_played(&mut self, now: Duration) -> Vec<Effect> {
        if self.session.current.is_none() {
            warn!("Play event without a loaded story");
            return Vec::new();
        }
        self.session.phase = PlaybackPhase::Playing;
        self.session.playtime.start(now);
        vec![Effect::SetPlayIcon { playing: true }]
    }

    fn media_paused(&mut self, now: Duration) -> Vec<Effect> {
        if self.session.current.is_none() {
            return Vec::new();
        }
        let mut effects = self.flush_playtime(now);
        self.session.phase = PlaybackPhase::Paused;
        effects.push(Effect::SetPlayIcon { playing: false });
        effects
    }

    fn media_ended(&mut self, now: Duration) -> Vec<Effect> {
        if self.session.current.is_none() {
            return Vec::new();
        }
        let mut effects = self.flush_playtime(now);
        self.session.phase = PlaybackPhase::Paused;

        match self.config.end_of_story {
            EndOfStoryPolicy::Reroll => {
                let theme = self
                    .active_theme()
                    .or_else(|| self.session.current.as_ref().map(|story| story.theme.clone()));
                if let Some(theme) = theme {
                    effects.extend(self.play_random_story(&theme, now, true));
                }
            }
            EndOfStoryPolicy::NextStory => {
                if let Some(index) = self.active_index() {
                    effects.extend(self.pick_next_story(index, now));
                }
            }
            EndOfStoryPolicy::AdvanceTheme => match self.config.view_mode {
                ViewMode::Carousel => effects.extend(self.navigate_with(Direction::Next, now, true)),
                ViewMode::Grid => {
                    let next = self.next_theme_after_active();
                    if next.is_some() && next == self.session.selected_theme {
                        // single theme: selecting it again would deselect
                        if let Some(theme) = next {
                            effects.extend(self.play_random_story(&theme, now, true));
                        }
                    } else if let Some(theme) = next {
                        if let Ok(more) = self.select_theme(&theme, now) {
                            effects.extend(more);
                        }
                    }
                }
            },
        }

        effects
    }

    fn metadata_loaded(&mut self, duration: Duration) -> Vec<Effect> {
        self.session.media_duration = Some(duration);
        if self.config.features.seek {
            vec![Effect::EnableSeek]
        } else {
            Vec::new()
        }
    }

    fn time_update(&mut self, position: Duration) -> Vec<Effect> {
        match self.session.media_duration {
            Some(total) if !total.is_zero() => {
                let percent = (position.as_secs_f32() / total.as_secs_f32() * 100.0).clamp(0.0, 100.0);
                vec![Effect::Progress {
                    percent,
                    current: format_clock(position),
                    total: format_clock(total),
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Unplayable source: stop the clock, keep the source for a retry
    fn media_failed(&mut self, message: &str, now: Duration) -> Vec<Effect> {
        let title = self.session.current_story_title().unwrap_or_default().to_string();
        warn!(error = %message, title = %title, "Media playback failed");

        let mut effects = self.flush_playtime(now);
        if self.session.current.is_some() {
            self.session.phase = PlaybackPhase::Paused;
        }
        effects.push(Effect::SetPlayIcon { playing: false });
        effects.push(Effect::ShowError(MEDIA_ERROR_MESSAGE.to_string()));
        effects
    }

    // ===== Volume & seek =====

    /// Volume slider (0-100)
    pub fn set_volume(&mut self, level: u8) -> Vec<Effect> {
        if !self.config.features.volume {
            return Vec::new();
        }
        self.session.volume.set_level(level);
        self.volume_effects()
    }

    /// Mute button
    pub fn toggle_mute(&mut self) -> Vec<Effect> {
        if !self.config.features.volume {
            return Vec::new();
        }
        self.session.volume.toggle_mute();
        self.volume_effects()
    }

    fn volume_effects(&self) -> Vec<Effect> {
        vec![
            Effect::SetVolume {
                level: self.session.volume.level(),
            },
            Effect::SetMuteIcon {
                muted: self.session.volume.is_muted(),
            },
        ]
    }

    /// Seek bar (0-100); ignored until the duration is known
    pub fn seek_percent(&mut self, percent: f32) -> Vec<Effect> {
        if !self.config.features.seek {
            return Vec::new();
        }
        let Some(duration) = self.session.media_duration else {
            return Vec::new();
        };
        if !percent.is_finite() {
            return Vec::new();
        }
        let position = duration.mul_f32(percent.clamp(0.0, 100.0) / 100.0);
        vec![Effect::Seek { position }]
    }

    // ===== Playtime =====

    /// Close the running playtime span, if any
    pub fn flush_playtime(&mut self, now: Duration) -> Vec<Effect> {
        let story = self.session.current.as_ref();
        let report = self.session.playtime.flush(
            now,
            story.map(|s| s.theme.as_str()),
            story.map(|s| s.title.as_str()),
        );

        match report {
            Some(report) => {
                debug!(
                    theme = %report.theme,
                    title = %report.title,
                    duration = report.duration,
                    "Playtime flushed"
                );
                vec![Effect::ReportPlaytime(report)]
            }
            None => Vec::new(),
        }
    }

    /// Best-effort flush before the session goes away
    pub fn unload(&mut self, now: Duration) -> Vec<Effect> {
        self.flush_playtime(now)
    }

    // ===== Helpers =====

    /// Index of the theme the user is looking at
    fn active_index(&self) -> Option<usize> {
        match self.config.view_mode {
            ViewMode::Carousel => self.session.carousel.focused(),
            ViewMode::Grid => self
                .session
                .selected_theme
                .as_deref()
                .and_then(|theme| self.catalog.position(theme)),
        }
    }

    fn active_theme(&self) -> Option<String> {
        self.active_index()
            .and_then(|index| self.session.theme_order.get(index).cloned())
    }

    fn next_theme_after_active(&self) -> Option<String> {
        let len = self.session.theme_order.len();
        if len == 0 {
            return None;
        }
        let next = self.active_index().map_or(0, |index| (index + 1) % len);
        self.session.theme_order.get(next).cloned()
    }
}
