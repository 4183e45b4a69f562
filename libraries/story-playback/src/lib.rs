//! Story Player - Playback & Navigation
//!
//! Platform-agnostic core of the story player.
//!
//! This crate provides:
//! - Theme catalog (ordered theme → stories mapping)
//! - Random story selection without immediate repeats
//! - Wrap-around carousel navigation with clone slides
//! - Swipe/drag gesture classification
//! - Playtime accounting (reported when a listening span ends)
//! - Volume and mute with restore-on-unmute
//!
//! # Architecture
//!
//! `story-playback` is a pure state machine:
//! - No DOM, no audio decoding, no HTTP
//! - No clock: every event carries `now` as a `Duration` since a host epoch
//! - Works natively and in the browser (`wasm` feature)
//!
//! The host feeds `PlayerEvent`s into `PlayerController::handle` and executes
//! the returned `Effect`s. Media commands go through the `MediaElement` trait.
//!
//! # Example
//!
//! ```rust
//! use story_playback::{Effect, PlayerConfig, PlayerController, PlayerEvent, Story, ThemeCatalog};
//! use std::time::Duration;
//!
//! let mut player = PlayerController::new(PlayerConfig::grid());
//!
//! let catalog = ThemeCatalog::from_pairs(vec![
//!     ("Piraten", vec![Story::new("Der Schatz"), Story::new("Die Insel")]),
//!     ("Drachen", vec![Story::new("Feuer")]),
//! ]);
//! player.handle(PlayerEvent::CatalogLoaded(catalog), Duration::ZERO);
//!
//! let effects = player.handle(
//!     PlayerEvent::ThemeSelected { theme: "Drachen".into() },
//!     Duration::from_secs(1),
//! );
//! assert!(effects.contains(&Effect::LoadSource { url: "/api/audio/Drachen/Feuer".into() }));
//! ```

mod carousel;
mod controller;
mod error;
pub mod events;
pub mod gesture;
mod media;
mod playtime;
mod selector;
mod session;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use carousel::{Carousel, Settled};
pub use controller::PlayerController;
pub use error::{PlaybackError, Result};
pub use events::{Effect, PlayerEvent, Slide, MEDIA_ERROR_MESSAGE, NO_TITLE_PLACEHOLDER};
pub use gesture::{classify, GestureThresholds, GestureTracker, HitTarget, Key, Point, SwipeRejection};
pub use media::{apply_media_effect, MediaElement};
pub use playtime::{PlaytimeReport, PlaytimeTracker, MIN_REPORTED_SECONDS};
pub use selector::{pick_excluding, StorySelector};
pub use session::{CurrentStory, SessionState};
pub use types::{
    audio_path, format_clock, image_path, Direction, EndOfStoryPolicy, PlaybackPhase,
    PlayerConfig, PlayerFeatures, Story, ThemeCatalog, ViewMode,
};
pub use volume::VolumeControl;
