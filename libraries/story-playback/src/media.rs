//! Platform media primitive
//!
//! Abstracts the element that actually decodes and plays audio (an HTML
//! audio element in the browser, a headless stand-in on the terminal).
//! The controller never talks to it directly; hosts route media effects here.

use crate::error::Result;
use crate::events::Effect;
use std::time::Duration;

/// Platform-agnostic media element
pub trait MediaElement {
    /// Assign a new source URL
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Remove the current source
    fn clear_source(&mut self);

    /// Start or resume playback
    ///
    /// Completion is reported back as `PlayerEvent::MediaPlayed`
    /// (or `MediaFailed`).
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Linear gain 0.0-1.0
    fn set_volume(&mut self, gain: f32);

    /// Jump to an absolute position
    fn seek(&mut self, position: Duration) -> Result<()>;
}

/// Execute a media effect against the element
///
/// Returns `Ok(false)` for effects that are not media commands.
pub fn apply_media_effect<M: MediaElement + ?Sized>(media: &mut M, effect: &Effect) -> Result<bool> {
    match effect {
        Effect::LoadSource { url } => media.set_source(url)?,
        Effect::ClearSource => media.clear_source(),
        Effect::Play => media.play()?,
        Effect::Pause => media.pause(),
        Effect::SetVolume { level } => media.set_volume(f32::from(*level) / 100.0),
        Effect::Seek { position } => media.seek(*position)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Recording media element for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMedia {
    pub source: Option<String>,
    pub playing: bool,
    pub gain: f32,
    pub position: Duration,
}

#[cfg(test)]
impl MediaElement for RecordingMedia {
    fn set_source(&mut self, url: &str) -> Result<()> {
        self.source = Some(url.to_string());
        self.position = Duration::ZERO;
        Ok(())
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.playing = false;
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(crate::error::PlaybackError::NoStoryLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_volume(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.position = position;
        Ok(())
    }
}
