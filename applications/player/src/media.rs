//! Headless media element
//!
//! The terminal player has no audio output. This element keeps a position
//! clock for the loaded source and reports back the way a browser audio
//! element would: play/pause confirmations, metadata, time updates and the
//! natural end of a story.

use std::time::Duration;
use story_playback::{MediaElement, PlaybackError, PlayerEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

pub struct HeadlessMedia {
    events: UnboundedSender<PlayerEvent>,
    story_length: Duration,
    source: Option<String>,
    playing: bool,
    position: Duration,
    gain: f32,
}

impl HeadlessMedia {
    /// `story_length` is reported as the duration of every source
    pub fn new(events: UnboundedSender<PlayerEvent>, story_length: Duration) -> Self {
        Self {
            events,
            story_length,
            source: None,
            playing: false,
            position: Duration::ZERO,
            gain: 1.0,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Advance the clock while playing
    ///
    /// Emits a time update, and the end of the story once the position
    /// reaches its length.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }

        self.position = (self.position + elapsed).min(self.story_length);
        self.emit(PlayerEvent::TimeUpdate {
            position: self.position,
        });

        if self.position >= self.story_length {
            self.playing = false;
            debug!(source = ?self.source, "Story reached its end");
            self.emit(PlayerEvent::MediaEnded);
        }
    }

    fn emit(&self, event: PlayerEvent) {
        trace!(?event, "Media event");
        // Receiver only disappears during shutdown
        let _ = self.events.send(event);
    }
}

impl MediaElement for HeadlessMedia {
    fn set_source(&mut self, url: &str) -> story_playback::Result<()> {
        if url.is_empty() {
            return Err(PlaybackError::Media("empty source".to_string()));
        }
        debug!(url = %url, "Source loaded");
        self.source = Some(url.to_string());
        self.playing = false;
        self.position = Duration::ZERO;
        self.emit(PlayerEvent::MetadataLoaded {
            duration: self.story_length,
        });
        Ok(())
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn play(&mut self) -> story_playback::Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::NoStoryLoaded);
        }
        if self.position >= self.story_length {
            self.position = Duration::ZERO;
        }
        self.playing = true;
        self.emit(PlayerEvent::MediaPlayed);
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.emit(PlayerEvent::MediaPaused);
        }
    }

    fn set_volume(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn seek(&mut self, position: Duration) -> story_playback::Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::NoStoryLoaded);
        }
        self.position = position.min(self.story_length);
        self.emit(PlayerEvent::TimeUpdate {
            position: self.position,
        });
        Ok(())
    }
}
