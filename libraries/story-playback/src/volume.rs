//! Volume and mute
//!
//! Muting drops the level to 0 but remembers the previous level, so unmuting
//! returns to where the listener was instead of an arbitrary default. The
//! slider and mute button read the same state and cannot disagree.

use crate::types::DEFAULT_VOLUME;

/// Volume control (0-100)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeControl {
    /// Current level (0 = muted)
    level: u8,

    /// Last audible level, restored on unmute
    previous_level: u8,
}

impl VolumeControl {
    pub fn new(level: u8) -> Self {
        let level = level.min(100);
        Self {
            level,
            previous_level: if level > 0 { level } else { DEFAULT_VOLUME },
        }
    }

    /// Slider input
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
        if self.level > 0 {
            self.previous_level = self.level;
        }
    }

    /// Mute button
    pub fn toggle_mute(&mut self) {
        if self.level > 0 {
            self.previous_level = self.level;
            self.level = 0;
        } else {
            self.level = self.previous_level;
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn previous_level(&self) -> u8 {
        self.previous_level
    }

    pub fn is_muted(&self) -> bool {
        self.level == 0
    }

    /// Linear gain for the media element (0.0-1.0)
    pub fn gain(&self) -> f32 {
        f32::from(self.level) / 100.0
    }
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}
