//! Wrap-around carousel index arithmetic
//!
//! The rendered strip is `[clone of last] [theme 0] .. [theme n-1] [clone of first]`,
//! so a real theme `i` sits at visual offset `i + 1`. Moving past either end
//! lands on a clone first; once the animation settles the index wraps and the
//! strip snaps (unanimated) to the matching real slide.

use crate::types::Direction;

/// Carousel navigation state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carousel {
    /// Number of real slides
    len: usize,

    /// Logical index; may be -1 or `len` while a wrap animation runs
    index: isize,

    /// An animation is in flight
    transitioning: bool,
}

/// Outcome of a settled animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    /// Final logical index
    pub index: usize,

    /// Visual offset to jump to without animating (wrap-around only)
    pub snap_to: Option<isize>,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            transitioning: false,
        }
    }

    /// Reset for a new catalog
    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Raw logical index (can be out of range mid-animation)
    pub fn logical_index(&self) -> isize {
        self.index
    }

    /// Focused real theme, already wrapped while an animation runs
    pub fn focused(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        Some(self.index.rem_euclid(self.len as isize) as usize)
    }

    /// Visual offset of a real slide (leading clone occupies offset 0)
    pub fn offset_of(index: usize) -> isize {
        index as isize + 1
    }

    /// Number of rendered slides including both clones
    pub fn slide_count(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.len + 2
        }
    }

    /// Start a one-step move
    ///
    /// Returns the visual offset to animate to, or `None` when a transition
    /// is already running or the carousel is empty.
    pub fn step(&mut self, direction: Direction) -> Option<isize> {
        if self.transitioning || self.len == 0 {
            return None;
        }

        let target = self.index + 1 + direction.step();
        self.index += direction.step();
        self.transitioning = true;
        Some(target)
    }

    /// Start a direct move to a real slide (indicator tap)
    pub fn jump(&mut self, index: usize) -> Option<isize> {
        if self.transitioning || index >= self.len || self.focused() == Some(index) {
            return None;
        }

        self.index = index as isize;
        self.transitioning = true;
        Some(Self::offset_of(index))
    }

    /// Finish the running animation, wrapping the index if needed
    ///
    /// Returns `None` if nothing was in flight.
    pub fn settle(&mut self) -> Option<Settled> {
        if !self.transitioning {
            return None;
        }
        self.transitioning = false;

        let last = self.len as isize - 1;
        let snap_to = if self.index < 0 {
            self.index = last;
            Some(Self::offset_of(self.len - 1))
        } else if self.index > last {
            self.index = 0;
            Some(Self::offset_of(0))
        } else {
            None
        };

        Some(Settled {
            index: self.index as usize,
            snap_to,
        })
    }
}
