//! Random story selection without immediate repeats
//!
//! Each theme remembers the index it played last. The next draw is uniform
//! over the remaining indices, built directly rather than by re-drawing, so
//! it always finishes in one step.

use rand::Rng;
use std::collections::HashMap;

/// Pick a uniform index in `0..len`, never returning `excluded`
///
/// - `len == 0` → `None` (caller must check)
/// - `len == 1` → `Some(0)`, exclusion is not applied
/// - otherwise a uniform draw over the `len - 1` allowed indices
pub fn pick_excluding<R: Rng + ?Sized>(
    len: usize,
    excluded: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    match len {
        0 => None,
        1 => Some(0),
        _ => match excluded {
            Some(skip) if skip < len => {
                let drawn = rng.gen_range(0..len - 1);
                Some(if drawn >= skip { drawn + 1 } else { drawn })
            }
            _ => Some(rng.gen_range(0..len)),
        },
    }
}

/// Per-theme story selector
#[derive(Debug, Clone, Default)]
pub struct StorySelector {
    /// Last index drawn for each theme
    last_played: HashMap<String, usize>,
}

impl StorySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a story index for `theme` and remember it
    pub fn pick<R: Rng + ?Sized>(&mut self, theme: &str, len: usize, rng: &mut R) -> Option<usize> {
        let excluded = self.last_played.get(theme).copied();
        let index = pick_excluding(len, excluded, rng)?;
        self.last_played.insert(theme.to_string(), index);
        Some(index)
    }

    /// Index drawn last for `theme`
    pub fn last_played(&self, theme: &str) -> Option<usize> {
        self.last_played.get(theme).copied()
    }

    /// Drop the exclusion for `theme` (fresh selection)
    pub fn forget(&mut self, theme: &str) {
        self.last_played.remove(theme);
    }

    /// Drop all exclusions (catalog reload)
    pub fn clear(&mut self) {
        self.last_played.clear();
    }
}
