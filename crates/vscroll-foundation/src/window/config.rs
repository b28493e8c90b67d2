use crate::recycler::DEFAULT_RECYCLER_CAPACITY;
use crate::scroll::Motion;

/// How much content beyond the viewport is materialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreloadStrategy {
    /// Viewport-sized pages added on the edge the scroll is heading to.
    pub pages: u32,
    /// Whether both edges get `pages` while no scroll is in progress.
    pub when_idle: bool,
    pub enabled: bool,
}

impl Default for PreloadStrategy {
    fn default() -> Self {
        Self {
            pages: 1,
            when_idle: true,
            enabled: true,
        }
    }
}

impl PreloadStrategy {
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            pages: 0,
            when_idle: false,
            enabled: false,
        }
    }

    /// Pages to add before and after the viewport on an axis moving with
    /// `motion`.
    pub fn edges(&self, motion: Motion) -> (u32, u32) {
        if !self.enabled {
            return (0, 0);
        }
        match motion {
            Motion::Backward => (self.pages, 0),
            Motion::Forward => (0, self.pages),
            Motion::Idle if self.when_idle => (self.pages, self.pages),
            Motion::Idle => (0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowConfig {
    /// Inset of the root layout, also added to the reported content size.
    pub margin: f32,
    pub horizontal_scroll: bool,
    pub vertical_scroll: bool,
    pub preload: PreloadStrategy,
    /// Initial slot count of every per-type recycler.
    pub recycler_capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            horizontal_scroll: false,
            vertical_scroll: true,
            preload: PreloadStrategy::default(),
            recycler_capacity: DEFAULT_RECYCLER_CAPACITY,
        }
    }
}
