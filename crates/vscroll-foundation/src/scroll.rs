//! Scroll surface contract and a headless implementation.
//!
//! The window controller never owns scrolling. It reads the viewport from a
//! [`ScrollSurface`], reports the content size back, and asks the surface to
//! move when a bookmark has to be honored. Animation, friction and input
//! handling live behind the trait.

use vscroll_geometry::{Bounds, Point, Size};

/// Sign of the last movement on one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Motion {
    Backward,
    #[default]
    Idle,
    Forward,
}

impl Motion {
    fn of(delta: f32) -> Self {
        if delta > 0.0 {
            Motion::Forward
        } else if delta < 0.0 {
            Motion::Backward
        } else {
            Motion::Idle
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollDirection {
    pub horizontal: Motion,
    pub vertical: Motion,
}

impl ScrollDirection {
    pub const IDLE: ScrollDirection = ScrollDirection {
        horizontal: Motion::Idle,
        vertical: Motion::Idle,
    };
}

/// What the window controller needs from the scroll view it drives.
pub trait ScrollSurface {
    /// Size of the visible area.
    fn inner_size(&self) -> Size;

    /// Offset of the visible area inside the content.
    fn scroll_position(&self) -> Point;

    /// Direction of the scroll in progress, idle when settled.
    fn direction(&self) -> ScrollDirection;

    /// Total extent of the laid out content.
    fn set_content_size(&mut self, size: Size);

    /// Jumps to `position` without animation. Returns true if the visible
    /// position changed.
    fn scroll_to(&mut self, position: Point) -> bool;

    /// Visible rectangle in content coordinates.
    fn viewport(&self) -> Bounds {
        Bounds::from_origin_size(self.scroll_position(), self.inner_size())
    }
}

/// In-memory scroll view. Positions are clamped to `[0, content - inner]`
/// on scrollable axes and pinned to zero on the others.
#[derive(Clone, Debug)]
pub struct ScrollState {
    inner_size: Size,
    content_size: Size,
    position: Point,
    direction: ScrollDirection,
    horizontal: bool,
    vertical: bool,
}

impl ScrollState {
    /// Creates a vertically scrolling surface.
    pub fn new(inner_size: Size) -> Self {
        Self {
            inner_size,
            content_size: Size::ZERO,
            position: Point::ZERO,
            direction: ScrollDirection::IDLE,
            horizontal: false,
            vertical: true,
        }
    }

    pub fn with_axes(mut self, horizontal: bool, vertical: bool) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self.position = self.clamp(self.position);
        self
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Largest reachable scroll position.
    pub fn max_position(&self) -> Point {
        Point::new(
            (self.content_size.width - self.inner_size.width).max(0.0),
            (self.content_size.height - self.inner_size.height).max(0.0),
        )
    }

    pub fn set_inner_size(&mut self, size: Size) {
        self.inner_size = size;
        self.position = self.clamp(self.position);
    }

    /// Scrolls by the given delta and returns the part that was applied.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) -> Point {
        let before = self.position;
        self.scroll_to(Point::new(before.x + dx, before.y + dy));
        Point::new(self.position.x - before.x, self.position.y - before.y)
    }

    /// Marks the scroll as finished so preloading stops favoring a side.
    pub fn settle(&mut self) {
        self.direction = ScrollDirection::IDLE;
    }

    fn clamp(&self, position: Point) -> Point {
        let max = self.max_position();
        let x = if self.horizontal {
            position.x.clamp(0.0, max.x)
        } else {
            0.0
        };
        let y = if self.vertical {
            position.y.clamp(0.0, max.y)
        } else {
            0.0
        };
        Point::new(x, y)
    }
}

impl ScrollSurface for ScrollState {
    fn inner_size(&self) -> Size {
        self.inner_size
    }

    fn scroll_position(&self) -> Point {
        self.position
    }

    fn direction(&self) -> ScrollDirection {
        self.direction
    }

    fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
        self.position = self.clamp(self.position);
    }

    fn scroll_to(&mut self, position: Point) -> bool {
        if position.x.is_nan() || position.y.is_nan() {
            return false;
        }
        let target = self.clamp(position);
        if target == self.position {
            return false;
        }
        self.direction = ScrollDirection {
            horizontal: Motion::of(target.x - self.position.x),
            vertical: Motion::of(target.y - self.position.y),
        };
        self.position = target;
        true
    }
}
