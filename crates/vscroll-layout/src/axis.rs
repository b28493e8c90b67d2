use vscroll_geometry::{Bounds, Rect};

/// Stacking direction of a container.
///
/// For list and Knuth–Plass containers this is the axis children advance along
/// and the axis their spatial index is keyed on. The cross axis is filled to
/// the container's constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Children advance left to right.
    Horizontal,

    /// Children advance top to bottom.
    #[default]
    Vertical,
}

impl Axis {
    /// Returns the opposite axis.
    #[inline]
    pub fn cross_axis(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Returns true if this is the horizontal axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    /// Returns true if this is the vertical axis.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Axis::Vertical)
    }

    /// Leading edge of `rect` along this axis.
    #[inline]
    pub fn start(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.left,
            Axis::Vertical => rect.top,
        }
    }

    /// Trailing edge of `rect` along this axis.
    #[inline]
    pub fn end(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.right(),
            Axis::Vertical => rect.bottom(),
        }
    }

    #[inline]
    pub fn extent(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.width,
            Axis::Vertical => rect.height,
        }
    }

    /// `(start, end)` of a query window along this axis.
    #[inline]
    pub fn span(self, bounds: &Bounds) -> (f32, f32) {
        match self {
            Axis::Horizontal => (bounds.left, bounds.right),
            Axis::Vertical => (bounds.top, bounds.bottom),
        }
    }

    /// Picks the component of `(dx, dy)` that lies on this axis.
    #[inline]
    pub fn pick(self, dx: f32, dy: f32) -> f32 {
        match self {
            Axis::Horizontal => dx,
            Axis::Vertical => dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_reads_matching_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(Axis::Horizontal.start(&rect), 10.0);
        assert_eq!(Axis::Horizontal.end(&rect), 40.0);
        assert_eq!(Axis::Vertical.start(&rect), 20.0);
        assert_eq!(Axis::Vertical.end(&rect), 60.0);
        assert_eq!(Axis::Vertical.cross_axis(), Axis::Horizontal);
        assert_eq!(Axis::Vertical.pick(3.0, 4.0), 4.0);
    }
}
