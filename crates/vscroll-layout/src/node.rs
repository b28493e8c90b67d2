use smallvec::SmallVec;
use vscroll_geometry::{Point, Rect, Size};

use crate::policy::Policy;
use crate::{Axis, PaginatedIndex};

pub use indextree::NodeId;

/// Render kind of a node. The window controller hands nodes to renderers
/// grouped by this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewType(pub &'static str);

impl ViewType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// How a leaf resolves one dimension against the constraint it is given.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Extent {
    #[default]
    Fill,
    Fixed(f32),
}

impl Extent {
    #[inline]
    pub fn resolve(self, available: f32) -> f32 {
        match self {
            Extent::Fill => available,
            Extent::Fixed(value) => value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Sizing {
    pub width: Extent,
    pub height: Extent,
}

impl Sizing {
    pub const fn fill() -> Self {
        Self {
            width: Extent::Fill,
            height: Extent::Fill,
        }
    }

    pub const fn fixed(width: f32, height: f32) -> Self {
        Self {
            width: Extent::Fixed(width),
            height: Extent::Fixed(height),
        }
    }

    /// Fills the width, keeps `height`.
    pub const fn fixed_height(height: f32) -> Self {
        Self {
            width: Extent::Fill,
            height: Extent::Fixed(height),
        }
    }

    /// Fills the height, keeps `width`.
    pub const fn fixed_width(width: f32) -> Self {
        Self {
            width: Extent::Fixed(width),
            height: Extent::Fill,
        }
    }

    pub fn resolve(&self, available: Size) -> Size {
        Size::new(
            self.width.resolve(available.width),
            self.height.resolve(available.height),
        )
    }
}

/// Pinning state of a sticky header, rewritten by every sticky update.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct StickyState {
    pub fixed: bool,
    pub fixed_left: f32,
    pub fixed_top: f32,
}

/// Load state of a lazy placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// Outcome of expanding a visible node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// Nothing to load.
    Settled,
    /// A load was requested by this expansion.
    Started,
    /// A load requested earlier is still running.
    InFlight,
}

impl Expansion {
    #[inline]
    pub fn is_pending(self) -> bool {
        !matches!(self, Expansion::Settled)
    }
}

/// Per-container packing state rebuilt on every repack.
#[derive(Debug)]
pub struct Container {
    pub(crate) policy: Policy,
    pub(crate) index: PaginatedIndex<NodeId>,
    pub(crate) sticky_index: PaginatedIndex<NodeId>,
    pub(crate) visible_sticky: SmallVec<[NodeId; 4]>,
}

impl Container {
    pub(crate) fn new(policy: Policy, page_size: f32) -> Self {
        Self {
            policy,
            index: PaginatedIndex::new(page_size),
            sticky_index: PaginatedIndex::new(page_size),
            visible_sticky: SmallVec::new(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sticky children found by the last collection, in layout order.
    pub fn visible_sticky(&self) -> &[NodeId] {
        &self.visible_sticky
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(axis) = self.policy.index_axis() {
            let delta = axis.pick(dx, dy);
            self.index.translate(delta);
            self.sticky_index.translate(delta);
        }
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Item,
    Sticky(StickyState),
    Placeholder(LoadState),
    Container(Box<Container>),
}

/// One positioned unit of the layout tree.
#[derive(Debug)]
pub struct LayoutNode<D> {
    pub(crate) rect: Rect,
    pub(crate) data: D,
    pub(crate) kind: NodeKind,
    pub(crate) sizing: Sizing,
    pub(crate) aspect_ratio: f32,
    pub(crate) view_type: Option<ViewType>,
    pub(crate) needs_layout: bool,
    pub(crate) child_needs_layout: bool,
    /// Constraints of the last completed layout, `None` before the first.
    pub(crate) constraints: Option<Size>,
    pub(crate) is_bookmark: bool,
}

impl<D> LayoutNode<D> {
    pub(crate) fn new(data: D, kind: NodeKind) -> Self {
        Self {
            rect: Rect::default(),
            data,
            kind,
            sizing: Sizing::fill(),
            aspect_ratio: 1.0,
            view_type: None,
            needs_layout: true,
            child_needs_layout: false,
            constraints: None,
            is_bookmark: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.rect.left
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect.top
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.rect.height
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.rect.bottom()
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn view_type(&self) -> Option<ViewType> {
        self.view_type
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn child_needs_layout(&self) -> bool {
        self.child_needs_layout
    }

    /// True once the node has completed a layout.
    pub fn is_laid_out(&self) -> bool {
        self.constraints.is_some()
    }

    pub fn is_bookmark(&self) -> bool {
        self.is_bookmark
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container(_))
    }

    pub fn is_sticky(&self) -> bool {
        matches!(self.kind, NodeKind::Sticky(_))
    }

    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub(crate) fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            NodeKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn sticky_state(&self) -> Option<StickyState> {
        match self.kind {
            NodeKind::Sticky(state) => Some(state),
            _ => None,
        }
    }

    pub fn load_state(&self) -> Option<LoadState> {
        match self.kind {
            NodeKind::Placeholder(state) => Some(state),
            _ => None,
        }
    }

    /// Whether a sticky header is currently pinned to the viewport.
    pub fn fixed(&self) -> bool {
        self.sticky_state().is_some_and(|state| state.fixed)
    }

    /// Where the node should be drawn: the pinned position for fixed stickies,
    /// the laid out position otherwise.
    pub fn display_origin(&self) -> Point {
        match self.sticky_state() {
            Some(state) if state.fixed => Point::new(state.fixed_left, state.fixed_top),
            _ => self.rect.origin(),
        }
    }

    /// Whether the given constraints force a repack of this node.
    pub(crate) fn requires_layout(&self, width: f32, height: f32) -> bool {
        if self.needs_layout || self.child_needs_layout {
            return true;
        }
        let Some(last) = self.constraints else {
            return true;
        };
        match &self.kind {
            NodeKind::Container(container) => match container.policy.cross_axis() {
                Some(Axis::Horizontal) => last.width != width,
                Some(Axis::Vertical) => last.height != height,
                None => last.width != width || last.height != height,
            },
            _ => last.width != width || last.height != height,
        }
    }
}
