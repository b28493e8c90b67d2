//! Window controller, scroll surface and view recycling for vscroll

mod recycler;
mod scroll;
mod window;

pub use recycler::*;
pub use scroll::*;
pub use window::*;

pub use vscroll_layout;

pub mod prelude {
    pub use crate::recycler::{Recycler, RecyclerStats};
    pub use crate::scroll::{ScrollState, ScrollSurface};
    pub use crate::window::{
        Bookmark, ItemPlacement, PassOutcome, PassReport, PreloadStrategy, WindowConfig,
        WindowController,
    };
    pub use vscroll_layout::prelude::*;
}
