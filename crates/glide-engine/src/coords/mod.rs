//! Coordinate and geometry types shared by the scroll, visibility and scene layers.
//!
//! Two spaces are in play:
//! - page space: logical pixels, origin top-left, +Y down (layout, scroll, visibility)
//! - world space: scene units seen by the perspective camera (+Y up)
//!
//! `metrics` is the single place where one is converted into the other.

pub mod metrics;
mod rect;
mod vec2;
mod viewport;

pub use metrics::{ViewportFrame, VisibleExtent};
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
