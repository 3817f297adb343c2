//! Viewport and line-number gutter for tabpad.
//!
//! The vertical scroll position is one integer line offset shared by the
//! text view and the gutter. Every scroll source (content view, gutter
//! scrollbar, mouse wheel or trackpad) resolves to that offset, so both
//! views always agree. The gutter itself is derived on demand and never
//! stored.

mod gutter;
mod viewport;

pub use gutter::LineNumberGutter;
pub use viewport::{ScrollRequest, Viewport, WHEEL_DELTA_PER_NOTCH};
