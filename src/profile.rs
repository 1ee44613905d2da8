//! Profile resolution: loading, inheritance chains, overlays.

mod inheritance;
mod loader;
mod overlay;

pub use loader::{ProfileDocument, ProfileLoader};
pub use overlay::merge_overlay_stack;
