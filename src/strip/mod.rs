//! In-memory carousel engine: a horizontal strip of slides with optional
//! loop clones on both sides. Used by the viewer and by the tests.

mod engine;
mod state;
mod tween;

pub use engine::StripEngine;
pub use state::StripState;
