//! Synchronization core for a two-track slider: an image carousel and a
//! content carousel that always show the same slide.
//!
//! - [`SlideIndexAuthority`] owns the active slide and drives both
//!   [`TrackAdapter`]s, suppressing the engines' echoes of its own moves.
//! - [`PlaybackController`] runs autoplay with play / pause / stop and the
//!   passive holds (hover, focus, offscreen).
//! - [`Announcer`] reports slide and playback changes through a shared
//!   [`LiveRegion`].
//! - [`LayoutReconciler`] keeps a spacer under overflowing decorations.
//! - [`Slider`] mounts all of the above around two [`Engine`]s.
//!
//! The core is single-threaded and never reads a clock; the host pumps it
//! with `update(now_ms)` from its frame loop.

pub mod announcer;
pub mod aria;
pub mod authority;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod layout;
pub mod listeners;
pub mod playback;
pub mod slider;
pub mod strip;
pub mod timer;
pub mod track;

pub use announcer::{Announcer, LiveRegion, LiveRegionSink, MemorySink, Priority, SharedLiveRegion};
pub use authority::{ChangeOrigin, SlideChange, SlideIndexAuthority};
pub use config::{Environment, SliderConfig};
pub use engine::{BoxedEngine, Direction, Engine, EngineEvent};
pub use error::{ConfigError, SliderError};
pub use layout::{LayoutProbe, LayoutReconciler, Rect};
pub use playback::{PauseSource, PlaybackController, PlaybackState};
pub use slider::{ControlsState, Key, Slider};
pub use strip::StripEngine;
pub use track::{Track, TrackAdapter, TrackFrame, TrackState};
