pub const AUTOPLAY_DELAY_MS: u64 = 5_000;       // Time each slide stays before autoplay advances
pub const TRANSITION_DURATION_MS: u64 = 600;    // Duration of the driving track's slide animation
pub const MIN_SLIDES_FOR_CONTROLS: usize = 2;   // Fewer slides than this hide the controls

pub const VISIBILITY_DEBOUNCE_MS: u64 = 200;    // Offscreen detection settle window
pub const RESIZE_DEBOUNCE_MS: u64 = 150;        // Resize settle window before re-measuring layout
pub const ANNOUNCE_WRITE_DELAY_MS: u64 = 16;    // Gap between clearing and writing (one frame)
pub const ANNOUNCE_CLEAR_MS: u64 = 1_000;       // Live region is cleared this long after a write

pub const LAYOUT_SETTLE_MS: u64 = 120;          // Spacing between settle re-measurements
pub const LAYOUT_MAX_PASSES: u32 = 3;           // Settle re-measurements per change
