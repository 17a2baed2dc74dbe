//! Slider configuration.
//!
//! The host hands a [`SliderConfig`] to [`crate::Slider::mount`]; the core only
//! consumes it. Every field has a default from [`crate::constants`], so a TOML
//! file only needs to name the values it changes:
//!
//! ```toml
//! autoplay_delay_ms = 4000
//! loop_enabled = false
//! reduced_motion_override = true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{ConfigError, Result, SliderError};

/// Smallest and largest accepted debounce / delay window.
const WINDOW_MIN_MS: u64 = 1;
const WINDOW_MAX_MS: u64 = 5_000;
const LAYOUT_PASSES_MAX: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliderConfig {
    /// Start playing automatically after mount.
    pub autoplay: bool,
    /// Time a slide stays active before autoplay advances.
    pub autoplay_delay_ms: u64,
    /// Wrap around at both ends instead of clamping.
    pub loop_enabled: bool,
    /// Animation length on the driving track.
    pub transition_duration_ms: u64,
    /// Overrides the environment's reduced-motion preference when set.
    pub reduced_motion_override: Option<bool>,
    /// Navigation and playback controls are hidden below this many slides.
    pub min_slides_for_controls: usize,

    pub pause_on_hover: bool,
    pub pause_on_focus: bool,
    pub pause_when_offscreen: bool,
    /// Announce slide changes caused by autoplay, not only by the user.
    pub announce_autoplay: bool,
    /// With loop disabled, autoplay returns to the first slide after the last.
    pub rewind: bool,

    pub visibility_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    pub announce_clear_ms: u64,
    pub layout_settle_ms: u64,
    pub layout_max_passes: u32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            autoplay_delay_ms: AUTOPLAY_DELAY_MS,
            loop_enabled: true,
            transition_duration_ms: TRANSITION_DURATION_MS,
            reduced_motion_override: None,
            min_slides_for_controls: MIN_SLIDES_FOR_CONTROLS,
            pause_on_hover: true,
            pause_on_focus: true,
            pause_when_offscreen: true,
            announce_autoplay: false,
            rewind: true,
            visibility_debounce_ms: VISIBILITY_DEBOUNCE_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            announce_clear_ms: ANNOUNCE_CLEAR_MS,
            layout_settle_ms: LAYOUT_SETTLE_MS,
            layout_max_passes: LAYOUT_MAX_PASSES,
        }
    }
}

impl SliderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SliderConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| SliderError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.autoplay_delay_ms == 0 {
            return Err(ConfigError::ZeroAutoplayDelay);
        }
        if self.min_slides_for_controls == 0 {
            return Err(ConfigError::ZeroMinSlides);
        }
        for (field, value) in [
            ("visibility_debounce_ms", self.visibility_debounce_ms),
            ("resize_debounce_ms", self.resize_debounce_ms),
            ("announce_clear_ms", self.announce_clear_ms),
            ("layout_settle_ms", self.layout_settle_ms),
        ] {
            if !(WINDOW_MIN_MS..=WINDOW_MAX_MS).contains(&value) {
                return Err(ConfigError::WindowOutOfRange {
                    field,
                    value,
                    min: WINDOW_MIN_MS,
                    max: WINDOW_MAX_MS,
                });
            }
        }
        if self.layout_max_passes == 0 || self.layout_max_passes > LAYOUT_PASSES_MAX {
            return Err(ConfigError::LayoutPassesOutOfRange {
                value: self.layout_max_passes,
                max: LAYOUT_PASSES_MAX,
            });
        }
        Ok(())
    }

    /// Whether motion is reduced once the override is applied to the
    /// environment preference.
    pub fn reduced_motion(&self, environment: &Environment) -> bool {
        self.reduced_motion_override
            .unwrap_or(environment.prefers_reduced_motion)
    }
}

/// What the host knows about the page the slider lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub prefers_reduced_motion: bool,
}
