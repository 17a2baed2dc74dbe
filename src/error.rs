use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a slider or one of its tracks.
///
/// None of these reach the host page at runtime: the slider logs them and
/// falls back to a static display.
#[derive(Debug, Error)]
pub enum SliderError {
    /// The carousel engine for a track could not be constructed
    #[error("Carousel engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The track has no slides to show
    #[error("Slide collection is empty")]
    EmptyCollection,

    /// Image and content tracks were mounted with different slide counts
    #[error("Track length mismatch: image track has {image} slides, content track has {content}")]
    TrackLengthMismatch { image: usize, content: usize },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Configuration file could not be read
    #[error("Failed to read configuration {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for a slider config
    #[error("Failed to parse configuration")]
    ConfigParse(#[from] toml::de::Error),
}

/// Validation failures for [`crate::config::SliderConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("autoplay_delay_ms must be greater than zero")]
    ZeroAutoplayDelay,

    #[error("min_slides_for_controls must be at least 1")]
    ZeroMinSlides,

    #[error("{field} must be between {min} and {max} ms, got {value}")]
    WindowOutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("layout_max_passes must be between 1 and {max}, got {value}")]
    LayoutPassesOutOfRange { value: u32, max: u32 },
}

pub type Result<T> = std::result::Result<T, SliderError>;
