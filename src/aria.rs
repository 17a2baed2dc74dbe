//! Labels and attributes the host applies for assistive technology.

use crate::playback::PlaybackState;

/// Attributes for one slide element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideAria {
    pub role: &'static str,
    pub role_description: &'static str,
    /// "2 / 5"
    pub label: String,
    /// Inactive slides are hidden from the accessibility tree.
    pub hidden: bool,
}

pub fn slide_aria(index: usize, total: usize, active: Option<usize>) -> SlideAria {
    SlideAria {
        role: "group",
        role_description: "slide",
        label: format!("{} / {}", index + 1, total),
        hidden: active != Some(index),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous,
    Next,
    PlayPause,
    Stop,
}

pub fn control_label(control: Control, state: PlaybackState) -> &'static str {
    match control {
        Control::Previous => "Previous slide",
        Control::Next => "Next slide",
        Control::PlayPause if state == PlaybackState::Playing => "Pause slideshow",
        Control::PlayPause => "Play slideshow",
        Control::Stop => "Stop slideshow",
    }
}

/// `aria-live` for the slide container: quiet while autoplay is running so
/// screen readers are not interrupted every few seconds.
pub fn live_mode(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "off",
        PlaybackState::Paused | PlaybackState::Stopped => "polite",
    }
}

pub fn slide_status(index: usize, total: usize, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        format!("Slide {} of {}", index + 1, total)
    } else {
        format!("Slide {} of {}: {}", index + 1, total, label)
    }
}

pub fn playback_status(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "Slideshow playing",
        PlaybackState::Paused => "Slideshow paused",
        PlaybackState::Stopped => "Slideshow stopped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_aria() {
        let aria = slide_aria(1, 5, Some(1));
        assert_eq!(aria.label, "2 / 5");
        assert!(!aria.hidden);
        assert!(slide_aria(0, 5, Some(1)).hidden);
        assert!(slide_aria(0, 0, None).hidden);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(slide_status(0, 3, "Harbour at dusk"), "Slide 1 of 3: Harbour at dusk");
        assert_eq!(slide_status(2, 3, "  "), "Slide 3 of 3");
        assert_eq!(playback_status(PlaybackState::Paused), "Slideshow paused");
    }

    #[test]
    fn test_play_pause_label_follows_state() {
        assert_eq!(control_label(Control::PlayPause, PlaybackState::Playing), "Pause slideshow");
        assert_eq!(control_label(Control::PlayPause, PlaybackState::Stopped), "Play slideshow");
        assert_eq!(live_mode(PlaybackState::Playing), "off");
        assert_eq!(live_mode(PlaybackState::Stopped), "polite");
    }
}
