//! Autoplay state machine.
//!
//! The effective [`PlaybackState`] is derived from two things kept apart: the
//! user's explicit intent (play, pause, stop) and the set of passive sources
//! currently holding playback (pointer hover, keyboard focus, offscreen).
//! Passive sources can only ever hold a Playing intent; they cannot leave
//! Stopped, and playback resumes only once every one of them has cleared.

use std::collections::HashSet;

use tracing::debug;

use crate::config::SliderConfig;
use crate::timer::Debouncer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseSource {
    Hover,
    Focus,
    Offscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Play,
    Pause,
    Stop,
}

/// Result of one [`PlaybackController::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackTick {
    /// The autoplay delay elapsed; the slider should move on.
    pub advance: bool,
    pub changed: Option<PlaybackState>,
}

pub struct PlaybackController {
    intent: Intent,
    passive: HashSet<PauseSource>,
    reduced_motion: bool,

    delay_ms: u64,
    remaining_ms: u64,
    last_update_ms: Option<u64>,

    visibility: Debouncer,
    pending_visible: Option<bool>,

    pause_on_hover: bool,
    pause_on_focus: bool,
    pause_when_offscreen: bool,
    destroyed: bool,
}

impl PlaybackController {
    /// Starts Stopped; autoplay begins with [`Self::start_autoplay`].
    pub fn new(config: &SliderConfig, reduced_motion: bool) -> Self {
        Self {
            intent: Intent::Stop,
            passive: HashSet::new(),
            reduced_motion,
            delay_ms: config.autoplay_delay_ms,
            remaining_ms: config.autoplay_delay_ms,
            last_update_ms: None,
            visibility: Debouncer::new(config.visibility_debounce_ms),
            pending_visible: None,
            pause_on_hover: config.pause_on_hover,
            pause_on_focus: config.pause_on_focus,
            pause_when_offscreen: config.pause_when_offscreen,
            destroyed: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self.intent {
            _ if self.destroyed => PlaybackState::Stopped,
            Intent::Stop => PlaybackState::Stopped,
            Intent::Pause => PlaybackState::Paused,
            Intent::Play if self.passive.is_empty() => PlaybackState::Playing,
            Intent::Play => PlaybackState::Paused,
        }
    }

    pub fn is_held_by(&self, source: PauseSource) -> bool {
        self.passive.contains(&source)
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Run `f` and report the effective state if it changed.
    fn transition(&mut self, f: impl FnOnce(&mut Self)) -> Option<PlaybackState> {
        if self.destroyed {
            return None;
        }
        let before = self.state();
        f(self);
        let after = self.state();
        (before != after).then(|| {
            debug!(?before, ?after, "playback state changed");
            after
        })
    }

    /// Configured autoplay. Ignored under reduced motion.
    pub fn start_autoplay(&mut self) -> Option<PlaybackState> {
        if self.reduced_motion {
            debug!("reduced motion: autoplay suppressed");
            return None;
        }
        self.transition(|p| {
            if p.intent == Intent::Stop {
                p.intent = Intent::Play;
                p.remaining_ms = p.delay_ms;
            }
        })
    }

    /// Explicit play from a visible control. Also honoured under reduced
    /// motion, and it overrides hover and focus holds already in effect.
    pub fn play(&mut self) -> Option<PlaybackState> {
        self.transition(|p| {
            if p.intent == Intent::Stop {
                p.remaining_ms = p.delay_ms;
            }
            p.intent = Intent::Play;
            p.passive.remove(&PauseSource::Hover);
            p.passive.remove(&PauseSource::Focus);
        })
    }

    pub fn resume(&mut self) -> Option<PlaybackState> {
        self.play()
    }

    /// Explicit pause. Pausing a stopped slideshow leaves it stopped.
    pub fn pause(&mut self) -> Option<PlaybackState> {
        self.transition(|p| {
            if p.intent != Intent::Stop {
                p.intent = Intent::Pause;
            }
        })
    }

    pub fn stop(&mut self) -> Option<PlaybackState> {
        self.transition(|p| {
            p.intent = Intent::Stop;
            p.remaining_ms = p.delay_ms;
        })
    }

    /// The play/pause button and the space key.
    pub fn toggle(&mut self) -> Option<PlaybackState> {
        match self.intent {
            Intent::Play => self.pause(),
            Intent::Pause | Intent::Stop => self.play(),
        }
    }

    fn hold(&mut self, source: PauseSource, held: bool) -> Option<PlaybackState> {
        let enabled = match source {
            PauseSource::Hover => self.pause_on_hover,
            PauseSource::Focus => self.pause_on_focus,
            PauseSource::Offscreen => self.pause_when_offscreen,
        };
        if !enabled {
            return None;
        }
        self.transition(|p| {
            if held {
                p.passive.insert(source);
            } else {
                p.passive.remove(&source);
            }
        })
    }

    pub fn pointer_enter(&mut self) -> Option<PlaybackState> {
        self.hold(PauseSource::Hover, true)
    }

    pub fn pointer_leave(&mut self) -> Option<PlaybackState> {
        self.hold(PauseSource::Hover, false)
    }

    pub fn focus_in(&mut self) -> Option<PlaybackState> {
        self.hold(PauseSource::Focus, true)
    }

    pub fn focus_out(&mut self) -> Option<PlaybackState> {
        self.hold(PauseSource::Focus, false)
    }

    /// Viewport intersection changed. Applied by [`Self::update`] once the
    /// signal has been quiet for the debounce window.
    pub fn visibility_change(&mut self, visible: bool, now_ms: u64) {
        if self.destroyed || !self.pause_when_offscreen {
            return;
        }
        self.pending_visible = Some(visible);
        self.visibility.trigger(now_ms);
    }

    /// Restart the autoplay countdown for the newly active slide.
    pub fn notify_slide_changed(&mut self) {
        self.remaining_ms = self.delay_ms;
    }

    pub fn update(&mut self, now_ms: u64) -> PlaybackTick {
        let mut tick = PlaybackTick::default();
        if self.destroyed {
            return tick;
        }
        let dt = self
            .last_update_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_update_ms = Some(now_ms);

        if self.visibility.fire(now_ms) {
            if let Some(visible) = self.pending_visible.take() {
                tick.changed = self.hold(PauseSource::Offscreen, !visible);
            }
        }

        if self.state() == PlaybackState::Playing {
            self.remaining_ms = self.remaining_ms.saturating_sub(dt);
            if self.remaining_ms == 0 {
                tick.advance = true;
                self.remaining_ms = self.delay_ms;
            }
        }
        tick
    }

    /// Stop for good: later inputs and updates are no-ops.
    pub fn destroy(&mut self) {
        self.intent = Intent::Stop;
        self.passive.clear();
        self.visibility.cancel();
        self.pending_visible = None;
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> PlaybackController {
        let mut p = PlaybackController::new(&SliderConfig::default(), false);
        assert_eq!(p.start_autoplay(), Some(PlaybackState::Playing));
        p
    }

    #[test]
    fn test_starts_stopped() {
        let p = PlaybackController::new(&SliderConfig::default(), false);
        assert_eq!(p.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_explicit_transitions() {
        let mut p = playing();
        assert_eq!(p.pause(), Some(PlaybackState::Paused));
        assert_eq!(p.resume(), Some(PlaybackState::Playing));
        assert_eq!(p.stop(), Some(PlaybackState::Stopped));
        assert_eq!(p.pause(), None);
        assert_eq!(p.state(), PlaybackState::Stopped);
        assert_eq!(p.play(), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_stop_is_sticky() {
        let mut p = playing();
        p.stop();
        p.pointer_enter();
        p.pointer_leave();
        p.focus_in();
        p.focus_out();
        p.visibility_change(false, 0);
        p.update(1_000);
        p.visibility_change(true, 1_000);
        p.update(2_000);
        assert_eq!(p.state(), PlaybackState::Stopped);
        assert_eq!(p.play(), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_overlapping_passive_holds() {
        let mut p = playing();
        assert_eq!(p.pointer_enter(), Some(PlaybackState::Paused));
        assert_eq!(p.focus_in(), None);
        assert_eq!(p.pointer_leave(), None);
        assert_eq!(p.state(), PlaybackState::Paused);
        assert_eq!(p.focus_out(), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_manual_pause_survives_passive_release() {
        let mut p = playing();
        p.pointer_enter();
        p.pause();
        p.pointer_leave();
        assert_eq!(p.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_disabled_source_is_ignored() {
        let config = SliderConfig {
            pause_on_hover: false,
            ..SliderConfig::default()
        };
        let mut p = PlaybackController::new(&config, false);
        p.start_autoplay();
        assert_eq!(p.pointer_enter(), None);
        assert_eq!(p.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_offscreen_is_debounced() {
        let mut p = playing();
        p.update(0);
        p.visibility_change(false, 0);
        p.visibility_change(true, 100);
        p.visibility_change(false, 150);
        assert_eq!(p.update(300).changed, None);
        assert_eq!(p.state(), PlaybackState::Playing);
        assert_eq!(p.update(350).changed, Some(PlaybackState::Paused));
        assert!(p.is_held_by(PauseSource::Offscreen));

        p.visibility_change(true, 400);
        assert_eq!(p.update(600).changed, Some(PlaybackState::Playing));
    }

    #[test]
    fn test_autoplay_countdown() {
        let mut p = playing();
        p.update(0);
        assert!(!p.update(4_999).advance);
        assert!(p.update(5_000).advance);
        assert_eq!(p.remaining_ms(), 5_000);
    }

    #[test]
    fn test_countdown_holds_while_paused() {
        let mut p = playing();
        p.update(0);
        p.update(3_000);
        p.pointer_enter();
        assert!(!p.update(10_000).advance);
        p.pointer_leave();
        assert!(!p.update(11_000).advance);
        assert!(p.update(12_000).advance);
    }

    #[test]
    fn test_slide_change_restarts_countdown() {
        let mut p = playing();
        p.update(0);
        p.update(4_000);
        p.notify_slide_changed();
        assert!(!p.update(8_000).advance);
        assert!(p.update(9_000).advance);
    }

    #[test]
    fn test_reduced_motion() {
        let mut p = PlaybackController::new(&SliderConfig::default(), true);
        assert_eq!(p.start_autoplay(), None);
        assert_eq!(p.state(), PlaybackState::Stopped);
        assert_eq!(p.play(), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_explicit_play_overrides_hover() {
        let mut p = playing();
        p.pointer_enter();
        p.stop();
        assert_eq!(p.play(), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_toggle() {
        let mut p = playing();
        assert_eq!(p.toggle(), Some(PlaybackState::Paused));
        assert_eq!(p.toggle(), Some(PlaybackState::Playing));
        p.stop();
        assert_eq!(p.toggle(), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_destroy_cancels_pending_visibility() {
        let mut p = playing();
        p.update(0);
        p.visibility_change(false, 0);
        p.destroy();
        let tick = p.update(1_000);
        assert_eq!(tick, PlaybackTick::default());
        assert_eq!(p.state(), PlaybackState::Stopped);
        assert_eq!(p.play(), None);
    }
}
