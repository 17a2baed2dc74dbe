//! One mounted image + content slider.
//!
//! [`Slider::mount`] wires the pieces together and hands back the instance
//! handle; the host keeps it and forwards input and frame time to it. There
//! is no page-wide registry: two sliders on a page are two handles sharing
//! one [`SharedLiveRegion`].

use tracing::{debug, info, warn};

use crate::announcer::{Announcer, SharedLiveRegion};
use crate::aria::{self, Control, SlideAria};
use crate::authority::{ChangeOrigin, SlideChange, SlideIndexAuthority};
use crate::config::{Environment, SliderConfig};
use crate::engine::{BoxedEngine, Direction};
use crate::error::Result;
use crate::layout::{LayoutProbe, LayoutReconciler};
use crate::listeners::ListenerId;
use crate::playback::{PlaybackController, PlaybackState};
use crate::track::{Track, TrackAdapter, TrackState};

/// Keys the slider reacts to while it has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Home,
    End,
    Space,
}

/// What the host should render for the slider's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsState {
    pub navigation_enabled: bool,
    pub playback_visible: bool,
    pub previous_label: &'static str,
    pub next_label: &'static str,
    pub play_pause_label: &'static str,
    pub stop_label: &'static str,
    pub live_mode: &'static str,
}

pub struct Slider {
    config: SliderConfig,
    authority: SlideIndexAuthority,
    playback: PlaybackController,
    announcer: Announcer,
    layout: LayoutReconciler,
    region: SharedLiveRegion,

    labels: Vec<String>,
    entrance: Option<Box<dyn FnMut(usize)>>,
    last_update_ms: Option<u64>,
    now_ms: u64,
    destroyed: bool,
}

impl Slider {
    /// Mount a slider. Nothing here fails: an invalid config falls back to
    /// defaults and a failed engine to a static slide, both with a warning.
    pub fn mount(
        config: SliderConfig,
        environment: Environment,
        image: Result<BoxedEngine>,
        content: Result<BoxedEngine>,
        labels: Vec<String>,
        region: &SharedLiveRegion,
        probe: Box<dyn LayoutProbe>,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "invalid slider configuration; using defaults");
                SliderConfig::default()
            }
        };
        let reduced_motion = config.reduced_motion(&environment);
        let transition_ms = if reduced_motion {
            0
        } else {
            config.transition_duration_ms
        };

        let authority = SlideIndexAuthority::new(
            TrackAdapter::new(Track::Image, image, transition_ms),
            TrackAdapter::new(Track::Content, content, transition_ms),
            transition_ms,
            config.loop_enabled,
        );
        let mut playback = PlaybackController::new(&config, reduced_motion);
        if config.autoplay && authority.navigable() {
            playback.start_autoplay();
        }
        let announcer = Announcer::with_clear_after(region, config.announce_clear_ms);
        let mut layout = LayoutReconciler::new(
            probe,
            config.layout_settle_ms,
            config.layout_max_passes,
            config.resize_debounce_ms,
        );
        layout.set_active(authority.current());
        layout.reconcile();

        info!(
            instance = ?announcer.instance(),
            slides = authority.slide_count(),
            loop_enabled = authority.loop_enabled(),
            reduced_motion,
            playback = ?playback.state(),
            "slider mounted"
        );

        Self {
            config,
            authority,
            playback,
            announcer,
            layout,
            region: region.clone(),
            labels,
            entrance: None,
            last_update_ms: None,
            now_ms: 0,
            destroyed: false,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.authority.current()
    }

    pub fn slide_count(&self) -> usize {
        self.authority.slide_count()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn track(&self, track: Track) -> &TrackAdapter {
        self.authority.track(track)
    }

    pub fn track_state(&self, track: Track) -> TrackState {
        self.authority.track(track).state()
    }

    pub fn spacer_height(&self) -> f32 {
        self.layout.spacer_height()
    }

    pub fn layout(&self) -> &LayoutReconciler {
        &self.layout
    }

    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map_or("", String::as_str)
    }

    pub fn on_change(&mut self, listener: Box<dyn FnMut(&SlideChange)>) -> ListenerId {
        self.authority.on_change(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.authority.remove_listener(id)
    }

    /// Hook for entrance animations; called with each newly active slide.
    pub fn set_entrance_animator(&mut self, animator: Box<dyn FnMut(usize)>) {
        self.entrance = Some(animator);
    }

    pub fn controls(&self) -> ControlsState {
        let navigation_enabled = self.navigation_enabled();
        let state = self.playback.state();
        ControlsState {
            navigation_enabled,
            playback_visible: navigation_enabled && self.config.autoplay,
            previous_label: aria::control_label(Control::Previous, state),
            next_label: aria::control_label(Control::Next, state),
            play_pause_label: aria::control_label(Control::PlayPause, state),
            stop_label: aria::control_label(Control::Stop, state),
            live_mode: aria::live_mode(state),
        }
    }

    fn navigation_enabled(&self) -> bool {
        !self.destroyed
            && self.authority.navigable()
            && self.authority.slide_count() >= self.config.min_slides_for_controls
    }

    pub fn slide_aria(&self, index: usize) -> SlideAria {
        aria::slide_aria(index, self.authority.slide_count(), self.authority.current())
    }

    // --- Navigation ---

    pub fn next(&mut self) -> Option<SlideChange> {
        self.advance(1)
    }

    pub fn prev(&mut self) -> Option<SlideChange> {
        self.advance(-1)
    }

    pub fn advance(&mut self, delta: isize) -> Option<SlideChange> {
        if self.destroyed {
            return None;
        }
        let change = self.authority.advance(delta)?;
        self.after_change(&change);
        Some(change)
    }

    pub fn go_to(&mut self, index: isize) -> Option<SlideChange> {
        if self.destroyed {
            return None;
        }
        let change = self.authority.go_to(index)?;
        self.after_change(&change);
        Some(change)
    }

    /// A gesture on one track's engine. The authority adopts the move on the
    /// next [`Self::update`].
    pub fn swipe_track(&mut self, track: Track, direction: Direction) {
        if self.destroyed {
            return;
        }
        let adapter = self.authority.track_mut(track);
        match direction {
            Direction::Forward => adapter.next(),
            Direction::Backward => adapter.prev(),
        }
    }

    /// Keyboard handling while the slider has focus. Returns whether the key
    /// was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.navigation_enabled() {
            return false;
        }
        match key {
            Key::Left => {
                self.prev();
            }
            Key::Right => {
                self.next();
            }
            Key::Home => {
                self.go_to(0);
            }
            Key::End => {
                self.go_to(self.authority.slide_count() as isize - 1);
            }
            Key::Space => {
                if !self.config.autoplay {
                    return false;
                }
                self.toggle();
            }
        }
        true
    }

    fn after_change(&mut self, change: &SlideChange) {
        self.playback.notify_slide_changed();
        self.layout.set_active(Some(change.index));
        self.layout.request(self.now_ms);
        if let Some(animator) = self.entrance.as_mut() {
            animator(change.index);
        }

        let announce = change.origin != ChangeOrigin::Autoplay || self.config.announce_autoplay;
        if announce && self.authority.slide_count() > 1 {
            let total = self.authority.slide_count();
            let label = self.labels.get(change.index).map_or("", String::as_str);
            self.announcer.announce(change.index, total, label);
        }
    }

    // --- Playback ---

    pub fn play(&mut self) -> Option<PlaybackState> {
        let changed = self.playback.play();
        self.announce_playback(changed)
    }

    pub fn pause(&mut self) -> Option<PlaybackState> {
        let changed = self.playback.pause();
        self.announce_playback(changed)
    }

    pub fn resume(&mut self) -> Option<PlaybackState> {
        let changed = self.playback.resume();
        self.announce_playback(changed)
    }

    pub fn stop(&mut self) -> Option<PlaybackState> {
        let changed = self.playback.stop();
        self.announce_playback(changed)
    }

    pub fn toggle(&mut self) -> Option<PlaybackState> {
        let changed = self.playback.toggle();
        self.announce_playback(changed)
    }

    fn announce_playback(&mut self, changed: Option<PlaybackState>) -> Option<PlaybackState> {
        if !self.authority.navigable() {
            return changed;
        }
        if let Some(state) = changed {
            self.announcer.announce_playback_state(state);
        }
        changed
    }

    /// Report a host-side failure (slides that failed to load...) to
    /// assistive technology.
    pub fn announce_error(&mut self, message: &str) {
        if !self.destroyed {
            self.announcer.announce_error(message);
        }
    }

    // Passive signals change playback silently.

    pub fn pointer_enter(&mut self) {
        self.playback.pointer_enter();
    }

    pub fn pointer_leave(&mut self) {
        self.playback.pointer_leave();
    }

    pub fn focus_in(&mut self) {
        self.playback.focus_in();
    }

    pub fn focus_out(&mut self) {
        self.playback.focus_out();
    }

    pub fn visibility_change(&mut self, visible: bool, now_ms: u64) {
        self.playback.visibility_change(visible, now_ms);
    }

    // --- Layout ---

    pub fn resize(&mut self, now_ms: u64) {
        self.layout.notify_resize(now_ms);
    }

    pub fn content_mutated(&mut self, now_ms: u64) {
        self.layout.notify_content_mutation(now_ms);
    }

    pub fn reconcile(&mut self) -> f32 {
        self.layout.reconcile()
    }

    /// Pump the instance: engines, gestures, autoplay, layout timers and the
    /// shared live region. `now_ms` must not go backwards.
    pub fn update(&mut self, now_ms: u64) {
        if self.destroyed {
            return;
        }
        let dt = self
            .last_update_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_update_ms = Some(now_ms);
        self.now_ms = now_ms;

        for change in self.authority.process(dt) {
            self.after_change(&change);
        }

        let tick = self.playback.update(now_ms);
        if tick.advance {
            self.autoplay_step();
        }

        self.layout.update(now_ms);
        self.region.borrow_mut().update(now_ms);
    }

    fn autoplay_step(&mut self) {
        let (Some(current), count) = (self.authority.current(), self.authority.slide_count()) else {
            return;
        };
        let at_end = current + 1 >= count;
        let change = if at_end && !self.authority.loop_enabled() {
            if !self.config.rewind {
                debug!("autoplay reached the last slide; stopping");
                self.playback.stop();
                return;
            }
            self.authority.go_to_from(0, ChangeOrigin::Autoplay)
        } else {
            self.authority.advance_from(1, ChangeOrigin::Autoplay)
        };
        if let Some(change) = change {
            self.after_change(&change);
        }
    }

    /// Stop playback, detach listeners, release engines and cancel every
    /// pending timer. Later calls on the handle are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.playback.destroy();
        self.authority.destroy();
        self.announcer.destroy();
        self.layout.destroy();
        self.entrance = None;
        info!(instance = ?self.announcer.instance(), "slider destroyed");
    }
}
