//! The single owner of "which slide is active".
//!
//! Both tracks are followers: every move is decided here, stamped with a
//! fresh [`ChangeToken`] and pushed to the two adapters in the same call.
//! When the engines later report those moves back, the token identifies them
//! as echoes and they are dropped, so listeners hear about each logical
//! change exactly once and the two tracks can never ping-pong.

use tracing::{debug, warn};

use crate::engine::Direction;
use crate::error::SliderError;
use crate::listeners::{ListenerId, Listeners};
use crate::track::{ChangeToken, Track, TrackAdapter, TrackChange};

/// What caused a logical change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// `advance`/`go_to` from host code, controls or keyboard
    Navigation,
    /// Autoplay tick
    Autoplay,
    /// A gesture on one of the engines
    Gesture(Track),
    /// An out-of-range report was clamped
    Resync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub index: usize,
    pub previous: Option<usize>,
    pub origin: ChangeOrigin,
    pub token: ChangeToken,
}

pub struct SlideIndexAuthority {
    image: TrackAdapter,
    content: TrackAdapter,

    slide_count: usize,
    current: Option<usize>,
    loop_enabled: bool,
    transition_ms: u64,

    token: ChangeToken,
    listeners: Listeners<SlideChange>,
    destroyed: bool,
}

impl SlideIndexAuthority {
    /// `loop_enabled` is the configured wish; the slider only wraps when
    /// at least one engine can loop as well.
    pub fn new(
        mut image: TrackAdapter,
        mut content: TrackAdapter,
        transition_ms: u64,
        loop_enabled: bool,
    ) -> Self {
        let (image_count, content_count) = (image.slide_count(), content.slide_count());
        if image_count != content_count && !image.is_static() && !content.is_static() {
            let mismatch = SliderError::TrackLengthMismatch {
                image: image_count,
                content: content_count,
            };
            warn!(error = %mismatch, "using the shorter track");
        }
        let slide_count = image_count.min(content_count);
        let loop_enabled =
            loop_enabled && slide_count > 1 && (image.loop_enabled() || content.loop_enabled());
        image.set_loop_enabled(loop_enabled);
        content.set_loop_enabled(loop_enabled);

        let mut authority = Self {
            image,
            content,
            slide_count,
            current: (slide_count > 0).then_some(0),
            loop_enabled,
            transition_ms,
            token: ChangeToken(0),
            listeners: Listeners::default(),
            destroyed: false,
        };
        if slide_count <= 1 {
            authority.image.set_navigation_enabled(false);
            authority.content.set_navigation_enabled(false);
        }
        debug!(slide_count, loop_enabled, "authority mounted");
        authority
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Navigation only makes sense with at least two slides.
    pub fn navigable(&self) -> bool {
        !self.destroyed && self.slide_count > 1
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn last_token(&self) -> ChangeToken {
        self.token
    }

    pub fn set_transition_ms(&mut self, transition_ms: u64) {
        self.transition_ms = transition_ms;
    }

    pub fn track(&self, track: Track) -> &TrackAdapter {
        match track {
            Track::Image => &self.image,
            Track::Content => &self.content,
        }
    }

    pub fn track_mut(&mut self, track: Track) -> &mut TrackAdapter {
        match track {
            Track::Image => &mut self.image,
            Track::Content => &mut self.content,
        }
    }

    pub fn on_change(&mut self, listener: Box<dyn FnMut(&SlideChange)>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn advance(&mut self, delta: isize) -> Option<SlideChange> {
        self.advance_from(delta, ChangeOrigin::Navigation)
    }

    pub fn advance_from(&mut self, delta: isize, origin: ChangeOrigin) -> Option<SlideChange> {
        if !self.navigable() || delta == 0 {
            return None;
        }
        let current = self.current? as isize;
        let target = self.fit(current + delta);
        self.commit(target, Direction::from_delta(delta), origin, Some(Track::Image))
    }

    pub fn go_to(&mut self, index: isize) -> Option<SlideChange> {
        self.go_to_from(index, ChangeOrigin::Navigation)
    }

    pub fn go_to_from(&mut self, index: isize, origin: ChangeOrigin) -> Option<SlideChange> {
        if !self.navigable() {
            return None;
        }
        let target = self.fit(index);
        self.commit(target, None, origin, Some(Track::Image))
    }

    /// Wrap in loop mode, clamp otherwise.
    fn fit(&self, index: isize) -> usize {
        let count = self.slide_count as isize;
        if self.loop_enabled {
            index.rem_euclid(count) as usize
        } else {
            index.clamp(0, count - 1) as usize
        }
    }

    /// Update the index and push it to both tracks in one go. The driver
    /// animates; the other track snaps. A `None` driver snaps both.
    fn commit(
        &mut self,
        target: usize,
        direction: Option<Direction>,
        origin: ChangeOrigin,
        driver: Option<Track>,
    ) -> Option<SlideChange> {
        if self.current == Some(target) {
            return None;
        }
        self.token = ChangeToken(self.token.0 + 1);
        let token = self.token;
        let previous = self.current.replace(target);

        let skip = match origin {
            ChangeOrigin::Gesture(track) => Some(track),
            _ => None,
        };
        for track in [Track::Image, Track::Content] {
            // The gesture's own track is already there unless something else
            // moved it in the same frame.
            if skip == Some(track) && self.track(track).logical_position() == Some(target) {
                continue;
            }
            let duration = if driver == Some(track) {
                self.transition_ms
            } else {
                0
            };
            self.track_mut(track).sync_to(target, duration, direction, token);
        }

        let change = SlideChange {
            index: target,
            previous,
            origin,
            token,
        };
        debug!(index = target, ?previous, ?origin, token = token.0, "slide changed");
        self.listeners.emit(&change);
        Some(change)
    }

    /// Advance both engines and fold their reports into the logical index.
    pub fn process(&mut self, dt_ms: u64) -> Vec<SlideChange> {
        let mut changes = Vec::new();
        if self.destroyed {
            return changes;
        }
        let mut reports = self.image.poll(dt_ms);
        reports.extend(self.content.poll(dt_ms));

        for report in reports {
            if let Some(change) = self.absorb(report) {
                changes.push(change);
            }
        }
        changes
    }

    fn absorb(&mut self, report: TrackChange) -> Option<SlideChange> {
        if let Some(token) = report.echo {
            if token <= self.token {
                debug!(track = ?report.track, token = token.0, "echo suppressed");
                return None;
            }
        }
        if self.slide_count == 0 {
            return None;
        }

        let last = self.slide_count as isize - 1;
        if report.reported < 0 || report.reported > last {
            let clamped = report.reported.clamp(0, last) as usize;
            warn!(
                track = ?report.track,
                reported = report.reported,
                clamped,
                "track reported an index outside the collection; resyncing"
            );
            let change = self.commit(clamped, None, ChangeOrigin::Resync, Some(Track::Image));
            self.resync(report.track);
            return change;
        }

        let reported = report.reported as usize;
        if self.current == Some(reported) {
            return None;
        }
        self.commit(reported, None, ChangeOrigin::Gesture(report.track), Some(report.track))
    }

    /// Snap one track back onto the current index.
    fn resync(&mut self, track: Track) {
        let Some(current) = self.current else {
            return;
        };
        self.token = ChangeToken(self.token.0 + 1);
        let token = self.token;
        self.track_mut(track).sync_to(current, 0, None, token);
    }

    /// Tear down both tracks and drop every listener. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.image.destroy();
        self.content.destroy();
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BoxedEngine;
    use crate::error::SliderError;
    use crate::strip::StripEngine;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn track(track: Track, count: usize, looped: bool) -> TrackAdapter {
        let engine: BoxedEngine = Box::new(StripEngine::new(count, looped).unwrap());
        TrackAdapter::new(track, Ok(engine), 300)
    }

    fn authority(count: usize, looped: bool) -> SlideIndexAuthority {
        SlideIndexAuthority::new(
            track(Track::Image, count, looped),
            track(Track::Content, count, looped),
            300,
            true,
        )
    }

    fn recorder(a: &mut SlideIndexAuthority) -> Rc<RefCell<Vec<usize>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        a.on_change(Box::new(move |c| sink.borrow_mut().push(c.index)));
        seen
    }

    fn positions(a: &SlideIndexAuthority) -> (Option<usize>, Option<usize>) {
        (
            a.track(Track::Image).logical_position(),
            a.track(Track::Content).logical_position(),
        )
    }

    #[test]
    fn test_wrap_forward_fires_once() {
        let mut a = authority(5, true);
        a.go_to(4);
        a.process(1_000);
        let seen = recorder(&mut a);

        let change = a.advance(1).unwrap();
        assert_eq!(change.index, 0);
        assert_eq!(change.previous, Some(4));
        assert_eq!(positions(&a), (Some(0), Some(0)));
        // Image track travels forward onto the trailing clone.
        assert_eq!(a.track(Track::Image).state().engine_index, 10);

        assert!(a.process(16).is_empty());
        assert!(a.process(1_000).is_empty());
        assert_eq!(*seen.borrow(), vec![0]);
        assert_eq!(positions(&a), (Some(0), Some(0)));
    }

    #[test]
    fn test_content_track_snaps() {
        let mut a = authority(4, false);
        a.advance(1);
        assert!(a.track(Track::Image).state().transitioning);
        assert!(!a.track(Track::Content).state().transitioning);
        assert_eq!(positions(&a), (Some(1), Some(1)));
    }

    #[test]
    fn test_clamps_without_loop() {
        let mut a = authority(3, false);
        assert!(a.advance(-1).is_none());
        assert_eq!(a.go_to(10).unwrap().index, 2);
        assert!(a.advance(1).is_none());
        assert_eq!(a.current(), Some(2));
    }

    #[test]
    fn test_go_to_wraps_in_loop() {
        let mut a = authority(5, true);
        assert_eq!(a.go_to(-1).unwrap().index, 4);
        assert_eq!(a.go_to(7).unwrap().index, 2);
    }

    #[test]
    fn test_go_to_same_index_is_silent() {
        let mut a = authority(3, false);
        let seen = recorder(&mut a);
        assert!(a.go_to(0).is_none());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_gesture_is_adopted() {
        let mut a = authority(4, false);
        let seen = recorder(&mut a);
        a.track_mut(Track::Content).next();
        let changes = a.process(16);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].origin, ChangeOrigin::Gesture(Track::Content));
        assert_eq!(a.current(), Some(1));
        assert_eq!(positions(&a), (Some(1), Some(1)));
        // The image track's snap echo comes back and is ignored.
        assert!(a.process(1_000).is_empty());
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_gestures_on_both_tracks_in_one_frame() {
        let mut a = authority(5, true);
        a.track_mut(Track::Image).next();
        a.track_mut(Track::Content).prev();
        a.process(16);
        for _ in 0..4 {
            a.process(250);
        }
        let current = a.current();
        assert!(current == Some(1) || current == Some(4));
        assert_eq!(positions(&a), (current, current));
    }

    #[test]
    fn test_out_of_range_report_is_clamped() {
        let mut a = SlideIndexAuthority::new(
            track(Track::Image, 3, false),
            track(Track::Content, 4, false),
            300,
            false,
        );
        assert_eq!(a.slide_count(), 3);
        a.go_to(2);
        a.process(1_000);

        // Content engine holds a slide the authority does not know about.
        a.track_mut(Track::Content).go_to(3, 0);
        let changes = a.process(16);
        assert!(changes.is_empty());
        assert_eq!(a.current(), Some(2));
        assert_eq!(positions(&a), (Some(2), Some(2)));
    }

    #[test]
    fn test_single_slide_is_inert() {
        let mut a = authority(1, true);
        let seen = recorder(&mut a);
        assert!(!a.navigable());
        assert!(a.advance(1).is_none());
        assert!(a.go_to(3).is_none());
        assert_eq!(a.current(), Some(0));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_static_fallback_track() {
        let a = SlideIndexAuthority::new(
            track(Track::Image, 5, true),
            TrackAdapter::new(
                Track::Content,
                Err(SliderError::EngineUnavailable("no engine".into())),
                300,
            ),
            300,
            true,
        );
        assert_eq!(a.slide_count(), 1);
        assert_eq!(a.current(), Some(0));
        assert!(!a.navigable());
    }

    #[test]
    fn test_empty_collection() {
        let mut a = SlideIndexAuthority::new(
            TrackAdapter::new(Track::Image, Err(SliderError::EmptyCollection), 300),
            TrackAdapter::new(Track::Content, Err(SliderError::EmptyCollection), 300),
            300,
            true,
        );
        assert_eq!(a.current(), None);
        assert!(a.advance(1).is_none());
        assert!(a.process(16).is_empty());
    }

    #[test]
    fn test_panicking_listener_does_not_block_bookkeeping() {
        let mut a = authority(3, false);
        a.on_change(Box::new(|_| panic!("listener failure")));
        let seen = recorder(&mut a);
        assert_eq!(a.advance(1).unwrap().index, 1);
        assert_eq!(a.current(), Some(1));
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_destroy() {
        let mut a = authority(3, false);
        let seen = recorder(&mut a);
        a.destroy();
        a.destroy();
        assert!(a.advance(1).is_none());
        assert!(a.process(16).is_empty());
        assert!(a.track(Track::Image).is_destroyed());
        assert!(seen.borrow().is_empty());
    }
}
