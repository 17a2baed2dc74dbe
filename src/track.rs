//! Track adapter: one carousel engine seen through logical slide indices.
//!
//! The adapter owns the loop-aware mapping between the authored slide order
//! and whatever native layout its engine uses (clones included). It never
//! moves on its own accord; moves come from [`TrackAdapter::sync_to`] issued
//! by the authority, from the host via [`TrackAdapter::go_to`], or from
//! gestures on the engine, and every resulting change is reported back
//! through [`TrackAdapter::poll`].

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::engine::{BoxedEngine, Direction, EngineEvent};
use crate::error::{Result, SliderError};
use crate::listeners::{ListenerId, Listeners};

/// Which of the two coupled tracks an adapter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    Image,
    Content,
}

/// Monotonic token stamped on every authority-initiated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangeToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackState {
    pub engine_index: usize,
    pub loop_enabled: bool,
    pub transitioning: bool,
}

/// Where a track's engine sits this frame, for hosts that draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFrame {
    /// Native slide units, fractional while sliding.
    pub position: f32,
    pub loop_offset: usize,
    pub native_len: usize,
    pub slide_count: usize,
}

impl TrackFrame {
    /// Authored slide drawn at a native slot.
    pub fn logical(&self, native: usize) -> usize {
        map_native(self.loop_offset, self.slide_count, native)
            .clamp(0, self.slide_count.saturating_sub(1) as isize) as usize
    }
}

/// A logical change observed on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackChange {
    pub track: Track,
    /// Logical index derived from the engine; may lie outside [0, N) when the
    /// engine disagrees with the authority about the collection.
    pub reported: isize,
    /// Set when this change answers an authority move.
    pub echo: Option<ChangeToken>,
}

/// Upper bound on moves awaiting their engine report.
const MAX_ISSUED: usize = 8;

/// A move issued through the adapter that has not been reported yet.
/// Matched by logical slide: engines may land on another copy of it.
#[derive(Debug, Clone, Copy)]
struct Issued {
    logical: isize,
    token: Option<ChangeToken>,
}

pub struct TrackAdapter {
    track: Track,
    engine: Option<BoxedEngine>,
    slide_count: usize,
    transition_ms: u64,

    issued: VecDeque<Issued>,
    loop_allowed: bool,
    last_reported: isize,
    listeners: Listeners<TrackChange>,
    destroyed: bool,
}

impl TrackAdapter {
    /// Wrap an engine. A failed engine leaves a static adapter showing slide
    /// 0 (or nothing, for an empty collection); the error is logged only.
    pub fn new(track: Track, engine: Result<BoxedEngine>, transition_ms: u64) -> Self {
        let (engine, slide_count) = match engine {
            Ok(engine) => {
                let count = engine.slide_count();
                (Some(engine), count)
            }
            Err(SliderError::EmptyCollection) => {
                warn!(?track, "track has no slides; rendering nothing");
                (None, 0)
            }
            Err(e) => {
                warn!(
                    ?track,
                    error = %e,
                    "engine construction failed; falling back to a static slide"
                );
                (None, 1)
            }
        };

        let mut adapter = Self {
            track,
            engine,
            slide_count,
            transition_ms,
            issued: VecDeque::new(),
            loop_allowed: true,
            last_reported: 0,
            listeners: Listeners::default(),
            destroyed: false,
        };
        adapter.last_reported = adapter.engine_logical().unwrap_or(0);
        if adapter.slide_count <= 1 {
            adapter.set_navigation_enabled(false);
        }
        adapter
    }

    pub fn track(&self) -> Track {
        self.track
    }

    /// Slides this track can show; a static fallback counts as one.
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_static(&self) -> bool {
        self.engine.is_none()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Wraps only when the engine holds clones and looping is allowed.
    pub fn loop_enabled(&self) -> bool {
        self.loop_allowed
            && self
                .engine
                .as_ref()
                .is_some_and(|e| e.loop_offset() > 0 && e.slide_count() > 1)
    }

    /// Turn wrapping off (or back on) over a looping engine. The clones stay;
    /// moves just never leave the real slides.
    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_allowed = enabled;
    }

    pub fn navigable(&self) -> bool {
        !self.destroyed && self.engine.is_some() && self.slide_count > 1
    }

    pub fn state(&self) -> TrackState {
        TrackState {
            engine_index: self.engine.as_ref().map_or(0, |e| e.native_index()),
            loop_enabled: self.loop_enabled(),
            transitioning: self.engine.as_ref().is_some_and(|e| e.is_transitioning()),
        }
    }

    /// `None` for static and destroyed adapters.
    pub fn frame(&self) -> Option<TrackFrame> {
        let engine = self.engine.as_ref()?;
        Some(TrackFrame {
            position: engine.position(),
            loop_offset: engine.loop_offset(),
            native_len: engine.native_len(),
            slide_count: engine.slide_count(),
        })
    }

    /// Logical slide currently shown, or `None` when the engine's position
    /// does not map into [0, N).
    pub fn logical_position(&self) -> Option<usize> {
        if self.slide_count == 0 {
            return None;
        }
        if !self.navigable() {
            return Some(0);
        }
        self.engine_logical()
            .filter(|&i| i >= 0 && (i as usize) < self.slide_count)
            .map(|i| i as usize)
    }

    pub fn set_navigation_enabled(&mut self, enabled: bool) {
        let enabled = enabled && self.slide_count > 1;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_navigation_enabled(enabled);
        }
    }

    /// Native index for `logical`. In loop mode every real slide exists
    /// several times; pick the copy nearest the current position, or with a
    /// direction, the nearest copy lying that way.
    pub fn native_for(&self, logical: usize, direction: Option<Direction>) -> Option<usize> {
        let engine = self.engine.as_ref()?;
        let offset = engine.loop_offset();
        let len = engine.native_len();
        if len == 0 {
            return None;
        }
        if !self.loop_enabled() {
            return Some((logical + offset).min(len - 1));
        }

        let count = engine.slide_count();
        let current = engine.native_index();
        let candidates = (0..len).filter(|&k| {
            (k as isize - offset as isize).rem_euclid(count as isize) as usize == logical % count
        });
        let distance = |k: &usize| k.abs_diff(current);

        let directed = match direction {
            Some(Direction::Forward) => candidates.clone().filter(|&k| k >= current).min(),
            Some(Direction::Backward) => candidates.clone().filter(|&k| k <= current).max(),
            None => None,
        };
        directed.or_else(|| candidates.min_by_key(distance))
    }

    /// Move to `logical` without echo tracking. The resulting change is
    /// reported like a gesture.
    pub fn go_to(&mut self, logical: usize, duration_ms: u64) {
        self.move_to(logical, duration_ms, None, None);
    }

    pub fn next(&mut self) {
        self.step(Direction::Forward);
    }

    pub fn prev(&mut self) {
        self.step(Direction::Backward);
    }

    fn step(&mut self, direction: Direction) {
        let Some(current) = self.logical_position() else {
            return;
        };
        let count = self.slide_count;
        let target = match direction {
            Direction::Forward if self.loop_enabled() => (current + 1) % count,
            Direction::Forward => (current + 1).min(count - 1),
            Direction::Backward if self.loop_enabled() => (current + count - 1) % count,
            Direction::Backward => current.saturating_sub(1),
        };
        self.move_to(target, self.transition_ms, Some(direction), None);
    }

    /// Authority move: the engine's echo of it is tagged with `token`.
    pub(crate) fn sync_to(
        &mut self,
        logical: usize,
        duration_ms: u64,
        direction: Option<Direction>,
        token: ChangeToken,
    ) {
        self.move_to(logical, duration_ms, direction, Some(token));
    }

    fn move_to(
        &mut self,
        logical: usize,
        duration_ms: u64,
        direction: Option<Direction>,
        token: Option<ChangeToken>,
    ) {
        if !self.navigable() {
            return;
        }
        let Some(native) = self.native_for(logical, direction) else {
            return;
        };
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if native == engine.native_index() && !engine.is_transitioning() {
            return;
        }
        if native != engine.native_index() {
            if self.issued.len() == MAX_ISSUED {
                self.issued.pop_front();
            }
            self.issued.push_back(Issued {
                logical: logical as isize,
                token,
            });
        }
        debug!(track = ?self.track, logical, native, duration_ms, "track move");
        engine.slide_to(native, duration_ms, duration_ms > 0);
    }

    pub fn on_change(&mut self, listener: Box<dyn FnMut(&TrackChange)>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Advance the engine by `dt_ms` and collect the logical changes it
    /// produced since the last call.
    pub fn poll(&mut self, dt_ms: u64) -> Vec<TrackChange> {
        let mut changes = Vec::new();
        let Some(engine) = self.engine.as_mut() else {
            return changes;
        };
        if self.destroyed {
            return changes;
        }
        engine.update(dt_ms);

        while let Some(event) = engine.poll_event() {
            let EngineEvent::SlideChange { native } = event else {
                continue;
            };
            let reported = map_native(engine.loop_offset(), engine.slide_count(), native);
            // A report answers the oldest matching move; moves issued before
            // it were overtaken. No match means the engine moved by itself.
            let echo = match self.issued.iter().position(|i| i.logical == reported) {
                Some(at) => self.issued.drain(..=at).last().and_then(|i| i.token),
                None => None,
            };
            if reported == self.last_reported && echo.is_none() {
                continue;
            }
            self.last_reported = reported;
            changes.push(TrackChange {
                track: self.track,
                reported,
                echo,
            });
        }
        // An idle engine has reported every move it is going to.
        if !engine.is_transitioning() {
            self.issued.clear();
        }

        for change in &changes {
            self.listeners.emit(change);
        }
        changes
    }

    /// Release the engine. Safe to call repeatedly and on static adapters.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.engine = None;
        self.issued.clear();
        self.listeners.clear();
        debug!(track = ?self.track, "track destroyed");
    }

    fn engine_logical(&self) -> Option<isize> {
        let engine = self.engine.as_ref()?;
        Some(map_native(
            engine.loop_offset(),
            engine.slide_count(),
            engine.native_index(),
        ))
    }
}

/// Native → logical. With leading clones the engine loops, so the position
/// wraps; without them it is a plain shift and may fall outside [0, count).
fn map_native(offset: usize, count: usize, native: usize) -> isize {
    let shifted = native as isize - offset as isize;
    if offset > 0 && count > 0 {
        shifted.rem_euclid(count as isize)
    } else {
        shifted
    }
}
