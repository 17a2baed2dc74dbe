use std::collections::VecDeque;

use tracing::trace;

use crate::engine::{Direction, Engine, EngineEvent};
use crate::error::{Result, SliderError};
use crate::strip::state::StripState;
use crate::strip::tween::Tween;

/// Default gesture animation length for [`StripEngine::swipe`].
const SWIPE_DURATION_MS: u64 = 300;

pub struct StripEngine {
    slide_count: usize,
    clones: usize,

    active: usize,
    position: f32,
    state: StripState,
    tween: Option<Tween>,

    navigation_enabled: bool,
    events: VecDeque<EngineEvent>,
}

impl StripEngine {
    /// Build a strip for `slide_count` real slides. Loop mode surrounds them
    /// with one full set of clones on each side (3×N slides in total).
    pub fn new(slide_count: usize, loop_enabled: bool) -> Result<Self> {
        let clones = if loop_enabled && slide_count > 1 {
            slide_count
        } else {
            0
        };
        Self::with_clones(slide_count, clones)
    }

    pub fn with_clones(slide_count: usize, clones: usize) -> Result<Self> {
        if slide_count == 0 {
            return Err(SliderError::EmptyCollection);
        }
        Ok(Self {
            slide_count,
            clones,
            active: clones,
            position: clones as f32,
            state: StripState::Idle,
            tween: None,
            navigation_enabled: true,
            events: VecDeque::new(),
        })
    }

    /// A user gesture on the strip itself, bypassing whoever coordinates it.
    pub fn swipe(&mut self, direction: Direction) {
        if !self.navigation_enabled {
            return;
        }
        let target = match direction {
            Direction::Forward => (self.active + 1).min(self.native_len() - 1),
            Direction::Backward => self.active.saturating_sub(1),
        };
        self.slide_to(target, SWIPE_DURATION_MS, true);
    }

    pub fn state(&self) -> StripState {
        self.state
    }

    pub fn navigation_enabled(&self) -> bool {
        self.navigation_enabled
    }

    /// Real slide shown at a native position.
    pub fn real_index(&self, native: usize) -> usize {
        (native as isize - self.clones as isize).rem_euclid(self.slide_count as isize) as usize
    }

    fn finish_transition(&mut self) {
        self.state = StripState::Idle;
        self.tween = None;
        self.position = self.active as f32;
        self.events.push_back(EngineEvent::TransitionEnd {
            native: self.active,
        });
        self.recenter();
    }

    // Landing on a clone jumps to the same real slide in the middle band.
    // The real slide does not change, so no slide change is queued.
    fn recenter(&mut self) {
        if self.clones == 0 {
            return;
        }
        let band = self.clones..self.clones + self.slide_count;
        if !band.contains(&self.active) {
            let native = self.clones + self.real_index(self.active);
            trace!(from = self.active, to = native, "strip recentred");
            self.active = native;
            self.position = native as f32;
        }
    }
}

impl Engine for StripEngine {
    fn slide_count(&self) -> usize {
        self.slide_count
    }

    fn loop_offset(&self) -> usize {
        self.clones
    }

    fn native_len(&self) -> usize {
        self.slide_count + 2 * self.clones
    }

    fn native_index(&self) -> usize {
        self.active
    }

    fn is_transitioning(&self) -> bool {
        self.state == StripState::Sliding
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn slide_to(&mut self, native: usize, duration_ms: u64, animate: bool) {
        let native = native.min(self.native_len() - 1);
        if native != self.active {
            self.active = native;
            self.events.push_back(EngineEvent::SlideChange { native });
        } else if self.state == StripState::Idle {
            return;
        }

        if animate && duration_ms > 0 {
            self.tween = Some(Tween::new(self.position, native as f32, duration_ms));
            self.state = StripState::Sliding;
        } else {
            self.finish_transition();
        }
    }

    fn set_navigation_enabled(&mut self, enabled: bool) {
        self.navigation_enabled = enabled;
    }

    fn update(&mut self, dt_ms: u64) {
        if self.state != StripState::Sliding {
            return;
        }
        let done = match self.tween.as_mut() {
            Some(tween) => {
                self.position = tween.apply(dt_ms);
                tween.finished()
            }
            None => true,
        };
        if done {
            self.finish_transition();
        }
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }
}
