//! Spacer bookkeeping for decorations that hang out of the slider.
//!
//! Slides may carry absolutely positioned decorative elements (badges,
//! offset frames) that extend below the slider box. Page content following
//! the slider would be overlapped, so a trailing spacer is sized to the
//! overflow of the active slide after every change.

use tracing::{debug, trace};

use crate::timer::{Debouncer, TimerQueue};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.bottom()
    }
}

/// Measurements the host takes of its rendered slider.
pub trait LayoutProbe {
    /// The slider box, spacer excluded.
    fn container(&self) -> Option<Rect>;
    fn slide_bounds(&self, index: usize) -> Option<Rect>;
    /// Decorative elements attached to a slide, overflow included.
    fn decorations(&self, index: usize) -> Vec<Rect>;
    fn set_spacer_height(&mut self, height: f32);
}

pub struct LayoutReconciler {
    probe: Box<dyn LayoutProbe>,
    active: Option<usize>,
    spacer: f32,

    settle: TimerQueue<()>,
    resize: Debouncer,
    settle_ms: u64,
    max_passes: u32,
    destroyed: bool,
}

impl LayoutReconciler {
    pub fn new(
        probe: Box<dyn LayoutProbe>,
        settle_ms: u64,
        max_passes: u32,
        resize_debounce_ms: u64,
    ) -> Self {
        Self {
            probe,
            active: None,
            spacer: 0.0,
            settle: TimerQueue::new(),
            resize: Debouncer::new(resize_debounce_ms),
            settle_ms,
            max_passes,
            destroyed: false,
        }
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index;
    }

    pub fn spacer_height(&self) -> f32 {
        self.spacer
    }

    pub fn pending_passes(&self) -> usize {
        self.settle.len()
    }

    pub fn probe(&self) -> &dyn LayoutProbe {
        self.probe.as_ref()
    }

    pub fn probe_mut(&mut self) -> &mut dyn LayoutProbe {
        self.probe.as_mut()
    }

    /// Measure now and size the spacer. Returns the spacer height.
    pub fn reconcile(&mut self) -> f32 {
        if self.destroyed {
            return self.spacer;
        }
        let overflow = match (self.probe.container(), self.active) {
            (Some(container), Some(index)) => {
                let lowest = self
                    .probe
                    .slide_bounds(index)
                    .into_iter()
                    .chain(self.probe.decorations(index))
                    .map(|r| r.bottom())
                    .fold(container.bottom(), f32::max);
                (lowest - container.bottom()).max(0.0)
            }
            _ => 0.0,
        };
        if overflow != self.spacer {
            debug!(active = ?self.active, spacer = overflow, "spacer resized");
        }
        self.spacer = overflow;
        self.probe.set_spacer_height(overflow);
        overflow
    }

    /// Reconcile now, then a bounded number of times as layout settles
    /// (images decoding, fonts swapping). A new request replaces the
    /// remaining passes of the previous one.
    pub fn request(&mut self, now_ms: u64) {
        if self.destroyed {
            return;
        }
        self.reconcile();
        self.settle.clear();
        for pass in 1..=u64::from(self.max_passes) {
            self.settle.schedule(now_ms + pass * self.settle_ms, ());
        }
    }

    pub fn notify_resize(&mut self, now_ms: u64) {
        if !self.destroyed {
            self.resize.trigger(now_ms);
        }
    }

    pub fn notify_content_mutation(&mut self, now_ms: u64) {
        self.request(now_ms);
    }

    pub fn update(&mut self, now_ms: u64) {
        if self.destroyed {
            return;
        }
        if self.resize.fire(now_ms) {
            trace!("resize settled");
            self.request(now_ms);
        }
        while self.settle.pop_due(now_ms).is_some() {
            self.reconcile();
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.settle.clear();
        self.resize.cancel();
    }
}
