//! Screen-reader announcements through one page-level live region.
//!
//! Every slider on a page shares the same [`LiveRegion`], handed to each of
//! them explicitly as a [`SharedLiveRegion`]. Each announcement is written in
//! three steps: clear, write one tick later, clear again after
//! `announce_clear_ms`. The leading clear is what makes assistive technology
//! read a message that is identical to the previous one.
//!
//! Announcements are queued. An instance may replace its own message, shown
//! or not, but never one from another instance; that one is shown for its
//! full time first.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::aria;
use crate::constants::{ANNOUNCE_CLEAR_MS, ANNOUNCE_WRITE_DELAY_MS};
use crate::playback::PlaybackState;
use crate::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Polite,
    Assertive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementEvent {
    pub message: String,
    pub priority: Priority,
    pub timestamp_ms: u64,
    pub instance: InstanceId,
    /// How long the message stays written before the region clears it.
    pub clear_after_ms: u64,
}

/// Where the live region's text ends up (a DOM node, a status bar...).
pub trait LiveRegionSink {
    fn write(&mut self, priority: Priority, message: &str);
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    Write(Priority, String),
    Clear,
}

/// Sink that keeps every operation; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    log: Rc<RefCell<Vec<SinkOp>>>,
}

impl MemorySink {
    pub fn ops(&self) -> Vec<SinkOp> {
        self.log.borrow().clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|op| match op {
                SinkOp::Write(_, text) => Some(text.clone()),
                SinkOp::Clear => None,
            })
            .collect()
    }

    /// Text currently shown, if the last operation was a write.
    pub fn current(&self) -> Option<String> {
        match self.log.borrow().last() {
            Some(SinkOp::Write(_, text)) => Some(text.clone()),
            _ => None,
        }
    }
}

impl LiveRegionSink for MemorySink {
    fn write(&mut self, priority: Priority, message: &str) {
        self.log
            .borrow_mut()
            .push(SinkOp::Write(priority, message.to_string()));
    }

    fn clear(&mut self) {
        self.log.borrow_mut().push(SinkOp::Clear);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Write,
    Clear,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Pending(AnnouncementEvent),
    Showing(AnnouncementEvent),
}

impl Phase {
    fn instance(&self) -> Option<InstanceId> {
        match self {
            Phase::Idle => None,
            Phase::Pending(e) | Phase::Showing(e) => Some(e.instance),
        }
    }
}

pub struct LiveRegion {
    sink: Box<dyn LiveRegionSink>,
    queue: VecDeque<AnnouncementEvent>,
    phase: Phase,
    timers: TimerQueue<Step>,
    now_ms: u64,
    next_instance: u32,
    write_delay_ms: u64,
}

pub type SharedLiveRegion = Rc<RefCell<LiveRegion>>;

impl LiveRegion {
    pub fn new(sink: Box<dyn LiveRegionSink>) -> Self {
        Self::with_write_delay(sink, ANNOUNCE_WRITE_DELAY_MS)
    }

    pub fn with_write_delay(sink: Box<dyn LiveRegionSink>, write_delay_ms: u64) -> Self {
        Self {
            sink,
            queue: VecDeque::new(),
            phase: Phase::Idle,
            timers: TimerQueue::new(),
            now_ms: 0,
            next_instance: 0,
            write_delay_ms,
        }
    }

    pub fn shared(self) -> SharedLiveRegion {
        Rc::new(RefCell::new(self))
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn register(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.queue.is_empty()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Message currently written to the sink.
    pub fn showing(&self) -> Option<&AnnouncementEvent> {
        match &self.phase {
            Phase::Showing(e) => Some(e),
            _ => None,
        }
    }

    pub fn enqueue(
        &mut self,
        message: String,
        priority: Priority,
        instance: InstanceId,
        clear_after_ms: u64,
    ) {
        let event = AnnouncementEvent {
            message,
            priority,
            timestamp_ms: self.now_ms,
            instance,
            clear_after_ms,
        };
        trace!(instance = instance.0, message = %event.message, "announcement queued");

        // Only the newest unwritten message per instance is worth reading.
        self.queue.retain(|e| e.instance != instance);
        if self.phase.instance() == Some(instance) {
            self.timers.clear();
            self.phase = Phase::Idle;
        }
        self.queue.push_back(event);
        if matches!(self.phase, Phase::Idle) {
            self.start_next();
        }
    }

    fn start_next(&mut self) {
        let Some(event) = self.queue.pop_front() else {
            return;
        };
        self.sink.clear();
        self.timers.schedule(self.now_ms + self.write_delay_ms, Step::Write);
        self.phase = Phase::Pending(event);
    }

    pub fn update(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        while let Some(step) = self.timers.pop_due(self.now_ms) {
            match (step, std::mem::replace(&mut self.phase, Phase::Idle)) {
                (Step::Write, Phase::Pending(event)) => {
                    debug!(instance = event.instance.0, message = %event.message, "announcing");
                    self.sink.write(event.priority, &event.message);
                    self.timers.schedule(self.now_ms + event.clear_after_ms, Step::Clear);
                    self.phase = Phase::Showing(event);
                }
                (Step::Clear, Phase::Showing(_)) => {
                    self.sink.clear();
                    self.start_next();
                }
                (_, phase) => self.phase = phase,
            }
        }
    }

    /// Forget everything an instance queued; clear its message if shown.
    pub fn release(&mut self, instance: InstanceId) {
        self.queue.retain(|e| e.instance != instance);
        if self.phase.instance() == Some(instance) {
            self.timers.clear();
            if matches!(self.phase, Phase::Showing(_)) {
                self.sink.clear();
            }
            self.phase = Phase::Idle;
            self.start_next();
        }
    }
}

/// One slider's handle on the shared live region.
pub struct Announcer {
    instance: InstanceId,
    region: SharedLiveRegion,
    clear_after_ms: u64,
    destroyed: bool,
}

impl Announcer {
    pub fn new(region: &SharedLiveRegion) -> Self {
        Self::with_clear_after(region, ANNOUNCE_CLEAR_MS)
    }

    /// Messages from this announcer stay written for `clear_after_ms`,
    /// whatever other instances on the region use.
    pub fn with_clear_after(region: &SharedLiveRegion, clear_after_ms: u64) -> Self {
        let instance = region.borrow_mut().register();
        Self {
            instance,
            region: Rc::clone(region),
            clear_after_ms,
            destroyed: false,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn announce(&mut self, index: usize, total: usize, label: &str) {
        self.push(aria::slide_status(index, total, label), Priority::Polite);
    }

    pub fn announce_playback_state(&mut self, state: PlaybackState) {
        self.push(aria::playback_status(state).to_string(), Priority::Polite);
    }

    pub fn announce_error(&mut self, message: &str) {
        self.push(message.to_string(), Priority::Assertive);
    }

    fn push(&mut self, message: String, priority: Priority) {
        if self.destroyed {
            return;
        }
        self.region
            .borrow_mut()
            .enqueue(message, priority, self.instance, self.clear_after_ms);
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.region.borrow_mut().release(self.instance);
    }
}
