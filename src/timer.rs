//! Cooperative timers.
//!
//! Nothing here reads a clock. Owners pass `now_ms` in from their frame loop,
//! and every timer can be cancelled, which is what lets a destroyed component
//! guarantee that none of its delayed work runs afterwards.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<K> {
    id: TimerId,
    due_ms: u64,
    key: K,
}

/// A small ordered set of pending timers keyed by `K`.
#[derive(Debug)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, due_ms: u64, key: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Stable insert: equal due times fire in scheduling order.
        let at = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(at, Entry { id, due_ms, key });
        trace!(timer = id.0, due_ms, "timer scheduled");
        id
    }

    /// Returns false when the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.entries.remove(pos);
                trace!(timer = id.0, "timer cancelled");
                true
            }
            None => false,
        }
    }

    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) {
        self.entries.retain(|e| !pred(&e.key));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<K> {
        if self.entries.first()?.due_ms <= now_ms {
            Some(self.entries.remove(0).key)
        } else {
            None
        }
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Trailing-edge debounce: fires once, `window_ms` after the last trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.window_ms);
    }

    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
