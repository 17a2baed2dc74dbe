use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback list where one failing callback cannot starve the rest.
pub struct Listeners<E> {
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
    next_id: u64,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> Listeners<E> {
    pub fn add(&mut self, listener: Box<dyn FnMut(&E)>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(lid, _)| *lid != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every listener; a panicking one is logged and skipped.
    /// Returns how many listeners failed.
    pub fn emit(&mut self, event: &E) -> usize {
        let mut failed = 0;
        for (id, listener) in self.entries.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(event)));
            if outcome.is_err() {
                failed += 1;
                warn!(listener = id.0, "change listener panicked; continuing with the rest");
            }
        }
        failed
    }
}
