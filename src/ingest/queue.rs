use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Event;

/// FIFO holding area between ingestion and dispatch.
///
/// One mutex guards the buffer for both enqueue and drain-snapshot; it is
/// held only for the append or swap itself, never across handler invocation
/// or network I/O. The `draining` flag is distinct from the lock and backs
/// the push path's single-flight rule.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<Vec<Event>>,
    draining: AtomicBool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.lock().push(event);
    }

    /// Atomically detach everything queued so far. Pushes that land after
    /// the swap go into a fresh buffer for the next cycle.
    pub fn drain_snapshot(&self) -> Vec<Event> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Claim the drain slot. Returns false while another pass holds it.
    pub fn try_begin_drain(&self) -> bool {
        self.draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn end_drain(&self) {
        self.draining.store(false, Ordering::Release);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        // A poisoned queue only means a producer panicked mid-push; the
        // buffer itself is still a valid Vec.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
