use std::sync::atomic::{AtomicI64, Ordering};

/// Highest acknowledged update id. Zero means "no offset filter yet".
///
/// Advanced by both ingestion paths; only the pull path feeds it back into
/// requests. Never moves backwards.
#[derive(Debug, Default)]
pub struct OffsetTracker {
    last_seen: AtomicI64,
}

impl OffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seen(&self) -> i64 {
        self.last_seen.load(Ordering::Acquire)
    }

    /// Offset parameter for the next pull, or `None` for the first-ever
    /// pull (take whatever the service has).
    pub fn next_offset(&self) -> Option<i64> {
        let last = self.last_seen();
        (last > 0).then(|| last + 1)
    }

    pub fn observe(&self, update_id: i64) {
        self.last_seen.fetch_max(update_id, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_offset_before_first_batch() {
        let tracker = OffsetTracker::new();
        assert_eq!(tracker.last_seen(), 0);
        assert_eq!(tracker.next_offset(), None);
    }

    #[test]
    fn test_offset_is_last_seen_plus_one() {
        let tracker = OffsetTracker::new();
        tracker.observe(100);
        assert_eq!(tracker.next_offset(), Some(101));
    }

    #[test]
    fn test_never_moves_backwards() {
        let tracker = OffsetTracker::new();
        tracker.observe(100);
        tracker.observe(42);
        assert_eq!(tracker.last_seen(), 100);
    }
}
