use crate::common::{FIRST_ID, MAX_ID};
use crate::errors::{ErrorKind, PantryError, PantryResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out document IDs for a store.
///
/// A single counter shared by every collection of the store, so an ID is
/// never assigned twice within one process run, whichever collection it went
/// to. The store only draws IDs while holding its write lock; the counter is
/// atomic so that readers of [IdAllocator::peek] never see a torn value.
///
/// IDs never exceed [MAX_ID]; once it has been handed out or reserved through
/// [IdAllocator::advance_past], [IdAllocator::next_id] fails instead of
/// wrapping around.
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            next: AtomicU64::new(FIRST_ID),
        }
    }

    /// Returns the next ID and advances the counter.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidId] when the ID space is exhausted.
    pub fn next_id(&self) -> PantryResult<u64> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                (next <= MAX_ID).then_some(next + 1)
            })
            .map_err(|next| {
                log::error!("Document id space exhausted, next id would be {}", next);
                PantryError::new(
                    &format!("No document id left, ids are limited to {}", MAX_ID),
                    ErrorKind::InvalidId,
                )
            })
    }

    /// The ID the next call to [IdAllocator::next_id] will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }

    /// Makes sure `id` is never handed out again.
    ///
    /// Moves the counter to `id + 1` if it is not already past it; never moves
    /// it backwards.
    pub fn advance_past(&self, id: u64) {
        let target = id.min(MAX_ID) + 1;
        let previous = self.next.fetch_max(target, Ordering::SeqCst);
        if previous < target {
            log::debug!("Next id advanced from {} to {}", previous, target);
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_one() {
        let allocator = IdAllocator::new();
        assert_eq!(allocator.peek(), 1);
        assert_eq!(allocator.next_id().unwrap(), 1);
        assert_eq!(allocator.next_id().unwrap(), 2);
        assert_eq!(allocator.peek(), 3);
    }

    #[test]
    fn generates_unique_increasing_ids() {
        let allocator = IdAllocator::new();
        let ids: Vec<u64> = (0..100).map(|_| allocator.next_id().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn advance_past_moves_forward_only() {
        let allocator = IdAllocator::new();
        allocator.advance_past(12);
        assert_eq!(allocator.next_id().unwrap(), 13);

        allocator.advance_past(5);
        assert_eq!(allocator.next_id().unwrap(), 14);
    }

    #[test]
    fn advance_past_zero_keeps_first_id() {
        let allocator = IdAllocator::new();
        allocator.advance_past(0);
        assert_eq!(allocator.next_id().unwrap(), 1);
    }

    #[test]
    fn last_id_is_handed_out_once() {
        let allocator = IdAllocator::new();
        allocator.advance_past(MAX_ID - 1);
        assert_eq!(allocator.next_id().unwrap(), MAX_ID);

        let err = allocator.next_id().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidId);
        // the counter does not wrap around
        assert!(allocator.next_id().is_err());
        assert_eq!(allocator.peek(), MAX_ID + 1);
    }

    #[test]
    fn advance_past_beyond_limit_exhausts() {
        let allocator = IdAllocator::new();
        allocator.advance_past(u64::MAX);
        assert_eq!(allocator.peek(), MAX_ID + 1);
        assert!(allocator.next_id().is_err());
    }

    #[test]
    fn concurrent_ids_are_distinct() {
        let allocator = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                thread::spawn(move || (0..250).map(|_| allocator.next_id().unwrap()).collect::<Vec<_>>())
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
    }
}
