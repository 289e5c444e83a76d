use chrono::Utc;

/// Milliseconds since the Unix epoch, as stored in `createdAt`/`updatedAt`.
#[inline]
pub fn current_time_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Timestamp for a document that was last stamped at `previous`.
///
/// Never returns a value less than or equal to `previous`, so `updatedAt`
/// strictly increases across updates even within one millisecond or when
/// the wall clock moves backwards.
#[inline]
pub fn next_timestamp_after(previous: i64) -> i64 {
    current_time_millis().max(previous.saturating_add(1))
}
