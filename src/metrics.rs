/// Operation counters, updated only when [`crate::RingBufferConfig::enable_metrics`] is set.
///
/// Unlike the teacher crate's `Metrics` (which backs a concurrent channel and
/// so would need atomics), this core is single-threaded per spec.md §5, so
/// plain counters suffice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics {
    /// Successful `reserve` calls.
    pub reserves_ok: u64,
    /// `reserve` calls that returned `None`.
    pub reserves_failed: u64,
    /// `reserve` calls that succeeded via overwrite eviction.
    pub overwrites: u64,
    /// Total records evicted by overwrite (mirrors `lost`, but never reset).
    pub records_lost: u64,
    /// Successful `consume` calls.
    pub consumes_ok: u64,
    /// `consume` calls that found nothing committed.
    pub consumes_empty: u64,
    /// Successful `commit` calls.
    pub commits_ok: u64,
    /// `commit` calls that returned [`crate::CommitError`].
    pub commits_failed: u64,
}

impl Metrics {
    /// Creates a zeroed metrics snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
