/// Configuration for [`crate::RingBuffer::init`].
///
/// There is only one tunable orthogonal to the wire format: whether to pay
/// the (small) bookkeeping cost of [`crate::Metrics`] collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingBufferConfig {
    /// Enable metrics collection (slight overhead on every operation).
    pub enable_metrics: bool,
}

impl RingBufferConfig {
    /// Creates a configuration with metrics collection enabled.
    #[must_use]
    pub const fn with_metrics() -> Self {
        Self { enable_metrics: true }
    }
}
