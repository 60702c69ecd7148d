use thiserror::Error;

/// Error returned by [`crate::RingBuffer::commit`].
///
/// `init`, `reserve`, and `consume` do not get an error enum: spec.md §7
/// is explicit that their failure modes ("capacity error", "empty error",
/// "initialization error") surface as `Option::None`, not `Result::Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommitError {
    /// Attempted to discard a `Reading` token while a temporally-newer node
    /// is still `Reading`. See spec.md §4.3's consume-discard restriction.
    #[error("cannot discard a consumed record while a newer reader is still active")]
    NewerReaderActive,
}
