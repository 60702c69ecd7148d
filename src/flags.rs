use bitflags::bitflags;

bitflags! {
    /// Flags accepted by [`crate::RingBuffer::reserve`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReserveFlags: u8 {
        /// Permit evicting the oldest committed records to make room. See
        /// spec.md §4.2's overwrite algorithm.
        const OVERWRITE = 0x1;
    }
}

bitflags! {
    /// Flags accepted by [`crate::RingBuffer::commit`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommitFlags: u8 {
        /// Discard instead of confirm. Semantics depend on the token's
        /// current state; see spec.md §4.3.
        const DISCARD = 0x2;
        /// If a `DISCARD` of a `Reading` token would fail (a newer reader is
        /// still active), force a normal consume-confirm instead of erroring.
        const CONSUME_ON_ERROR = 0x4;
    }
}
