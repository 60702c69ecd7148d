use std::mem::{align_of, size_of};

/// Sentinel standing in for a null offset, mirroring the reference
/// implementation's `NULL` node pointers. An offset is never a valid node
/// position at `NIL`, since the region header itself occupies byte zero.
pub(crate) const NIL: usize = usize::MAX;

/// Alignment every node header (and therefore every node) is padded to,
/// matching the reference implementation's `sizeof(void*)`.
pub(crate) const ALIGN: usize = align_of::<usize>();

#[inline]
pub(crate) const fn align_up(size: usize, align: usize) -> usize {
    (size + align - 1) & !(align - 1)
}

/// Lifecycle state of a node, per spec.md §3.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Reserved by the producer, payload not yet readable.
    Writing = 0,
    /// Confirmed by the producer, readable by `consume`.
    Committed = 1,
    /// Reserved by the consumer, payload being read.
    Reading = 2,
}

/// On-disk (in-region) node header.
///
/// Laid out with `repr(C)` and addressed purely by byte offset from the
/// start of the caller-supplied region — there is no native Rust pointer
/// or reference anywhere in this struct, so the whole ring buffer remains
/// relocatable, mmap-friendly, and safe to persist as raw bytes, per
/// spec.md §9's note that an index-based port is the intended translation
/// of the original pointer-chasing design.
///
/// Offsets double as the `NIL` sentinel (`usize::MAX`) in place of the
/// `NULL` checks the reference implementation performs on raw pointers.
#[repr(C)]
pub(crate) struct NodeHeader {
    pub state: NodeState,
    /// Position chain: circular, ordered by ascending physical offset.
    pub pos_forward: usize,
    pub pos_backward: usize,
    /// Time chain: linear, ordered oldest (TAIL) to newest (HEAD). `NIL` at
    /// either end.
    pub time_newer: usize,
    pub time_older: usize,
    pub len: usize,
}

impl NodeHeader {
    /// Total bytes a node of payload length `len` occupies, header included
    /// and padded to `ALIGN` — the direct analog of `_ring_buffer_node_cost`.
    #[inline]
    pub(crate) fn cost(len: usize) -> usize {
        align_up(size_of::<Self>() + len, ALIGN)
    }

    /// True if this node is its own position-chain neighbor, i.e. it is the
    /// sole node in the buffer.
    #[inline]
    pub(crate) fn is_sole(&self, self_offset: usize) -> bool {
        self.pos_forward == self_offset && self.pos_backward == self_offset
    }
}

/// Raw accessor to a node header living at `offset` within `region`.
///
/// # Safety
/// `offset` must be a valid, currently-live node offset within `region`,
/// and `region` must be large enough to hold a full `NodeHeader` starting
/// there (callers uphold this because every offset they pass through
/// originates from a prior `reserve`/chain traversal bounded by
/// `RegionHeader::capacity`).
#[inline]
pub(crate) unsafe fn node_header<'a>(region: *const u8, offset: usize) -> &'a NodeHeader {
    &*region.add(offset).cast::<NodeHeader>()
}

/// # Safety
/// See [`node_header`].
#[inline]
pub(crate) unsafe fn node_header_mut<'a>(region: *mut u8, offset: usize) -> &'a mut NodeHeader {
    &mut *region.add(offset).cast::<NodeHeader>()
}

/// Byte offset of the payload belonging to the node at `offset`.
#[inline]
pub(crate) fn payload_offset(offset: usize) -> usize {
    offset + size_of::<NodeHeader>()
}
