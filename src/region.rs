use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::RingBufferConfig;
use crate::invariants::{debug_assert_head_tail_parity, debug_assert_oldest_reserve_state};
use crate::metrics::Metrics;
use crate::node::{self, NodeHeader, ALIGN, NIL};

/// Bookkeeping that lives inside the caller-supplied region itself, right
/// after any leading alignment padding. Everything here is a byte offset
/// relative to the start of the region (or `NIL`), never a native pointer,
/// so the region can be relocated, memory-mapped, or persisted as-is.
#[repr(C)]
pub(crate) struct RegionHeader {
    /// Offset of the newest writing/committed/reading node, or `NIL`.
    pub head: usize,
    /// Offset of the oldest writing/committed/reading node, or `NIL`.
    pub tail: usize,
    /// Offset of the oldest node still in `Writing` or `Committed` state, or
    /// `NIL` if every live node has been handed to a reader.
    pub oldest_reserve: usize,
    /// Records evicted by overwrite since the last `consume`.
    pub lost: usize,
}

#[inline]
unsafe fn region_header<'a>(region: *const u8, offset: usize) -> &'a RegionHeader {
    &*region.add(offset).cast::<RegionHeader>()
}

#[inline]
unsafe fn region_header_mut<'a>(region: *mut u8, offset: usize) -> &'a mut RegionHeader {
    &mut *region.add(offset).cast::<RegionHeader>()
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A bounded, in-place ring allocator for variable-length records.
///
/// Backed entirely by a single caller-supplied byte slice: after
/// [`RingBuffer::init`] returns, no further heap allocation ever occurs.
/// Producer and consumer are expected to be a single thread each (or the
/// same thread alternating) — see the crate root docs for the concurrency
/// contract.
pub struct RingBuffer<'a> {
    region: &'a mut [u8],
    header_offset: usize,
    cache_offset: usize,
    capacity: usize,
    config: RingBufferConfig,
    metrics: Metrics,
    #[cfg(debug_assertions)]
    pub(crate) id: u64,
}

impl<'a> RingBuffer<'a> {
    /// The fixed bookkeeping cost reserved at the front of every region,
    /// alignment padding included. The direct analog of
    /// `ring_buffer_heap_cost`.
    #[must_use]
    pub fn heap_cost() -> usize {
        node::align_up(std::mem::size_of::<RegionHeader>(), ALIGN)
    }

    /// The total space a record of `len` bytes occupies once stored,
    /// header and alignment padding included. The direct analog of
    /// `ring_buffer_node_cost`.
    #[must_use]
    pub fn node_cost(len: usize) -> usize {
        NodeHeader::cost(len)
    }

    /// Initializes a ring buffer inside `region`.
    ///
    /// Returns `None` if `region` is too small to hold even the
    /// bookkeeping header (after alignment padding) plus a single
    /// zero-length node — mirroring `ring_buffer_init`'s capacity check.
    #[must_use]
    pub fn init(region: &'a mut [u8], config: RingBufferConfig) -> Option<Self> {
        let header_offset = region.as_ptr().align_offset(ALIGN);
        let header_size = Self::heap_cost();
        let cache_offset = header_offset.checked_add(header_size)?;
        if cache_offset >= region.len() {
            return None;
        }
        let capacity = region.len() - cache_offset;
        if capacity < NodeHeader::cost(0) {
            return None;
        }

        #[cfg(debug_assertions)]
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        let mut rb = Self {
            region,
            header_offset,
            cache_offset,
            capacity,
            config,
            metrics: Metrics::new(),
            #[cfg(debug_assertions)]
            id,
        };

        {
            let header = rb.header_mut();
            header.head = NIL;
            header.tail = NIL;
            header.oldest_reserve = NIL;
            header.lost = 0;
        }

        Some(rb)
    }

    /// Releases the ring buffer. A no-op beyond dropping the borrow: there
    /// is no out-of-region state to tear down, mirroring
    /// `ring_buffer_exit`.
    pub fn exit(self) {}

    /// Usable capacity in bytes, i.e. `region.len()` minus bookkeeping and
    /// alignment overhead.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if no record is currently live (writing, committed, or being
    /// read).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header().tail == NIL
    }

    /// Snapshot of the operation counters collected so far. Always zeroed
    /// if [`RingBufferConfig::enable_metrics`] was left unset.
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    #[inline]
    pub(crate) fn metrics_mut(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    #[inline]
    pub(crate) fn metrics_enabled(&self) -> bool {
        self.config.enable_metrics
    }

    #[inline]
    pub(crate) fn cache_start(&self) -> usize {
        self.cache_offset
    }

    #[inline]
    pub(crate) fn cache_end(&self) -> usize {
        self.cache_offset + self.capacity
    }

    #[inline]
    pub(crate) fn header(&self) -> &RegionHeader {
        // SAFETY: `header_offset` was computed in `init` to leave room for a
        // full `RegionHeader` before `region.len()`.
        unsafe { region_header(self.region.as_ptr(), self.header_offset) }
    }

    #[inline]
    pub(crate) fn header_mut(&mut self) -> &mut RegionHeader {
        // SAFETY: see `header`.
        unsafe { region_header_mut(self.region.as_mut_ptr(), self.header_offset) }
    }

    /// # Safety
    /// `offset` must be a live node offset previously handed out by this
    /// buffer's own bookkeeping (chain traversal, `HEAD`, `TAIL`, or
    /// `oldest_reserve`).
    #[inline]
    pub(crate) fn node(&self, offset: usize) -> &NodeHeader {
        debug_assert!(offset < self.cache_end(), "node offset {offset} out of range");
        unsafe { node::node_header(self.region.as_ptr(), offset) }
    }

    /// # Safety
    /// See [`RingBuffer::node`].
    #[inline]
    pub(crate) fn node_mut(&mut self, offset: usize) -> &mut NodeHeader {
        debug_assert!(offset < self.cache_end(), "node offset {offset} out of range");
        unsafe { node::node_header_mut(self.region.as_mut_ptr(), offset) }
    }

    #[inline]
    pub(crate) fn raw_payload(&self, offset: usize, len: usize) -> &[u8] {
        let start = node::payload_offset(offset);
        &self.region[start..start + len]
    }

    #[inline]
    pub(crate) fn raw_payload_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        let start = node::payload_offset(offset);
        &mut self.region[start..start + len]
    }

    /// Offset immediately past `HEAD`'s node, i.e. where a new node would
    /// land if inserted directly after `HEAD` with no gap. The analog of
    /// the reference implementation's `next_possible_node` computation.
    #[inline]
    pub(crate) fn slot_after_head(&self) -> usize {
        let head = self.header().head;
        head + NodeHeader::cost(self.node(head).len)
    }

    pub(crate) fn debug_check_parity(&self) {
        let header = self.header();
        debug_assert_head_tail_parity!(header.head, header.tail);
    }

    pub(crate) fn debug_check_oldest_reserve(&self) {
        let offset = self.header().oldest_reserve;
        if offset != NIL {
            debug_assert_oldest_reserve_state!(self.node(offset).state);
        }
    }

    /// Resets the buffer to the empty state, mirroring `_ring_buffer_reinit`.
    pub(crate) fn reinit(&mut self) {
        let header = self.header_mut();
        header.head = NIL;
        header.tail = NIL;
        header.oldest_reserve = NIL;
    }

    /// Threads a freshly-placed node into the position chain immediately
    /// after `pred`, and makes it the new time-chain `HEAD`. The shared
    /// tail of every insertion path (empty-buffer init excepted), mirroring
    /// `_ring_buffer_insert_new_node` minus the token setup the caller
    /// already did.
    pub(crate) fn link_as_newest(&mut self, new_offset: usize, pred_offset: usize) {
        let succ_offset = self.node(pred_offset).pos_forward;

        {
            let new_node = self.node_mut(new_offset);
            new_node.pos_forward = succ_offset;
            new_node.pos_backward = pred_offset;
        }
        self.node_mut(succ_offset).pos_backward = new_offset;
        self.node_mut(pred_offset).pos_forward = new_offset;

        self.link_time_as_newest(new_offset);
    }

    /// Makes `new_offset` the time-chain `HEAD`, linking it after the
    /// current `HEAD` (if any). Used both by ordinary insertion and by
    /// overwrite, which re-homes a reused node run as the newest entry.
    pub(crate) fn link_time_as_newest(&mut self, new_offset: usize) {
        let old_head = self.header().head;
        {
            let new_node = self.node_mut(new_offset);
            new_node.time_newer = NIL;
            new_node.time_older = old_head;
        }
        if old_head != NIL {
            self.node_mut(old_head).time_newer = new_offset;
        }
        self.header_mut().head = new_offset;
    }

    /// Unlinks `offset` from the position chain only, leaving the time
    /// chain and `HEAD`/`TAIL`/`oldest_reserve` untouched. The analog of
    /// `_ring_buffer_remove_node_chain_pos`.
    pub(crate) fn unlink_position(&mut self, offset: usize) {
        let node = self.node(offset);
        let (backward, forward) = (node.pos_backward, node.pos_forward);
        self.node_mut(backward).pos_forward = forward;
        self.node_mut(forward).pos_backward = backward;
    }

    /// Removes the current `TAIL` from both chains, advancing `TAIL` (and
    /// `oldest_reserve`, if it pointed at the removed node) to the next
    /// node in time order. The analog of `_ring_buffer_remove_tail`.
    pub(crate) fn remove_tail(&mut self) {
        let tail = self.header().tail;
        self.unlink_position(tail);

        let next = self.node(tail).time_newer;
        if next != NIL {
            self.node_mut(next).time_older = NIL;
        }

        let header = self.header_mut();
        if header.oldest_reserve == tail {
            header.oldest_reserve = next;
        }
        header.tail = next;
    }

    /// Removes the current `HEAD` from both chains, retreating `HEAD` to
    /// the next-older node. The analog of `_ring_buffer_remove_head`.
    pub(crate) fn remove_head(&mut self) {
        let head = self.header().head;
        self.unlink_position(head);

        let prev = self.node(head).time_older;
        if prev != NIL {
            self.node_mut(prev).time_newer = NIL;
        }

        let header = self.header_mut();
        if header.oldest_reserve == head {
            header.oldest_reserve = NIL;
        }
        header.head = prev;
    }

    /// Fully removes `offset` from the ring buffer: both chains, and
    /// `HEAD`/`TAIL`/`oldest_reserve` as needed. The analog of
    /// `_ring_buffer_delete_node`, including its sole-node reinitialization
    /// and its use of the time-chain neighbor fields (rather than
    /// `HEAD`/`TAIL` equality) to classify the node's position, which
    /// avoids re-deriving identity from a pointer that may already be
    /// stale by the time this runs.
    pub(crate) fn delete_node(&mut self, offset: usize) {
        let node = self.node(offset);
        if node.is_sole(offset) {
            self.reinit();
            return;
        }

        let (time_older, time_newer) = (node.time_older, node.time_newer);

        if time_older == NIL {
            self.remove_tail();
            return;
        }
        if time_newer == NIL {
            self.remove_head();
            return;
        }

        self.unlink_position(offset);
        self.node_mut(time_older).time_newer = time_newer;
        self.node_mut(time_newer).time_older = time_older;
        let header = self.header_mut();
        if header.oldest_reserve == offset {
            header.oldest_reserve = time_newer;
        }
    }
}
