use crate::flags::ReserveFlags;
use crate::invariants::{debug_assert_bounded_occupancy, debug_assert_self_link_consistent};
use crate::node::{NodeHeader, NodeState, NIL};
use crate::region::RingBuffer;
use crate::token::Token;

impl<'a> RingBuffer<'a> {
    /// Reserves `len` bytes of writable payload.
    ///
    /// Returns `None` if no gap fits and either `flags` lacks `OVERWRITE`
    /// or overwrite itself cannot free enough contiguous space. See
    /// the crate root docs for the four-case placement algorithm.
    pub fn reserve(&mut self, len: usize, flags: ReserveFlags) -> Option<Token> {
        let node_size = NodeHeader::cost(len);

        let token = if self.is_empty() {
            self.reserve_empty(len, node_size)
        } else {
            self.reserve_non_empty(len, node_size, flags)
        };

        if self.metrics_enabled() {
            if token.is_some() {
                self.metrics_mut().reserves_ok += 1;
            } else {
                self.metrics_mut().reserves_failed += 1;
            }
        }
        self.debug_check_parity();
        token
    }

    pub(crate) fn make_token(&self, offset: usize, len: usize) -> Token {
        Token::new(
            offset,
            len,
            #[cfg(debug_assertions)]
            self.id,
        )
    }

    /// Places the very first node in a freshly-emptied (or never-used)
    /// buffer, self-linked in both chains.
    fn reserve_empty(&mut self, len: usize, node_size: usize) -> Option<Token> {
        if node_size > self.capacity() {
            return None;
        }

        let offset = self.cache_start();
        {
            let node = self.node_mut(offset);
            node.state = NodeState::Writing;
            node.len = len;
            node.pos_forward = offset;
            node.pos_backward = offset;
            node.time_newer = NIL;
            node.time_older = NIL;
        }

        let header = self.header_mut();
        header.head = offset;
        header.tail = offset;
        header.oldest_reserve = offset;

        debug_assert_bounded_occupancy!(node_size, self.capacity());
        Some(self.make_token(offset, len))
    }

    /// Initializes the node at `offset` as a fresh writer and splices it
    /// in as the new time-chain HEAD, position-linked right after the
    /// current HEAD.
    fn install_node(&mut self, offset: usize, len: usize) -> Token {
        {
            let node = self.node_mut(offset);
            node.state = NodeState::Writing;
            node.len = len;
        }
        let head = self.header().head;
        self.link_as_newest(offset, head);
        self.make_token(offset, len)
    }

    fn reserve_non_empty(
        &mut self,
        len: usize,
        node_size: usize,
        flags: ReserveFlags,
    ) -> Option<Token> {
        let head = self.header().head;
        let next_possible = self.slot_after_head();
        let head_forward = self.node(head).pos_forward;

        if head_forward > head {
            if head_forward - next_possible >= node_size {
                return Some(self.install_node(next_possible, len));
            }
            return self.reserve_via_overwrite(len, node_size, flags);
        }

        if self.cache_end() - next_possible >= node_size {
            return Some(self.install_node(next_possible, len));
        }
        if head_forward - self.cache_start() >= node_size {
            return Some(self.install_node(self.cache_start(), len));
        }

        self.reserve_via_overwrite(len, node_size, flags)
    }

    fn reserve_via_overwrite(
        &mut self,
        len: usize,
        node_size: usize,
        flags: ReserveFlags,
    ) -> Option<Token> {
        if !flags.contains(ReserveFlags::OVERWRITE) {
            return None;
        }
        self.reserve_overwrite(len, node_size)
    }

    /// Evicts the oldest contiguous run of committed records to free
    /// `node_size` bytes, then reuses the run's starting slot as the new
    /// node.
    fn reserve_overwrite(&mut self, len: usize, node_size: usize) -> Option<Token> {
        let oldest = self.header().oldest_reserve;
        if oldest == NIL || self.node(oldest).state != NodeState::Committed {
            return None;
        }

        debug_assert_self_link_consistent!(
            self.node(oldest).pos_forward,
            self.node(oldest).pos_backward,
            oldest
        );

        if self.node(oldest).is_sole(oldest) {
            if self.capacity() < node_size {
                return None;
            }
            self.header_mut().lost += 1;
            self.reinit();
            let token = self.reserve_empty(len, node_size);
            if self.metrics_enabled() && token.is_some() {
                self.metrics_mut().overwrites += 1;
                self.metrics_mut().records_lost += 1;
            }
            return token;
        }

        let start = oldest;
        let mut end = start;
        let mut sum_size = 0usize;
        let mut evicted = 1usize;
        loop {
            sum_size += NodeHeader::cost(self.node(end).len);
            let next = self.node(end).pos_forward;
            let absorbable = sum_size < node_size
                && self.node(next).state == NodeState::Committed
                && next == self.node(end).time_newer
                && next > end;
            if !absorbable {
                break;
            }
            end = next;
            evicted += 1;
        }

        if sum_size < node_size {
            return None;
        }

        // `end` may be HEAD itself, when the run absorbs every remaining
        // Writing/Committed record (a `Reading` node older than `start`,
        // if one exists, is untouched by this walk and survives). There
        // is then no time-chain successor to hand the run off to: the
        // reused node becomes the new HEAD, and the new `oldest_reserve`,
        // directly.
        let reached_head = end == self.header().head;
        let new_oldest = self.node(end).time_newer;
        self.header_mut().oldest_reserve = if new_oldest == NIL { start } else { new_oldest };

        // Position chain: skip over the evicted run. Independent of time
        // order, so this holds regardless of what (if anything) is older
        // than `start`.
        let end_forward = self.node(end).pos_forward;
        self.node_mut(start).pos_forward = end_forward;
        self.node_mut(end_forward).pos_backward = start;

        // Time chain: splice `start`'s old predecessor (if any) past the
        // evicted run, then re-home `start` as the newest entry.
        let start_older = self.node(start).time_older;
        if start_older == NIL {
            // `start` was TAIL: its survivor becomes the new TAIL, unless
            // the run also reached HEAD, in which case the reused `start`
            // is the sole remaining node and stays TAIL too.
            self.header_mut().tail = if new_oldest == NIL { start } else { new_oldest };
        } else if new_oldest != NIL {
            self.node_mut(start_older).time_newer = new_oldest;
        }
        if new_oldest != NIL {
            self.node_mut(new_oldest).time_older = start_older;
        }

        if reached_head {
            self.node_mut(start).time_newer = NIL;
            self.node_mut(start).time_older = start_older;
            if start_older != NIL {
                self.node_mut(start_older).time_newer = start;
            }
            self.header_mut().head = start;
        } else {
            self.link_time_as_newest(start);
        }
        {
            let node = self.node_mut(start);
            node.state = NodeState::Writing;
            node.len = len;
        }
        self.header_mut().lost += evicted;

        if self.metrics_enabled() {
            self.metrics_mut().overwrites += 1;
            self.metrics_mut().records_lost += evicted as u64;
        }

        Some(self.make_token(start, len))
    }
}
