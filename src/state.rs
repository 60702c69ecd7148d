use crate::error::CommitError;
use crate::flags::CommitFlags;
use crate::node::{NodeState, NIL};
use crate::region::RingBuffer;
use crate::token::Token;

impl<'a> RingBuffer<'a> {
    /// Hands out the oldest committed record for reading.
    ///
    /// Returns `None` if nothing is committed (`oldest_reserve` absent, or
    /// pointing at a still-`Writing` node). On success, also returns the
    /// number of records evicted by overwrite since the previous
    /// `consume` call, then resets that counter to zero.
    pub fn consume(&mut self) -> Option<(Token, usize)> {
        let oldest = self.header().oldest_reserve;
        if oldest == NIL || self.node(oldest).state != NodeState::Committed {
            if self.metrics_enabled() {
                self.metrics_mut().consumes_empty += 1;
            }
            return None;
        }

        let lost = self.header().lost;
        self.header_mut().lost = 0;

        let next = self.node(oldest).time_newer;
        self.header_mut().oldest_reserve = next;
        self.node_mut(oldest).state = NodeState::Reading;
        let len = self.node(oldest).len;

        if self.metrics_enabled() {
            self.metrics_mut().consumes_ok += 1;
        }
        self.debug_check_parity();
        self.debug_check_oldest_reserve();
        Some((self.make_token(oldest, len), lost))
    }

    /// Finalizes a token obtained from either `reserve` or `consume`.
    ///
    /// Dispatches on the node's current state: a `Writing` token is
    /// confirmed into `Committed` (or removed outright, with `DISCARD`); a
    /// `Reading` token is removed (confirming the read), or "un-consumed"
    /// back to `Committed` with `DISCARD`, subject to the restriction
    /// documented on [`CommitError::NewerReaderActive`].
    pub fn commit(&mut self, token: Token, flags: CommitFlags) -> Result<(), CommitError> {
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(
                token.owner, self.id,
                "token committed to a different RingBuffer than the one that reserved it"
            );
        }

        let offset = token.offset;
        let result = if self.node(offset).state == NodeState::Writing {
            self.commit_write(offset, flags);
            Ok(())
        } else {
            self.commit_consume(offset, flags)
        };

        if self.metrics_enabled() {
            match &result {
                Ok(()) => self.metrics_mut().commits_ok += 1,
                Err(_) => self.metrics_mut().commits_failed += 1,
            }
        }
        self.debug_check_parity();
        self.debug_check_oldest_reserve();
        result
    }

    fn commit_write(&mut self, offset: usize, flags: CommitFlags) {
        if flags.contains(CommitFlags::DISCARD) {
            self.delete_node(offset);
        } else {
            self.node_mut(offset).state = NodeState::Committed;
        }
    }

    fn commit_consume(&mut self, offset: usize, flags: CommitFlags) -> Result<(), CommitError> {
        if flags.contains(CommitFlags::DISCARD) {
            self.commit_consume_discard(offset, flags)
        } else {
            self.delete_node(offset);
            Ok(())
        }
    }

    /// "Un-consumes" a `Reading` token back to `Committed`. Only legal
    /// when no temporally-newer node is itself still `Reading` — allowing
    /// it would re-expose this record to the next `consume` while a newer
    /// one has already been handed out, breaking FIFO-among-committed
    /// ordering.
    fn commit_consume_discard(
        &mut self,
        offset: usize,
        flags: CommitFlags,
    ) -> Result<(), CommitError> {
        let newer = self.node(offset).time_newer;
        if newer != NIL && self.node(newer).state == NodeState::Reading {
            return if flags.contains(CommitFlags::CONSUME_ON_ERROR) {
                self.delete_node(offset);
                Ok(())
            } else {
                Err(CommitError::NewerReaderActive)
            };
        }

        self.node_mut(offset).state = NodeState::Committed;

        if newer == NIL {
            self.header_mut().oldest_reserve = offset;
            return Ok(());
        }

        let oldest_reserve = self.header().oldest_reserve;
        if oldest_reserve != NIL && self.node(oldest_reserve).time_older == offset {
            self.header_mut().oldest_reserve = offset;
        }

        Ok(())
    }
}
