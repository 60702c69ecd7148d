use crate::node::{NodeState, NIL};
use crate::region::RingBuffer;

impl<'a> RingBuffer<'a> {
    /// Walks every live node from `TAIL` (oldest) to `HEAD` (newest),
    /// calling `visitor` with each node's payload and state.
    ///
    /// Stops early if `visitor` returns `false`; the node that caused the
    /// stop is not counted. Returns the number of nodes successfully
    /// visited.
    pub fn foreach<F>(&self, mut visitor: F) -> usize
    where
        F: FnMut(&[u8], NodeState) -> bool,
    {
        let mut visited = 0;
        let mut current = self.header().tail;

        while current != NIL {
            let node = self.node(current);
            let (state, len) = (node.state, node.len);
            if !visitor(self.raw_payload(current, len), state) {
                break;
            }
            visited += 1;
            current = self.node(current).time_newer;
        }

        visited
    }
}
