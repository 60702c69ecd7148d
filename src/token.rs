/// Caller-visible handle to a record's payload region.
///
/// A `Token` is pointer-like: it carries the length of its payload as an
/// immutable field (spec.md's "token is a pointer to a structure
/// `{ const len: size; data: byte[len] }`"), and the node header that owns
/// it lives at a fixed offset inside the originating [`crate::RingBuffer`].
///
/// Passing a token to a different `RingBuffer` than the one that produced
/// it, or committing the same token twice, is undefined behavior per
/// spec.md §7 — in debug builds this is caught by an owner check rather
/// than silently corrupting state.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub(crate) offset: usize,
    len: usize,
    #[cfg(debug_assertions)]
    pub(crate) owner: u64,
}

impl Token {
    pub(crate) fn new(offset: usize, len: usize, #[cfg(debug_assertions)] owner: u64) -> Self {
        Self {
            offset,
            len,
            #[cfg(debug_assertions)]
            owner,
        }
    }

    /// The payload length in bytes, fixed at the time this token was reserved.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the payload is zero-length.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<'a> crate::region::RingBuffer<'a> {
    /// Read-only view of `token`'s payload bytes.
    ///
    /// Panics (in debug builds) if `token` did not originate from this
    /// buffer — see spec.md §7's note that cross-buffer tokens are
    /// undefined behavior; debug builds turn it into a caught bug instead.
    #[must_use]
    pub fn payload(&self, token: &Token) -> &[u8] {
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(
                token.owner, self.id,
                "token used with a RingBuffer other than the one that produced it"
            );
        }
        self.raw_payload(token.offset, token.len())
    }

    /// Mutable view of `token`'s payload bytes, for writing before commit.
    #[must_use]
    pub fn payload_mut(&mut self, token: &Token) -> &mut [u8] {
        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(
                token.owner, self.id,
                "token used with a RingBuffer other than the one that produced it"
            );
        }
        self.raw_payload_mut(token.offset, token.len())
    }
}
