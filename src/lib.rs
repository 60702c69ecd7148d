//! ringslab — a bounded, in-place ring allocator for variable-length records.
//!
//! A single-producer/single-consumer staging area backed by one
//! caller-supplied byte region. All bookkeeping (node headers, the
//! position chain, the time chain) lives inside that region; no heap
//! allocation happens after [`RingBuffer::init`].
//!
//! Producers [`RingBuffer::reserve`] a slot, write into it via
//! [`RingBuffer::payload_mut`], and [`RingBuffer::commit`] it — confirming
//! or discarding. Consumers [`RingBuffer::consume`] the oldest committed
//! record, read it via [`RingBuffer::payload`], and commit their own token
//! to confirm or un-consume it. An optional overwrite policy
//! ([`ReserveFlags::OVERWRITE`]) lets producers evict the oldest committed
//! records instead of failing when the region is full; evicted records are
//! tallied and reported on the next `consume`.
//!
//! This is a single-threaded data structure: callers needing concurrent
//! access must wrap it in their own synchronization.
//!
//! # Example
//!
//! ```
//! use ringslab::{CommitFlags, ReserveFlags, RingBuffer, RingBufferConfig};
//!
//! let mut region = vec![0u8; 4096];
//! let mut rb = RingBuffer::init(&mut region, RingBufferConfig::default()).unwrap();
//!
//! let token = rb.reserve(5, ReserveFlags::empty()).unwrap();
//! rb.payload_mut(&token).copy_from_slice(b"hello");
//! rb.commit(token, CommitFlags::empty()).unwrap();
//!
//! let (token, lost) = rb.consume().unwrap();
//! assert_eq!(lost, 0);
//! assert_eq!(rb.payload(&token), b"hello");
//! rb.commit(token, CommitFlags::empty()).unwrap();
//! ```

mod alloc;
mod config;
mod error;
mod flags;
mod invariants;
mod iter;
mod metrics;
mod node;
mod region;
mod state;
mod token;

pub use config::RingBufferConfig;
pub use error::CommitError;
pub use flags::{CommitFlags, ReserveFlags};
pub use metrics::Metrics;
pub use node::NodeState;
pub use region::RingBuffer;
pub use token::Token;
