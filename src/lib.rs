//! A multi-producer / multi-consumer, bounded, in-process message queue
//! with zero-copy (pointer-swap) semantics and producer-lifecycle-aware
//! termination.
//!
//! Three layers, leaves first:
//! - [`sync`]: an owner-tracked mutex built on [`std::sync::Mutex`] and
//!   [`std::sync::Condvar`] used directly.
//! - [`ring`]: a single-threaded pointer-swap ring FIFO with grow-in-place
//!   and resize-payload operations.
//! - [`channel`] (operations) over [`handle::Handle`] (the reference-counted,
//!   mode-tagged handle type): wraps the ring with the mutex, handle
//!   accounting, and the blocking/flush protocol.
//!
//! A handle is opened in [`Mode::Neutral`], [`Mode::Read`], or
//! [`Mode::Write`]. Producers push and consumers pop through the same
//! [`Handle::next`] family, which dispatches on the handle's mode. Closing
//! the last writer handle arms a flush that lets blocked readers drain the
//! remaining items and then fail with [`ChanError::Drained`] instead of
//! blocking forever.
//!
//! ```
//! use ringchan::{Config, Handle, Mode};
//!
//! let root = Handle::alloc(Config::new(4, 8).unwrap());
//! let writer = root.open(Mode::Write);
//! let reader = root.open(Mode::Read);
//!
//! let mut item = ringchan::token::token_buffer(&writer);
//! item[0] = 1;
//! writer.next_try(&mut item).unwrap();
//! drop(writer);
//!
//! let mut out = ringchan::token::token_buffer(&reader);
//! reader.next_try(&mut out).unwrap();
//! assert_eq!(out[0], 1);
//! assert!(reader.next_try(&mut out).is_err()); // drained
//! ```
//!
//! Failures come in two tiers: operational outcomes (full/empty/timed-out/
//! drained) are [`ChanError`] values; programming errors (invalid mode,
//! recursive mutex acquisition) are panics.

mod channel;
pub mod config;
pub mod error;
mod handle;
pub(crate) mod invariants;
pub mod ring;
pub mod sync;
pub mod token;

pub use config::{Config, ConfigError, DEFAULT_CONFIG, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::ChanError;
pub use handle::{Handle, Mode};
pub use ring::Ring;
