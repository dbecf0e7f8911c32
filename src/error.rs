use thiserror::Error;

/// Operational failure from a [`crate::Handle`] operation.
///
/// These are expected, protocol-level outcomes — never a sign of a
/// programming error. Fatal programming errors (invalid mode, recursive
/// mutex acquisition) are `panic!`s instead; see the crate-level docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChanError {
    /// A non-blocking push found the queue full.
    #[error("queue is full")]
    Full,
    /// A non-blocking pop found the queue empty.
    #[error("queue is empty")]
    Empty,
    /// A timed wait elapsed before the operation could complete.
    #[error("operation timed out")]
    TimedOut,
    /// A read found the queue empty after the last writer closed.
    #[error("channel drained: no writers remain and the queue is empty")]
    Drained,
}

pub use crate::config::ConfigError;
