use thiserror::Error;

/// Construction-time validation failure for [`Config`].
///
/// These are caller mistakes, reported back rather than panicking, and
/// produce no channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `buffer_count` was zero or not a power of two.
    #[error("buffer_count {0} must be a non-zero power of two")]
    NotPowerOfTwo(usize),
    /// `buffer_bytes` was zero.
    #[error("buffer_bytes must be at least 1")]
    ZeroBufferBytes,
}

/// Dimensions for a [`crate::Channel`]: ring length and per-slot payload size.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    buffer_count: usize,
    buffer_bytes: usize,
}

impl Config {
    /// Creates a validated configuration.
    ///
    /// `buffer_count` must be a non-zero power of two. `buffer_bytes` must
    /// be at least 1.
    pub fn new(buffer_count: usize, buffer_bytes: usize) -> Result<Self, ConfigError> {
        if buffer_count == 0 || !buffer_count.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(buffer_count));
        }
        if buffer_bytes == 0 {
            return Err(ConfigError::ZeroBufferBytes);
        }
        Ok(Self {
            buffer_count,
            buffer_bytes,
        })
    }

    /// Initial number of slots in the ring.
    #[inline]
    pub const fn buffer_count(&self) -> usize {
        self.buffer_count
    }

    /// Initial payload size of every slot, in bytes.
    #[inline]
    pub const fn buffer_bytes(&self) -> usize {
        self.buffer_bytes
    }
}

/// A modest general-purpose default: 16 slots of 4KB each.
pub const DEFAULT_CONFIG: Config = Config {
    buffer_count: 16,
    buffer_bytes: 4096,
};

/// Small ring, small slots — low per-item latency at the cost of capacity.
pub const LOW_LATENCY_CONFIG: Config = Config {
    buffer_count: 64,
    buffer_bytes: 256,
};

/// Large ring sized for bursty many-producer workloads.
pub const HIGH_THROUGHPUT_CONFIG: Config = Config {
    buffer_count: 4096,
    buffer_bytes: 4096,
};
