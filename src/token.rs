//! Token buffer helpers.
//!
//! No explicit free function is exposed: a `Vec<u8>`'s own `Drop` already
//! releases it.

use crate::handle::Handle;

/// A heap buffer sized to `handle`'s current `buffer_bytes`, ready to be
/// swapped in via `next`/`next_try`/`next_timed`.
pub fn token_buffer(handle: &Handle) -> Vec<u8> {
    vec![0u8; handle.buffer_bytes()]
}

/// Same as [`token_buffer`], additionally initialized with `src`'s bytes
/// (truncated or zero-padded to fit).
pub fn token_buffer_with(handle: &Handle, src: &[u8]) -> Vec<u8> {
    let mut buf = token_buffer(handle);
    let n = src.len().min(buf.len());
    buf[..n].copy_from_slice(&src[..n]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handle::Mode;

    #[test]
    fn token_buffer_matches_channel_payload_size() {
        let root = Handle::alloc(Config::new(4, 10).unwrap());
        let buf = token_buffer(&root);
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn token_buffer_with_copies_and_pads() {
        let root = Handle::alloc(Config::new(4, 4).unwrap());
        let writer = root.open(Mode::Write);
        let buf = token_buffer_with(&writer, &[1, 2]);
        assert_eq!(buf, vec![1, 2, 0, 0]);
    }
}
