//! The blocking/try/timed/copy operation surface on [`Handle`].
//!
//! `next*` routes to the ring's push or pop depending on the handle's
//! [`Mode`] at call time.

use std::time::Duration;

use crate::error::ChanError;
use crate::handle::{Handle, Inner, Mode};
use crate::sync::TrackedGuard;

impl Handle {
    /// Pushes or pops one item, blocking indefinitely until it can proceed
    /// or a termination condition fails it.
    ///
    /// # Panics
    ///
    /// Panics if called on a [`Mode::Neutral`] handle.
    pub fn next(&self, buf: &mut Vec<u8>) -> Result<(), ChanError> {
        self.next_with_timeout(buf, None)
    }

    /// Zero-timeout variant: fails immediately instead of blocking.
    pub fn next_try(&self, buf: &mut Vec<u8>) -> Result<(), ChanError> {
        self.next_with_timeout(buf, Some(Duration::ZERO))
    }

    /// Bounded-wait variant: fails with [`ChanError::TimedOut`] if `timeout`
    /// elapses before the operation can proceed.
    pub fn next_timed(&self, buf: &mut Vec<u8>, timeout: Duration) -> Result<(), ChanError> {
        self.next_with_timeout(buf, Some(timeout))
    }

    fn next_with_timeout(&self, buf: &mut Vec<u8>, timeout: Option<Duration>) -> Result<(), ChanError> {
        match self.mode {
            Mode::Write => {
                let mut guard = self.wait_until_writable(timeout)?;
                let expand = guard.expand_on_full;
                guard.ring.push(buf, expand);
                drop(guard);
                self.shared.notempty.notify_all();
                Ok(())
            }
            Mode::Read => {
                let mut guard = self.wait_until_poppable(timeout)?;
                guard
                    .ring
                    .pop(buf)
                    .expect("wait_until_poppable guarantees a non-empty queue");
                drop(guard);
                self.shared.notfull.notify_all();
                Ok(())
            }
            Mode::Neutral => panic!("next() requires a read- or write-mode handle, not neutral"),
        }
    }

    /// Same as [`Handle::next`], but decouples the caller's buffer from the
    /// queue's slot storage via the channel's scratch `workspace`.
    pub fn next_copy(&self, buf: &mut Vec<u8>) -> Result<(), ChanError> {
        self.next_copy_with_timeout(buf, None)
    }

    pub fn next_copy_try(&self, buf: &mut Vec<u8>) -> Result<(), ChanError> {
        self.next_copy_with_timeout(buf, Some(Duration::ZERO))
    }

    pub fn next_copy_timed(&self, buf: &mut Vec<u8>, timeout: Duration) -> Result<(), ChanError> {
        self.next_copy_with_timeout(buf, Some(timeout))
    }

    fn next_copy_with_timeout(
        &self,
        buf: &mut Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<(), ChanError> {
        match self.mode {
            Mode::Write => {
                let mut guard = self.wait_until_writable(timeout)?;
                // The copy path unconditionally resizes the payload to fit
                // the caller's buffer, even when it's smaller — resize_payload
                // is itself a no-op in that case.
                guard.ring.resize_payload(buf.len());
                let target = guard.ring.buffer_bytes();
                if guard.workspace.len() < target {
                    guard.workspace.resize(target, 0);
                }
                let n = buf.len().min(guard.workspace.len());
                guard.workspace[..n].copy_from_slice(&buf[..n]);

                let expand = guard.expand_on_full;
                let mut workspace = std::mem::take(&mut guard.workspace);
                guard.ring.push(&mut workspace, expand);
                guard.workspace = workspace;
                drop(guard);
                self.shared.notempty.notify_all();
                Ok(())
            }
            Mode::Read => {
                let mut guard = self.wait_until_poppable(timeout)?;
                // The read side resizes the payload to fit the caller's
                // destination buffer too, just like the write side resizes
                // to fit the source buffer, so a reader passing a larger
                // `buf` can grow the channel's payload size from the pop
                // side as well.
                guard.ring.resize_payload(buf.len());
                let target = guard.ring.buffer_bytes();
                if guard.workspace.len() < target {
                    guard.workspace.resize(target, 0);
                }
                let mut workspace = std::mem::take(&mut guard.workspace);
                guard
                    .ring
                    .pop(&mut workspace)
                    .expect("wait_until_poppable guarantees a non-empty queue");
                guard.workspace = workspace;

                let payload_len = guard.workspace.len();
                if buf.len() < payload_len {
                    buf.resize(payload_len, 0);
                }
                buf[..payload_len].copy_from_slice(&guard.workspace);
                drop(guard);
                self.shared.notfull.notify_all();
                Ok(())
            }
            Mode::Neutral => {
                panic!("next_copy() requires a read- or write-mode handle, not neutral")
            }
        }
    }

    /// Non-destructive read of the oldest item into `dst`, without removing
    /// it. Any non-neutral handle may peek.
    ///
    /// # Panics
    ///
    /// Panics if called on a [`Mode::Neutral`] handle.
    pub fn peek(&self, dst: &mut Vec<u8>) -> Result<(), ChanError> {
        self.peek_with_timeout(dst, None)
    }

    pub fn peek_try(&self, dst: &mut Vec<u8>) -> Result<(), ChanError> {
        self.peek_with_timeout(dst, Some(Duration::ZERO))
    }

    pub fn peek_timed(&self, dst: &mut Vec<u8>, timeout: Duration) -> Result<(), ChanError> {
        self.peek_with_timeout(dst, Some(timeout))
    }

    fn peek_with_timeout(
        &self,
        dst: &mut Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<(), ChanError> {
        if self.mode == Mode::Neutral {
            panic!("peek() requires a read- or write-mode handle, not neutral");
        }
        let guard = self.wait_until_poppable(timeout)?;
        guard.ring.peek(dst)
    }

    /// Blocks until `ref_count` equals `n`.
    pub fn wait_for_ref_count(&self, n: usize) {
        let mut guard = self.shared.state.lock();
        while guard.ref_count != n {
            guard = guard.wait(&self.shared.ref_count_changed);
        }
    }

    /// Blocks until `nwriters` equals `n`.
    pub fn wait_for_writer_count(&self, n: usize) {
        let mut guard = self.shared.state.lock();
        while guard.nwriters != n {
            guard = guard.wait(&self.shared.writer_count_changed);
        }
    }

    /// Blocks until at least one reader is open.
    pub fn wait_for_have_reader(&self) {
        let mut guard = self.shared.state.lock();
        while guard.nreaders == 0 {
            guard = guard.wait(&self.shared.reader_count_changed);
        }
    }

    /// Sets the expand-on-full policy. Turning it on wakes any writers
    /// currently blocked on a full queue.
    pub fn set_expand_on_full(&self, flag: bool) {
        let mut guard = self.shared.state.lock();
        guard.expand_on_full = flag;
        drop(guard);
        if flag {
            self.shared.notfull.notify_all();
        }
    }

    /// Blocks (subject to `timeout`) until the queue is not full or
    /// expansion is enabled, then returns the held lock.
    fn wait_until_writable(&self, timeout: Option<Duration>) -> Result<TrackedGuard<'_, Inner>, ChanError> {
        let mut guard = self.shared.state.lock();
        if timeout == Some(Duration::ZERO) {
            return if guard.ring.is_full() {
                Err(ChanError::Full)
            } else {
                Ok(guard)
            };
        }
        if guard.ring.is_full() && !guard.expand_on_full {
            match timeout {
                None => {
                    while guard.ring.is_full() && !guard.expand_on_full {
                        guard = guard.wait(&self.shared.notfull);
                    }
                }
                Some(d) => {
                    let (g, result) = guard.wait_timeout_while(&self.shared.notfull, d, |inner| {
                        inner.ring.is_full() && !inner.expand_on_full
                    });
                    guard = g;
                    if result.timed_out() && guard.ring.is_full() && !guard.expand_on_full {
                        return Err(ChanError::TimedOut);
                    }
                }
            }
        }
        Ok(guard)
    }

    /// Blocks (subject to `timeout`) until the queue is not empty or the
    /// draining bypass applies, then returns the held lock. Shared by both
    /// `next` (read mode, which then pops) and `peek` (which doesn't).
    fn wait_until_poppable(&self, timeout: Option<Duration>) -> Result<TrackedGuard<'_, Inner>, ChanError> {
        let mut guard = self.shared.state.lock();
        let bypass = |inner: &Inner| inner.nwriters == 0 && inner.flush;
        if timeout == Some(Duration::ZERO) {
            return if guard.ring.is_empty() {
                Err(if bypass(&guard) {
                    ChanError::Drained
                } else {
                    ChanError::Empty
                })
            } else {
                Ok(guard)
            };
        }
        if guard.ring.is_empty() && !bypass(&guard) {
            match timeout {
                None => {
                    while guard.ring.is_empty() && !bypass(&guard) {
                        guard = guard.wait(&self.shared.notempty);
                    }
                }
                Some(d) => {
                    let (g, result) = guard.wait_timeout_while(&self.shared.notempty, d, |inner| {
                        inner.ring.is_empty() && !(inner.nwriters == 0 && inner.flush)
                    });
                    guard = g;
                    if result.timed_out() && guard.ring.is_empty() && !bypass(&guard) {
                        return Err(ChanError::TimedOut);
                    }
                }
            }
        }
        if guard.ring.is_empty() {
            // The last writer closed and drained while we waited.
            return Err(ChanError::Drained);
        }
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn small_channel() -> Handle {
        Handle::alloc(Config::new(4, 4).unwrap())
    }

    #[test]
    fn push_then_pop_round_trips() {
        let root = small_channel();
        let writer = root.open(Mode::Write);
        let reader = root.open(Mode::Read);

        let mut item = vec![42u8; 4];
        writer.next_try(&mut item).unwrap();

        let mut out = vec![0u8; 4];
        reader.next_try(&mut out).unwrap();
        assert_eq!(out, vec![42u8; 4]);
    }

    #[test]
    fn next_try_fails_on_full_and_empty() {
        let root = small_channel();
        let writer = root.open(Mode::Write);
        let reader = root.open(Mode::Read);

        assert_eq!(reader.next_try(&mut vec![0u8; 4]), Err(ChanError::Empty));

        for _ in 0..4 {
            writer.next_try(&mut vec![1u8; 4]).unwrap();
        }
        assert_eq!(writer.next_try(&mut vec![1u8; 4]), Err(ChanError::Full));
    }

    #[test]
    fn drain_after_last_writer_closes() {
        let root = small_channel();
        let writer = root.open(Mode::Write);
        let reader = root.open(Mode::Read);

        writer.next_try(&mut vec![1u8; 4]).unwrap();
        drop(writer);

        reader.next_try(&mut vec![0u8; 4]).unwrap(); // drains the one item
        assert_eq!(reader.next_try(&mut vec![0u8; 4]), Err(ChanError::Drained));
    }

    #[test]
    fn expand_on_full_grows_instead_of_blocking() {
        let root = small_channel();
        let writer = root.open(Mode::Write);

        for _ in 0..4 {
            writer.next_try(&mut vec![1u8; 4]).unwrap();
        }
        assert_eq!(writer.next_try(&mut vec![1u8; 4]), Err(ChanError::Full));

        writer.set_expand_on_full(true);
        writer.next(&mut vec![1u8; 4]).unwrap();
        assert_eq!(writer.buffer_count(), 8);
    }

    #[test]
    fn peek_does_not_consume() {
        let root = small_channel();
        let writer = root.open(Mode::Write);
        let reader = root.open(Mode::Read);

        writer.next_try(&mut vec![9u8; 4]).unwrap();
        let mut peeked = vec![0u8; 4];
        reader.peek_try(&mut peeked).unwrap();
        assert_eq!(peeked, vec![9u8; 4]);
        assert!(!reader.is_empty());
    }

    #[test]
    fn next_copy_round_trips_through_workspace() {
        let root = small_channel();
        let writer = root.open(Mode::Write);
        let reader = root.open(Mode::Read);

        let mut src = vec![7u8; 4];
        writer.next_copy_try(&mut src).unwrap();
        let mut dst = vec![0u8; 4];
        reader.next_copy_try(&mut dst).unwrap();
        assert_eq!(dst, vec![7u8; 4]);
    }

    #[test]
    #[should_panic(expected = "requires a read- or write-mode handle")]
    fn next_on_neutral_handle_panics() {
        let root = small_channel();
        root.next(&mut vec![0u8; 4]).unwrap();
    }

    #[test]
    fn wait_for_ref_count_observes_open_and_close() {
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration as StdDuration;

        let root = Arc::new(small_channel());
        let watcher = Arc::clone(&root);
        let handle = thread::spawn(move || watcher.wait_for_ref_count(2));

        thread::sleep(StdDuration::from_millis(20));
        let reader = root.open(Mode::Read);
        handle.join().unwrap();
        drop(reader);
    }
}
