//! Mode-tagged, reference-counted channel handles.
//!
//! The neutral/root handle returned by `alloc` and the per-open handles
//! returned by `open` are all the same [`Handle`] type, distinguished only
//! by their [`Mode`] — opening is `Handle::open`, closing is `Handle`'s
//! `Drop` impl, and allocation is `Handle::alloc`.

use std::sync::{Arc, Condvar};

use crate::config::Config;
use crate::invariants::{debug_assert_flush_implies_no_writers, debug_assert_ref_count_bounds};
use crate::ring::Ring;
use crate::sync::TrackedMutex;

/// What a [`Handle`] is allowed to do: push (`Write`), pop (`Read`), or
/// neither (`Neutral`, the handle `alloc` returns before any `open`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Neutral,
    Read,
    Write,
}

/// State shared by every handle on one channel, guarded by a single mutex.
pub(crate) struct Inner {
    pub(crate) ring: Ring,
    pub(crate) nreaders: usize,
    pub(crate) nwriters: usize,
    pub(crate) ref_count: usize,
    pub(crate) expand_on_full: bool,
    pub(crate) flush: bool,
    pub(crate) workspace: Vec<u8>,
}

/// The mutex plus the five condition variables that arbitrate access to
/// [`Inner`]: `notfull` and `notempty` gate the ring itself, and
/// `ref_count_changed`/`writer_count_changed`/`reader_count_changed` let
/// coordinators rendezvous on handle counts before flipping a stop flag.
pub(crate) struct Shared {
    pub(crate) state: TrackedMutex<Inner>,
    pub(crate) notfull: Condvar,
    pub(crate) notempty: Condvar,
    pub(crate) ref_count_changed: Condvar,
    pub(crate) writer_count_changed: Condvar,
    pub(crate) reader_count_changed: Condvar,
}

/// A reference-counted handle onto one channel's shared state.
///
/// Cheap to clone via [`Handle::open`] (bumps `ref_count` under the lock);
/// released via `Drop` — a `Handle` is always a valid owned value until
/// it's dropped exactly once, so there's no separate "close on null" case
/// to handle.
pub struct Handle {
    pub(crate) shared: Arc<Shared>,
    pub(crate) mode: Mode,
}

impl Handle {
    /// Allocates a new channel and returns its neutral (unopened) handle,
    /// with `ref_count == 1`.
    pub fn alloc(config: Config) -> Self {
        let ring = Ring::new(config.buffer_count(), config.buffer_bytes());
        let workspace = vec![0u8; config.buffer_bytes()];
        let inner = Inner {
            ring,
            nreaders: 0,
            nwriters: 0,
            ref_count: 1,
            expand_on_full: false,
            flush: false,
            workspace,
        };
        let shared = Arc::new(Shared {
            state: TrackedMutex::new(inner),
            notfull: Condvar::new(),
            notempty: Condvar::new(),
            ref_count_changed: Condvar::new(),
            writer_count_changed: Condvar::new(),
            reader_count_changed: Condvar::new(),
        });
        Handle {
            shared,
            mode: Mode::Neutral,
        }
    }

    /// Builds an independent channel with the same dimensions as this one,
    /// for assembling pipelines of parallel stages that each need their
    /// own queue.
    pub fn alloc_copy(&self) -> Self {
        let guard = self.shared.state.lock();
        let config = Config::new(guard.ring.capacity(), guard.ring.buffer_bytes())
            .expect("a live ring always has valid dimensions");
        drop(guard);
        Self::alloc(config)
    }

    /// Opens a new handle sharing this channel's state, in `mode`.
    pub fn open(&self, mode: Mode) -> Self {
        let mut guard = self.shared.state.lock();
        guard.ref_count += 1;
        match mode {
            Mode::Read => {
                guard.nreaders += 1;
                if guard.ring.is_empty() {
                    guard.flush = false;
                }
            }
            Mode::Write => {
                guard.nwriters += 1;
                guard.flush = false;
            }
            Mode::Neutral => {}
        }
        debug_assert_ref_count_bounds!(guard.ref_count, guard.nreaders, guard.nwriters);
        drop(guard);

        self.shared.ref_count_changed.notify_all();
        match mode {
            Mode::Read => self.shared.reader_count_changed.notify_all(),
            Mode::Write => self.shared.writer_count_changed.notify_all(),
            Mode::Neutral => {}
        }

        Handle {
            shared: Arc::clone(&self.shared),
            mode,
        }
    }

    /// The handle's mode (`Neutral`, `Read`, or `Write`).
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// A stable identity for the shared state, for detecting two handles
    /// that share the same channel.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.shared) as usize
    }

    pub fn is_full(&self) -> bool {
        self.shared.state.lock().ring.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().ring.is_empty()
    }

    pub fn ref_count(&self) -> usize {
        self.shared.state.lock().ref_count
    }

    pub fn buffer_bytes(&self) -> usize {
        self.shared.state.lock().ring.buffer_bytes()
    }

    pub fn buffer_count(&self) -> usize {
        self.shared.state.lock().ring.capacity()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        let mut guard = self.shared.state.lock();
        let mut notify_notempty = false;
        match self.mode {
            Mode::Read => {
                guard.nreaders -= 1;
                if guard.nreaders == 0 {
                    guard.flush = false;
                }
            }
            Mode::Write => {
                guard.nwriters -= 1;
                if guard.nwriters == 0 {
                    guard.flush = true;
                    notify_notempty = true;
                }
            }
            Mode::Neutral => {}
        }
        guard.ref_count -= 1;
        debug_assert_flush_implies_no_writers!(guard.flush, guard.nwriters);
        debug_assert_ref_count_bounds!(guard.ref_count, guard.nreaders, guard.nwriters);
        drop(guard);

        // A writer close always notifies the writer-count watchers,
        // regardless of whether the count reached zero; `notempty` is only
        // notified when the last writer just left.
        match self.mode {
            Mode::Write => self.shared.writer_count_changed.notify_all(),
            Mode::Read => self.shared.reader_count_changed.notify_all(),
            Mode::Neutral => {}
        }
        if notify_notempty {
            self.shared.notempty.notify_all();
        }
        self.shared.ref_count_changed.notify_all();

        // Destruction of `Shared` itself happens when the last `Arc` clone
        // drops, which is exactly this `ref_count` bookkeeping mirrored by
        // Rust's own reference counting — no separate destroy step needed.
    }
}
