//! Reusable image handles
//!
//! An [`ImageSlot`] is the unit the cache hands out. It pairs decoded content
//! with a readiness flag and the identity of the file it currently holds.
//! Slots are recycled in place rather than reallocated.
//!
//! The readiness flag is the only signal crossing threads: a background load
//! writes the content and then raises the flag under the same mutex the
//! foreground waits on, so a reader that sees `ready == true` also sees the
//! finished content.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{error, trace};

use crate::identity::Identity;

/// Decoded content held by a slot.
///
/// `load` must always leave the content in a displayable state. Failures are
/// encoded in the content itself; the slot becomes ready either way.
pub trait ImageContent: Send + 'static {
    /// Drop decoded data and return to a blank, reusable state.
    fn recycle(&mut self);

    /// Decode `path` into this content.
    fn load(&mut self, path: &Path);

    /// Restart playback from the first frame.
    ///
    /// Called when a cached slot is displayed again.
    fn rewind(&mut self) {}
}

/// A cache slot: content, readiness and identity.
pub struct ImageSlot<C> {
    content: Mutex<C>,
    ready: Mutex<bool>,
    ready_changed: Condvar,
    identity: AtomicU64,
}

impl<C: ImageContent> ImageSlot<C> {
    /// Create a blank, not-ready slot around `content`.
    pub fn new(content: C) -> Self {
        Self {
            content: Mutex::new(content),
            ready: Mutex::new(false),
            ready_changed: Condvar::new(),
            identity: AtomicU64::new(Identity::INVALID.as_raw()),
        }
    }

    /// Lock the content for display.
    pub fn content(&self) -> MutexGuard<'_, C> {
        self.content.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return to a blank state: content recycled, not ready, invalid identity.
    pub fn reset(&self) {
        self.content().recycle();
        self.set_ready(false);
        self.set_identity(Identity::INVALID);
    }

    pub fn set_ready(&self, ready: bool) {
        let mut flag = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        *flag = ready;
        if ready {
            self.ready_changed.notify_all();
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the readiness flag is raised.
    pub fn wait_ready(&self) {
        let mut flag = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        while !*flag {
            trace!(identity = %self.identity(), "Waiting for background load");
            flag = self
                .ready_changed
                .wait(flag)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn set_identity(&self, identity: Identity) {
        self.identity.store(identity.as_raw(), Ordering::Release);
    }

    pub fn identity(&self) -> Identity {
        Identity::from_raw(self.identity.load(Ordering::Acquire))
    }

    /// Load `path` on the calling thread and mark the slot ready.
    pub fn load_sync(&self, path: &Path) {
        self.populate(path);
        self.set_ready(true);
    }

    /// Worker-side population routine.
    ///
    /// Raising the flag is the final step, after the content lock is released.
    pub fn load_async(&self, path: &Path) {
        self.populate(path);
        trace!(identity = %self.identity(), path = %path.display(), "Background load finished");
        self.set_ready(true);
    }

    /// Run `ImageContent::load`, leaving recycled content if it panics.
    ///
    /// The caller raises the flag afterwards either way, so waiters never hang.
    fn populate(&self, path: &Path) {
        let mut content = self.content();
        let loaded = panic::catch_unwind(AssertUnwindSafe(|| content.load(path)));
        if loaded.is_err() {
            error!(path = %path.display(), "Image load panicked, slot left blank");
            content.recycle();
        }
    }

    /// Mark ready with blank content (empty path).
    pub fn mark_blank(&self) {
        self.set_ready(true);
    }
}
