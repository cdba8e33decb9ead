//! Background loader task
//!
//! A loader is bound to one slot and one path. It holds only a weak
//! reference: the slot list keeps ownership, and the cache never drops a
//! slot before its readiness flag is raised.

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::handle::{ImageContent, ImageSlot};
use crate::pool::{Task, WorkerPool};

pub struct BackgroundLoader<C> {
    slot: Weak<ImageSlot<C>>,
    path: PathBuf,
}

impl<C: ImageContent> BackgroundLoader<C> {
    pub fn new(slot: &Arc<ImageSlot<C>>, path: PathBuf) -> Self {
        Self {
            slot: Arc::downgrade(slot),
            path,
        }
    }

    /// Populate the slot, raising its readiness flag as the last step.
    pub fn run(self) {
        match self.slot.upgrade() {
            Some(slot) => slot.load_async(&self.path),
            None => trace!(path = %self.path.display(), "Slot gone before background load"),
        }
    }

    pub fn into_task(self) -> Task {
        Box::new(move || self.run())
    }

    /// Hand the load to `pool`.
    pub fn submit(self, pool: &dyn WorkerPool) {
        pool.submit(self.into_task());
    }
}
