//! Slot-reusing image cache with pre-reading
//!
//! The cache keeps an ordered list of slots. Index 0 holds the image on
//! screen, index 1 is reserved for the pre-read "next" image when pre-reading
//! is enabled, and the remaining slots hold recently viewed images, oldest
//! last. The list never grows past [`CacheSettings::total`]; a full list
//! recycles its boundary slot instead of allocating.
//!
//! All list mutations happen on the thread that owns the cache. Background
//! loads only touch the content and readiness of their own slot.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::decoded::DecodedImage;
use crate::error::CacheError;
use crate::handle::{ImageContent, ImageSlot};
use crate::identity::{FileIdentity, Identity, IdentityProvider};
use crate::loader::BackgroundLoader;
use crate::pool::{LoaderPool, WorkerPool};

/// Capacity knobs for the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Slots kept for previously viewed images
    pub extra_slots: usize,
    /// Whether the next image is loaded in the background
    pub pre_reading: bool,
}

impl CacheSettings {
    /// Slots allowed: current image, pre-read slot if enabled, extra slots.
    pub fn total(&self) -> usize {
        1 + usize::from(self.pre_reading) + self.extra_slots
    }
}

/// Builds blank content for newly allocated slots.
pub type ContentFactory<C> = Box<dyn Fn() -> C + Send>;

/// Bounded cache of reusable image slots.
pub struct ImageCache<C: ImageContent> {
    /// Front = on screen / pre-read, back = oldest
    slots: Vec<Arc<ImageSlot<C>>>,
    settings: CacheSettings,
    pool: Arc<dyn WorkerPool>,
    identities: Box<dyn IdentityProvider>,
    new_content: ContentFactory<C>,
}

impl<C: ImageContent> ImageCache<C> {
    /// Create an empty cache.
    ///
    /// `new_content` is called whenever the list is below capacity and a new
    /// slot has to be allocated.
    pub fn new(
        settings: CacheSettings,
        pool: Arc<dyn WorkerPool>,
        new_content: impl Fn() -> C + Send + 'static,
    ) -> Self {
        Self {
            slots: Vec::new(),
            settings,
            pool,
            identities: Box::new(FileIdentity),
            new_content: Box::new(new_content),
        }
    }

    /// Replace the identity provider (defaults to [`FileIdentity`]).
    pub fn with_identity_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identities = Box::new(provider);
        self
    }

    /// Return a ready slot holding `path`, for display now.
    ///
    /// A resident slot with the same identity is reused, waiting for its
    /// background load if one is still running. Otherwise a slot is
    /// acquired and loaded on this thread. An empty path yields a blank slot
    /// with [`Identity::INVALID`].
    pub fn get_image(&mut self, path: impl AsRef<Path>) -> Arc<ImageSlot<C>> {
        let path = path.as_ref();
        let identity = self.identify(path);

        if let Some(slot) = self.take_by_identity(identity) {
            slot.wait_ready();
            slot.content().rewind();
            self.slots.insert(0, Arc::clone(&slot));
            trace!(%identity, path = %path.display(), "Cache hit");
            return slot;
        }

        let slot = self.new_or_reuse();
        self.slots.insert(0, Arc::clone(&slot));
        slot.set_identity(identity);
        if identity.is_valid() {
            slot.load_sync(path);
        } else {
            slot.mark_blank();
        }
        slot
    }

    /// Start loading the likely next image into the pre-read slot.
    ///
    /// Does nothing when pre-reading is disabled. Never blocks on a running
    /// load and never moves the image at index 0.
    pub fn pre_reading(&mut self, path: impl AsRef<Path>) {
        if !self.settings.pre_reading {
            return;
        }

        let path = path.as_ref();
        let identity = self.identify(path);

        if self.slots.first().map(|slot| slot.identity()) == Some(identity) {
            trace!(%identity, "Pre-read target already on screen");
            return;
        }

        if let Some(slot) = self.take_by_identity(identity) {
            let at = self.slots.len().min(1);
            self.slots.insert(at, slot);
            trace!(%identity, "Pre-read target already resident");
            return;
        }

        let slot = self.new_or_reuse();
        let at = self.slots.len().min(1);
        self.slots.insert(at, Arc::clone(&slot));
        slot.set_identity(identity);
        if identity.is_valid() {
            trace!(%identity, path = %path.display(), "Submitting pre-read");
            BackgroundLoader::new(&slot, path.to_path_buf()).submit(self.pool.as_ref());
        } else {
            slot.mark_blank();
        }
    }

    /// Set the number of extra slots for viewed images.
    ///
    /// Negative and unchanged values are ignored.
    pub fn set_cache_size(&mut self, extra_slots: i64) {
        let Ok(extra_slots) = usize::try_from(extra_slots) else {
            return;
        };
        if extra_slots == self.settings.extra_slots {
            return;
        }

        self.settings.extra_slots = extra_slots;
        self.cache_size_adjusted();
    }

    pub fn set_pre_reading_enabled(&mut self, enabled: bool) {
        self.settings.pre_reading = enabled;
        self.cache_size_adjusted();
    }

    /// Apply new settings in one step (e.g. after a config reload).
    pub fn apply_settings(&mut self, settings: CacheSettings) {
        self.settings = settings;
        self.cache_size_adjusted();
    }

    /// Shrink the list to the current capacity.
    ///
    /// Slots past capacity are released oldest first, each after its
    /// background load (if any) has finished.
    pub fn cache_size_adjusted(&mut self) {
        let total = self.settings.total();
        let mut released = 0;
        while self.slots.len() > total {
            if let Some(slot) = self.slots.pop() {
                release(slot);
                released += 1;
            }
        }
        if released > 0 {
            info!(released, total, "Released cache slots");
        }
    }

    /// Wait for every background load, then release all slots.
    pub fn free_all_cache(&mut self) {
        self.pool.wait_for_done();
        for slot in self.slots.drain(..) {
            release(slot);
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Slots allowed under the current settings
    pub fn capacity(&self) -> usize {
        self.settings.total()
    }

    /// Resident slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Identities of resident slots, front to back.
    pub fn identities(&self) -> Vec<Identity> {
        self.slots.iter().map(|slot| slot.identity()).collect()
    }

    /// Position of the slot holding `identity`, if resident.
    pub fn position(&self, identity: Identity) -> Option<usize> {
        self.slots.iter().position(|slot| slot.identity() == identity)
    }

    pub fn slot(&self, index: usize) -> Option<&Arc<ImageSlot<C>>> {
        self.slots.get(index)
    }

    /// Identity for `path`, INVALID for an empty path.
    pub fn identify(&self, path: &Path) -> Identity {
        if path.as_os_str().is_empty() {
            Identity::INVALID
        } else {
            self.identities.identify(path)
        }
    }

    /// Remove and return the resident slot tagged with `identity`.
    fn take_by_identity(&mut self, identity: Identity) -> Option<Arc<ImageSlot<C>>> {
        let index = self.position(identity)?;
        Some(self.slots.remove(index))
    }

    /// Allocate a new slot, or recycle the boundary slot when full.
    ///
    /// The boundary slot is the one at `total - 1`. Slots beyond it are left
    /// for the next capacity adjustment to release.
    fn new_or_reuse(&mut self) -> Arc<ImageSlot<C>> {
        let total = self.settings.total();
        debug!(
            extra = self.settings.extra_slots,
            total,
            resident = self.slots.len(),
            "Acquiring cache slot"
        );

        if self.slots.len() < total {
            return Arc::new(ImageSlot::new((self.new_content)()));
        }

        let slot = self.slots.remove(total - 1);
        // a stale pre-read may still be loading into it
        slot.wait_ready();
        slot.reset();
        slot
    }
}

impl ImageCache<DecodedImage> {
    /// Cache of decoded image files with its own loader thread pool.
    pub fn open(settings: CacheSettings, loader_threads: usize) -> Result<Self, CacheError> {
        let pool = LoaderPool::new(loader_threads)?;
        Ok(Self::new(settings, Arc::new(pool), DecodedImage::default))
    }
}

impl<C: ImageContent> Drop for ImageCache<C> {
    fn drop(&mut self) {
        self.free_all_cache();
    }
}

/// Drop the list's reference once no load is writing into the slot.
fn release<C: ImageContent>(slot: Arc<ImageSlot<C>>) {
    slot.wait_ready();
    drop(slot);
}
