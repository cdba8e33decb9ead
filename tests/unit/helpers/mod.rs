//! Test helper utilities

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use slotcache::{CacheSettings, ImageCache, ImageContent, LoaderPool};

/// Paths containing this marker block in `load` until the gate opens.
pub const SLOW: &str = "slow";

/// Paths containing this marker make `load` panic.
pub const PANICS: &str = "boom";

/// Holds back loads of slow paths until opened.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }

    /// Open the gate from another thread after `delay`.
    pub fn open_after(self: &Arc<Self>, delay: Duration) -> std::thread::JoinHandle<()> {
        let gate = Arc::clone(self);
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            gate.open();
        })
    }

    fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
    }
}

/// What happened to every content instance created by a test cache.
#[derive(Default)]
pub struct LoadLog {
    pub started: Mutex<Vec<PathBuf>>,
    pub finished: Mutex<Vec<PathBuf>>,
    /// One entry per dropped content: whether its last load had finished
    pub dropped: Mutex<Vec<bool>>,
    pub created: Mutex<usize>,
}

impl LoadLog {
    pub fn started(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    pub fn finished(&self) -> usize {
        self.finished.lock().unwrap().len()
    }

    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }

    pub fn finished_path(&self, path: &str) -> bool {
        self.finished
            .lock()
            .unwrap()
            .iter()
            .any(|p| p == Path::new(path))
    }
}

/// Content whose loads of slow paths wait on a [`Gate`].
pub struct GatedContent {
    gate: Arc<Gate>,
    log: Arc<LoadLog>,
    pub path: Option<PathBuf>,
    loading: bool,
}

impl ImageContent for GatedContent {
    fn recycle(&mut self) {
        self.path = None;
        self.loading = false;
    }

    fn load(&mut self, path: &Path) {
        self.loading = true;
        self.log.started.lock().unwrap().push(path.to_path_buf());
        if path.to_string_lossy().contains(SLOW) {
            self.gate.wait();
        }
        if path.to_string_lossy().contains(PANICS) {
            panic!("decoder failed on {}", path.display());
        }
        self.path = Some(path.to_path_buf());
        self.log.finished.lock().unwrap().push(path.to_path_buf());
        self.loading = false;
    }
}

impl Drop for GatedContent {
    fn drop(&mut self) {
        self.log.dropped.lock().unwrap().push(!self.loading);
    }
}

/// Cache of gated content on a real loader pool.
pub fn gated_cache(
    extra_slots: usize,
    pre_reading: bool,
) -> (ImageCache<GatedContent>, Arc<Gate>, Arc<LoadLog>) {
    let gate = Arc::new(Gate::default());
    let log = Arc::new(LoadLog::default());
    let pool = LoaderPool::new(2).expect("Failed to build loader pool");

    let factory_gate = Arc::clone(&gate);
    let factory_log = Arc::clone(&log);
    let cache = ImageCache::new(
        CacheSettings {
            extra_slots,
            pre_reading,
        },
        Arc::new(pool),
        move || {
            *factory_log.created.lock().unwrap() += 1;
            GatedContent {
                gate: Arc::clone(&factory_gate),
                log: Arc::clone(&factory_log),
                path: None,
                loading: false,
            }
        },
    );

    (cache, gate, log)
}
