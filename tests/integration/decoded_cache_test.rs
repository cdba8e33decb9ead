//! Integration tests for the cache over real image files

use std::sync::Arc;

use slotcache::{CacheSettings, DecodeError, Identity, ImageCache};
use tempfile::TempDir;

use super::helpers::{write_garbage, write_gif, write_png};

fn settings(extra_slots: usize, pre_reading: bool) -> CacheSettings {
    CacheSettings {
        extra_slots,
        pre_reading,
    }
}

#[test]
fn browsing_with_pre_reading_decodes_each_file() {
    let dir = TempDir::new().unwrap();
    let files: Vec<_> = (1..=4)
        .map(|i| write_png(&dir, &format!("{}.png", i), i, i))
        .collect();
    let mut cache = ImageCache::open(settings(1, true), 2).unwrap();

    for (index, path) in files.iter().enumerate() {
        let slot = cache.get_image(path);
        assert!(slot.is_ready());
        let side = (index + 1) as u32;
        assert_eq!(slot.content().dimensions(), Some((side, side)));

        if let Some(next) = files.get(index + 1) {
            cache.pre_reading(next);
        }
        assert!(cache.len() <= cache.capacity());
    }

    cache.free_all_cache();
    assert!(cache.is_empty());
}

#[test]
fn pre_read_slot_is_handed_to_display() {
    let dir = TempDir::new().unwrap();
    let a = write_png(&dir, "a.png", 2, 2);
    let b = write_png(&dir, "b.png", 5, 4);
    let mut cache = ImageCache::open(settings(1, true), 1).unwrap();

    cache.get_image(&a);
    cache.pre_reading(&b);
    let pre_read = Arc::clone(cache.slot(1).unwrap());

    let shown = cache.get_image(&b);
    assert!(Arc::ptr_eq(&pre_read, &shown));
    assert!(shown.content().is_loaded());
    assert_eq!(shown.content().dimensions(), Some((5, 4)));
    assert_eq!(cache.position(cache.identify(&a)), Some(1));
}

#[test]
fn broken_file_is_ready_with_error() {
    let dir = TempDir::new().unwrap();
    let broken = write_garbage(&dir, "broken.jpg");
    let mut cache = ImageCache::open(settings(0, false), 1).unwrap();

    let slot = cache.get_image(&broken);
    assert!(slot.is_ready());
    assert!(matches!(
        slot.content().error(),
        Some(DecodeError::Image { .. })
    ));
}

#[test]
fn broken_pre_read_still_becomes_ready() {
    let dir = TempDir::new().unwrap();
    let a = write_png(&dir, "a.png", 2, 2);
    let missing = dir.path().join("missing.png");
    let mut cache = ImageCache::open(settings(0, true), 1).unwrap();

    cache.get_image(&a);
    cache.pre_reading(&missing);
    let slot = cache.get_image(&missing);

    assert!(slot.is_ready());
    assert!(matches!(slot.content().error(), Some(DecodeError::Io { .. })));
}

#[test]
fn animated_gif_rewinds_on_redisplay() {
    let dir = TempDir::new().unwrap();
    let gif = write_gif(&dir, "anim.gif", 3);
    let other = write_png(&dir, "other.png", 1, 1);
    let mut cache = ImageCache::open(settings(2, false), 1).unwrap();

    let slot = cache.get_image(&gif);
    assert!(slot.content().is_animated());
    assert_eq!(slot.content().frame_count(), 3);
    slot.content().advance();
    assert_eq!(slot.content().current_index(), 1);

    cache.get_image(&other);
    let again = cache.get_image(&gif);
    assert!(Arc::ptr_eq(&slot, &again));
    assert_eq!(again.content().current_index(), 0);
}

#[test]
fn rewritten_file_is_reloaded() {
    let dir = TempDir::new().unwrap();
    let path = write_png(&dir, "a.png", 2, 2);
    let mut cache = ImageCache::open(settings(2, false), 1).unwrap();

    let before = cache.get_image(&path).identity();
    write_png(&dir, "a.png", 9, 9);
    let slot = cache.get_image(&path);

    assert_ne!(slot.identity(), before);
    assert_eq!(slot.content().dimensions(), Some((9, 9)));
    assert_eq!(cache.len(), 2);
}

#[test]
fn empty_path_gives_blank_slot() {
    let mut cache = ImageCache::open(settings(1, true), 1).unwrap();
    let slot = cache.get_image("");
    assert!(slot.is_ready());
    assert_eq!(slot.identity(), Identity::INVALID);
    assert!(slot.content().dimensions().is_none());
}

#[test]
fn zero_loader_threads_is_an_error() {
    assert!(ImageCache::open(settings(1, true), 0).is_err());
}
