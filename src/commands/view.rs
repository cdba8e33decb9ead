//! View command handler

use anyhow::Result;
use humansize::{format_size, BINARY};

use slotcache::cli::ViewArgs;
use slotcache::{Config, DecodedImage, ImageCache, ImageSlot};

/// Browse files in order through the cache, pre-reading the next one.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: &ViewArgs) -> Result<()> {
    let config = Config::load()?;
    let mut settings = config.cache_settings();
    if let Some(extra) = args.extra {
        settings.extra_slots = extra;
    }
    if args.no_pre_reading {
        settings.pre_reading = false;
    }
    let threads = args.threads.unwrap_or_else(|| config.loader_threads());

    let mut cache = ImageCache::open(settings, threads)?;
    println!(
        "Cache: {} slot(s), pre-reading {}",
        cache.capacity(),
        if settings.pre_reading { "on" } else { "off" }
    );

    for (index, path) in args.files.iter().enumerate() {
        let slot = cache.get_image(path);
        println!(
            "{:>3}  {}  {}",
            index + 1,
            path.display(),
            describe(&slot)
        );

        if let Some(next) = args.files.get(index + 1) {
            cache.pre_reading(next);
        }
        println!("     resident: {}/{}", cache.len(), cache.capacity());
    }

    cache.free_all_cache();
    Ok(())
}

/// One-line summary of what a slot holds.
pub fn describe(slot: &ImageSlot<DecodedImage>) -> String {
    let image = slot.content();
    if let Some(err) = image.error() {
        return format!("[{}] error: {}", slot.identity(), err);
    }
    match image.dimensions() {
        Some((width, height)) => format!(
            "[{}] {}x{}, {} frame(s), {}",
            slot.identity(),
            width,
            height,
            image.frame_count(),
            format_size(image.byte_size(), BINARY)
        ),
        None => format!("[{}] blank", slot.identity()),
    }
}
