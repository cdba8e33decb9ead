//! Test helper utilities

#![allow(dead_code)]

use std::fs::File;
use std::path::PathBuf;

use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, Rgba, RgbaImage};
use tempfile::TempDir;

/// Write a solid-color PNG into `dir`.
pub fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]))
        .save(&path)
        .expect("Failed to write png fixture");
    path
}

/// Write an animated GIF with `frames` frames into `dir`.
pub fn write_gif(dir: &TempDir, name: &str, frames: usize) -> PathBuf {
    let path = dir.path().join(name);
    let file = File::create(&path).expect("Failed to create gif fixture");
    {
        let mut encoder = GifEncoder::new(file);
        let frames = (0..frames).map(|i| {
            let shade = (i * 40) as u8;
            Frame::from_parts(
                RgbaImage::from_pixel(3, 3, Rgba([shade, shade, shade, 255])),
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            )
        });
        encoder
            .encode_frames(frames)
            .expect("Failed to encode gif fixture");
    }
    path
}

/// Write bytes that are not an image.
pub fn write_garbage(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"definitely not pixels").expect("Failed to write fixture");
    path
}
