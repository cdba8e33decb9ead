//! Decoded image content backed by the `image` crate
//!
//! Still images decode to a single RGBA frame. GIFs decode to every frame
//! with its delay so the viewer can animate them. A failed decode is kept as
//! [`LoadState::Failed`]; the slot still becomes ready and the viewer shows
//! the error instead of an image.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, ImageReader, RgbaImage};
use tracing::{debug, warn};

use crate::handle::ImageContent;

/// Errors produced while decoding an image file.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No frames in {path}")]
    NoFrames { path: PathBuf },
}

/// One displayable frame.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub buffer: RgbaImage,
    /// How long to show this frame (zero for still images)
    pub delay: Duration,
}

/// What a [`DecodedImage`] currently holds.
#[derive(Debug, Default)]
pub enum LoadState {
    /// Recycled or never loaded
    #[default]
    Empty,
    Loaded,
    Failed(DecodeError),
}

/// Production content for [`crate::ImageSlot`].
#[derive(Debug, Default)]
pub struct DecodedImage {
    path: Option<PathBuf>,
    frames: Vec<DecodedFrame>,
    current: usize,
    state: LoadState,
}

impl DecodedImage {
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded)
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match &self.state {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Path of the last load, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Width and height of the first frame
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|frame| frame.buffer.dimensions())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn current_frame(&self) -> Option<&DecodedFrame> {
        self.frames.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Step to the next frame, wrapping around.
    ///
    /// Returns how long the new frame should stay on screen.
    pub fn advance(&mut self) -> Option<Duration> {
        if self.frames.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.frames.len();
        self.current_frame().map(|frame| frame.delay)
    }

    /// Bytes held by decoded pixel buffers
    pub fn byte_size(&self) -> usize {
        self.frames
            .iter()
            .map(|frame| frame.buffer.as_raw().len())
            .sum()
    }
}

impl ImageContent for DecodedImage {
    fn recycle(&mut self) {
        self.path = None;
        self.frames = Vec::new();
        self.current = 0;
        self.state = LoadState::Empty;
    }

    fn load(&mut self, path: &Path) {
        self.recycle();
        self.path = Some(path.to_path_buf());

        match decode(path) {
            Ok(frames) => {
                debug!(
                    path = %path.display(),
                    frames = frames.len(),
                    "Decoded image"
                );
                self.frames = frames;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                warn!(error = %err, "Image decode failed");
                self.state = LoadState::Failed(err);
            }
        }
    }

    fn rewind(&mut self) {
        self.current = 0;
    }
}

fn decode(path: &Path) -> Result<Vec<DecodedFrame>, DecodeError> {
    let io_error = |source: std::io::Error| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let image_error = |source: image::ImageError| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;

    let frames = if reader.format() == Some(ImageFormat::Gif) {
        let file = File::open(path).map_err(io_error)?;
        let decoder = GifDecoder::new(BufReader::new(file)).map_err(image_error)?;
        decoder
            .into_frames()
            .collect_frames()
            .map_err(image_error)?
            .into_iter()
            .map(|frame| DecodedFrame {
                delay: Duration::from(frame.delay()),
                buffer: frame.into_buffer(),
            })
            .collect()
    } else {
        let image = reader.decode().map_err(image_error)?;
        vec![DecodedFrame {
            buffer: image.to_rgba8(),
            delay: Duration::ZERO,
        }]
    };

    if frames.is_empty() {
        return Err(DecodeError::NoFrames {
            path: path.to_path_buf(),
        });
    }
    Ok(frames)
}
