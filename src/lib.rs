//! slotcache Library
//!
//! A bounded, slot-reusing cache of decoded images for interactive viewers,
//! with background pre-reading of the next image.

pub mod cache;
pub mod cli;
pub mod config;
pub mod decoded;
pub mod error;
pub mod handle;
pub mod identity;
pub mod loader;
pub mod pool;

pub use cache::{CacheSettings, ImageCache};
pub use config::Config;
pub use decoded::{DecodeError, DecodedImage, LoadState};
pub use error::CacheError;
pub use handle::{ImageContent, ImageSlot};
pub use identity::{FileIdentity, Identity, IdentityProvider};
pub use pool::{InlinePool, LoaderPool, WorkerPool};
