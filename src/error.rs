//! Cache errors.

/// Errors that can occur while setting up the cache.
///
/// Lookups never fail: decode problems live in the content of the slot.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to build loader thread pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("Loader thread count must be at least 1")]
    NoLoaderThreads,
}
