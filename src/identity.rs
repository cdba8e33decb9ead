//! Content identity for cached images
//!
//! Every resident slot is tagged with the identity of the file it holds.
//! Identities are compared, never interpreted.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Stable identity derived from a file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(u64);

impl Identity {
    /// The "no file" identity used for blank slots.
    pub const INVALID: Identity = Identity(0);

    /// Build an identity from a raw value.
    ///
    /// Zero is reserved for [`Identity::INVALID`].
    pub const fn from_raw(raw: u64) -> Self {
        Identity(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::INVALID
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{:016x}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}

/// Source of identities for the cache.
///
/// Implementations must be deterministic: the same file must yield the same
/// identity until its content changes.
pub trait IdentityProvider: Send {
    fn identify(&self, path: &Path) -> Identity;
}

impl<F> IdentityProvider for F
where
    F: Fn(&Path) -> Identity + Send,
{
    fn identify(&self, path: &Path) -> Identity {
        self(path)
    }
}

/// Default provider: SHA-256 over the path, file length and mtime.
///
/// Files that cannot be stat'ed (deleted, not yet written) are identified by
/// path alone, so lookups stay stable while the file is missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileIdentity;

impl IdentityProvider for FileIdentity {
    fn identify(&self, path: &Path) -> Identity {
        if path.as_os_str().is_empty() {
            return Identity::INVALID;
        }

        let mut hasher = Sha256::new();
        hasher.update(path_bytes(path));

        if let Ok(meta) = fs::metadata(path) {
            hasher.update(meta.len().to_le_bytes());
            let mtime = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .unwrap_or(0);
            hasher.update(mtime.to_le_bytes());
        }

        let digest = hasher.finalize();
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&digest[..8]);
        match u64::from_le_bytes(raw) {
            // 0 is reserved for INVALID
            0 => Identity(1),
            value => Identity(value),
        }
    }
}

/// Raw bytes of `path`, so distinct non-UTF-8 paths never collide.
#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(windows)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::windows::ffi::OsStrExt;
    path.as_os_str()
        .encode_wide()
        .flat_map(u16::to_le_bytes)
        .collect()
}

#[cfg(not(any(unix, windows)))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().as_bytes().to_vec()
}
