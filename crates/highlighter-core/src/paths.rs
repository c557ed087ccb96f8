//! Shared store location resolution
//!
//! Both processes resolve the same well-known location: a fixed group
//! identifier mapped to a directory under the platform data dir. When that
//! cannot be resolved the store degrades to an ephemeral in-memory one
//! rather than failing to start.

use std::env;
use std::path::{Path, PathBuf};

/// Fixed group identifier shared by the app and the share surface
pub const SHARED_GROUP_ID: &str = "group.highlighter.app";

/// Store file name inside the shared container
pub const STORE_FILE_NAME: &str = "highlighter.db";

/// Environment override for the store file path
pub const DB_PATH_ENV: &str = "HIGHLIGHTER_DB_PATH";

/// Where a store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A real file both processes can reach
    OnDisk(PathBuf),
    /// Ephemeral fallback; never shared, never recovered
    InMemory,
}

impl StoreLocation {
    /// The on-disk path, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OnDisk(path) => Some(path),
            Self::InMemory => None,
        }
    }
}

/// The shared container directory for the fixed group identifier
#[must_use]
pub fn shared_container_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(SHARED_GROUP_ID))
}

/// The store file path inside the shared container
#[must_use]
pub fn shared_store_path() -> Option<PathBuf> {
    shared_container_dir().map(|dir| dir.join(STORE_FILE_NAME))
}

/// Resolve where the store should live.
///
/// Layering: explicit hint, then the `HIGHLIGHTER_DB_PATH` environment
/// override, then the shared container. An unresolvable container falls
/// back to a non-shared in-memory store.
#[must_use]
pub fn resolve_store_location(hint: Option<&Path>) -> StoreLocation {
    if let Some(path) = hint {
        return StoreLocation::OnDisk(path.to_path_buf());
    }

    if let Some(path) = env::var_os(DB_PATH_ENV) {
        return StoreLocation::OnDisk(PathBuf::from(path));
    }

    shared_store_path().map_or_else(
        || {
            tracing::warn!("Shared container unavailable; using in-memory store");
            StoreLocation::InMemory
        },
        StoreLocation::OnDisk,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_takes_precedence() {
        let hint = PathBuf::from("/tmp/custom.db");
        let location = resolve_store_location(Some(&hint));
        assert_eq!(location, StoreLocation::OnDisk(hint));
    }

    #[test]
    fn test_shared_store_path_uses_group_id() {
        if let Some(path) = shared_store_path() {
            let rendered = path.to_string_lossy().into_owned();
            assert!(rendered.contains(SHARED_GROUP_ID));
            assert!(rendered.ends_with(STORE_FILE_NAME));
        }
    }

    #[test]
    fn test_in_memory_location_has_no_path() {
        assert!(StoreLocation::InMemory.path().is_none());
        assert!(StoreLocation::OnDisk(PathBuf::from("/x")).path().is_some());
    }
}
