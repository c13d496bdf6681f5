//! Storage layout for chapter locations.
//!
//! The storage root is an explicit configuration value injected at
//! construction time, never read from ambient process state, so multiple
//! instances and tests can run against independent roots.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Computes on-disk locations for versioned entities under a single root.
///
/// A chapter lives at `{root}/{owner}/chapter/{uuid}`; that directory is the
/// unit the Revision Store commits and walks.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StorageLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage location for one chapter identity.
    pub fn chapter_dir(&self, owner: &str, id: &Uuid) -> PathBuf {
        self.root.join(owner).join("chapter").join(id.to_string())
    }
}
