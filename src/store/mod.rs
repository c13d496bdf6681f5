//! Revision Store collaborator boundary.
//!
//! Persistence and history are delegated to a revision-control collaborator;
//! this crate consumes the small verb set below, always parameterized by the
//! storage location being acted on. The default implementation is
//! [`GitRevisionStore`].

use crate::error::StoreError;
use crate::types::RevisionId;
use async_trait::async_trait;
use std::path::Path;

pub mod git;
pub mod layout;

pub use git::GitRevisionStore;
pub use layout::StorageLayout;

/// Committer identity recorded on commits made through the store.
pub const DEFAULT_COMMITTER_EMAIL: &str = "test@test.com";

/// Identity attached to commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committer {
    pub username: String,
    pub email: String,
}

impl Committer {
    /// The fixed system-default identity used for chapter commits: the
    /// chapter owner's name paired with the default committer email.
    pub fn system_default(username: impl Into<String>) -> Self {
        Committer {
            username: username.into(),
            email: DEFAULT_COMMITTER_EMAIL.to_string(),
        }
    }
}

/// One entry in a storage location's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    pub id: RevisionId,
    pub message: String,
}

/// Revision-control verbs consumed by the chapter aggregate.
///
/// Commits are atomic at the storage-location level; intermediate working
/// writes before a commit are not rolled back by callers. Serialization of
/// concurrent writers to one location is the caller's responsibility.
#[async_trait]
pub trait RevisionStore: Send + Sync {
    /// Ensure the storage location exists.
    async fn ensure_location(&self, path: &Path) -> Result<(), StoreError>;

    /// Write `content` to `filename` within the location's working tree.
    async fn write_snapshot(
        &self,
        path: &Path,
        filename: &str,
        content: &str,
    ) -> Result<(), StoreError>;

    /// Commit the location's current state, returning the new revision.
    async fn commit(
        &self,
        path: &Path,
        committer: &Committer,
        message: &str,
    ) -> Result<RevisionId, StoreError>;

    /// Current head revision of the location.
    async fn head(&self, path: &Path) -> Result<RevisionId, StoreError>;

    /// History of the location, most-recent-first, starting at the head.
    async fn parents(&self, path: &Path) -> Result<Vec<RevisionInfo>, StoreError>;

    /// Contents of `filename` as it existed at `revision`, without touching
    /// the live working tree.
    async fn file_at(
        &self,
        path: &Path,
        filename: &str,
        revision: &RevisionId,
    ) -> Result<String, StoreError>;
}
