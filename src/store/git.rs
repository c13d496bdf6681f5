//! Git-backed Revision Store.
//!
//! Each storage location is its own git repository, created lazily on first
//! commit. Every commit stages the whole location and parents the current
//! head, so history stays linear. The blocking libgit2 work runs on the
//! tokio blocking pool to keep the async trait contract honest.

use crate::error::StoreError;
use crate::store::{Committer, RevisionInfo, RevisionStore};
use crate::types::RevisionId;
use async_trait::async_trait;
use git2::{Commit, IndexAddOption, Oid, Repository, Signature};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Revision Store over per-location git repositories.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRevisionStore;

impl GitRevisionStore {
    pub fn new() -> Self {
        GitRevisionStore
    }
}

#[async_trait]
impl RevisionStore for GitRevisionStore {
    async fn ensure_location(&self, path: &Path) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn write_snapshot(
        &self,
        path: &Path,
        filename: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        tokio::fs::write(path.join(filename), content).await?;
        Ok(())
    }

    async fn commit(
        &self,
        path: &Path,
        committer: &Committer,
        message: &str,
    ) -> Result<RevisionId, StoreError> {
        let path = path.to_path_buf();
        let committer = committer.clone();
        let message = message.to_string();
        run_blocking(move || commit_blocking(&path, &committer, &message)).await
    }

    async fn head(&self, path: &Path) -> Result<RevisionId, StoreError> {
        let path = path.to_path_buf();
        run_blocking(move || head_blocking(&path)).await
    }

    async fn parents(&self, path: &Path) -> Result<Vec<RevisionInfo>, StoreError> {
        let path = path.to_path_buf();
        run_blocking(move || parents_blocking(&path)).await
    }

    async fn file_at(
        &self,
        path: &Path,
        filename: &str,
        revision: &RevisionId,
    ) -> Result<String, StoreError> {
        let path = path.to_path_buf();
        let filename = filename.to_string();
        let revision = revision.clone();
        run_blocking(move || file_at_blocking(&path, &filename, &revision)).await
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}

fn open_or_init(path: &Path) -> Result<Repository, git2::Error> {
    match Repository::open(path) {
        Ok(repo) => Ok(repo),
        Err(_) => Repository::init(path),
    }
}

fn commit_blocking(
    path: &Path,
    committer: &Committer,
    message: &str,
) -> Result<RevisionId, StoreError> {
    let repo = open_or_init(path)?;

    let mut index = repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let signature = Signature::now(&committer.username, &committer.email)?;

    // Current head is the sole parent; the first commit has none.
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<&Commit> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;
    debug!(location = %path.display(), revision = %oid, "committed storage location");
    Ok(RevisionId::new(oid.to_string()))
}

fn head_blocking(path: &Path) -> Result<RevisionId, StoreError> {
    let repo = Repository::open(path)?;
    let head = repo
        .head()
        .map_err(|_| StoreError::NoCommits(PathBuf::from(path)))?;
    let commit = head.peel_to_commit()?;
    Ok(RevisionId::new(commit.id().to_string()))
}

fn parents_blocking(path: &Path) -> Result<Vec<RevisionInfo>, StoreError> {
    let repo = Repository::open(path)?;
    let mut walk = repo.revwalk()?;
    walk.push_head()
        .map_err(|_| StoreError::NoCommits(PathBuf::from(path)))?;

    let mut history = Vec::new();
    for oid in walk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        history.push(RevisionInfo {
            id: RevisionId::new(oid.to_string()),
            message: commit.message().unwrap_or("").trim_end().to_string(),
        });
    }
    Ok(history)
}

fn file_at_blocking(
    path: &Path,
    filename: &str,
    revision: &RevisionId,
) -> Result<String, StoreError> {
    let repo = Repository::open(path)?;
    let oid = Oid::from_str(revision.as_str())?;
    let commit = repo.find_commit(oid)?;
    let tree = commit.tree()?;

    let entry = tree
        .get_path(Path::new(filename))
        .map_err(|_| StoreError::FileNotFound {
            filename: filename.to_string(),
            revision: revision.clone(),
        })?;
    let object = entry.to_object(&repo)?;
    let blob = object.as_blob().ok_or_else(|| StoreError::FileNotFound {
        filename: filename.to_string(),
        revision: revision.clone(),
    })?;

    let content = std::str::from_utf8(blob.content())
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    Ok(content.to_string())
}
