//! Error types for the folio chapter system.

use crate::reference::FragmentRef;
use crate::types::RevisionId;
use std::path::PathBuf;
use thiserror::Error;

/// Revision Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no commits exist at {0:?}")]
    NoCommits(PathBuf),

    #[error("{filename} not found at revision {revision}")]
    FileNotFound {
        filename: String,
        revision: RevisionId,
    },

    #[error("revision-control error: {0}")]
    Git(#[from] git2::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fragment resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("fragment not found: {owner}/{fragment} at {revision}")]
    NotFound {
        owner: String,
        fragment: String,
        revision: RevisionId,
    },

    #[error("fragment resolution failed: {0}")]
    Other(String),
}

/// Chapter aggregate errors
#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("{field} is read-only")]
    ReadOnlyField { field: String },

    #[error("unrecognized field {field}")]
    UnrecognizedField { field: String },

    #[error("reference not found in chapter: {0:?}")]
    ReferenceNotFound(FragmentRef),

    #[error("failed to resolve reference {reference:?}: {source}")]
    ResolveFailed {
        reference: FragmentRef,
        source: ResolveError,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
