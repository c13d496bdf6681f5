//! Core identifier types shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque marker naming a specific historical state of a storage location.
///
/// Produced by the Revision Store on commit and treated as an uninterpreted
/// token everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        RevisionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionId {
    fn from(id: &str) -> Self {
        RevisionId(id.to_string())
    }
}

impl From<String> for RevisionId {
    fn from(id: String) -> Self {
        RevisionId(id)
    }
}

/// Selects which stored state of a chapter to read during reconstitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionMarker {
    /// The live storage location as it stands right now.
    Current,
    /// The storage location as of a specific historical revision.
    At(RevisionId),
}
