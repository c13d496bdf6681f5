//! Canonical snapshot encoding.
//!
//! One chapter revision persists exactly one `info.json` holding the fields
//! below. Fields are declared in sorted key order and the encoder emits them
//! in declaration order, so repeated saves of unchanged data produce
//! byte-identical snapshots.

use crate::chapter::Chapter;
use crate::reference::FragmentRef;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted form of a chapter's own fields.
///
/// `author` is the owner identity and `scraps` the ordered pinned-reference
/// triples; the transient `is_new` flag and the on-demand head revision are
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSnapshot {
    pub author: String,
    pub name: String,
    pub scraps: Vec<FragmentRef>,
    pub uuid: Uuid,
}

impl ChapterSnapshot {
    /// Canonical encoding: stable key order, two-space indent.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl From<&Chapter> for ChapterSnapshot {
    fn from(chapter: &Chapter) -> Self {
        ChapterSnapshot {
            author: chapter.owner().to_string(),
            name: chapter.name().to_string(),
            scraps: chapter.references().to_vec(),
            uuid: *chapter.id(),
        }
    }
}
