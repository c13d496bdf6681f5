//! Typed chapter update operations.
//!
//! The external update surface is a loose mapping of field name to new value.
//! `parse_patch` converts that mapping into the closed [`ChapterUpdate`] set
//! before anything mutates, walking entries in order and failing fast on the
//! first read-only or unrecognized field. Because parsing is total before
//! application begins, a rejected patch leaves the aggregate untouched and
//! performs no commit.

use crate::error::ChapterError;
use crate::reference::FragmentRef;
use crate::types::RevisionId;
use serde::Serialize;
use serde_json::{Map, Value};

/// The closed set of mutations a patch can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterUpdate {
    /// Change the chapter's display name.
    Rename(String),
    /// Bulk-replace the pinned reference sequence. Referenced fragments are
    /// not validated here; render resolves them lazily.
    ReplaceReferences(Vec<FragmentRef>),
}

/// Result of a successfully applied and committed patch.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Revision created by the save that made the patch durable.
    pub revision: RevisionId,
    /// Human-readable change summary, also used as the commit message.
    pub message: String,
}

/// Wire-shaped rejection for the update surface: `{error, field}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRejection {
    pub error: String,
    pub field: String,
}

impl UpdateRejection {
    /// Wire shape for the two field-level rejections; other errors have no
    /// field to report and map to `None`.
    pub fn from_error(err: &ChapterError) -> Option<Self> {
        match err {
            ChapterError::ReadOnlyField { field } => Some(UpdateRejection {
                error: "author and uuid are read-only".to_string(),
                field: field.clone(),
            }),
            ChapterError::UnrecognizedField { field } => Some(UpdateRejection {
                error: format!("unrecognized field {}", field),
                field: field.clone(),
            }),
            _ => None,
        }
    }
}

/// Parse a loose field-name patch into typed updates.
///
/// Entries are processed in the mapping's order; the first invalid field
/// aborts with its error and nothing is returned.
pub fn parse_patch(patch: &Map<String, Value>) -> Result<Vec<ChapterUpdate>, ChapterError> {
    let mut updates = Vec::with_capacity(patch.len());
    for (field, value) in patch {
        match field.as_str() {
            "name" => {
                let name: String = serde_json::from_value(value.clone())?;
                updates.push(ChapterUpdate::Rename(name));
            }
            "author" | "uuid" => {
                return Err(ChapterError::ReadOnlyField {
                    field: field.clone(),
                });
            }
            "scraps" => {
                let references: Vec<FragmentRef> = serde_json::from_value(value.clone())?;
                updates.push(ChapterUpdate::ReplaceReferences(references));
            }
            _ => {
                return Err(ChapterError::UnrecognizedField {
                    field: field.clone(),
                });
            }
        }
    }
    Ok(updates)
}
