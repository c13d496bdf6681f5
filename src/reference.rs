//! Fragment reference value type.
//!
//! A chapter never embeds fragment content; it records `(owner, fragment,
//! revision)` triples. The pinned revision is captured when the reference is
//! added, so resolving the same reference twice always yields identical
//! content until the tuple itself is replaced.

use crate::types::RevisionId;
use serde::{Deserialize, Serialize};

/// A pinned reference to one fragment at one specific revision.
///
/// On the wire this is the triple `[owner, fragment, revision]`, matching the
/// `scraps` entries of the persisted snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RefTuple", into = "RefTuple")]
pub struct FragmentRef {
    /// Identity of the fragment's owning entity.
    pub owner: String,
    /// Identifier of the referenced fragment.
    pub fragment: String,
    /// The fragment's revision at the moment this reference was recorded.
    pub revision: RevisionId,
}

type RefTuple = (String, String, RevisionId);

impl FragmentRef {
    pub fn new(
        owner: impl Into<String>,
        fragment: impl Into<String>,
        revision: impl Into<RevisionId>,
    ) -> Self {
        FragmentRef {
            owner: owner.into(),
            fragment: fragment.into(),
            revision: revision.into(),
        }
    }
}

impl From<RefTuple> for FragmentRef {
    fn from((owner, fragment, revision): RefTuple) -> Self {
        FragmentRef {
            owner,
            fragment,
            revision,
        }
    }
}

impl From<FragmentRef> for RefTuple {
    fn from(r: FragmentRef) -> Self {
        (r.owner, r.fragment, r.revision)
    }
}
