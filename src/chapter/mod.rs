//! Chapter Aggregate
//!
//! A chapter owns an ordered sequence of pinned fragment references plus
//! chapter-level metadata. It composes with the Fragment Resolver to render
//! text and with the Revision Store to persist itself, reconstitute any past
//! revision, and expose its own history.
//!
//! Mutations happen in memory through explicit operations and become durable
//! only through [`Chapter::save`]; every save commits a fresh canonical
//! snapshot and yields a new revision.

use crate::error::{ChapterError, StoreError};
use crate::reference::FragmentRef;
use crate::resolver::{FragmentHandle, FragmentResolver};
use crate::store::{Committer, RevisionInfo, RevisionStore, StorageLayout};
use crate::types::{RevisionId, RevisionMarker};
use tracing::{debug, info, instrument};
use uuid::Uuid;

mod snapshot;
mod update;

pub use snapshot::ChapterSnapshot;
pub use update::{parse_patch, ChapterUpdate, UpdateOutcome, UpdateRejection};

/// Well-known snapshot file within a chapter's storage location.
pub const SNAPSHOT_FILE: &str = "info.json";

/// Marker emitted between rendered fragments.
const FRAGMENT_SEPARATOR: &str = "\n\\newline\n";

/// A composite, version-controlled document built from pinned fragment
/// references.
///
/// `owner` and `id` are write-once: there are no setters, and the patch
/// surface rejects them. Reference order is render order; duplicates are
/// permitted.
#[derive(Debug, Clone)]
pub struct Chapter {
    name: String,
    owner: String,
    id: Uuid,
    is_new: bool,
    references: Vec<FragmentRef>,
}

impl Chapter {
    /// Create a brand-new chapter with a freshly generated identifier.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::with_parts(name, owner, None, None)
    }

    /// Create a chapter, optionally supplying an existing identifier and
    /// reference sequence. Instances built this way have never been
    /// persisted; reconstitution goes through [`Chapter::reconstitute`].
    pub fn with_parts(
        name: impl Into<String>,
        owner: impl Into<String>,
        id: Option<Uuid>,
        references: Option<Vec<FragmentRef>>,
    ) -> Self {
        Chapter {
            name: name.into(),
            owner: owner.into(),
            id: id.unwrap_or_else(Uuid::new_v4),
            is_new: true,
            references: references.unwrap_or_default(),
        }
    }

    fn from_snapshot(snapshot: ChapterSnapshot) -> Self {
        Chapter {
            name: snapshot.name,
            owner: snapshot.author,
            id: snapshot.uuid,
            is_new: false,
            references: snapshot.scraps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// True until the instance has been persisted at least once.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn references(&self) -> &[FragmentRef] {
        &self.references
    }

    /// Render the chapter's composed text.
    ///
    /// Emits the chapter-start marker, then resolves each reference in order
    /// at its pinned revision and appends its text plus a separator.
    /// Resolution is strictly sequential; the first failure aborts the whole
    /// render and names the failing reference.
    #[instrument(skip(self, resolver), fields(chapter = %self.id))]
    pub async fn render(&self, resolver: &dyn FragmentResolver) -> Result<String, ChapterError> {
        let mut text = format!("\\newpage\n\\section{{{}}}\n\n", self.name);
        for reference in &self.references {
            let fragment = resolver
                .resolve(&reference.owner, &reference.fragment, &reference.revision)
                .await
                .map_err(|source| ChapterError::ResolveFailed {
                    reference: reference.clone(),
                    source,
                })?;
            text.push_str(&fragment.render_text());
            text.push_str(FRAGMENT_SEPARATOR);
        }
        Ok(text)
    }

    /// Append a reference to `fragment`, pinned to `pinned` when given,
    /// otherwise to the fragment's head as of right now. Later changes to the
    /// fragment do not affect the recorded reference.
    pub fn add_reference(&mut self, fragment: &dyn FragmentHandle, pinned: Option<RevisionId>) {
        let revision = pinned.unwrap_or_else(|| fragment.head().clone());
        self.references
            .push(FragmentRef::new(fragment.owner(), fragment.id(), revision));
    }

    /// Remove the first structurally-equal occurrence of `reference`.
    ///
    /// An absent target is an error rather than a silent no-op, so removals
    /// stay auditable.
    pub fn remove_reference(&mut self, reference: &FragmentRef) -> Result<(), ChapterError> {
        match self.references.iter().position(|r| r == reference) {
            Some(index) => {
                self.references.remove(index);
                Ok(())
            }
            None => Err(ChapterError::ReferenceNotFound(reference.clone())),
        }
    }

    /// Bulk-replace the reference sequence. No validation of the referenced
    /// fragments happens here; render resolves them lazily.
    pub fn set_references(&mut self, references: Vec<FragmentRef>) {
        self.references = references;
    }

    /// Apply typed updates in order, persist the result, and return the new
    /// revision with the accumulated change summary attached.
    pub async fn apply(
        &mut self,
        updates: Vec<ChapterUpdate>,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
    ) -> Result<UpdateOutcome, ChapterError> {
        let mut message = String::from("update: ");
        for update in updates {
            match update {
                ChapterUpdate::Rename(new_name) => {
                    message.push_str(&format!(
                        "changed name from {} to {}. ",
                        self.name, new_name
                    ));
                    self.name = new_name;
                }
                ChapterUpdate::ReplaceReferences(references) => {
                    message.push_str("updated scraps. ");
                    self.references = references;
                }
            }
        }
        let revision = self.save(store, layout, &message).await?;
        Ok(UpdateOutcome { revision, message })
    }

    /// Apply a loose field-name patch.
    ///
    /// The whole patch is parsed into [`ChapterUpdate`]s before anything
    /// mutates, so a patch containing a read-only or unrecognized field
    /// leaves the chapter in its pre-patch state and performs no commit.
    pub async fn apply_patch(
        &mut self,
        patch: &serde_json::Map<String, serde_json::Value>,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
    ) -> Result<UpdateOutcome, ChapterError> {
        let updates = parse_patch(patch)?;
        self.apply(updates, store, layout).await
    }

    /// Serialize the full current state and commit it as a new revision.
    ///
    /// The canonical snapshot is written to [`SNAPSHOT_FILE`] inside the
    /// chapter's storage location, then the location is committed with the
    /// system-default committer and `reason` as the message. This is the only
    /// path by which mutations become durable.
    #[instrument(skip(self, store, layout), fields(chapter = %self.id, owner = %self.owner))]
    pub async fn save(
        &mut self,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
        reason: &str,
    ) -> Result<RevisionId, ChapterError> {
        let dir = layout.chapter_dir(&self.owner, &self.id);
        let encoded = ChapterSnapshot::from(&*self).encode()?;

        store.ensure_location(&dir).await?;
        store.write_snapshot(&dir, SNAPSHOT_FILE, &encoded).await?;
        let committer = Committer::system_default(&self.owner);
        let revision = store.commit(&dir, &committer, reason).await?;

        self.is_new = false;
        info!(revision = %revision, "chapter saved");
        Ok(revision)
    }

    /// Rebuild a chapter from storage.
    ///
    /// `Current` reads the live snapshot from the working tree; a historical
    /// marker retrieves the snapshot as of that revision without touching the
    /// live location. Decode failures propagate; there is no fallback state.
    #[instrument(skip(store, layout))]
    pub async fn reconstitute(
        store: &dyn RevisionStore,
        layout: &StorageLayout,
        owner: &str,
        id: &Uuid,
        marker: &RevisionMarker,
    ) -> Result<Chapter, ChapterError> {
        let dir = layout.chapter_dir(owner, id);
        let raw = match marker {
            RevisionMarker::Current => tokio::fs::read_to_string(dir.join(SNAPSHOT_FILE))
                .await
                .map_err(StoreError::Io)?,
            RevisionMarker::At(revision) => store.file_at(&dir, SNAPSHOT_FILE, revision).await?,
        };
        let snapshot = ChapterSnapshot::decode(&raw)?;
        debug!(chapter = %snapshot.uuid, "chapter reconstituted");
        Ok(Chapter::from_snapshot(snapshot))
    }

    /// Raw stored snapshot content as of `revision`, without constructing a
    /// chapter. Lower-level than [`Chapter::reconstitute`]; useful for
    /// diffing or display.
    pub async fn raw_snapshot(
        &self,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
        revision: &RevisionId,
    ) -> Result<String, ChapterError> {
        let dir = layout.chapter_dir(&self.owner, &self.id);
        Ok(store.file_at(&dir, SNAPSHOT_FILE, revision).await?)
    }

    /// Current head revision of this chapter's storage location, looked up on
    /// demand and never cached.
    pub async fn head(
        &self,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
    ) -> Result<RevisionId, ChapterError> {
        let dir = layout.chapter_dir(&self.owner, &self.id);
        Ok(store.head(&dir).await?)
    }

    /// Ancestor revisions of this chapter, most-recent-first, optionally
    /// bounded by `limit`.
    pub async fn previous_versions(
        &self,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
        limit: Option<usize>,
    ) -> Result<Vec<RevisionInfo>, ChapterError> {
        let dir = layout.chapter_dir(&self.owner, &self.id);
        let mut history = store.parents(&dir).await?;
        if let Some(limit) = limit {
            history.truncate(limit);
        }
        Ok(history)
    }

    /// Duplicate this chapter's current state into `new_owner`'s namespace as
    /// an independent, separately-versioned copy.
    ///
    /// The copy keeps the identifier (locations are owner-namespaced, so the
    /// two cannot collide) and is committed immediately with a provenance
    /// message.
    pub async fn fork(
        &self,
        new_owner: impl Into<String>,
        store: &dyn RevisionStore,
        layout: &StorageLayout,
    ) -> Result<Chapter, ChapterError> {
        let mut copy = Chapter {
            name: self.name.clone(),
            owner: new_owner.into(),
            id: self.id,
            is_new: true,
            references: self.references.clone(),
        };
        let reason = format!("forked from {}", self.owner);
        copy.save(store, layout, &reason).await?;
        Ok(copy)
    }
}
