//! Fragment Resolver collaborator boundary.
//!
//! Fragments ("scraps") are versioned and rendered by an external
//! collaborator; this crate only consumes the interface below. A resolver
//! materializes a fragment at a specific revision, and the resulting handle
//! renders synchronously.

use crate::error::ResolveError;
use crate::types::RevisionId;
use async_trait::async_trait;

/// A fragment materialized at a specific revision.
///
/// `head()` is the revision this instance represents: for a fragment resolved
/// at an explicit revision it is that revision, for a freshly loaded fragment
/// it is the fragment's current head. `Chapter::add_reference` pins against
/// it when no explicit revision is supplied.
pub trait FragmentHandle: Send + Sync {
    fn owner(&self) -> &str;

    fn id(&self) -> &str;

    fn head(&self) -> &RevisionId;

    /// The fragment's rendered text. Synchronous once resolved.
    fn render_text(&self) -> String;
}

/// Resolves fragment references to renderable fragment instances.
#[async_trait]
pub trait FragmentResolver: Send + Sync {
    /// Materialize the fragment `owner/fragment` as of `revision`.
    ///
    /// Fails with [`ResolveError::NotFound`] if the fragment or revision does
    /// not exist.
    async fn resolve(
        &self,
        owner: &str,
        fragment: &str,
        revision: &RevisionId,
    ) -> Result<Box<dyn FragmentHandle>, ResolveError>;
}
