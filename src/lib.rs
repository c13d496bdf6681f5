//! Folio: Version-Controlled Composite Documents
//!
//! Models a composite document ("chapter") assembled from an ordered sequence
//! of pinned references to independently versioned fragments ("scraps").
//! Because every reference records the fragment revision that was current when
//! it was added, re-rendering a chapter at any past revision reproduces
//! exactly the content that existed at the time, regardless of how the
//! fragments have changed since.

pub mod chapter;
pub mod config;
pub mod error;
pub mod logging;
pub mod reference;
pub mod resolver;
pub mod store;
pub mod types;
