//! # scholarnet-core
//!
//! The in-memory affiliation and publication engine for Scholarnet - THE LOGIC.
//!
//! This crate keeps affiliations (organizations with a planar coordinate),
//! publications (authored by affiliations, citing each other in a forest)
//! and the co-authorship graph derived from them. Every operation enters
//! through [`Catalog`].
//!
//! ## Architectural Constraints
//!
//! - Deterministic: `BTreeMap`/`BTreeSet` only, ties broken by identifier
//! - Integer geometry: no floating point anywhere in the crate
//! - Has NO async, NO I/O (file handling lives in the app layer)

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod citation;
pub mod connection;
pub mod index;
pub mod pathfind;
pub mod primitives;
pub mod query;
pub mod snapshot;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Affiliation, AffiliationId, Connection, Coord, Distance, Publication, PublicationId,
    ScholarnetError, Weight, Year,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::Catalog;
pub use citation::{Attachment, CitationForest};
pub use connection::{ConnectionGraph, EdgeKey};
pub use index::{AffiliationIndex, SortedView};
pub use pathfind::{DistancePath, PathFinder};
pub use query::{PathKind, PathOutcome, PathQuery, PathStep};
pub use snapshot::{AffiliationRecord, PublicationRecord, ReferenceRecord, Snapshot};
pub use store::{EntityStore, Locate};
