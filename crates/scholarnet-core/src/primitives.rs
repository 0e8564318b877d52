//! # Primitives
//!
//! Fixed constants of the Scholarnet catalog.
//!
//! These are compiled into the binary and are immutable at runtime.

use crate::Coord;

/// Reference point for the distance-increasing affiliation order.
pub const ORIGIN: Coord = Coord::new(0, 0);

/// Number of affiliations returned by a closest-to-point query.
pub const CLOSEST_AFFILIATIONS_LIMIT: usize = 3;

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot layout.
pub const SNAPSHOT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for affiliation names and publication titles in a snapshot.
///
/// Longer strings are rejected by `Snapshot::restore`.
pub const MAX_NAME_LENGTH: usize = 1024;

/// Maximum number of records of each kind in a single snapshot.
pub const MAX_SNAPSHOT_RECORDS: usize = 1_000_000;
