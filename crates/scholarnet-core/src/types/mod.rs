//! # Core Type Definitions
//!
//! This module contains all value types for the Scholarnet catalog:
//! - Identifiers (`AffiliationId`, `PublicationId`)
//! - Scalar values (`Year`, `Coord`, `Distance`, `Weight`)
//! - Records (`Affiliation`, `Publication`)
//! - The derived edge (`Connection`)
//! - Error types (`ScholarnetError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for accumulators to prevent overflow

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier of an affiliation (an organization).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffiliationId(pub String);

impl AffiliationId {
    /// Create a new affiliation identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AffiliationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub u64);

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub i32);

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// A point on the integer plane.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Exact squared Euclidean distance to `other`.
    ///
    /// Computed in `u128` so that no pair of `i32` points can overflow.
    #[must_use]
    pub fn squared_distance_to(self, other: Coord) -> u128 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs() as u128;
        let dy = (i64::from(self.y) - i64::from(other.y)).unsigned_abs() as u128;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`, rounded down to an integer.
    #[must_use]
    pub fn distance_to(self, other: Coord) -> Distance {
        Distance(self.squared_distance_to(other).isqrt() as u64)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Geometric length of an edge or a path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Distance(pub u64);

impl Distance {
    /// Add two distances, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Distance) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Get the raw distance value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

// =============================================================================
// WEIGHT
// =============================================================================

/// Weight of a connection: the number of publications both endpoints produced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Weight(pub u64);

impl Weight {
    /// Create a new weight.
    #[must_use]
    pub const fn new(weight: u64) -> Self {
        Self(weight)
    }

    /// Add two weights, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Weight) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// True for a weight that carries no shared publication.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Get the raw weight value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// An organization that produces publications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub id: AffiliationId,
    pub name: String,
    pub coord: Coord,
    /// Produced publications, in the order they were linked.
    pub publications: Vec<PublicationId>,
}

impl Affiliation {
    /// Create an affiliation that has produced nothing yet.
    #[must_use]
    pub fn new(id: AffiliationId, name: impl Into<String>, coord: Coord) -> Self {
        Self {
            id,
            name: name.into(),
            coord,
            publications: Vec::new(),
        }
    }
}

/// A document with authors. Citation links live in the citation forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    pub title: String,
    pub year: Year,
    /// Contributing affiliations, in the order they were linked.
    pub authors: Vec<AffiliationId>,
}

impl Publication {
    /// Create a publication without authors.
    #[must_use]
    pub fn new(id: PublicationId, title: impl Into<String>, year: Year) -> Self {
        Self {
            id,
            title: title.into(),
            year,
            authors: Vec::new(),
        }
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

/// A co-authorship edge between two distinct affiliations.
///
/// The pair is unordered in the graph; `from`/`to` only carry the orientation
/// the caller asked for (the queried affiliation first, or the walking
/// direction of a path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: AffiliationId,
    pub to: AffiliationId,
    pub weight: Weight,
}

impl Connection {
    /// Create a connection with the given orientation.
    #[must_use]
    pub fn new(from: AffiliationId, to: AffiliationId, weight: Weight) -> Self {
        Self { from, to, weight }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised outside the boolean catalog API.
///
/// Catalog mutators report plain success or failure; this enum is used where
/// a whole batch is validated (snapshot restore) or where input comes from
/// outside the process (datasets, CLI arguments).
#[derive(Debug, Error)]
pub enum ScholarnetError {
    /// An affiliation identifier appears twice.
    #[error("Duplicate affiliation: {0}")]
    DuplicateAffiliation(AffiliationId),

    /// A publication identifier appears twice.
    #[error("Duplicate publication: {0}")]
    DuplicatePublication(PublicationId),

    /// A referenced affiliation does not exist.
    #[error("Affiliation not found: {0}")]
    UnknownAffiliation(AffiliationId),

    /// A referenced publication does not exist.
    #[error("Publication not found: {0}")]
    UnknownPublication(PublicationId),

    /// A query could not be formed from the given arguments.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A dataset could not be decoded.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_floor_of_euclidean_length() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.distance_to(Coord::new(3, 4)), Distance(5));
        assert_eq!(origin.distance_to(Coord::new(1, 1)), Distance(1));
        assert_eq!(Coord::new(3, 4).distance_to(Coord::new(6, 8)), Distance(5));
    }

    #[test]
    fn squared_distance_does_not_overflow_at_extremes() {
        let a = Coord::new(i32::MIN, i32::MIN);
        let b = Coord::new(i32::MAX, i32::MAX);
        let span = (u32::MAX as u128) * (u32::MAX as u128);
        assert_eq!(a.squared_distance_to(b), span * 2);
        assert!(a.distance_to(b).value() > u64::from(u32::MAX));
    }

    #[test]
    fn weight_saturating_add() {
        let weight = Weight::new(u64::MAX);
        assert_eq!(weight.saturating_add(Weight::new(1)), Weight::new(u64::MAX));
        assert!(Weight::default().is_zero());
    }

    #[test]
    fn display_formats() {
        assert_eq!(AffiliationId::new("TUNI").to_string(), "TUNI");
        assert_eq!(PublicationId(7).to_string(), "7");
        assert_eq!(Year(1998).to_string(), "1998");
        assert_eq!(Coord::new(-2, 5).to_string(), "(-2,5)");
    }
}
