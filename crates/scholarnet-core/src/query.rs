//! # Query Module
//!
//! Structured path queries for Catalog interaction.
//!
//! - Name the four path searches so callers can pick one at runtime
//! - Deterministic parsing of search names (no fuzzy matching)
//! - One result shape for all four searches

use crate::{AffiliationId, Connection, Distance, ScholarnetError, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path search strategies supported by the Catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Any connecting path (depth-first).
    Any,
    /// Fewest affiliations on the way (breadth-first).
    Fewest,
    /// Greedy high-weight path (best-first).
    Heaviest,
    /// Shortest geometric length (Dijkstra).
    Shortest,
}

impl PathKind {
    /// All kinds, in display order.
    pub const ALL: [PathKind; 4] = [Self::Any, Self::Fewest, Self::Heaviest, Self::Shortest];

    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Fewest => "fewest",
            Self::Heaviest => "heaviest",
            Self::Shortest => "shortest",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathKind {
    type Err = ScholarnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ScholarnetError::InvalidQuery(format!("unknown path kind: {s}")))
    }
}

/// A path query between two affiliations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub kind: PathKind,
    pub source: AffiliationId,
    pub target: AffiliationId,
}

impl PathQuery {
    /// Create a new query.
    #[must_use]
    pub fn new(kind: PathKind, source: AffiliationId, target: AffiliationId) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }
}

/// One step of a path result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub connection: Connection,
    /// Geometric length of this step; only the shortest search reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
}

/// The answer to a [`PathQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub kind: PathKind,
    pub steps: Vec<PathStep>,
}

impl PathOutcome {
    /// Wrap a plain connection path.
    #[must_use]
    pub fn from_connections(kind: PathKind, path: Vec<Connection>) -> Self {
        Self {
            kind,
            steps: path
                .into_iter()
                .map(|connection| PathStep {
                    connection,
                    distance: None,
                })
                .collect(),
        }
    }

    /// Wrap a distance-annotated path.
    #[must_use]
    pub fn from_distances(kind: PathKind, path: Vec<(Connection, Distance)>) -> Self {
        Self {
            kind,
            steps: path
                .into_iter()
                .map(|(connection, distance)| PathStep {
                    connection,
                    distance: Some(distance),
                })
                .collect(),
        }
    }

    /// True when no path was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of connection weights along the path.
    #[must_use]
    pub fn total_weight(&self) -> Weight {
        self.steps
            .iter()
            .fold(Weight::default(), |acc, s| acc.saturating_add(s.connection.weight))
    }

    /// Sum of step lengths, if the search reported them.
    #[must_use]
    pub fn total_distance(&self) -> Option<Distance> {
        self.steps
            .iter()
            .try_fold(Distance::default(), |acc, s| s.distance.map(|d| acc.saturating_add(d)))
            .filter(|_| !self.steps.is_empty())
    }

    /// Affiliations visited, source first. Empty when no path was found.
    #[must_use]
    pub fn affiliations(&self) -> Vec<AffiliationId> {
        let mut visited = Vec::with_capacity(self.steps.len().saturating_add(1));
        if let Some(first) = self.steps.first() {
            visited.push(first.connection.from.clone());
        }
        visited.extend(self.steps.iter().map(|s| s.connection.to.clone()));
        visited
    }
}

// =============================================================================
// TESTS
// =============================================================================
