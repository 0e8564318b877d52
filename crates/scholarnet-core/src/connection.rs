//! # Connection Graph
//!
//! The undirected co-authorship graph between affiliations.
//!
//! Each edge is stored once under its canonical key (the smaller identifier
//! first). A per-affiliation incidence index names the neighbor on the far
//! side of every incident edge, so the key can always be rebuilt from either
//! endpoint. Weights are set, never incremented: the catalog recomputes them
//! from the entity store and hands the result here.

use crate::{AffiliationId, Connection, Weight};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// EDGE KEY
// =============================================================================

/// Canonical key of an undirected edge: `(min, max)` by identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(AffiliationId, AffiliationId);

impl EdgeKey {
    /// Build the canonical key for `a`–`b`. Self-loops have no key.
    #[must_use]
    pub fn new(a: &AffiliationId, b: &AffiliationId) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self(a.clone(), b.clone())),
            std::cmp::Ordering::Greater => Some(Self(b.clone(), a.clone())),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller endpoint.
    #[must_use]
    pub fn low(&self) -> &AffiliationId {
        &self.0
    }

    /// The larger endpoint.
    #[must_use]
    pub fn high(&self) -> &AffiliationId {
        &self.1
    }
}

// =============================================================================
// CONNECTION GRAPH
// =============================================================================

/// Weighted undirected graph over affiliation identifiers.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    /// Canonical edge map: (min, max) -> weight
    edges: BTreeMap<EdgeKey, Weight>,

    /// Incidence index: endpoint -> neighbors across incident edges
    incident: BTreeMap<AffiliationId, BTreeSet<AffiliationId>>,
}

impl ConnectionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every edge.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.incident.clear();
    }

    /// Set the weight of `a`–`b`. A zero weight removes the edge.
    ///
    /// Returns the previous weight, if there was an edge.
    pub fn set_weight(&mut self, a: &AffiliationId, b: &AffiliationId, weight: Weight) -> Option<Weight> {
        let key = EdgeKey::new(a, b)?;
        if weight.is_zero() {
            return self.remove_edge(&key);
        }
        let previous = self.edges.insert(key, weight);
        if previous.is_none() {
            self.incident.entry(a.clone()).or_default().insert(b.clone());
            self.incident.entry(b.clone()).or_default().insert(a.clone());
        }
        previous
    }

    /// Remove every edge incident to `id`.
    ///
    /// Returns the former neighbors in identifier order.
    pub fn remove_affiliation(&mut self, id: &AffiliationId) -> Vec<AffiliationId> {
        let neighbors: Vec<AffiliationId> = self
            .incident
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for other in &neighbors {
            if let Some(key) = EdgeKey::new(id, other) {
                self.remove_edge(&key);
            }
        }
        neighbors
    }

    /// Weight of `a`–`b`, if they are connected.
    #[must_use]
    pub fn weight(&self, a: &AffiliationId, b: &AffiliationId) -> Option<Weight> {
        self.edges.get(&EdgeKey::new(a, b)?).copied()
    }

    /// Neighbors of `id` with edge weights, ordered by neighbor identifier.
    pub fn neighbors<'a>(
        &'a self,
        id: &AffiliationId,
    ) -> impl Iterator<Item = (&'a AffiliationId, Weight)> + 'a {
        let id = id.clone();
        self.incident
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter())
            .filter_map(move |other| self.weight(&id, other).map(|w| (other, w)))
    }

    /// Edges incident to `id`, oriented as `(id, other)`.
    #[must_use]
    pub fn connections_of(&self, id: &AffiliationId) -> Vec<Connection> {
        self.neighbors(id)
            .map(|(other, weight)| Connection::new(id.clone(), other.clone(), weight))
            .collect()
    }

    /// Every edge once, canonical orientation, ordered by key.
    #[must_use]
    pub fn all(&self) -> Vec<Connection> {
        self.edges
            .iter()
            .map(|(key, weight)| Connection::new(key.low().clone(), key.high().clone(), *weight))
            .collect()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn remove_edge(&mut self, key: &EdgeKey) -> Option<Weight> {
        let previous = self.edges.remove(key)?;
        self.unlink(key.low(), key.high());
        self.unlink(key.high(), key.low());
        Some(previous)
    }

    fn unlink(&mut self, from: &AffiliationId, to: &AffiliationId) {
        if let Some(set) = self.incident.get_mut(from) {
            set.remove(to);
            if set.is_empty() {
                self.incident.remove(from);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AffiliationId {
        AffiliationId::new(s)
    }

    #[test]
    fn edge_key_is_canonical() {
        assert_eq!(EdgeKey::new(&id("b"), &id("a")), EdgeKey::new(&id("a"), &id("b")));
        assert_eq!(EdgeKey::new(&id("a"), &id("a")), None);
    }

    #[test]
    fn set_weight_creates_overwrites_and_prunes() {
        let mut graph = ConnectionGraph::new();
        assert_eq!(graph.set_weight(&id("b"), &id("a"), Weight(1)), None);
        assert_eq!(graph.set_weight(&id("a"), &id("b"), Weight(3)), Some(Weight(1)));
        assert_eq!(graph.weight(&id("b"), &id("a")), Some(Weight(3)));
        assert_eq!(graph.edge_count(), 1);

        assert_eq!(graph.set_weight(&id("a"), &id("b"), Weight(0)), Some(Weight(3)));
        assert_eq!(graph.weight(&id("a"), &id("b")), None);
        assert!(graph.neighbors(&id("a")).next().is_none());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn self_loops_are_ignored() {
        let mut graph = ConnectionGraph::new();
        assert_eq!(graph.set_weight(&id("a"), &id("a"), Weight(2)), None);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn connections_of_orients_from_queried_id() {
        let mut graph = ConnectionGraph::new();
        graph.set_weight(&id("a"), &id("c"), Weight(1));
        graph.set_weight(&id("c"), &id("b"), Weight(2));

        let conns = graph.connections_of(&id("c"));
        assert_eq!(
            conns,
            vec![
                Connection::new(id("c"), id("a"), Weight(1)),
                Connection::new(id("c"), id("b"), Weight(2)),
            ]
        );
        assert!(graph.connections_of(&id("zz")).is_empty());
    }

    #[test]
    fn all_is_deduplicated_and_canonical() {
        let mut graph = ConnectionGraph::new();
        graph.set_weight(&id("c"), &id("a"), Weight(1));
        graph.set_weight(&id("b"), &id("a"), Weight(2));

        assert_eq!(
            graph.all(),
            vec![
                Connection::new(id("a"), id("b"), Weight(2)),
                Connection::new(id("a"), id("c"), Weight(1)),
            ]
        );
    }

    #[test]
    fn remove_affiliation_clears_both_sides() {
        let mut graph = ConnectionGraph::new();
        graph.set_weight(&id("a"), &id("b"), Weight(1));
        graph.set_weight(&id("a"), &id("c"), Weight(1));
        graph.set_weight(&id("b"), &id("c"), Weight(1));

        assert_eq!(graph.remove_affiliation(&id("a")), vec![id("b"), id("c")]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors(&id("b")).count(), 1);
        assert!(graph.neighbors(&id("a")).next().is_none());
    }
}
