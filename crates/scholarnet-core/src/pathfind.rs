//! # Path Finders
//!
//! Read-only searches over the [`ConnectionGraph`]:
//! - [`PathFinder::any_path`]: depth-first reachability
//! - [`PathFinder::fewest_affiliations`]: breadth-first, fewest edges
//! - [`PathFinder::heaviest`]: greedy best-first over accumulated weight
//! - [`PathFinder::shortest`]: Dijkstra over geometric edge length
//!
//! Every search returns an empty path when an endpoint is missing, when
//! source and target are the same affiliation, or when the target is
//! unreachable. Returned connections chain head-to-tail from the source.
//! Neighbors are always visited in identifier order, so results are
//! deterministic.

use crate::connection::ConnectionGraph;
use crate::store::Locate;
use crate::{AffiliationId, Connection, Distance, Weight};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

/// A path annotated with the geometric length of each step.
pub type DistancePath = Vec<(Connection, Distance)>;

/// Searches over one connection graph and one coordinate source.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a, L: Locate> {
    graph: &'a ConnectionGraph,
    locator: &'a L,
}

impl<'a, L: Locate> PathFinder<'a, L> {
    /// Create a finder over `graph`, resolving coordinates through `locator`.
    #[must_use]
    pub fn new(graph: &'a ConnectionGraph, locator: &'a L) -> Self {
        Self { graph, locator }
    }

    /// Both endpoints exist and differ.
    fn searchable(&self, source: &AffiliationId, target: &AffiliationId) -> bool {
        source != target
            && self.locator.locate(source).is_some()
            && self.locator.locate(target).is_some()
    }

    /// Any connecting path, found by an iterative depth-first search.
    ///
    /// No optimality is implied.
    #[must_use]
    pub fn any_path(&self, source: &AffiliationId, target: &AffiliationId) -> Vec<Connection> {
        if !self.searchable(source, target) {
            return Vec::new();
        }

        let mut parents: BTreeMap<AffiliationId, AffiliationId> = BTreeMap::new();
        let mut visited = BTreeSet::from([source.clone()]);
        let mut stack = vec![source.clone()];

        while let Some(current) = stack.pop() {
            if current == *target {
                break;
            }
            for (next, _) in self.graph.neighbors(&current) {
                if visited.insert(next.clone()) {
                    parents.insert(next.clone(), current.clone());
                    stack.push(next.clone());
                }
            }
        }

        self.trace(&parents, source, target)
    }

    /// The path through the fewest affiliations, found breadth-first.
    ///
    /// Among equally short paths, the first one reached in identifier order wins.
    #[must_use]
    pub fn fewest_affiliations(
        &self,
        source: &AffiliationId,
        target: &AffiliationId,
    ) -> Vec<Connection> {
        if !self.searchable(source, target) {
            return Vec::new();
        }

        let mut parents: BTreeMap<AffiliationId, AffiliationId> = BTreeMap::new();
        let mut visited = BTreeSet::from([source.clone()]);
        let mut queue = VecDeque::from([source.clone()]);

        while let Some(current) = queue.pop_front() {
            if current == *target {
                break;
            }
            for (next, _) in self.graph.neighbors(&current) {
                if visited.insert(next.clone()) {
                    parents.insert(next.clone(), current.clone());
                    queue.push_back(next.clone());
                }
            }
        }

        self.trace(&parents, source, target)
    }

    /// A high-weight path, found by greedy best-first expansion.
    ///
    /// The frontier is a max-priority queue keyed by accumulated weight. An
    /// affiliation is settled when it is popped; until then its weight and
    /// parent are raised whenever a heavier route to it appears. The search
    /// ends when the target is settled.
    ///
    /// This runs in `O(E log V)` and is NOT guaranteed to return the
    /// maximum-weight simple path, which is NP-hard in general. On trees and
    /// on graphs where the heaviest route is also expanded first it is exact.
    #[must_use]
    pub fn heaviest(&self, source: &AffiliationId, target: &AffiliationId) -> Vec<Connection> {
        if !self.searchable(source, target) {
            return Vec::new();
        }

        let mut best: BTreeMap<AffiliationId, Weight> = BTreeMap::from([(source.clone(), Weight::default())]);
        let mut parents: BTreeMap<AffiliationId, AffiliationId> = BTreeMap::new();
        let mut settled = BTreeSet::new();
        let mut frontier = BinaryHeap::from([(Weight::default(), Reverse(source.clone()))]);

        while let Some((weight, Reverse(current))) = frontier.pop() {
            if settled.contains(&current) || best.get(&current).is_some_and(|b| weight < *b) {
                continue;
            }
            settled.insert(current.clone());
            if current == *target {
                break;
            }
            for (next, edge) in self.graph.neighbors(&current) {
                if settled.contains(next) {
                    continue;
                }
                let candidate = weight.saturating_add(edge);
                if best.get(next).is_none_or(|known| candidate > *known) {
                    best.insert(next.clone(), candidate);
                    parents.insert(next.clone(), current.clone());
                    frontier.push((candidate, Reverse(next.clone())));
                }
            }
        }

        self.trace(&parents, source, target)
    }

    /// The geometrically shortest path, found with Dijkstra's algorithm.
    ///
    /// Edge cost is the integer Euclidean length between the endpoints'
    /// coordinates; connection weight plays no part. Each step is returned
    /// with its own length.
    #[must_use]
    pub fn shortest(&self, source: &AffiliationId, target: &AffiliationId) -> DistancePath {
        if !self.searchable(source, target) {
            return Vec::new();
        }

        let mut dist: BTreeMap<AffiliationId, Distance> = BTreeMap::from([(source.clone(), Distance::default())]);
        let mut previous: BTreeMap<AffiliationId, (AffiliationId, Distance)> = BTreeMap::new();
        let mut settled = BTreeSet::new();
        let mut frontier = BinaryHeap::from([Reverse((Distance::default(), source.clone()))]);

        while let Some(Reverse((total, current))) = frontier.pop() {
            if !settled.insert(current.clone()) {
                continue;
            }
            if current == *target {
                break;
            }
            let Some(here) = self.locator.locate(&current) else {
                continue;
            };
            for (next, _) in self.graph.neighbors(&current) {
                if settled.contains(next) {
                    continue;
                }
                let Some(there) = self.locator.locate(next) else {
                    continue;
                };
                let step = here.distance_to(there);
                let candidate = total.saturating_add(step);
                if dist.get(next).is_none_or(|known| candidate < *known) {
                    dist.insert(next.clone(), candidate);
                    previous.insert(next.clone(), (current.clone(), step));
                    frontier.push(Reverse((candidate, next.clone())));
                }
            }
        }

        let parents: BTreeMap<AffiliationId, AffiliationId> = previous
            .iter()
            .map(|(node, (parent, _))| (node.clone(), parent.clone()))
            .collect();
        self.trace(&parents, source, target)
            .into_iter()
            .map(|conn| {
                let step = previous.get(&conn.to).map(|(_, d)| *d).unwrap_or_default();
                (conn, step)
            })
            .collect()
    }

    /// Rebuild the source → target path from parent links.
    ///
    /// Each connection is oriented in walking direction. Returns an empty
    /// path if the target was never reached.
    fn trace(
        &self,
        parents: &BTreeMap<AffiliationId, AffiliationId>,
        source: &AffiliationId,
        target: &AffiliationId,
    ) -> Vec<Connection> {
        let mut path = Vec::new();
        let mut current = target;

        while current != source {
            let Some(parent) = parents.get(current) else {
                return Vec::new();
            };
            let Some(weight) = self.graph.weight(parent, current) else {
                return Vec::new();
            };
            path.push(Connection::new(parent.clone(), current.clone(), weight));
            if path.len() > parents.len() {
                return Vec::new();
            }
            current = parent;
        }

        path.reverse();
        path
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    fn id(s: &str) -> AffiliationId {
        AffiliationId::new(s)
    }

    struct Fixture {
        graph: ConnectionGraph,
        coords: BTreeMap<AffiliationId, Coord>,
    }

    impl Fixture {
        fn new(nodes: &[(&str, i32, i32)], edges: &[(&str, &str, u64)]) -> Self {
            let coords = nodes
                .iter()
                .map(|&(n, x, y)| (id(n), Coord::new(x, y)))
                .collect();
            let mut graph = ConnectionGraph::new();
            for &(a, b, w) in edges {
                graph.set_weight(&id(a), &id(b), Weight(w));
            }
            Self { graph, coords }
        }

        fn finder(&self) -> PathFinder<'_, BTreeMap<AffiliationId, Coord>> {
            PathFinder::new(&self.graph, &self.coords)
        }
    }

    fn hops(path: &[Connection]) -> Vec<(String, String)> {
        path.iter()
            .map(|c| (c.from.to_string(), c.to.to_string()))
            .collect()
    }

    fn chains_from(path: &[Connection], source: &str, target: &str) -> bool {
        !path.is_empty()
            && path[0].from == id(source)
            && path[path.len() - 1].to == id(target)
            && path.windows(2).all(|w| w[0].to == w[1].from)
    }

    /// a - b - c - d, plus a shortcut a - d
    fn square() -> Fixture {
        Fixture::new(
            &[("a", 0, 0), ("b", 0, 1), ("c", 1, 1), ("d", 1, 0), ("e", 9, 9)],
            &[("a", "b", 1), ("b", "c", 1), ("c", "d", 1), ("a", "d", 1)],
        )
    }

    #[test]
    fn any_path_chains_from_source() {
        let fx = square();
        let path = fx.finder().any_path(&id("c"), &id("a"));
        assert!(chains_from(&path, "c", "a"));
    }

    #[test]
    fn unreachable_missing_and_identical_are_empty() {
        let fx = square();
        let finder = fx.finder();
        for (s, t) in [("a", "e"), ("a", "zz"), ("zz", "a"), ("a", "a")] {
            assert!(finder.any_path(&id(s), &id(t)).is_empty());
            assert!(finder.fewest_affiliations(&id(s), &id(t)).is_empty());
            assert!(finder.heaviest(&id(s), &id(t)).is_empty());
            assert!(finder.shortest(&id(s), &id(t)).is_empty());
        }
    }

    #[test]
    fn fewest_affiliations_takes_shortcut() {
        let fx = square();
        let path = fx.finder().fewest_affiliations(&id("a"), &id("d"));
        assert_eq!(hops(&path), vec![("a".into(), "d".into())]);

        let path = fx.finder().fewest_affiliations(&id("b"), &id("d"));
        assert_eq!(path.len(), 2);
        assert!(chains_from(&path, "b", "d"));
    }

    #[test]
    fn heaviest_prefers_heavy_detour() {
        // a-d is light; a-b-d is heavy.
        let fx = Fixture::new(
            &[("a", 0, 0), ("b", 1, 1), ("d", 2, 0)],
            &[("a", "d", 1), ("a", "b", 5), ("b", "d", 5)],
        );
        let path = fx.finder().heaviest(&id("a"), &id("d"));
        assert_eq!(
            hops(&path),
            vec![("a".into(), "b".into()), ("b".into(), "d".into())]
        );
        assert_eq!(path.iter().map(|c| c.weight.value()).sum::<u64>(), 10);
    }

    #[test]
    fn heaviest_raises_tentative_weight_before_settling() {
        // From a: c is first seen through a-c (2) and later raised through a-b-c (3 + 4).
        let fx = Fixture::new(
            &[("a", 0, 0), ("b", 1, 0), ("c", 2, 0), ("t", 3, 0)],
            &[("a", "b", 3), ("a", "c", 2), ("b", "c", 4), ("c", "t", 1)],
        );
        let path = fx.finder().heaviest(&id("a"), &id("t"));
        assert_eq!(
            hops(&path),
            vec![
                ("a".into(), "b".into()),
                ("b".into(), "c".into()),
                ("c".into(), "t".into())
            ]
        );
    }

    #[test]
    fn shortest_uses_geometry_not_weight() {
        // a-b-c is heavy and 10 long; a-x-y-c is light and 9 long.
        let fx = Fixture::new(
            &[("a", 0, 0), ("b", 3, 4), ("c", 6, 8), ("x", 1, 1), ("y", 2, 2)],
            &[("a", "b", 9), ("b", "c", 9), ("a", "x", 1), ("x", "y", 1), ("y", "c", 1)],
        );
        let path = fx.finder().shortest(&id("a"), &id("c"));
        let steps: Vec<u64> = path.iter().map(|(_, d)| d.value()).collect();
        // a(0,0)->x(1,1): 1, x->y: 1, y(2,2)->c(6,8): sqrt(52) = 7
        assert_eq!(steps, vec![1, 1, 7]);
        let conns: Vec<Connection> = path.into_iter().map(|(c, _)| c).collect();
        assert!(chains_from(&conns, "a", "c"));
    }

    #[test]
    fn shortest_reports_per_edge_lengths() {
        let fx = Fixture::new(
            &[("a", 0, 0), ("b", 3, 4), ("c", 6, 8)],
            &[("a", "b", 1), ("b", "c", 1)],
        );
        let path = fx.finder().shortest(&id("a"), &id("c"));
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].0, Connection::new(id("a"), id("b"), Weight(1)));
        assert_eq!(path[0].1, Distance(5));
        assert_eq!(path[1].0, Connection::new(id("b"), id("c"), Weight(1)));
        assert_eq!(path[1].1, Distance(5));
    }
}
