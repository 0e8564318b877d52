//! # Catalog
//!
//! The single owner of every Scholarnet structure:
//! - the entity store (records, authorship, affiliation indices)
//! - the citation forest
//! - the derived connection graph
//!
//! Every public operation enters here. Cascades that span more than one
//! structure (removing an affiliation, removing a publication, linking an
//! author) are orchestrated in this module and nowhere else.
//!
//! Lookups never panic: a missing identifier yields `None` (or an empty
//! list for connection and path queries). Mutators return `false` when they
//! change nothing; the reason is not reported.

use crate::citation::{Attachment, CitationForest};
use crate::connection::ConnectionGraph;
use crate::pathfind::{DistancePath, PathFinder};
use crate::primitives::CLOSEST_AFFILIATIONS_LIMIT;
use crate::query::{PathKind, PathOutcome, PathQuery};
use crate::store::EntityStore;
use crate::{
    Affiliation, AffiliationId, Connection, Coord, Publication, PublicationId, Weight, Year,
};
use std::collections::BTreeSet;
use tracing::debug;

/// In-memory catalog of affiliations, publications and their graphs.
///
/// Single-threaded: wrap it in a lock if it must be shared.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    store: EntityStore,
    citations: CitationForest,
    connections: ConnectionGraph,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every store, index, graph and cache.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.citations.clear();
        self.connections.clear();
        debug!("catalog cleared");
    }

    // =========================================================================
    // COUNTS
    // =========================================================================

    #[must_use]
    pub fn affiliation_count(&self) -> usize {
        self.store.affiliation_count()
    }

    #[must_use]
    pub fn publication_count(&self) -> usize {
        self.store.publication_count()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.edge_count()
    }

    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.citations.link_count()
    }

    // =========================================================================
    // AFFILIATIONS
    // =========================================================================

    /// Add an affiliation. Returns false if the identifier is taken.
    pub fn add_affiliation(&mut self, id: AffiliationId, name: impl Into<String>, coord: Coord) -> bool {
        let added = self
            .store
            .insert_affiliation(Affiliation::new(id.clone(), name, coord));
        if added {
            debug!(affiliation = %id, %coord, "affiliation added");
        }
        added
    }

    #[must_use]
    pub fn contains_affiliation(&self, id: &AffiliationId) -> bool {
        self.store.contains_affiliation(id)
    }

    /// Full affiliation record.
    #[must_use]
    pub fn affiliation(&self, id: &AffiliationId) -> Option<&Affiliation> {
        self.store.affiliation(id)
    }

    #[must_use]
    pub fn affiliation_name(&self, id: &AffiliationId) -> Option<&str> {
        self.store.affiliation(id).map(|a| a.name.as_str())
    }

    #[must_use]
    pub fn affiliation_coord(&self, id: &AffiliationId) -> Option<Coord> {
        self.store.affiliation(id).map(|a| a.coord)
    }

    /// Every affiliation identifier, ascending.
    #[must_use]
    pub fn all_affiliations(&self) -> Vec<AffiliationId> {
        self.store.affiliations().map(|a| a.id.clone()).collect()
    }

    /// Identifiers ordered by name, ties by identifier.
    #[must_use]
    pub fn affiliations_alphabetically(&self) -> &[AffiliationId] {
        self.store.alphabetical()
    }

    /// Identifiers ordered by distance from the origin, ties by y then identifier.
    #[must_use]
    pub fn affiliations_distance_increasing(&self) -> &[AffiliationId] {
        self.store.distance_increasing()
    }

    /// The affiliation at exactly `coord`. With several, the last one placed there.
    #[must_use]
    pub fn find_affiliation_with_coord(&self, coord: Coord) -> Option<&AffiliationId> {
        self.store.affiliation_at(coord)
    }

    /// Up to three affiliations nearest to `point`.
    #[must_use]
    pub fn affiliations_closest_to(&self, point: Coord) -> Vec<AffiliationId> {
        self.store.closest_to(point, CLOSEST_AFFILIATIONS_LIMIT)
    }

    /// Move an affiliation. Returns false if it does not exist.
    pub fn change_affiliation_coord(&mut self, id: &AffiliationId, coord: Coord) -> bool {
        let moved = self.store.move_affiliation(id, coord);
        if moved {
            debug!(affiliation = %id, %coord, "affiliation moved");
        }
        moved
    }

    /// Publications produced by `id`, in linking order.
    #[must_use]
    pub fn publications_of(&self, id: &AffiliationId) -> Option<&[PublicationId]> {
        self.store.affiliation(id).map(|a| a.publications.as_slice())
    }

    /// Publications of `id` from `year` on, as `(year, id)` pairs in ascending order.
    #[must_use]
    pub fn publications_after(&self, id: &AffiliationId, year: Year) -> Option<Vec<(Year, PublicationId)>> {
        let affiliation = self.store.affiliation(id)?;
        let mut result: Vec<(Year, PublicationId)> = affiliation
            .publications
            .iter()
            .filter_map(|p| self.store.publication(*p))
            .filter(|p| p.year >= year)
            .map(|p| (p.year, p.id))
            .collect();
        result.sort_unstable();
        result.dedup();
        Some(result)
    }

    /// Restore the linking order of an affiliation's produced publications.
    ///
    /// Weights do not depend on order, so no connection changes.
    pub(crate) fn reorder_publications_of(&mut self, id: &AffiliationId, order: &[PublicationId]) -> bool {
        self.store.reorder_produced(id, order)
    }

    /// Remove an affiliation, its authorships and its connections.
    pub fn remove_affiliation(&mut self, id: &AffiliationId) -> bool {
        let Some(removed) = self.store.remove_affiliation(id) else {
            return false;
        };
        let neighbors = self.connections.remove_affiliation(id);
        debug!(
            affiliation = %id,
            publications = removed.publications.len(),
            connections = neighbors.len(),
            "affiliation removed"
        );
        true
    }

    // =========================================================================
    // PUBLICATIONS
    // =========================================================================

    /// Add a publication and link its authors.
    ///
    /// Returns false if the identifier is taken. Author identifiers that do
    /// not exist, and repeats, are skipped.
    pub fn add_publication(
        &mut self,
        id: PublicationId,
        title: impl Into<String>,
        year: Year,
        authors: &[AffiliationId],
    ) -> bool {
        if !self.store.insert_publication(Publication::new(id, title, year)) {
            return false;
        }
        let mut linked = Vec::with_capacity(authors.len());
        for author in authors {
            if self.store.link(author, id) {
                linked.push(author.clone());
            }
        }
        self.refresh_pairs(&linked, &linked);
        debug!(publication = %id, authors = linked.len(), "publication added");
        true
    }

    #[must_use]
    pub fn contains_publication(&self, id: PublicationId) -> bool {
        self.store.contains_publication(id)
    }

    /// Full publication record.
    #[must_use]
    pub fn publication(&self, id: PublicationId) -> Option<&Publication> {
        self.store.publication(id)
    }

    #[must_use]
    pub fn publication_title(&self, id: PublicationId) -> Option<&str> {
        self.store.publication(id).map(|p| p.title.as_str())
    }

    #[must_use]
    pub fn publication_year(&self, id: PublicationId) -> Option<Year> {
        self.store.publication(id).map(|p| p.year)
    }

    /// Every publication identifier, ascending.
    #[must_use]
    pub fn all_publications(&self) -> Vec<PublicationId> {
        self.store.publications().map(|p| p.id).collect()
    }

    /// Authors of `id`, in linking order.
    #[must_use]
    pub fn authors_of(&self, id: PublicationId) -> Option<&[AffiliationId]> {
        self.store.publication(id).map(|p| p.authors.as_slice())
    }

    /// Add `affiliation` as an author of `publication`.
    ///
    /// Returns false if either is missing or the affiliation is already an author.
    pub fn add_affiliation_to_publication(&mut self, affiliation: &AffiliationId, publication: PublicationId) -> bool {
        if !self.store.link(affiliation, publication) {
            return false;
        }
        let coauthors = self.authors_of(publication).map(<[_]>::to_vec).unwrap_or_default();
        self.refresh_pairs(std::slice::from_ref(affiliation), &coauthors);
        debug!(affiliation = %affiliation, publication = %publication, "author linked");
        true
    }

    /// Remove a publication, its authorships and its citation links.
    ///
    /// Connections between its former authors are recomputed; those that
    /// fall to zero are removed.
    pub fn remove_publication(&mut self, id: PublicationId) -> bool {
        let Some(removed) = self.store.remove_publication(id) else {
            return false;
        };
        self.citations.remove(id);
        self.refresh_pairs(&removed.authors, &removed.authors);
        debug!(publication = %id, authors = removed.authors.len(), "publication removed");
        true
    }

    // =========================================================================
    // CITATIONS
    // =========================================================================

    /// Record that `parent` cites `child`. Returns false if either is missing.
    ///
    /// A child already cited by another publication is moved under `parent`.
    pub fn add_reference(&mut self, child: PublicationId, parent: PublicationId) -> bool {
        if !self.store.contains_publication(child) || !self.store.contains_publication(parent) {
            return false;
        }
        match self.citations.attach(child, parent) {
            Attachment::Moved { previous } => {
                debug!(%child, %parent, %previous, "reference moved");
            }
            Attachment::Attached | Attachment::Unchanged => {}
        }
        true
    }

    /// Publications directly cited by `id`.
    #[must_use]
    pub fn direct_references(&self, id: PublicationId) -> Option<&[PublicationId]> {
        self.store
            .contains_publication(id)
            .then(|| self.citations.children_of(id))
    }

    /// The publication citing `id`, if any.
    #[must_use]
    pub fn parent_of(&self, id: PublicationId) -> Option<PublicationId> {
        if !self.store.contains_publication(id) {
            return None;
        }
        self.citations.parent_of(id)
    }

    /// Every publication above `id` in the citation forest, nearest first.
    #[must_use]
    pub fn referenced_by_chain(&self, id: PublicationId) -> Option<Vec<PublicationId>> {
        self.store
            .contains_publication(id)
            .then(|| self.citations.ancestors(id))
    }

    /// Every publication below `id` in the citation forest.
    #[must_use]
    pub fn all_references(&self, id: PublicationId) -> Option<Vec<PublicationId>> {
        self.store
            .contains_publication(id)
            .then(|| self.citations.descendants(id))
    }

    /// The nearest publication that is an ancestor of both `a` and `b`.
    #[must_use]
    pub fn closest_common_parent(&self, a: PublicationId, b: PublicationId) -> Option<PublicationId> {
        if !self.store.contains_publication(a) || !self.store.contains_publication(b) {
            return None;
        }
        self.citations.closest_common_ancestor(a, b)
    }

    // =========================================================================
    // CONNECTIONS
    // =========================================================================

    /// Connections of `id`, oriented `(id, other)`, ordered by `other`.
    #[must_use]
    pub fn connected_affiliations(&self, id: &AffiliationId) -> Vec<Connection> {
        self.connections.connections_of(id)
    }

    /// Every connection once, smaller identifier first, ordered by endpoints.
    #[must_use]
    pub fn all_connections(&self) -> Vec<Connection> {
        self.connections.all()
    }

    /// Weight of the connection between `a` and `b`.
    #[must_use]
    pub fn connection_weight(&self, a: &AffiliationId, b: &AffiliationId) -> Option<Weight> {
        self.connections.weight(a, b)
    }

    /// Recompute the weight of every pair drawn from `left` × `right`.
    fn refresh_pairs(&mut self, left: &[AffiliationId], right: &[AffiliationId]) {
        let mut seen = BTreeSet::new();
        for a in left {
            for b in right {
                if a == b || !seen.insert((a.min(b), a.max(b))) {
                    continue;
                }
                let weight = self.store.shared_publications(a, b);
                self.connections.set_weight(a, b, weight);
            }
        }
    }

    // =========================================================================
    // PATHS
    // =========================================================================

    fn finder(&self) -> PathFinder<'_, EntityStore> {
        PathFinder::new(&self.connections, &self.store)
    }

    /// Any path from `source` to `target`.
    #[must_use]
    pub fn any_path(&self, source: &AffiliationId, target: &AffiliationId) -> Vec<Connection> {
        self.finder().any_path(source, target)
    }

    /// The path through the fewest affiliations.
    #[must_use]
    pub fn path_with_least_affiliations(&self, source: &AffiliationId, target: &AffiliationId) -> Vec<Connection> {
        self.finder().fewest_affiliations(source, target)
    }

    /// A high-weight path. See [`PathFinder::heaviest`] for its limits.
    #[must_use]
    pub fn heaviest_path(&self, source: &AffiliationId, target: &AffiliationId) -> Vec<Connection> {
        self.finder().heaviest(source, target)
    }

    /// The geometrically shortest path, with each step's length.
    #[must_use]
    pub fn shortest_path(&self, source: &AffiliationId, target: &AffiliationId) -> DistancePath {
        self.finder().shortest(source, target)
    }

    /// Run a path query of any kind.
    #[must_use]
    pub fn run(&self, query: &PathQuery) -> PathOutcome {
        let (source, target) = (&query.source, &query.target);
        let outcome = match query.kind {
            PathKind::Any => PathOutcome::from_connections(query.kind, self.any_path(source, target)),
            PathKind::Fewest => PathOutcome::from_connections(
                query.kind,
                self.path_with_least_affiliations(source, target),
            ),
            PathKind::Heaviest => PathOutcome::from_connections(query.kind, self.heaviest_path(source, target)),
            PathKind::Shortest => PathOutcome::from_distances(query.kind, self.shortest_path(source, target)),
        };
        debug!(kind = %query.kind, %source, %target, steps = outcome.steps.len(), "path query");
        outcome
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

    fn p(n: u64) -> PublicationId {
        PublicationId(n)
    }

    /// A(0,0), B(3,4), C(6,8); P1 by {A,B}; P2 by {B,C}
    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_affiliation(id("A"), "Aalto", Coord::new(0, 0));
        catalog.add_affiliation(id("B"), "Bergen", Coord::new(3, 4));
        catalog.add_affiliation(id("C"), "Chalmers", Coord::new(6, 8));
        catalog.add_publication(p(1), "P", Year(2001), &[id("A"), id("B")]);
        catalog.add_publication(p(2), "Q", Year(2002), &[id("B"), id("C")]);
        catalog
    }

    #[test]
    fn lookups_and_sentinels() {
        let catalog = sample();
        assert_eq!(catalog.affiliation_name(&id("A")), Some("Aalto"));
        assert_eq!(catalog.affiliation_coord(&id("C")), Some(Coord::new(6, 8)));
        assert_eq!(catalog.affiliation_name(&id("Z")), None);
        assert_eq!(catalog.affiliation_coord(&id("Z")), None);
        assert_eq!(catalog.publication_title(p(2)), Some("Q"));
        assert_eq!(catalog.publication_year(p(9)), None);
        assert_eq!(catalog.authors_of(p(9)), None);
        assert_eq!(catalog.publications_of(&id("Z")), None);
        assert_eq!(catalog.direct_references(p(9)), None);
    }

    #[test]
    fn duplicate_adds_fail() {
        let mut catalog = sample();
        assert!(!catalog.add_affiliation(id("A"), "Other", Coord::new(1, 1)));
        assert!(!catalog.add_publication(p(1), "Again", Year(1999), &[]));
        assert_eq!(catalog.affiliation_count(), 3);
        assert_eq!(catalog.publication_count(), 2);
    }

    #[test]
    fn add_publication_skips_unknown_and_repeated_authors() {
        let mut catalog = sample();
        assert!(catalog.add_publication(p(3), "R", Year(2003), &[id("A"), id("X"), id("A"), id("C")]));
        assert_eq!(catalog.authors_of(p(3)), Some(&[id("A"), id("C")][..]));
        assert_eq!(catalog.connection_weight(&id("A"), &id("C")), Some(Weight(1)));
    }

    #[test]
    fn weights_are_recomputed_not_accumulated() {
        let mut catalog = sample();
        catalog.add_publication(p(3), "R", Year(2003), &[id("A"), id("B")]);
        assert_eq!(catalog.connection_weight(&id("A"), &id("B")), Some(Weight(2)));

        // Linking an existing co-author again changes nothing.
        assert!(!catalog.add_affiliation_to_publication(&id("A"), p(3)));
        assert_eq!(catalog.connection_weight(&id("A"), &id("B")), Some(Weight(2)));

        assert!(catalog.add_affiliation_to_publication(&id("C"), p(3)));
        assert_eq!(catalog.connection_weight(&id("A"), &id("C")), Some(Weight(1)));
        assert_eq!(catalog.connection_weight(&id("B"), &id("C")), Some(Weight(2)));
    }

    #[test]
    fn remove_publication_recomputes_and_prunes() {
        let mut catalog = sample();
        catalog.add_publication(p(3), "R", Year(2003), &[id("A"), id("B")]);
        catalog.add_reference(p(2), p(1));
        catalog.add_reference(p(3), p(2));

        assert!(catalog.remove_publication(p(1)));
        assert!(!catalog.remove_publication(p(1)));
        assert_eq!(catalog.connection_weight(&id("A"), &id("B")), Some(Weight(1)));
        assert_eq!(catalog.parent_of(p(2)), None);
        assert_eq!(catalog.parent_of(p(3)), Some(p(2)));

        assert!(catalog.remove_publication(p(3)));
        assert_eq!(catalog.connection_weight(&id("A"), &id("B")), None);
        assert_eq!(catalog.direct_references(p(2)), Some(&[][..]));
        assert_eq!(catalog.publications_of(&id("A")), Some(&[][..]));
    }

    #[test]
    fn remove_affiliation_cascades() {
        let mut catalog = sample();
        assert!(catalog.remove_affiliation(&id("B")));
        assert!(!catalog.remove_affiliation(&id("B")));
        assert!(catalog.connected_affiliations(&id("B")).is_empty());
        assert!(catalog.all_connections().is_empty());
        assert_eq!(catalog.authors_of(p(1)), Some(&[id("A")][..]));
        assert_eq!(catalog.affiliations_alphabetically(), &[id("A"), id("C")]);
        assert_eq!(catalog.find_affiliation_with_coord(Coord::new(3, 4)), None);
    }

    #[test]
    fn publications_after_sorted_by_year_then_id() {
        let mut catalog = sample();
        catalog.add_publication(p(0), "Old", Year(1990), &[id("B")]);
        catalog.add_publication(p(7), "Same", Year(2001), &[id("B")]);

        assert_eq!(
            catalog.publications_after(&id("B"), Year(2000)),
            Some(vec![(Year(2001), p(1)), (Year(2001), p(7)), (Year(2002), p(2))])
        );
        assert_eq!(catalog.publications_after(&id("Z"), Year(2000)), None);
    }

    #[test]
    fn reference_transitions() {
        let mut catalog = sample();
        catalog.add_publication(p(3), "R", Year(2003), &[]);
        assert!(catalog.add_reference(p(3), p(1)));
        assert!(catalog.add_reference(p(3), p(2)));
        assert_eq!(catalog.direct_references(p(1)), Some(&[][..]));
        assert_eq!(catalog.direct_references(p(2)), Some(&[p(3)][..]));
        assert!(!catalog.add_reference(p(3), p(99)));
        assert_eq!(catalog.referenced_by_chain(p(3)), Some(vec![p(2)]));
        assert_eq!(catalog.referenced_by_chain(p(99)), None);
        assert_eq!(catalog.all_references(p(2)), Some(vec![p(3)]));
    }

    #[test]
    fn run_dispatches_every_kind() {
        let catalog = sample();
        for kind in PathKind::ALL {
            let outcome = catalog.run(&PathQuery::new(kind, id("A"), id("C")));
            assert_eq!(outcome.affiliations(), vec![id("A"), id("B"), id("C")], "{kind}");
        }
        let shortest = catalog.run(&PathQuery::new(PathKind::Shortest, id("A"), id("C")));
        assert_eq!(shortest.total_distance().map(|d| d.value()), Some(10));
    }

    #[test]
    fn orders_are_cached_until_a_mutation_invalidates_them() {
        let mut catalog = sample();
        assert_eq!(catalog.store.index_freshness(), (false, false));

        let _ = catalog.affiliations_alphabetically();
        let _ = catalog.affiliations_distance_increasing();
        assert_eq!(catalog.store.index_freshness(), (true, true));

        // Moving only touches the distance order.
        assert!(catalog.change_affiliation_coord(&id("C"), Coord::new(-1, 0)));
        assert_eq!(catalog.store.index_freshness(), (true, false));
        assert_eq!(catalog.affiliations_distance_increasing(), &[id("A"), id("C"), id("B")]);

        // Linking authors changes no order.
        catalog.add_publication(p(3), "R", Year(2003), &[id("A"), id("C")]);
        assert_eq!(catalog.store.index_freshness(), (true, true));

        assert!(catalog.remove_affiliation(&id("A")));
        assert_eq!(catalog.store.index_freshness(), (false, false));
        assert_eq!(catalog.affiliations_alphabetically(), &[id("B"), id("C")]);
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut catalog = sample();
        catalog.add_reference(p(2), p(1));
        let _ = catalog.affiliations_alphabetically();
        catalog.clear_all();

        assert_eq!(catalog.affiliation_count(), 0);
        assert_eq!(catalog.publication_count(), 0);
        assert_eq!(catalog.connection_count(), 0);
        assert_eq!(catalog.reference_count(), 0);
        assert!(catalog.affiliations_alphabetically().is_empty());
        assert!(catalog.affiliations_distance_increasing().is_empty());
        assert_eq!(catalog.find_affiliation_with_coord(Coord::new(0, 0)), None);

        assert!(catalog.add_affiliation(id("A"), "Again", Coord::new(0, 0)));
    }
}
