//! # Entity Store
//!
//! Affiliation and publication records keyed by identifier, plus the
//! authorship links between them.
//!
//! Authorship is stored twice (an affiliation's produced list and a
//! publication's author list) and every mutator here updates both sides.
//! The affiliation index is updated from inside the same mutators; no other
//! code path can reach the affiliation map mutably.

use crate::index::{self, AffiliationIndex};
use crate::{Affiliation, AffiliationId, Coord, Publication, PublicationId, Weight};
use std::collections::{BTreeMap, BTreeSet};

/// Coordinate lookup used by the path finders.
///
/// `None` means the affiliation does not exist.
pub trait Locate {
    /// The coordinate of `id`, if it exists.
    fn locate(&self, id: &AffiliationId) -> Option<Coord>;
}

/// Affiliation and publication records.
///
/// Uses `BTreeMap` exclusively for deterministic ordering.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    affiliations: BTreeMap<AffiliationId, Affiliation>,
    publications: BTreeMap<PublicationId, Publication>,
    index: AffiliationIndex,
}

impl EntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every record and reset the indices.
    pub fn clear(&mut self) {
        self.affiliations.clear();
        self.publications.clear();
        self.index.clear();
    }

    // -------------------------------------------------------------------------
    // Affiliations
    // -------------------------------------------------------------------------

    /// Insert an affiliation. Returns false if the identifier is taken.
    pub fn insert_affiliation(&mut self, affiliation: Affiliation) -> bool {
        if self.affiliations.contains_key(&affiliation.id) {
            return false;
        }
        self.index.on_insert(&affiliation);
        self.affiliations
            .insert(affiliation.id.clone(), affiliation);
        true
    }

    /// Move an affiliation. Returns false if it does not exist.
    pub fn move_affiliation(&mut self, id: &AffiliationId, coord: Coord) -> bool {
        let Some(affiliation) = self.affiliations.get_mut(id) else {
            return false;
        };
        let old = affiliation.coord;
        affiliation.coord = coord;
        self.index.on_move(id, old, coord);
        true
    }

    /// Remove an affiliation and strip it from every publication it authored.
    ///
    /// Returns the removed record.
    pub fn remove_affiliation(&mut self, id: &AffiliationId) -> Option<Affiliation> {
        let affiliation = self.affiliations.remove(id)?;
        self.index.on_remove(id, affiliation.coord);

        for publication_id in &affiliation.publications {
            if let Some(publication) = self.publications.get_mut(publication_id) {
                publication.authors.retain(|author| author != id);
            }
        }
        Some(affiliation)
    }

    /// Look up an affiliation.
    #[must_use]
    pub fn affiliation(&self, id: &AffiliationId) -> Option<&Affiliation> {
        self.affiliations.get(id)
    }

    /// Check whether an affiliation exists.
    #[must_use]
    pub fn contains_affiliation(&self, id: &AffiliationId) -> bool {
        self.affiliations.contains_key(id)
    }

    /// All affiliations in identifier order.
    pub fn affiliations(&self) -> impl Iterator<Item = &Affiliation> {
        self.affiliations.values()
    }

    /// Number of affiliations.
    #[must_use]
    pub fn affiliation_count(&self) -> usize {
        self.affiliations.len()
    }

    /// Identifiers ordered by name, then identifier.
    #[must_use]
    pub fn alphabetical(&self) -> &[AffiliationId] {
        self.index.alphabetical(&self.affiliations)
    }

    /// Identifiers ordered by distance from the origin.
    #[must_use]
    pub fn distance_increasing(&self) -> &[AffiliationId] {
        self.index.distance_increasing(&self.affiliations)
    }

    /// The affiliation registered at exactly `coord`.
    #[must_use]
    pub fn affiliation_at(&self, coord: Coord) -> Option<&AffiliationId> {
        self.index.at(coord)
    }

    /// Up to `limit` identifiers closest to `point`.
    #[must_use]
    pub fn closest_to(&self, point: Coord, limit: usize) -> Vec<AffiliationId> {
        let mut ranked = index::rank_by_distance(&self.affiliations, point);
        ranked.truncate(limit);
        ranked
    }

    /// Whether the name and distance orders are currently cached.
    #[must_use]
    pub fn index_freshness(&self) -> (bool, bool) {
        self.index.is_fresh()
    }

    // -------------------------------------------------------------------------
    // Publications
    // -------------------------------------------------------------------------

    /// Insert a publication with no authors. Returns false if the identifier is taken.
    pub fn insert_publication(&mut self, publication: Publication) -> bool {
        if self.publications.contains_key(&publication.id) {
            return false;
        }
        let mut publication = publication;
        publication.authors.clear();
        self.publications.insert(publication.id, publication);
        true
    }

    /// Remove a publication and strip it from every author's produced list.
    ///
    /// Returns the removed record; its author list names the affected authors.
    pub fn remove_publication(&mut self, id: PublicationId) -> Option<Publication> {
        let publication = self.publications.remove(&id)?;
        for author in &publication.authors {
            if let Some(affiliation) = self.affiliations.get_mut(author) {
                affiliation.publications.retain(|p| *p != id);
            }
        }
        Some(publication)
    }

    /// Look up a publication.
    #[must_use]
    pub fn publication(&self, id: PublicationId) -> Option<&Publication> {
        self.publications.get(&id)
    }

    /// Check whether a publication exists.
    #[must_use]
    pub fn contains_publication(&self, id: PublicationId) -> bool {
        self.publications.contains_key(&id)
    }

    /// All publications in identifier order.
    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.publications.values()
    }

    /// Number of publications.
    #[must_use]
    pub fn publication_count(&self) -> usize {
        self.publications.len()
    }

    // -------------------------------------------------------------------------
    // Authorship
    // -------------------------------------------------------------------------

    /// Record `affiliation` as an author of `publication`.
    ///
    /// Returns false if either side is missing or the link already exists.
    pub fn link(&mut self, affiliation: &AffiliationId, publication: PublicationId) -> bool {
        let (Some(aff), Some(publ)) = (
            self.affiliations.get_mut(affiliation),
            self.publications.get_mut(&publication),
        ) else {
            return false;
        };
        if publ.authors.contains(affiliation) {
            return false;
        }
        publ.authors.push(affiliation.clone());
        aff.publications.push(publication);
        true
    }

    /// Replace the produced list of `affiliation` with `order`.
    ///
    /// `order` must be a permutation of the current list; otherwise nothing
    /// changes and false is returned.
    pub fn reorder_produced(&mut self, affiliation: &AffiliationId, order: &[PublicationId]) -> bool {
        let Some(aff) = self.affiliations.get_mut(affiliation) else {
            return false;
        };
        let mut current = aff.publications.clone();
        let mut wanted = order.to_vec();
        current.sort_unstable();
        wanted.sort_unstable();
        if current != wanted {
            return false;
        }
        aff.publications = order.to_vec();
        true
    }

    /// Number of distinct publications produced by both `a` and `b`.
    #[must_use]
    pub fn shared_publications(&self, a: &AffiliationId, b: &AffiliationId) -> Weight {
        let (Some(first), Some(second)) = (self.affiliations.get(a), self.affiliations.get(b))
        else {
            return Weight::default();
        };
        let first: BTreeSet<PublicationId> = first.publications.iter().copied().collect();
        let second: BTreeSet<PublicationId> = second.publications.iter().copied().collect();
        Weight::new(first.intersection(&second).count() as u64)
    }
}

impl Locate for EntityStore {
    fn locate(&self, id: &AffiliationId) -> Option<Coord> {
        self.affiliations.get(id).map(|a| a.coord)
    }
}

impl Locate for BTreeMap<AffiliationId, Coord> {
    fn locate(&self, id: &AffiliationId) -> Option<Coord> {
        self.get(id).copied()
    }
}

// =============================================================================
// TESTS
// =============================================================================
