//! # Affiliation Indices
//!
//! Derived views over the affiliation table:
//! - identifiers ordered by name (ties by identifier)
//! - identifiers ordered by distance from the origin (ties by y, then identifier)
//! - exact coordinate → identifier lookup
//!
//! The two orderings are lazy caches held in a [`SortedView`]. A view is
//! invalidated by the table's own mutators and re-sorted on the next read,
//! so a read never observes an order computed before the last mutation.
//! The coordinate map is maintained eagerly.

use crate::primitives::ORIGIN;
use crate::{Affiliation, AffiliationId, Coord};
use std::cell::OnceCell;
use std::collections::BTreeMap;

// =============================================================================
// SORTED VIEW
// =============================================================================

/// A sorted list of identifiers that is rebuilt on demand.
///
/// Holding the cache in a `OnceCell` lets reads stay `&self` while still
/// filling the cache on first use. `invalidate` is the only way to drop it.
#[derive(Debug, Clone, Default)]
pub struct SortedView {
    cache: OnceCell<Vec<AffiliationId>>,
}

impl SortedView {
    /// Create an empty, invalid view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached order. The next read re-sorts.
    pub fn invalidate(&mut self) {
        self.cache.take();
    }

    /// True when the cached order is current.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Return the cached order, building it with `sort` if it was invalidated.
    pub fn get_or_sort(&self, sort: impl FnOnce() -> Vec<AffiliationId>) -> &[AffiliationId] {
        self.cache.get_or_init(sort)
    }
}

// =============================================================================
// ORDERING KEYS
// =============================================================================

/// Sort key for "closest to `point`": squared distance, then y, then identifier.
fn distance_key(point: Coord, affiliation: &Affiliation) -> (u128, i32, &AffiliationId) {
    (
        affiliation.coord.squared_distance_to(point),
        affiliation.coord.y,
        &affiliation.id,
    )
}

/// All identifiers ordered by distance from `point`.
pub fn rank_by_distance(
    records: &BTreeMap<AffiliationId, Affiliation>,
    point: Coord,
) -> Vec<AffiliationId> {
    let mut ranked: Vec<&Affiliation> = records.values().collect();
    ranked.sort_by(|a, b| distance_key(point, a).cmp(&distance_key(point, b)));
    ranked.into_iter().map(|a| a.id.clone()).collect()
}

/// All identifiers ordered by name, then identifier.
pub fn rank_by_name(records: &BTreeMap<AffiliationId, Affiliation>) -> Vec<AffiliationId> {
    let mut ranked: Vec<&Affiliation> = records.values().collect();
    ranked.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    ranked.into_iter().map(|a| a.id.clone()).collect()
}

// =============================================================================
// AFFILIATION INDEX
// =============================================================================

/// The three derived views kept next to the affiliation records.
#[derive(Debug, Clone, Default)]
pub struct AffiliationIndex {
    by_name: SortedView,
    by_distance: SortedView,
    by_coord: BTreeMap<Coord, AffiliationId>,
}

impl AffiliationIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly inserted affiliation.
    pub fn on_insert(&mut self, affiliation: &Affiliation) {
        self.by_name.invalidate();
        self.by_distance.invalidate();
        // Last write wins when two affiliations share a coordinate.
        self.by_coord
            .insert(affiliation.coord, affiliation.id.clone());
    }

    /// Record that `id` moved from `old` to `new`.
    pub fn on_move(&mut self, id: &AffiliationId, old: Coord, new: Coord) {
        self.by_distance.invalidate();
        self.forget_coord(id, old);
        self.by_coord.insert(new, id.clone());
    }

    /// Record that `id`, last seen at `coord`, was removed.
    pub fn on_remove(&mut self, id: &AffiliationId, coord: Coord) {
        self.by_name.invalidate();
        self.by_distance.invalidate();
        self.forget_coord(id, coord);
    }

    /// Reset every view.
    pub fn clear(&mut self) {
        self.by_name.invalidate();
        self.by_distance.invalidate();
        self.by_coord.clear();
    }

    /// Identifiers ordered by name.
    pub fn alphabetical<'a>(
        &'a self,
        records: &BTreeMap<AffiliationId, Affiliation>,
    ) -> &'a [AffiliationId] {
        self.by_name.get_or_sort(|| rank_by_name(records))
    }

    /// Identifiers ordered by distance from the origin.
    pub fn distance_increasing<'a>(
        &'a self,
        records: &BTreeMap<AffiliationId, Affiliation>,
    ) -> &'a [AffiliationId] {
        self.by_distance
            .get_or_sort(|| rank_by_distance(records, ORIGIN))
    }

    /// The affiliation registered at exactly `coord`.
    #[must_use]
    pub fn at(&self, coord: Coord) -> Option<&AffiliationId> {
        self.by_coord.get(&coord)
    }

    /// Whether the name and distance orders are currently cached.
    #[must_use]
    pub fn is_fresh(&self) -> (bool, bool) {
        (self.by_name.is_fresh(), self.by_distance.is_fresh())
    }

    /// Drop the coordinate entry only if it still belongs to `id`.
    fn forget_coord(&mut self, id: &AffiliationId, coord: Coord) {
        if self.by_coord.get(&coord) == Some(id) {
            self.by_coord.remove(&coord);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
