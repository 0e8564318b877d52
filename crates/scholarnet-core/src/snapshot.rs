//! # Snapshot
//!
//! A serde description of a whole catalog.
//!
//! The core performs no I/O: the binary decodes dataset files into a
//! [`Snapshot`] and calls [`Snapshot::restore`]. Restoring validates the
//! whole batch before anything is returned, so a bad dataset never yields a
//! half-built catalog.
//!
//! ## Validation
//!
//! - version must equal [`SNAPSHOT_VERSION`]
//! - record counts bounded by [`MAX_SNAPSHOT_RECORDS`]
//! - names and titles bounded by [`MAX_NAME_LENGTH`]
//! - identifiers unique per kind
//! - authors and reference endpoints must exist
//! - a produced-publication list, when given, must match the authorships

use crate::primitives::{MAX_NAME_LENGTH, MAX_SNAPSHOT_RECORDS, SNAPSHOT_VERSION};
use crate::{AffiliationId, Catalog, Coord, PublicationId, ScholarnetError, Year};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn current_version() -> u8 {
    SNAPSHOT_VERSION
}

/// One affiliation in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationRecord {
    pub id: AffiliationId,
    pub name: String,
    pub coord: Coord,
    /// Produced publications in linking order. Empty keeps the order in
    /// which the publication records link this affiliation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<PublicationId>,
}

/// One publication in a snapshot. Authors are listed in linking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub id: PublicationId,
    pub title: String,
    pub year: Year,
    #[serde(default)]
    pub authors: Vec<AffiliationId>,
}

/// A citation link: `parent` cites `child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub child: PublicationId,
    pub parent: PublicationId,
}

/// Serializable catalog contents.
///
/// Connections are not stored; they are derived again on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "current_version")]
    pub version: u8,
    #[serde(default)]
    pub affiliations: Vec<AffiliationRecord>,
    #[serde(default)]
    pub publications: Vec<PublicationRecord>,
    /// Applied in order, so each parent's reference list keeps this order.
    #[serde(default)]
    pub references: Vec<ReferenceRecord>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            affiliations: Vec::new(),
            publications: Vec::new(),
            references: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Describe the current contents of `catalog`.
    #[must_use]
    pub fn capture(catalog: &Catalog) -> Self {
        let affiliations = catalog
            .all_affiliations()
            .into_iter()
            .filter_map(|id| catalog.affiliation(&id))
            .map(|a| AffiliationRecord {
                id: a.id.clone(),
                name: a.name.clone(),
                coord: a.coord,
                publications: a.publications.clone(),
            })
            .collect();

        let ids = catalog.all_publications();
        let publications = ids
            .iter()
            .filter_map(|id| catalog.publication(*id))
            .map(|p| PublicationRecord {
                id: p.id,
                title: p.title.clone(),
                year: p.year,
                authors: p.authors.clone(),
            })
            .collect();

        let references = ids
            .iter()
            .flat_map(|parent| {
                catalog
                    .direct_references(*parent)
                    .unwrap_or(&[])
                    .iter()
                    .map(|child| ReferenceRecord {
                        child: *child,
                        parent: *parent,
                    })
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            affiliations,
            publications,
            references,
        }
    }

    /// Build a fresh catalog from this snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; see the module docs.
    pub fn restore(&self) -> Result<Catalog, ScholarnetError> {
        self.check_limits()?;

        let mut catalog = Catalog::new();

        for record in &self.affiliations {
            check_name_length("affiliation name", &record.name)?;
            if !catalog.add_affiliation(record.id.clone(), record.name.clone(), record.coord) {
                return Err(ScholarnetError::DuplicateAffiliation(record.id.clone()));
            }
        }

        for record in &self.publications {
            check_name_length("publication title", &record.title)?;
            if let Some(missing) = record
                .authors
                .iter()
                .find(|a| !catalog.contains_affiliation(a))
            {
                return Err(ScholarnetError::UnknownAffiliation(missing.clone()));
            }
            if !catalog.add_publication(record.id, record.title.clone(), record.year, &record.authors) {
                return Err(ScholarnetError::DuplicatePublication(record.id));
            }
        }

        for record in self.affiliations.iter().filter(|r| !r.publications.is_empty()) {
            if let Some(missing) = record
                .publications
                .iter()
                .find(|p| !catalog.contains_publication(**p))
            {
                return Err(ScholarnetError::UnknownPublication(*missing));
            }
            if !catalog.reorder_publications_of(&record.id, &record.publications) {
                return Err(ScholarnetError::DeserializationError(format!(
                    "Publications of {} do not match its authorships",
                    record.id
                )));
            }
        }

        for reference in &self.references {
            for endpoint in [reference.child, reference.parent] {
                if !catalog.contains_publication(endpoint) {
                    return Err(ScholarnetError::UnknownPublication(endpoint));
                }
            }
            catalog.add_reference(reference.child, reference.parent);
        }

        debug!(
            affiliations = catalog.affiliation_count(),
            publications = catalog.publication_count(),
            connections = catalog.connection_count(),
            "snapshot restored"
        );
        Ok(catalog)
    }

    fn check_limits(&self) -> Result<(), ScholarnetError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ScholarnetError::DeserializationError(format!(
                "Unsupported snapshot version: {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        let counts = [
            ("affiliations", self.affiliations.len()),
            ("publications", self.publications.len()),
            ("references", self.references.len()),
        ];
        for (kind, count) in counts {
            if count > MAX_SNAPSHOT_RECORDS {
                return Err(ScholarnetError::DeserializationError(format!(
                    "Too many {kind}: {count} (max {MAX_SNAPSHOT_RECORDS})"
                )));
            }
        }
        Ok(())
    }
}

fn check_name_length(what: &str, value: &str) -> Result<(), ScholarnetError> {
    if value.len() > MAX_NAME_LENGTH {
        return Err(ScholarnetError::DeserializationError(format!(
            "{what} too long: {} bytes (max {MAX_NAME_LENGTH})",
            value.len()
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Weight;

    fn id(s: &str) -> AffiliationId {
        AffiliationId::new(s)
    }

    fn affiliation(s: &str, x: i32, y: i32) -> AffiliationRecord {
        AffiliationRecord {
            id: id(s),
            name: format!("{s} University"),
            coord: Coord::new(x, y),
            publications: Vec::new(),
        }
    }

    fn publication(n: u64, authors: &[&str]) -> PublicationRecord {
        PublicationRecord {
            id: PublicationId(n),
            title: format!("Paper {n}"),
            year: Year(2000),
            authors: authors.iter().map(|a| id(a)).collect(),
        }
    }

    fn sample() -> Snapshot {
        Snapshot {
            affiliations: vec![affiliation("A", 0, 0), affiliation("B", 3, 4), affiliation("C", 6, 8)],
            publications: vec![
                publication(1, &["A", "B"]),
                publication(2, &["B", "C"]),
                publication(3, &["A", "B"]),
            ],
            references: vec![
                ReferenceRecord {
                    child: PublicationId(3),
                    parent: PublicationId(1),
                },
                ReferenceRecord {
                    child: PublicationId(2),
                    parent: PublicationId(1),
                },
            ],
            ..Snapshot::default()
        }
    }

    #[test]
    fn restore_derives_connections() {
        let catalog = sample().restore().expect("restore");
        assert_eq!(catalog.connection_weight(&id("A"), &id("B")), Some(Weight(2)));
        assert_eq!(catalog.connection_weight(&id("B"), &id("C")), Some(Weight(1)));
        assert_eq!(catalog.connection_weight(&id("A"), &id("C")), None);
        assert_eq!(
            catalog.direct_references(PublicationId(1)),
            Some(&[PublicationId(3), PublicationId(2)][..])
        );
    }

    #[test]
    fn capture_then_restore_is_stable() {
        let original = sample();
        let catalog = original.restore().expect("restore");
        let captured = Snapshot::capture(&catalog);
        assert_eq!(captured.publications, original.publications);
        assert_eq!(captured.references, original.references);
        assert_eq!(
            captured.affiliations[0].publications,
            vec![PublicationId(1), PublicationId(3)]
        );

        let again = captured.restore().expect("restore captured");
        assert_eq!(again.all_connections(), catalog.all_connections());
        assert_eq!(Snapshot::capture(&again), captured);
    }

    #[test]
    fn produced_order_survives_round_trip() {
        let mut catalog = Catalog::new();
        catalog.add_affiliation(id("A"), "Aalto", Coord::new(0, 0));
        catalog.add_affiliation(id("B"), "Bergen", Coord::new(1, 1));
        catalog.add_publication(PublicationId(1), "Late author", Year(2001), &[id("B")]);
        catalog.add_publication(PublicationId(2), "First", Year(2002), &[id("A")]);
        assert!(catalog.add_affiliation_to_publication(&id("A"), PublicationId(1)));

        let before = catalog.publications_of(&id("A")).map(<[_]>::to_vec);
        assert_eq!(before, Some(vec![PublicationId(2), PublicationId(1)]));

        let restored = Snapshot::capture(&catalog).restore().expect("restore");
        assert_eq!(restored.publications_of(&id("A")).map(<[_]>::to_vec), before);
        assert_eq!(restored.authors_of(PublicationId(1)), Some(&[id("B"), id("A")][..]));
        assert_eq!(restored.connection_weight(&id("A"), &id("B")), Some(Weight(1)));
    }

    #[test]
    fn rejects_produced_list_that_disagrees_with_authors() {
        let mut snapshot = sample();
        snapshot.affiliations[2].publications = vec![PublicationId(1)];
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::DeserializationError(_))
        ));

        let mut snapshot = sample();
        snapshot.affiliations[2].publications = vec![PublicationId(2), PublicationId(42)];
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::UnknownPublication(PublicationId(42)))
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let mut snapshot = sample();
        snapshot.affiliations.push(affiliation("A", 1, 1));
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::DuplicateAffiliation(a)) if a == id("A")
        ));

        let mut snapshot = sample();
        snapshot.publications.push(publication(2, &[]));
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::DuplicatePublication(PublicationId(2)))
        ));
    }

    #[test]
    fn rejects_unknown_references() {
        let mut snapshot = sample();
        snapshot.publications.push(publication(4, &["A", "Z"]));
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::UnknownAffiliation(a)) if a == id("Z")
        ));

        let mut snapshot = sample();
        snapshot.references.push(ReferenceRecord {
            child: PublicationId(9),
            parent: PublicationId(1),
        });
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::UnknownPublication(PublicationId(9)))
        ));
    }

    #[test]
    fn rejects_bad_version_and_long_names() {
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION.wrapping_add(1);
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::DeserializationError(_))
        ));

        let mut snapshot = sample();
        snapshot.affiliations[0].name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            snapshot.restore(),
            Err(ScholarnetError::DeserializationError(_))
        ));
    }

    #[test]
    fn empty_snapshot_restores_empty_catalog() {
        let catalog = Snapshot::default().restore().expect("restore");
        assert_eq!(catalog.affiliation_count(), 0);
        assert_eq!(Snapshot::capture(&catalog), Snapshot::default());
    }
}
