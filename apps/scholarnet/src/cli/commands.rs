//! # CLI Command Implementations
//!
//! Each command reads the loaded catalog and returns the text to print,
//! either human-readable lines or pretty JSON when `json_mode` is set.

use super::{AffiliationOrder, CitationMode};
use scholarnet_core::{
    AffiliationId, Catalog, Connection, Coord, PathKind, PathQuery, PublicationId,
    ScholarnetError, Year,
};
use serde_json::json;
use tracing::debug;

fn render_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn require_affiliation(catalog: &Catalog, id: &str) -> Result<AffiliationId, ScholarnetError> {
    let id = AffiliationId::new(id);
    if !catalog.contains_affiliation(&id) {
        return Err(ScholarnetError::UnknownAffiliation(id));
    }
    Ok(id)
}

fn require_publication(catalog: &Catalog, id: u64) -> Result<PublicationId, ScholarnetError> {
    let id = PublicationId(id);
    if !catalog.contains_publication(id) {
        return Err(ScholarnetError::UnknownPublication(id));
    }
    Ok(id)
}

fn describe_connection(conn: &Connection) -> String {
    format!("{} -- {} (weight: {})", conn.from, conn.to, conn.weight.value())
}

fn describe_affiliations(catalog: &Catalog, ids: &[AffiliationId]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| catalog.affiliation(id))
        .map(|a| format!("  {}  {}  {}", a.id, a.name, a.coord))
        .collect()
}

fn affiliation_json(catalog: &Catalog, ids: &[AffiliationId]) -> serde_json::Value {
    ids.iter()
        .filter_map(|id| catalog.affiliation(id))
        .map(|a| json!({ "id": a.id, "name": a.name, "coord": a.coord }))
        .collect()
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalog counts.
pub fn cmd_status(catalog: &Catalog, json_mode: bool, verbose: bool) -> String {
    let nearest = catalog.affiliations_distance_increasing().first().cloned();

    if json_mode {
        return render_json(&json!({
            "affiliations": catalog.affiliation_count(),
            "publications": catalog.publication_count(),
            "connections": catalog.connection_count(),
            "references": catalog.reference_count(),
            "nearest_to_origin": nearest,
        }));
    }

    let mut lines = vec![
        "Scholarnet Catalog Status".to_string(),
        "=========================".to_string(),
        format!("Affiliations: {}", catalog.affiliation_count()),
        format!("Publications: {}", catalog.publication_count()),
        format!("Connections:  {}", catalog.connection_count()),
        format!("References:   {}", catalog.reference_count()),
    ];
    if verbose {
        lines.push(String::new());
        lines.push("Connections per affiliation:".to_string());
        for id in catalog.all_affiliations() {
            lines.push(format!("  {}: {}", id, catalog.connected_affiliations(&id).len()));
        }
        if let Some(nearest) = nearest {
            lines.push(format!("Nearest to origin: {nearest}"));
        }
    }
    lines.join("\n")
}

// =============================================================================
// AFFILIATION COMMANDS
// =============================================================================

/// List affiliations in the requested order.
pub fn cmd_affiliations(catalog: &Catalog, json_mode: bool, order: AffiliationOrder) -> String {
    let ids = match order {
        AffiliationOrder::Name => catalog.affiliations_alphabetically().to_vec(),
        AffiliationOrder::Distance => catalog.affiliations_distance_increasing().to_vec(),
        AffiliationOrder::Id => catalog.all_affiliations(),
    };
    debug!(?order, count = ids.len(), "listing affiliations");

    if json_mode {
        return render_json(&affiliation_json(catalog, &ids));
    }
    let mut lines = vec![format!("Affiliations ({}):", ids.len())];
    lines.extend(describe_affiliations(catalog, &ids));
    lines.join("\n")
}

/// Show up to three affiliations nearest to `(x, y)`.
pub fn cmd_closest(catalog: &Catalog, json_mode: bool, x: i32, y: i32) -> String {
    let point = Coord::new(x, y);
    let ids = catalog.affiliations_closest_to(point);

    if json_mode {
        return render_json(&json!({
            "point": point,
            "closest": affiliation_json(catalog, &ids),
        }));
    }
    let mut lines = vec![format!("Closest to {point}:")];
    lines.extend(
        ids.iter()
            .filter_map(|id| catalog.affiliation(id))
            .map(|a| format!("  {}  {}  distance {}", a.id, a.name, a.coord.distance_to(point).value())),
    );
    lines.join("\n")
}

/// List the publications of an affiliation, optionally from a year on.
pub fn cmd_publications(
    catalog: &Catalog,
    json_mode: bool,
    affiliation: &str,
    after: Option<i32>,
) -> Result<String, ScholarnetError> {
    let id = require_affiliation(catalog, affiliation)?;
    let ids: Vec<PublicationId> = match after {
        Some(year) => catalog
            .publications_after(&id, Year(year))
            .unwrap_or_default()
            .into_iter()
            .map(|(_, p)| p)
            .collect(),
        None => catalog.publications_of(&id).unwrap_or(&[]).to_vec(),
    };

    let records: Vec<_> = ids.iter().filter_map(|p| catalog.publication(*p)).collect();
    if json_mode {
        let list: Vec<_> = records
            .iter()
            .map(|p| json!({ "id": p.id, "title": p.title, "year": p.year, "authors": p.authors }))
            .collect();
        return Ok(render_json(&json!({ "affiliation": id, "publications": list })));
    }

    let mut lines = vec![format!("Publications of {} ({}):", id, records.len())];
    lines.extend(
        records
            .iter()
            .map(|p| format!("  {}  {}  {}", p.id, p.year, p.title)),
    );
    Ok(lines.join("\n"))
}

/// List connections, all or those of one affiliation.
pub fn cmd_connections(
    catalog: &Catalog,
    json_mode: bool,
    affiliation: Option<&str>,
) -> Result<String, ScholarnetError> {
    let connections = match affiliation {
        Some(a) => catalog.connected_affiliations(&require_affiliation(catalog, a)?),
        None => catalog.all_connections(),
    };

    if json_mode {
        return Ok(render_json(&json!(connections)));
    }
    let mut lines = vec![format!("Connections ({}):", connections.len())];
    lines.extend(connections.iter().map(|c| format!("  {}", describe_connection(c))));
    Ok(lines.join("\n"))
}

// =============================================================================
// CITATION COMMANDS
// =============================================================================

/// Walk the citation forest from one publication.
pub fn cmd_citations(
    catalog: &Catalog,
    json_mode: bool,
    publication: u64,
    mode: CitationMode,
) -> Result<String, ScholarnetError> {
    let id = require_publication(catalog, publication)?;
    let (label, found) = match mode {
        CitationMode::Chain => ("Cited by", catalog.referenced_by_chain(id)),
        CitationMode::All => ("All references of", catalog.all_references(id)),
        CitationMode::Direct => (
            "Direct references of",
            catalog.direct_references(id).map(<[_]>::to_vec),
        ),
    };
    let found = found.unwrap_or_default();

    if json_mode {
        return Ok(render_json(&json!({ "publication": id, "result": found })));
    }
    let mut lines = vec![format!("{label} {id} ({}):", found.len())];
    lines.extend(found.iter().map(|p| {
        let title = catalog.publication_title(*p).unwrap_or_default();
        format!("  {p}  {title}")
    }));
    Ok(lines.join("\n"))
}

/// Find the closest publication citing both `first` and `second`.
pub fn cmd_common_parent(
    catalog: &Catalog,
    json_mode: bool,
    first: u64,
    second: u64,
) -> Result<String, ScholarnetError> {
    let a = require_publication(catalog, first)?;
    let b = require_publication(catalog, second)?;
    let parent = catalog.closest_common_parent(a, b);

    if json_mode {
        return Ok(render_json(&json!({ "first": a, "second": b, "common_parent": parent })));
    }
    Ok(match parent {
        Some(p) => format!(
            "Closest common parent of {a} and {b}: {p}  {}",
            catalog.publication_title(p).unwrap_or_default()
        ),
        None => format!("No common parent for {a} and {b}"),
    })
}

// =============================================================================
// PATH COMMAND
// =============================================================================

/// Run a path search between two affiliations.
pub fn cmd_path(
    catalog: &Catalog,
    json_mode: bool,
    kind: &str,
    from: &str,
    to: &str,
) -> Result<String, ScholarnetError> {
    let kind: PathKind = kind.parse()?;
    let source = require_affiliation(catalog, from)?;
    let target = require_affiliation(catalog, to)?;
    let outcome = catalog.run(&PathQuery::new(kind, source.clone(), target.clone()));

    if json_mode {
        return Ok(render_json(&json!({
            "source": source,
            "target": target,
            "outcome": outcome,
            "total_weight": outcome.total_weight(),
            "total_distance": outcome.total_distance(),
        })));
    }

    if outcome.is_empty() {
        return Ok(format!("No {kind} path found from {source} to {target}"));
    }
    let visited: Vec<String> = outcome.affiliations().iter().map(ToString::to_string).collect();
    let mut lines = vec![
        format!("{} path {} -> {}:", kind, source, target),
        format!("  {}", visited.join(" -> ")),
    ];
    for step in &outcome.steps {
        match step.distance {
            Some(d) => lines.push(format!("  {}  length {}", describe_connection(&step.connection), d.value())),
            None => lines.push(format!("  {}", describe_connection(&step.connection))),
        }
    }
    lines.push(format!("Total weight: {}", outcome.total_weight().value()));
    if let Some(total) = outcome.total_distance() {
        lines.push(format!("Total length: {}", total.value()));
    }
    Ok(lines.join("\n"))
}
