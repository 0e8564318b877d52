//! # Dataset Loading
//!
//! Reads a catalog snapshot from disk. The format follows the file
//! extension: `.json` is decoded with `serde_json`, `.toml` with `toml`.
//!
//! Paths are canonicalized and size-checked before any bytes are read.

use scholarnet_core::{Catalog, ScholarnetError, Snapshot};
use std::path::{Path, PathBuf};
use tracing::info;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum dataset file size (100 MB).
pub const MAX_DATASET_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Supported dataset encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Toml,
}

impl DatasetFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ScholarnetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ScholarnetError::DeserializationError(format!(
                "Unsupported dataset extension for '{}' (expected .json or .toml)",
                path.display()
            ))),
        }
    }

    /// Decode a snapshot from `text`.
    pub fn decode(self, text: &str) -> Result<Snapshot, ScholarnetError> {
        match self {
            Self::Json => serde_json::from_str(text)
                .map_err(|e| ScholarnetError::DeserializationError(format!("Invalid JSON dataset: {e}"))),
            Self::Toml => toml::from_str(text)
                .map_err(|e| ScholarnetError::DeserializationError(format!("Invalid TOML dataset: {e}"))),
        }
    }
}

/// Resolve `path` to a canonical regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, ScholarnetError> {
    let canonical = path.canonicalize().map_err(|e| {
        ScholarnetError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ScholarnetError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ScholarnetError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ScholarnetError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ScholarnetError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read and decode the snapshot stored at `path`.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, ScholarnetError> {
    let format = DatasetFormat::from_path(path)?;
    let canonical = validate_file_path(path)?;
    validate_file_size(&canonical, MAX_DATASET_FILE_SIZE)?;

    let text = std::fs::read_to_string(&canonical)
        .map_err(|e| ScholarnetError::IoError(format!("Cannot read '{}': {}", path.display(), e)))?;
    format.decode(&text)
}

/// Build a catalog from the dataset at `path`, or an empty one without a path.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, ScholarnetError> {
    let Some(path) = path else {
        return Ok(Catalog::new());
    };
    let catalog = load_snapshot(path)?.restore()?;
    info!(
        dataset = %path.display(),
        affiliations = catalog.affiliation_count(),
        publications = catalog.publication_count(),
        "dataset loaded"
    );
    Ok(catalog)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DatasetFormat::from_path(Path::new("a.json")).ok(), Some(DatasetFormat::Json));
        assert_eq!(DatasetFormat::from_path(Path::new("a.TOML")).ok(), Some(DatasetFormat::Toml));
        assert!(DatasetFormat::from_path(Path::new("a.csv")).is_err());
        assert!(DatasetFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn loads_toml_dataset() {
        let file = write_temp(
            ".toml",
            r#"
[[affiliations]]
id = "A"
name = "Aalto"
coord = { x = 0, y = 0 }

[[affiliations]]
id = "B"
name = "Bergen"
coord = { x = 3, y = 4 }

[[publications]]
id = 1
title = "Joint"
year = 2020
authors = ["A", "B"]
"#,
        );

        let catalog = load_catalog(Some(file.path())).expect("load");
        assert_eq!(catalog.affiliation_count(), 2);
        assert_eq!(catalog.connection_count(), 1);
    }

    #[test]
    fn loads_json_dataset() {
        let file = write_temp(
            ".json",
            r#"{"affiliations":[{"id":"A","name":"Aalto","coord":{"x":1,"y":2}}]}"#,
        );

        let snapshot = load_snapshot(file.path()).expect("load");
        assert_eq!(snapshot.affiliations.len(), 1);
        assert!(snapshot.publications.is_empty());
    }

    #[test]
    fn rejects_malformed_and_missing_files() {
        let file = write_temp(".json", "{ not json");
        assert!(matches!(
            load_snapshot(file.path()),
            Err(ScholarnetError::DeserializationError(_))
        ));

        assert!(matches!(
            load_snapshot(Path::new("/definitely/not/here.json")),
            Err(ScholarnetError::IoError(_))
        ));
    }

    #[test]
    fn no_path_means_empty_catalog() {
        let catalog = load_catalog(None).expect("empty");
        assert_eq!(catalog.affiliation_count(), 0);
    }
}
