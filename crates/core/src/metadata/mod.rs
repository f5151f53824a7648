//! Per-compilation-unit metadata emitted by the compiler plugin.
//!
//! Each compilation unit produces one JSON document next to its object file,
//! named `<unit>.sched_boundary`.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::model::{FunctionDecl, RawEdge, Symbol, SymbolRef};

/// Suffix of metadata files written by the compiler plugin.
pub const METADATA_SUFFIX: &str = ".sched_boundary";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to walk metadata directory {path}: {source}")]
    Walk { path: PathBuf, source: walkdir::Error },

    #[error("Failed to read metadata record {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse metadata record {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Metadata for one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Functions defined in the unit.
    #[serde(rename = "fn", default)]
    pub functions: Vec<FunctionDecl>,
    /// Functions declared as part of the subsystem's external contract.
    #[serde(default)]
    pub interface: Vec<Symbol>,
    /// Functions whose address is taken.
    #[serde(rename = "fn_ptr", default)]
    pub fn_ptrs: Vec<SymbolRef>,
    /// Direct calls made from functions in the unit.
    #[serde(rename = "edge", default)]
    pub edges: Vec<RawEdge>,
}

impl MetadataRecord {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Recursively find every metadata file under `root`, in sorted path order.
pub fn discover_metadata_files(root: &Path) -> Result<Vec<PathBuf>, MetadataError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.map_err(|source| MetadataError::Walk { path: root.to_path_buf(), source })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_meta =
            entry.file_name().to_str().map(|n| n.ends_with(METADATA_SUFFIX)).unwrap_or(false);
        if is_meta {
            files.push(entry.into_path());
        }
    }
    debug!("found {} metadata records under {}", files.len(), root.display());
    Ok(files)
}

/// Read and parse a single metadata record.
pub fn load_metadata(path: &Path) -> Result<MetadataRecord, MetadataError> {
    let body = std::fs::read_to_string(path)
        .map_err(|source| MetadataError::Read { path: path.to_path_buf(), source })?;
    MetadataRecord::from_json(&body)
        .map_err(|source| MetadataError::Parse { path: path.to_path_buf(), source })
}

/// Discover and load every record under `root`.
///
/// Any unreadable or malformed record fails the whole load.
pub fn load_all_metadata(root: &Path) -> Result<Vec<MetadataRecord>, MetadataError> {
    discover_metadata_files(root)?.iter().map(|path| load_metadata(path)).collect()
}
