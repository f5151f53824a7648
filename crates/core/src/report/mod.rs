//! Exported artifacts.
//!
//! Everything is rendered in memory first; files are only touched once every
//! artifact rendered successfully, and each is persisted from a temp file in
//! the output directory so readers never observe a half-written file.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_yaml::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::analysis::{Category, Classification};
use crate::config::{BoundaryConfig, OutputLayout};

/// Prefix marking function-pointer targets in the interface surface list.
pub const FN_PTR_MARKER: &str = "__mod_";

/// Categories written into the `function` section of the extract, in order.
pub const EXPORTED_CATEGORIES: [Category; 6] = [
    Category::Outsider,
    Category::FnPtr,
    Category::Interface,
    Category::Init,
    Category::Insider,
    Category::OptimizedOut,
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize {what}: {source}")]
    Serialize { what: &'static str, source: serde_yaml::Error },

    #[error("Failed to create output dir {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// Derived module-file keys carried in the extract next to `mod_files`.
pub const BASENAME_MAP_KEY: &str = "mod_files_basename";
pub const HEADER_FILES_KEY: &str = "mod_header_files";

/// The configuration with every exported category filled in, plus the
/// basename map and header list derived from `mod_files`.
pub fn render_extract(
    config: &BoundaryConfig,
    classification: &Classification,
) -> Result<String, ReportError> {
    let mut extract = config.clone();
    let modules = config.module_files();
    let derived = [
        (BASENAME_MAP_KEY, serde_yaml::to_value(modules.basenames())),
        (HEADER_FILES_KEY, serde_yaml::to_value(modules.headers())),
    ];
    for (key, value) in derived {
        let value = value.map_err(|source| ReportError::Serialize { what: key, source })?;
        extract.extra.insert(Value::String(key.to_string()), value);
    }
    for category in EXPORTED_CATEGORIES {
        let list = serde_yaml::to_value(classification.symbols(category))
            .map_err(|source| ReportError::Serialize { what: category.as_str(), source })?;
        extract.function.insert(Value::String(category.as_str().to_string()), list);
    }
    serde_yaml::to_string(&extract)
        .map_err(|source| ReportError::Serialize { what: "boundary extract", source })
}

/// One `<name> <position>` line per tainted symbol.
pub fn render_tainted(classification: &Classification) -> String {
    classification
        .tainted
        .iter()
        .map(|t| format!("{} {}", t.symbol.name, t.position))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Interface names, then a newline, then marked function-pointer names.
pub fn render_interface_surface(classification: &Classification) -> String {
    let interface: Vec<&str> = classification.interface.iter().map(|s| s.name.as_str()).collect();
    let fn_ptrs: Vec<String> =
        classification.fn_ptr.iter().map(|s| format!("{FN_PTR_MARKER}{}", s.name)).collect();
    format!("{}\n{}", interface.join("\n"), fn_ptrs.join("\n"))
}

/// Render and write all artifacts under `layout`.
///
/// Each artifact replaces its target by rename. If a later rename fails, the
/// artifacts already replaced are restored to their previous contents (or
/// removed if they did not exist), so the set is updated all together or not
/// at all.
pub fn write_outputs(
    layout: &OutputLayout,
    config: &BoundaryConfig,
    classification: &Classification,
) -> Result<(), ReportError> {
    let rendered = [
        render_extract(config, classification)?,
        render_tainted(classification),
        render_interface_surface(classification),
    ];

    std::fs::create_dir_all(&layout.root)
        .map_err(|source| ReportError::CreateDir { path: layout.root.clone(), source })?;

    let mut staged = Vec::with_capacity(rendered.len());
    for (path, body) in layout.artifacts().into_iter().zip(rendered.iter()) {
        let previous = read_previous(path)?;
        staged.push((path, previous, stage(&layout.root, path, body)?));
    }

    let mut replaced: Vec<(&Path, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
    for (path, previous, file) in staged {
        if let Err(e) = file.persist(path) {
            rollback(&layout.root, &replaced);
            return Err(ReportError::Write { path: path.to_path_buf(), source: e.error });
        }
        info!("wrote {}", path.display());
        replaced.push((path, previous));
    }
    Ok(())
}

/// Current contents of an artifact about to be replaced, if it is a file.
fn read_previous(path: &Path) -> Result<Option<Vec<u8>>, ReportError> {
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::read(path)
        .map(Some)
        .map_err(|source| ReportError::Write { path: path.to_path_buf(), source })
}

/// Best effort: put already-replaced artifacts back the way they were.
fn rollback(dir: &Path, replaced: &[(&Path, Option<Vec<u8>>)]) {
    for (path, previous) in replaced {
        let restored = match previous {
            Some(bytes) => stage_bytes(dir, bytes)
                .and_then(|file| file.persist(path).map(|_| ()).map_err(|e| e.error)),
            None => std::fs::remove_file(path),
        };
        match restored {
            Ok(()) => warn!("rolled back {}", path.display()),
            Err(e) => warn!("failed to roll back {}: {e}", path.display()),
        }
    }
}

fn stage(dir: &Path, path: &Path, body: &str) -> Result<NamedTempFile, ReportError> {
    stage_bytes(dir, body.as_bytes())
        .map_err(|source| ReportError::Write { path: path.to_path_buf(), source })
}

fn stage_bytes(dir: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
