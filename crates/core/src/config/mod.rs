//! Boundary configuration and output layout.
//!
//! - `BoundaryConfig`: serializable contents of `sched_boundary.yaml`.
//! - `ModuleFiles`: derived lookup view over the configured subsystem files.
//! - `OutputLayout`: computed paths of the exported artifacts.

mod layout;

pub use layout::OutputLayout;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Default configuration file name, relative to the project root.
pub const CONFIG_FILE_NAME: &str = "sched_boundary.yaml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read boundary config at {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse boundary config at {path}: {source}")]
    Parse { path: PathBuf, source: serde_yaml::Error },

    #[error("Boundary config at {0} lists no mod_files")]
    NoModuleFiles(PathBuf),
}

/// Serializable boundary configuration.
///
/// Keys other than `mod_files` and `function` are carried through untouched so
/// the exported configuration is a superset of the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Source files that make up the subsystem under extraction.
    pub mod_files: Vec<String>,
    /// Classification lists; rewritten on export.
    #[serde(default, deserialize_with = "mapping_or_null")]
    pub function: serde_yaml::Mapping,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl BoundaryConfig {
    pub fn new<I, S>(mod_files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mod_files: mod_files.into_iter().map(Into::into).collect(),
            function: serde_yaml::Mapping::new(),
            extra: serde_yaml::Mapping::new(),
        }
    }

    pub fn module_files(&self) -> ModuleFiles {
        ModuleFiles::new(self.mod_files.iter().cloned())
    }
}

fn mapping_or_null<'de, D>(deserializer: D) -> Result<serde_yaml::Mapping, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<serde_yaml::Mapping>::deserialize(deserializer)?.unwrap_or_default())
}

/// Load and validate the boundary configuration at `path`.
pub fn load_config(path: &Path) -> Result<BoundaryConfig, ConfigError> {
    let body = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config: BoundaryConfig = serde_yaml::from_str(&body)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    if config.mod_files.is_empty() {
        return Err(ConfigError::NoModuleFiles(path.to_path_buf()));
    }
    Ok(config)
}

/// Lookup view over the subsystem's files.
///
/// `files` and `headers` keep configuration order; both are used as ordered
/// candidate lists when the binary's file attribution has to be corrected.
#[derive(Debug, Clone, Default)]
pub struct ModuleFiles {
    files: Vec<String>,
    members: HashSet<String>,
    basenames: BTreeMap<String, String>,
    headers: Vec<String>,
}

impl ModuleFiles {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self::default();
        for file in files {
            let file = file.into();
            if !out.members.insert(file.clone()) {
                continue;
            }
            let base = basename(&file).to_string();
            if let Some(previous) = out.basenames.insert(base.clone(), file.clone()) {
                warn!("basename {base} maps to both {previous} and {file}; keeping {file}");
            }
            if file.ends_with(".h") {
                out.headers.push(file.clone());
            }
            out.files.push(file);
        }
        out
    }

    pub fn contains(&self, file: &str) -> bool {
        self.members.contains(file)
    }

    /// Full path for an object-file basename as reported by the binary.
    pub fn full_path(&self, basename: &str) -> Option<&str> {
        self.basenames.get(basename).map(String::as_str)
    }

    /// Basename to full path, sorted by basename.
    pub fn basenames(&self) -> &BTreeMap<String, String> {
        &self.basenames
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
