//! Linked-binary symbol tables.
//!
//! This module provides:
//! - `SymbolEntry`: one row of a binary's symbol table, in table order.
//! - `SymbolTableBackend`: adapters that produce those rows (`readelf`, native ELF).
//! - `Reconciler`: matches binary symbols back to compiler-metadata symbols.

pub mod backends;
mod reconcile;

pub use reconcile::{resolve_declaring_file, LinkedSymbols, LocalCounter, Reconciler};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbol type column, reduced to what reconciliation cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Marks the start of the symbols contributed by one object file.
    File,
    Func,
    Other,
}

/// Binding column: `LOCAL` or anything externally visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolScope {
    Local,
    Global,
}

/// One symbol-table row.
///
/// For `File` entries `name` is the object file name the marker introduces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub kind: SymbolKind,
    pub scope: SymbolScope,
    pub name: String,
}

impl SymbolEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self { kind: SymbolKind::File, scope: SymbolScope::Local, name: name.into() }
    }

    pub fn local_func(name: impl Into<String>) -> Self {
        Self { kind: SymbolKind::Func, scope: SymbolScope::Local, name: name.into() }
    }

    pub fn global_func(name: impl Into<String>) -> Self {
        Self { kind: SymbolKind::Func, scope: SymbolScope::Global, name: name.into() }
    }
}

/// Strip compiler clone suffixes (`.isra.0`, `.part.3`, `.constprop.1`, ...).
///
/// C identifiers never contain `.`, so everything from the first dot on is
/// compiler-generated.
pub fn strip_clone_suffix(name: &str) -> &str {
    match name.find('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

#[derive(Debug, Error)]
pub enum SymtabError {
    #[error("Binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("Failed to read binary {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Symbol table backend not found: {0}")]
    MissingBackend(String),
    #[error("Symbol table backend error: {0}")]
    Backend(String),
}

/// Trait implemented by symbol-table readers.
pub trait SymbolTableBackend: Send + Sync {
    /// Read every symbol-table row of `binary`, in table order.
    fn read(&self, binary: &Path) -> Result<Vec<SymbolEntry>, SymtabError>;
    fn name(&self) -> &'static str;
}

/// Registry for symbol-table backends; callers select by name.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Box<dyn SymbolTableBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self { backends: HashMap::new() }
    }

    /// Registry holding every backend compiled into this build.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(backends::ReadelfBackend);
        #[cfg(feature = "elf-backend")]
        registry.register(backends::ElfBackend);
        registry
    }

    pub fn register<B: SymbolTableBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends.insert(backend.name().to_string(), Box::new(backend));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn SymbolTableBackend> {
        self.backends.get(name).map(|b| &**b)
    }

    /// Like `get`, but reports the missing name as an error.
    pub fn require(&self, name: &str) -> Result<&dyn SymbolTableBackend, SymtabError> {
        self.get(name).ok_or_else(|| {
            SymtabError::MissingBackend(format!("{name} (available: {})", self.names().join(", ")))
        })
    }

    /// Return a sorted list of registered backend names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.backends.keys().cloned().collect();
        keys.sort();
        keys
    }
}
