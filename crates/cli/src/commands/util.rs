use anyhow::{Context, Result};
use boundary_core::analysis::ClassifyRequest;
use boundary_core::config::CONFIG_FILE_NAME;
use boundary_core::symtab::{BackendRegistry, SymbolTableBackend};
use clap::Args;

use crate::{canonicalize_or_current, resolve_under};

/// Input locations shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Project root (kernel build tree). Defaults to the current working directory.
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Boundary config, relative to the root. Defaults to `sched_boundary.yaml`.
    #[arg(long)]
    pub config: Option<String>,

    /// Directory searched for `*.sched_boundary` records. Defaults to the root.
    #[arg(long)]
    pub metadata: Option<String>,

    /// Linked binary to reconcile against, relative to the root.
    #[arg(long, default_value = "vmlinux")]
    pub binary: String,

    /// Symbol table backend (`readelf` or `elf`).
    #[arg(long, default_value = "readelf")]
    pub backend: String,
}

impl InputArgs {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            config: None,
            metadata: None,
            binary: "vmlinux".to_string(),
            backend: "readelf".to_string(),
        }
    }

    /// Resolve every input path against the root.
    pub fn request(&self) -> Result<ClassifyRequest> {
        let root = canonicalize_or_current(&self.root)?;
        Ok(ClassifyRequest {
            config_path: resolve_under(&root, self.config.as_deref().unwrap_or(CONFIG_FILE_NAME)),
            metadata_root: resolve_under(&root, self.metadata.as_deref().unwrap_or(".")),
            binary_path: resolve_under(&root, &self.binary),
        })
    }
}

/// Run `f` with the backend named in `inputs`.
pub fn with_backend<T>(
    inputs: &InputArgs,
    f: impl FnOnce(&dyn SymbolTableBackend) -> Result<T>,
) -> Result<T> {
    let registry = BackendRegistry::with_defaults();
    let backend = registry.require(&inputs.backend).context("Unknown symbol table backend")?;
    f(backend)
}
