use std::path::{Path, PathBuf};

/// Logical layout of the exported artifacts.
///
/// Derived from an output directory; it does not perform any IO itself.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Directory all artifacts are written to.
    pub root: PathBuf,
    /// Configuration with the classification lists filled in.
    pub extract_path: PathBuf,
    /// `<name> <sympos>` lines for symbols needing special handling.
    pub tainted_path: PathBuf,
    /// Interface names followed by marked function-pointer names.
    pub interface_path: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let extract_path = root.join("sched_boundary_extract.yaml");
        let tainted_path = root.join("tainted_functions");
        let interface_path = root.join("interface_fn_ptrs");

        Self { root, extract_path, tainted_path, interface_path }
    }

    /// All artifact paths, in write order.
    pub fn artifacts(&self) -> [&Path; 3] {
        [&self.extract_path, &self.tainted_path, &self.interface_path]
    }
}
