use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::config::ModuleFiles;
use crate::metadata::MetadataRecord;
use crate::model::Symbol;

/// Name to declaring file, for externally visible functions only.
///
/// Duplicate public names are last-writer-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalNameIndex {
    files: HashMap<String, String>,
}

impl GlobalNameIndex {
    pub fn insert(&mut self, name: impl Into<String>, file: impl Into<String>) {
        let (name, file) = (name.into(), file.into());
        if let Some(previous) = self.files.get(&name) {
            if *previous != file {
                warn!("public function {name} declared in {previous} and {file}; using {file}");
            }
        }
        self.files.insert(name, file);
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Global sets merged from every metadata record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub all_functions: BTreeSet<Symbol>,
    /// Functions declared in a subsystem file.
    pub module_functions: BTreeSet<Symbol>,
    pub interface: BTreeSet<Symbol>,
    pub init: BTreeSet<Symbol>,
    pub name_index: GlobalNameIndex,
}

pub fn aggregate(records: &[MetadataRecord], modules: &ModuleFiles) -> Aggregate {
    let mut out = Aggregate::default();
    for record in records {
        for decl in &record.functions {
            let sym = decl.symbol();
            if modules.contains(&sym.file) {
                out.module_functions.insert(sym.clone());
            }
            if decl.is_init {
                out.init.insert(sym.clone());
            }
            if decl.is_public {
                out.name_index.insert(&decl.name, &decl.file);
            }
            out.all_functions.insert(sym);
        }
        out.interface.extend(record.interface.iter().cloned());
    }
    debug!(
        "aggregated {} records: {} functions, {} in subsystem, {} interface, {} init, {} public",
        records.len(),
        out.all_functions.len(),
        out.module_functions.len(),
        out.interface.len(),
        out.init.len(),
        out.name_index.len()
    );
    out
}
