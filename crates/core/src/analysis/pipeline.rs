use std::path::PathBuf;

use log::info;

use crate::analysis::{
    aggregate, inflect, initial_insiders, resolve, Boundary, Classification, ClassifyError,
};
use crate::config::{load_config, BoundaryConfig, ModuleFiles};
use crate::metadata::{load_all_metadata, MetadataRecord};
use crate::symtab::{LinkedSymbols, Reconciler, SymbolEntry, SymbolTableBackend};

/// Classify the subsystem from fully loaded inputs.
///
/// Pure: no IO, and the result depends only on the inputs.
pub fn classify(
    modules: &ModuleFiles,
    records: &[MetadataRecord],
    entries: &[SymbolEntry],
) -> Classification {
    let aggregate = aggregate(records, modules);
    let resolved = resolve(records, &aggregate, modules);
    let linked = Reconciler::new(modules, &aggregate.all_functions).reconcile(entries);

    let initial =
        initial_insiders(&aggregate.module_functions, &aggregate.interface, &resolved.fn_ptrs);
    let boundary = Boundary {
        interface: &aggregate.interface,
        fn_ptrs: &resolved.fn_ptrs,
        init: &aggregate.init,
    };
    let inflection = inflect(&initial, &resolved.edges, boundary);

    Classification::assemble(&aggregate, &resolved.fn_ptrs, initial, inflection, linked)
}

/// Input locations for one classification run.
#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    /// Path to `sched_boundary.yaml`.
    pub config_path: PathBuf,
    /// Directory searched recursively for metadata records.
    pub metadata_root: PathBuf,
    /// Linked binary whose symbol table is reconciled (e.g. `vmlinux`).
    pub binary_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    pub config: BoundaryConfig,
    pub classification: Classification,
}

/// Loads every input up front, then classifies.
pub struct BoundaryRunner<'a> {
    pub backend: &'a dyn SymbolTableBackend,
}

impl<'a> BoundaryRunner<'a> {
    pub fn run(&self, request: &ClassifyRequest) -> Result<ClassifyOutcome, ClassifyError> {
        let (config, modules, records) = self.load_inputs(request)?;
        let entries = self.backend.read(&request.binary_path)?;

        let classification = classify(&modules, &records, &entries);
        let summary = classification.summary();
        info!(
            "classified {} functions: {} insider, {} outsider, {} optimized out, {} tainted",
            summary.functions,
            summary.insider,
            summary.outsider,
            summary.optimized_out,
            summary.tainted
        );
        Ok(ClassifyOutcome { config, classification })
    }

    /// Only the symbol-table side: which subsystem functions the binary holds.
    pub fn reconcile(&self, request: &ClassifyRequest) -> Result<LinkedSymbols, ClassifyError> {
        let (_config, modules, records) = self.load_inputs(request)?;
        let entries = self.backend.read(&request.binary_path)?;
        let aggregate = aggregate(&records, &modules);
        Ok(Reconciler::new(&modules, &aggregate.all_functions).reconcile(&entries))
    }

    fn load_inputs(
        &self,
        request: &ClassifyRequest,
    ) -> Result<(BoundaryConfig, ModuleFiles, Vec<MetadataRecord>), ClassifyError> {
        let config = load_config(&request.config_path)?;
        let modules = config.module_files();
        let records = load_all_metadata(&request.metadata_root)?;
        info!(
            "loaded {} metadata records for {} subsystem files",
            records.len(),
            modules.len()
        );
        Ok((config, modules, records))
    }
}
