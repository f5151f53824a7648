use std::collections::BTreeSet;

use log::debug;

use crate::analysis::{Aggregate, GlobalNameIndex};
use crate::config::ModuleFiles;
use crate::metadata::MetadataRecord;
use crate::model::{CallEdge, Symbol, SymbolRef, PLACEHOLDER_FILE};

/// Function-pointer targets and call edges with every callee placeholder resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    /// Address-taken subsystem functions that are not interface symbols.
    pub fn_ptrs: BTreeSet<Symbol>,
    /// Sorted, deduplicated call edges.
    pub edges: Vec<CallEdge>,
    /// References dropped because their name is not publicly declared anywhere
    /// (compiler builtins and the like).
    pub dropped: usize,
}

fn resolve_ref(reference: &SymbolRef, index: &GlobalNameIndex) -> Option<Symbol> {
    match reference {
        SymbolRef::Resolved(sym) => Some(sym.clone()),
        SymbolRef::Unresolved(name) => index.lookup(name).map(|file| Symbol::new(name, file)),
    }
}

/// Callers are never looked up: a placeholder caller stays under the
/// placeholder file, so it is neither an insider nor protected.
fn caller_symbol(reference: &SymbolRef) -> Symbol {
    match reference {
        SymbolRef::Resolved(sym) => sym.clone(),
        SymbolRef::Unresolved(name) => Symbol::new(name, PLACEHOLDER_FILE),
    }
}

pub fn resolve(
    records: &[MetadataRecord],
    aggregate: &Aggregate,
    modules: &ModuleFiles,
) -> Resolved {
    let index = &aggregate.name_index;
    let mut fn_ptrs = BTreeSet::new();
    let mut edges = BTreeSet::new();
    let mut dropped = 0;

    for record in records {
        for reference in &record.fn_ptrs {
            let Some(sym) = resolve_ref(reference, index) else {
                dropped += 1;
                continue;
            };
            if modules.contains(&sym.file) && !aggregate.interface.contains(&sym) {
                fn_ptrs.insert(sym);
            }
        }

        for edge in &record.edges {
            let Some(to) = resolve_ref(&edge.to, index) else {
                dropped += 1;
                continue;
            };
            edges.insert(CallEdge::new(caller_symbol(&edge.from), to));
        }
    }

    debug!(
        "resolved {} fn_ptr targets and {} edges; dropped {} unresolvable references",
        fn_ptrs.len(),
        edges.len(),
        dropped
    );
    Resolved { fn_ptrs, edges: edges.into_iter().collect(), dropped }
}
