use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::analysis::{Aggregate, Eviction, Inflection};
use crate::model::Symbol;
use crate::symtab::LinkedSymbols;

/// Exported category of a subsystem function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Interface,
    FnPtr,
    Init,
    Insider,
    Outsider,
    OptimizedOut,
    Tainted,
}

impl Category {
    /// Key used in the exported configuration and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Interface => "interface",
            Category::FnPtr => "fn_ptr",
            Category::Init => "init",
            Category::Insider => "insider",
            Category::Outsider => "outsider",
            Category::OptimizedOut => "optimized_out",
            Category::Tainted => "tainted",
        }
    }
}

/// A tainted symbol together with its local position (0 when global).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TaintedSymbol {
    pub symbol: Symbol,
    pub position: u32,
}

/// `module_functions - interface - fn_ptrs`.
pub fn initial_insiders(
    module_functions: &BTreeSet<Symbol>,
    interface: &BTreeSet<Symbol>,
    fn_ptrs: &BTreeSet<Symbol>,
) -> BTreeSet<Symbol> {
    module_functions
        .iter()
        .filter(|s| !interface.contains(*s) && !fn_ptrs.contains(*s))
        .cloned()
        .collect()
}

/// Final classification. Every set is sorted, so exports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub interface: BTreeSet<Symbol>,
    pub fn_ptr: BTreeSet<Symbol>,
    pub init: BTreeSet<Symbol>,
    pub initial_insider: BTreeSet<Symbol>,
    pub insider: BTreeSet<Symbol>,
    pub outsider: BTreeSet<Symbol>,
    pub optimized_out: BTreeSet<Symbol>,
    pub tainted: Vec<TaintedSymbol>,
    /// Every function signature seen in metadata.
    #[serde(skip)]
    pub known: BTreeSet<Symbol>,
    #[serde(skip)]
    pub linked: LinkedSymbols,
    #[serde(skip)]
    pub evictions: BTreeMap<Symbol, Eviction>,
}

impl Classification {
    /// Join the phase outputs with the set algebra of the exported categories.
    pub fn assemble(
        aggregate: &Aggregate,
        fn_ptrs: &BTreeSet<Symbol>,
        initial: BTreeSet<Symbol>,
        inflection: Inflection,
        linked: LinkedSymbols,
    ) -> Self {
        let Inflection { insiders, evictions, .. } = inflection;
        let outsider: BTreeSet<Symbol> = initial.difference(&insiders).cloned().collect();
        let optimized_out: BTreeSet<Symbol> =
            outsider.iter().filter(|s| !linked.contains(s)).cloned().collect();
        let tainted_set: BTreeSet<&Symbol> = aggregate
            .interface
            .iter()
            .chain(fn_ptrs.iter())
            .chain(insiders.iter())
            .filter(|s| linked.contains(s))
            .collect();
        let tainted = tainted_set
            .into_iter()
            .map(|s| TaintedSymbol { symbol: s.clone(), position: linked.local_position(s) })
            .collect();

        Self {
            interface: aggregate.interface.clone(),
            fn_ptr: fn_ptrs.clone(),
            init: aggregate.init.clone(),
            initial_insider: initial,
            insider: insiders,
            outsider,
            optimized_out,
            tainted,
            known: aggregate.all_functions.clone(),
            linked,
            evictions,
        }
    }

    /// Exported list for a category; `Tainted` yields the bare symbols.
    pub fn symbols(&self, category: Category) -> Vec<&Symbol> {
        match category {
            Category::Interface => self.interface.iter().collect(),
            Category::FnPtr => self.fn_ptr.iter().collect(),
            Category::Init => self.init.iter().collect(),
            Category::Insider => self.insider.iter().collect(),
            Category::Outsider => self.outsider.iter().collect(),
            Category::OptimizedOut => self.optimized_out.iter().collect(),
            Category::Tainted => self.tainted.iter().map(|t| &t.symbol).collect(),
        }
    }

    /// Every category `symbol` belongs to.
    pub fn categories_of(&self, symbol: &Symbol) -> Vec<Category> {
        let mut out = Vec::new();
        for (category, set) in [
            (Category::Interface, &self.interface),
            (Category::FnPtr, &self.fn_ptr),
            (Category::Init, &self.init),
            (Category::Insider, &self.insider),
            (Category::Outsider, &self.outsider),
            (Category::OptimizedOut, &self.optimized_out),
        ] {
            if set.contains(symbol) {
                out.push(category);
            }
        }
        if self.tainted.iter().any(|t| &t.symbol == symbol) {
            out.push(Category::Tainted);
        }
        out
    }

    /// Known symbols called `name`, optionally restricted to one file.
    pub fn lookup(&self, name: &str, file: Option<&str>) -> Vec<&Symbol> {
        self.known
            .iter()
            .filter(|s| s.name == name && file.map(|f| s.file == f).unwrap_or(true))
            .collect()
    }

    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary {
            functions: self.known.len(),
            interface: self.interface.len(),
            fn_ptr: self.fn_ptr.len(),
            init: self.init.len(),
            insider: self.insider.len(),
            outsider: self.outsider.len(),
            optimized_out: self.optimized_out.len(),
            tainted: self.tainted.len(),
            linked: self.linked.linked.len(),
            unattributed: self.linked.unattributed.len(),
        }
    }
}

/// Per-category counts for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub functions: usize,
    pub interface: usize,
    pub fn_ptr: usize,
    pub init: usize,
    pub insider: usize,
    pub outsider: usize,
    pub optimized_out: usize,
    pub tainted: usize,
    pub linked: usize,
    pub unattributed: usize,
}
