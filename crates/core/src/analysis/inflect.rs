use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;

use crate::model::{CallEdge, Symbol};

/// Callers that never make a callee boundary-crossing, besides the insiders
/// themselves.
#[derive(Debug, Clone, Copy)]
pub struct Boundary<'a> {
    pub interface: &'a BTreeSet<Symbol>,
    pub fn_ptrs: &'a BTreeSet<Symbol>,
    pub init: &'a BTreeSet<Symbol>,
}

impl Boundary<'_> {
    pub fn protects(&self, symbol: &Symbol) -> bool {
        self.interface.contains(symbol)
            || self.fn_ptrs.contains(symbol)
            || self.init.contains(symbol)
    }
}

/// Why a tentative insider was evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Eviction {
    /// External caller that reached it (first in edge order).
    pub caller: Symbol,
    /// 1-based pass in which it was evicted.
    pub pass: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inflection {
    pub insiders: BTreeSet<Symbol>,
    pub evictions: BTreeMap<Symbol, Eviction>,
    /// Passes run, including the final one that changed nothing.
    pub passes: u32,
}

/// Shrink `initial` to the largest subset never called from outside
/// the insiders and the boundary.
///
/// Each pass marks every insider called by an unprotected non-insider and
/// removes the marks in one batch; the loop ends on the first pass that marks
/// nothing. The set only shrinks, so this takes at most `|initial| + 1` passes.
pub fn inflect(
    initial: &BTreeSet<Symbol>,
    edges: &[CallEdge],
    boundary: Boundary<'_>,
) -> Inflection {
    let mut insiders = initial.clone();
    let mut evictions = BTreeMap::new();
    let mut passes = 0;

    loop {
        passes += 1;
        let mut marked: BTreeMap<&Symbol, &Symbol> = BTreeMap::new();
        for edge in edges {
            if insiders.contains(&edge.to)
                && !insiders.contains(&edge.from)
                && !boundary.protects(&edge.from)
            {
                marked.entry(&edge.to).or_insert(&edge.from);
            }
        }
        if marked.is_empty() {
            break;
        }
        debug!("inflection pass {passes}: evicting {} insiders", marked.len());
        for (callee, caller) in marked {
            insiders.remove(callee);
            evictions.insert(callee.clone(), Eviction { caller: caller.clone(), pass: passes });
        }
    }

    Inflection { insiders, evictions, passes }
}
