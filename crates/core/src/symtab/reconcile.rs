use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::config::ModuleFiles;
use crate::model::Symbol;
use crate::symtab::{strip_clone_suffix, SymbolEntry, SymbolKind, SymbolScope};

/// What the linked binary says about the subsystem's functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkedSymbols {
    /// Subsystem functions present in the binary.
    pub linked: BTreeSet<Symbol>,
    /// Ordinal of each local subsystem function among local functions of the same name.
    #[serde(serialize_with = "positions_as_list")]
    pub local_positions: BTreeMap<Symbol, u32>,
    /// Entries whose declaring file could not be confirmed; kept under the
    /// file the binary reported.
    pub unattributed: Vec<Symbol>,
}

impl LinkedSymbols {
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.linked.contains(symbol)
    }

    /// Local position of `symbol`, `0` when it has none.
    pub fn local_position(&self, symbol: &Symbol) -> u32 {
        self.local_positions.get(symbol).copied().unwrap_or(0)
    }
}

fn positions_as_list<S>(
    positions: &BTreeMap<Symbol, u32>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(positions.len()))?;
    for (symbol, position) in positions {
        seq.serialize_element(&(symbol, position))?;
    }
    seq.end()
}

/// Running count of local function names in scan order.
///
/// Every local function row counts, whichever file it belongs to, so the
/// ordinal matches the position a patch tool sees when it walks the same table.
#[derive(Debug, Default)]
pub struct LocalCounter<'e> {
    seen: HashMap<&'e str, u32>,
}

impl<'e> LocalCounter<'e> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more local occurrence of `name` and return its 1-based ordinal.
    pub fn next(&mut self, name: &'e str) -> u32 {
        let seen = self.seen.entry(name).or_insert(0);
        *seen += 1;
        *seen
    }
}

/// First candidate file that declares `name`, in candidate order.
pub fn resolve_declaring_file<'a>(
    name: &str,
    candidates: &'a [String],
    known: &BTreeSet<Symbol>,
) -> Option<&'a str> {
    candidates
        .iter()
        .find(|file| known.contains(&Symbol::new(name, file.as_str())))
        .map(String::as_str)
}

/// Matches symbol-table rows back to the compiler plugin's view.
///
/// The binary and the plugin disagree in four ways:
/// 1. the binary names object files by basename (`core.c`), the plugin by path;
/// 2. a function defined in a header is attributed to the including `.c` file;
/// 3. a global may be attributed to whatever object file was last seen;
/// 4. clones carry suffixes such as `.isra.0`.
pub struct Reconciler<'a> {
    modules: &'a ModuleFiles,
    known: &'a BTreeSet<Symbol>,
}

impl<'a> Reconciler<'a> {
    /// `known` is every function signature seen in metadata.
    pub fn new(modules: &'a ModuleFiles, known: &'a BTreeSet<Symbol>) -> Self {
        Self { modules, known }
    }

    pub fn reconcile(&self, entries: &[SymbolEntry]) -> LinkedSymbols {
        let mut out = LinkedSymbols::default();
        let mut current_file = String::new();
        let mut counter = LocalCounter::new();

        for entry in entries {
            match entry.kind {
                SymbolKind::File => {
                    current_file = self
                        .modules
                        .full_path(&entry.name)
                        .map(str::to_string)
                        .unwrap_or_else(|| entry.name.clone());
                    continue;
                }
                SymbolKind::Other => continue,
                SymbolKind::Func => {}
            }

            let name = strip_clone_suffix(&entry.name);
            let file = match entry.scope {
                SymbolScope::Local => {
                    let position = counter.next(name);
                    if !self.modules.contains(&current_file) {
                        continue;
                    }
                    let file = self.settle(name, &current_file, self.modules.headers(), &mut out);
                    out.local_positions.insert(Symbol::new(name, file), position);
                    file
                }
                SymbolScope::Global => {
                    self.settle(name, &current_file, self.modules.files(), &mut out)
                }
            };

            if self.modules.contains(file) {
                out.linked.insert(Symbol::new(name, file));
            }
        }

        debug!(
            "reconciled {} linked subsystem functions ({} local, {} unattributed)",
            out.linked.len(),
            out.local_positions.len(),
            out.unattributed.len()
        );
        out
    }

    /// Declaring file for `name`, preferring the binary's own attribution.
    fn settle<'f>(
        &'f self,
        name: &str,
        reported: &'f str,
        candidates: &'a [String],
        out: &mut LinkedSymbols,
    ) -> &'f str {
        if self.known.contains(&Symbol::new(name, reported)) {
            return reported;
        }
        if let Some(file) = resolve_declaring_file(name, candidates, self.known) {
            return file;
        }
        if self.modules.contains(reported) {
            warn!("no declaring file found for {name}; keeping {reported}");
            out.unattributed.push(Symbol::new(name, reported));
        }
        reported
    }
}
