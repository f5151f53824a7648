//! Core data model: symbols, symbol references, function declarations and
//! call edges.
//!
//! A symbol is identified by its `(name, file)` pair. Both metadata records and
//! exported lists carry symbols as two-element `[name, file]` sequences.

use serde::{Deserialize, Serialize};

/// File component used by the compiler plugin when the declaring file of a
/// referenced symbol is not known at collection time.
pub const PLACEHOLDER_FILE: &str = "?";

/// A function symbol, identified by name and declaring file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Symbol {
    pub name: String,
    pub file: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self { name: name.into(), file: file.into() }
    }
}

impl From<(String, String)> for Symbol {
    fn from((name, file): (String, String)) -> Self {
        Self { name, file }
    }
}

impl From<Symbol> for (String, String) {
    fn from(sym: Symbol) -> Self {
        (sym.name, sym.file)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.file)
    }
}

/// A reference to a function as recorded by the compiler plugin.
///
/// References to functions declared in another compilation unit carry the
/// placeholder file and must be resolved against the global name index before
/// anything consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub enum SymbolRef {
    Resolved(Symbol),
    Unresolved(String),
}

impl SymbolRef {
    pub fn name(&self) -> &str {
        match self {
            SymbolRef::Resolved(sym) => &sym.name,
            SymbolRef::Unresolved(name) => name,
        }
    }
}

impl From<(String, String)> for SymbolRef {
    fn from((name, file): (String, String)) -> Self {
        if file == PLACEHOLDER_FILE {
            SymbolRef::Unresolved(name)
        } else {
            SymbolRef::Resolved(Symbol { name, file })
        }
    }
}

impl From<SymbolRef> for (String, String) {
    fn from(sym: SymbolRef) -> Self {
        match sym {
            SymbolRef::Resolved(sym) => (sym.name, sym.file),
            SymbolRef::Unresolved(name) => (name, PLACEHOLDER_FILE.to_string()),
        }
    }
}

/// A function definition seen by the compiler plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub file: String,
    /// Placed in an init-only section (`__init`).
    #[serde(rename = "init", default)]
    pub is_init: bool,
    /// Externally visible (not `static`).
    #[serde(rename = "public", default)]
    pub is_public: bool,
    /// Identity used for set membership; defaults to `(name, file)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Symbol>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            is_init: false,
            is_public: false,
            signature: None,
        }
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn init(mut self) -> Self {
        self.is_init = true;
        self
    }

    pub fn symbol(&self) -> Symbol {
        self.signature.clone().unwrap_or_else(|| Symbol::new(&self.name, &self.file))
    }
}

/// Call edge as recorded in metadata; either end may be unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: SymbolRef,
    pub to: SymbolRef,
}

/// Call edge between two resolved symbols, directed caller to callee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    pub from: Symbol,
    pub to: Symbol,
}

impl CallEdge {
    pub fn new(from: Symbol, to: Symbol) -> Self {
        Self { from, to }
    }
}
