//! Symbol classification.
//!
//! Phases run in a fixed order, each consuming the previous one's output:
//! - `aggregate`: merge metadata records into global sets and the name index
//! - `resolve`: rewrite placeholder references, dropping unresolvable ones
//! - `inflect`: shrink the insider set to its fixpoint over the call graph
//! - `classify`: set algebra producing the exported categories
//!
//! The binary's symbol table is reconciled independently (`crate::symtab`) and
//! joined in the final phase.

mod aggregate;
mod classify;
mod inflect;
mod pipeline;
mod resolve;

pub use aggregate::{aggregate, Aggregate, GlobalNameIndex};
pub use classify::{
    initial_insiders, Category, Classification, ClassificationSummary, TaintedSymbol,
};
pub use inflect::{inflect, Boundary, Eviction, Inflection};
pub use pipeline::{classify, BoundaryRunner, ClassifyOutcome, ClassifyRequest};
pub use resolve::{resolve, Resolved};

use thiserror::Error;

use crate::config::ConfigError;
use crate::metadata::MetadataError;
use crate::report::ReportError;
use crate::symtab::SymtabError;

/// Any failure that aborts a classification run.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Symtab(#[from] SymtabError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
