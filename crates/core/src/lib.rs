//! boundary-core
//!
//! Core library for classifying the function symbols of a subsystem (for
//! example the kernel scheduler) so it can be carved out of a linked image and
//! replaced at runtime.
//!
//! This crate reconciles two views of the same code: per-compilation-unit
//! metadata emitted by a compiler plugin, and the symbol table of the final
//! linked binary. All substantive logic lives here so it is testable and can be
//! driven from multiple frontends.

pub mod analysis;
pub mod config;
pub mod metadata;
pub mod model;
pub mod report;
pub mod symtab;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
