use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::symtab::{SymbolEntry, SymbolKind, SymbolScope, SymbolTableBackend, SymtabError};

/// Shells out to `readelf --syms --wide` and parses its listing.
pub struct ReadelfBackend;

impl SymbolTableBackend for ReadelfBackend {
    fn read(&self, binary: &Path) -> Result<Vec<SymbolEntry>, SymtabError> {
        if !binary.is_file() {
            return Err(SymtabError::MissingBinary(binary.to_path_buf()));
        }

        // Allow tests to feed a captured listing so readelf need not be installed.
        let listing = if let Some(fake) = std::env::var_os("SB_READELF_FAKE_OUTPUT") {
            fs::read_to_string(&fake).map_err(|e| {
                SymtabError::Backend(format!("failed to read SB_READELF_FAKE_OUTPUT: {e}"))
            })?
        } else {
            run_readelf(&resolve_readelf_path(), binary)?
        };

        let entries = parse_readelf_symbols(&listing);
        debug!("readelf: {} symbol rows from {}", entries.len(), binary.display());
        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "readelf"
    }
}

fn resolve_readelf_path() -> PathBuf {
    std::env::var_os("READELF_BIN").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("readelf"))
}

fn run_readelf(readelf_bin: &Path, binary: &Path) -> Result<String, SymtabError> {
    let output = Command::new(readelf_bin)
        .args(["--syms", "--wide"])
        .arg(binary)
        .output()
        .map_err(|e| SymtabError::Backend(format!("failed to spawn readelf: {e}")))?;
    if !output.status.success() {
        return Err(SymtabError::Backend(format!("readelf exited with {}", output.status)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Parse a `readelf --syms --wide` listing.
///
/// Symbol rows have exactly eight columns
/// (`Num: Value Size Type Bind Vis Ndx Name`); anything else, including
/// banners and unnamed rows, is skipped. The column header itself parses as an
/// `Other` row and is ignored downstream.
pub fn parse_readelf_symbols(listing: &str) -> Vec<SymbolEntry> {
    listing
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 8 {
                return None;
            }
            let kind = match fields[3] {
                "FILE" => SymbolKind::File,
                "FUNC" => SymbolKind::Func,
                _ => SymbolKind::Other,
            };
            let scope = if fields[4] == "LOCAL" { SymbolScope::Local } else { SymbolScope::Global };
            Some(SymbolEntry { kind, scope, name: fields[7].to_string() })
        })
        .collect()
}
