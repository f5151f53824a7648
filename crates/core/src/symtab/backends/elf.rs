use std::fs;
use std::io;
use std::path::Path;

use goblin::elf::{sym, Elf};
use log::debug;

use crate::symtab::{SymbolEntry, SymbolKind, SymbolScope, SymbolTableBackend, SymtabError};

/// Reads `.symtab` directly with goblin; no external tools required.
pub struct ElfBackend;

impl SymbolTableBackend for ElfBackend {
    fn read(&self, binary: &Path) -> Result<Vec<SymbolEntry>, SymtabError> {
        let bytes = fs::read(binary).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SymtabError::MissingBinary(binary.to_path_buf()),
            _ => SymtabError::Read { path: binary.to_path_buf(), source },
        })?;
        let elf = Elf::parse(&bytes).map_err(|e| {
            SymtabError::Backend(format!("failed to parse ELF {}: {e}", binary.display()))
        })?;
        let entries = elf_symbol_entries(&elf);
        debug!("elf: {} symbol rows from {}", entries.len(), binary.display());
        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "elf"
    }
}

fn elf_symbol_entries(elf: &Elf) -> Vec<SymbolEntry> {
    let mut entries = Vec::with_capacity(elf.syms.len());
    for s in elf.syms.iter() {
        let name = elf.strtab.get_at(s.st_name).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let kind = match s.st_type() {
            sym::STT_FILE => SymbolKind::File,
            sym::STT_FUNC => SymbolKind::Func,
            _ => SymbolKind::Other,
        };
        let scope =
            if s.st_bind() == sym::STB_LOCAL { SymbolScope::Local } else { SymbolScope::Global };
        entries.push(SymbolEntry { kind, scope, name: name.to_string() });
    }
    entries
}
