#[cfg(feature = "elf-backend")]
pub mod elf;
pub mod readelf;

#[cfg(feature = "elf-backend")]
pub use elf::ElfBackend;
pub use readelf::{parse_readelf_symbols, ReadelfBackend};
