//! Single entry point for obtaining ready-to-use magic tables.
//!
//! Generation is expensive enough (64 squares x brute-force magic search) that
//! callers should not repeat it per-position; `load_magic_tables` memoizes the
//! result for the lifetime of the process.

use crate::moves::magic::precompute::{MagicTableSeed, generate_magic_tables};
use crate::moves::magic::structs::MagicTables;
use once_cell::sync::OnceCell;

fn seed() -> MagicTableSeed {
    if cfg!(feature = "deterministic_magic") {
        MagicTableSeed::Fixed(0x1234_5678_9ABC_DEF0)
    } else {
        MagicTableSeed::Random
    }
}

/// Returns the process-wide magic tables, generating them on first use.
pub fn load_magic_tables() -> MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES
        .get_or_init(|| generate_magic_tables(seed()).expect("failed to generate magic tables"))
        .clone()
}
