//! Runtime generation of magic bitboard tables for rooks and bishops.

use crate::moves::magic::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use crate::moves::magic::search::find_magic_number_for_square;
use crate::moves::magic::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// How to seed the RNG used while searching for magic numbers.
#[derive(Debug, Clone, Copy)]
pub enum MagicTableSeed {
    /// Deterministic seed, for reproducible tests and builds.
    Fixed(u64),
    /// Seeded from the OS RNG.
    Random,
}

fn rook_mask(square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let mut mask = 0u64;

    for r in (rank + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in 1..rank {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in 1..file {
        mask |= 1u64 << (rank * 8 + f);
    }

    mask
}

fn bishop_mask(square: usize) -> u64 {
    let rank = square as isize / 8;
    let file = square as isize % 8;
    let mut mask = 0u64;

    let mut r = rank + 1;
    let mut f = file + 1;
    while r <= 6 && f <= 6 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f += 1;
    }

    let mut r = rank + 1;
    let mut f = file - 1;
    while r <= 6 && f >= 1 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f -= 1;
    }

    let mut r = rank - 1;
    let mut f = file + 1;
    while r >= 1 && f <= 6 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f += 1;
    }

    let mut r = rank - 1;
    let mut f = file - 1;
    while r >= 1 && f >= 1 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f -= 1;
    }

    mask
}

/// Enumerates every subset of `mask` via the Carry-Rippler trick.
fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones().min(12));
    let mut subset: u64 = 0;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn build_entry<F>(square: usize, mask_fn: fn(usize) -> u64, attacks_fn: F, rng: &mut StdRng) -> Result<MagicEntry, String>
where
    F: Fn(usize, u64) -> u64,
{
    let mask = mask_fn(square);
    let shift = 64 - mask.count_ones();

    let blockers = blocker_subsets(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attacks_fn(square, b)).collect();

    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)?;

    let table_size = 1usize << mask.count_ones();
    let mut table = vec![0u64; table_size];
    for (&b, &a) in blockers.iter().zip(attacks.iter()) {
        let index = ((b.wrapping_mul(magic)) >> shift) as usize;
        table[index] = a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    })
}

/// Generates full rook and bishop magic tables for all 64 squares.
pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            let mut bytes = [0u8; 32];
            use rand::RngCore;
            rand::rng().fill_bytes(&mut bytes);
            StdRng::from_seed(bytes)
        }
    };

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);

    for square in 0..64 {
        rook_entries.push(build_entry(
            square,
            rook_mask,
            rook_attacks_per_square,
            &mut rng,
        )?);
        bishop_entries.push(build_entry(
            square,
            bishop_mask,
            bishop_attacks_per_square,
            &mut rng,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}
