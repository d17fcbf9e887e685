use crate::bitboard::BitboardExt;
use crate::board::{Board, Color, Piece};
use crate::moves::magic::MagicTables;
use crate::moves::types::Move;

/// Material values for [`SeeExt::see_value`], distinct from the engine's
/// positional `Piece::value()` table: knights and bishops are equal and the
/// king is an unbounded sentinel, matching the classical SEE convention.
fn see_piece_value(p: Piece) -> i32 {
    match p {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 300,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 1_000_000,
    }
}

pub trait SeeExt {
    fn static_exchange_eval(&self, m: Move, threshold: i32, tables: &MagicTables) -> bool;
    /// Signed net material gained by playing `m` and letting both sides
    /// recapture optimally on the destination square. Positive means the
    /// side to move comes out ahead.
    fn see_value(&self, m: Move, tables: &MagicTables) -> i32;
    fn get_attackers_to_square_see(&self, square: u8, occupancy: u64, tables: &MagicTables) -> u64;
    fn get_lva_square(&self, attackers: u64, side: Color, occ: u64) -> u8;
}

impl SeeExt for Board {
    fn get_attackers_to_square_see(&self, square: u8, occupancy: u64, tables: &MagicTables) -> u64 {
        let sq_usize = square as usize;

        // 1. Pawns
        let white_pawns = crate::moves::pawn::pawn_attacks(square, Color::Black)
            & self.pieces(Piece::Pawn, Color::White);
        let black_pawns = crate::moves::pawn::pawn_attacks(square, Color::White)
            & self.pieces(Piece::Pawn, Color::Black);

        // 2. Knights
        let knights =
            self.pieces(Piece::Knight, Color::White) | self.pieces(Piece::Knight, Color::Black);
        let knight_attacks = crate::moves::knight::KNIGHT_ATTACKS[sq_usize] & knights;

        // 3. Kings
        let kings = self.pieces(Piece::King, Color::White) | self.pieces(Piece::King, Color::Black);
        let king_attacks = crate::moves::king::KING_ATTACKS[sq_usize] & kings;

        // 4. Sliders
        let bishop_queens = self.pieces(Piece::Bishop, Color::White)
            | self.pieces(Piece::Bishop, Color::Black)
            | self.pieces(Piece::Queen, Color::White)
            | self.pieces(Piece::Queen, Color::Black);
        let rook_queens = self.pieces(Piece::Rook, Color::White)
            | self.pieces(Piece::Rook, Color::Black)
            | self.pieces(Piece::Queen, Color::White)
            | self.pieces(Piece::Queen, Color::Black);

        let diag = tables.bishop.get_attacks(sq_usize, occupancy) & bishop_queens;
        let orth = tables.rook.get_attacks(sq_usize, occupancy) & rook_queens;

        (white_pawns | black_pawns | knight_attacks | king_attacks | diag | orth) & occupancy
    }

    fn static_exchange_eval(&self, m: Move, threshold: i32, tables: &MagicTables) -> bool {
        let to_sq = m.to.index();
        let from_sq = m.from.index();

        let piece_value = |p: Piece| match p {
            Piece::Pawn => 100,
            Piece::Knight => 320,
            Piece::Bishop => 330,
            Piece::Rook => 500,
            Piece::Queen => 900,
            Piece::King => 20000,
        };

        // 1. Initial Exchange
        let next_victim_piece = if m.is_en_passant() {
            Piece::Pawn
        } else {
            match self.piece_type_at(m.to) {
                Some(p) => p,
                None => return threshold <= 0,
            }
        };

        let mut value = piece_value(next_victim_piece);

        // FIX 1: Add promotion value (e.g., +800 if promoting to Queen)
        if let Some(p) = m.promotion {
            value += piece_value(p) - piece_value(Piece::Pawn);
        }

        if value < threshold {
            return false;
        }

        // FIX 2: The attacker is now the PROMOTED piece (Queen), not the original Pawn
        let mut next_victim = if let Some(p) = m.promotion {
            p
        } else {
            self.piece_type_at(m.from).unwrap()
        };

        let mut gain = [0; 32];
        let mut d = 0;
        gain[d] = value;

        // 2. Occupancy Simulation
        let mut occupancy = self.occupied();
        occupancy &= !(1u64 << from_sq);

        let mut attackers = self.get_attackers_to_square_see(to_sq, occupancy, tables);
        let mut side_to_move = self.side_to_move.opposite();

        // 3. Swap Loop
        loop {
            d += 1;
            let attacker_sq = self.get_lva_square(attackers, side_to_move, occupancy);
            if attacker_sq == 64 {
                break;
            }

            if next_victim == Piece::King {
                // The king just "captured" on this square, but the side to
                // move still has an attacker here: the king walked into
                // check, which is illegal. A king-sized sentinel keeps the
                // minimax below from ever favoring this continuation; clear
                // the attacker set so the next loop pass hits the normal
                // "no attacker" exit and `d` ends up one past this entry,
                // which the back-propagation below needs to read it at all.
                gain[d] = piece_value(Piece::King);
                attackers = 0;
                continue;
            }

            attackers &= !(1u64 << attacker_sq);
            occupancy &= !(1u64 << attacker_sq);

            if matches!(next_victim, Piece::Bishop | Piece::Rook | Piece::Queen) {
                attackers = self.get_attackers_to_square_see(to_sq, occupancy, tables);
                attackers &= !(1u64 << attacker_sq);
            }

            if d >= 31 {
                break;
            }

            gain[d] = piece_value(next_victim) - gain[d - 1];
            next_victim = self
                .piece_at(crate::square::Square::from_index(attacker_sq))
                .unwrap()
                .1;
            side_to_move = side_to_move.opposite();
        }

        // 4. Back-propagate
        while d > 1 {
            d -= 1;
            gain[d - 1] = -std::cmp::max(-gain[d - 1], gain[d]);
        }
        gain[0] >= threshold
    }

    fn see_value(&self, m: Move, tables: &MagicTables) -> i32 {
        let to_sq = m.to.index();
        let from_sq = m.from.index();

        let next_victim_piece = if m.is_en_passant() {
            Piece::Pawn
        } else {
            match self.piece_type_at(m.to) {
                Some(p) => p,
                None => return 0,
            }
        };

        let mut value = see_piece_value(next_victim_piece);
        if let Some(p) = m.promotion {
            value += see_piece_value(p) - see_piece_value(Piece::Pawn);
        }

        let mut next_victim = if let Some(p) = m.promotion {
            p
        } else {
            self.piece_type_at(m.from).unwrap()
        };

        let mut gain = [0i32; 32];
        let mut d = 0;
        gain[d] = value;

        let mut occupancy = self.occupied();
        occupancy &= !(1u64 << from_sq);

        let mut attackers = self.get_attackers_to_square_see(to_sq, occupancy, tables);
        let mut side_to_move = self.side_to_move.opposite();

        loop {
            d += 1;
            let attacker_sq = self.get_lva_square(attackers, side_to_move, occupancy);
            if attacker_sq == 64 {
                break;
            }

            if next_victim == Piece::King {
                // Same illegal-recapture case as static_exchange_eval: the
                // king can't have captured here if the square is still
                // attacked. Force the normal no-attacker exit next pass so
                // `d` lands where back-propagation actually reads this entry.
                gain[d] = see_piece_value(Piece::King);
                attackers = 0;
                continue;
            }

            attackers &= !(1u64 << attacker_sq);
            occupancy &= !(1u64 << attacker_sq);

            if matches!(next_victim, Piece::Bishop | Piece::Rook | Piece::Queen) {
                attackers = self.get_attackers_to_square_see(to_sq, occupancy, tables);
                attackers &= !(1u64 << attacker_sq);
            }

            if d >= 31 {
                break;
            }

            gain[d] = see_piece_value(next_victim) - gain[d - 1];
            next_victim = self
                .piece_at(crate::square::Square::from_index(attacker_sq))
                .unwrap()
                .1;
            side_to_move = side_to_move.opposite();
        }

        while d > 1 {
            d -= 1;
            gain[d - 1] = -std::cmp::max(-gain[d - 1], gain[d]);
        }
        gain[0]
    }

    fn get_lva_square(&self, attackers: u64, side: Color, _occ: u64) -> u8 {
        let side_attackers = attackers & self.occupancy(side);
        if side_attackers == 0 {
            return 64;
        }

        for piece in [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ] {
            let subset = side_attackers & self.pieces(piece, side);
            if subset != 0 {
                return subset.lsb();
            }
        }
        64
    }
}

#[cfg(test)]
mod see_value_tests {
    use super::*;
    use crate::moves::magic::loader::load_magic_tables;
    use crate::moves::types::{CAPTURE, Move};
    use crate::square::Square;
    use std::str::FromStr;

    #[test]
    fn pawn_takes_undefended_queen_gains_queen_value() {
        // White pawn on e4 can take a black queen on d5 that is not defended.
        let board = Board::from_str("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let tables = load_magic_tables();
        let mv = Move {
            from: Square::from_algebraic("e4").unwrap(),
            to: Square::from_algebraic("d5").unwrap(),
            piece: Piece::Pawn,
            promotion: None,
            flags: CAPTURE,
        };
        assert_eq!(board.see_value(mv, &tables), see_piece_value(Piece::Queen));
    }

    #[test]
    fn queen_takes_pawn_defended_by_pawn_loses_material() {
        // White queen captures a black pawn on d5 that is guarded by a pawn on c6.
        let board = Board::from_str("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1").unwrap();
        let tables = load_magic_tables();
        let mv = Move {
            from: Square::from_algebraic("d1").unwrap(),
            to: Square::from_algebraic("d5").unwrap(),
            piece: Piece::Queen,
            promotion: None,
            flags: CAPTURE,
        };
        let value = board.see_value(mv, &tables);
        assert!(value < 0, "expected a losing exchange, got {}", value);
    }
}
