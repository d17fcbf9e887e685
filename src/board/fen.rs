//! FEN parsing and serialization.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR};
use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::square::Square;

impl Board {
    /// Resets `self` to the position described by `fen` (full 6-field FEN,
    /// or just the piece-placement field with the rest defaulted).
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.is_empty() {
            return Err("empty FEN".to_string());
        }

        let mut piece_bb = [[0u64; 6]; 2];
        let mut rank = 7i32;
        let mut file = 0i32;
        for c in fields[0].chars() {
            match c {
                '/' => {
                    if file != 8 {
                        return Err(format!("rank {} has {} files, expected 8", rank + 1, file));
                    }
                    rank -= 1;
                    file = 0;
                }
                d if d.is_ascii_digit() => {
                    let skip = d.to_digit(10).unwrap() as i32;
                    file += skip;
                }
                c => {
                    let (piece, color) = CHAR_TO_PC[c as usize]
                        .ok_or_else(|| format!("invalid piece glyph '{}'", c))?;
                    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
                        return Err(format!("piece glyph '{}' outside board bounds", c));
                    }
                    let sq = (rank * 8 + file) as u8;
                    piece_bb[color as usize][piece as usize] |= 1u64 << sq;
                    file += 1;
                }
            }
        }
        if rank != 0 || file != 8 {
            return Err("piece placement does not cover all 8 ranks".to_string());
        }

        let side_to_move = match fields.get(1).copied().unwrap_or("w") {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("invalid side to move '{}'", other)),
        };

        let mut castling_rights = 0u8;
        match fields.get(2).copied().unwrap_or("-") {
            "-" => {}
            rights => {
                for c in rights.chars() {
                    castling_rights |= match c {
                        'K' => CASTLE_WK,
                        'Q' => CASTLE_WQ,
                        'k' => CASTLE_BK,
                        'q' => CASTLE_BQ,
                        other => return Err(format!("invalid castling glyph '{}'", other)),
                    };
                }
            }
        }

        // FEN's ep field is the skip square the pawn passed through (e.g.
        // "e3" after White plays e2-e4). This engine stores the
        // double-pushed pawn's own square instead, so convert by one rank:
        // a skip square on rank 3 means White just pushed to rank 4 (+8);
        // a skip square on rank 6 means Black just pushed to rank 5 (-8).
        let en_passant = match fields.get(3).copied().unwrap_or("-") {
            "-" => None,
            s => {
                let skip = Square::from_algebraic(s)
                    .ok_or_else(|| format!("invalid en passant square '{}'", s))?;
                let skip_idx = skip.index();
                let pushed_idx = match skip_idx / 8 {
                    2 => skip_idx + 8,
                    5 => skip_idx - 8,
                    _ => return Err(format!("invalid en passant square '{}'", s)),
                };
                Some(Square::from_index(pushed_idx))
            }
        };

        let halfmove_clock: u32 = fields
            .get(4)
            .map(|s| s.parse().map_err(|_| format!("invalid halfmove clock '{}'", s)))
            .transpose()?
            .unwrap_or(0);

        let fullmove_number: u32 = fields
            .get(5)
            .map(|s| s.parse().map_err(|_| format!("invalid fullmove number '{}'", s)))
            .transpose()?
            .unwrap_or(1);

        *self = Board::new_empty();
        for color in [Color::White, Color::Black] {
            for piece in [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
                Piece::King,
            ] {
                self.set_bb(color, piece, piece_bb[color as usize][piece as usize]);
            }
        }
        self.side_to_move = side_to_move;
        self.castling_rights = castling_rights;
        self.en_passant = en_passant;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.history.clear();
        self.refresh_zobrist();

        self.validate()?;
        Ok(())
    }

    /// Serializes the current position to a full 6-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(64);

        for rank in (0..8).rev() {
            let mut empty_run = 0u8;
            for file in 0..8 {
                let sq = Square::from_index((rank * 8 + file) as u8);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            out.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        let idx = (color as usize) * 6 + (piece as usize);
                        out.push(PC_TO_CHAR[idx]);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push((b'0' + empty_run) as char);
            }
            if rank != 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            if self.has_castling(CASTLE_WK) {
                out.push('K');
            }
            if self.has_castling(CASTLE_WQ) {
                out.push('Q');
            }
            if self.has_castling(CASTLE_BK) {
                out.push('k');
            }
            if self.has_castling(CASTLE_BQ) {
                out.push('q');
            }
        }

        out.push(' ');
        match self.en_passant {
            // Convert back from the double-pushed pawn's own square to the
            // FEN skip square (one rank behind it, towards rank 3/6).
            Some(sq) => {
                let idx = sq.index();
                let skip_idx = match idx / 8 {
                    3 => idx - 8,
                    4 => idx + 8,
                    _ => idx,
                };
                out.push_str(&Square::from_index(skip_idx).to_string());
            }
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));

        out
    }
}
