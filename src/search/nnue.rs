//! NNUE (Efficiently Updatable Neural Network) evaluator.
//!
//! HalfKP-style single-hidden-layer network: one king-relative input
//! plane per (non-king piece, color, square), 128 hidden neurons,
//! clipped-ReLU activation, one scalar output. Mirrors the on-disk
//! format of the reference implementation this engine's architecture
//! was modeled on: four little-endian `u32` header fields, then the
//! weights in row-major order.

use crate::board::{Board, Color, Piece};
use crate::error::EngineError;
use std::io::Read;
use std::path::Path;

pub const INPUT_LAYER: usize = 64 * 2 * 5 * 64;
pub const HIDDEN_LAYER: usize = 128;
pub const OUTPUT_LAYER: usize = 1;

const RELU_MAX: i16 = 255;
const SCALE: i32 = 400;

pub struct NnueNetwork {
    input_to_hidden: Box<[[i16; HIDDEN_LAYER]; INPUT_LAYER]>,
    hidden_bias: [i16; HIDDEN_LAYER],
    hidden_to_output: Box<[[i8; OUTPUT_LAYER]; HIDDEN_LAYER * 2]>,
    output_bias: [i32; OUTPUT_LAYER],
}

impl NnueNetwork {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| EngineError::BadNnueFile(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        let mut r = bytes;

        let input_len = read_u32(&mut r)? as usize;
        if input_len != INPUT_LAYER {
            return Err(EngineError::BadNnueFile(format!(
                "expected input layer size {}, got {}",
                INPUT_LAYER, input_len
            )));
        }
        let hidden_len = read_u32(&mut r)? as usize;
        if hidden_len != HIDDEN_LAYER {
            return Err(EngineError::BadNnueFile(format!(
                "expected hidden layer size {}, got {}",
                HIDDEN_LAYER, hidden_len
            )));
        }
        let output_len = read_u32(&mut r)? as usize;
        if output_len != OUTPUT_LAYER {
            return Err(EngineError::BadNnueFile(format!(
                "expected output layer size {}, got {}",
                OUTPUT_LAYER, output_len
            )));
        }

        let mut input_to_hidden = Box::new([[0i16; HIDDEN_LAYER]; INPUT_LAYER]);
        for row in input_to_hidden.iter_mut() {
            for w in row.iter_mut() {
                *w = read_i16(&mut r)?;
            }
        }

        let mut hidden_bias = [0i16; HIDDEN_LAYER];
        for b in hidden_bias.iter_mut() {
            *b = read_i16(&mut r)?;
        }

        let mut hidden_to_output = Box::new([[0i8; OUTPUT_LAYER]; HIDDEN_LAYER * 2]);
        for row in hidden_to_output.iter_mut() {
            for w in row.iter_mut() {
                *w = read_i8(&mut r)?;
            }
        }

        let mut output_bias = [0i32; OUTPUT_LAYER];
        for b in output_bias.iter_mut() {
            *b = read_i16(&mut r)? as i32;
        }

        if !r.is_empty() {
            return Err(EngineError::BadNnueFile(format!(
                "{} trailing bytes after expected weights",
                r.len()
            )));
        }

        Ok(Self {
            input_to_hidden,
            hidden_bias,
            hidden_to_output,
            output_bias,
        })
    }

    /// Evaluates `board` from the side-to-move's perspective, in centipawns.
    pub fn evaluate(&self, board: &Board) -> i32 {
        let king_white = board.king_square(Color::White).index();
        let king_black = board.king_square(Color::Black).index();
        let king_black_mirrored = king_black ^ 56;

        let mut hidden = [self.hidden_bias; 2];

        for color in [Color::White, Color::Black] {
            for piece in [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
            ] {
                let mapped_piece = piece as usize;
                let color_idx = color as usize;
                let mut bb = board.pieces(piece, color);
                while bb != 0 {
                    let sq = bb.trailing_zeros() as usize;
                    bb &= bb - 1;
                    let sq_mirrored = sq ^ 56;

                    let idx_white =
                        king_white as usize * 64 * 2 * 5 + (color_idx * 5 + mapped_piece) * 64 + sq;
                    let idx_black = king_black_mirrored as usize * 64 * 2 * 5
                        + ((1 - color_idx) * 5 + mapped_piece) * 64
                        + sq_mirrored;

                    for i in 0..HIDDEN_LAYER {
                        hidden[0][i] = hidden[0][i].wrapping_add(self.input_to_hidden[idx_white][i]);
                        hidden[1][i] = hidden[1][i].wrapping_add(self.input_to_hidden[idx_black][i]);
                    }
                }
            }
        }

        let (us, them) = if board.side_to_move == Color::White {
            (0usize, 1usize)
        } else {
            (1usize, 0usize)
        };

        let mut clipped = [0u8; HIDDEN_LAYER * 2];
        clip_relu(&mut clipped[..HIDDEN_LAYER], &hidden[us]);
        clip_relu(&mut clipped[HIDDEN_LAYER..], &hidden[them]);

        let mut output = self.output_bias[0];
        for (j, &activation) in clipped.iter().enumerate() {
            output += self.hidden_to_output[j][0] as i32 * activation as i32;
        }

        output * SCALE / (255 * 64)
    }
}

fn clip_relu(out: &mut [u8], input: &[i16; HIDDEN_LAYER]) {
    for (o, &v) in out.iter_mut().zip(input.iter()) {
        *o = v.clamp(0, RELU_MAX) as u8;
    }
}

fn read_u32(r: &mut &[u8]) -> Result<u32, EngineError> {
    if r.len() < 4 {
        return Err(EngineError::BadNnueFile("unexpected end of file".into()));
    }
    let (head, tail) = r.split_at(4);
    *r = tail;
    Ok(u32::from_le_bytes([head[0], head[1], head[2], head[3]]))
}

fn read_i16(r: &mut &[u8]) -> Result<i16, EngineError> {
    if r.len() < 2 {
        return Err(EngineError::BadNnueFile("unexpected end of file".into()));
    }
    let (head, tail) = r.split_at(2);
    *r = tail;
    Ok(i16::from_le_bytes([head[0], head[1]]))
}

fn read_i8(r: &mut &[u8]) -> Result<i8, EngineError> {
    if r.is_empty() {
        return Err(EngineError::BadNnueFile("unexpected end of file".into()));
    }
    let (head, tail) = r.split_at(1);
    *r = tail;
    Ok(head[0] as i8)
}
