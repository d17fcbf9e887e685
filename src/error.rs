//! Error types shared across the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("bad NNUE file: {0}")]
    BadNnueFile(String),
}
