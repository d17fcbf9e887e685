pub mod context;
pub mod eval;
#[cfg(feature = "nnue")]
pub mod nnue;
pub mod ordering;
pub mod pesto;
pub mod picker;
pub mod search;
pub mod see;
pub mod tt;

pub use context::SearchContext;
pub use search::{TimeManager, search};
pub use tt::TranspositionTable;
