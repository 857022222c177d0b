use std::{io, path::PathBuf};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors produced while loading, parsing, or generating boards.
///
/// The search engine itself never fails: an unsolvable or timed-out board is
/// reported through [`SolveOutcome`](crate::solver::engine::SolveOutcome) and
/// the engine's solution flag, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("board header must be two box dimensions `p q`, got `{0}`")]
    Header(String),

    #[error("box dimensions {p}x{q} are out of range")]
    Dimensions { p: usize, q: usize },

    #[error("expected {expected} grid rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("`{token}` is not a cell value")]
    Cell { token: String },

    #[error("cell ({row}, {col}) holds {value}, outside 0..={max}")]
    CellRange {
        row: usize,
        col: usize,
        value: u32,
        max: u32,
    },

    #[error("conflicting givens: {value} appears twice in {unit}")]
    ConflictingGivens { value: u32, unit: String },

    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),
}
