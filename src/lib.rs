//! Vestigium is a trail-based backtracking solver for generalized
//! Sudoku-style puzzles.
//!
//! A puzzle is an `N`x`N` grid partitioned into `p`x`q` boxes (`N = p * q`)
//! where every row, column, and box must hold each value in `1..=N` exactly
//! once. The solver models the grid as a constraint network and explores it
//! by recursive backtracking: every domain or assignment mutation is
//! snapshotted to a trail first, so abandoning a branch is a replay of the
//! snapshots in reverse.
//!
//! # Core Concepts
//!
//! - **[`board::Board`]**: the textual puzzle form, with loading, random
//!   generation, and the solved-grid audit.
//! - **[`solver::network::ConstraintNetwork`]**: the variables, their
//!   candidate domains, and the all-different constraints wired over rows,
//!   columns, and boxes.
//! - **[`solver::trail::Trail`]**: the undo log of checkpointed snapshots
//!   that makes backtracking cheap and correct.
//! - **[`solver::engine::SearchEngine`]**: the recursive driver, configured
//!   with a variable selector, a value order, and a consistency check.
//!
//! # Example: solving a 4x4 board
//!
//! ```
//! use std::time::Duration;
//!
//! use vestigium::board::Board;
//! use vestigium::solver::engine::{SearchEngine, SolveOutcome};
//!
//! let puzzle: Board = "2 2\n\
//!     1 0 0 0\n\
//!     0 0 3 0\n\
//!     0 2 0 0\n\
//!     0 0 0 4"
//!     .parse()
//!     .unwrap();
//!
//! let mut engine = SearchEngine::with_defaults(puzzle.clone());
//! assert_eq!(engine.solve(Duration::from_secs(600)), SolveOutcome::Completed);
//! assert!(engine.has_solution());
//!
//! let solution = engine.solution();
//! assert!(solution.is_solved());
//! assert!(solution.extends(&puzzle));
//! ```

pub mod board;
pub mod error;
pub mod solver;
