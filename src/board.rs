//! Puzzle boards: the textual form the solver consumes and produces.
//!
//! A board file starts with a header line holding the box dimensions `p q`,
//! followed by `N = p * q` rows of `N` whitespace-separated integers, where
//! `0` marks a blank cell:
//!
//! ```text
//! 2 2
//! 1 0 0 0
//! 0 0 3 0
//! 0 0 0 0
//! 0 2 0 0
//! ```
//!
//! Loading validates structure and givens up front, so the solver can assume
//! every board it receives is well-formed and free of directly conflicting
//! clues.

use std::{collections::HashSet, fmt, fs, path::Path, str::FromStr};

use rand::Rng;

use crate::{
    error::{Error, Result},
    solver::domain::Value,
};

/// An `N`x`N` grid of cells with `p`x`q` boxes, `N = p * q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    p: usize,
    q: usize,
    grid: Vec<Vec<Value>>,
}

impl Board {
    /// Creates an all-blank board.
    pub fn empty(p: usize, q: usize) -> Result<Self> {
        if p == 0 || q == 0 {
            return Err(Error::Dimensions { p, q });
        }
        let n = p * q;
        Ok(Self {
            p,
            q,
            grid: vec![vec![0; n]; n],
        })
    }

    /// Builds a board from an explicit grid, validating shape, cell ranges,
    /// and given conflicts.
    pub fn from_grid(p: usize, q: usize, grid: Vec<Vec<Value>>) -> Result<Self> {
        if p == 0 || q == 0 {
            return Err(Error::Dimensions { p, q });
        }
        let n = p * q;
        if grid.len() != n {
            return Err(Error::RowCount {
                expected: n,
                actual: grid.len(),
            });
        }
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != n {
                return Err(Error::RowLength {
                    row,
                    expected: n,
                    actual: cells.len(),
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                if value > n as Value {
                    return Err(Error::CellRange {
                        row,
                        col,
                        value,
                        max: n as Value,
                    });
                }
            }
        }

        let board = Self { p, q, grid };
        board.check_givens()?;
        Ok(board)
    }

    /// Reads and parses a board file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Generates a board with up to `givens` random conflict-free clues.
    ///
    /// Placement is rejection-sampled: pick a cell and value, keep them if
    /// the cell is blank and the value clashes with no row, column, or box
    /// peer. Requests too dense to satisfy stop at a bounded number of
    /// misses, so the result can carry fewer clues than asked for.
    pub fn generate<R: Rng>(p: usize, q: usize, givens: usize, rng: &mut R) -> Result<Self> {
        let mut board = Self::empty(p, q)?;
        let n = board.n();
        let mut placed = 0;
        let mut misses = 10 * n * n * n;
        while placed < givens && misses > 0 {
            let row = rng.gen_range(0..n);
            let col = rng.gen_range(0..n);
            let value = rng.gen_range(1..=n as Value);
            if board.grid[row][col] == 0 && !board.conflicts(row, col, value) {
                board.grid[row][col] = value;
                placed += 1;
            } else {
                misses -= 1;
            }
        }
        Ok(board)
    }

    /// Box height, the first header dimension.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Box width, the second header dimension.
    pub fn q(&self) -> usize {
        self.q
    }

    /// Side length of the grid.
    pub fn n(&self) -> usize {
        self.p * self.q
    }

    /// Cell value at `(row, col)`; `0` means blank.
    pub fn value(&self, row: usize, col: usize) -> Value {
        self.grid[row][col]
    }

    /// Overwrites the cell at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: Value) {
        debug_assert!(value <= self.n() as Value);
        self.grid[row][col] = value;
    }

    /// Number of non-blank cells.
    pub fn given_count(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&v| v != 0)
            .count()
    }

    /// Full audit: `true` iff every row, column, and box holds each value in
    /// `1..=N` exactly once.
    pub fn is_solved(&self) -> bool {
        let n = self.n();
        for i in 0..n {
            let mut row_seen = HashSet::new();
            let mut col_seen = HashSet::new();
            for j in 0..n {
                let row_value = self.grid[i][j];
                let col_value = self.grid[j][i];
                if row_value == 0 || !row_seen.insert(row_value) {
                    return false;
                }
                if col_value == 0 || !col_seen.insert(col_value) {
                    return false;
                }
            }
        }
        for box_row in (0..n).step_by(self.p) {
            for box_col in (0..n).step_by(self.q) {
                let mut seen = HashSet::new();
                for r in box_row..box_row + self.p {
                    for c in box_col..box_col + self.q {
                        if !seen.insert(self.grid[r][c]) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// `true` iff this board agrees with every non-blank cell of `puzzle`.
    pub fn extends(&self, puzzle: &Board) -> bool {
        if self.p != puzzle.p || self.q != puzzle.q {
            return false;
        }
        let n = self.n();
        for row in 0..n {
            for col in 0..n {
                let clue = puzzle.grid[row][col];
                if clue != 0 && clue != self.grid[row][col] {
                    return false;
                }
            }
        }
        true
    }

    /// `true` if placing `value` at `(row, col)` would clash with a peer.
    fn conflicts(&self, row: usize, col: usize, value: Value) -> bool {
        let n = self.n();
        for i in 0..n {
            if self.grid[row][i] == value || self.grid[i][col] == value {
                return true;
            }
        }
        let box_row = row / self.p * self.p;
        let box_col = col / self.q * self.q;
        for r in box_row..box_row + self.p {
            for c in box_col..box_col + self.q {
                if self.grid[r][c] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Rejects boards whose clues conflict outright: such a board can slip
    /// through propagation modes that only prune unassigned cells and come
    /// back "solved".
    fn check_givens(&self) -> Result<()> {
        let n = self.n();
        for row in 0..n {
            self.check_unit((0..n).map(|col| (row, col)), &format!("row {}", row))?;
        }
        for col in 0..n {
            self.check_unit((0..n).map(|row| (row, col)), &format!("column {}", col))?;
        }
        for box_row in (0..n).step_by(self.p) {
            for box_col in (0..n).step_by(self.q) {
                let cells = (box_row..box_row + self.p)
                    .flat_map(|r| (box_col..box_col + self.q).map(move |c| (r, c)));
                let label = format!("box ({}, {})", box_row / self.p, box_col / self.q);
                self.check_unit(cells, &label)?;
            }
        }
        Ok(())
    }

    fn check_unit(
        &self,
        cells: impl Iterator<Item = (usize, usize)>,
        unit: &str,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        for (row, col) in cells {
            let value = self.grid[row][col];
            if value != 0 && !seen.insert(value) {
                return Err(Error::ConflictingGivens {
                    value,
                    unit: unit.to_string(),
                });
            }
        }
        Ok(())
    }

    fn rule_line(&self, width: usize) -> String {
        let n = self.n();
        let mut line = String::new();
        for col in 0..n {
            if col != 0 && col % self.q == 0 {
                line.push_str("+ ");
            }
            line.push_str(&"-".repeat(width));
            line.push(' ');
        }
        line.trim_end().to_string()
    }
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let header = lines.next().unwrap_or("").trim();
        let tokens: Vec<&str> = header.split_whitespace().collect();
        let &[p_text, q_text] = tokens.as_slice() else {
            return Err(Error::Header(header.to_string()));
        };
        let p: usize = p_text
            .parse()
            .map_err(|_| Error::Header(header.to_string()))?;
        let q: usize = q_text
            .parse()
            .map_err(|_| Error::Header(header.to_string()))?;

        let mut grid: Vec<Vec<Value>> = Vec::new();
        for line in lines {
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<Value>().map_err(|_| Error::Cell {
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<Value>>>()?;
            grid.push(row);
        }

        Self::from_grid(p, q, grid)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n();
        let width = n.to_string().len();
        for row in 0..n {
            if row != 0 && row % self.p == 0 {
                writeln!(f, "{}", self.rule_line(width))?;
            }
            let mut line = String::new();
            for col in 0..n {
                if col != 0 && col % self.q == 0 {
                    line.push_str("| ");
                }
                let cell = self.grid[row][col];
                if cell == 0 {
                    line.push_str(&format!("{:>width$} ", "."));
                } else {
                    line.push_str(&format!("{:>width$} ", cell));
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
