//! Candidate sets for individual cells.

/// A single cell value.
///
/// Values run `1..=N` for an `N`x`N` board. `0` marks a blank cell in board
/// form and never appears inside a [`Domain`].
pub type Value = u32;

/// The set of values a cell may still take.
///
/// Backed by a plain vector. Removal swaps the last element into the gap, so
/// enumeration order is unspecified and may change after any removal. During
/// search a domain only ever shrinks; values come back solely through
/// [`Trail::undo`](crate::solver::trail::Trail::undo) restoring a snapshot
/// taken before the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    values: Vec<Value>,
}

impl Domain {
    /// Creates a domain holding exactly the given candidates.
    ///
    /// Callers are expected to pass distinct values; duplicates would make
    /// the size queries used by propagation meaningless.
    pub fn new(values: Vec<Value>) -> Self {
        debug_assert!(
            values
                .iter()
                .all(|v| values.iter().filter(|w| *w == v).count() == 1),
            "domain candidates must be distinct"
        );
        Self { values }
    }

    /// Creates the full domain `{1..=n}` for an `n`x`n` board.
    pub fn full(n: usize) -> Self {
        Self {
            values: (1..=n as Value).collect(),
        }
    }

    /// Creates a domain holding a single candidate.
    pub fn singleton(value: Value) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Returns `true` if `value` is still a candidate.
    pub fn contains(&self, value: Value) -> bool {
        self.values.contains(&value)
    }

    /// Removes `value` if present, returning whether the domain changed.
    ///
    /// Removing an absent value is a silent no-op. The caller is responsible
    /// for snapshotting to the trail *before* calling this.
    pub fn remove(&mut self, value: Value) -> bool {
        match self.values.iter().position(|v| *v == value) {
            Some(index) => {
                self.values.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of remaining candidates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remaining candidates in unspecified order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.values.iter().copied()
    }
}
