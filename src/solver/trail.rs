//! Chronological undo log for variable state.

use crate::solver::{
    domain::{Domain, Value},
    network::ConstraintNetwork,
    variable::{Variable, VariableId},
};

/// One saved variable state: the domain and assignment as they were *before*
/// the mutation that followed the push.
#[derive(Debug, Clone)]
struct TrailRecord {
    variable: VariableId,
    domain: Domain,
    assignment: Option<Value>,
}

/// The undo log backing backtracking search.
///
/// The discipline is push-before-mutate: snapshot a variable with
/// [`push`](Self::push), then mutate it through the network. A checkpoint
/// marker placed with [`place_marker`](Self::place_marker) groups everything
/// pushed after it; [`undo`](Self::undo) pops the innermost checkpoint and
/// restores its records newest-first, which leaves every variable exactly as
/// it was when the marker was placed, even if one variable was snapshotted
/// several times within the checkpoint.
///
/// Records pushed before any marker exists form the root region. `undo` never
/// reaches them; only [`clear`](Self::clear) removes them.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    records: Vec<TrailRecord>,
    markers: Vec<usize>,
    push_count: u64,
    undo_count: u64,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a checkpoint at the current position.
    pub fn place_marker(&mut self) {
        self.markers.push(self.records.len());
    }

    /// Snapshots `variable`'s current domain and assignment.
    ///
    /// Call this before every domain removal or assignment that search may
    /// need to undo.
    pub fn push(&mut self, variable: &Variable) {
        self.records.push(TrailRecord {
            variable: variable.id(),
            domain: variable.domain().clone(),
            assignment: variable.assignment(),
        });
        self.push_count += 1;
    }

    /// Pops the innermost checkpoint, restoring its records newest-first.
    ///
    /// A no-op when no checkpoint is open.
    pub fn undo(&mut self, network: &mut ConstraintNetwork) {
        let Some(marker) = self.markers.pop() else {
            return;
        };
        self.undo_count += 1;
        for record in self.records.drain(marker..).rev() {
            network.restore(record.variable, record.domain, record.assignment);
        }
    }

    /// Discards all records and markers and resets both counters.
    pub fn clear(&mut self) {
        self.records.clear();
        self.markers.clear();
        self.push_count = 0;
        self.undo_count = 0;
    }

    /// Total snapshots pushed since creation or the last `clear`.
    pub fn push_count(&self) -> u64 {
        self.push_count
    }

    /// Total checkpoints undone since creation or the last `clear`. This is
    /// the search's backtrack count.
    pub fn undo_count(&self) -> u64 {
        self.undo_count
    }

    /// Number of records currently held, across all checkpoints.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of currently open checkpoints.
    pub fn checkpoint_depth(&self) -> usize {
        self.markers.len()
    }
}
