//! The constraint network: variables, constraints, and the dirty set.

use std::collections::HashSet;

use crate::{
    board::Board,
    solver::{
        constraint::{Constraint, ConstraintId},
        domain::{Domain, Value},
        variable::{Variable, VariableId},
    },
};

/// Variables, their all-different constraints, and the bookkeeping that links
/// them.
///
/// All search-time mutation goes through [`assign`](Self::assign) and
/// [`remove_from_domain`](Self::remove_from_domain) so that every change
/// lands in the dirty set, the queue of constraints touched since the last
/// [`drain_modified_constraints`](Self::drain_modified_constraints). The one
/// exception is trail rollback, which restores snapshots without dirtying
/// anything: undone work needs no re-propagation.
#[derive(Debug, Clone, Default)]
pub struct ConstraintNetwork {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    /// Distinct variables sharing at least one constraint, per variable.
    neighbors: Vec<Vec<VariableId>>,
    /// Constraints each variable belongs to, in constraint-creation order.
    memberships: Vec<Vec<ConstraintId>>,
    /// Dirty constraints in first-touch order, deduplicated via `modified_set`.
    modified: Vec<ConstraintId>,
    modified_set: HashSet<ConstraintId>,
}

impl ConstraintNetwork {
    /// Creates an empty network to be populated with
    /// [`add_variable`](Self::add_variable) and
    /// [`add_constraint`](Self::add_constraint).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard Sudoku network for `board`.
    ///
    /// Variables are created in row-major order (so `VariableId` is
    /// `row * n + col`), followed by one all-different constraint per row,
    /// column, and box. Givens are then assigned through the network, which
    /// seeds the dirty set with their constraints so a pre-search propagation
    /// pass has something to work from.
    pub fn from_board(board: &Board) -> Self {
        let n = board.n();
        let p = board.p();
        let q = board.q();
        let mut network = Self::new();

        for row in 0..n {
            for col in 0..n {
                let value = board.value(row, col);
                let domain = if value == 0 {
                    Domain::full(n)
                } else {
                    Domain::singleton(value)
                };
                network.add_variable(row, col, domain);
            }
        }

        for row in 0..n {
            network.add_constraint((0..n).map(|col| row * n + col).collect());
        }
        for col in 0..n {
            network.add_constraint((0..n).map(|row| row * n + col).collect());
        }
        for box_row in 0..n / p {
            for box_col in 0..n / q {
                let mut members = Vec::with_capacity(n);
                for r in 0..p {
                    for c in 0..q {
                        members.push((box_row * p + r) * n + (box_col * q + c));
                    }
                }
                network.add_constraint(members);
            }
        }

        for row in 0..n {
            for col in 0..n {
                let value = board.value(row, col);
                if value != 0 {
                    network.assign(row * n + col, value);
                }
            }
        }

        network
    }

    /// Adds a variable and returns its id.
    pub fn add_variable(&mut self, row: usize, col: usize, domain: Domain) -> VariableId {
        let id = self.variables.len();
        self.variables.push(Variable::new(id, row, col, domain));
        self.neighbors.push(Vec::new());
        self.memberships.push(Vec::new());
        id
    }

    /// Adds an all-different constraint over `members` and returns its id.
    ///
    /// Updates each member's membership list and extends the pairwise
    /// neighbor lists, keeping them free of duplicates.
    pub fn add_constraint(&mut self, members: Vec<VariableId>) -> ConstraintId {
        let id = self.constraints.len();
        for &member in &members {
            self.memberships[member].push(id);
            for &other in &members {
                if other != member && !self.neighbors[member].contains(&other) {
                    self.neighbors[member].push(other);
                }
            }
        }
        self.constraints.push(Constraint::new(id, members));
        id
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id]
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Distinct variables sharing a constraint with `id`, excluding `id`.
    pub fn neighbors_of(&self, id: VariableId) -> &[VariableId] {
        &self.neighbors[id]
    }

    /// Constraints containing `id`, in creation order.
    pub fn constraints_of(&self, id: VariableId) -> &[ConstraintId] {
        &self.memberships[id]
    }

    /// Assigns `value` to a variable and dirties its constraints.
    ///
    /// Snapshot the variable to the trail first; the network does not do that
    /// for you.
    pub fn assign(&mut self, id: VariableId, value: Value) {
        self.variables[id].assign(value);
        self.mark_modified(id);
    }

    /// Removes `value` from a variable's domain, dirtying its constraints
    /// only if the domain actually changed.
    pub fn remove_from_domain(&mut self, id: VariableId, value: Value) -> bool {
        let changed = self.variables[id].remove_from_domain(value);
        if changed {
            self.mark_modified(id);
        }
        changed
    }

    /// Rollback path: overwrite a variable with a trail snapshot.
    ///
    /// Deliberately does not touch the dirty set.
    pub(crate) fn restore(&mut self, id: VariableId, domain: Domain, assignment: Option<Value>) {
        self.variables[id].restore(domain, assignment);
    }

    /// Removes and returns the dirty constraints in first-touch order.
    pub fn drain_modified_constraints(&mut self) -> Vec<ConstraintId> {
        self.modified_set.clear();
        std::mem::take(&mut self.modified)
    }

    /// `true` if every constraint is locally consistent (no two assigned
    /// members of any group share a value).
    pub fn is_consistent(&self) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_consistent(&self.variables))
    }

    fn mark_modified(&mut self, id: VariableId) {
        for &constraint in &self.memberships[id] {
            if self.modified_set.insert(constraint) {
                self.modified.push(constraint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::board::Board;

    fn four_by_four() -> Board {
        Board::from_grid(
            2,
            2,
            vec![
                vec![1, 0, 0, 0],
                vec![0, 0, 3, 0],
                vec![0, 0, 0, 0],
                vec![0, 2, 0, 0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn from_board_builds_rows_cols_and_boxes() {
        let network = ConstraintNetwork::from_board(&four_by_four());
        assert_eq!(network.variables().len(), 16);
        assert_eq!(network.constraints().len(), 12);
        // Row 3, column 3, box 3 (one membership from each family).
        assert_eq!(network.constraints_of(15), &[3, 7, 11]);
        // 3 row peers + 3 column peers + 1 box peer not already counted.
        assert_eq!(network.neighbors_of(0).len(), 7);
    }

    #[test]
    fn givens_are_assigned_and_dirty_their_constraints() {
        let mut network = ConstraintNetwork::from_board(&four_by_four());
        assert_eq!(network.variable(0).assignment(), Some(1));
        assert_eq!(network.variable(6).assignment(), Some(3));
        assert_eq!(network.variable(13).assignment(), Some(2));
        assert!(network.variable(1).assignment().is_none());

        let dirty = network.drain_modified_constraints();
        // Three givens, three constraints each, no overlaps on this board.
        assert_eq!(dirty.len(), 9);
        // First given is cell (0, 0): row 0, column 0, box 0.
        assert_eq!(&dirty[..3], &[0, 4, 8]);
    }

    #[test]
    fn dirty_set_deduplicates_but_keeps_first_touch_order() {
        let mut network = ConstraintNetwork::new();
        let a = network.add_variable(0, 0, Domain::full(2));
        let b = network.add_variable(0, 1, Domain::full(2));
        network.add_constraint(vec![a, b]);
        network.add_constraint(vec![a]);

        network.assign(a, 1);
        network.assign(a, 2);
        network.remove_from_domain(b, 1);
        assert_eq!(network.drain_modified_constraints(), vec![0, 1]);
        assert!(network.drain_modified_constraints().is_empty());
    }

    #[test]
    fn no_op_removal_does_not_dirty() {
        let mut network = ConstraintNetwork::new();
        let a = network.add_variable(0, 0, Domain::new(vec![1, 2]));
        network.add_constraint(vec![a]);

        assert!(!network.remove_from_domain(a, 9));
        assert!(network.drain_modified_constraints().is_empty());

        assert!(network.remove_from_domain(a, 2));
        assert_eq!(network.drain_modified_constraints(), vec![0]);
    }

    #[test]
    fn restore_does_not_dirty() {
        let mut network = ConstraintNetwork::new();
        let a = network.add_variable(0, 0, Domain::full(3));
        network.add_constraint(vec![a]);
        network.assign(a, 1);
        network.drain_modified_constraints();

        network.restore(a, Domain::full(3), None);
        assert!(network.drain_modified_constraints().is_empty());
        assert!(!network.variable(a).is_assigned());
    }

    #[test]
    fn consistency_detects_duplicates_in_a_group() {
        let mut network = ConstraintNetwork::from_board(&four_by_four());
        assert!(network.is_consistent());
        // Cell (0, 1) shares row 0 with the given 1 at (0, 0).
        network.assign(1, 1);
        assert!(!network.is_consistent());
    }
}
