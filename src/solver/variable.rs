//! Cells as decision variables.

use crate::solver::domain::{Domain, Value};

/// Index of a variable inside its [`ConstraintNetwork`].
///
/// Ids are assigned densely in row-major board order, so they double as the
/// canonical enumeration order for heuristics that break ties by "first
/// encountered".
///
/// [`ConstraintNetwork`]: crate::solver::network::ConstraintNetwork
pub type VariableId = usize;

/// A single cell: a stable identity, a candidate [`Domain`], and an optional
/// committed assignment.
///
/// Assigning does *not* collapse the domain to a singleton. The domain keeps
/// whatever candidates it had, so undoing the assignment restores the exact
/// pre-assignment candidate set without any bookkeeping beyond the trail
/// snapshot.
#[derive(Debug, Clone)]
pub struct Variable {
    id: VariableId,
    row: usize,
    col: usize,
    domain: Domain,
    assignment: Option<Value>,
}

impl Variable {
    /// Creates an unassigned variable at board position `(row, col)`.
    pub fn new(id: VariableId, row: usize, col: usize, domain: Domain) -> Self {
        Self {
            id,
            row,
            col,
            domain,
            assignment: None,
        }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn assignment(&self) -> Option<Value> {
        self.assignment
    }

    /// Commits `value` as this variable's assignment.
    ///
    /// `value` must be a member of the domain at the moment of assignment.
    /// The domain itself is left untouched.
    pub fn assign(&mut self, value: Value) {
        debug_assert!(
            self.domain.contains(value),
            "assigned value must be in the domain"
        );
        self.assignment = Some(value);
    }

    /// Clears the assignment, leaving the domain as-is.
    pub fn unassign(&mut self) {
        self.assignment = None;
    }

    /// Overwrites domain and assignment with an earlier snapshot.
    ///
    /// Only [`Trail::undo`](crate::solver::trail::Trail::undo) calls this;
    /// everything else mutates through the network so the dirty set stays
    /// accurate.
    pub(crate) fn restore(&mut self, domain: Domain, assignment: Option<Value>) {
        self.domain = domain;
        self.assignment = assignment;
    }

    /// Removes `value` from the domain, returning whether it was present.
    pub fn remove_from_domain(&mut self, value: Value) -> bool {
        self.domain.remove(value)
    }
}
