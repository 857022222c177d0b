//! All-different groups over rows, columns, and boxes.

use std::collections::HashSet;

use crate::solver::variable::{Variable, VariableId};

/// Index of a constraint inside its [`ConstraintNetwork`].
///
/// [`ConstraintNetwork`]: crate::solver::network::ConstraintNetwork
pub type ConstraintId = usize;

/// An all-different group: every assigned member must hold a distinct value.
///
/// A Sudoku network has exactly `3N` of these (one per row, column, and box),
/// each spanning `N` variables. Constraints are immutable after construction;
/// search state lives entirely in the variables.
#[derive(Debug, Clone)]
pub struct Constraint {
    id: ConstraintId,
    variables: Vec<VariableId>,
}

impl Constraint {
    pub fn new(id: ConstraintId, variables: Vec<VariableId>) -> Self {
        Self { id, variables }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// Member variables in the order they were listed at construction.
    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    pub fn contains(&self, variable: VariableId) -> bool {
        self.variables.contains(&variable)
    }

    /// Checks that no two *assigned* members share a value.
    ///
    /// Unassigned members are ignored, so a partially filled group is
    /// consistent as long as its committed values are pairwise distinct.
    pub fn is_consistent(&self, variables: &[Variable]) -> bool {
        let mut seen: HashSet<_> = HashSet::with_capacity(self.variables.len());
        for id in &self.variables {
            if let Some(value) = variables[*id].assignment() {
                if !seen.insert(value) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::domain::Domain;

    fn three_vars() -> Vec<Variable> {
        (0..3)
            .map(|id| Variable::new(id, 0, id, Domain::full(3)))
            .collect()
    }

    #[test]
    fn distinct_assignments_are_consistent() {
        let mut vars = three_vars();
        vars[0].assign(1);
        vars[2].assign(3);
        let constraint = Constraint::new(0, vec![0, 1, 2]);
        assert!(constraint.is_consistent(&vars));
    }

    #[test]
    fn duplicate_assignments_are_not() {
        let mut vars = three_vars();
        vars[0].assign(2);
        vars[1].assign(2);
        let constraint = Constraint::new(0, vec![0, 1, 2]);
        assert!(!constraint.is_consistent(&vars));
    }

    #[test]
    fn unassigned_members_are_ignored() {
        let vars = three_vars();
        let constraint = Constraint::new(0, vec![0, 1, 2]);
        assert!(constraint.is_consistent(&vars));
        assert_eq!(constraint.variables(), &[0, 1, 2]);
        assert!(constraint.contains(1));
        assert!(!constraint.contains(7));
    }
}
