//! Heuristics for ordering the candidate values of a chosen variable.

use std::collections::BTreeMap;

use crate::solver::{domain::Value, network::ConstraintNetwork, variable::VariableId};

/// The value ordering the engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueOrder {
    /// Domain values sorted ascending.
    #[default]
    Natural,
    /// Least-constraining value first.
    LeastConstraining,
    /// Extension point, disabled: yields no values.
    Tournament,
}

/// Returns the variable's candidates sorted ascending.
pub fn natural_order(network: &ConstraintNetwork, variable: VariableId) -> Vec<Value> {
    let mut values = network.variable(variable).domain().values().to_vec();
    values.sort_unstable();
    values
}

/// Returns the variable's candidates least-constraining first.
///
/// A candidate's cost is how many neighbor domains still admit it, summed
/// over *all* neighbors, assigned or not. Candidates are sorted ascending by
/// that cost, so the value that interferes least with the rest of the board
/// is tried first; equal costs fall back to ascending value order.
pub fn least_constraining_order(network: &ConstraintNetwork, variable: VariableId) -> Vec<Value> {
    let mut costs: BTreeMap<Value, usize> = network
        .variable(variable)
        .domain()
        .iter()
        .map(|value| (value, 0))
        .collect();

    for &neighbor in network.neighbors_of(variable) {
        let domain = network.variable(neighbor).domain();
        for (&value, cost) in costs.iter_mut() {
            if domain.contains(value) {
                *cost += 1;
            }
        }
    }

    // The map iterates ascending by value and the sort is stable, so tied
    // costs keep ascending value order.
    let mut ordered: Vec<(Value, usize)> = costs.into_iter().collect();
    ordered.sort_by_key(|&(_, cost)| cost);
    ordered.into_iter().map(|(value, _)| value).collect()
}

/// Extension point for a custom ordering. Disabled: yields no values, so a
/// search configured with it abandons every branch immediately.
pub fn tournament_order(_network: &ConstraintNetwork, _variable: VariableId) -> Vec<Value> {
    Vec::new()
}
