//! Heuristics for selecting which variable to branch on next.

use crate::solver::{network::ConstraintNetwork, variable::VariableId};

/// The variable selector the engine dispatches on.
///
/// Chosen once at engine construction; the engine matches on the variant for
/// every selection, so a new selector is a new variant plus a new match arm,
/// never a string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableSelector {
    /// First unassigned variable in enumeration order.
    #[default]
    FirstUnassigned,
    /// Unassigned variable with the smallest domain.
    MinimumRemainingValues,
    /// Minimum remaining values with ties broken by unassigned-neighbor
    /// degree.
    MrvDegree,
    /// Extension point, disabled: never selects a variable.
    Tournament,
}

/// Selects the first unassigned variable in enumeration order.
///
/// # Returns
///
/// * `Some(id)` of the first variable with no assignment.
/// * `None` if every variable is assigned.
pub fn first_unassigned(network: &ConstraintNetwork) -> Option<VariableId> {
    network
        .variables()
        .iter()
        .find(|v| !v.is_assigned())
        .map(|v| v.id())
}

/// Selects the unassigned variable with the smallest domain.
///
/// Ties go to the first such variable in enumeration order.
pub fn minimum_remaining_values(network: &ConstraintNetwork) -> Option<VariableId> {
    network
        .variables()
        .iter()
        .filter(|v| !v.is_assigned())
        // The id component makes the key unique, so ties resolve to the
        // earliest variable.
        .min_by_key(|v| (v.domain().len(), v.id()))
        .map(|v| v.id())
}

/// Minimum remaining values with a degree tie-break.
///
/// Finds the smallest domain size among unassigned variables, collects every
/// unassigned variable achieving it, then keeps those with the most
/// unassigned neighbors. This is the one selector that can return several
/// equally good candidates; callers wanting a single variable take the first.
///
/// Returns an empty vector when every variable is assigned.
pub fn mrv_with_degree(network: &ConstraintNetwork) -> Vec<VariableId> {
    let Some(smallest) = network
        .variables()
        .iter()
        .filter(|v| !v.is_assigned())
        .map(|v| v.domain().len())
        .min()
    else {
        return Vec::new();
    };

    let tied: Vec<VariableId> = network
        .variables()
        .iter()
        .filter(|v| !v.is_assigned() && v.domain().len() == smallest)
        .map(|v| v.id())
        .collect();

    let degree = |id: VariableId| {
        network
            .neighbors_of(id)
            .iter()
            .filter(|n| !network.variable(**n).is_assigned())
            .count()
    };

    let best = tied.iter().map(|&id| degree(id)).max().unwrap_or(0);
    tied.into_iter().filter(|&id| degree(id) == best).collect()
}

/// Extension point for a custom selector. Disabled: never selects a
/// variable, so a search configured with it terminates without exploring.
pub fn tournament(_network: &ConstraintNetwork) -> Option<VariableId> {
    None
}
