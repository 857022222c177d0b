//! Consistency checks and constraint propagation.
//!
//! All routines share one contract: never re-add a removed value, push every
//! variable to the trail before mutating it, and report inconsistency the
//! moment any domain would become empty. Work already logged to the trail is
//! never discarded here; a failed check leaves its prunes in place for the
//! caller's `undo` to roll back.

use std::collections::{BTreeMap, HashMap};

use crate::solver::{
    domain::{Domain, Value},
    network::ConstraintNetwork,
    trail::Trail,
    variable::VariableId,
};

/// Which consistency routine the engine runs after each assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyCheck {
    /// Scan all constraints for local consistency; no propagation.
    #[default]
    None,
    /// One-pass pruning of assigned values from unassigned neighbors.
    ForwardChecking,
    /// Forward checking plus a global hidden-single pass.
    Norvig,
    /// Extension point, disabled: always reports inconsistency.
    Tournament,
}

/// Scans every constraint and reports whether the network is locally
/// consistent. Performs no mutation and ignores the dirty set.
pub fn assignments_check(network: &ConstraintNetwork) -> bool {
    network.is_consistent()
}

/// One pass of forward checking over the dirty constraints.
///
/// For each assigned member of a dirty constraint, removes its value from
/// every *unassigned* neighbor's domain, snapshotting each neighbor to the
/// trail before the removal. Two situations end the pass with a failure
/// verdict: an unassigned neighbor whose domain is exactly the assigned
/// value (the removal would empty it), and a neighbor already assigned that
/// same value (a direct conflict, since assignment leaves the domain
/// intact). Dirty constraints not yet processed at that point stay drained
/// and are not revisited.
///
/// Returns the touched variables with their post-removal domains, and the
/// success flag. Forward checking never assigns, and never prunes an
/// assigned neighbor's domain.
pub fn forward_checking(
    network: &mut ConstraintNetwork,
    trail: &mut Trail,
) -> (HashMap<VariableId, Domain>, bool) {
    let mut pruned: HashMap<VariableId, Domain> = HashMap::new();

    for constraint in network.drain_modified_constraints() {
        let members = network.constraint(constraint).variables().to_vec();
        for member in members {
            let Some(value) = network.variable(member).assignment() else {
                continue;
            };
            let neighbors = network.neighbors_of(member).to_vec();
            for neighbor in neighbors {
                let variable = network.variable(neighbor);
                if let Some(existing) = variable.assignment() {
                    if existing == value {
                        return (pruned, false);
                    }
                    continue;
                }
                if !variable.domain().contains(value) {
                    continue;
                }
                if variable.domain().len() == 1 {
                    return (pruned, false);
                }
                trail.push(variable);
                network.remove_from_domain(neighbor, value);
                pruned.insert(neighbor, network.variable(neighbor).domain().clone());
            }
        }
    }

    (pruned, true)
}

/// Forward checking followed by a single global hidden-single pass.
///
/// After a successful forward-checking pass, tallies how many unassigned
/// variables still admit each candidate value across the whole network. A
/// value admitted by exactly one such variable is a hidden single: that
/// variable (the first in enumeration order still unassigned and admitting
/// it) is assigned the value, with a trail push first.
///
/// The pass is single-shot. It does not re-run forward checking after its
/// own assignments and reports success whenever the initial forward-checking
/// pass succeeded, even if a forced assignment just introduced a conflict;
/// such a conflict surfaces only at the next consistency check.
///
/// Returns the hidden-single assignments made, and the success flag. On
/// forward-checking failure the mapping is empty.
pub fn norvig_check(
    network: &mut ConstraintNetwork,
    trail: &mut Trail,
) -> (HashMap<VariableId, Value>, bool) {
    let mut assigned: HashMap<VariableId, Value> = HashMap::new();

    let (_, consistent) = forward_checking(network, trail);
    if !consistent {
        return (assigned, false);
    }

    let mut tally: BTreeMap<Value, usize> = BTreeMap::new();
    for variable in network.variables() {
        if variable.is_assigned() {
            continue;
        }
        for value in variable.domain().iter() {
            *tally.entry(value).or_insert(0) += 1;
        }
    }

    for (value, count) in tally {
        if count != 1 {
            continue;
        }
        let holder = network
            .variables()
            .iter()
            .find(|v| !v.is_assigned() && v.domain().contains(value))
            .map(|v| v.id());
        // An earlier hidden single may have claimed the only holder.
        if let Some(id) = holder {
            trail.push(network.variable(id));
            network.assign(id, value);
            assigned.insert(id, value);
        }
    }

    (assigned, true)
}

/// Arc consistency to a fixed point over the dirty constraints.
///
/// For each assigned member of a dirty constraint, removes its value from
/// every neighbor's domain (assigned or not), pushing before each removal. A
/// neighbor holding exactly that one value means the removal would empty the
/// domain: fail immediately. A neighbor holding exactly two values is left
/// with a naked single and queued; once the dirty constraints are processed,
/// each queued variable still unassigned is assigned its remaining value and
/// the routine recurses against the constraints those assignments dirtied.
///
/// The final verdict at the fixed point is the network's overall local
/// consistency.
pub fn arc_consistency(network: &mut ConstraintNetwork, trail: &mut Trail) -> bool {
    let mut naked_singles: Vec<VariableId> = Vec::new();

    for constraint in network.drain_modified_constraints() {
        let members = network.constraint(constraint).variables().to_vec();
        for member in members {
            let Some(value) = network.variable(member).assignment() else {
                continue;
            };
            let neighbors = network.neighbors_of(member).to_vec();
            for neighbor in neighbors {
                let domain = network.variable(neighbor).domain();
                if !domain.contains(value) {
                    continue;
                }
                if domain.len() == 1 {
                    return false;
                }
                if domain.len() == 2 {
                    naked_singles.push(neighbor);
                }
                trail.push(network.variable(neighbor));
                network.remove_from_domain(neighbor, value);
            }
        }
    }

    if naked_singles.is_empty() {
        return network.is_consistent();
    }

    for id in naked_singles {
        if network.variable(id).is_assigned() {
            continue;
        }
        let value = network.variable(id).domain().values()[0];
        trail.push(network.variable(id));
        network.assign(id, value);
    }
    arc_consistency(network, trail)
}

/// Extension point for a custom consistency check. Disabled: always reports
/// inconsistency.
pub fn tournament_check(_network: &mut ConstraintNetwork, _trail: &mut Trail) -> bool {
    false
}
