//! Variable-selection and value-ordering heuristics.
//!
//! Each heuristic is a free function over the [`ConstraintNetwork`]; the
//! engine picks among them with the [`VariableSelector`] and [`ValueOrder`]
//! enums fixed at construction time.
//!
//! [`ConstraintNetwork`]: crate::solver::network::ConstraintNetwork
//! [`VariableSelector`]: variable::VariableSelector
//! [`ValueOrder`]: value::ValueOrder

pub mod value;
pub mod variable;
