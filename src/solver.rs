//! The search engine and its parts: the constraint-network data model, the
//! trail, the propagation routines, the heuristics, and the recursive
//! driver.

pub mod constraint;
pub mod domain;
pub mod engine;
pub mod heuristics;
pub mod network;
pub mod propagation;
pub mod stats;
pub mod trail;
pub mod variable;
