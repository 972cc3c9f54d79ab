//! Variable and value ordering heuristics.
//!
//! Each ordering is a small closed enum mapped to a pure function over the
//! instance's current domains and unassigned set; the branch driver holds
//! one of each, selected by configuration.

pub mod value;
pub mod variable;
