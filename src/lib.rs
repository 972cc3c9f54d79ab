//! Arcsolve is a solver for binary constraint satisfaction problems given
//! extensionally: integer variables with bounded domains, related by
//! constraints that list their compatible value pairs.
//!
//! The engine combines trail-based backtracking search with constraint
//! propagation. Two propagation strategies are available — forward checking
//! and maintaining arc consistency via AC-3 — along with variable and value
//! ordering heuristics, including a min-conflicts one-step lookahead.
//!
//! # Core Concepts
//!
//! - **[`Instance`]**: the variables, their current domains and the
//!   constraints' current tuple sets; the single mutable object a solve
//!   works on.
//! - **[`Trail`]**: the undo log of domain prunes and removed tuples, scoped
//!   per search choice point, which makes backtracking exact.
//! - **[`Solver`]**: the backtracking driver, configured with a propagation
//!   strategy, orderings and a solution quota.
//!
//! [`Instance`]: solver::instance::Instance
//! [`Trail`]: solver::trail::Trail
//! [`Solver`]: solver::engine::Solver
//!
//! # Example: A Simple 2-Variable Problem
//!
//! Variable `0` can be `1` or `2`, variable `1` can only be `1`, and the
//! only compatible pair is `(2, 1)`. The solver deduces the one solution.
//!
//! ```
//! use arcsolve::solver::{
//!     engine::{Solver, SolverConfig},
//!     instance::{BinaryConstraint, Instance},
//! };
//!
//! # fn main() -> arcsolve::error::Result<()> {
//! let bounds = [(1, 2), (1, 1)];
//! let constraints = vec![BinaryConstraint::new(0, 1, [(2, 1)])];
//! let instance = Instance::new(&bounds, constraints)?;
//!
//! let report = Solver::new(SolverConfig::default()).solve(instance);
//! assert_eq!(report.solutions, vec![vec![2, 1]]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generators;
pub mod reader;
pub mod solver;
