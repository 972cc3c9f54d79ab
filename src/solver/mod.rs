//! The constraint propagation and backtracking search engine.

pub mod consistency;
pub mod engine;
pub mod heuristics;
pub mod instance;
pub mod stats;
pub mod trail;
