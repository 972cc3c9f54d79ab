//! Benchmark instance generators.
//!
//! Each generator produces a [`CspDocument`](crate::reader::CspDocument)
//! so the result can be written out in the `.csp` format or built straight
//! into an [`Instance`](crate::solver::instance::Instance).

pub mod langford;
pub mod queens;
pub mod sudoku;
