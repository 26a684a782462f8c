//! Retrograde analysis for the Gobblet Gobblers rule family.
//!
//! Built on [`gobblers_core`]'s bit-packed positions: [`solver::Solver`]
//! enumerates every reachable canonical state of a rule variant, solves
//! them all by backward induction from the terminal positions, persists
//! the result, and answers value / distance / best-move queries from the
//! table.

pub mod cache;
pub mod packed;
pub mod solver;
pub mod stats;
pub mod table;

pub use solver::Solver;
