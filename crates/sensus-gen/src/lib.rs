//! Table generation for sensus.
//!
//! Builds the population register and the applications table, then passes
//! each through rate-controlled fault injection. A run draws every random
//! decision from one seeded stream, so identical configuration reproduces
//! identical tables.

pub mod applications;
pub mod faults;
pub mod pools;
pub mod population;

#[cfg(test)]
mod tests;

pub use applications::PopulationIndex;
pub use faults::{ApplicationIssues, FaultRates, PopulationIssues};
