//! Parallel local search over mixed-type search spaces with hierarchical
//! activation conditions.
//!
//! This crate explores a user-supplied black-box objective whose input is a
//! tabular batch of candidate configurations and whose output is a vector of
//! real-valued scores. It runs `n_searches` independent hill-climbing walks
//! in lock-step, generates neighbor candidates by mutating a single
//! parameter per neighbor, respects a dependency graph that deactivates
//! parameters whose activation condition is unsatisfied, and maintains the
//! global best configuration across all walks and steps.
//!
//! Start with [`space::SearchSpace`] to describe your parameters and their
//! conditions, implement [`objective::Objective`] for your evaluation
//! function, and call [`driver::local_search`].

#![allow(clippy::too_many_arguments)]

pub mod dominance;
pub mod driver;
pub mod error;
pub mod neighbor;
pub mod objective;
pub mod prelude;
pub mod random;
pub mod repair;
pub mod space;
pub mod table;
pub mod trace;
pub mod value;

// re-exports
pub use rand;
pub use rand_distr;
pub use serde;
