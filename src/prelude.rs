//! Re-exports the types most callers need for a `local_search` run.

pub use crate::{
    driver::{local_search, Control, SearchOutcome},
    error::{ObjectiveError, SearchError, SpaceError},
    objective::Objective,
    space::{CondKind, Condition, ParamKind, Parameter, SearchSpace},
    table::{CandidateTable, NeighborBatch, Population},
    trace::{StepEntry, Trace},
    value::Value,
};
