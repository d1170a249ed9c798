//! Error types for the search-space model and the hill-climb driver.

use thiserror::Error;

/// Errors raised while constructing or querying a [`SearchSpace`](crate::space::SearchSpace).
///
/// These are all detected once, at construction time or at a name lookup; none
/// of them can occur mid-search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// The dependency graph between parameters contains a cycle.
    ///
    /// Detected when Kahn's algorithm fails to drain every node.
    #[error("the parameter dependency graph is cyclic")]
    Cyclic,
    /// `find_param_index` was called with a name that isn't in the space.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    /// A condition references a `parent_index` or `param_index` outside the
    /// parameter list.
    #[error("condition references out-of-range parameter index {0}")]
    UnknownCondition(usize),
    /// `param_index == parent_index` for some condition.
    #[error("parameter `{0}` cannot depend on itself")]
    SelfDependency(String),
    /// A parameter's own attributes are invalid (e.g. `upper < lower`, or a
    /// categorical parameter with zero levels).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Outcome of invoking the external objective on a batch.
///
/// `Terminated` is not modeled as an [`std::error::Error`] source the caller
/// needs to react to specially in a failure sense — it is a graceful stop
/// signal, handled entirely inside [`ObjectiveBridge`](crate::objective::ObjectiveBridge).
#[derive(Debug, Error)]
pub enum ObjectiveError {
    /// The objective raised a graceful early-stop condition.
    #[error("objective requested early termination")]
    Terminated,
    /// Any other failure from the objective callable.
    #[error("objective evaluation failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ObjectiveError {
    /// Wraps an arbitrary error as a non-termination objective failure.
    pub fn failed<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ObjectiveError::Failed(Box::new(err))
    }
}

/// Top-level error returned by [`local_search`](crate::driver::local_search).
#[derive(Debug, Error)]
pub enum SearchError {
    /// A `Control` field violates its documented precondition
    /// (e.g. `n_searches == 0`).
    #[error("invalid control parameter: {0}")]
    InvalidControl(String),
    /// The `initial_population` table's shape or column kinds disagree with
    /// the `SearchSpace`.
    #[error("initial population does not match search space: {0}")]
    SchemaMismatch(String),
    /// The objective failed in a non-termination way; propagated unchanged.
    #[error(transparent)]
    Objective(#[from] ObjectiveErrorNonTerminal),
}

/// Newtype wrapping the non-termination half of [`ObjectiveError`].
///
/// `ObjectiveError::Terminated` is intercepted inside the Objective Bridge and
/// never reaches [`SearchError`]; this wrapper makes that invariant visible
/// in the type system instead of leaving a dead match arm for callers to
/// worry about.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObjectiveErrorNonTerminal(#[source] Box<dyn std::error::Error + Send + Sync>);

impl ObjectiveErrorNonTerminal {
    pub(crate) fn new(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self(err)
    }
}
