//! The objective bridge: invokes the external objective on a
//! batch, applies the minimize/maximize sign, and distinguishes graceful
//! termination from hard errors.

use crate::{
    error::{ObjectiveError, ObjectiveErrorNonTerminal},
    table::CandidateTable,
};

/// The external, user-supplied black-box objective.
///
/// `&mut self` (rather than `&self`) since realistic objectives carry
/// mutable evaluation counters, caches, or I/O handles.
pub trait Objective {
    /// Evaluates every row of `batch` and returns one score per row, in the
    /// caller's own (not yet sign-adjusted) orientation.
    ///
    /// Returns [`ObjectiveError::Terminated`] to request a graceful stop, or
    /// [`ObjectiveError::Failed`] (or any other source wrapped with
    /// [`ObjectiveError::failed`]) to report a hard failure.
    fn evaluate(&mut self, batch: &CandidateTable) -> Result<Vec<f64>, ObjectiveError>;
}

/// Outcome of one [`ObjectiveBridge::evaluate`] call.
pub enum EvalOutcome {
    /// The objective succeeded; scores have been written into the caller's
    /// buffer, in minimize orientation.
    Ok,
    /// The objective requested a graceful stop.
    Terminated,
}

/// Applies the minimize/maximize sign and classifies objective failures.
pub struct ObjectiveBridge {
    /// `+1.0` if minimizing, `-1.0` if maximizing; multiplying a raw score by
    /// this yields the internal, minimize-orientation score.
    obj_sign: f64,
}

impl ObjectiveBridge {
    /// Constructs a bridge for the given orientation.
    pub fn new(minimize: bool) -> Self {
        Self {
            obj_sign: if minimize { 1.0 } else { -1.0 },
        }
    }

    /// The sign applied to every raw objective value to reach minimize
    /// orientation.
    pub fn obj_sign(&self) -> f64 {
        self.obj_sign
    }

    /// Converts a minimize-orientation score back to the caller's original
    /// orientation.
    pub fn to_caller_orientation(&self, minimize_oriented: f64) -> f64 {
        minimize_oriented * self.obj_sign
    }

    /// Invokes `objective` on `batch` and writes sign-adjusted scores into
    /// `scores_out` (resized to `batch.n_rows()`).
    pub fn evaluate(
        &self,
        objective: &mut dyn Objective,
        batch: &CandidateTable,
        scores_out: &mut Vec<f64>,
    ) -> Result<EvalOutcome, ObjectiveErrorNonTerminal> {
        match objective.evaluate(batch) {
            Ok(raw) => {
                debug_assert_eq!(
                    raw.len(),
                    batch.n_rows(),
                    "objective returned {} scores for {} rows",
                    raw.len(),
                    batch.n_rows()
                );
                scores_out.clear();
                scores_out.extend(raw.into_iter().map(|y| y * self.obj_sign));
                Ok(EvalOutcome::Ok)
            }
            Err(ObjectiveError::Terminated) => Ok(EvalOutcome::Terminated),
            Err(ObjectiveError::Failed(source)) => {
                Err(ObjectiveErrorNonTerminal::new(source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::space::{Parameter, SearchSpace};

    struct Sphere;

    impl Objective for Sphere {
        fn evaluate(&mut self, batch: &CandidateTable) -> Result<Vec<f64>, ObjectiveError> {
            Ok((0..batch.n_rows())
                .map(|row| {
                    let x = batch.get(row, 0).as_real().unwrap();
                    x * x
                })
                .collect())
        }
    }

    struct TerminatesImmediately;

    impl Objective for TerminatesImmediately {
        fn evaluate(&mut self, _batch: &CandidateTable) -> Result<Vec<f64>, ObjectiveError> {
            Err(ObjectiveError::Terminated)
        }
    }

    fn space() -> Arc<SearchSpace> {
        Arc::new(SearchSpace::new(vec![Parameter::real("x", -5.0, 5.0)], vec![]).unwrap())
    }

    #[test]
    fn minimize_orientation_leaves_scores_unchanged() {
        let mut table = CandidateTable::new(space(), 1);
        table.set(0, 0, crate::value::Value::Real(3.0));
        let bridge = ObjectiveBridge::new(true);
        let mut scores = Vec::new();
        let outcome = bridge
            .evaluate(&mut Sphere, &table, &mut scores)
            .unwrap();
        assert!(matches!(outcome, EvalOutcome::Ok));
        assert_eq!(scores, vec![9.0]);
    }

    #[test]
    fn maximize_orientation_flips_sign() {
        let mut table = CandidateTable::new(space(), 1);
        table.set(0, 0, crate::value::Value::Real(3.0));
        let bridge = ObjectiveBridge::new(false);
        let mut scores = Vec::new();
        bridge.evaluate(&mut Sphere, &table, &mut scores).unwrap();
        assert_eq!(scores, vec![-9.0]);
        assert_eq!(bridge.to_caller_orientation(scores[0]), 9.0);
    }

    #[test]
    fn termination_is_reported_without_being_an_error() {
        let table = CandidateTable::new(space(), 1);
        let bridge = ObjectiveBridge::new(true);
        let mut scores = Vec::new();
        let outcome = bridge
            .evaluate(&mut TerminatesImmediately, &table, &mut scores)
            .unwrap();
        assert!(matches!(outcome, EvalOutcome::Terminated));
    }
}
