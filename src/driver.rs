//! The hill-climb driver: the `local_search` entry point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    error::SearchError,
    neighbor::generate_neighbors,
    objective::{EvalOutcome, Objective, ObjectiveBridge},
    random::Random,
    repair::repair_row,
    space::SearchSpace,
    table::{CandidateTable, NeighborBatch, Population},
    trace::{StepEntry, Trace},
    value::Value,
};

/// Tunable options for [`local_search`], bundled as a single
/// `#[derive(Serialize, Deserialize)]` struct rather than a long parameter
/// list, so a run's configuration can be persisted alongside its result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Control {
    /// Whether the objective is minimized (`true`) or maximized (`false`).
    pub minimize: bool,
    /// Number of parallel hill-climbing walks. Must be `>= 1`.
    pub n_searches: usize,
    /// Number of main-loop iterations. May be `0`.
    pub n_steps: usize,
    /// Neighbors generated per walk per step. Must be `>= 1`.
    pub n_neighs: usize,
    /// Gaussian standard deviation, on the `[0, 1]`-normalized scale, used to
    /// mutate `Real`/`Int` parameters. Must be `> 0`.
    pub mut_sd: f64,
    /// Consecutive non-improving steps after which a walk restarts. Must be `>= 1`.
    pub stagnate_max: i32,
    /// Seed for the scoped PRNG the driver acquires for the duration of the
    /// search.
    pub seed: u64,
}

impl Control {
    fn validate(&self) -> Result<(), SearchError> {
        if self.n_searches < 1 {
            return Err(SearchError::InvalidControl(
                "n_searches must be >= 1".into(),
            ));
        }
        if self.n_neighs < 1 {
            return Err(SearchError::InvalidControl("n_neighs must be >= 1".into()));
        }
        if self.stagnate_max < 1 {
            return Err(SearchError::InvalidControl(
                "stagnate_max must be >= 1".into(),
            ));
        }
        if !(self.mut_sd > 0.0) {
            return Err(SearchError::InvalidControl("mut_sd must be > 0".into()));
        }
        Ok(())
    }
}

/// The result of a [`local_search`] run: the best row ever evaluated and its
/// score, both in the caller's original objective orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The best configuration found, one [`Value`] per parameter.
    pub x: Vec<Value>,
    /// Its score, in the caller's original (not minimize-normalized) orientation.
    pub y: f64,
}

/// Runs a parallel elitist hill-climb.
///
/// `initial_population` must have exactly `control.n_searches` rows and must
/// already have every inactive parameter set to `Na` and every active
/// parameter populated — the driver does not re-repair it.
pub fn local_search(
    objective: &mut dyn Objective,
    space: &Arc<SearchSpace>,
    control: &Control,
    initial_population: &CandidateTable,
    mut trace: Option<&mut dyn Trace>,
) -> Result<SearchOutcome, SearchError> {
    control.validate()?;

    if initial_population.n_rows() != control.n_searches {
        return Err(SearchError::SchemaMismatch(format!(
            "initial population has {} rows, expected n_searches = {}",
            initial_population.n_rows(),
            control.n_searches
        )));
    }
    if initial_population.schema() != space.as_ref() {
        return Err(SearchError::SchemaMismatch(
            "initial population's search space does not match".into(),
        ));
    }

    let mut rng = Random::seeded(control.seed);
    let bridge = ObjectiveBridge::new(control.minimize);

    let mut population = Population::new(space.clone(), control.n_searches);
    for i in 0..control.n_searches {
        population.table.copy_row_from(i, initial_population, i);
    }
    let mut neighbors = NeighborBatch::new(space.clone(), control.n_searches, control.n_neighs);

    let mut global_best_y = f64::INFINITY;
    let mut global_best_x: Vec<Value> = vec![Value::Na; space.n_params()];

    let outcome = bridge
        .evaluate(objective, &population.table, &mut population.pop_y)
        .map_err(SearchError::from)?;

    let terminated_before_start = matches!(outcome, EvalOutcome::Terminated);

    if !terminated_before_start {
        for i in 0..control.n_searches {
            if population.pop_y[i] < global_best_y {
                global_best_y = population.pop_y[i];
                global_best_x = population.table.row_values(i);
            }
        }
    }

    if let Some(sink) = trace.as_deref_mut() {
        sink.record(StepEntry {
            step: 0,
            global_best_y,
            pop_y: population.pop_y.clone(),
            stagnate_count: population.stagnate_count.clone(),
        });
    }

    if !terminated_before_start {
        for step in 0..control.n_steps {
            for i in 0..control.n_searches {
                if population.stagnate_count[i] >= control.stagnate_max {
                    log::debug!("walk {i} restarting after {} stagnant steps", control.stagnate_max);
                    population.table.set_random_row(i, &mut rng);
                    repair_row(&mut population.table, i, &mut rng);
                    population.pop_y[i] = f64::INFINITY;
                    population.stagnate_count[i] = 0;
                }
            }

            generate_neighbors(&population, &mut neighbors, control.mut_sd, &mut rng);

            let outcome = bridge
                .evaluate(objective, &neighbors.table, &mut neighbors.neighs_y)
                .map_err(SearchError::from)?;
            if matches!(outcome, EvalOutcome::Terminated) {
                log::debug!("objective requested termination at step {step}");
                break;
            }

            for i in 0..control.n_searches {
                let block = neighbors.block(i);
                let best_r = block
                    .clone()
                    .min_by(|&a, &b| neighbors.neighs_y[a].total_cmp(&neighbors.neighs_y[b]))
                    .expect("n_neighs >= 1");

                if neighbors.neighs_y[best_r] < population.pop_y[i] {
                    population.table.copy_row_from(i, &neighbors.table, best_r);
                    population.pop_y[i] = neighbors.neighs_y[best_r];
                    population.stagnate_count[i] = 0;

                    if neighbors.neighs_y[best_r] < global_best_y {
                        global_best_y = neighbors.neighs_y[best_r];
                        global_best_x = neighbors.table.row_values(best_r);
                    }
                } else {
                    population.stagnate_count[i] += 1;
                }
            }

            if let Some(sink) = trace.as_deref_mut() {
                sink.record(StepEntry {
                    step: step + 1,
                    global_best_y,
                    pop_y: population.pop_y.clone(),
                    stagnate_count: population.stagnate_count.clone(),
                });
            }
        }
    }

    Ok(SearchOutcome {
        x: global_best_x,
        y: bridge.to_caller_orientation(global_best_y),
    })
}
