//! The columnar candidate batch and the two shapes the
//! Hill-Climb Driver allocates it in: [`Population`] and [`NeighborBatch`].

use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    space::{ParamKind, SearchSpace},
    value::Value,
};

/// One parameter's column: a typed value array paired with an NA bitmap.
///
/// Typed columns (rather than a `Vec<Value>` of tagged cells) were chosen for
/// cache locality on large batches.
#[derive(Debug, Clone)]
enum Column {
    Real(Vec<f64>, Vec<bool>),
    Int(Vec<i64>, Vec<bool>),
    Cat(Vec<usize>, Vec<bool>),
    Bool(Vec<bool>, Vec<bool>),
}

impl Column {
    fn new(kind: &ParamKind, n_rows: usize) -> Self {
        let na = vec![true; n_rows];
        match kind {
            ParamKind::Real { .. } => Column::Real(vec![0.0; n_rows], na),
            ParamKind::Int { .. } => Column::Int(vec![0; n_rows], na),
            ParamKind::Categorical { .. } => Column::Cat(vec![0; n_rows], na),
            ParamKind::Bool => Column::Bool(vec![false; n_rows], na),
        }
    }

    fn na_slice(&self) -> &[bool] {
        match self {
            Column::Real(_, na) | Column::Int(_, na) | Column::Cat(_, na) | Column::Bool(_, na) => {
                na
            }
        }
    }

    fn na_slice_mut(&mut self) -> &mut [bool] {
        match self {
            Column::Real(_, na) | Column::Int(_, na) | Column::Cat(_, na) | Column::Bool(_, na) => {
                na
            }
        }
    }

    fn get(&self, row: usize) -> Value {
        if self.na_slice()[row] {
            return Value::Na;
        }
        match self {
            Column::Real(v, _) => Value::Real(v[row]),
            Column::Int(v, _) => Value::Int(v[row]),
            Column::Cat(v, _) => Value::Cat(v[row]),
            Column::Bool(v, _) => Value::Bool(v[row]),
        }
    }

    fn set(&mut self, row: usize, value: Value) {
        match (self, value) {
            (Column::Real(v, na), Value::Real(x)) => {
                debug_assert!(!x.is_nan(), "attempted to store NaN into a Real cell");
                v[row] = x;
                na[row] = false;
            }
            (Column::Int(v, na), Value::Int(x)) => {
                v[row] = x;
                na[row] = false;
            }
            (Column::Cat(v, na), Value::Cat(x)) => {
                v[row] = x;
                na[row] = false;
            }
            (Column::Bool(v, na), Value::Bool(x)) => {
                v[row] = x;
                na[row] = false;
            }
            (_, Value::Na) => panic!("use set_na to clear a cell"),
            (col, value) => panic!("value {value} does not match column kind {col:?}"),
        }
    }

    fn set_na(&mut self, row: usize) {
        self.na_slice_mut()[row] = true;
    }

    fn copy_cell_from(&mut self, row: usize, other: &Column, other_row: usize) {
        if other.na_slice()[other_row] {
            self.set_na(row);
            return;
        }
        self.set(row, other.get(other_row));
    }
}

/// A fixed-width columnar batch of candidate configurations, with one column
/// per parameter of a [`SearchSpace`] and `n_rows` rows. Cells may be `Na`.
#[derive(Debug, Clone)]
pub struct CandidateTable {
    space: Arc<SearchSpace>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl CandidateTable {
    /// Allocates a table of `n_rows` rows, every cell initially `Na`.
    pub fn new(space: Arc<SearchSpace>, n_rows: usize) -> Self {
        let columns = space
            .params()
            .iter()
            .map(|p| Column::new(&p.kind, n_rows))
            .collect();
        Self {
            space,
            columns,
            n_rows,
        }
    }

    /// The search space this table's columns are shaped by.
    pub fn schema(&self) -> &SearchSpace {
        &self.space
    }

    /// A cheap, shared handle to this table's search space, useful when the
    /// schema needs to be read while `self` is mutably borrowed elsewhere
    /// (e.g. [`crate::repair::repair_row`]).
    pub fn schema_arc(&self) -> Arc<SearchSpace> {
        self.space.clone()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns (one per parameter).
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Reads a cell.
    pub fn get(&self, row: usize, col: usize) -> Value {
        self.columns[col].get(row)
    }

    /// Writes a typed value into a cell. Panics if `value`'s variant doesn't
    /// match the column's parameter kind, or if `value` is [`Value::Na`]
    /// (use [`CandidateTable::set_na`] instead).
    pub fn set(&mut self, row: usize, col: usize, value: Value) {
        self.columns[col].set(row, value);
    }

    /// Marks a cell `Na`.
    pub fn set_na(&mut self, row: usize, col: usize) {
        self.columns[col].set_na(row);
    }

    /// Tests whether a cell is `Na`.
    pub fn is_na(&self, row: usize, col: usize) -> bool {
        self.columns[col].na_slice()[row]
    }

    /// Draws a uniformly random in-domain value and writes it into the cell
    /// uniform on `[lower, upper]` for `Real`, uniform on
    /// the integers in `[lower, upper]` for `Int`, uniform on `levels` for
    /// `Categorical`, uniform on `{false, true}` for `Bool`.
    pub fn set_random<R: Rng + ?Sized>(&mut self, row: usize, col: usize, rng: &mut R) {
        let value = match &self.space.params()[col].kind {
            ParamKind::Real { lower, upper } => Value::Real(rng.gen_range(*lower..=*upper)),
            ParamKind::Int { lower, upper } => Value::Int(rng.gen_range(*lower..=*upper)),
            ParamKind::Categorical { levels } => Value::Cat(rng.gen_range(0..levels.len())),
            ParamKind::Bool => Value::Bool(rng.gen_bool(0.5)),
        };
        self.set(row, col, value);
    }

    /// Applies [`CandidateTable::set_random`] to every column of `row`.
    ///
    /// Draws are consumed one column at a time, in column
    /// order, for reproducibility.
    pub fn set_random_row<R: Rng + ?Sized>(&mut self, row: usize, rng: &mut R) {
        for col in 0..self.n_cols() {
            self.set_random(row, col, rng);
        }
    }

    /// Mutates a single, non-`Na` cell in place.
    ///
    /// Consumes RNG draws in the fixed order the reproducibility contract
    /// requires for a mutation: one Gaussian draw for `Real`
    /// and `Int`, one integer draw for `Categorical`, one integer draw
    /// (bit flip) for `Bool`.
    ///
    /// # Panics
    ///
    /// Panics (debug-asserts) if the cell is currently `Na`: mutating an
    /// inactive cell is a programmer error.
    pub fn mutate<R: Rng + ?Sized>(&mut self, row: usize, col: usize, mut_sd: f64, rng: &mut R) {
        debug_assert!(
            !self.is_na(row, col),
            "mutate called on an NA cell (row {row}, col {col})"
        );
        match &self.space.params()[col].kind {
            ParamKind::Real { lower, upper } => {
                let (lower, upper) = (*lower, *upper);
                if upper - lower <= 1e-8 {
                    return;
                }
                let v = self.get(row, col).as_real().unwrap();
                let normal = Normal::new(0.0, mut_sd).expect("mut_sd must be positive");
                let noise = normal.sample(rng);
                let mut next = v + (upper - lower) * noise;
                next = next.clamp(lower, upper);
                self.set(row, col, Value::Real(next));
            }
            ParamKind::Int { lower, upper } => {
                let (lower, upper) = (*lower, *upper);
                if (upper - lower) as f64 <= 1e-8 {
                    return;
                }
                let v = self.get(row, col).as_int().unwrap() as f64;
                let normal = Normal::new(0.0, mut_sd).expect("mut_sd must be positive");
                let noise = normal.sample(rng);
                let mut next = v + (upper - lower) as f64 * noise;
                next = next.round().clamp(lower as f64, upper as f64);
                self.set(row, col, Value::Int(next as i64));
            }
            ParamKind::Categorical { levels } => {
                let n_levels = levels.len();
                if n_levels == 1 {
                    return;
                }
                let current = self.get(row, col).as_cat().unwrap();
                let mut draw = rng.gen_range(0..n_levels - 1);
                if draw >= current {
                    draw += 1;
                }
                self.set(row, col, Value::Cat(draw));
            }
            ParamKind::Bool => {
                // The flip itself is deterministic, but the RNG discipline
                // still promises exactly one type-specific
                // draw here so that mutation consumes the RNG stream
                // uniformly across parameter kinds.
                let _: bool = rng.gen();
                let v = self.get(row, col).as_bool().unwrap();
                self.set(row, col, Value::Bool(!v));
            }
        }
    }

    /// Copies an entire row from `other` (possibly `self`) into `row` of `self`.
    pub fn copy_row_from(&mut self, row: usize, other: &CandidateTable, other_row: usize) {
        for col in 0..self.n_cols() {
            self.columns[col].copy_cell_from(row, &other.columns[col], other_row);
        }
    }

    /// Snapshots a row as a plain `Vec<Value>`, one entry per column.
    pub fn row_values(&self, row: usize) -> Vec<Value> {
        (0..self.n_cols()).map(|col| self.get(row, col)).collect()
    }
}

/// A [`CandidateTable`] of height `n_searches` plus the per-walk bookkeeping
/// the Hill-Climb Driver needs: the current minimize-orientation score and
/// the consecutive non-improving step count.
#[derive(Debug, Clone)]
pub struct Population {
    pub table: CandidateTable,
    pub pop_y: Vec<f64>,
    pub stagnate_count: Vec<i32>,
}

impl Population {
    /// Allocates a population of `n_searches` rows, all scores `+Inf` and all
    /// stagnation counters `0`.
    pub fn new(space: Arc<SearchSpace>, n_searches: usize) -> Self {
        Self {
            table: CandidateTable::new(space, n_searches),
            pop_y: vec![f64::INFINITY; n_searches],
            stagnate_count: vec![0; n_searches],
        }
    }

    /// Number of parallel walks.
    pub fn n_searches(&self) -> usize {
        self.table.n_rows()
    }
}

/// A [`CandidateTable`] of height `n_searches * n_neighs`, arranged in
/// contiguous blocks of `n_neighs` rows per source population row
/// per source population row.
#[derive(Debug, Clone)]
pub struct NeighborBatch {
    pub table: CandidateTable,
    pub neighs_y: Vec<f64>,
    n_neighs: usize,
}

impl NeighborBatch {
    /// Allocates a batch of `n_searches * n_neighs` rows.
    pub fn new(space: Arc<SearchSpace>, n_searches: usize, n_neighs: usize) -> Self {
        let n_rows = n_searches * n_neighs;
        Self {
            table: CandidateTable::new(space, n_rows),
            neighs_y: vec![f64::INFINITY; n_rows],
            n_neighs,
        }
    }

    /// Neighbors per walk, i.e. the block width.
    pub fn n_neighs(&self) -> usize {
        self.n_neighs
    }

    /// The row range (block) holding the neighbors of population row `i`.
    pub fn block(&self, i: usize) -> std::ops::Range<usize> {
        i * self.n_neighs..(i + 1) * self.n_neighs
    }
}
