//! An optional, opt-in per-step progress recorder.
//!
//! A small, plain-data entry type appended once per step. Attaching a
//! [`Trace`] never changes search semantics — it only observes scores the
//! driver already computed.

/// One step's worth of search progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntry {
    /// `0` for the initial evaluation, `1..=n_steps` for main-loop steps.
    pub step: usize,
    /// The global best score at the end of this step, in minimize orientation.
    pub global_best_y: f64,
    /// Each walk's current score, in minimize orientation.
    pub pop_y: Vec<f64>,
    /// Each walk's consecutive non-improving step count.
    pub stagnate_count: Vec<i32>,
}

/// Sink for [`StepEntry`] records.
///
/// Implement this to wire the driver's progress into your own logging or
/// metrics system; [`Vec<StepEntry>`] implements it directly for the common
/// case of just wanting the whole history in memory.
pub trait Trace {
    /// Appends one step's progress.
    fn record(&mut self, entry: StepEntry);
}

impl Trace for Vec<StepEntry> {
    fn record(&mut self, entry: StepEntry) {
        self.push(entry);
    }
}
