use cascade_core::Snapshot;

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the end of the time span with every sample emitted.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// Work counters accumulated during a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total model evaluations: stages, dense-output samples, and step-size
    /// selection probes.
    pub evals: usize,

    /// Accepted integration steps.
    pub accepted: usize,

    /// Rejected step attempts.
    pub rejected: usize,
}

/// A dense-output sample on the requested time grid.
#[derive(Debug, Clone)]
pub struct Sample<I, O> {
    /// The sample time.
    pub t: f64,

    /// Snapshot of the model input and output at `t`.
    pub snapshot: Snapshot<I, O>,
}

/// The result of a Dormand–Prince integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// How the solver terminated.
    pub status: Status,

    /// Samples on the uniform time grid, in increasing time order.
    ///
    /// A complete run holds exactly the requested number of samples. A run
    /// stopped by an observer holds the samples whose times the integration
    /// had already passed.
    pub samples: Vec<Sample<I, O>>,

    /// Work counters for the run.
    pub stats: Stats,
}
