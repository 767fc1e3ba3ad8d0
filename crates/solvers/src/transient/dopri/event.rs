use cascade_core::Snapshot;

/// Event emitted by the Dormand–Prince solver after each accepted step.
///
/// Step 0 is the initial state before any integration, with `h = 0`.
/// Steps 1..N follow the solver's adaptive step sequence, not the output
/// sample grid; rejected attempts are not observable.
#[derive(Debug, Clone)]
pub struct Event<I, O> {
    /// The accepted step number (0 for the initial state).
    pub step: usize,

    /// Time at the end of this step.
    pub t: f64,

    /// Size of the step just taken (0 for the initial event).
    pub h: f64,

    /// Snapshot of the model input and output at `t`.
    pub snapshot: Snapshot<I, O>,
}
