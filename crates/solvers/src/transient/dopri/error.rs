use std::error::Error as StdError;

/// Errors that can occur during Dormand–Prince integration.
///
/// The first three variants reject invalid requests before the model is
/// evaluated. The middle three report integration failures, each carrying
/// the time at which the solver gave up. The last two propagate failures
/// from the model or problem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("time span start ({start}) must be finite and less than end ({end})")]
    InvalidSpan { start: f64, end: f64 },

    #[error("at least two samples are required, got {0}")]
    TooFewSamples(usize),

    #[error("initial state contains a non-finite component")]
    NonFiniteInitial,

    #[error("derivative became non-finite at t = {t}")]
    NonFiniteDerivative { t: f64 },

    #[error("step size underflowed to {h:e} at t = {t}; local error tolerance cannot be met")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("gave up after {max_steps} attempted steps at t = {t}")]
    MaxStepsExceeded { max_steps: usize, t: f64 },

    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }
}
