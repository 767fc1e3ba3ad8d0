/// The core trait for defining models in Cascade.
///
/// A `Model` maps a typed input to a typed output. Models should be
/// deterministic, always producing the same output for a given input, and
/// should not mutate external state when called. Solvers rely on both
/// properties: they call a model as often as they need, in whatever order
/// their algorithm requires.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use cascade_core::Model;
///
/// struct Doubler;
///
/// impl Model for Doubler {
///     type Input = f64;
///     type Output = f64;
///     type Error = Infallible;
///
///     fn call(&self, input: &f64) -> Result<f64, Self::Error> {
///         Ok(input * 2.0)
///     }
/// }
///
/// assert_eq!(Doubler.call(&3.0), Ok(6.0));
/// ```
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input and returns a result.
    ///
    /// # Errors
    ///
    /// Each model defines its own `Error` type, allowing it to determine
    /// what constitutes a failure within its domain.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// A captured input/output pair from a single model call.
///
/// Solvers store snapshots so callers can see exactly what the model was
/// asked and what it answered at each point of interest, without re-running
/// the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<I, O> {
    /// The input the model was called with.
    pub input: I,

    /// The output the model produced.
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    /// Creates a snapshot from an input and the output it produced.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use thiserror::Error;

    struct Doubler;

    impl Model for Doubler {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(input * 2.0)
        }
    }

    #[derive(Debug, Error, PartialEq)]
    #[error("input must be non-negative, got {0}")]
    struct NegativeInput(f64);

    struct Sqrt;

    impl Model for Sqrt {
        type Input = f64;
        type Output = f64;
        type Error = NegativeInput;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            if *input < 0.0 {
                return Err(NegativeInput(*input));
            }
            Ok(input.sqrt())
        }
    }

    #[test]
    fn call_produces_output() {
        assert_eq!(Doubler.call(&4.0), Ok(8.0));
    }

    #[test]
    fn call_propagates_model_error() {
        assert_eq!(Sqrt.call(&9.0), Ok(3.0));
        assert_eq!(Sqrt.call(&-1.0), Err(NegativeInput(-1.0)));
    }

    #[test]
    fn snapshot_holds_the_pair() {
        let input = 4.0;
        let output = Doubler.call(&input).unwrap();
        let snapshot = Snapshot::new(input, output);

        assert_eq!(snapshot.input, 4.0);
        assert_eq!(snapshot.output, 8.0);
    }
}
