/// Defines an ODE (ordinary differential equation) problem to be solved.
///
/// An ODE problem adapts a model to fixed-dimension numerical integration.
/// The const parameter `N` is the number of integrated state variables. The
/// problem extracts an `[f64; N]` state from model input, extracts the state
/// derivative from model input and output, and rebuilds a full model input at
/// any `(t, state)` point the solver needs to evaluate. Working with plain
/// arrays lets adaptive solvers form componentwise error norms and
/// interpolants while the model keeps its own typed input and output.
///
/// Solvers treat the independent variable as time, but nothing requires it;
/// `t` can be any scalar the model interprets consistently.
pub trait OdeProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the integrated state from model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted from the input.
    fn state(&self, input: &Self::Input) -> Result<[f64; N], Self::Error>;

    /// Extracts the state derivative from model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be extracted.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; N], Self::Error>;

    /// Builds a full model input at the given time and state.
    ///
    /// `base` is the most recent accepted input; problems that carry fields
    /// beyond `t` and the integrated state copy them forward from it.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed.
    fn build_input(
        &self,
        base: &Self::Input,
        t: f64,
        state: [f64; N],
    ) -> Result<Self::Input, Self::Error>;
}
