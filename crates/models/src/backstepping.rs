//! A two-state nonlinear plant stabilized by backstepping.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cascade_core::{Model, OdeProblem};

/// State of the plant: the two dynamical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub x1: f64,
    pub x2: f64,
}

/// Model input: current time and state.
///
/// The dynamics are autonomous; `t` is carried for the standard IVP
/// right-hand-side signature and so reported samples stay time-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Input {
    pub t: f64,
    pub state: State,
}

/// Model output: the state derivatives and the control input that shaped
/// them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Output {
    pub dx1_dt: f64,
    pub dx2_dt: f64,
    pub control: f64,
}

/// Error returned when constructing a [`Backstepping`] model with an
/// invalid gain.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GainError {
    #[error("controller gain must be finite, got {0}")]
    NonFinite(f64),
}

/// The closed-loop plant under its backstepping control law:
///
/// ```text
/// ẋ₁ = −x₁ + x₁²·x₂
/// ẋ₂ = −x₁³ − x₂ + u
/// u  = −k·(x₁ + x₂) − x₁²·x₂
/// ```
///
/// The law treats x₂ as a virtual control for the x₁ subsystem, then shapes
/// ẋ₂ to cancel the −x₁³ cross term and the x₁ + x₂ coupling, making the
/// origin asymptotically stable for suitable gains k.
///
/// Evaluation is total: any state maps to a derivative, with no validation
/// and no failure path. Extreme states may produce non-finite derivatives;
/// reacting to those is the solver's job.
pub struct Backstepping {
    gain: f64,
}

impl Backstepping {
    /// Creates the model with the given control gain.
    ///
    /// # Errors
    ///
    /// Returns [`GainError::NonFinite`] if the gain is NaN or infinite.
    pub fn new(gain: f64) -> Result<Self, GainError> {
        if !gain.is_finite() {
            return Err(GainError::NonFinite(gain));
        }
        Ok(Self { gain })
    }

    /// Returns the control gain.
    #[must_use]
    pub fn gain(&self) -> f64 {
        self.gain
    }
}

impl Model for Backstepping {
    type Input = Input;
    type Output = Output;
    type Error = Infallible;

    fn call(&self, input: &Input) -> Result<Output, Infallible> {
        let State { x1, x2 } = input.state;
        let k = self.gain;

        let control = -k * (x1 + x2) - x1.powi(2) * x2;
        let dx1_dt = -x1 + x1.powi(2) * x2;
        let dx2_dt = -x1.powi(3) - x2 + control;

        Ok(Output {
            dx1_dt,
            dx2_dt,
            control,
        })
    }
}

/// ODE problem wiring for the closed-loop plant.
///
/// Integrates `[x1, x2]`. The control input is an algebraic output of each
/// evaluation, not integrated state, so solvers recover it at any reported
/// sample by evaluating the model there.
pub struct Dynamics;

impl OdeProblem<2> for Dynamics {
    type Input = Input;
    type Output = Output;
    type Error = Infallible;

    fn state(&self, input: &Input) -> Result<[f64; 2], Infallible> {
        Ok([input.state.x1, input.state.x2])
    }

    fn derivative(&self, _input: &Input, output: &Output) -> Result<[f64; 2], Infallible> {
        Ok([output.dx1_dt, output.dx2_dt])
    }

    fn build_input(&self, _base: &Input, t: f64, state: [f64; 2]) -> Result<Input, Infallible> {
        Ok(Input {
            t,
            state: State {
                x1: state[0],
                x2: state[1],
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn input(t: f64, x1: f64, x2: f64) -> Input {
        Input {
            t,
            state: State { x1, x2 },
        }
    }

    #[test]
    fn outputs_match_the_control_law() {
        let cases = [
            (4.2, 1.5, -2.3),
            (5.0, 1.0, -1.0),
            (0.5, -0.7, 0.2),
            (-1.0, 2.0, 3.0),
        ];

        for (k, x1, x2) in cases {
            let model = Backstepping::new(k).unwrap();
            let output = model.call(&input(0.0, x1, x2)).unwrap();

            let u: f64 = -k * (x1 + x2) - x1.powi(2) * x2;
            assert_relative_eq!(output.control, u);
            assert_relative_eq!(output.dx1_dt, -x1 + x1.powi(2) * x2);
            assert_relative_eq!(output.dx2_dt, -x1.powi(3) - x2 + u);
        }
    }

    #[test]
    fn origin_is_an_equilibrium_for_any_gain() {
        for k in [-10.0, 0.0, 0.1, 5.0, 250.0] {
            let model = Backstepping::new(k).unwrap();
            for t in [0.0, 1.0, 100.0] {
                let output = model.call(&input(t, 0.0, 0.0)).unwrap();

                assert_eq!(output.dx1_dt, 0.0);
                assert_eq!(output.dx2_dt, 0.0);
                assert_eq!(output.control, 0.0);
            }
        }
    }

    #[test]
    fn dynamics_are_autonomous() {
        let model = Backstepping::new(5.0).unwrap();

        let early = model.call(&input(0.0, 0.3, -0.8)).unwrap();
        let late = model.call(&input(42.0, 0.3, -0.8)).unwrap();

        assert_eq!(early, late);
    }

    #[test]
    fn gain_must_be_finite() {
        assert!(matches!(
            Backstepping::new(f64::NAN),
            Err(GainError::NonFinite(_))
        ));
        assert!(matches!(
            Backstepping::new(f64::INFINITY),
            Err(GainError::NonFinite(_))
        ));

        let model = Backstepping::new(5.0).unwrap();
        assert_eq!(model.gain(), 5.0);
    }

    #[test]
    fn problem_extracts_state_and_derivative() {
        let model = Backstepping::new(5.0).unwrap();
        let input = input(0.0, 1.0, -1.0);
        let output = model.call(&input).unwrap();

        assert_eq!(Dynamics.state(&input), Ok([1.0, -1.0]));
        assert_eq!(
            Dynamics.derivative(&input, &output),
            Ok([output.dx1_dt, output.dx2_dt])
        );
    }

    #[test]
    fn problem_rebuilds_input_from_time_and_state() {
        let base = input(0.0, 1.0, -1.0);
        let rebuilt = Dynamics.build_input(&base, 2.5, [0.25, -0.5]).unwrap();

        assert_eq!(rebuilt.t, 2.5);
        assert_eq!(rebuilt.state, State { x1: 0.25, x2: -0.5 });
    }
}
