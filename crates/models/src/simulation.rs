//! End-to-end simulation of the backstepping-controlled plant.
//!
//! [`simulate`] validates a [`Config`], integrates the closed-loop dynamics
//! with the adaptive Dormand-Prince solver, and returns the state and
//! control histories on a uniform sample grid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cascade_solvers::transient::dopri;

use crate::backstepping::{Backstepping, Dynamics, GainError, Input, State};

/// Simulation scenario: gain, initial conditions, time span, and output
/// resolution.
///
/// The default scenario starts the plant at (1, -1) and runs it for ten
/// seconds under a gain of 5, reporting 300 samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Control gain k in the backstepping law.
    pub gain: f64,
    /// Plant state at `t_start`.
    pub initial_state: State,
    /// Start of the integration interval.
    pub t_start: f64,
    /// End of the integration interval. Must be greater than `t_start`.
    pub t_end: f64,
    /// Number of equally spaced samples to report, endpoints included.
    pub samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gain: 5.0,
            initial_state: State { x1: 1.0, x2: -1.0 },
            t_start: 0.0,
            t_end: 10.0,
            samples: 300,
        }
    }
}

impl Config {
    /// Checks the scenario before any integration work starts.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Backstepping::new(self.gain)?;

        let State { x1, x2 } = self.initial_state;
        if !x1.is_finite() || !x2.is_finite() {
            return Err(ConfigError::NonFiniteInitialState { x1, x2 });
        }

        if !(self.t_start.is_finite() && self.t_end.is_finite()) || self.t_start >= self.t_end {
            return Err(ConfigError::InvalidTimeSpan {
                start: self.t_start,
                end: self.t_end,
            });
        }

        if self.samples < 2 {
            return Err(ConfigError::TooFewSamples(self.samples));
        }

        Ok(())
    }
}

/// Error returned when a [`Config`] fails validation.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Gain(#[from] GainError),
    #[error("initial state must be finite, got x1 = {x1}, x2 = {x2}")]
    NonFiniteInitialState { x1: f64, x2: f64 },
    #[error("time span must satisfy start < end with finite bounds, got [{start}, {end}]")]
    InvalidTimeSpan { start: f64, end: f64 },
    #[error("at least two samples are required to cover both endpoints, got {0}")]
    TooFewSamples(usize),
}

/// Error returned by [`simulate`].
///
/// Configuration problems are caught before integration starts; solver
/// errors carry the failure diagnostics from partway through the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Solver(#[from] dopri::Error),
}

/// Sampled state and control histories in column form.
///
/// All four columns have the same length. `time` is uniform from `t_start`
/// to `t_end` inclusive, and `control` holds the input the controller
/// applies at each sampled state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub x1: Vec<f64>,
    pub x2: Vec<f64>,
    pub control: Vec<f64>,
}

impl Trajectory {
    /// Number of samples in the trajectory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the trajectory holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// A completed simulation: the sampled trajectory plus solver statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub trajectory: Trajectory,
    pub stats: dopri::Stats,
}

/// Runs the scenario described by `config` and returns the sampled
/// trajectory.
///
/// # Errors
///
/// Returns [`Error::Config`] if the scenario is invalid, or
/// [`Error::Solver`] if the integration fails partway through (for example
/// when the step size underflows or a derivative stops being finite).
pub fn simulate(config: &Config) -> Result<Solution, Error> {
    config.validate()?;

    let model = Backstepping::new(config.gain).map_err(ConfigError::from)?;
    let initial = Input {
        t: config.t_start,
        state: config.initial_state,
    };

    let solution = dopri::solve_unobserved(
        &model,
        &Dynamics,
        initial,
        (config.t_start, config.t_end),
        config.samples,
        &dopri::Config::default(),
    )?;

    let mut time = Vec::with_capacity(solution.samples.len());
    let mut x1 = Vec::with_capacity(solution.samples.len());
    let mut x2 = Vec::with_capacity(solution.samples.len());
    let mut control = Vec::with_capacity(solution.samples.len());

    for sample in &solution.samples {
        time.push(sample.t);
        x1.push(sample.snapshot.input.state.x1);
        x2.push(sample.snapshot.input.state.x2);
        control.push(sample.snapshot.output.control);
    }

    Ok(Solution {
        trajectory: Trajectory {
            time,
            x1,
            x2,
            control,
        },
        stats: solution.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_settles_to_the_origin() {
        let solution = simulate(&Config::default()).unwrap();
        let trajectory = &solution.trajectory;

        assert_eq!(trajectory.len(), 300);
        assert_eq!(trajectory.x1.len(), 300);
        assert_eq!(trajectory.x2.len(), 300);
        assert_eq!(trajectory.control.len(), 300);

        assert_eq!(trajectory.time[0], 0.0);
        assert_eq!(trajectory.time[299], 10.0);
        for pair in trajectory.time.windows(2) {
            assert!(pair[0] < pair[1]);
        }

        for i in 0..trajectory.len() {
            assert!(trajectory.x1[i].abs() < 2.0);
            assert!(trajectory.x2[i].abs() < 2.0);
        }

        assert!(trajectory.x1[299].abs() <= 1e-2);
        assert!(trajectory.x2[299].abs() <= 1e-2);
    }

    #[test]
    fn control_matches_the_law_at_every_sample() {
        let config = Config::default();
        let solution = simulate(&config).unwrap();
        let trajectory = &solution.trajectory;

        for i in 0..trajectory.len() {
            let x1 = trajectory.x1[i];
            let x2 = trajectory.x2[i];
            let expected = -config.gain * (x1 + x2) - x1.powi(2) * x2;

            assert_eq!(trajectory.control[i], expected);
        }
    }

    #[test]
    fn zero_initial_state_stays_at_the_origin() {
        let config = Config {
            initial_state: State { x1: 0.0, x2: 0.0 },
            ..Config::default()
        };

        let trajectory = simulate(&config).unwrap().trajectory;

        for i in 0..trajectory.len() {
            assert_eq!(trajectory.x1[i], 0.0);
            assert_eq!(trajectory.x2[i], 0.0);
            assert_eq!(trajectory.control[i], 0.0);
        }
    }

    #[test]
    fn sample_count_is_configurable() {
        let config = Config {
            samples: 25,
            ..Config::default()
        };

        let trajectory = simulate(&config).unwrap().trajectory;

        assert_eq!(trajectory.len(), 25);
        assert_eq!(trajectory.time[0], 0.0);
        assert_eq!(trajectory.time[24], 10.0);
    }

    #[test]
    fn reversed_time_span_is_rejected() {
        let config = Config {
            t_start: 10.0,
            t_end: 0.0,
            ..Config::default()
        };

        assert!(matches!(
            simulate(&config),
            Err(Error::Config(ConfigError::InvalidTimeSpan { .. }))
        ));
    }

    #[test]
    fn empty_time_span_is_rejected() {
        let config = Config {
            t_start: 3.0,
            t_end: 3.0,
            ..Config::default()
        };

        assert!(matches!(
            simulate(&config),
            Err(Error::Config(ConfigError::InvalidTimeSpan { .. }))
        ));
    }

    #[test]
    fn non_finite_gain_is_rejected() {
        let config = Config {
            gain: f64::NAN,
            ..Config::default()
        };

        assert!(matches!(
            simulate(&config),
            Err(Error::Config(ConfigError::Gain(GainError::NonFinite(_))))
        ));
    }

    #[test]
    fn non_finite_initial_state_is_rejected() {
        let config = Config {
            initial_state: State {
                x1: f64::INFINITY,
                x2: -1.0,
            },
            ..Config::default()
        };

        assert!(matches!(
            simulate(&config),
            Err(Error::Config(ConfigError::NonFiniteInitialState { .. }))
        ));
    }

    #[test]
    fn too_few_samples_are_rejected() {
        let config = Config {
            samples: 1,
            ..Config::default()
        };

        assert!(matches!(
            simulate(&config),
            Err(Error::Config(ConfigError::TooFewSamples(1)))
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let config = Config::default();

        let first = simulate(&config).unwrap();
        let second = simulate(&config).unwrap();

        assert_eq!(first.trajectory, second.trajectory);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config {
            gain: 2.5,
            initial_state: State { x1: 0.5, x2: 0.25 },
            t_start: 0.0,
            t_end: 4.0,
            samples: 100,
        };

        let text = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, config);
    }
}
