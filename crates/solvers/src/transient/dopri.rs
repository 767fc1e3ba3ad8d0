//! Adaptive Dormand–Prince 5(4) solver for ODE problems.
//!
//! This module integrates an initial value problem with the explicit
//! Dormand–Prince embedded Runge–Kutta pair. The fifth-order formula
//! advances the solution, the fourth-order formula estimates the local
//! error, and the step size adapts to hold that estimate below the
//! configured tolerances. The solution is reported on a uniform time grid
//! via the method's dense-output interpolant, so output resolution is
//! independent of the steps the controller actually takes.
//!
//! Every reported sample carries a full model snapshot: the solver rebuilds
//! the model input at the interpolated state and calls the model once per
//! sample, so derived outputs that are not integrated state (a control
//! input, a heat flow) are available at every sample without being carried
//! through the integration.
//!
//! # Example
//!
//! ```ignore
//! use cascade_solvers::transient::dopri;
//!
//! let config = dopri::Config::default();
//! let solution =
//!     dopri::solve_unobserved(&model, &problem, initial, (0.0, 10.0), 300, &config)?;
//!
//! for sample in &solution.samples {
//!     println!("t={}: {:?}", sample.t, sample.snapshot.output);
//! }
//! ```

mod action;
mod config;
mod error;
mod event;
mod solution;
mod tableau;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Sample, Solution, Stats, Status};

use cascade_core::{Model, Observer, OdeProblem, Snapshot};

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Step-size controller exponent: −1 / (error estimator order + 1).
const ERROR_EXPONENT: f64 = -0.2;

/// Integrates an ODE problem with the Dormand–Prince 5(4) method.
///
/// # Algorithm
///
/// 1. Validate the time span and sample count, then the initial state.
/// 2. Call the model once at the initial input; this evaluation doubles as
///    the first Runge–Kutta stage.
/// 3. Choose a first step size (configured, or selected from the scaled
///    magnitudes of the initial state and derivative plus one probe
///    evaluation).
/// 4. For each step: evaluate the trial stages, form the fifth-order
///    solution and the embedded error estimate, and accept or reject the
///    step. Accepted steps emit dense-output samples for every grid time
///    they passed and an [`Event`] to the observer; both outcomes rescale
///    the step size.
/// 5. Stop when the end of the span is reached, the observer stops the run,
///    or a failure is detected.
///
/// The final step is clamped to land exactly on the end of the span, so the
/// last sample is never extrapolated.
///
/// # Observer
///
/// The observer receives an [`Event`] for the initial state (step 0) and
/// after each accepted step, and may return [`Action::StopEarly`] to
/// terminate integration early with the samples collected so far.
///
/// # Errors
///
/// Returns an error if the request is invalid ([`Error::InvalidSpan`],
/// [`Error::TooFewSamples`], [`Error::NonFiniteInitial`]), if integration
/// fails ([`Error::StepSizeUnderflow`], [`Error::MaxStepsExceeded`],
/// [`Error::NonFiniteDerivative`]), or if the model or problem returns an
/// error at any point. Invalid requests are rejected before the model is
/// called.
pub fn solve<const N: usize, M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    time_span: (f64, f64),
    samples: usize,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
    Obs: Observer<Event<M::Input, M::Output>, Action>,
{
    let (t_start, t_end) = time_span;
    if !t_start.is_finite() || !t_end.is_finite() || t_start >= t_end {
        return Err(Error::InvalidSpan {
            start: t_start,
            end: t_end,
        });
    }
    if samples < 2 {
        return Err(Error::TooFewSamples(samples));
    }

    let y0 = problem.state(&initial).map_err(Error::problem)?;
    if !is_finite(&y0) {
        return Err(Error::NonFiniteInitial);
    }

    let mut stats = Stats::default();

    // The initial evaluation is also the first stage of the first step.
    let output0 = model.call(&initial).map_err(Error::model)?;
    stats.evals += 1;
    let f0 = problem
        .derivative(&initial, &output0)
        .map_err(Error::problem)?;
    if !is_finite(&f0) {
        return Err(Error::NonFiniteDerivative { t: t_start });
    }

    let mut current = Snapshot::new(initial, output0);

    let grid = sample_grid(t_start, t_end, samples);
    let mut emitted = Vec::with_capacity(samples);
    emitted.push(Sample {
        t: t_start,
        snapshot: current.clone(),
    });
    let mut cursor = 1;

    let event = Event {
        step: 0,
        t: t_start,
        h: 0.0,
        snapshot: current.clone(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            samples: emitted,
            stats,
        });
    }

    let mut h = match config.first_step() {
        Some(first) => first.min(t_end - t_start),
        None => initial_step(
            model, problem, &current, &y0, &f0, t_start, t_end, config, &mut stats,
        )?,
    };

    let mut t = t_start;
    let mut y = y0;
    let mut k = [[0.0; N]; tableau::STAGES];
    k[0] = f0;
    let mut step_rejected = false;
    let mut attempts = 0;

    while t < t_end {
        if attempts >= config.max_steps() {
            return Err(Error::MaxStepsExceeded {
                max_steps: config.max_steps(),
                t,
            });
        }
        attempts += 1;

        let min_step = 10.0 * f64::EPSILON * t.abs().max(t_end.abs());
        if h < min_step {
            if step_rejected {
                return Err(Error::StepSizeUnderflow { t, h });
            }
            h = min_step;
        }

        // Clamp the final step to land exactly on t_end.
        let t_new = (t + h).min(t_end);
        let h_step = t_new - t;

        match attempt_step(
            model, problem, &current, t, h_step, t_new, &y, &mut k, config, &mut stats,
        )? {
            Some(candidate) if candidate.err <= 1.0 => {
                stats.accepted += 1;

                let factor = if candidate.err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * candidate.err.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                };
                let factor = if step_rejected { factor.min(1.0) } else { factor };

                // Emit every grid sample this step passed.
                let rcont = dense_coefficients(&y, &candidate.y_new, &k, h_step);
                while cursor < grid.len() && grid[cursor] <= t_new {
                    let ts = grid[cursor];
                    let snapshot = if ts == t_new {
                        candidate.snapshot.clone()
                    } else {
                        let theta = (ts - t) / h_step;
                        let ys = interpolate(&rcont, theta);
                        let input = problem
                            .build_input(&current.input, ts, ys)
                            .map_err(Error::problem)?;
                        let output = model.call(&input).map_err(Error::model)?;
                        stats.evals += 1;
                        Snapshot::new(input, output)
                    };
                    emitted.push(Sample { t: ts, snapshot });
                    cursor += 1;
                }

                t = t_new;
                y = candidate.y_new;
                k[0] = k[tableau::STAGES - 1]; // FSAL
                current = candidate.snapshot;
                step_rejected = false;
                h = h_step * factor;

                let event = Event {
                    step: stats.accepted,
                    t,
                    h: h_step,
                    snapshot: current.clone(),
                };
                if let Some(Action::StopEarly) = observer.observe(&event) {
                    return Ok(Solution {
                        status: Status::StoppedByObserver,
                        samples: emitted,
                        stats,
                    });
                }
            }
            Some(candidate) => {
                stats.rejected += 1;
                step_rejected = true;
                h = h_step * MIN_FACTOR.max(SAFETY * candidate.err.powf(ERROR_EXPONENT));
            }
            None => {
                // A stage produced a non-finite derivative; shrink hard.
                stats.rejected += 1;
                step_rejected = true;
                h = h_step * MIN_FACTOR;
            }
        }
    }

    Ok(Solution {
        status: Status::Complete,
        samples: emitted,
        stats,
    })
}

/// Integrates an ODE problem with Dormand–Prince 5(4) without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Same as [`solve`].
pub fn solve_unobserved<const N: usize, M, P>(
    model: &M,
    problem: &P,
    initial: M::Input,
    time_span: (f64, f64),
    samples: usize,
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, initial, time_span, samples, config, ())
}

/// The outcome of one trial step whose stages all stayed finite.
struct Candidate<I, O, const N: usize> {
    y_new: [f64; N],
    err: f64,
    snapshot: Snapshot<I, O>,
}

/// Evaluates one trial step of size `h` from `(t, y)`.
///
/// On entry `k[0]` holds the derivative at `(t, y)`; on success `k` holds
/// all seven stages, the last evaluated at `(t_new, y_new)` so acceptance
/// can reuse it (FSAL). Returns `None` if any stage derivative is
/// non-finite, which the caller treats as a rejected step.
#[allow(clippy::too_many_arguments)]
fn attempt_step<const N: usize, M, P>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    t: f64,
    h: f64,
    t_new: f64,
    y: &[f64; N],
    k: &mut [[f64; N]; tableau::STAGES],
    config: &Config,
    stats: &mut Stats,
) -> Result<Option<Candidate<M::Input, M::Output, N>>, Error>
where
    M: Model,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
{
    for i in 1..tableau::STAGES - 1 {
        let mut yi = [0.0; N];
        for c in 0..N {
            let mut acc = 0.0;
            for j in 0..i {
                acc += tableau::A[i][j] * k[j][c];
            }
            yi[c] = y[c] + h * acc;
        }

        let ti = t + tableau::C[i] * h;
        let input = problem
            .build_input(&current.input, ti, yi)
            .map_err(Error::problem)?;
        let output = model.call(&input).map_err(Error::model)?;
        stats.evals += 1;
        k[i] = problem.derivative(&input, &output).map_err(Error::problem)?;
        if !is_finite(&k[i]) {
            return Ok(None);
        }
    }

    let mut y_new = [0.0; N];
    for c in 0..N {
        let mut acc = 0.0;
        for j in 0..tableau::STAGES - 1 {
            acc += tableau::B[j] * k[j][c];
        }
        y_new[c] = y[c] + h * acc;
    }

    // FSAL stage, evaluated at the advanced solution.
    let input = problem
        .build_input(&current.input, t_new, y_new)
        .map_err(Error::problem)?;
    let output = model.call(&input).map_err(Error::model)?;
    stats.evals += 1;
    let last = tableau::STAGES - 1;
    k[last] = problem.derivative(&input, &output).map_err(Error::problem)?;
    if !is_finite(&k[last]) {
        return Ok(None);
    }

    // Scaled RMS norm of the embedded error estimate.
    let mut sum = 0.0;
    for c in 0..N {
        let mut delta = 0.0;
        for j in 0..tableau::STAGES {
            delta += tableau::E[j] * k[j][c];
        }
        delta *= h;
        let scale = config.abs_tol() + config.rel_tol() * y[c].abs().max(y_new[c].abs());
        let ratio = delta / scale;
        sum += ratio * ratio;
    }
    let err = (sum / N as f64).sqrt();

    Ok(Some(Candidate {
        y_new,
        err,
        snapshot: Snapshot::new(input, output),
    }))
}

/// Selects a first step size from the scaled magnitudes of the initial
/// state and derivative, refined with one probe evaluation a short way
/// into the span.
#[allow(clippy::too_many_arguments)]
fn initial_step<const N: usize, M, P>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    y0: &[f64; N],
    f0: &[f64; N],
    t_start: f64,
    t_end: f64,
    config: &Config,
    stats: &mut Stats,
) -> Result<f64, Error>
where
    M: Model,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
{
    let span = t_end - t_start;

    let mut scale = [0.0; N];
    for c in 0..N {
        scale[c] = config.abs_tol() + y0[c].abs() * config.rel_tol();
    }

    let d0 = scaled_rms(y0, &scale);
    let d1 = scaled_rms(f0, &scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(span);

    // Probe the derivative one explicit Euler step ahead.
    let mut y1 = [0.0; N];
    for c in 0..N {
        y1[c] = y0[c] + h0 * f0[c];
    }
    let input = problem
        .build_input(&current.input, t_start + h0, y1)
        .map_err(Error::problem)?;
    let output = model.call(&input).map_err(Error::model)?;
    stats.evals += 1;
    let f1 = problem.derivative(&input, &output).map_err(Error::problem)?;
    if !is_finite(&f1) {
        return Err(Error::NonFiniteDerivative { t: t_start + h0 });
    }

    let mut diff = [0.0; N];
    for c in 0..N {
        diff[c] = f1[c] - f0[c];
    }
    let d2 = scaled_rms(&diff, &scale) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        1e-6_f64.max(h0 * 1e-3)
    } else {
        (0.01 / d1.max(d2)).powf(0.2)
    };

    Ok((100.0 * h0).min(h1).min(span))
}

/// Dense-output coefficients for one accepted step, from Hairer's
/// continuous extension of the pair.
fn dense_coefficients<const N: usize>(
    y: &[f64; N],
    y_new: &[f64; N],
    k: &[[f64; N]; tableau::STAGES],
    h: f64,
) -> [[f64; N]; 5] {
    let mut rcont = [[0.0; N]; 5];
    for c in 0..N {
        let ydiff = y_new[c] - y[c];
        let bspl = h * k[0][c] - ydiff;

        rcont[0][c] = y[c];
        rcont[1][c] = ydiff;
        rcont[2][c] = bspl;
        rcont[3][c] = ydiff - h * k[tableau::STAGES - 1][c] - bspl;

        let mut acc = 0.0;
        for j in 0..tableau::STAGES {
            acc += tableau::D[j] * k[j][c];
        }
        rcont[4][c] = h * acc;
    }
    rcont
}

/// Evaluates the dense-output interpolant at `theta` in `[0, 1]` across the
/// step. Exact at both endpoints.
fn interpolate<const N: usize>(rcont: &[[f64; N]; 5], theta: f64) -> [f64; N] {
    let theta1 = 1.0 - theta;
    let mut y = [0.0; N];
    for c in 0..N {
        y[c] = rcont[0][c]
            + theta
                * (rcont[1][c]
                    + theta1 * (rcont[2][c] + theta * (rcont[3][c] + theta1 * rcont[4][c])));
    }
    y
}

/// The uniform inclusive sample grid over the span.
fn sample_grid(t_start: f64, t_end: f64, samples: usize) -> Vec<f64> {
    let dt = (t_end - t_start) / (samples - 1) as f64;
    let mut grid: Vec<f64> = (0..samples).map(|i| t_start + i as f64 * dt).collect();
    grid[samples - 1] = t_end;
    grid
}

fn scaled_rms<const N: usize>(values: &[f64; N], scale: &[f64; N]) -> f64 {
    let mut sum = 0.0;
    for c in 0..N {
        let ratio = values[c] / scale[c];
        sum += ratio * ratio;
    }
    (sum / N as f64).sqrt()
}

fn is_finite<const N: usize>(values: &[f64; N]) -> bool {
    values.iter().all(|value| value.is_finite())
}
