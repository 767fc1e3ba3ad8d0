//! Interactive visualizations of the backstepping simulation.
//!
//! Each mode runs the closed-loop plant from (1, -1) over ten seconds and
//! opens an interactive plot window showing a different view of the run.
//!
//! # Usage
//!
//! ```text
//! cargo run --example plot --features plot -- states
//! cargo run --example plot --features plot -- control
//! cargo run --example plot --features plot -- steps
//! cargo run --example plot --features plot -- states 20
//! ```
//!
//! # Modes
//!
//! - **states [gain]**: Both state trajectories. With the default gain of 5
//!   they settle to the origin without leaving (-2, 2).
//!
//! - **control [gain]**: The control input over the same run. The initial
//!   transient shows the law working against the nonlinear coupling before
//!   both states decay.
//!
//! - **steps [gain]**: Accepted step sizes on a log scale. The integrator
//!   starts cautiously, then grows the step as the dynamics flatten out.

use std::error::Error;

use cascade_models::{Backstepping, Config, Dynamics, Input, Output, State, simulate};
use cascade_observers::{PlotObserver, ShowConfig};
use cascade_solvers::transient::dopri;

fn main() -> Result<(), Box<dyn Error>> {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "states".into());
    let gain = std::env::args()
        .nth(2)
        .as_deref()
        .map(str::parse::<f64>)
        .transpose()
        .unwrap_or_else(|_| {
            eprintln!("Invalid gain: expected a number, e.g. 5");
            std::process::exit(1);
        })
        .unwrap_or(5.0);

    match mode.as_str() {
        "states" => states(gain),
        "control" => control(gain),
        "steps" => steps(gain),
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: plot [states|control|steps] [gain]");
            std::process::exit(1);
        }
    }
}

// --- States ------------------------------------------------------------------

/// Plot both state trajectories against time.
fn states(gain: f64) -> Result<(), Box<dyn Error>> {
    let config = Config {
        gain,
        ..Config::default()
    };
    let trajectory = simulate(&config)?.trajectory;

    let mut obs = PlotObserver::<2>::new(["x₁", "x₂"]);
    for i in 0..trajectory.len() {
        obs.record(
            trajectory.time[i],
            [Some(trajectory.x1[i]), Some(trajectory.x2[i])],
        );
    }

    obs.show(
        ShowConfig::new()
            .title(format!("Backstepping: states from (1, -1), k = {gain}"))
            .x_label("t [s]")
            .legend(),
    )?;

    Ok(())
}

// --- Control -----------------------------------------------------------------

/// Plot the control input against time.
fn control(gain: f64) -> Result<(), Box<dyn Error>> {
    let config = Config {
        gain,
        ..Config::default()
    };
    let trajectory = simulate(&config)?.trajectory;

    let mut obs = PlotObserver::<1>::new(["u"]);
    for i in 0..trajectory.len() {
        obs.record(trajectory.time[i], [Some(trajectory.control[i])]);
    }

    obs.show(
        ShowConfig::new()
            .title(format!(
                "Backstepping: control u = −k·(x₁ + x₂) − x₁²·x₂, k = {gain}"
            ))
            .x_label("t [s]"),
    )?;

    Ok(())
}

// --- Steps -------------------------------------------------------------------

/// Plot the accepted step sizes on a log scale.
///
/// Drives the solver directly instead of going through [`simulate`], since
/// step sizes are solver events rather than part of the sampled trajectory.
fn steps(gain: f64) -> Result<(), Box<dyn Error>> {
    let model = Backstepping::new(gain)?;
    let initial = Input {
        t: 0.0,
        state: State { x1: 1.0, x2: -1.0 },
    };

    let mut obs = PlotObserver::<1>::new(["Step size"]);
    dopri::solve(
        &model,
        &Dynamics,
        initial,
        (0.0, 10.0),
        300,
        &dopri::Config::default(),
        |event: &dopri::Event<Input, Output>| {
            // The initial event reports a step size of zero; skip it.
            if event.step > 0 {
                obs.record(event.t, [Some(event.h)]);
            }
            None
        },
    )?;

    obs.show(
        ShowConfig::new()
            .title(format!("Adaptive step sizes accepted by dopri, k = {gain}"))
            .x_label("t [s]")
            .log_y(),
    )?;

    Ok(())
}
