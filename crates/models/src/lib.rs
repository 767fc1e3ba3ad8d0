//! System models for the Cascade simulation framework.
//!
//! The crate currently provides one plant: a two-state nonlinear system
//! stabilized by a backstepping control law, together with a configured
//! simulation driver that integrates it and reports sampled trajectories.
//!
//! # Modules
//!
//! - [`backstepping`]: the plant model and its ODE problem wiring
//! - [`simulation`]: run configuration, the trajectory type, and
//!   [`simulate`](simulation::simulate)

pub mod backstepping;
pub mod simulation;

pub use backstepping::{Backstepping, Dynamics, Input, Output, State};
pub use simulation::{Config, Solution, Trajectory, simulate};
