//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasTime`]: events that report the simulation time
//! - [`HasStepSize`]: events that report the step size taken
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use cascade_core::Observer;
//! use cascade_observers::traits::{CanStopEarly, HasTime};
//!
//! struct StopAt {
//!     t_stop: f64,
//! }
//!
//! impl<E: HasTime, A: CanStopEarly> Observer<E, A> for StopAt {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         if event.time() >= self.t_stop {
//!             return Some(A::stop_early());
//!         }
//!         None
//!     }
//! }
//! ```

use cascade_solvers::transient::dopri;

/// An event that reports the simulation time.
pub trait HasTime {
    /// Returns the time this event was emitted at.
    fn time(&self) -> f64;
}

/// An event that reports the step size taken.
pub trait HasStepSize {
    /// Returns the step size that produced this event.
    ///
    /// Returns zero for events that report an initial condition rather than a
    /// completed step.
    fn step_size(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasTime and HasStepSize for dopri::Event ---

impl<I, O> HasTime for dopri::Event<I, O> {
    fn time(&self) -> f64 {
        self.t
    }
}

impl<I, O> HasStepSize for dopri::Event<I, O> {
    fn step_size(&self) -> f64 {
        self.h
    }
}

// --- CanStopEarly for dopri::Action ---

impl CanStopEarly for dopri::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
