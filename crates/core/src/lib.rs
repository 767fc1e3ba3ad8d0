//! Core traits and types for the Cascade simulation framework.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! models build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control
//!   actions
//! - [`OdeProblem`]: adapts solver state vectors to model inputs and extracts
//!   derivatives from outputs

mod model;
mod observer;
mod problems;

pub use model::{Model, Snapshot};
pub use observer::Observer;
pub use problems::OdeProblem;
