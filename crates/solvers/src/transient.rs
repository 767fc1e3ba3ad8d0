//! Transient solvers integrate ODE problems forward in time.

pub mod dopri;
