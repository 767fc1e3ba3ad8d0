//! Numerical solvers for the Cascade simulation framework.
//!
//! Solvers drive [`Model`](cascade_core::Model) implementations through
//! problem traits defined in `cascade-core`, emitting events to an
//! [`Observer`](cascade_core::Observer) as they work.
//!
//! # Modules
//!
//! - [`transient`]: time integration of ODE problems
//!   ([`transient::dopri`], an adaptive Dormand–Prince 5(4) method)

pub mod transient;
