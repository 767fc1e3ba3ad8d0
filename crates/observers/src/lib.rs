//! Reusable observers for the Cascade simulation framework.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with the solvers in the Cascade ecosystem.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-solver observers
//!   ([`HasTime`], [`HasStepSize`], [`CanStopEarly`])
//!
//! # Features
//!
//! - `plot`: enables [`PlotObserver`] for visualizing solver behavior via egui.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`Observer`]: cascade_core::Observer
//! [`HasTime`]: traits::HasTime
//! [`HasStepSize`]: traits::HasStepSize
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

#[cfg(feature = "plot")]
mod plot;

#[cfg(feature = "plot")]
pub use plot::{PlotObserver, ShowConfig};
