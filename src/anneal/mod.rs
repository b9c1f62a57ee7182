//! Simulated Annealing for tours.
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Worse tours are accepted with a probability that
//! shrinks as the temperature falls, letting the search escape local optima
//! early and settle later.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod annealer;
mod config;
mod schedule;

pub use annealer::{AnnealSolution, AnnealStatus, Annealer};
pub use config::AnnealConfig;
pub use schedule::{acceptance_probability, metropolis_accepts, GeometricSchedule};
