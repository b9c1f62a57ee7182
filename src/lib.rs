//! Simulated annealing for the Euclidean Traveling Salesman Problem.
//!
//! The [`Annealer`] starts from a random tour and repeatedly swaps two
//! cities, keeping or undoing each swap by the Metropolis rule under a
//! geometric cooling schedule. The best tour ever seen is tracked
//! separately from the current one.
//!
//! - [`geometry`]: points, the [`Distance`] trait and [`ProblemInstance`].
//! - [`tour`]: permutation helpers and open-path length.
//! - [`anneal`]: configuration, cooling schedule and the annealer itself.
//! - [`solve`]: a driving loop that logs progress through the `log` facade.
//! - `restart` (feature `parallel`): independent multi-seed runs on rayon.
//!
//! # Objective
//!
//! Tours are scored as **open paths**: the sum of the `n - 1` edges between
//! consecutive cities, without the edge back to the start.
//!
//! # Example
//!
//! ```
//! use tsp_anneal::{solve, AnnealConfig, ProblemInstance};
//!
//! let square = ProblemInstance::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])?;
//! let solution = solve(square, &AnnealConfig::new(50, 10.0, 0.1).with_seed(42))?;
//! assert!(solution.score <= 35.0);
//! # Ok::<(), tsp_anneal::AnnealError>(())
//! ```

pub mod anneal;
pub mod error;
pub mod geometry;
#[cfg(feature = "parallel")]
pub mod restart;
pub mod solve;
pub mod tour;

pub use anneal::{AnnealConfig, AnnealSolution, AnnealStatus, Annealer, GeometricSchedule};
pub use error::{AnnealError, Result};
pub use geometry::{Distance, Euclidean, ProblemInstance};
#[cfg(feature = "parallel")]
pub use restart::solve_multi_seed;
pub use solve::{solve, solve_with_observer};
