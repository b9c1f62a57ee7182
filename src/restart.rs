//! Independent multi-seed restarts on the rayon thread pool.
//!
//! Every seed gets its own [`Annealer`](crate::Annealer); runs share nothing
//! and each one stays single-threaded.

use rayon::prelude::*;

use crate::anneal::{AnnealConfig, AnnealSolution};
use crate::error::{AnnealError, Result};
use crate::geometry::ProblemInstance;
use crate::solve::solve;

/// Runs one annealing pass per seed in parallel and keeps the lowest score.
///
/// Ties go to the earliest seed in `seeds`, so the result does not depend
/// on thread scheduling. `config.seed` is overridden per run.
pub fn solve_multi_seed(
    instance: &ProblemInstance,
    config: &AnnealConfig,
    seeds: &[u64],
) -> Result<AnnealSolution> {
    if seeds.is_empty() {
        return Err(AnnealError::invalid_configuration(
            "at least one seed is required",
        ));
    }
    config.validate()?;

    let solutions: Vec<AnnealSolution> = seeds
        .par_iter()
        .map(|&seed| solve(instance.clone(), &config.clone().with_seed(seed)))
        .collect::<Result<_>>()?;

    let (best_index, best) = solutions
        .into_iter()
        .enumerate()
        .reduce(|best, candidate| {
            if candidate.1.score < best.1.score {
                candidate
            } else {
                best
            }
        })
        .ok_or_else(|| AnnealError::invalid_configuration("no runs completed"))?;

    log::info!(
        "multi-seed: runs={} best_seed={} best_score={:.4}",
        seeds.len(),
        seeds[best_index],
        best.score
    );
    Ok(best)
}
