//! Driving loop: step an [`Annealer`] to completion and report progress.

use crate::anneal::{AnnealConfig, AnnealSolution, AnnealStatus, Annealer};
use crate::error::Result;
use crate::geometry::ProblemInstance;

/// Anneals `instance` with a Euclidean metric and returns the best tour.
///
/// Progress is logged at `debug` level after every temperature step.
pub fn solve(instance: ProblemInstance, config: &AnnealConfig) -> Result<AnnealSolution> {
    solve_with_observer(instance, config, |_| {})
}

/// Like [`solve`], calling `observer` with a status snapshot after each
/// step.
pub fn solve_with_observer<F>(
    instance: ProblemInstance,
    config: &AnnealConfig,
    mut observer: F,
) -> Result<AnnealSolution>
where
    F: FnMut(&AnnealStatus),
{
    let n = instance.len();
    let mut annealer = Annealer::new(config.clone())?;
    annealer.prepare(instance)?;

    log::debug!(
        "anneal: n={n} k_max={} cycles={} t_start={} t_end={} initial_score={:.4}",
        config.k_max,
        config.cycles,
        config.start_temperature,
        config.end_temperature,
        annealer.best_score()
    );

    while !annealer.is_done() {
        annealer.step()?;
        let status = annealer.status();
        log::debug!(
            "Iteration #{}, Best Score={},{}",
            status.k,
            status.best_score,
            status
        );
        observer(&status);
    }

    let solution = annealer.solution();
    log::info!(
        "anneal: n={n} best_score={:.4} iterations={} trials={} accepted={} improving={}",
        solution.score,
        solution.iterations,
        solution.trials,
        solution.accepted_moves,
        solution.improving_moves
    );
    Ok(solution)
}
