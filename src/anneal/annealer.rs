//! The annealing state machine.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::AnnealConfig;
use super::schedule::{acceptance_probability, metropolis_accepts, GeometricSchedule};
use crate::error::{AnnealError, Result};
use crate::geometry::{Distance, Euclidean, ProblemInstance};
use crate::tour::{path_length, random_tour};

/// Read-only progress snapshot, meant to be polled after each
/// [`Annealer::step`].
///
/// `Display` renders `k=..,kMax=..,t=..,prob=..`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealStatus {
    pub k: usize,
    pub k_max: usize,
    pub temperature: f64,
    /// Acceptance probability of the most recent non-improving trial.
    pub last_probability: f64,
    pub best_score: f64,
    pub current_score: f64,
}

impl fmt::Display for AnnealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k={},kMax={},t={},prob={}",
            self.k, self.k_max, self.temperature, self.last_probability
        )
    }
}

/// Outcome of a run, detached from the annealer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealSolution {
    /// Best tour found.
    pub tour: Vec<usize>,

    /// Open-path length of `tour`.
    pub score: f64,

    /// Temperature steps executed.
    pub iterations: usize,

    /// Trial moves evaluated.
    pub trials: usize,

    /// Accepted moves, improving ones included.
    pub accepted_moves: usize,

    /// Moves that strictly lowered the current score.
    pub improving_moves: usize,

    /// Temperature of the last executed step.
    pub final_temperature: f64,
}

/// What happened to a single trial move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trial {
    Improved,
    AcceptedWorse,
    Rejected,
}

/// Simulated annealing over tours of a [`ProblemInstance`].
///
/// The annealer owns the current and best tours. Each [`step`](Self::step)
/// lowers the temperature along a [`GeometricSchedule`] and runs
/// `cycles` 2-swap trials, keeping or undoing each one by the Metropolis
/// rule. The objective is the open-path length (no closing edge).
///
/// Stepping a finished run returns [`AnnealError::AlreadyTerminated`] rather
/// than silently doing nothing.
///
/// # Examples
///
/// ```
/// use tsp_anneal::{Annealer, AnnealConfig, ProblemInstance};
///
/// let instance = ProblemInstance::circle(12, 10.0).unwrap();
/// let mut annealer = Annealer::new(AnnealConfig::new(20, 10.0, 0.5).with_seed(1)).unwrap();
/// annealer.prepare(instance).unwrap();
/// while !annealer.is_done() {
///     annealer.step().unwrap();
/// }
/// assert_eq!(annealer.best_tour().len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct Annealer<R = StdRng, D = Euclidean> {
    config: AnnealConfig,
    schedule: GeometricSchedule,
    rng: R,
    distance: D,
    instance: Option<ProblemInstance>,
    current: Vec<usize>,
    best: Vec<usize>,
    current_score: f64,
    best_score: f64,
    k: usize,
    temperature: f64,
    last_probability: f64,
    trials: usize,
    accepted_moves: usize,
    improving_moves: usize,
}

impl Annealer<StdRng, Euclidean> {
    /// Euclidean annealer with a seeded [`StdRng`]. Uses `config.seed`, or a
    /// fresh random seed when unset.
    pub fn new(config: AnnealConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::from_parts(config, StdRng::seed_from_u64(seed), Euclidean)
    }

    /// Shorthand for [`Annealer::new`] with default cycles and no seed.
    pub fn configure(k_max: usize, start_temperature: f64, end_temperature: f64) -> Result<Self> {
        Self::new(AnnealConfig::new(k_max, start_temperature, end_temperature))
    }
}

impl<R: Rng, D: Distance> Annealer<R, D> {
    /// Builds an annealer around caller-supplied randomness and metric.
    ///
    /// `config.seed` is ignored here; seed `rng` directly.
    pub fn from_parts(config: AnnealConfig, rng: R, distance: D) -> Result<Self> {
        config.validate()?;
        let schedule = GeometricSchedule::new(
            config.start_temperature,
            config.end_temperature,
            config.k_max,
        );
        Ok(Self {
            temperature: config.start_temperature,
            config,
            schedule,
            rng,
            distance,
            instance: None,
            current: Vec::new(),
            best: Vec::new(),
            current_score: f64::INFINITY,
            best_score: f64::INFINITY,
            k: 0,
            last_probability: 0.0,
            trials: 0,
            accepted_moves: 0,
            improving_moves: 0,
        })
    }

    /// Loads `instance` and starts a fresh run from a random tour.
    ///
    /// Calling this again discards all progress of the previous run.
    pub fn prepare(&mut self, instance: ProblemInstance) -> Result<()> {
        if instance.len() < 2 {
            return Err(AnnealError::DegenerateInstance {
                points: instance.len(),
            });
        }

        self.current = random_tour(instance.len(), &mut self.rng);
        self.current_score = path_length(&instance, &self.current, &self.distance);
        self.best.clone_from(&self.current);
        self.best_score = self.current_score;
        self.instance = Some(instance);

        self.k = 0;
        self.temperature = self.schedule.temperature_at(0);
        self.last_probability = 0.0;
        self.trials = 0;
        self.accepted_moves = 0;
        self.improving_moves = 0;
        Ok(())
    }

    /// Advances one temperature step and runs `cycles` trials at it.
    pub fn step(&mut self) -> Result<()> {
        if self.instance.is_none() {
            return Err(AnnealError::NotPrepared);
        }
        if self.is_done() {
            return Err(AnnealError::AlreadyTerminated {
                k_max: self.config.k_max,
            });
        }

        self.k += 1;
        self.temperature = self.schedule.temperature_at(self.k);

        for _ in 0..self.config.cycles {
            self.trial();
        }
        Ok(())
    }

    /// One perturb-evaluate-decide cycle. Rejected swaps are undone by
    /// swapping the same two positions again.
    ///
    /// Returns the outcome and the swapped positions.
    fn trial(&mut self) -> (Trial, (usize, usize)) {
        let (pt1, pt2) = self.move_to_neighbor();
        let trial_score = self.score_current();
        self.trials += 1;

        let outcome = if trial_score < self.current_score {
            Trial::Improved
        } else {
            // Only non-improving trials draw randomness or update the probability
            self.last_probability =
                acceptance_probability(self.current_score, trial_score, self.temperature);
            let u = self.rng.random::<f64>();
            if metropolis_accepts(self.current_score, trial_score, self.temperature, u) {
                Trial::AcceptedWorse
            } else {
                Trial::Rejected
            }
        };

        match outcome {
            Trial::Improved | Trial::AcceptedWorse => {
                self.current_score = trial_score;
                self.accepted_moves += 1;
                if outcome == Trial::Improved {
                    self.improving_moves += 1;
                }
                if trial_score < self.best_score {
                    self.best_score = trial_score;
                    self.best.copy_from_slice(&self.current);
                }
            }
            Trial::Rejected => self.current.swap(pt1, pt2),
        }
        (outcome, (pt1, pt2))
    }

    /// Swaps two distinct, uniformly chosen tour positions in place and
    /// returns them.
    fn move_to_neighbor(&mut self) -> (usize, usize) {
        let n = self.current.len();
        let pt1 = self.rng.random_range(0..n);
        let mut pt2 = self.rng.random_range(0..n);
        while pt2 == pt1 {
            pt2 = self.rng.random_range(0..n);
        }
        self.current.swap(pt1, pt2);
        (pt1, pt2)
    }

    fn score_current(&self) -> f64 {
        self.evaluate(&self.current)
    }

    /// Open-path length of `tour` over the prepared instance.
    ///
    /// Returns 0 before [`prepare`](Self::prepare).
    ///
    /// # Panics
    ///
    /// Panics if `tour` holds an index outside the prepared instance.
    pub fn evaluate(&self, tour: &[usize]) -> f64 {
        match &self.instance {
            Some(instance) => path_length(instance, tour, &self.distance),
            None => 0.0,
        }
    }

    /// Temperature the schedule assigns to iteration `k`.
    pub fn temperature_at(&self, k: usize) -> f64 {
        self.schedule.temperature_at(k)
    }

    /// True once `k_max` steps have run. Also true right after preparing a
    /// `k_max == 0` run.
    pub fn is_done(&self) -> bool {
        self.k >= self.config.k_max
    }

    /// Number of temperature steps executed so far.
    pub fn current_iteration(&self) -> usize {
        self.k
    }

    /// Total number of temperature steps in the run.
    pub fn k_max(&self) -> usize {
        self.config.k_max
    }

    /// Best score so far; `+inf` before [`prepare`](Self::prepare).
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Lowest-score tour seen so far.
    pub fn best_tour(&self) -> &[usize] {
        &self.best
    }

    /// Score of the tour the search currently sits on.
    pub fn current_score(&self) -> f64 {
        self.current_score
    }

    /// Tour the search currently sits on.
    pub fn current_tour(&self) -> &[usize] {
        &self.current
    }

    /// Temperature of the current step.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Acceptance probability of the most recent non-improving trial.
    pub fn last_probability(&self) -> f64 {
        self.last_probability
    }

    /// Configuration the annealer was built with.
    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Prepared instance, if any.
    pub fn instance(&self) -> Option<&ProblemInstance> {
        self.instance.as_ref()
    }

    /// Progress snapshot for an external reporter.
    pub fn status(&self) -> AnnealStatus {
        AnnealStatus {
            k: self.k,
            k_max: self.config.k_max,
            temperature: self.temperature,
            last_probability: self.last_probability,
            best_score: self.best_score,
            current_score: self.current_score,
        }
    }

    /// Copies out the best tour and run counters.
    pub fn solution(&self) -> AnnealSolution {
        AnnealSolution {
            tour: self.best.clone(),
            score: self.best_score,
            iterations: self.k,
            trials: self.trials,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            final_temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::is_permutation;

    fn square() -> ProblemInstance {
        ProblemInstance::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap()
    }

    fn seeded(config: AnnealConfig, seed: u64) -> Annealer {
        Annealer::from_parts(config, StdRng::seed_from_u64(seed), Euclidean).unwrap()
    }

    #[test]
    fn test_configure_rejects_bad_temperatures() {
        assert!(matches!(
            Annealer::configure(10, 1.0, 5.0),
            Err(AnnealError::InvalidConfiguration(_))
        ));
        assert!(Annealer::configure(10, -1.0, -5.0).is_err());
        assert!(Annealer::configure(10, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_fresh_annealer_state() {
        let annealer = Annealer::configure(10, 10.0, 1.0).unwrap();
        assert_eq!(annealer.current_iteration(), 0);
        assert_eq!(annealer.best_score(), f64::INFINITY);
        assert!(annealer.best_tour().is_empty());
        assert!(annealer.instance().is_none());
    }

    #[test]
    fn test_step_before_prepare() {
        let mut annealer = Annealer::configure(10, 10.0, 1.0).unwrap();
        assert_eq!(annealer.step(), Err(AnnealError::NotPrepared));
    }

    #[test]
    fn test_prepare_degenerate() {
        let mut annealer = Annealer::configure(10, 10.0, 1.0).unwrap();
        let single = ProblemInstance::from_xy(&[(1.0, 2.0)]).unwrap();
        assert_eq!(
            annealer.prepare(single),
            Err(AnnealError::DegenerateInstance { points: 1 })
        );
        let empty = ProblemInstance::new(Vec::new()).unwrap();
        assert_eq!(
            annealer.prepare(empty),
            Err(AnnealError::DegenerateInstance { points: 0 })
        );
    }

    #[test]
    fn test_prepare_initial_state() {
        let mut annealer = seeded(AnnealConfig::new(10, 10.0, 1.0), 42);
        annealer.prepare(square()).unwrap();

        assert!(is_permutation(annealer.current_tour(), 4));
        assert_eq!(annealer.best_tour(), annealer.current_tour());
        assert_eq!(annealer.best_score(), annealer.current_score());
        let expected = annealer.evaluate(annealer.current_tour());
        assert_eq!(annealer.current_score(), expected);
        assert_eq!(annealer.current_iteration(), 0);
        assert_eq!(annealer.temperature(), 10.0);
    }

    #[test]
    fn test_two_point_instance() {
        let instance = ProblemInstance::from_xy(&[(0.0, 0.0), (3.0, 4.0)]).unwrap();
        let mut annealer = seeded(AnnealConfig::new(5, 10.0, 1.0), 3);
        annealer.prepare(instance).unwrap();
        while !annealer.is_done() {
            annealer.step().unwrap();
        }
        assert!((annealer.best_score() - 5.0).abs() < 1e-12);
        assert!(is_permutation(annealer.best_tour(), 2));
    }

    #[test]
    fn test_step_advances_and_cools() {
        let mut annealer = seeded(AnnealConfig::new(10, 10.0, 1.0), 7);
        annealer.prepare(square()).unwrap();
        annealer.step().unwrap();
        assert_eq!(annealer.current_iteration(), 1);
        assert!((annealer.temperature() - annealer.temperature_at(1)).abs() < 1e-12);
        assert_eq!(annealer.solution().trials, 100);
    }

    #[test]
    fn test_step_after_done() {
        let mut annealer = seeded(AnnealConfig::new(2, 10.0, 1.0).with_cycles(5), 7);
        annealer.prepare(square()).unwrap();
        annealer.step().unwrap();
        annealer.step().unwrap();
        assert!(annealer.is_done());

        let before = annealer.solution();
        assert_eq!(
            annealer.step(),
            Err(AnnealError::AlreadyTerminated { k_max: 2 })
        );
        assert_eq!(annealer.solution(), before);
        assert_eq!(annealer.current_iteration(), 2);
    }

    #[test]
    fn test_zero_k_max_done_after_prepare() {
        let mut annealer = seeded(AnnealConfig::new(0, 10.0, 1.0), 11);
        annealer.prepare(square()).unwrap();
        assert!(annealer.is_done());
        assert_eq!(annealer.best_tour(), annealer.current_tour());

        let solution = annealer.solution();
        assert_eq!(solution.trials, 0);
        assert_eq!(solution.iterations, 0);
        assert!(annealer.step().is_err());
    }

    #[test]
    fn test_move_to_neighbor_swaps_distinct() {
        let mut annealer = seeded(AnnealConfig::default(), 5);
        annealer.prepare(ProblemInstance::circle(10, 10.0).unwrap()).unwrap();
        for _ in 0..200 {
            let before = annealer.current_tour().to_vec();
            let (a, b) = annealer.move_to_neighbor();
            assert_ne!(a, b);
            let after = annealer.current_tour();
            assert_eq!(after[a], before[b]);
            assert_eq!(after[b], before[a]);
            let changed = before.iter().zip(after).filter(|(x, y)| x != y).count();
            assert_eq!(changed, 2);
        }
    }

    #[test]
    fn test_rejected_trial_restores_tour() {
        let mut annealer = seeded(AnnealConfig::new(10, 1.0, 1e-6), 21);
        annealer.prepare(ProblemInstance::circle(20, 100.0).unwrap()).unwrap();
        // Freeze the search so worsening moves are almost always rejected
        annealer.temperature = 1e-9;

        let mut rejected = 0;
        for _ in 0..500 {
            let before = annealer.current_tour().to_vec();
            let score_before = annealer.current_score();
            if annealer.trial().0 == Trial::Rejected {
                rejected += 1;
                assert_eq!(annealer.current_tour(), before.as_slice());
                assert_eq!(annealer.current_score(), score_before);
            }
        }
        assert!(rejected > 0);
    }

    #[test]
    fn test_improving_swap_always_kept() {
        for (seed, temperature) in [(8, 1e-9), (9, 1.0), (10, 50.0)] {
            let mut annealer = seeded(AnnealConfig::new(10, 100.0, 1e-6), seed);
            annealer.prepare(ProblemInstance::circle(12, 100.0).unwrap()).unwrap();
            annealer.temperature = temperature;

            let mut improved = 0;
            for _ in 0..300 {
                let before = annealer.current_tour().to_vec();
                let score_before = annealer.current_score();
                let (outcome, (a, b)) = annealer.trial();

                let mut swapped = before.clone();
                swapped.swap(a, b);
                let swapped_score = annealer.evaluate(&swapped);
                if swapped_score < score_before {
                    improved += 1;
                    assert_eq!(outcome, Trial::Improved);
                    assert_eq!(annealer.current_tour(), swapped.as_slice());
                    assert_eq!(annealer.current_score(), swapped_score);
                }
            }
            assert!(improved > 0, "no improving swap at T={temperature}");
        }
    }

    #[test]
    fn test_rejected_swap_was_not_improving() {
        for (seed, temperature) in [(31, 1e-9), (32, 0.5), (33, 5.0)] {
            let mut annealer = seeded(AnnealConfig::new(10, 100.0, 1e-6), seed);
            annealer.prepare(ProblemInstance::circle(20, 100.0).unwrap()).unwrap();
            annealer.temperature = temperature;

            for _ in 0..400 {
                let (outcome, (a, b)) = annealer.trial();
                if outcome == Trial::Rejected {
                    let mut swapped = annealer.current_tour().to_vec();
                    swapped.swap(a, b);
                    assert!(annealer.evaluate(&swapped) >= annealer.current_score());
                }
            }
        }
    }

    #[test]
    fn test_last_probability_matches_rejected_trial() {
        let mut annealer = seeded(AnnealConfig::new(10, 100.0, 1e-6), 12);
        annealer.prepare(ProblemInstance::circle(16, 100.0).unwrap()).unwrap();
        annealer.temperature = 2.0;

        for _ in 0..200 {
            let (outcome, (a, b)) = annealer.trial();
            if outcome == Trial::Rejected {
                let mut swapped = annealer.current_tour().to_vec();
                swapped.swap(a, b);
                let expected = acceptance_probability(
                    annealer.current_score(),
                    annealer.evaluate(&swapped),
                    annealer.temperature(),
                );
                assert!((annealer.last_probability() - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_evaluate_before_prepare_is_zero() {
        let annealer = Annealer::configure(10, 10.0, 1.0).unwrap();
        assert_eq!(annealer.evaluate(&[0, 1, 2]), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_evaluate_out_of_range_panics() {
        let mut annealer = seeded(AnnealConfig::new(10, 10.0, 1.0), 2);
        annealer.prepare(ProblemInstance::from_xy(&[(0.0, 0.0), (3.0, 4.0)]).unwrap()).unwrap();
        annealer.evaluate(&[0, 5]);
    }

    #[test]
    fn test_best_score_monotone() {
        let mut annealer = seeded(AnnealConfig::new(40, 50.0, 0.01), 99);
        annealer.prepare(ProblemInstance::circle(30, 10.0).unwrap()).unwrap();
        let mut previous = annealer.best_score();
        while !annealer.is_done() {
            annealer.step().unwrap();
            assert!(annealer.best_score() <= previous);
            assert!(is_permutation(annealer.current_tour(), 30));
            previous = annealer.best_score();
        }
    }

    #[test]
    fn test_best_tour_matches_best_score() {
        let mut annealer = seeded(AnnealConfig::new(30, 10.0, 0.1), 4);
        annealer.prepare(ProblemInstance::circle(15, 10.0).unwrap()).unwrap();
        while !annealer.is_done() {
            annealer.step().unwrap();
        }
        let rescored = annealer.evaluate(annealer.best_tour());
        assert!((rescored - annealer.best_score()).abs() < 1e-9);
    }

    #[test]
    fn test_square_scenario() {
        let mut annealer = seeded(AnnealConfig::new(50, 10.0, 0.1), 42);
        annealer.prepare(square()).unwrap();
        while !annealer.is_done() {
            annealer.step().unwrap();
        }
        assert!(
            annealer.best_score() <= 35.0,
            "expected open path <= 35, got {}",
            annealer.best_score()
        );
        assert!(is_permutation(annealer.best_tour(), 4));
        // Perimeter order minus one side is optimal for the open path
        assert!((annealer.best_score() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_seed_reproducible() {
        let run = |seed| {
            let mut annealer = Annealer::new(AnnealConfig::new(20, 10.0, 0.1).with_seed(seed)).unwrap();
            annealer.prepare(ProblemInstance::circle(20, 10.0).unwrap()).unwrap();
            while !annealer.is_done() {
                annealer.step().unwrap();
            }
            annealer.solution()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_prepare_resets_run() {
        let mut annealer = seeded(AnnealConfig::new(3, 10.0, 1.0), 13);
        annealer.prepare(square()).unwrap();
        while !annealer.is_done() {
            annealer.step().unwrap();
        }
        annealer.prepare(ProblemInstance::circle(8, 10.0).unwrap()).unwrap();
        assert_eq!(annealer.current_iteration(), 0);
        assert!(!annealer.is_done());
        assert_eq!(annealer.best_tour().len(), 8);
        assert_eq!(annealer.solution().trials, 0);
    }

    #[test]
    fn test_high_temperature_accepts_most() {
        let mut annealer = seeded(AnnealConfig::new(5, 1e8, 1e7), 17);
        annealer.prepare(ProblemInstance::circle(20, 10.0).unwrap()).unwrap();
        while !annealer.is_done() {
            annealer.step().unwrap();
        }
        let solution = annealer.solution();
        let ratio = solution.accepted_moves as f64 / solution.trials as f64;
        assert!(ratio > 0.95, "expected near-total acceptance, got {ratio}");
        assert!(annealer.last_probability() > 0.99);
    }

    #[test]
    fn test_status_display() {
        let mut annealer = seeded(AnnealConfig::new(4, 8.0, 1.0), 1);
        annealer.prepare(square()).unwrap();
        annealer.step().unwrap();
        let status = annealer.status();
        assert_eq!(status.k, 1);
        assert_eq!(status.k_max, 4);
        let text = status.to_string();
        assert!(text.starts_with("k=1,kMax=4,t="), "{text}");
        assert!(text.contains(",prob="));
    }

    struct Manhattan;

    impl Distance for Manhattan {
        fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
            a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
        }
    }

    #[test]
    fn test_custom_distance() {
        let instance = ProblemInstance::from_xy(&[(0.0, 0.0), (3.0, 4.0)]).unwrap();
        let mut annealer = Annealer::from_parts(
            AnnealConfig::new(1, 2.0, 1.0),
            StdRng::seed_from_u64(0),
            Manhattan,
        )
        .unwrap();
        annealer.prepare(instance).unwrap();
        assert!((annealer.best_score() - 7.0).abs() < 1e-12);
    }
}
