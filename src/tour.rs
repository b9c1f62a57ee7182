//! Tour helpers: random permutations, validity checks and path length.
//!
//! A tour is a `Vec<usize>` holding every index of a
//! [`ProblemInstance`] exactly once, in visiting order.

use crate::geometry::{Distance, ProblemInstance};
use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly random permutation of `0..n` (Fisher-Yates).
pub fn random_tour<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (0..n).collect();
    tour.shuffle(rng);
    tour
}

/// Checks that `tour` visits every index of `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

/// Length of the open path through `tour`.
///
/// Sums the `n - 1` edges between consecutive cities. The edge from the last
/// city back to the first is not counted.
///
/// # Panics
///
/// Panics if `tour` holds an index outside `instance`.
pub fn path_length<D: Distance + ?Sized>(
    instance: &ProblemInstance,
    tour: &[usize],
    distance: &D,
) -> f64 {
    tour.windows(2)
        .map(|w| distance.distance(instance.point(w[0]), instance.point(w[1])))
        .sum()
}
