//! Cooling schedule and Metropolis acceptance.

/// Geometric interpolation between a start and end temperature:
/// `T(k) = T_start * (T_end / T_start)^(k / k_max)`.
///
/// Every step cools by the same ratio, independent of the absolute
/// temperature scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricSchedule {
    start: f64,
    end: f64,
    k_max: usize,
}

impl GeometricSchedule {
    pub fn new(start: f64, end: f64, k_max: usize) -> Self {
        Self { start, end, k_max }
    }

    /// Temperature at iteration `k`.
    ///
    /// With `k_max == 0` the schedule has no steps and stays at `start`.
    pub fn temperature_at(&self, k: usize) -> f64 {
        if self.k_max == 0 {
            return self.start;
        }
        let ex = k as f64 / self.k_max as f64;
        self.start * (self.end / self.start).powf(ex)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

/// Probability of accepting a move from `current` to a score of `trial`
/// that is not an improvement: `exp(-|trial - current| / temperature)`.
pub fn acceptance_probability(current: f64, trial: f64, temperature: f64) -> f64 {
    (-(trial - current).abs() / temperature).exp()
}

/// Metropolis rule. Improvements always pass; otherwise the move passes
/// when its acceptance probability exceeds the uniform draw `u` in `[0, 1)`.
pub fn metropolis_accepts(current: f64, trial: f64, temperature: f64, u: f64) -> bool {
    trial < current || acceptance_probability(current, trial, temperature) > u
}
