//! Annealer configuration.

use crate::error::{AnnealError, Result};

/// Configuration for a simulated annealing run.
///
/// Temperature follows a geometric schedule from `start_temperature` at
/// iteration 0 down to `end_temperature` at iteration `k_max`. Each
/// iteration runs `cycles` trial moves at a fixed temperature.
///
/// # Examples
///
/// ```
/// use tsp_anneal::AnnealConfig;
///
/// let config = AnnealConfig::new(100, 10.0, 2.0)
///     .with_cycles(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.cycles, 200);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealConfig {
    /// Number of temperature steps (outer iterations).
    ///
    /// Zero is accepted: the run is done as soon as it is prepared and only
    /// the initial random tour is scored.
    pub k_max: usize,

    /// Temperature at iteration 0. Must be positive and finite.
    pub start_temperature: f64,

    /// Temperature at iteration `k_max`. Must be positive and strictly below
    /// `start_temperature`.
    pub end_temperature: f64,

    /// Trial moves per temperature step.
    pub cycles: usize,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            k_max: 100,
            start_temperature: 10.0,
            end_temperature: 2.0,
            cycles: 100,
            seed: None,
        }
    }
}

impl AnnealConfig {
    /// Creates a configuration with default cycles and no seed.
    pub fn new(k_max: usize, start_temperature: f64, end_temperature: f64) -> Self {
        Self {
            k_max,
            start_temperature,
            end_temperature,
            ..Self::default()
        }
    }

    /// Sets the number of temperature steps.
    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = k_max;
        self
    }

    /// Sets the start and end temperatures.
    pub fn with_temperatures(mut self, start: f64, end: f64) -> Self {
        self.start_temperature = start;
        self.end_temperature = end;
        self
    }

    /// Sets the number of trial moves per temperature step.
    pub fn with_cycles(mut self, cycles: usize) -> Self {
        self.cycles = cycles;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.start_temperature) {
            return Err(AnnealError::invalid_configuration(format!(
                "start_temperature must be positive and finite, got {}",
                self.start_temperature
            )));
        }
        if !is_positive(self.end_temperature) {
            return Err(AnnealError::invalid_configuration(format!(
                "end_temperature must be positive and finite, got {}",
                self.end_temperature
            )));
        }
        if self.end_temperature >= self.start_temperature {
            return Err(AnnealError::invalid_configuration(format!(
                "end_temperature ({}) must be less than start_temperature ({})",
                self.end_temperature, self.start_temperature
            )));
        }
        if self.cycles == 0 {
            return Err(AnnealError::invalid_configuration(
                "cycles must be positive",
            ));
        }
        Ok(())
    }
}

fn is_positive(t: f64) -> bool {
    t.is_finite() && t > 0.0
}
