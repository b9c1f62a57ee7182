//! Error type shared by every fallible operation in the crate.

use thiserror::Error as ThisError;

/// Errors raised by configuration, instance construction and the annealing
/// state machine.
///
/// None of these are transient: each one signals either a rejected
/// configuration or a caller driving the [`Annealer`](crate::Annealer) out
/// of order.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum AnnealError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Fewer than two points: no two distinct positions exist to swap.
    #[error("instance has {points} point(s), at least 2 are required")]
    DegenerateInstance { points: usize },

    #[error("annealer has not been prepared with an instance")]
    NotPrepared,

    #[error("annealing already terminated after {k_max} iteration(s)")]
    AlreadyTerminated { k_max: usize },
}

pub type Result<T> = std::result::Result<T, AnnealError>;

impl AnnealError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }
}
