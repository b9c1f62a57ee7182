//! Points, distances and problem instances.

use crate::error::{AnnealError, Result};

/// Metric between two points of equal dimensionality.
///
/// Implementations must be pure and return a non-negative value.
pub trait Distance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Euclidean norm of the coordinate-wise difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// An ordered, immutable set of cities.
///
/// Every point has the same number of coordinates and every coordinate is
/// finite. The index of a point in this list is the value a tour refers to.
///
/// Deserialization goes through [`ProblemInstance::new`], so malformed input
/// is rejected the same way.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "InstanceData"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemInstance {
    points: Vec<Vec<f64>>,
}

/// Unvalidated wire form of a [`ProblemInstance`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct InstanceData {
    points: Vec<Vec<f64>>,
}

#[cfg(feature = "serde")]
impl TryFrom<InstanceData> for ProblemInstance {
    type Error = AnnealError;

    fn try_from(data: InstanceData) -> Result<Self> {
        Self::new(data.points)
    }
}

impl ProblemInstance {
    /// Builds an instance from raw coordinates.
    ///
    /// Fewer than two points is allowed here; the annealer rejects such an
    /// instance when it is prepared.
    pub fn new(points: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = points.first() {
            let dim = first.len();
            if dim == 0 {
                return Err(AnnealError::invalid_instance(
                    "points must have at least one coordinate",
                ));
            }
            for (i, p) in points.iter().enumerate() {
                if p.len() != dim {
                    return Err(AnnealError::invalid_instance(format!(
                        "point {i} has {} coordinate(s), expected {dim}",
                        p.len()
                    )));
                }
                if p.iter().any(|c| !c.is_finite()) {
                    return Err(AnnealError::invalid_instance(format!(
                        "point {i} has a non-finite coordinate"
                    )));
                }
            }
        }
        Ok(Self { points })
    }

    /// Builds a 2D instance from `(x, y)` pairs.
    pub fn from_xy(points: &[(f64, f64)]) -> Result<Self> {
        Self::new(points.iter().map(|&(x, y)| vec![x, y]).collect())
    }

    /// Places `count` cities evenly on a circle inscribed in a
    /// `map_size` x `map_size` square.
    ///
    /// Coordinates are truncated toward zero, so cities sit on integer grid
    /// positions and neighbouring cities may coincide for large `count`.
    pub fn circle(count: usize, map_size: f64) -> Result<Self> {
        if !(map_size.is_finite() && map_size > 0.0) {
            return Err(AnnealError::invalid_instance(format!(
                "map_size must be positive and finite, got {map_size}"
            )));
        }
        let half = map_size / 2.0;
        let ratio = std::f64::consts::TAU / count.max(1) as f64;
        let points = (0..count)
            .map(|i| {
                let angle = ratio * i as f64;
                vec![
                    (angle.cos() * half + half).trunc(),
                    (angle.sin() * half + half).trunc(),
                ]
            })
            .collect();
        Self::new(points)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the instance has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of coordinates per point (0 for an empty instance).
    pub fn dimension(&self) -> usize {
        self.points.first().map_or(0, Vec::len)
    }

    /// Coordinates of point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn point(&self, index: usize) -> &[f64] {
        &self.points[index]
    }

    /// All points in index order.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }
}
