//! Shared 1-D interpolation primitive
//!
//! Both the performance tables and variable-arm station tables are built on
//! [`Axis`]: a strictly increasing list of grid coordinates. Locating a query
//! value on an axis tells the caller whether it falls inside the certified
//! range, below it, or above it, and how to weight the neighbouring grid
//! points.

use crate::error::{CalculationError, Result};
use serde::{Deserialize, Serialize};

/// Where a query value falls on an [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Within `[min, max]`. `t` in `[0, 1]` weights `points[lower + 1]` against `points[lower]`.
    Inside { lower: usize, t: f64 },
    /// Strictly below the first grid point.
    BelowMin,
    /// Strictly above the last grid point. `t > 1` extends the top segment linearly.
    AboveMax { lower: usize, t: f64 },
}

impl Placement {
    /// Segment and weight with out-of-range values clamped to the nearest end.
    pub fn clamped(self) -> (usize, f64) {
        match self {
            Placement::Inside { lower, t } => (lower, t),
            Placement::BelowMin => (0, 0.0),
            Placement::AboveMax { lower, .. } => (lower, 1.0),
        }
    }

    /// Segment and weight, extending the top segment linearly above the range.
    /// Values below the range are still clamped.
    pub fn extended(self) -> (usize, f64) {
        match self {
            Placement::Inside { lower, t } | Placement::AboveMax { lower, t } => (lower, t),
            Placement::BelowMin => (0, 0.0),
        }
    }
}

/// Strictly increasing grid coordinates with at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Axis {
    points: Vec<f64>,
}

impl Axis {
    /// Build an axis, rejecting short, non-finite, or non-increasing coordinates.
    ///
    /// # Errors
    /// Returns [`CalculationError::InvalidProfile`] describing the defect.
    pub fn new(points: Vec<f64>) -> Result<Self> {
        if points.len() < 2 {
            return Err(CalculationError::InvalidProfile(format!(
                "axis needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(CalculationError::InvalidProfile(format!(
                "axis contains non-finite point {bad}"
            )));
        }
        if let Some(w) = points.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CalculationError::InvalidProfile(format!(
                "axis is not strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
        Ok(Self { points })
    }

    /// Grid coordinates.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an axis has at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First grid coordinate.
    pub fn min(&self) -> f64 {
        self.points[0]
    }

    /// Last grid coordinate.
    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Locate `value` relative to the grid.
    pub fn locate(&self, value: f64) -> Placement {
        let n = self.points.len();
        if value < self.min() {
            return Placement::BelowMin;
        }
        let top = n - 2;
        if value > self.max() {
            let (lo, hi) = (self.points[top], self.points[top + 1]);
            return Placement::AboveMax {
                lower: top,
                t: (value - lo) / (hi - lo),
            };
        }
        // First segment whose upper end reaches the value
        let lower = self.points[1..]
            .iter()
            .position(|&p| value <= p)
            .unwrap_or(top);
        let (lo, hi) = (self.points[lower], self.points[lower + 1]);
        Placement::Inside {
            lower,
            t: (value - lo) / (hi - lo),
        }
    }

    /// Relative excess of `value` over the axis maximum.
    ///
    /// Measured against the maximum itself when it is positive, otherwise
    /// against the axis span (a temperature axis topping out below 0 °C has
    /// no meaningful ratio to its maximum).
    pub fn excess_ratio(&self, value: f64) -> f64 {
        let max = self.max();
        let excess = value - max;
        if max > 0.0 {
            excess / max
        } else {
            excess / (max - self.min())
        }
    }
}

impl TryFrom<Vec<f64>> for Axis {
    type Error = CalculationError;

    fn try_from(points: Vec<f64>) -> Result<Self> {
        Axis::new(points)
    }
}

impl From<Axis> for Vec<f64> {
    fn from(axis: Axis) -> Self {
        axis.points
    }
}

/// Linear interpolation between `a` and `b`; `t` outside `[0, 1]` extrapolates.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate `values` (one per axis point) at `x`, clamping outside the axis.
pub fn interpolate_clamped(axis: &Axis, values: &[f64], x: f64) -> f64 {
    let (lower, t) = axis.locate(x).clamped();
    lerp(values[lower], values[lower + 1], t)
}
