//! CG migration between takeoff and landing
//!
//! Fuel burn moves the CG along a straight line in the (arm, mass) plane from
//! the takeoff point to the landing point. Both endpoints can be inside a
//! concave envelope while the path between them is not, so the path is
//! sampled.

use super::polygon::contains;
use crate::core_types::units::{Kilograms, Meters};
use crate::core_types::Vec2;
use serde::{Deserialize, Serialize};

/// Outcome of sampling the takeoff→landing CG path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum MigrationOutcome {
    NoViolation,
    /// First sampled position outside the envelope
    Breach {
        /// Position along the path, 0 = takeoff, 1 = landing
        fraction: f64,
        arm: Meters,
        mass: Kilograms,
    },
}

/// Sample the segment from `takeoff` to `landing` at `i / subdivisions` for
/// `i = 0..=subdivisions` and report the first sample outside `polygon`.
pub fn migration_check(
    takeoff: Vec2,
    landing: Vec2,
    polygon: &[Vec2],
    subdivisions: u32,
    tolerance: f64,
) -> MigrationOutcome {
    let steps = subdivisions.max(1);
    for i in 0..=steps {
        let fraction = f64::from(i) / f64::from(steps);
        let sample = takeoff.lerp(&landing, fraction);
        if !contains(sample, polygon, tolerance) {
            tracing::debug!(fraction, arm = sample.x, mass = sample.y, "CG path leaves envelope");
            return MigrationOutcome::Breach {
                fraction,
                arm: Meters::new(sample.x),
                mass: Kilograms::new(sample.y),
            };
        }
    }
    MigrationOutcome::NoViolation
}
