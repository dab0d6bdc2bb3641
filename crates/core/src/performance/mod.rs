//! Takeoff, landing and climb performance
//!
//! Distances come from manufacturer tables when the profile has them
//! ([`table`]), or from base distances and correction formulas when it does
//! not ([`corrections`]). Wind, surface and slope corrections apply in both
//! modes. Every result states which mode produced it.

pub mod atmosphere;
pub mod corrections;
pub mod engine;
pub mod table;

pub use engine::compute_performance_with;
pub use table::{PerformanceTable, TableEvaluation};

use crate::core_types::environment::EnvironmentalConditions;
use crate::core_types::units::{CelsiusDelta, Feet, FeetPerMinute, Kilograms, Meters};
use crate::warnings::{OverallStatus, Warning};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid axis of a [`PerformanceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableAxis {
    Weight,
    PressureAltitude,
    Temperature,
}

impl fmt::Display for TableAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableAxis::Weight => "weight",
            TableAxis::PressureAltitude => "pressure altitude",
            TableAxis::Temperature => "temperature",
        })
    }
}

/// Phase a distance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformancePhase {
    Takeoff,
    Landing,
}

impl fmt::Display for PerformancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PerformancePhase::Takeoff => "takeoff",
            PerformancePhase::Landing => "landing",
        })
    }
}

/// How a value was obtained, ordered from most to least certain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// Interpolated inside certified data
    Table,
    /// At least one axis below the grid, clamped to the lowest data point
    FloorClamped,
    /// Correction formulas, no table
    Algorithmic,
    /// Extrapolated beyond the grid with the safety penalty
    Extrapolated,
}

impl CalculationMode {
    /// The less certain of two modes.
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }
}

/// One multiplicative correction, recorded for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCorrection {
    pub phase: PerformancePhase,
    pub label: String,
    pub factor: f64,
}

/// Conditions plus the masses to evaluate at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRequest {
    pub conditions: EnvironmentalConditions,
    pub takeoff_mass: Kilograms,
    /// Defaults to the takeoff mass
    #[serde(default)]
    pub landing_mass: Option<Kilograms>,
}

impl PerformanceRequest {
    pub fn new(conditions: EnvironmentalConditions, takeoff_mass: Kilograms) -> Self {
        Self {
            conditions,
            takeoff_mass,
            landing_mass: None,
        }
    }

    pub fn with_landing_mass(mut self, landing_mass: Kilograms) -> Self {
        self.landing_mass = Some(landing_mass);
        self
    }

    pub fn landing_mass(&self) -> Kilograms {
        self.landing_mass.unwrap_or(self.takeoff_mass)
    }
}

/// Distances for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePerformance {
    pub mode: CalculationMode,
    pub ground_roll: Meters,
    /// Distance to (takeoff) or from (landing) a 50 ft / 15 m screen
    pub over_obstacle: Meters,
    pub factored_ground_roll: Meters,
    pub factored_over_obstacle: Meters,
}

/// Output of a performance calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub pressure_altitude: Feet,
    pub density_altitude: Feet,
    pub isa_deviation: CelsiusDelta,
    pub takeoff: PhasePerformance,
    pub landing: PhasePerformance,
    pub rate_of_climb: Option<FeetPerMinute>,
    /// Least certain mode across all evaluated values
    pub mode: CalculationMode,
    pub corrections: Vec<AppliedCorrection>,
    pub status: OverallStatus,
    pub warnings: Vec<Warning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_combination_prefers_less_certain() {
        assert_eq!(
            CalculationMode::Table.combine(CalculationMode::FloorClamped),
            CalculationMode::FloorClamped
        );
        assert_eq!(
            CalculationMode::Extrapolated.combine(CalculationMode::FloorClamped),
            CalculationMode::Extrapolated
        );
    }

    #[test]
    fn test_landing_mass_defaults_to_takeoff() {
        let req = PerformanceRequest::new(
            EnvironmentalConditions::at_pressure_altitude(
                Feet::ZERO,
                crate::core_types::units::Celsius::new(15.0),
            ),
            Kilograms::new(1000.0),
        );
        assert_eq!(req.landing_mass(), Kilograms::new(1000.0));
        assert_eq!(
            req.with_landing_mass(Kilograms::new(950.0)).landing_mass(),
            Kilograms::new(950.0)
        );
    }
}
