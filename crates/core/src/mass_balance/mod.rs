//! Mass & balance
//!
//! Builds zero-fuel, takeoff and landing CG points from a profile and a
//! loading, checks them against the weight limits and the selected envelope,
//! and checks the fuel-burn CG path between takeoff and landing.

pub mod engine;
pub mod fuel;
pub mod moment;

pub use engine::compute_mass_balance_with;
pub use fuel::{burn_trip_fuel, fuel_weight, BurnPlan};
pub use moment::{cg_position, total_moment, LoadedItem};

use crate::core_types::loading::FlightPhase;
use crate::core_types::units::{KilogramMeters, Kilograms, Meters};
use crate::envelope::MigrationOutcome;
use crate::warnings::{OverallStatus, Warning};
use serde::{Deserialize, Serialize};

/// Mass and CG at one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CgPoint {
    pub phase: FlightPhase,
    pub mass: Kilograms,
    pub arm: Meters,
    pub moment: KilogramMeters,
    pub within_envelope: bool,
}

/// Output of a mass & balance calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassBalanceResult {
    pub empty_mass: Kilograms,
    /// Sum of station masses
    pub payload_mass: Kilograms,
    /// Fuel on board at takeoff
    pub fuel_mass: Kilograms,
    pub zero_fuel_mass: Kilograms,
    pub takeoff_mass: Kilograms,
    pub landing_mass: Kilograms,
    /// Fuel actually burned between takeoff and landing
    pub trip_fuel_mass: Kilograms,
    /// Zero-fuel, takeoff, landing
    pub cg_points: Vec<CgPoint>,
    pub within_weight_limits: bool,
    pub within_cg_limits: bool,
    /// `None` when the path was not checked (no envelope, or takeoff CG already outside)
    pub migration: Option<MigrationOutcome>,
    pub status: OverallStatus,
    pub warnings: Vec<Warning>,
}

impl MassBalanceResult {
    /// CG point for `phase`.
    pub fn point(&self, phase: FlightPhase) -> Option<&CgPoint> {
        self.cg_points.iter().find(|p| p.phase == phase)
    }
}
