//! Calculation options and fixed safety limits
//!
//! [`CalculationOptions`] carries the few knobs an operator may legitimately
//! tune (which envelope to validate against, factoring policy). Everything in
//! [`limits`] is fixed: those values encode certification rules and plausibility
//! bands and are deliberately not part of any options struct.

use crate::core_types::aircraft::EnvelopeCategory;
use crate::error::{CalculationError, Result};
use serde::{Deserialize, Serialize};

/// Fixed constants used by the calculation core.
pub mod limits {
    use std::ops::RangeInclusive;

    /// Maximum relative excess over a table axis maximum before a lookup is refused
    pub const EXTRAPOLATION_BUFFER: f64 = 0.10;

    /// Multiplier applied to an extrapolated table value
    pub const EXTRAPOLATION_PENALTY: f64 = 1.20;

    /// Slack on the buffer comparison so `axis_max * 1.10` itself is accepted
    pub const BUFFER_TOLERANCE: f64 = 1e-9;

    /// Standard sea-level pressure (hPa)
    pub const STANDARD_QNH_HPA: f64 = 1013.25;

    /// Pressure-altitude change per hPa of QNH deviation (ft/hPa)
    pub const FEET_PER_HPA: f64 = 30.0;

    /// ISA sea-level temperature (°C)
    pub const ISA_SEA_LEVEL_C: f64 = 15.0;

    /// ISA temperature lapse rate (°C per 1000 ft)
    pub const ISA_LAPSE_PER_1000_FT: f64 = 1.983;

    /// Density-altitude increase per °C of ISA deviation (ft/°C)
    pub const DENSITY_ALTITUDE_FT_PER_C: f64 = 118.8;

    /// Plausible outside air temperature (°C)
    pub const TEMPERATURE_C: RangeInclusive<f64> = -60.0..=60.0;

    /// Plausible QNH (hPa)
    pub const QNH_HPA: RangeInclusive<f64> = 850.0..=1100.0;

    /// Plausible field elevation or pressure altitude (ft)
    pub const ALTITUDE_FT: RangeInclusive<f64> = -2000.0..=25000.0;

    /// Plausible runway slope (%)
    pub const RUNWAY_SLOPE_PCT: RangeInclusive<f64> = -10.0..=10.0;

    /// Plausible wind component magnitude (kt)
    pub const WIND_KT: RangeInclusive<f64> = -100.0..=100.0;
}

/// Tunable options for a calculation request.
///
/// Missing fields deserialize to their defaults, so `{}` is a valid options
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationOptions {
    /// Envelope to validate CG points against
    pub envelope_category: EnvelopeCategory,

    /// Number of segments the takeoff→landing CG path is split into
    pub migration_subdivisions: u32,

    /// Distance (in the arm/mass plane) within which a point counts as on an edge
    pub boundary_tolerance: f64,

    /// Factor applied to raw takeoff distances
    pub takeoff_safety_factor: f64,

    /// Factor applied to raw landing distances
    pub landing_safety_factor: f64,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            envelope_category: EnvelopeCategory::Normal,
            migration_subdivisions: 20,
            boundary_tolerance: 1e-7,
            takeoff_safety_factor: 1.25,
            landing_safety_factor: 1.33,
        }
    }
}

impl CalculationOptions {
    /// Reject options that would silently weaken a check.
    ///
    /// # Errors
    /// Returns [`CalculationError::InputRange`] if the boundary tolerance is
    /// negative or either safety factor is below 1.
    pub fn validate(&self) -> Result<()> {
        CalculationError::check_range(
            "boundary tolerance",
            self.boundary_tolerance,
            0.0,
            f64::MAX,
        )?;
        CalculationError::check_range(
            "takeoff safety factor",
            self.takeoff_safety_factor,
            1.0,
            f64::MAX,
        )?;
        CalculationError::check_range(
            "landing safety factor",
            self.landing_safety_factor,
            1.0,
            f64::MAX,
        )
    }
}
