//! Multiplicative distance corrections
//!
//! Used in two ways: the universal runway corrections (wind, surface, slope)
//! apply to every distance, and when a profile has no table for a phase the
//! algorithmic fallback builds a distance from a sea-level ISA base with
//! weight, altitude and temperature factors on top.
//!
//! All factors multiply the same base, so order does not change the result.
//! Each factor that differs from 1 is recorded with a label.

use super::{AppliedCorrection, PerformancePhase};
use crate::core_types::aircraft::AlgorithmicBase;
use crate::core_types::environment::{EnvironmentalConditions, RunwaySurface};
use crate::core_types::units::{CelsiusDelta, Feet, Kilograms, Knots, Meters, Percent};

/// Distance reduction per knot of headwind (1.5% per 2 kt)
const HEADWIND_PER_KT: f64 = 0.015 / 2.0;

/// Distance increase per knot of tailwind (10% per 2 kt)
const TAILWIND_PER_KT: f64 = 0.10 / 2.0;

/// Distance increase per percent of adverse slope
const SLOPE_PER_PCT: f64 = 0.10;

/// Distance increase per 1000 ft of pressure altitude
const ALTITUDE_PER_1000_FT: f64 = 0.10;

/// Distance increase per °C above ISA
const TEMPERATURE_PER_C: f64 = 0.01;

/// Wind factor for a signed headwind component (negative is tailwind).
pub fn wind_factor(headwind: Knots) -> f64 {
    let w = headwind.value();
    if w >= 0.0 {
        1.0 - w * HEADWIND_PER_KT
    } else {
        1.0 - w * TAILWIND_PER_KT
    }
}

/// Slope factor. Takeoff is penalised uphill, landing downhill; a favourable
/// slope earns no credit.
pub fn slope_factor(phase: PerformancePhase, slope: Percent) -> f64 {
    let adverse = match phase {
        PerformancePhase::Takeoff => slope.value(),
        PerformancePhase::Landing => -slope.value(),
    };
    1.0 + adverse.max(0.0) * SLOPE_PER_PCT
}

/// Surface surcharge.
pub fn surface_factor(surface: RunwaySurface) -> f64 {
    surface.factor()
}

/// Weight scaling from MTOM: quadratic for takeoff, power 1.5 for landing.
pub fn weight_factor(phase: PerformancePhase, mass: Kilograms, mtom: Kilograms) -> f64 {
    let ratio = mass / mtom;
    match phase {
        PerformancePhase::Takeoff => ratio.powi(2),
        PerformancePhase::Landing => ratio.powf(1.5),
    }
}

/// Altitude factor; altitudes below sea level earn no credit.
pub fn altitude_factor(pressure_altitude: Feet) -> f64 {
    1.0 + pressure_altitude.value().max(0.0) / 1000.0 * ALTITUDE_PER_1000_FT
}

/// Temperature factor for a deviation above ISA; colder than ISA earns no credit.
pub fn temperature_factor(isa_deviation: CelsiusDelta) -> f64 {
    1.0 + isa_deviation.value().max(0.0) * TEMPERATURE_PER_C
}

/// Ordered, labeled factors for one phase.
#[derive(Debug, Clone)]
pub struct CorrectionChain {
    phase: PerformancePhase,
    applied: Vec<AppliedCorrection>,
}

impl CorrectionChain {
    pub fn new(phase: PerformancePhase) -> Self {
        Self {
            phase,
            applied: Vec::new(),
        }
    }

    /// Record `factor` under `label` unless it is exactly 1.
    pub fn apply(&mut self, label: impl Into<String>, factor: f64) {
        if factor != 1.0 {
            self.applied.push(AppliedCorrection {
                phase: self.phase,
                label: label.into(),
                factor,
            });
        }
    }

    /// Product of all recorded factors.
    pub fn total(&self) -> f64 {
        self.applied.iter().map(|c| c.factor).product()
    }

    pub fn into_applied(self) -> Vec<AppliedCorrection> {
        self.applied
    }

    /// Wind, surface and slope, which apply whatever produced the base distance.
    pub fn apply_runway(&mut self, conditions: &EnvironmentalConditions) {
        let headwind = conditions.headwind;
        let label = if headwind.value() < 0.0 {
            format!("tailwind {}", headwind.abs())
        } else {
            format!("headwind {headwind}")
        };
        self.apply(label, wind_factor(headwind));
        self.apply(
            format!("surface {}", conditions.surface),
            surface_factor(conditions.surface),
        );
        self.apply(
            format!("slope {}", conditions.slope),
            slope_factor(self.phase, conditions.slope),
        );
    }

    /// Weight, altitude and temperature for the algorithmic fallback.
    pub fn apply_algorithmic(
        &mut self,
        mass: Kilograms,
        mtom: Kilograms,
        pressure_altitude: Feet,
        isa_deviation: CelsiusDelta,
    ) {
        self.apply(
            format!("weight {mass} of MTOM {mtom}"),
            weight_factor(self.phase, mass, mtom),
        );
        self.apply(
            format!("pressure altitude {pressure_altitude}"),
            altitude_factor(pressure_altitude),
        );
        self.apply(
            format!("ISA deviation {isa_deviation}"),
            temperature_factor(isa_deviation),
        );
    }
}

/// Sea-level ISA base distances (ground roll, over obstacle) for `phase`.
pub fn base_distances(base: &AlgorithmicBase, phase: PerformancePhase) -> (Meters, Meters) {
    match phase {
        PerformancePhase::Takeoff => (base.takeoff_ground_roll, base.takeoff_over_obstacle),
        PerformancePhase::Landing => (base.landing_ground_roll, base.landing_over_obstacle),
    }
}
