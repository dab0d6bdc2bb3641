//! Environmental and runway conditions for a performance request

use super::units::{Celsius, Feet, Hectopascals, Knots, Percent};
use crate::config::limits;
use crate::error::{CalculationError, Result};
use crate::performance::atmosphere;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the altitude for table entry is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeReference {
    /// Pressure altitude supplied directly
    Pressure { pressure_altitude: Feet },
    /// Field elevation and QNH; pressure altitude is derived
    Field { elevation: Feet, qnh: Hectopascals },
}

/// Runway surface and condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunwaySurface {
    #[default]
    PavedDry,
    PavedWet,
    DryGrass,
    WetGrass,
    SoftGround,
}

impl RunwaySurface {
    /// Distance surcharge as a multiplier.
    pub fn factor(self) -> f64 {
        match self {
            RunwaySurface::PavedDry => 1.0,
            RunwaySurface::PavedWet => 1.15,
            RunwaySurface::DryGrass => 1.20,
            RunwaySurface::WetGrass => 1.30,
            RunwaySurface::SoftGround => 1.50,
        }
    }
}

impl fmt::Display for RunwaySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunwaySurface::PavedDry => "paved dry",
            RunwaySurface::PavedWet => "paved wet",
            RunwaySurface::DryGrass => "dry grass",
            RunwaySurface::WetGrass => "wet grass",
            RunwaySurface::SoftGround => "soft ground",
        })
    }
}

/// Conditions at the departure/arrival runway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    pub altitude: AltitudeReference,
    /// Outside air temperature
    pub temperature: Celsius,
    /// Along-runway wind; positive is a headwind, negative a tailwind
    #[serde(default)]
    pub headwind: Knots,
    /// Across-runway wind; sign gives the side
    #[serde(default)]
    pub crosswind: Knots,
    #[serde(default)]
    pub surface: RunwaySurface,
    /// Positive is uphill in the direction of takeoff
    #[serde(default)]
    pub slope: Percent,
}

impl EnvironmentalConditions {
    /// Conditions at a field given elevation and QNH, calm wind, dry paved level runway.
    pub fn at_field(elevation: Feet, qnh: Hectopascals, temperature: Celsius) -> Self {
        Self {
            altitude: AltitudeReference::Field { elevation, qnh },
            temperature,
            headwind: Knots::ZERO,
            crosswind: Knots::ZERO,
            surface: RunwaySurface::PavedDry,
            slope: Percent::ZERO,
        }
    }

    /// Conditions at a known pressure altitude, calm wind, dry paved level runway.
    pub fn at_pressure_altitude(pressure_altitude: Feet, temperature: Celsius) -> Self {
        Self {
            altitude: AltitudeReference::Pressure { pressure_altitude },
            ..Self::at_field(Feet::ZERO, Hectopascals::new(limits::STANDARD_QNH_HPA), temperature)
        }
    }

    /// Pressure altitude for table entry.
    pub fn pressure_altitude(&self) -> Feet {
        match self.altitude {
            AltitudeReference::Pressure { pressure_altitude } => pressure_altitude,
            AltitudeReference::Field { elevation, qnh } => {
                atmosphere::pressure_altitude(elevation, qnh)
            }
        }
    }

    /// Reject physically implausible values.
    ///
    /// # Errors
    /// Returns [`CalculationError::InputRange`] naming the first offending quantity.
    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, value: f64, band: &std::ops::RangeInclusive<f64>| {
            CalculationError::check_range(name, value, *band.start(), *band.end())
        };
        match self.altitude {
            AltitudeReference::Pressure { pressure_altitude } => check(
                "pressure altitude (ft)",
                pressure_altitude.value(),
                &limits::ALTITUDE_FT,
            )?,
            AltitudeReference::Field { elevation, qnh } => {
                check("field elevation (ft)", elevation.value(), &limits::ALTITUDE_FT)?;
                check("QNH (hPa)", qnh.value(), &limits::QNH_HPA)?;
            }
        }
        check(
            "outside air temperature (°C)",
            self.temperature.value(),
            &limits::TEMPERATURE_C,
        )?;
        check("headwind component (kt)", self.headwind.value(), &limits::WIND_KT)?;
        check("crosswind component (kt)", self.crosswind.value(), &limits::WIND_KT)?;
        check("runway slope (%)", self.slope.value(), &limits::RUNWAY_SLOPE_PCT)?;
        Ok(())
    }
}
