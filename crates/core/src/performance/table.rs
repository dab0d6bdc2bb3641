//! Manufacturer performance tables
//!
//! A table is a weight × pressure-altitude × temperature grid. Lookups inside
//! the grid interpolate linearly along each axis in turn. Outside the grid the
//! policy is asymmetric:
//!
//! - above an axis maximum (worse conditions) the top segment is extended
//!   linearly, at most 10% beyond the maximum, and the result carries a 1.20
//!   penalty; further out the lookup is refused
//! - below an axis minimum (better conditions) the axis is clamped, so the
//!   result is never better than the best certified data point
//!
//! When several axes are above their maxima the penalty is applied once and
//! the warning names the axis with the largest excess.

use super::{CalculationMode, TableAxis};
use crate::config::limits::{BUFFER_TOLERANCE, EXTRAPOLATION_BUFFER, EXTRAPOLATION_PENALTY};
use crate::core_types::units::{Celsius, Feet, Kilograms};
use crate::error::{CalculationError, Result};
use crate::interpolation::{lerp, Axis, Placement};
use crate::warnings::{Warning, WarningKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Direction in which a table's values get worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    /// Distances: larger is worse
    Rising,
    /// Rates of climb: smaller is worse
    Falling,
}

/// Value looked up from a table, with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEvaluation {
    pub value: f64,
    pub mode: CalculationMode,
    pub warnings: Vec<Warning>,
}

/// Weight (kg) × pressure altitude (ft) × temperature (°C) grid of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTable {
    /// Name used in warnings and errors
    pub label: String,
    pub weight: Axis,
    pub pressure_altitude: Axis,
    pub temperature: Axis,
    /// Row-major `[weight][pressure_altitude][temperature]`
    pub values: Vec<f64>,
}

impl PerformanceTable {
    /// # Errors
    /// Returns [`CalculationError::InvalidProfile`] if the value count does not
    /// match the grid.
    pub fn new(
        label: impl Into<String>,
        weight: Axis,
        pressure_altitude: Axis,
        temperature: Axis,
        values: Vec<f64>,
    ) -> Result<Self> {
        let table = Self {
            label: label.into(),
            weight,
            pressure_altitude,
            temperature,
            values,
        };
        table.validate()?;
        Ok(table)
    }

    /// Grid size matches the value count and every value is finite.
    ///
    /// # Errors
    /// Returns [`CalculationError::InvalidProfile`] describing the defect.
    pub fn validate(&self) -> Result<()> {
        let expected = self.weight.len() * self.pressure_altitude.len() * self.temperature.len();
        if self.values.len() != expected {
            return Err(CalculationError::InvalidProfile(format!(
                "table '{}' has {} values, grid needs {expected}",
                self.label,
                self.values.len()
            )));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(CalculationError::InvalidProfile(format!(
                "table '{}' contains a non-finite value",
                self.label
            )));
        }
        Ok(())
    }

    fn at(&self, w: usize, a: usize, t: usize) -> f64 {
        let na = self.pressure_altitude.len();
        let nt = self.temperature.len();
        self.values[(w * na + a) * nt + t]
    }

    /// Sequential 1-D interpolation: temperature, then altitude, then weight.
    fn interpolate(&self, cell: [(usize, f64); 3]) -> f64 {
        let [(w, tw), (a, ta), (t, tt)] = cell;
        let along_temperature = |w, a| lerp(self.at(w, a, t), self.at(w, a, t + 1), tt);
        let along_altitude =
            |w| lerp(along_temperature(w, a), along_temperature(w, a + 1), ta);
        lerp(along_altitude(w), along_altitude(w + 1), tw)
    }

    /// Look up a distance. Larger values are treated as worse.
    ///
    /// # Errors
    /// Returns [`CalculationError::ExtrapolationBlocked`] if a query exceeds an
    /// axis maximum by more than 10%.
    pub fn evaluate(
        &self,
        weight: Kilograms,
        pressure_altitude: Feet,
        temperature: Celsius,
    ) -> Result<TableEvaluation> {
        self.lookup(
            [weight.value(), pressure_altitude.value(), temperature.value()],
            Trend::Rising,
        )
    }

    /// Look up a rate (e.g. climb). Smaller values are treated as worse, so
    /// the penalty divides and an extrapolated rate never exceeds the rate at
    /// the axis maximum.
    ///
    /// # Errors
    /// Same refusal rule as [`PerformanceTable::evaluate`].
    pub fn evaluate_rate(
        &self,
        weight: Kilograms,
        pressure_altitude: Feet,
        temperature: Celsius,
    ) -> Result<TableEvaluation> {
        self.lookup(
            [weight.value(), pressure_altitude.value(), temperature.value()],
            Trend::Falling,
        )
    }

    fn lookup(&self, query: [f64; 3], trend: Trend) -> Result<TableEvaluation> {
        let axes = [
            (TableAxis::Weight, &self.weight),
            (TableAxis::PressureAltitude, &self.pressure_altitude),
            (TableAxis::Temperature, &self.temperature),
        ];
        let placements = [0, 1, 2].map(|i| axes[i].1.locate(query[i]));

        let mut worst: Option<(TableAxis, f64)> = None;
        let mut clamped = Vec::new();
        for (((id, axis), placement), &value) in axes.iter().zip(&placements).zip(&query) {
            match placement {
                Placement::Inside { .. } => {}
                Placement::BelowMin => clamped.push(*id),
                Placement::AboveMax { .. } => {
                    let buffer = axis.excess_ratio(value);
                    if buffer > EXTRAPOLATION_BUFFER + BUFFER_TOLERANCE {
                        return Err(CalculationError::ExtrapolationBlocked {
                            table: self.label.clone(),
                            axis: *id,
                            value,
                            axis_max: axis.max(),
                            buffer,
                        });
                    }
                    if worst.map_or(true, |(_, b)| buffer > b) {
                        worst = Some((*id, buffer));
                    }
                }
            }
        }

        let boundary = self.interpolate(placements.map(Placement::clamped));
        let mut warnings = Vec::new();

        let (value, mode) = match worst {
            Some((axis, buffer)) => {
                let linear = self.interpolate(placements.map(Placement::extended));
                let value = match trend {
                    Trend::Rising => linear.max(boundary) * EXTRAPOLATION_PENALTY,
                    Trend::Falling => linear.min(boundary) / EXTRAPOLATION_PENALTY,
                };
                debug!(
                    table = %self.label, %axis, buffer, linear, value,
                    "extrapolated table lookup"
                );
                warnings.push(Warning::new(WarningKind::ExtrapolationUsed {
                    table: self.label.clone(),
                    axis,
                    buffer,
                }));
                (value, CalculationMode::Extrapolated)
            }
            None if !clamped.is_empty() => (boundary, CalculationMode::FloorClamped),
            None => (boundary, CalculationMode::Table),
        };

        warnings.extend(clamped.into_iter().map(|axis| {
            Warning::new(WarningKind::FloorClamped {
                table: self.label.clone(),
                axis,
            })
        }));

        debug!(table = %self.label, ?query, value, ?mode, "table lookup");
        Ok(TableEvaluation {
            value,
            mode,
            warnings,
        })
    }
}
