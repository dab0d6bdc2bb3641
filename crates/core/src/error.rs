//! Fatal calculation errors.
//!
//! Anything in here aborts a calculation and is surfaced verbatim to the caller.
//! Non-fatal findings are [`Warning`](crate::warnings::Warning) values instead and
//! travel alongside a complete result.

use crate::core_types::units::Dimension;
use crate::performance::TableAxis;
use std::fmt;

/// Result alias used throughout the calculation core.
pub type Result<T> = std::result::Result<T, CalculationError>;

/// Errors that stop a calculation before a result is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationError {
    /// A supplied value is physically implausible.
    InputRange {
        /// Name of the offending quantity (e.g. `"outside air temperature"`)
        quantity: String,
        /// The rejected value, in the quantity's canonical unit
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// A fuel-type label that has no entry in the density table.
    UnknownFuelType(String),
    /// A unit symbol that is unknown or belongs to another dimension.
    UnitMismatch {
        /// Dimension the receiving field requires
        expected: Dimension,
        /// Symbol that was supplied
        found: String,
    },
    /// Total mass was zero or negative when dividing moment by mass.
    DivisionHazard {
        /// The offending total mass (kg)
        total_mass: f64,
    },
    /// A table query exceeded the extrapolation buffer on the worse-condition side.
    ExtrapolationBlocked {
        /// Label of the table that refused the query
        table: String,
        /// Axis that exceeded the buffer
        axis: TableAxis,
        /// Query value on that axis
        value: f64,
        /// Largest certified grid value on that axis
        axis_max: f64,
        /// Relative excess over the axis maximum
        buffer: f64,
    },
    /// The aircraft profile snapshot is structurally unusable.
    InvalidProfile(String),
    /// The request references stations or tanks the profile does not define.
    InvalidInput(String),
}

impl CalculationError {
    /// Leading text of every [`CalculationError::UnknownFuelType`] message.
    ///
    /// Serde flattens errors raised while reading a profile into text, so
    /// callers recover the kind from these prefixes.
    pub const UNKNOWN_FUEL_TYPE_PREFIX: &'static str = "Unknown fuel type";

    /// Leading text of every [`CalculationError::UnitMismatch`] message.
    pub const UNIT_MISMATCH_PREFIX: &'static str = "Unit mismatch";

    /// Build an [`CalculationError::InputRange`] for a quantity and its allowed band.
    pub fn input_range(quantity: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        CalculationError::InputRange {
            quantity: quantity.into(),
            value,
            min,
            max,
        }
    }

    /// Check `value` against an inclusive band, rejecting NaN and infinities.
    ///
    /// # Errors
    /// Returns [`CalculationError::InputRange`] if the value is not finite or lies
    /// outside `[min, max]`.
    pub fn check_range(quantity: &str, value: f64, min: f64, max: f64) -> Result<()> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(Self::input_range(quantity, value, min, max))
        }
    }
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationError::InputRange {
                quantity,
                value,
                min,
                max,
            } => write!(
                f,
                "Input out of range: {quantity} = {value} (allowed {min} to {max})"
            ),
            CalculationError::UnknownFuelType(label) => {
                write!(f, "{}: '{label}'", Self::UNKNOWN_FUEL_TYPE_PREFIX)
            }
            CalculationError::UnitMismatch { expected, found } => {
                write!(
                    f,
                    "{}: expected a {expected} unit, got '{found}'",
                    Self::UNIT_MISMATCH_PREFIX
                )
            }
            CalculationError::DivisionHazard { total_mass } => write!(
                f,
                "Division hazard: total mass {total_mass} kg is not positive, CG is undefined"
            ),
            CalculationError::ExtrapolationBlocked {
                table,
                axis,
                value,
                axis_max,
                buffer,
            } => write!(
                f,
                "Extrapolation blocked in '{table}': {axis} {value} exceeds table maximum {axis_max} by {:.1}% (limit 10%)",
                buffer * 100.0
            ),
            CalculationError::InvalidProfile(msg) => write!(f, "Invalid aircraft profile: {msg}"),
            CalculationError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
        }
    }
}

impl std::error::Error for CalculationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_start_with_stable_prefixes() {
        let fuel = CalculationError::UnknownFuelType("whale oil".to_string());
        assert!(fuel
            .to_string()
            .starts_with(CalculationError::UNKNOWN_FUEL_TYPE_PREFIX));
        let unit = CalculationError::UnitMismatch {
            expected: Dimension::Mass,
            found: "ft".to_string(),
        };
        assert!(unit
            .to_string()
            .starts_with(CalculationError::UNIT_MISMATCH_PREFIX));
    }

    #[test]
    fn test_check_range_inclusive_bounds() {
        assert!(CalculationError::check_range("t", -60.0, -60.0, 60.0).is_ok());
        assert!(CalculationError::check_range("t", 60.0, -60.0, 60.0).is_ok());
        assert!(CalculationError::check_range("t", 60.1, -60.0, 60.0).is_err());
    }

    #[test]
    fn test_check_range_rejects_nan() {
        let err = CalculationError::check_range("mass", f64::NAN, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, CalculationError::InputRange { .. }));
    }

    #[test]
    fn test_display_messages() {
        let err = CalculationError::DivisionHazard { total_mass: 0.0 };
        assert!(err.to_string().contains("not positive"));

        let err = CalculationError::UnitMismatch {
            expected: Dimension::Mass,
            found: "ft".to_string(),
        };
        assert_eq!(err.to_string(), "Unit mismatch: expected a mass unit, got 'ft'");
    }
}
