//! Semantic unit types for type-safe physical quantity handling
//!
//! This module provides newtype wrappers for physical quantities to prevent
//! accidental mixing of incompatible units (e.g., kilograms with pounds, or
//! feet with meters). Unit confusion is the dominant hazard class in weight
//! and balance work, so every API that accepts a mass takes a mass type, never
//! a raw number.
//!
//! # Design Philosophy
//! - All types wrap `f64`
//! - No `Deref`, no `From<f64>`: the raw number is reachable only through `value()`
//! - Arithmetic is linear within one unit (`Add`, `Sub`, `Mul<f64>`, `Div<f64>`)
//! - Crossing dimensions is limited to dimensioned products (mass × arm = moment,
//!   volume × density = mass); everything else goes through named conversions
//! - Total ordering via `Ord` (`f64::total_cmp`)
//! - Serialize as a bare number in the canonical unit; deserialize from a bare
//!   number or a `{"value": .., "unit": ".."}` object checked against the dimension
//!
//! # Usage
//! ```
//! use flightcalc_core::core_types::units::{Kilograms, Meters, Pounds};
//!
//! let mass = Pounds::new(2200.0).to_kilograms();
//! assert!((mass.value() - 997.903).abs() < 0.001);
//!
//! let moment = Kilograms::new(85.0) * Meters::new(2.05);
//! assert!((moment.value() - 174.25).abs() < 1e-9);
//! ```

use crate::error::CalculationError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// ============================================================================
// CONVERSION CONSTANTS
// ============================================================================

/// Kilograms per avoirdupois pound (exact by definition)
const KG_PER_LB: f64 = 0.45359237;

/// Meters per international foot (exact by definition)
const M_PER_FT: f64 = 0.3048;

/// Meters per inch (exact by definition)
const M_PER_IN: f64 = 0.0254;

/// Liters per US liquid gallon (exact by definition)
const L_PER_US_GAL: f64 = 3.785411784;

/// Hectopascals per inch of mercury (0 °C reference)
const HPA_PER_INHG: f64 = 33.8638866667;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// DIMENSIONS AND UNIT SYMBOLS
// ============================================================================

/// Physical dimension of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Mass,
    Length,
    Volume,
    Pressure,
    Temperature,
    Speed,
    VerticalSpeed,
    Moment,
    Density,
    Ratio,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Mass => "mass",
            Dimension::Length => "length",
            Dimension::Volume => "volume",
            Dimension::Pressure => "pressure",
            Dimension::Temperature => "temperature",
            Dimension::Speed => "speed",
            Dimension::VerticalSpeed => "vertical speed",
            Dimension::Moment => "moment",
            Dimension::Density => "density",
            Dimension::Ratio => "ratio",
        };
        f.write_str(name)
    }
}

/// A concrete unit of measure, as named by a unit tag in incoming data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Kilogram,
    Pound,
    Meter,
    Foot,
    Inch,
    Liter,
    UsGallon,
    Hectopascal,
    InchOfMercury,
    Celsius,
    Fahrenheit,
    Knot,
    FootPerMinute,
    KilogramMeter,
    KilogramPerLiter,
    Percent,
}

impl Unit {
    /// Parse a unit symbol. Symbols are matched exactly, except that a leading
    /// degree sign on temperatures is optional.
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        let unit = match symbol.trim() {
            "kg" => Unit::Kilogram,
            "lb" | "lbs" => Unit::Pound,
            "m" => Unit::Meter,
            "ft" => Unit::Foot,
            "in" => Unit::Inch,
            "L" | "l" => Unit::Liter,
            "gal" | "USgal" => Unit::UsGallon,
            "hPa" | "mbar" => Unit::Hectopascal,
            "inHg" => Unit::InchOfMercury,
            "C" | "°C" => Unit::Celsius,
            "F" | "°F" => Unit::Fahrenheit,
            "kt" | "kts" => Unit::Knot,
            "fpm" | "ft/min" => Unit::FootPerMinute,
            "kg·m" | "kgm" | "kg m" => Unit::KilogramMeter,
            "kg/L" | "kg/l" => Unit::KilogramPerLiter,
            "%" => Unit::Percent,
            _ => return None,
        };
        Some(unit)
    }

    /// The dimension this unit measures.
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Kilogram | Unit::Pound => Dimension::Mass,
            Unit::Meter | Unit::Foot | Unit::Inch => Dimension::Length,
            Unit::Liter | Unit::UsGallon => Dimension::Volume,
            Unit::Hectopascal | Unit::InchOfMercury => Dimension::Pressure,
            Unit::Celsius | Unit::Fahrenheit => Dimension::Temperature,
            Unit::Knot => Dimension::Speed,
            Unit::FootPerMinute => Dimension::VerticalSpeed,
            Unit::KilogramMeter => Dimension::Moment,
            Unit::KilogramPerLiter => Dimension::Density,
            Unit::Percent => Dimension::Ratio,
        }
    }

    /// Express `value` (in this unit) in the dimension's canonical unit.
    fn to_canonical(self, value: f64) -> f64 {
        match self {
            Unit::Pound => value * KG_PER_LB,
            Unit::Foot => value * M_PER_FT,
            Unit::Inch => value * M_PER_IN,
            Unit::UsGallon => value * L_PER_US_GAL,
            Unit::InchOfMercury => value * HPA_PER_INHG,
            Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            _ => value,
        }
    }

    /// Express a canonical-unit `value` in this unit.
    fn from_canonical(self, value: f64) -> f64 {
        match self {
            Unit::Pound => value / KG_PER_LB,
            Unit::Foot => value / M_PER_FT,
            Unit::Inch => value / M_PER_IN,
            Unit::UsGallon => value / L_PER_US_GAL,
            Unit::InchOfMercury => value / HPA_PER_INHG,
            Unit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
            _ => value,
        }
    }
}

/// A unit-tagged scalar.
pub trait Quantity: Copy {
    /// Dimension of the quantity
    const DIMENSION: Dimension;
    /// Unit the wrapped number is expressed in
    const UNIT: Unit;

    /// Build from a value in `unit`, converting as needed.
    /// Returns `None` if `unit` measures a different dimension.
    fn from_unit(value: f64, unit: Unit) -> Option<Self>;

    /// The raw number in [`Quantity::UNIT`].
    fn raw(self) -> f64;
}

/// Parse a tagged value into a quantity, converting within the dimension.
///
/// # Errors
/// Returns [`CalculationError::UnitMismatch`] if the symbol is unknown or names a
/// unit of a different dimension.
///
/// ```
/// use flightcalc_core::core_types::units::{parse_quantity, Kilograms};
///
/// let m: Kilograms = parse_quantity(2000.0, "lb").unwrap();
/// assert!((m.value() - 907.18474).abs() < 1e-9);
/// assert!(parse_quantity::<Kilograms>(2000.0, "ft").is_err());
/// ```
pub fn parse_quantity<Q: Quantity>(value: f64, symbol: &str) -> Result<Q, CalculationError> {
    Unit::from_symbol(symbol)
        .and_then(|unit| Q::from_unit(value, unit))
        .ok_or_else(|| CalculationError::UnitMismatch {
            expected: Q::DIMENSION,
            found: symbol.to_string(),
        })
}

/// Wire shape accepted for any quantity.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Bare(f64),
    Tagged { value: f64, unit: String },
}

fn deserialize_quantity<'de, Q, D>(deserializer: D) -> Result<Q, D::Error>
where
    Q: Quantity,
    D: Deserializer<'de>,
{
    match QuantityRepr::deserialize(deserializer)? {
        QuantityRepr::Bare(value) => Q::from_unit(value, Q::UNIT)
            .ok_or_else(|| D::Error::custom("quantity has no canonical unit")),
        QuantityRepr::Tagged { value, unit } => {
            parse_quantity(value, &unit).map_err(D::Error::custom)
        }
    }
}

// ============================================================================
// SHARED BOILERPLATE
// ============================================================================

/// Newtype, ordering, accessors, `Display`, `Serialize`.
macro_rules! scalar_unit {
    ($(#[$meta:meta])* $name:ident, $symbol:literal, $precision:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
        #[repr(transparent)]
        pub struct $name(f64);

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                f64_total_cmp(self.0, other.0)
            }
        }

        impl $name {
            /// Wrap a raw value expressed in this unit.
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                $name(value)
            }

            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// True when the wrapped value is neither NaN nor infinite.
            #[inline]
            #[must_use]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.*} {}", $precision, self.0, $symbol)
            }
        }
    };
}

/// `Quantity` + tagged `Deserialize`.
macro_rules! tagged_quantity {
    ($name:ident, $dimension:expr, $unit:expr) => {
        impl Quantity for $name {
            const DIMENSION: Dimension = $dimension;
            const UNIT: Unit = $unit;

            fn from_unit(value: f64, unit: Unit) -> Option<Self> {
                (unit.dimension() == Self::DIMENSION)
                    .then(|| $name(Self::UNIT.from_canonical(unit.to_canonical(value))))
            }

            fn raw(self) -> f64 {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_quantity(deserializer)
            }
        }
    };
}

/// Same-unit linear arithmetic.
macro_rules! linear_ops {
    ($name:ident) => {
        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        // Same-unit ratio is dimensionless
        impl Div for $name {
            type Output = f64;
            fn div(self, rhs: $name) -> f64 {
                self.0 / rhs.0
            }
        }

        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                $name(iter.map(|q| q.0).sum())
            }
        }

        impl<'a> Sum<&'a $name> for $name {
            fn sum<I: Iterator<Item = &'a $name>>(iter: I) -> $name {
                $name(iter.map(|q| q.0).sum())
            }
        }

        impl $name {
            /// Zero in this unit.
            pub const ZERO: $name = $name(0.0);

            /// Absolute value.
            #[inline]
            #[must_use]
            pub fn abs(self) -> Self {
                $name(self.0.abs())
            }
        }
    };
}

// ============================================================================
// MASS TYPES
// ============================================================================

scalar_unit!(
    /// Mass in kilograms
    Kilograms, "kg", 1
);
tagged_quantity!(Kilograms, Dimension::Mass, Unit::Kilogram);
linear_ops!(Kilograms);

scalar_unit!(
    /// Mass in avoirdupois pounds
    Pounds, "lb", 1
);
tagged_quantity!(Pounds, Dimension::Mass, Unit::Pound);
linear_ops!(Pounds);

impl Kilograms {
    /// Convert to pounds
    #[inline]
    #[must_use]
    pub fn to_pounds(self) -> Pounds {
        Pounds(self.0 / KG_PER_LB)
    }
}

impl Pounds {
    /// Convert to kilograms
    #[inline]
    #[must_use]
    pub fn to_kilograms(self) -> Kilograms {
        Kilograms(self.0 * KG_PER_LB)
    }
}

// Cross-type operation: mass × arm = moment
impl Mul<Meters> for Kilograms {
    type Output = KilogramMeters;
    fn mul(self, rhs: Meters) -> KilogramMeters {
        KilogramMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// LENGTH TYPES
// ============================================================================

scalar_unit!(
    /// Length in meters (arms, distances)
    Meters, "m", 3
);
tagged_quantity!(Meters, Dimension::Length, Unit::Meter);
linear_ops!(Meters);

scalar_unit!(
    /// Length in feet (altitudes, elevations)
    Feet, "ft", 0
);
tagged_quantity!(Feet, Dimension::Length, Unit::Foot);
linear_ops!(Feet);

scalar_unit!(
    /// Length in inches (arms in US-format weight and balance data)
    Inches, "in", 2
);
tagged_quantity!(Inches, Dimension::Length, Unit::Inch);
linear_ops!(Inches);

impl Meters {
    /// Convert to feet
    #[inline]
    #[must_use]
    pub fn to_feet(self) -> Feet {
        Feet(self.0 / M_PER_FT)
    }

    /// Convert to inches
    #[inline]
    #[must_use]
    pub fn to_inches(self) -> Inches {
        Inches(self.0 / M_PER_IN)
    }
}

impl Feet {
    /// Convert to meters
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * M_PER_FT)
    }
}

impl Inches {
    /// Convert to meters
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * M_PER_IN)
    }
}

// Cross-type operation: arm × mass = moment
impl Mul<Kilograms> for Meters {
    type Output = KilogramMeters;
    fn mul(self, rhs: Kilograms) -> KilogramMeters {
        KilogramMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// VOLUME / DENSITY TYPES
// ============================================================================

scalar_unit!(
    /// Fuel volume in liters
    Liters, "L", 1
);
tagged_quantity!(Liters, Dimension::Volume, Unit::Liter);
linear_ops!(Liters);

scalar_unit!(
    /// Fuel volume in US gallons
    UsGallons, "gal", 2
);
tagged_quantity!(UsGallons, Dimension::Volume, Unit::UsGallon);
linear_ops!(UsGallons);

impl Liters {
    /// Convert to US gallons
    #[inline]
    #[must_use]
    pub fn to_us_gallons(self) -> UsGallons {
        UsGallons(self.0 / L_PER_US_GAL)
    }
}

impl UsGallons {
    /// Convert to liters
    #[inline]
    #[must_use]
    pub fn to_liters(self) -> Liters {
        Liters(self.0 * L_PER_US_GAL)
    }
}

scalar_unit!(
    /// Fuel density in kg/L
    KgPerLiter, "kg/L", 3
);
tagged_quantity!(KgPerLiter, Dimension::Density, Unit::KilogramPerLiter);

// Cross-type operation: volume × density = mass
impl Mul<KgPerLiter> for Liters {
    type Output = Kilograms;
    fn mul(self, rhs: KgPerLiter) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

// ============================================================================
// MOMENT
// ============================================================================

scalar_unit!(
    /// Moment (mass × arm) in kg·m
    KilogramMeters, "kg·m", 2
);
tagged_quantity!(KilogramMeters, Dimension::Moment, Unit::KilogramMeter);
linear_ops!(KilogramMeters);

// ============================================================================
// PRESSURE
// ============================================================================

scalar_unit!(
    /// Pressure in hectopascals (QNH)
    Hectopascals, "hPa", 2
);
tagged_quantity!(Hectopascals, Dimension::Pressure, Unit::Hectopascal);
linear_ops!(Hectopascals);

scalar_unit!(
    /// Pressure in inches of mercury (altimeter setting)
    InchesOfMercury, "inHg", 2
);
tagged_quantity!(InchesOfMercury, Dimension::Pressure, Unit::InchOfMercury);
linear_ops!(InchesOfMercury);

impl Hectopascals {
    /// Convert to inches of mercury
    #[inline]
    #[must_use]
    pub fn to_inches_of_mercury(self) -> InchesOfMercury {
        InchesOfMercury(self.0 / HPA_PER_INHG)
    }
}

impl InchesOfMercury {
    /// Convert to hectopascals
    #[inline]
    #[must_use]
    pub fn to_hectopascals(self) -> Hectopascals {
        Hectopascals(self.0 * HPA_PER_INHG)
    }
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

scalar_unit!(
    /// Temperature in degrees Celsius
    Celsius, "°C", 1
);
tagged_quantity!(Celsius, Dimension::Temperature, Unit::Celsius);

scalar_unit!(
    /// Temperature in degrees Fahrenheit
    Fahrenheit, "°F", 1
);
tagged_quantity!(Fahrenheit, Dimension::Temperature, Unit::Fahrenheit);

impl Celsius {
    /// Convert to Fahrenheit
    #[inline]
    #[must_use]
    pub fn to_fahrenheit(self) -> Fahrenheit {
        Fahrenheit(Unit::Fahrenheit.from_canonical(self.0))
    }
}

impl Fahrenheit {
    /// Convert to Celsius
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius(Unit::Fahrenheit.to_canonical(self.0))
    }
}

scalar_unit!(
    /// Temperature difference in Celsius degrees (e.g. ISA deviation)
    CelsiusDelta, "°C", 1
);
linear_ops!(CelsiusDelta);

impl<'de> Deserialize<'de> for CelsiusDelta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(CelsiusDelta)
    }
}

// Celsius - Celsius = CelsiusDelta (difference between two absolute temperatures)
impl Sub for Celsius {
    type Output = CelsiusDelta;
    fn sub(self, rhs: Celsius) -> CelsiusDelta {
        CelsiusDelta(self.0 - rhs.0)
    }
}

// Celsius + CelsiusDelta = Celsius
impl Add<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn add(self, rhs: CelsiusDelta) -> Celsius {
        Celsius(self.0 + rhs.0)
    }
}

// Celsius - CelsiusDelta = Celsius
impl Sub<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn sub(self, rhs: CelsiusDelta) -> Celsius {
        Celsius(self.0 - rhs.0)
    }
}

// ============================================================================
// SPEED TYPES
// ============================================================================

scalar_unit!(
    /// Wind component in knots
    Knots, "kt", 1
);
tagged_quantity!(Knots, Dimension::Speed, Unit::Knot);
linear_ops!(Knots);

scalar_unit!(
    /// Rate of climb in feet per minute
    FeetPerMinute, "fpm", 0
);
tagged_quantity!(FeetPerMinute, Dimension::VerticalSpeed, Unit::FootPerMinute);
linear_ops!(FeetPerMinute);

// ============================================================================
// RATIO
// ============================================================================

scalar_unit!(
    /// Percentage (runway slope, corrections)
    Percent, "%", 1
);
tagged_quantity!(Percent, Dimension::Ratio, Unit::Percent);
linear_ops!(Percent);

impl Percent {
    /// Express as a fraction (50% -> 0.5)
    #[inline]
    #[must_use]
    pub fn as_fraction(self) -> f64 {
        self.0 / 100.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
