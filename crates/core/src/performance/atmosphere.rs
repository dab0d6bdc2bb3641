//! Standard-atmosphere helpers
//!
//! Fixed formulas; none of the coefficients are configurable.

use crate::config::limits::{
    DENSITY_ALTITUDE_FT_PER_C, FEET_PER_HPA, ISA_LAPSE_PER_1000_FT, ISA_SEA_LEVEL_C,
    STANDARD_QNH_HPA,
};
use crate::core_types::units::{Celsius, CelsiusDelta, Feet, Hectopascals};

/// Pressure altitude from field elevation and QNH: `elevation + (1013.25 - QNH) * 30`.
pub fn pressure_altitude(elevation: Feet, qnh: Hectopascals) -> Feet {
    elevation + Feet::new((STANDARD_QNH_HPA - qnh.value()) * FEET_PER_HPA)
}

/// ISA temperature at a pressure altitude.
pub fn isa_temperature(pressure_altitude: Feet) -> Celsius {
    Celsius::new(ISA_SEA_LEVEL_C - ISA_LAPSE_PER_1000_FT * pressure_altitude.value() / 1000.0)
}

/// Deviation of the outside air temperature from ISA.
pub fn isa_deviation(pressure_altitude: Feet, temperature: Celsius) -> CelsiusDelta {
    temperature - isa_temperature(pressure_altitude)
}

/// Density altitude: `PA + 118.8 * ISA deviation`.
pub fn density_altitude(pressure_altitude: Feet, temperature: Celsius) -> Feet {
    let deviation = isa_deviation(pressure_altitude, temperature);
    pressure_altitude + Feet::new(DENSITY_ALTITUDE_FT_PER_C * deviation.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pressure_altitude_formula() {
        let pa = pressure_altitude(Feet::new(6588.0), Hectopascals::new(1013.0));
        assert_relative_eq!(pa.value(), 6595.5, epsilon = 1e-9);

        let pa = pressure_altitude(Feet::new(500.0), Hectopascals::new(1003.25));
        assert_relative_eq!(pa.value(), 800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_isa_temperature() {
        assert_relative_eq!(isa_temperature(Feet::ZERO).value(), 15.0);
        assert_relative_eq!(isa_temperature(Feet::new(5000.0)).value(), 5.085, epsilon = 1e-9);
    }

    #[test]
    fn test_density_altitude_hot_day() {
        // ISA at 5000 ft is 5.085 °C; 25.085 °C is ISA+20
        let da = density_altitude(Feet::new(5000.0), Celsius::new(25.085));
        assert_relative_eq!(da.value(), 5000.0 + 118.8 * 20.0, epsilon = 1e-6);
    }

    #[test]
    fn test_density_altitude_equals_pressure_altitude_at_isa() {
        let pa = Feet::new(3000.0);
        let da = density_altitude(pa, isa_temperature(pa));
        assert_relative_eq!(da.value(), pa.value(), epsilon = 1e-9);
    }
}
