//! Per-flight loading input

use super::units::{Kilograms, Liters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mass placed at a named station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLoad {
    pub station: String,
    pub mass: Kilograms,
}

/// Fuel quantity in a named tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankLoad {
    pub tank: String,
    pub quantity: Liters,
}

/// What is on board for one flight.
///
/// Stations and tanks the profile defines but the loading omits are empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadingInput {
    #[serde(default)]
    pub stations: Vec<StationLoad>,
    #[serde(default)]
    pub fuel: Vec<TankLoad>,
    /// Fuel burned between takeoff and landing
    #[serde(default)]
    pub trip_fuel: Liters,
}

impl LoadingInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a station mass.
    pub fn with_station(mut self, station: impl Into<String>, mass: Kilograms) -> Self {
        self.stations.push(StationLoad {
            station: station.into(),
            mass,
        });
        self
    }

    /// Add a tank quantity.
    pub fn with_fuel(mut self, tank: impl Into<String>, quantity: Liters) -> Self {
        self.fuel.push(TankLoad {
            tank: tank.into(),
            quantity,
        });
        self
    }

    /// Set the trip fuel.
    pub fn with_trip_fuel(mut self, trip_fuel: Liters) -> Self {
        self.trip_fuel = trip_fuel;
        self
    }
}

/// Point in the flight at which mass and CG are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    ZeroFuel,
    Takeoff,
    Landing,
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlightPhase::ZeroFuel => "Zero-fuel",
            FlightPhase::Takeoff => "Takeoff",
            FlightPhase::Landing => "Landing",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_defaults() {
        let loading = LoadingInput::new()
            .with_station("Pilot", Kilograms::new(85.0))
            .with_fuel("Main", Liters::new(120.0))
            .with_trip_fuel(Liters::new(45.0));
        assert_eq!(loading.stations.len(), 1);
        assert_eq!(loading.fuel[0].tank, "Main");

        let parsed: LoadingInput = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.trip_fuel, Liters::ZERO);
    }

    #[test]
    fn test_tagged_loading_converts_units() {
        let parsed: LoadingInput = serde_json::from_str(
            r#"{"stations": [{"station": "Pilot", "mass": {"value": 187.39, "unit": "lb"}}],
                "fuel": [{"tank": "Main", "quantity": {"value": 10, "unit": "gal"}}]}"#,
        )
        .unwrap();
        assert!((parsed.stations[0].mass.value() - 85.0).abs() < 0.01);
        assert!((parsed.fuel[0].quantity.value() - 37.854).abs() < 0.001);
    }

    #[test]
    fn test_wrong_dimension_tag_is_rejected() {
        let err = serde_json::from_str::<LoadingInput>(
            r#"{"stations": [{"station": "Pilot", "mass": {"value": 85, "unit": "L"}}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unit mismatch"));
    }
}
