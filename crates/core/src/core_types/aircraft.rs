//! Aircraft profile snapshot
//!
//! The profile is owned by an external store and handed to the core as an
//! immutable snapshot: stations, fuel tanks, CG envelopes and performance data.
//! [`AircraftProfile::validate`] runs before every calculation.

use super::units::{Kilograms, KgPerLiter, Knots, Liters, Meters};
use super::vec2::Vec2;
use crate::envelope::polygon;
use crate::error::{CalculationError, Result};
use crate::interpolation::{interpolate_clamped, Axis};
use crate::performance::table::PerformanceTable;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FUEL
// ============================================================================

/// Fuel grade with a fixed density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FuelType {
    Avgas100LL,
    AvgasUl91,
    Mogas,
    JetA1,
    Diesel,
}

impl FuelType {
    /// Density in kg/L.
    pub fn density(self) -> KgPerLiter {
        let kg_per_l = match self {
            FuelType::Avgas100LL | FuelType::Mogas => 0.72,
            FuelType::AvgasUl91 => 0.71,
            FuelType::JetA1 | FuelType::Diesel => 0.84,
        };
        KgPerLiter::new(kg_per_l)
    }

    /// Canonical label.
    pub fn label(self) -> &'static str {
        match self {
            FuelType::Avgas100LL => "AvGas 100LL",
            FuelType::AvgasUl91 => "AvGas UL91",
            FuelType::Mogas => "MoGas",
            FuelType::JetA1 => "Jet A-1",
            FuelType::Diesel => "Diesel",
        }
    }
}

impl FromStr for FuelType {
    type Err = CalculationError;

    fn from_str(label: &str) -> Result<Self> {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "avgas100ll" | "avgas" | "100ll" => Ok(FuelType::Avgas100LL),
            "avgasul91" | "ul91" => Ok(FuelType::AvgasUl91),
            "mogas" => Ok(FuelType::Mogas),
            "jeta1" | "jeta" => Ok(FuelType::JetA1),
            "diesel" => Ok(FuelType::Diesel),
            _ => Err(CalculationError::UnknownFuelType(label.to_string())),
        }
    }
}

impl TryFrom<String> for FuelType {
    type Error = CalculationError;

    fn try_from(label: String) -> Result<Self> {
        label.parse()
    }
}

impl From<FuelType> for String {
    fn from(fuel: FuelType) -> Self {
        fuel.label().to_string()
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fuel tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTank {
    pub name: String,
    /// Total capacity including unusable fuel
    pub capacity: Liters,
    /// Fuel that cannot be burned
    #[serde(default)]
    pub unusable: Liters,
    pub arm: Meters,
    pub fuel_type: FuelType,
    /// Lower values are burned first
    #[serde(default)]
    pub burn_order: u32,
}

impl FuelTank {
    /// Mass of `quantity` of this tank's fuel.
    pub fn fuel_mass(&self, quantity: Liters) -> Kilograms {
        quantity * self.fuel_type.density()
    }

    /// Burnable part of `quantity`.
    pub fn usable(&self, quantity: Liters) -> Liters {
        (quantity - self.unusable).max(Liters::ZERO)
    }
}

// ============================================================================
// STATIONS
// ============================================================================

/// One (mass, arm) point of a variable-arm station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPoint {
    pub mass: Kilograms,
    pub arm: Meters,
}

/// Arm as a function of station mass, strictly increasing in mass.
///
/// Lookups outside the table clamp to the end points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ArmPoint>", into = "Vec<ArmPoint>")]
pub struct ArmTable {
    masses: Axis,
    arms: Vec<f64>,
}

impl ArmTable {
    /// # Errors
    /// Returns [`CalculationError::InvalidProfile`] if masses are not strictly
    /// increasing, fewer than two points are given, or an arm is not finite.
    pub fn new(points: Vec<ArmPoint>) -> Result<Self> {
        let masses = Axis::new(points.iter().map(|p| p.mass.value()).collect())?;
        let arms: Vec<f64> = points.iter().map(|p| p.arm.value()).collect();
        if arms.iter().any(|a| !a.is_finite()) {
            return Err(CalculationError::InvalidProfile(
                "arm table contains a non-finite arm".to_string(),
            ));
        }
        Ok(Self { masses, arms })
    }

    /// Arm at `mass`.
    pub fn arm_at(&self, mass: Kilograms) -> Meters {
        Meters::new(interpolate_clamped(&self.masses, &self.arms, mass.value()))
    }
}

impl TryFrom<Vec<ArmPoint>> for ArmTable {
    type Error = CalculationError;

    fn try_from(points: Vec<ArmPoint>) -> Result<Self> {
        ArmTable::new(points)
    }
}

impl From<ArmTable> for Vec<ArmPoint> {
    fn from(table: ArmTable) -> Self {
        table
            .masses
            .points()
            .iter()
            .zip(&table.arms)
            .map(|(&m, &a)| ArmPoint {
                mass: Kilograms::new(m),
                arm: Meters::new(a),
            })
            .collect()
    }
}

/// Station arm: a single value, or a table for stations whose arm shifts with load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StationArm {
    Fixed(Meters),
    Variable(ArmTable),
}

impl StationArm {
    /// Arm for a station carrying `mass`.
    pub fn arm_at(&self, mass: Kilograms) -> Meters {
        match self {
            StationArm::Fixed(arm) => *arm,
            StationArm::Variable(table) => table.arm_at(mass),
        }
    }
}

/// A payload station (seat row, baggage area).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadStation {
    pub name: String,
    pub arm: StationArm,
    #[serde(default)]
    pub max_mass: Option<Kilograms>,
}

// ============================================================================
// ENVELOPES
// ============================================================================

/// Certification category an envelope applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeCategory {
    #[default]
    Normal,
    Utility,
    Aerobatic,
}

impl fmt::Display for EnvelopeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EnvelopeCategory::Normal => "normal",
            EnvelopeCategory::Utility => "utility",
            EnvelopeCategory::Aerobatic => "aerobatic",
        })
    }
}

/// Vertex of an envelope polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub arm: Meters,
    pub mass: Kilograms,
}

impl EnvelopePoint {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.arm.value(), self.mass.value())
    }
}

/// Weight/CG envelope for one category. The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftEnvelope {
    pub category: EnvelopeCategory,
    pub vertices: Vec<EnvelopePoint>,
    /// Category-specific MTOM, if lower than the aircraft's
    #[serde(default)]
    pub mtom: Option<Kilograms>,
}

impl AircraftEnvelope {
    /// Vertices on the (arm, mass) plane.
    pub fn polygon(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| v.to_vec2()).collect()
    }

    /// # Errors
    /// Returns [`CalculationError::InvalidProfile`] for fewer than three vertices,
    /// non-finite coordinates, or crossing edges.
    pub fn validate(&self) -> Result<()> {
        let poly = self.polygon();
        if poly.len() < 3 {
            return Err(CalculationError::InvalidProfile(format!(
                "{} envelope needs at least 3 vertices, got {}",
                self.category,
                poly.len()
            )));
        }
        if poly.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(CalculationError::InvalidProfile(format!(
                "{} envelope has a non-finite vertex",
                self.category
            )));
        }
        if !polygon::is_simple(&poly) {
            return Err(CalculationError::InvalidProfile(format!(
                "{} envelope polygon is self-intersecting",
                self.category
            )));
        }
        Ok(())
    }
}

// ============================================================================
// PERFORMANCE DATA
// ============================================================================

/// Distance tables for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceTables {
    pub ground_roll: PerformanceTable,
    /// Distance to or from a 50 ft / 15 m screen
    pub over_obstacle: PerformanceTable,
}

/// Sea-level ISA distances at MTOM, the starting point of the correction formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmicBase {
    pub takeoff_ground_roll: Meters,
    pub takeoff_over_obstacle: Meters,
    pub landing_ground_roll: Meters,
    pub landing_over_obstacle: Meters,
}

/// Everything the performance engine may draw on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceData {
    pub takeoff: Option<DistanceTables>,
    pub landing: Option<DistanceTables>,
    /// Rate of climb in ft/min
    pub climb: Option<PerformanceTable>,
    pub algorithmic: Option<AlgorithmicBase>,
}

impl PerformanceData {
    fn tables(&self) -> impl Iterator<Item = &PerformanceTable> {
        self.takeoff
            .iter()
            .chain(&self.landing)
            .flat_map(|t| [&t.ground_roll, &t.over_obstacle])
            .chain(&self.climb)
    }
}

// ============================================================================
// PROFILE
// ============================================================================

/// Snapshot of one aircraft's mass & balance and performance data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftProfile {
    pub registration: String,
    pub aircraft_type: String,
    pub empty_mass: Kilograms,
    pub empty_arm: Meters,
    pub mtom: Kilograms,
    #[serde(default)]
    pub max_landing_mass: Option<Kilograms>,
    /// Maximum demonstrated crosswind component
    #[serde(default)]
    pub max_crosswind: Option<Knots>,
    pub stations: Vec<LoadStation>,
    #[serde(default)]
    pub fuel_tanks: Vec<FuelTank>,
    #[serde(default)]
    pub envelopes: Vec<AircraftEnvelope>,
    #[serde(default)]
    pub performance: PerformanceData,
}

impl AircraftProfile {
    /// Envelope for `category`, if the profile defines one.
    pub fn envelope(&self, category: EnvelopeCategory) -> Option<&AircraftEnvelope> {
        self.envelopes.iter().find(|e| e.category == category)
    }

    /// MTOM for `category`: the lower of the aircraft MTOM and the envelope's own.
    pub fn effective_mtom(&self, category: EnvelopeCategory) -> Kilograms {
        self.envelope(category)
            .and_then(|e| e.mtom)
            .map_or(self.mtom, |m| m.min(self.mtom))
    }

    /// Landing limit: declared maximum landing mass, else the effective MTOM.
    pub fn landing_limit(&self, category: EnvelopeCategory) -> Kilograms {
        self.max_landing_mass
            .unwrap_or_else(|| self.effective_mtom(category))
    }

    pub fn station(&self, name: &str) -> Option<&LoadStation> {
        self.stations.iter().find(|s| s.name == name)
    }

    pub fn tank(&self, name: &str) -> Option<&FuelTank> {
        self.fuel_tanks.iter().find(|t| t.name == name)
    }

    /// Check the snapshot is structurally usable.
    ///
    /// # Errors
    /// Returns [`CalculationError::InvalidProfile`] on the first defect found.
    pub fn validate(&self) -> Result<()> {
        let positive = |what: &str, mass: Kilograms| {
            if mass.is_finite() && mass > Kilograms::ZERO {
                Ok(())
            } else {
                Err(CalculationError::InvalidProfile(format!(
                    "{what} must be positive, got {mass}"
                )))
            }
        };
        positive("empty mass", self.empty_mass)?;
        positive("MTOM", self.mtom)?;
        if let Some(mlm) = self.max_landing_mass {
            positive("max landing mass", mlm)?;
        }
        if !self.empty_arm.is_finite() {
            return Err(CalculationError::InvalidProfile(
                "empty arm is not finite".to_string(),
            ));
        }

        let mut names = FxHashSet::default();
        for station in &self.stations {
            if !names.insert(station.name.as_str()) {
                return Err(CalculationError::InvalidProfile(format!(
                    "duplicate station '{}'",
                    station.name
                )));
            }
            if let StationArm::Fixed(arm) = station.arm {
                if !arm.is_finite() {
                    return Err(CalculationError::InvalidProfile(format!(
                        "station '{}' arm is not finite",
                        station.name
                    )));
                }
            }
        }

        let mut names = FxHashSet::default();
        for tank in &self.fuel_tanks {
            if !names.insert(tank.name.as_str()) {
                return Err(CalculationError::InvalidProfile(format!(
                    "duplicate fuel tank '{}'",
                    tank.name
                )));
            }
            if !(tank.capacity.is_finite() && tank.capacity > Liters::ZERO)
                || !(tank.unusable >= Liters::ZERO && tank.unusable <= tank.capacity)
                || !tank.arm.is_finite()
            {
                return Err(CalculationError::InvalidProfile(format!(
                    "fuel tank '{}' has inconsistent capacity, unusable fuel, or arm",
                    tank.name
                )));
            }
        }

        let mut categories = FxHashSet::default();
        for envelope in &self.envelopes {
            if !categories.insert(envelope.category) {
                return Err(CalculationError::InvalidProfile(format!(
                    "duplicate {} envelope",
                    envelope.category
                )));
            }
            envelope.validate()?;
        }

        for table in self.performance.tables() {
            table.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tank() -> FuelTank {
        FuelTank {
            name: "Main".to_string(),
            capacity: Liters::new(150.0),
            unusable: Liters::new(5.0),
            arm: Meters::new(2.4),
            fuel_type: FuelType::Avgas100LL,
            burn_order: 0,
        }
    }

    fn profile() -> AircraftProfile {
        AircraftProfile {
            registration: "VH-TST".to_string(),
            aircraft_type: "Test".to_string(),
            empty_mass: Kilograms::new(750.0),
            empty_arm: Meters::new(2.3),
            mtom: Kilograms::new(1150.0),
            max_landing_mass: None,
            max_crosswind: None,
            stations: vec![LoadStation {
                name: "Pilot".to_string(),
                arm: StationArm::Fixed(Meters::new(2.05)),
                max_mass: None,
            }],
            fuel_tanks: vec![tank()],
            envelopes: vec![AircraftEnvelope {
                category: EnvelopeCategory::Normal,
                vertices: vec![
                    EnvelopePoint {
                        arm: Meters::new(2.0),
                        mass: Kilograms::new(600.0),
                    },
                    EnvelopePoint {
                        arm: Meters::new(2.6),
                        mass: Kilograms::new(600.0),
                    },
                    EnvelopePoint {
                        arm: Meters::new(2.6),
                        mass: Kilograms::new(1150.0),
                    },
                ],
                mtom: Some(Kilograms::new(1100.0)),
            }],
            performance: PerformanceData::default(),
        }
    }

    #[test]
    fn test_fuel_densities() {
        assert_relative_eq!(FuelType::Avgas100LL.density().value(), 0.72);
        assert_relative_eq!(FuelType::AvgasUl91.density().value(), 0.71);
        assert_relative_eq!(FuelType::JetA1.density().value(), 0.84);
    }

    #[test]
    fn test_fuel_type_parsing() {
        assert_eq!("AvGas 100LL".parse::<FuelType>().unwrap(), FuelType::Avgas100LL);
        assert_eq!("jet a-1".parse::<FuelType>().unwrap(), FuelType::JetA1);
        assert_eq!("UL91".parse::<FuelType>().unwrap(), FuelType::AvgasUl91);
        assert_eq!(
            "kerosene".parse::<FuelType>().unwrap_err(),
            CalculationError::UnknownFuelType("kerosene".to_string())
        );
    }

    #[test]
    fn test_bare_avgas_means_100ll() {
        assert_eq!("avgas".parse::<FuelType>().unwrap(), FuelType::Avgas100LL);
        let fuel: FuelType = serde_json::from_str(r#""AVGAS""#).unwrap();
        assert_eq!(fuel, FuelType::Avgas100LL);
    }

    #[test]
    fn test_unknown_fuel_type_fails_deserialization() {
        let err = serde_json::from_str::<FuelType>(r#""whale oil""#).unwrap_err();
        assert!(err.to_string().contains("Unknown fuel type"));
    }

    #[test]
    fn test_fuel_mass_and_usable() {
        let t = tank();
        assert_relative_eq!(t.fuel_mass(Liters::new(120.0)).value(), 86.4, epsilon = 1e-9);
        assert_eq!(t.usable(Liters::new(3.0)), Liters::ZERO);
        assert_eq!(t.usable(Liters::new(45.0)), Liters::new(40.0));
    }

    #[test]
    fn test_arm_table_clamps_at_ends() {
        let table = ArmTable::new(vec![
            ArmPoint {
                mass: Kilograms::new(0.0),
                arm: Meters::new(3.0),
            },
            ArmPoint {
                mass: Kilograms::new(40.0),
                arm: Meters::new(3.4),
            },
        ])
        .unwrap();
        assert_relative_eq!(table.arm_at(Kilograms::new(20.0)).value(), 3.2);
        assert_relative_eq!(table.arm_at(Kilograms::new(80.0)).value(), 3.4);
    }

    #[test]
    fn test_station_arm_deserializes_fixed_and_variable() {
        let fixed: StationArm = serde_json::from_str("2.05").unwrap();
        assert_eq!(fixed, StationArm::Fixed(Meters::new(2.05)));
        let tagged: StationArm = serde_json::from_str(r#"{"value": 100, "unit": "in"}"#).unwrap();
        assert_relative_eq!(tagged.arm_at(Kilograms::ZERO).value(), 2.54, epsilon = 1e-12);
        let variable: StationArm =
            serde_json::from_str(r#"[{"mass": 0, "arm": 3.0}, {"mass": 50, "arm": 3.5}]"#).unwrap();
        assert_relative_eq!(variable.arm_at(Kilograms::new(25.0)).value(), 3.25);
    }

    #[test]
    fn test_effective_mtom_uses_lower_envelope_limit() {
        let p = profile();
        assert_eq!(p.effective_mtom(EnvelopeCategory::Normal), Kilograms::new(1100.0));
        assert_eq!(p.effective_mtom(EnvelopeCategory::Utility), Kilograms::new(1150.0));
        assert_eq!(p.landing_limit(EnvelopeCategory::Normal), Kilograms::new(1100.0));
    }

    #[test]
    fn test_validate_accepts_well_formed_profile() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_station() {
        let mut p = profile();
        p.stations.push(p.stations[0].clone());
        assert!(matches!(p.validate(), Err(CalculationError::InvalidProfile(_))));
    }

    #[test]
    fn test_validate_rejects_bow_tie_envelope() {
        let mut p = profile();
        p.envelopes[0].vertices = [(2.0, 600.0), (2.6, 1150.0), (2.6, 600.0), (2.0, 1150.0)]
            .into_iter()
            .map(|(a, m)| EnvelopePoint {
                arm: Meters::new(a),
                mass: Kilograms::new(m),
            })
            .collect();
        assert!(matches!(p.validate(), Err(CalculationError::InvalidProfile(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_mtom() {
        let mut p = profile();
        p.mtom = Kilograms::ZERO;
        assert!(p.validate().is_err());
    }
}
