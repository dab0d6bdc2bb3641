//! Non-fatal findings and their aggregation
//!
//! Every component reports findings as [`WarningKind`] values. A [`Warning`]
//! wraps the kind with its derived severity, message and hazard reference, so
//! all findings share one shape. [`WarningAggregator`] orders them for the
//! caller and derives the overall status.

use crate::core_types::aircraft::EnvelopeCategory;
use crate::core_types::loading::FlightPhase;
use crate::core_types::units::{Kilograms, Knots, Liters, Meters};
use crate::envelope::Excursion;
use crate::performance::{PerformancePhase, TableAxis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How urgently a finding needs attention. Declaration order is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Advisory,
    Caution,
    Critical,
}

/// Highest severity among a set of warnings, or nominal when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Nominal,
    Advisory,
    Caution,
    Critical,
}

impl From<Severity> for OverallStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Advisory => OverallStatus::Advisory,
            Severity::Caution => OverallStatus::Caution,
            Severity::Critical => OverallStatus::Critical,
        }
    }
}

/// Entry in the system hazard log that a finding mitigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    #[serde(rename = "H-01")]
    UnitConfusion,
    #[serde(rename = "H-02")]
    Overweight,
    #[serde(rename = "H-05")]
    CgMigration,
    #[serde(rename = "H-07")]
    PerformanceExtrapolation,
    #[serde(rename = "H-11")]
    Tailwind,
    #[serde(rename = "H-13")]
    EnvelopeAccuracy,
}

impl Hazard {
    /// Hazard log identifier, e.g. `"H-05"`.
    pub fn reference(self) -> &'static str {
        match self {
            Hazard::UnitConfusion => "H-01",
            Hazard::Overweight => "H-02",
            Hazard::CgMigration => "H-05",
            Hazard::PerformanceExtrapolation => "H-07",
            Hazard::Tailwind => "H-11",
            Hazard::EnvelopeAccuracy => "H-13",
        }
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference())
    }
}

/// What was found, with the data needed to describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    /// Takeoff mass above the effective MTOM
    MtomExceeded { mass: Kilograms, limit: Kilograms },
    /// Landing mass above the maximum landing mass
    MlwExceeded { mass: Kilograms, limit: Kilograms },
    /// A phase CG point lies outside the envelope
    CgOutsideEnvelope {
        phase: FlightPhase,
        arm: Meters,
        mass: Kilograms,
        excursions: Vec<Excursion>,
    },
    /// The takeoff→landing CG path leaves the envelope
    CgMigration {
        fraction: f64,
        arm: Meters,
        mass: Kilograms,
    },
    /// The profile has no envelope for the requested category
    EnvelopeUnavailable { category: EnvelopeCategory },
    /// A station is loaded beyond its placarded maximum
    StationOverload {
        station: String,
        mass: Kilograms,
        limit: Kilograms,
    },
    /// Trip fuel is more than the usable fuel on board
    TripFuelExceedsUsable { requested: Liters, usable: Liters },
    /// A table value was extrapolated beyond certified data
    ExtrapolationUsed {
        table: String,
        axis: TableAxis,
        buffer: f64,
    },
    /// A table query below the grid was clamped to the lowest data point
    FloorClamped { table: String, axis: TableAxis },
    /// Tailwind component present
    Tailwind { component: Knots },
    /// Crosswind above the maximum demonstrated value
    CrosswindLimitExceeded { component: Knots, limit: Knots },
    /// No table for the phase; distances come from correction formulas
    AlgorithmicFallback { phase: PerformancePhase },
}

impl WarningKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            WarningKind::MtomExceeded { .. } => "MTOM_EXCEEDED",
            WarningKind::MlwExceeded { .. } => "MLW_EXCEEDED",
            WarningKind::CgOutsideEnvelope { .. } => "CG_OUTSIDE_ENVELOPE",
            WarningKind::CgMigration { .. } => "CG_MIGRATION",
            WarningKind::EnvelopeUnavailable { .. } => "ENVELOPE_UNAVAILABLE",
            WarningKind::StationOverload { .. } => "STATION_OVERLOAD",
            WarningKind::TripFuelExceedsUsable { .. } => "TRIP_FUEL_EXCEEDS_USABLE",
            WarningKind::ExtrapolationUsed { .. } => "EXTRAPOLATION_USED",
            WarningKind::FloorClamped { .. } => "FLOOR_CLAMPED",
            WarningKind::Tailwind { .. } => "TAILWIND",
            WarningKind::CrosswindLimitExceeded { .. } => "CROSSWIND_LIMIT_EXCEEDED",
            WarningKind::AlgorithmicFallback { .. } => "ALGORITHMIC_FALLBACK",
        }
    }

    /// Severity implied by the finding.
    pub fn severity(&self) -> Severity {
        match self {
            WarningKind::MtomExceeded { .. }
            | WarningKind::MlwExceeded { .. }
            | WarningKind::CgMigration { .. }
            | WarningKind::TripFuelExceedsUsable { .. } => Severity::Critical,
            WarningKind::CgOutsideEnvelope { phase, .. } => match phase {
                FlightPhase::ZeroFuel => Severity::Caution,
                FlightPhase::Takeoff | FlightPhase::Landing => Severity::Critical,
            },
            WarningKind::EnvelopeUnavailable { .. }
            | WarningKind::StationOverload { .. }
            | WarningKind::ExtrapolationUsed { .. }
            | WarningKind::CrosswindLimitExceeded { .. } => Severity::Caution,
            WarningKind::FloorClamped { .. }
            | WarningKind::Tailwind { .. }
            | WarningKind::AlgorithmicFallback { .. } => Severity::Advisory,
        }
    }

    /// Hazard log entry the finding relates to, if any.
    pub fn hazard(&self) -> Option<Hazard> {
        match self {
            WarningKind::MtomExceeded { .. }
            | WarningKind::MlwExceeded { .. }
            | WarningKind::StationOverload { .. } => Some(Hazard::Overweight),
            WarningKind::CgMigration { .. } => Some(Hazard::CgMigration),
            WarningKind::CgOutsideEnvelope { .. } | WarningKind::EnvelopeUnavailable { .. } => {
                Some(Hazard::EnvelopeAccuracy)
            }
            WarningKind::ExtrapolationUsed { .. } | WarningKind::FloorClamped { .. } => {
                Some(Hazard::PerformanceExtrapolation)
            }
            WarningKind::Tailwind { .. } => Some(Hazard::Tailwind),
            WarningKind::TripFuelExceedsUsable { .. }
            | WarningKind::CrosswindLimitExceeded { .. }
            | WarningKind::AlgorithmicFallback { .. } => None,
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::MtomExceeded { mass, limit } => {
                write!(f, "MTOM exceeded: takeoff mass {mass} > {limit}")
            }
            WarningKind::MlwExceeded { mass, limit } => {
                write!(f, "Maximum landing mass exceeded: {mass} > {limit}")
            }
            WarningKind::CgOutsideEnvelope {
                phase,
                arm,
                mass,
                excursions,
            } => {
                write!(f, "{phase} CG ({mass} @ {arm}) outside envelope")?;
                for (i, excursion) in excursions.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { ", " })?;
                    write!(f, "{excursion}")?;
                }
                Ok(())
            }
            WarningKind::CgMigration {
                fraction,
                arm,
                mass,
            } => write!(
                f,
                "CG leaves the envelope {:.0}% of the way from takeoff to landing ({mass} @ {arm})",
                fraction * 100.0
            ),
            WarningKind::EnvelopeUnavailable { category } => {
                write!(f, "No {category} CG envelope defined; CG limits not validated")
            }
            WarningKind::StationOverload {
                station,
                mass,
                limit,
            } => write!(f, "Station '{station}' loaded with {mass}, maximum {limit}"),
            WarningKind::TripFuelExceedsUsable { requested, usable } => write!(
                f,
                "Trip fuel {requested} exceeds usable fuel on board {usable}"
            ),
            WarningKind::ExtrapolationUsed {
                table,
                axis,
                buffer,
            } => write!(
                f,
                "Extrapolation used in '{table}': {axis} {:.1}% beyond certified data, 20% penalty applied",
                buffer * 100.0
            ),
            WarningKind::FloorClamped { table, axis } => write!(
                f,
                "'{table}': {axis} below certified data, lowest table value used"
            ),
            WarningKind::Tailwind { component } => {
                write!(f, "Tailwind component {component}")
            }
            WarningKind::CrosswindLimitExceeded { component, limit } => write!(
                f,
                "Crosswind {component} exceeds maximum demonstrated {limit}"
            ),
            WarningKind::AlgorithmicFallback { phase } => write!(
                f,
                "No {phase} performance table; distances estimated from correction formulas"
            ),
        }
    }
}

/// A classified finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    pub hazard: Option<Hazard>,
}

impl Warning {
    /// Classify a finding.
    pub fn new(kind: WarningKind) -> Self {
        Self {
            severity: kind.severity(),
            message: kind.to_string(),
            hazard: kind.hazard(),
            kind,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl From<WarningKind> for Warning {
    fn from(kind: WarningKind) -> Self {
        Warning::new(kind)
    }
}

/// Collects findings in emission order.
#[derive(Debug, Default, Clone)]
pub struct WarningAggregator {
    warnings: Vec<Warning>,
}

impl WarningAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding.
    pub fn push(&mut self, kind: WarningKind) {
        tracing::warn!(code = kind.code(), "{kind}");
        self.warnings.push(Warning::new(kind));
    }

    /// Record already-classified warnings, preserving their order.
    pub fn extend(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        for warning in warnings {
            tracing::warn!(code = warning.code(), "{}", warning.message);
            self.warnings.push(warning);
        }
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Order by descending severity and derive the overall status.
    ///
    /// The sort is stable: equal severities keep emission order. Nothing is
    /// dropped or merged, even when codes repeat.
    pub fn finish(self) -> (OverallStatus, Vec<Warning>) {
        let mut warnings = self.warnings;
        warnings.sort_by(|a, b| b.severity.cmp(&a.severity));
        let status = warnings
            .first()
            .map_or(OverallStatus::Nominal, |w| w.severity.into());
        (status, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tailwind(kt: f64) -> WarningKind {
        WarningKind::Tailwind {
            component: Knots::new(kt),
        }
    }

    #[test]
    fn test_empty_is_nominal() {
        let (status, warnings) = WarningAggregator::new().finish();
        assert_eq!(status, OverallStatus::Nominal);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_orders_by_severity_then_emission() {
        let mut agg = WarningAggregator::new();
        agg.push(tailwind(3.0));
        agg.push(WarningKind::EnvelopeUnavailable {
            category: EnvelopeCategory::Utility,
        });
        agg.push(WarningKind::MtomExceeded {
            mass: Kilograms::new(1250.0),
            limit: Kilograms::new(1150.0),
        });
        agg.push(tailwind(5.0));

        let (status, warnings) = agg.finish();
        assert_eq!(status, OverallStatus::Critical);
        let codes: Vec<_> = warnings.iter().map(Warning::code).collect();
        assert_eq!(
            codes,
            ["MTOM_EXCEEDED", "ENVELOPE_UNAVAILABLE", "TAILWIND", "TAILWIND"]
        );
        // Equal-severity warnings keep emission order
        assert_eq!(warnings[2].kind, tailwind(3.0));
        assert_eq!(warnings[3].kind, tailwind(5.0));
    }

    #[test]
    fn test_duplicate_codes_are_kept() {
        let mut agg = WarningAggregator::new();
        agg.push(tailwind(2.0));
        agg.push(tailwind(2.0));
        let (status, warnings) = agg.finish();
        assert_eq!(status, OverallStatus::Advisory);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_zero_fuel_excursion_is_caution() {
        let kind = WarningKind::CgOutsideEnvelope {
            phase: FlightPhase::ZeroFuel,
            arm: Meters::new(2.6),
            mass: Kilograms::new(900.0),
            excursions: vec![Excursion::Aft],
        };
        assert_eq!(kind.severity(), Severity::Caution);
        assert_eq!(kind.hazard(), Some(Hazard::EnvelopeAccuracy));
    }

    #[test]
    fn test_warning_serializes_code_tag() {
        let w = Warning::new(tailwind(4.0));
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"]["code"], "TAILWIND");
        assert_eq!(json["severity"], "advisory");
        assert_eq!(json["hazard"], "H-11");
    }
}
