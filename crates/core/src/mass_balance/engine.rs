//! Profile + loading → mass & balance result

use super::fuel::burn_trip_fuel;
use super::moment::{cg_position, total_mass, total_moment, LoadedItem};
use super::{CgPoint, MassBalanceResult};
use crate::config::CalculationOptions;
use crate::core_types::aircraft::{AircraftProfile, FuelTank, LoadStation};
use crate::core_types::loading::{FlightPhase, LoadingInput};
use crate::core_types::units::{Kilograms, Liters};
use crate::core_types::Vec2;
use crate::envelope::{classify, migration_check, MigrationOutcome};
use crate::error::{CalculationError, Result};
use crate::warnings::{WarningAggregator, WarningKind};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

/// Station masses and tank quantities matched to the profile, in profile order.
struct ResolvedLoading<'a> {
    stations: Vec<(&'a LoadStation, Kilograms)>,
    tanks: Vec<(&'a FuelTank, Liters)>,
}

fn resolve<'a>(
    profile: &'a AircraftProfile,
    loading: &LoadingInput,
) -> Result<ResolvedLoading<'a>> {
    let mut station_mass: FxHashMap<&str, Kilograms> = FxHashMap::default();
    for load in &loading.stations {
        if profile.station(&load.station).is_none() {
            return Err(CalculationError::InvalidInput(format!(
                "unknown station '{}'",
                load.station
            )));
        }
        CalculationError::check_range(
            &format!("mass at station '{}' (kg)", load.station),
            load.mass.value(),
            0.0,
            f64::MAX,
        )?;
        if station_mass.insert(&load.station, load.mass).is_some() {
            return Err(CalculationError::InvalidInput(format!(
                "station '{}' listed more than once",
                load.station
            )));
        }
    }

    let mut tank_quantity: FxHashMap<&str, Liters> = FxHashMap::default();
    for load in &loading.fuel {
        let Some(tank) = profile.tank(&load.tank) else {
            return Err(CalculationError::InvalidInput(format!(
                "unknown fuel tank '{}'",
                load.tank
            )));
        };
        CalculationError::check_range(
            &format!("fuel in tank '{}' (L)", load.tank),
            load.quantity.value(),
            0.0,
            tank.capacity.value(),
        )?;
        if tank_quantity.insert(&load.tank, load.quantity).is_some() {
            return Err(CalculationError::InvalidInput(format!(
                "fuel tank '{}' listed more than once",
                load.tank
            )));
        }
    }

    CalculationError::check_range("trip fuel (L)", loading.trip_fuel.value(), 0.0, f64::MAX)?;

    Ok(ResolvedLoading {
        stations: profile
            .stations
            .iter()
            .map(|s| (s, station_mass.get(s.name.as_str()).copied().unwrap_or_default()))
            .collect(),
        tanks: profile
            .fuel_tanks
            .iter()
            .map(|t| (t, tank_quantity.get(t.name.as_str()).copied().unwrap_or_default()))
            .collect(),
    })
}

fn fuel_items(
    tanks: &[(&FuelTank, Liters)],
    quantities: impl Iterator<Item = Liters>,
) -> Vec<LoadedItem> {
    tanks
        .iter()
        .zip(quantities)
        .map(|(&(tank, _), quantity)| LoadedItem::new(tank.fuel_mass(quantity), tank.arm))
        .collect()
}

fn phase_point(phase: FlightPhase, items: &[LoadedItem]) -> Result<CgPoint> {
    let mass = total_mass(items);
    let moment = total_moment(items);
    let arm = cg_position(mass, moment)?;
    debug!(%phase, %mass, %arm, %moment, "CG point");
    Ok(CgPoint {
        phase,
        mass,
        arm,
        moment,
        within_envelope: true,
    })
}

/// Compute masses, CG points and limit checks.
///
/// # Errors
/// - [`CalculationError::InvalidProfile`] if the profile is malformed
/// - [`CalculationError::InvalidInput`] for unknown or repeated station/tank names
/// - [`CalculationError::InputRange`] for negative masses, negative or
///   over-capacity fuel, or negative trip fuel
/// - [`CalculationError::DivisionHazard`] if a phase mass is not positive
pub fn compute_mass_balance_with(
    profile: &AircraftProfile,
    loading: &LoadingInput,
    options: &CalculationOptions,
) -> Result<MassBalanceResult> {
    info!(registration = %profile.registration, "computing mass & balance");
    options.validate()?;
    profile.validate()?;
    let resolved = resolve(profile, loading)?;
    let mut warnings = WarningAggregator::new();

    // Payload
    let mut items = vec![LoadedItem::new(profile.empty_mass, profile.empty_arm)];
    for &(station, mass) in &resolved.stations {
        if let Some(limit) = station.max_mass {
            if mass > limit {
                warnings.push(WarningKind::StationOverload {
                    station: station.name.clone(),
                    mass,
                    limit,
                });
            }
        }
        items.push(LoadedItem::at_station(station, mass));
    }
    let zero_fuel_items = items.clone();

    // Fuel
    let takeoff_fuel = fuel_items(&resolved.tanks, resolved.tanks.iter().map(|&(_, q)| q));
    let plan = burn_trip_fuel(&resolved.tanks, loading.trip_fuel);
    if plan.shortfall > Liters::ZERO {
        let usable = resolved
            .tanks
            .iter()
            .map(|&(tank, quantity)| tank.usable(quantity))
            .sum();
        warnings.push(WarningKind::TripFuelExceedsUsable {
            requested: loading.trip_fuel,
            usable,
        });
    }
    let landing_fuel = fuel_items(&resolved.tanks, plan.remaining.iter().copied());

    let mut points = vec![phase_point(FlightPhase::ZeroFuel, &zero_fuel_items)?];
    items.extend_from_slice(&takeoff_fuel);
    points.push(phase_point(FlightPhase::Takeoff, &items)?);
    let mut landing_items = zero_fuel_items.clone();
    landing_items.extend_from_slice(&landing_fuel);
    points.push(phase_point(FlightPhase::Landing, &landing_items)?);

    // Weight limits
    let category = options.envelope_category;
    let mtom = profile.effective_mtom(category);
    let landing_limit = profile.landing_limit(category);
    let takeoff_mass = points[1].mass;
    let landing_mass = points[2].mass;
    if takeoff_mass > mtom {
        warnings.push(WarningKind::MtomExceeded {
            mass: takeoff_mass,
            limit: mtom,
        });
    }
    if landing_mass > landing_limit {
        warnings.push(WarningKind::MlwExceeded {
            mass: landing_mass,
            limit: landing_limit,
        });
    }
    let within_weight_limits = takeoff_mass <= mtom && landing_mass <= landing_limit;

    // CG limits
    let mut migration = None;
    match profile.envelope(category) {
        Some(envelope) => {
            let polygon = envelope.polygon();
            for point in &mut points {
                let check = classify(
                    Vec2::new(point.arm.value(), point.mass.value()),
                    &polygon,
                    options.boundary_tolerance,
                );
                point.within_envelope = check.within_limits;
                if !check.within_limits {
                    warnings.push(WarningKind::CgOutsideEnvelope {
                        phase: point.phase,
                        arm: point.arm,
                        mass: point.mass,
                        excursions: check.excursions,
                    });
                }
            }

            if points[1].within_envelope {
                let to_vec = |p: &CgPoint| Vec2::new(p.arm.value(), p.mass.value());
                let outcome = migration_check(
                    to_vec(&points[1]),
                    to_vec(&points[2]),
                    &polygon,
                    options.migration_subdivisions,
                    options.boundary_tolerance,
                );
                if let MigrationOutcome::Breach {
                    fraction,
                    arm,
                    mass,
                } = outcome
                {
                    warnings.push(WarningKind::CgMigration {
                        fraction,
                        arm,
                        mass,
                    });
                }
                migration = Some(outcome);
            }
        }
        None => warnings.push(WarningKind::EnvelopeUnavailable { category }),
    }
    let within_cg_limits = points[1].within_envelope && points[2].within_envelope;

    let (status, warnings) = warnings.finish();
    let fuel_mass = total_mass(&takeoff_fuel);
    let result = MassBalanceResult {
        empty_mass: profile.empty_mass,
        payload_mass: resolved.stations.iter().map(|&(_, m)| m).sum(),
        fuel_mass,
        zero_fuel_mass: points[0].mass,
        takeoff_mass,
        landing_mass,
        trip_fuel_mass: fuel_mass - total_mass(&landing_fuel),
        cg_points: points,
        within_weight_limits,
        within_cg_limits,
        migration,
        status,
        warnings,
    };
    info!(
        takeoff_mass = %result.takeoff_mass,
        landing_mass = %result.landing_mass,
        within_weight_limits,
        within_cg_limits,
        ?status,
        "mass & balance computed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::aircraft::{
        AircraftEnvelope, EnvelopeCategory, EnvelopePoint, FuelType, PerformanceData, StationArm,
    };
    use crate::core_types::units::Meters;
    use crate::warnings::OverallStatus;
    use approx::assert_relative_eq;

    fn envelope(vertices: &[(f64, f64)]) -> AircraftEnvelope {
        AircraftEnvelope {
            category: EnvelopeCategory::Normal,
            vertices: vertices
                .iter()
                .map(|&(arm, mass)| EnvelopePoint {
                    arm: Meters::new(arm),
                    mass: Kilograms::new(mass),
                })
                .collect(),
            mtom: None,
        }
    }

    fn profile() -> AircraftProfile {
        AircraftProfile {
            registration: "VH-MNB".to_string(),
            aircraft_type: "Trainer".to_string(),
            empty_mass: Kilograms::new(750.0),
            empty_arm: Meters::new(2.30),
            mtom: Kilograms::new(1150.0),
            max_landing_mass: Some(Kilograms::new(1100.0)),
            max_crosswind: None,
            stations: vec![
                LoadStation {
                    name: "Pilot".to_string(),
                    arm: StationArm::Fixed(Meters::new(2.05)),
                    max_mass: None,
                },
                LoadStation {
                    name: "Baggage".to_string(),
                    arm: StationArm::Fixed(Meters::new(3.00)),
                    max_mass: Some(Kilograms::new(50.0)),
                },
            ],
            fuel_tanks: vec![FuelTank {
                name: "Main".to_string(),
                capacity: Liters::new(150.0),
                unusable: Liters::new(5.0),
                arm: Meters::new(2.40),
                fuel_type: FuelType::Avgas100LL,
                burn_order: 0,
            }],
            envelopes: vec![envelope(&[
                (2.10, 600.0),
                (2.60, 600.0),
                (2.60, 1150.0),
                (2.20, 1150.0),
                (2.10, 950.0),
            ])],
            performance: PerformanceData::default(),
        }
    }

    fn loading() -> LoadingInput {
        LoadingInput::new()
            .with_station("Pilot", Kilograms::new(85.0))
            .with_fuel("Main", Liters::new(120.0))
            .with_trip_fuel(Liters::new(45.0))
    }

    #[test]
    fn test_nominal_loading() {
        let result =
            compute_mass_balance_with(&profile(), &loading(), &CalculationOptions::default())
                .unwrap();
        assert_relative_eq!(result.takeoff_mass.value(), 921.4, epsilon = 1e-9);
        assert_relative_eq!(result.landing_mass.value(), 889.0, epsilon = 1e-9);
        assert_relative_eq!(result.zero_fuel_mass.value(), 835.0, epsilon = 1e-9);
        assert_relative_eq!(result.trip_fuel_mass.value(), 32.4, epsilon = 1e-9);
        assert!(result.within_weight_limits);
        assert!(result.within_cg_limits);
        assert_eq!(result.status, OverallStatus::Nominal);
        assert_eq!(result.migration, Some(MigrationOutcome::NoViolation));
        assert_eq!(result.cg_points.len(), 3);
    }

    #[test]
    fn test_unknown_station_is_invalid_input() {
        let loading = LoadingInput::new().with_station("Wing walker", Kilograms::new(70.0));
        let err = compute_mass_balance_with(&profile(), &loading, &CalculationOptions::default())
            .unwrap_err();
        assert!(matches!(err, CalculationError::InvalidInput(_)));
    }

    #[test]
    fn test_duplicate_tank_is_invalid_input() {
        let loading = LoadingInput::new()
            .with_fuel("Main", Liters::new(10.0))
            .with_fuel("Main", Liters::new(10.0));
        assert!(matches!(
            compute_mass_balance_with(&profile(), &loading, &CalculationOptions::default()),
            Err(CalculationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_mass_is_input_range() {
        let loading = LoadingInput::new().with_station("Pilot", Kilograms::new(-5.0));
        assert!(matches!(
            compute_mass_balance_with(&profile(), &loading, &CalculationOptions::default()),
            Err(CalculationError::InputRange { .. })
        ));
    }

    #[test]
    fn test_over_capacity_fuel_is_input_range() {
        let loading = LoadingInput::new().with_fuel("Main", Liters::new(151.0));
        assert!(matches!(
            compute_mass_balance_with(&profile(), &loading, &CalculationOptions::default()),
            Err(CalculationError::InputRange { .. })
        ));
    }

    #[test]
    fn test_negative_boundary_tolerance_is_input_range() {
        let options = CalculationOptions {
            boundary_tolerance: -0.01,
            ..CalculationOptions::default()
        };
        let err = compute_mass_balance_with(&profile(), &loading(), &options).unwrap_err();
        assert!(matches!(err, CalculationError::InputRange { .. }));
        assert!(err.to_string().contains("boundary tolerance"));
    }

    #[test]
    fn test_empty_loading_is_valid() {
        let result = compute_mass_balance_with(
            &profile(),
            &LoadingInput::new(),
            &CalculationOptions::default(),
        )
        .unwrap();
        assert_eq!(result.takeoff_mass, Kilograms::new(750.0));
        assert_eq!(result.landing_mass, Kilograms::new(750.0));
        assert_relative_eq!(result.cg_points[1].arm.value(), 2.30, epsilon = 1e-12);
    }

    #[test]
    fn test_station_overload_is_caution() {
        let loading = LoadingInput::new().with_station("Baggage", Kilograms::new(60.0));
        let result =
            compute_mass_balance_with(&profile(), &loading, &CalculationOptions::default())
                .unwrap();
        assert!(result.warnings.iter().any(|w| w.code() == "STATION_OVERLOAD"));
    }

    #[test]
    fn test_trip_fuel_beyond_usable_is_critical() {
        let loading = LoadingInput::new()
            .with_station("Pilot", Kilograms::new(85.0))
            .with_fuel("Main", Liters::new(30.0))
            .with_trip_fuel(Liters::new(40.0));
        let result =
            compute_mass_balance_with(&profile(), &loading, &CalculationOptions::default())
                .unwrap();
        assert_eq!(result.status, OverallStatus::Critical);
        assert_eq!(result.warnings[0].code(), "TRIP_FUEL_EXCEEDS_USABLE");
        // Landing keeps the unusable 5 L
        assert_relative_eq!(
            result.landing_mass.value(),
            835.0 + 5.0 * 0.72,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_missing_envelope_is_caution_and_within_limits() {
        let options = CalculationOptions {
            envelope_category: EnvelopeCategory::Aerobatic,
            ..CalculationOptions::default()
        };
        let result = compute_mass_balance_with(&profile(), &loading(), &options).unwrap();
        assert!(result.within_cg_limits);
        assert_eq!(result.status, OverallStatus::Caution);
        assert_eq!(result.warnings[0].code(), "ENVELOPE_UNAVAILABLE");
        assert!(result.migration.is_none());
    }

    #[test]
    fn test_landing_above_mlw() {
        let mut p = profile();
        p.max_landing_mass = Some(Kilograms::new(880.0));
        let result =
            compute_mass_balance_with(&p, &loading(), &CalculationOptions::default()).unwrap();
        assert!(!result.within_weight_limits);
        assert!(result.warnings.iter().any(|w| w.code() == "MLW_EXCEEDED"));
    }
}
