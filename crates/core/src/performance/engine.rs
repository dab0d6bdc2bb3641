//! Performance request → result

use super::atmosphere;
use super::corrections::{base_distances, CorrectionChain};
use super::{
    AppliedCorrection, CalculationMode, PerformancePhase, PerformanceRequest, PerformanceResult,
    PhasePerformance,
};
use crate::config::CalculationOptions;
use crate::core_types::aircraft::AircraftProfile;
use crate::core_types::units::{Celsius, CelsiusDelta, Feet, FeetPerMinute, Kilograms, Meters};
use crate::error::{CalculationError, Result};
use crate::warnings::{WarningAggregator, WarningKind};
use tracing::{debug, info};

/// Per-phase inputs shared by both modes.
struct PhaseContext {
    phase: PerformancePhase,
    mass: Kilograms,
    pressure_altitude: Feet,
    temperature: Celsius,
    isa_deviation: CelsiusDelta,
    safety_factor: f64,
}

fn check_mass(name: &str, mass: Kilograms) -> Result<()> {
    if mass.is_finite() && mass > Kilograms::ZERO {
        Ok(())
    } else {
        Err(CalculationError::input_range(
            name,
            mass.value(),
            f64::MIN_POSITIVE,
            f64::MAX,
        ))
    }
}

fn evaluate_phase(
    profile: &AircraftProfile,
    ctx: &PhaseContext,
    request: &PerformanceRequest,
    options: &CalculationOptions,
    warnings: &mut WarningAggregator,
    corrections: &mut Vec<AppliedCorrection>,
) -> Result<PhasePerformance> {
    let tables = match ctx.phase {
        PerformancePhase::Takeoff => profile.performance.takeoff.as_ref(),
        PerformancePhase::Landing => profile.performance.landing.as_ref(),
    };
    let mut chain = CorrectionChain::new(ctx.phase);

    let (ground_roll, over_obstacle, mode) = if let Some(tables) = tables {
        let roll =
            tables
                .ground_roll
                .evaluate(ctx.mass, ctx.pressure_altitude, ctx.temperature)?;
        let obstacle =
            tables
                .over_obstacle
                .evaluate(ctx.mass, ctx.pressure_altitude, ctx.temperature)?;
        let mode = roll.mode.combine(obstacle.mode);
        warnings.extend(roll.warnings);
        warnings.extend(obstacle.warnings);
        (roll.value, obstacle.value, mode)
    } else if let Some(base) = &profile.performance.algorithmic {
        warnings.push(WarningKind::AlgorithmicFallback { phase: ctx.phase });
        chain.apply_algorithmic(
            ctx.mass,
            profile.effective_mtom(options.envelope_category),
            ctx.pressure_altitude,
            ctx.isa_deviation,
        );
        let (roll, obstacle) = base_distances(base, ctx.phase);
        (roll.value(), obstacle.value(), CalculationMode::Algorithmic)
    } else {
        return Err(CalculationError::InvalidProfile(format!(
            "no {} performance table and no algorithmic base distances",
            ctx.phase
        )));
    };

    chain.apply_runway(&request.conditions);
    let factor = chain.total();
    debug!(phase = %ctx.phase, ?mode, ground_roll, over_obstacle, factor, "phase distances");
    corrections.extend(chain.into_applied());

    let ground_roll = Meters::new(ground_roll * factor);
    let over_obstacle = Meters::new(over_obstacle * factor);
    Ok(PhasePerformance {
        mode,
        ground_roll,
        over_obstacle,
        factored_ground_roll: ground_roll * ctx.safety_factor,
        factored_over_obstacle: over_obstacle * ctx.safety_factor,
    })
}

/// Compute takeoff, landing and climb performance.
///
/// # Errors
/// - [`CalculationError::InvalidProfile`] if the profile is malformed or a phase
///   has neither tables nor algorithmic base distances
/// - [`CalculationError::InputRange`] for implausible conditions or masses
/// - [`CalculationError::ExtrapolationBlocked`] if a table query is more than
///   10% beyond certified data
pub fn compute_performance_with(
    profile: &AircraftProfile,
    request: &PerformanceRequest,
    options: &CalculationOptions,
) -> Result<PerformanceResult> {
    info!(
        registration = %profile.registration,
        takeoff_mass = %request.takeoff_mass,
        "computing performance"
    );
    options.validate()?;
    profile.validate()?;
    request.conditions.validate()?;
    check_mass("takeoff mass (kg)", request.takeoff_mass)?;
    check_mass("landing mass (kg)", request.landing_mass())?;

    let conditions = &request.conditions;
    let pressure_altitude = conditions.pressure_altitude();
    let isa_deviation = atmosphere::isa_deviation(pressure_altitude, conditions.temperature);
    let density_altitude = atmosphere::density_altitude(pressure_altitude, conditions.temperature);
    debug!(
        %pressure_altitude, %density_altitude, %isa_deviation,
        "atmosphere"
    );

    let mut warnings = WarningAggregator::new();
    let mut corrections = Vec::new();

    let phase = |phase, mass, safety_factor| PhaseContext {
        phase,
        mass,
        pressure_altitude,
        temperature: conditions.temperature,
        isa_deviation,
        safety_factor,
    };
    let takeoff = evaluate_phase(
        profile,
        &phase(
            PerformancePhase::Takeoff,
            request.takeoff_mass,
            options.takeoff_safety_factor,
        ),
        request,
        options,
        &mut warnings,
        &mut corrections,
    )?;
    let landing = evaluate_phase(
        profile,
        &phase(
            PerformancePhase::Landing,
            request.landing_mass(),
            options.landing_safety_factor,
        ),
        request,
        options,
        &mut warnings,
        &mut corrections,
    )?;

    let mut mode = takeoff.mode.combine(landing.mode);
    let rate_of_climb = match &profile.performance.climb {
        Some(table) => {
            let climb = table.evaluate_rate(
                request.takeoff_mass,
                pressure_altitude,
                conditions.temperature,
            )?;
            mode = mode.combine(climb.mode);
            warnings.extend(climb.warnings);
            Some(FeetPerMinute::new(climb.value))
        }
        None => None,
    };

    // Raw comparison: the unit ordering puts -0.0 below zero
    if conditions.headwind.value() < 0.0 {
        warnings.push(WarningKind::Tailwind {
            component: conditions.headwind.abs(),
        });
    }
    if let Some(limit) = profile.max_crosswind {
        let component = conditions.crosswind.abs();
        if component > limit {
            warnings.push(WarningKind::CrosswindLimitExceeded { component, limit });
        }
    }

    let (status, warnings) = warnings.finish();
    info!(?mode, ?status, warnings = warnings.len(), "performance computed");

    Ok(PerformanceResult {
        pressure_altitude,
        density_altitude,
        isa_deviation,
        takeoff,
        landing,
        rate_of_climb,
        mode,
        corrections,
        status,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::aircraft::{AlgorithmicBase, DistanceTables, PerformanceData};
    use crate::core_types::environment::{EnvironmentalConditions, RunwaySurface};
    use crate::core_types::units::{Knots, Percent};
    use crate::interpolation::Axis;
    use crate::performance::PerformanceTable;
    use crate::warnings::OverallStatus;
    use approx::assert_relative_eq;

    fn flat_table(label: &str, value: f64) -> PerformanceTable {
        PerformanceTable::new(
            label,
            Axis::new(vec![800.0, 1200.0]).unwrap(),
            Axis::new(vec![0.0, 8000.0]).unwrap(),
            Axis::new(vec![-10.0, 40.0]).unwrap(),
            vec![value; 8],
        )
        .unwrap()
    }

    fn profile(performance: PerformanceData) -> AircraftProfile {
        AircraftProfile {
            registration: "VH-PRF".to_string(),
            aircraft_type: "Test".to_string(),
            empty_mass: Kilograms::new(700.0),
            empty_arm: Meters::new(2.3),
            mtom: Kilograms::new(1000.0),
            max_landing_mass: None,
            max_crosswind: Some(Knots::new(15.0)),
            stations: Vec::new(),
            fuel_tanks: Vec::new(),
            envelopes: Vec::new(),
            performance,
        }
    }

    fn tabled() -> AircraftProfile {
        profile(PerformanceData {
            takeoff: Some(DistanceTables {
                ground_roll: flat_table("TO roll", 300.0),
                over_obstacle: flat_table("TO 50ft", 500.0),
            }),
            landing: Some(DistanceTables {
                ground_roll: flat_table("LDG roll", 250.0),
                over_obstacle: flat_table("LDG 50ft", 450.0),
            }),
            climb: Some(flat_table("ROC", 700.0)),
            algorithmic: None,
        })
    }

    fn algorithmic() -> AircraftProfile {
        profile(PerformanceData {
            algorithmic: Some(AlgorithmicBase {
                takeoff_ground_roll: Meters::new(300.0),
                takeoff_over_obstacle: Meters::new(450.0),
                landing_ground_roll: Meters::new(250.0),
                landing_over_obstacle: Meters::new(400.0),
            }),
            ..PerformanceData::default()
        })
    }

    fn sea_level_isa() -> EnvironmentalConditions {
        EnvironmentalConditions::at_pressure_altitude(Feet::ZERO, Celsius::new(15.0))
    }

    #[test]
    fn test_table_mode_calm_conditions() {
        let request = PerformanceRequest::new(sea_level_isa(), Kilograms::new(1000.0));
        let result =
            compute_performance_with(&tabled(), &request, &CalculationOptions::default()).unwrap();
        assert_eq!(result.mode, CalculationMode::Table);
        assert_eq!(result.status, OverallStatus::Nominal);
        assert!(result.corrections.is_empty());
        assert_relative_eq!(result.takeoff.ground_roll.value(), 300.0);
        assert_relative_eq!(result.takeoff.factored_ground_roll.value(), 375.0);
        assert_relative_eq!(result.landing.factored_over_obstacle.value(), 450.0 * 1.33);
        assert_eq!(result.rate_of_climb, Some(FeetPerMinute::new(700.0)));
    }

    #[test]
    fn test_table_mode_applies_runway_corrections() {
        let mut conditions = sea_level_isa();
        conditions.surface = RunwaySurface::WetGrass;
        conditions.slope = Percent::new(1.0);
        let request = PerformanceRequest::new(conditions, Kilograms::new(1000.0));
        let result =
            compute_performance_with(&tabled(), &request, &CalculationOptions::default()).unwrap();
        assert_relative_eq!(
            result.takeoff.ground_roll.value(),
            300.0 * 1.30 * 1.10,
            epsilon = 1e-9
        );
        // An upslope takeoff runway carries no slope penalty on landing
        assert_relative_eq!(result.landing.ground_roll.value(), 250.0 * 1.30, epsilon = 1e-9);
    }

    #[test]
    fn test_algorithmic_fallback() {
        // ISA +10 at 2000 ft
        let pa = Feet::new(2000.0);
        let temperature = atmosphere::isa_temperature(pa) + CelsiusDelta::new(10.0);
        let request = PerformanceRequest::new(
            EnvironmentalConditions::at_pressure_altitude(pa, temperature),
            Kilograms::new(900.0),
        );
        let result =
            compute_performance_with(&algorithmic(), &request, &CalculationOptions::default())
                .unwrap();
        assert_eq!(result.mode, CalculationMode::Algorithmic);
        assert_eq!(result.status, OverallStatus::Advisory);
        let expected = 300.0 * 0.81 * 1.20 * 1.10;
        assert_relative_eq!(result.takeoff.ground_roll.value(), expected, epsilon = 1e-9);
        assert!(result
            .warnings
            .iter()
            .all(|w| w.code() == "ALGORITHMIC_FALLBACK"));
        assert_eq!(result.warnings.len(), 2);
        assert!(result.rate_of_climb.is_none());
    }

    #[test]
    fn test_no_performance_data_is_invalid_profile() {
        let request = PerformanceRequest::new(sea_level_isa(), Kilograms::new(900.0));
        let err = compute_performance_with(
            &profile(PerformanceData::default()),
            &request,
            &CalculationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CalculationError::InvalidProfile(_)));
    }

    #[test]
    fn test_tailwind_and_crosswind_warnings() {
        let mut conditions = sea_level_isa();
        conditions.headwind = Knots::new(-4.0);
        conditions.crosswind = Knots::new(-18.0);
        let request = PerformanceRequest::new(conditions, Kilograms::new(1000.0));
        let result =
            compute_performance_with(&tabled(), &request, &CalculationOptions::default()).unwrap();
        let codes: Vec<_> = result.warnings.iter().map(|w| w.code()).collect();
        assert_eq!(codes, ["CROSSWIND_LIMIT_EXCEEDED", "TAILWIND"]);
        assert_eq!(result.status, OverallStatus::Caution);
        assert_relative_eq!(result.takeoff.ground_roll.value(), 300.0 * 1.20, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_zero_headwind_is_calm() {
        let mut conditions = sea_level_isa();
        conditions.headwind = Knots::new(-0.0);
        let request = PerformanceRequest::new(conditions, Kilograms::new(1000.0));
        let result =
            compute_performance_with(&tabled(), &request, &CalculationOptions::default()).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.status, OverallStatus::Nominal);
        assert!(result.corrections.is_empty());
        assert_relative_eq!(result.takeoff.ground_roll.value(), 300.0);
    }

    #[test]
    fn test_rejects_safety_factor_below_one() {
        let request = PerformanceRequest::new(sea_level_isa(), Kilograms::new(1000.0));
        let options = CalculationOptions {
            landing_safety_factor: 0.9,
            ..CalculationOptions::default()
        };
        assert!(matches!(
            compute_performance_with(&tabled(), &request, &options),
            Err(CalculationError::InputRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let request = PerformanceRequest::new(sea_level_isa(), Kilograms::ZERO);
        assert!(matches!(
            compute_performance_with(&tabled(), &request, &CalculationOptions::default()),
            Err(CalculationError::InputRange { .. })
        ));
    }

    #[test]
    fn test_blocked_extrapolation_propagates() {
        let request = PerformanceRequest::new(sea_level_isa(), Kilograms::new(1400.0));
        assert!(matches!(
            compute_performance_with(&tabled(), &request, &CalculationOptions::default()),
            Err(CalculationError::ExtrapolationBlocked { .. })
        ));
    }
}
