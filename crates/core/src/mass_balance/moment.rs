//! Moments and CG position

use crate::core_types::aircraft::LoadStation;
use crate::core_types::units::{KilogramMeters, Kilograms, Meters};
use crate::error::{CalculationError, Result};

/// A mass at a resolved arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedItem {
    pub mass: Kilograms,
    pub arm: Meters,
}

impl LoadedItem {
    pub fn new(mass: Kilograms, arm: Meters) -> Self {
        Self { mass, arm }
    }

    /// Item for a station, resolving a variable arm at the station's mass.
    pub fn at_station(station: &LoadStation, mass: Kilograms) -> Self {
        Self {
            mass,
            arm: station.arm.arm_at(mass),
        }
    }

    pub fn moment(&self) -> KilogramMeters {
        self.mass * self.arm
    }
}

/// Sum of `mass * arm`. Zero for no items.
pub fn total_moment(items: &[LoadedItem]) -> KilogramMeters {
    items.iter().map(LoadedItem::moment).sum()
}

/// Sum of masses.
pub fn total_mass(items: &[LoadedItem]) -> Kilograms {
    items.iter().map(|i| i.mass).sum()
}

/// CG arm = moment / mass.
///
/// # Errors
/// Returns [`CalculationError::DivisionHazard`] if `total_mass` is not positive.
pub fn cg_position(total_mass: Kilograms, total_moment: KilogramMeters) -> Result<Meters> {
    if !(total_mass.is_finite() && total_mass > Kilograms::ZERO) {
        return Err(CalculationError::DivisionHazard {
            total_mass: total_mass.value(),
        });
    }
    Ok(Meters::new(total_moment.value() / total_mass.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::aircraft::{ArmPoint, ArmTable, StationArm};
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_set_has_zero_moment() {
        assert_eq!(total_moment(&[]), KilogramMeters::ZERO);
        assert_eq!(total_mass(&[]), Kilograms::ZERO);
    }

    #[test]
    fn test_total_moment_and_cg() {
        let items = [
            LoadedItem::new(Kilograms::new(750.0), Meters::new(2.3)),
            LoadedItem::new(Kilograms::new(85.0), Meters::new(2.05)),
        ];
        let moment = total_moment(&items);
        assert_relative_eq!(moment.value(), 1725.0 + 174.25, epsilon = 1e-9);
        let cg = cg_position(total_mass(&items), moment).unwrap();
        assert_relative_eq!(cg.value(), 1899.25 / 835.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cg_of_zero_mass_is_division_hazard() {
        let err = cg_position(Kilograms::ZERO, KilogramMeters::ZERO).unwrap_err();
        assert_eq!(err, CalculationError::DivisionHazard { total_mass: 0.0 });
        assert!(cg_position(Kilograms::new(-1.0), KilogramMeters::ZERO).is_err());
    }

    #[test]
    fn test_variable_arm_resolved_before_multiplying() {
        let station = LoadStation {
            name: "Baggage".to_string(),
            arm: StationArm::Variable(
                ArmTable::new(vec![
                    ArmPoint {
                        mass: Kilograms::ZERO,
                        arm: Meters::new(3.0),
                    },
                    ArmPoint {
                        mass: Kilograms::new(40.0),
                        arm: Meters::new(3.4),
                    },
                ])
                .unwrap(),
            ),
            max_mass: None,
        };
        let item = LoadedItem::at_station(&station, Kilograms::new(20.0));
        assert_relative_eq!(item.moment().value(), 20.0 * 3.2, epsilon = 1e-9);
    }
}
