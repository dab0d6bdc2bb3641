//! Fuel mass and trip-fuel burn sequencing

use crate::core_types::aircraft::FuelTank;
use crate::core_types::units::{Kilograms, Liters};

/// Mass of `quantity` of the tank's fuel.
pub fn fuel_weight(tank: &FuelTank, quantity: Liters) -> Kilograms {
    tank.fuel_mass(quantity)
}

/// Per-tank quantities after burning the trip fuel.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnPlan {
    /// Remaining quantity, in the same order as the input tanks
    pub remaining: Vec<Liters>,
    /// Volume actually burned
    pub burned: Liters,
    /// Trip fuel that could not be covered by usable fuel
    pub shortfall: Liters,
}

/// Burn `trip` from `tanks` in ascending `burn_order`, declaration order on ties.
///
/// A later tank is touched only once earlier ones are down to their unusable
/// fuel. Unusable fuel is never burned.
pub fn burn_trip_fuel(tanks: &[(&FuelTank, Liters)], trip: Liters) -> BurnPlan {
    let mut order: Vec<usize> = (0..tanks.len()).collect();
    order.sort_by_key(|&i| tanks[i].0.burn_order);

    let mut remaining: Vec<Liters> = tanks.iter().map(|&(_, q)| q).collect();
    let mut to_burn = trip.max(Liters::ZERO);
    for i in order {
        if to_burn <= Liters::ZERO {
            break;
        }
        let (tank, quantity) = tanks[i];
        let burn = tank.usable(quantity).min(to_burn);
        remaining[i] -= burn;
        to_burn -= burn;
        tracing::debug!(tank = %tank.name, burned = %burn, left = %remaining[i], "trip fuel");
    }

    BurnPlan {
        burned: trip.max(Liters::ZERO) - to_burn,
        shortfall: to_burn,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::aircraft::FuelType;
    use crate::core_types::units::Meters;
    use approx::assert_relative_eq;

    fn tank(name: &str, burn_order: u32) -> FuelTank {
        FuelTank {
            name: name.to_string(),
            capacity: Liters::new(100.0),
            unusable: Liters::new(5.0),
            arm: Meters::new(2.4),
            fuel_type: FuelType::Avgas100LL,
            burn_order,
        }
    }

    #[test]
    fn test_fuel_weight() {
        assert_relative_eq!(
            fuel_weight(&tank("Main", 0), Liters::new(120.0)).value(),
            86.4,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_burns_in_declared_order() {
        let aux = tank("Aux", 1);
        let main = tank("Main", 0);
        // Aux declared first but burned second
        let plan = burn_trip_fuel(
            &[(&aux, Liters::new(50.0)), (&main, Liters::new(60.0))],
            Liters::new(70.0),
        );
        assert_eq!(plan.remaining, vec![Liters::new(35.0), Liters::new(5.0)]);
        assert_eq!(plan.burned, Liters::new(70.0));
        assert_eq!(plan.shortfall, Liters::ZERO);
    }

    #[test]
    fn test_later_tank_untouched_until_earlier_exhausted() {
        let a = tank("A", 0);
        let b = tank("B", 1);
        let plan = burn_trip_fuel(
            &[(&a, Liters::new(80.0)), (&b, Liters::new(80.0))],
            Liters::new(30.0),
        );
        assert_eq!(plan.remaining, vec![Liters::new(50.0), Liters::new(80.0)]);
    }

    #[test]
    fn test_shortfall_when_trip_exceeds_usable() {
        let a = tank("A", 0);
        let plan = burn_trip_fuel(&[(&a, Liters::new(20.0))], Liters::new(40.0));
        assert_eq!(plan.remaining, vec![Liters::new(5.0)]);
        assert_eq!(plan.burned, Liters::new(15.0));
        assert_eq!(plan.shortfall, Liters::new(25.0));
    }

    #[test]
    fn test_zero_trip_burns_nothing() {
        let a = tank("A", 0);
        let plan = burn_trip_fuel(&[(&a, Liters::new(20.0))], Liters::ZERO);
        assert_eq!(plan.remaining, vec![Liters::new(20.0)]);
        assert_eq!(plan.burned, Liters::ZERO);
    }
}
