//! Vector type alias for points on the (arm, mass) plane.

use nalgebra::Vector2;

/// 2D vector used for envelope geometry.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`. By convention
/// `x` is the CG arm in meters and `y` is the mass in kilograms.
pub type Vec2 = Vector2<f64>;
