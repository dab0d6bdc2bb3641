//! CG envelope validation
//!
//! Points live on the (arm, mass) plane as [`Vec2`](crate::core_types::Vec2)
//! with `x` = arm (m) and `y` = mass (kg).

pub mod migration;
pub mod polygon;

pub use migration::{migration_check, MigrationOutcome};
pub use polygon::{classify, contains, EnvelopeCheck, Excursion};
