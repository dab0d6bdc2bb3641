//! Core types and utilities

pub mod aircraft;
pub mod environment;
pub mod loading;
pub mod units;
pub mod vec2;

pub use aircraft::*;
pub use environment::*;
pub use loading::*;
pub use units::*;
pub use vec2::Vec2;
