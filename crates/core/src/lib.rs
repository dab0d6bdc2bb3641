//! Flight Calculation Core Library
//!
//! Mass & balance and takeoff/landing performance for general-aviation
//! aircraft. Given an aircraft profile snapshot it computes phase masses and
//! CG positions validated against a polygonal weight/CG envelope, and runway
//! distances from manufacturer tables or a correction-formula fallback.
//!
//! ## Safety model
//!
//! - Every physical quantity is a unit-tagged newtype ([`core_types::units`]);
//!   a mass parameter cannot receive a length or a raw number
//! - Implausible inputs and unusable profiles abort with a [`CalculationError`]
//! - Everything else that needs a pilot's attention is a [`Warning`] returned
//!   alongside a complete result, ordered by severity
//! - Table extrapolation is limited to 10% beyond certified data, with a 20%
//!   penalty; below the data the best certified value is used
//!
//! The core is pure: no I/O, no global state. Identical inputs produce
//! bit-identical outputs and all entry points are safe to call concurrently.

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;
pub mod interpolation;
pub mod warnings;

// Calculation engines
pub mod envelope;
pub mod mass_balance;
pub mod performance;

pub use config::{limits, CalculationOptions};
pub use core_types::{AircraftProfile, EnvironmentalConditions, LoadingInput};
pub use error::{CalculationError, Result};
pub use mass_balance::{CgPoint, MassBalanceResult};
pub use performance::{CalculationMode, PerformanceRequest, PerformanceResult};
pub use warnings::{OverallStatus, Severity, Warning, WarningKind};

use rayon::prelude::*;

/// Mass & balance with default options.
///
/// # Errors
/// See [`compute_mass_balance_with`].
pub fn compute_mass_balance(
    profile: &AircraftProfile,
    loading: &LoadingInput,
) -> Result<MassBalanceResult> {
    compute_mass_balance_with(profile, loading, &CalculationOptions::default())
}

/// Mass & balance for a profile and loading.
///
/// # Errors
/// Returns a [`CalculationError`] for a malformed profile, unknown station or
/// tank names, or implausible masses and fuel quantities.
pub fn compute_mass_balance_with(
    profile: &AircraftProfile,
    loading: &LoadingInput,
    options: &CalculationOptions,
) -> Result<MassBalanceResult> {
    mass_balance::compute_mass_balance_with(profile, loading, options)
}

/// Performance with default options.
///
/// # Errors
/// See [`compute_performance_with`].
pub fn compute_performance(
    profile: &AircraftProfile,
    request: &PerformanceRequest,
) -> Result<PerformanceResult> {
    compute_performance_with(profile, request, &CalculationOptions::default())
}

/// Takeoff, landing and climb performance for a profile and conditions.
///
/// # Errors
/// Returns a [`CalculationError`] for a malformed profile, implausible
/// conditions, or a table query beyond the extrapolation limit.
pub fn compute_performance_with(
    profile: &AircraftProfile,
    request: &PerformanceRequest,
    options: &CalculationOptions,
) -> Result<PerformanceResult> {
    performance::compute_performance_with(profile, request, options)
}

/// Evaluate independent loadings in parallel. Results are in input order.
pub fn compute_mass_balance_batch(
    profile: &AircraftProfile,
    loadings: &[LoadingInput],
    options: &CalculationOptions,
) -> Vec<Result<MassBalanceResult>> {
    loadings
        .par_iter()
        .map(|loading| compute_mass_balance_with(profile, loading, options))
        .collect()
}

/// Evaluate independent performance requests in parallel. Results are in input order.
pub fn compute_performance_batch(
    profile: &AircraftProfile,
    requests: &[PerformanceRequest],
    options: &CalculationOptions,
) -> Vec<Result<PerformanceResult>> {
    requests
        .par_iter()
        .map(|request| compute_performance_with(profile, request, options))
        .collect()
}
