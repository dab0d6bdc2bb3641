//! JSON-in / JSON-out calculation entry points.
//!
//! Every function returns a [`FlightCalcErrorCode`]; on failure the message is
//! available from `flightcalc_get_last_error()`. Result strings are allocated
//! here and must be released with [`flightcalc_string_free`].

use crate::error::{DefaultFlightCalcError, FlightCalcErrorCode};
use crate::helpers::{read_json, track_error, track_result, write_json};
use flightcalc_core::core_types::units::{Feet, Hectopascals};
use flightcalc_core::performance::atmosphere;
use flightcalc_core::{
    compute_mass_balance, compute_performance, limits, AircraftProfile, CalculationError,
    LoadingInput, PerformanceRequest,
};
use std::ffi::CString;
use std::ops::RangeInclusive;
use std::os::raw::c_char;

/// Compute mass & balance for a profile and loading.
///
/// # Parameters
/// - `profile_json`: Aircraft profile document
/// - `loading_json`: Loading document (`stations`, `fuel`, `trip_fuel`)
/// - `out_result_json`: Receives the result document on success
///
/// # Returns
/// - `Ok` with `out_result_json` set
/// - `NullPointer`, `InvalidUtf8` or `MalformedJson` for unusable arguments
/// - The calculation's error code if the inputs are rejected
///
/// # Safety
/// The string arguments must be null or null-terminated. `out_result_json`
/// must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn flightcalc_compute_mass_balance(
    profile_json: *const c_char,
    loading_json: *const c_char,
    out_result_json: *mut *mut c_char,
) -> FlightCalcErrorCode {
    // SAFETY: forwarded caller contract
    track_result(unsafe { mass_balance_json(profile_json, loading_json, out_result_json) })
}

unsafe fn mass_balance_json(
    profile_json: *const c_char,
    loading_json: *const c_char,
    out_result_json: *mut *mut c_char,
) -> Result<(), DefaultFlightCalcError> {
    // SAFETY: forwarded caller contract
    let profile: AircraftProfile = unsafe { read_json(profile_json, "profile_json") }?;
    let loading: LoadingInput = unsafe { read_json(loading_json, "loading_json") }?;
    let result =
        compute_mass_balance(&profile, &loading).map_err(|e| DefaultFlightCalcError::from(&e))?;
    // SAFETY: forwarded caller contract
    unsafe { write_json(&result, out_result_json, "out_result_json") }
}

/// Compute takeoff, landing and climb performance.
///
/// # Parameters
/// - `profile_json`: Aircraft profile document
/// - `request_json`: Request document (`conditions`, `takeoff_mass`, optional `landing_mass`)
/// - `out_result_json`: Receives the result document on success
///
/// # Returns
/// - `Ok` with `out_result_json` set
/// - `ExtrapolationBlocked` if a table query is more than 10% beyond certified data
/// - Other codes as for [`flightcalc_compute_mass_balance`]
///
/// # Safety
/// As for [`flightcalc_compute_mass_balance`].
#[no_mangle]
pub unsafe extern "C" fn flightcalc_compute_performance(
    profile_json: *const c_char,
    request_json: *const c_char,
    out_result_json: *mut *mut c_char,
) -> FlightCalcErrorCode {
    // SAFETY: forwarded caller contract
    track_result(unsafe { performance_json(profile_json, request_json, out_result_json) })
}

unsafe fn performance_json(
    profile_json: *const c_char,
    request_json: *const c_char,
    out_result_json: *mut *mut c_char,
) -> Result<(), DefaultFlightCalcError> {
    // SAFETY: forwarded caller contract
    let profile: AircraftProfile = unsafe { read_json(profile_json, "profile_json") }?;
    let request: PerformanceRequest = unsafe { read_json(request_json, "request_json") }?;
    let result =
        compute_performance(&profile, &request).map_err(|e| DefaultFlightCalcError::from(&e))?;
    // SAFETY: forwarded caller contract
    unsafe { write_json(&result, out_result_json, "out_result_json") }
}

/// Pressure altitude (ft) from field elevation (ft) and QNH (hPa).
///
/// # Returns
/// - `Ok` with `out_pressure_altitude_ft` set
/// - `InputRange` if the elevation or QNH is implausible
/// - `NullPointer` if `out_pressure_altitude_ft` is null
///
/// # Safety
/// `out_pressure_altitude_ft` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn flightcalc_pressure_altitude(
    elevation_ft: f64,
    qnh_hpa: f64,
    out_pressure_altitude_ft: *mut f64,
) -> FlightCalcErrorCode {
    if out_pressure_altitude_ft.is_null() {
        return track_error(&DefaultFlightCalcError::null_pointer(
            "out_pressure_altitude_ft",
        ));
    }
    let result = pressure_altitude_checked(elevation_ft, qnh_hpa).map(|pressure_altitude| {
        // SAFETY: non-null and writable per the caller's contract
        unsafe { *out_pressure_altitude_ft = pressure_altitude.value() };
    });
    track_result(result)
}

fn pressure_altitude_checked(
    elevation_ft: f64,
    qnh_hpa: f64,
) -> Result<Feet, DefaultFlightCalcError> {
    let check = |name: &str, value: f64, range: RangeInclusive<f64>| {
        CalculationError::check_range(name, value, *range.start(), *range.end())
            .map_err(|e| DefaultFlightCalcError::from(&e))
    };
    check("field elevation (ft)", elevation_ft, limits::ALTITUDE_FT)?;
    check("QNH (hPa)", qnh_hpa, limits::QNH_HPA)?;
    Ok(atmosphere::pressure_altitude(
        Feet::new(elevation_ft),
        Hectopascals::new(qnh_hpa),
    ))
}

/// Release a string returned by this library.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned through an
/// `out_result_json` parameter, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn flightcalc_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        // SAFETY: allocated by `CString::into_raw` in `write_json`
        drop(unsafe { CString::from_raw(ptr) });
    }
}
