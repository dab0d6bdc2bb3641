//! C interface to the flight calculation core.
//!
//! Profiles, loadings and performance requests cross the boundary as JSON
//! documents and results come back the same way, so host applications need no
//! knowledge of the core's types. Errors are reported as a
//! [`FlightCalcErrorCode`] with a per-thread message.
//!
//! ```c
//! char* result = NULL;
//! if (flightcalc_compute_mass_balance(profile, loading, &result) == Ok) {
//!     puts(result);
//!     flightcalc_string_free(result);
//! } else {
//!     fprintf(stderr, "%s\n", flightcalc_get_last_error());
//! }
//! ```

mod calculations;
mod error;
mod helpers;

pub use calculations::{
    flightcalc_compute_mass_balance, flightcalc_compute_performance,
    flightcalc_pressure_altitude, flightcalc_string_free,
};
pub use error::{flightcalc_get_last_error, flightcalc_get_last_error_code, FlightCalcErrorCode};
