use flightcalc_core::CalculationError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FlightCalcError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FlightCalcErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FlightCalcError` for boundary failures and
/// wrapped calculation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFlightCalcError {
    code: FlightCalcErrorCode,
    msg: String,
}

impl DefaultFlightCalcError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"profile_json"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FlightCalcErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a C string that is not valid UTF-8.
    pub fn invalid_utf8(param_name: &str) -> Self {
        Self {
            code: FlightCalcErrorCode::InvalidUtf8,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }

    /// Create error for a JSON document that does not describe the expected type.
    ///
    /// Unknown fuel types and wrong-dimension units found while reading the
    /// document keep their own codes; everything else is `MalformedJson`.
    ///
    /// # Arguments
    /// * `param_name` - The parameter holding the document
    /// * `error` - The parser's description, including line and column
    pub fn malformed_json(param_name: &str, error: &serde_json::Error) -> Self {
        Self {
            code: FlightCalcErrorCode::for_parse_error(error),
            msg: format!("Parameter '{param_name}': {error}"),
        }
    }

    /// Create error for a result that could not be handed back to the caller.
    pub fn output(message: String) -> Self {
        Self {
            code: FlightCalcErrorCode::OutputFailed,
            msg: message,
        }
    }
}

impl From<&CalculationError> for DefaultFlightCalcError {
    fn from(error: &CalculationError) -> Self {
        Self {
            code: FlightCalcErrorCode::from(error),
            msg: error.to_string(),
        }
    }
}

impl FlightCalcError for DefaultFlightCalcError {
    fn code(&self) -> FlightCalcErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by flight calculation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightCalcErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// A string argument is not valid UTF-8.
    InvalidUtf8 = 2,

    /// A JSON argument could not be parsed into the expected document.
    MalformedJson = 3,

    /// A supplied value is physically implausible.
    InputRange = 4,

    /// A fuel-type label with no density entry.
    UnknownFuelType = 5,

    /// A unit symbol that is unknown or measures another dimension.
    UnitMismatch = 6,

    /// Total mass was zero or negative when computing a CG position.
    DivisionHazard = 7,

    /// A performance table query is more than 10% beyond certified data.
    ExtrapolationBlocked = 8,

    /// The aircraft profile is structurally unusable.
    InvalidProfile = 9,

    /// The request names stations or tanks the profile does not define.
    InvalidInput = 10,

    /// The result could not be serialized or handed back.
    OutputFailed = 11,
}

impl From<&CalculationError> for FlightCalcErrorCode {
    fn from(error: &CalculationError) -> Self {
        match error {
            CalculationError::InputRange { .. } => Self::InputRange,
            CalculationError::UnknownFuelType(_) => Self::UnknownFuelType,
            CalculationError::UnitMismatch { .. } => Self::UnitMismatch,
            CalculationError::DivisionHazard { .. } => Self::DivisionHazard,
            CalculationError::ExtrapolationBlocked { .. } => Self::ExtrapolationBlocked,
            CalculationError::InvalidProfile(_) => Self::InvalidProfile,
            CalculationError::InvalidInput(_) => Self::InvalidInput,
        }
    }
}

impl FlightCalcErrorCode {
    /// Code for a document the parser rejected.
    fn for_parse_error(error: &serde_json::Error) -> Self {
        if !error.is_data() {
            return Self::MalformedJson;
        }
        let message = error.to_string();
        if message.starts_with(CalculationError::UNKNOWN_FUEL_TYPE_PREFIX) {
            Self::UnknownFuelType
        } else if message.starts_with(CalculationError::UNIT_MISMATCH_PREFIX) {
            Self::UnitMismatch
        } else {
            Self::MalformedJson
        }
    }
}

impl From<DefaultFlightCalcError> for FlightCalcErrorCode {
    fn from(error: DefaultFlightCalcError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored so the pointer handed out stays valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, FlightCalcErrorCode)> =
        const { RefCell::new((None, FlightCalcErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FlightCalcErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FlightCalcErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// char* result = NULL;
/// FlightCalcErrorCode err = flightcalc_compute_mass_balance(profile, loading, &result);
/// if (err != Ok) {
///     const char* message = flightcalc_get_last_error();
///     if (message) {
///         fprintf(stderr, "Mass & balance failed: %s\n", message);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn flightcalc_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn flightcalc_get_last_error_code() -> FlightCalcErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
