use crate::error::{
    with_last_error_mut, DefaultFlightCalcError, FlightCalcError, FlightCalcErrorCode,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
/// Accepts any type implementing `FlightCalcError` trait.
pub(crate) fn set_last_error(error: &impl FlightCalcError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FlightCalcError) -> FlightCalcErrorCode {
    tracing::debug!(code = ?error.code(), message = error.msg(), "ffi call failed");
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FlightCalcErrorCode::Ok;
    });
}

/// Record the outcome of a call and convert it to the code returned across FFI.
pub(crate) fn track_result(result: Result<(), DefaultFlightCalcError>) -> FlightCalcErrorCode {
    match result {
        Ok(()) => {
            clear_last_error();
            FlightCalcErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow a caller-owned C string as `&str`.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string that outlives the
/// returned reference.
pub(crate) unsafe fn borrow_str<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultFlightCalcError> {
    if ptr.is_null() {
        return Err(DefaultFlightCalcError::null_pointer(param_name));
    }
    // SAFETY: non-null and null-terminated per the caller's contract
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| DefaultFlightCalcError::invalid_utf8(param_name))
}

/// Parse a JSON document passed as a C string.
///
/// # Safety
/// See [`borrow_str`].
pub(crate) unsafe fn read_json<T: DeserializeOwned>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<T, DefaultFlightCalcError> {
    // SAFETY: forwarded caller contract
    let text = unsafe { borrow_str(ptr, param_name) }?;
    serde_json::from_str(text).map_err(|e| DefaultFlightCalcError::malformed_json(param_name, &e))
}

/// Serialize `value` and hand ownership of the string to the caller.
///
/// # Safety
/// `out` must be null or valid for writes.
pub(crate) unsafe fn write_json<T: Serialize>(
    value: &T,
    out: *mut *mut c_char,
    param_name: &str,
) -> Result<(), DefaultFlightCalcError> {
    if out.is_null() {
        return Err(DefaultFlightCalcError::null_pointer(param_name));
    }
    let json = serde_json::to_string(value)
        .map_err(|e| DefaultFlightCalcError::output(format!("Failed to serialize result: {e}")))?;
    let cstring = CString::new(json)
        .map_err(|_| DefaultFlightCalcError::output("Result contains a nul byte".to_string()))?;
    // SAFETY: non-null and writable per the caller's contract
    unsafe { *out = cstring.into_raw() };
    Ok(())
}
