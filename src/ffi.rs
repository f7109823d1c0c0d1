//! FFI bindings for Trend Hunter
//!
//! This module provides C-compatible functions for calling Trend Hunter from other
//! languages. All inputs and outputs are JSON carried in null-terminated C strings.
//! Returned strings are allocated by the library and must be freed by the caller
//! using `hunter_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::HunterConfig;
use crate::error::ComputeError;
use crate::pipeline::{
    related_queries_to_classified, timeseries_to_metrics, ProviderPayloads, TrendProcessor,
};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Read a required string argument, recording an error when it is missing
unsafe fn required_arg(ptr: *const c_char, name: &str) -> Option<String> {
    let value = cstr_to_string(ptr);
    if value.is_none() {
        set_last_error(&format!("Invalid {name} string pointer"));
    }
    value
}

/// Read a nullable string argument: `Ok(None)` for NULL, `Err` for a
/// non-NULL pointer that is not valid UTF-8
unsafe fn optional_arg(ptr: *const c_char, name: &str) -> Result<Option<String>, ComputeError> {
    if ptr.is_null() {
        return Ok(None);
    }
    match cstr_to_string(ptr) {
        Some(value) => Ok(Some(value)),
        None => Err(ComputeError::ParseError(format!("Invalid {name} string pointer"))),
    }
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Hand a result to the caller: the JSON string, or NULL with the error recorded
fn finish(result: Result<String, ComputeError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Configuration from an optional JSON string; NULL means defaults
unsafe fn config_arg(config_json: *const c_char) -> Result<HunterConfig, ComputeError> {
    match optional_arg(config_json, "config JSON")? {
        Some(json) => HunterConfig::from_json(&json),
        None => Ok(HunterConfig::default()),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compute change metrics from an interest-over-time response.
///
/// Returns a JSON object with `month_change`, `quarter_change`, `year_change`
/// and `average`, or the JSON literal `null` when metrics are unavailable.
///
/// # Safety
/// - `timeseries_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `hunter_free_string`.
/// - Returns NULL on error; call `hunter_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hunter_change_metrics(timeseries_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json_str) = required_arg(timeseries_json, "timeseries JSON") else {
        return ptr::null_mut();
    };

    finish(timeseries_to_metrics(&json_str).and_then(|metrics| {
        serde_json::to_string(&metrics).map_err(ComputeError::JsonError)
    }))
}

/// Classify a related-queries response.
///
/// Returns a JSON object with `all_queries`, `questions`, `attributes` and
/// `emerging`.
///
/// # Safety
/// - `queries_json` must be a valid null-terminated C string.
/// - `config_json` may be NULL (defaults) or a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `hunter_free_string`.
/// - Returns NULL on error; call `hunter_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hunter_classify_queries(
    queries_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(json_str) = required_arg(queries_json, "queries JSON") else {
        return ptr::null_mut();
    };

    finish(config_arg(config_json).and_then(|config| {
        let categories = config.selected()?;
        let classified =
            related_queries_to_classified(&json_str, &categories, &config.classify_options())?;
        serde_json::to_string(&classified).map_err(ComputeError::JsonError)
    }))
}

// ============================================================================
// Processor API
// ============================================================================

/// Opaque handle to a TrendProcessor
pub struct TrendProcessorHandle {
    processor: TrendProcessor,
}

/// Create a new TrendProcessor from a JSON configuration.
///
/// # Safety
/// - `config_json` may be NULL (defaults) or a valid null-terminated C string.
/// - Returns a pointer to a newly allocated TrendProcessor.
/// - Must be freed with `hunter_processor_free`.
/// - Returns NULL on invalid configuration; call `hunter_last_error`.
#[no_mangle]
pub unsafe extern "C" fn hunter_processor_new(
    config_json: *const c_char,
) -> *mut TrendProcessorHandle {
    clear_last_error();

    match config_arg(config_json).and_then(TrendProcessor::new) {
        Ok(processor) => Box::into_raw(Box::new(TrendProcessorHandle { processor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a TrendProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `hunter_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn hunter_processor_free(processor: *mut TrendProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Analyse one brand in one country and return the report JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `hunter_processor_new`.
/// - `brand`, `geo`, `timeseries_json` and `queries_json` must be valid
///   null-terminated C strings.
/// - `topics_json` may be NULL; when not NULL it must be valid UTF-8.
/// - Returns a newly allocated string that must be freed with `hunter_free_string`.
/// - Returns NULL on error; call `hunter_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hunter_processor_analyze(
    processor: *const TrendProcessorHandle,
    brand: *const c_char,
    geo: *const c_char,
    timeseries_json: *const c_char,
    queries_json: *const c_char,
    topics_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let Some(brand) = required_arg(brand, "brand") else {
        return ptr::null_mut();
    };
    let Some(geo) = required_arg(geo, "geo") else {
        return ptr::null_mut();
    };
    let Some(timeseries) = required_arg(timeseries_json, "timeseries JSON") else {
        return ptr::null_mut();
    };
    let Some(queries) = required_arg(queries_json, "queries JSON") else {
        return ptr::null_mut();
    };
    let topics = match optional_arg(topics_json, "topics JSON") {
        Ok(topics) => topics,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let payloads = ProviderPayloads {
        timeseries: &timeseries,
        queries: &queries,
        topics: topics.as_deref(),
    };

    finish(handle.processor.analyze_to_json(&brand, &geo, &payloads))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Trend Hunter functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Trend Hunter function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn hunter_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Trend Hunter call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn hunter_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Trend Hunter library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn hunter_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
