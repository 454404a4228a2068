//! C FFI bindings for lss-stats.
//!
//! Lets a host UI hand over raw CSV text and receive a fully computed
//! result as a C string.
//!
//! # Design
//!
//! - **Strings in, strings out**: inputs are null-terminated UTF-8; results
//!   are heap C strings the caller releases with `lss_string_free`
//! - **Null on failure**: the reason is available from `lss_last_error()`;
//!   a successful call clears it
//! - **Header**: `lss_stats.h` is generated by the build script
//! - **Thread-local error message**
//! - **`catch_unwind`**: no panic crosses the FFI boundary
//!
//! # Goal codes
//!
//! `0` = Describe, `1` = Compare, `2` = Associate, `3` = Auto.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic;
use std::ptr;

use crate::analysis::{analyze, AnalysisGoal, AnalysisParams, ResultBundle};
use crate::ingest::CsvParser;
use crate::report::{summary_csv, to_json};

// ── Error handling ────────────────────────────────────────────────────

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Stores `msg` for `lss_last_error`. Interior NULs are replaced so the
/// message is never dropped.
fn set_last_error(msg: &str) {
    let msg = CString::new(msg.replace('\0', "\u{fffd}")).ok();
    LAST_ERROR.with(|cell| {
        cell.replace(msg);
    });
}

/// Returns the message of the most recent failed call on this thread, or
/// null if the last call succeeded or the error was cleared.
///
/// # Safety
/// The caller must not free the returned pointer. It stays valid until the
/// next analysis call or `lss_clear_error` on this thread.
#[no_mangle]
pub extern "C" fn lss_last_error() -> *const c_char {
    LAST_ERROR.with(|cell| cell.borrow().as_ref().map_or(ptr::null(), |msg| msg.as_ptr()))
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn lss_clear_error() {
    LAST_ERROR.with(|cell| {
        cell.take();
    });
}

// ── Input decoding ────────────────────────────────────────────────────

fn goal_from_code(code: u32) -> Option<AnalysisGoal> {
    match code {
        0 => Some(AnalysisGoal::Describe),
        1 => Some(AnalysisGoal::Compare),
        2 => Some(AnalysisGoal::Associate),
        3 => Some(AnalysisGoal::Auto),
        _ => None,
    }
}

/// Reads an optional C string; null maps to `None`.
unsafe fn optional_str<'a>(p: *const c_char, what: &str) -> Result<Option<&'a str>, String> {
    if p.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(p) }
        .to_str()
        .map(Some)
        .map_err(|e| format!("invalid UTF-8 in {what}: {e}"))
}

unsafe fn run_analysis(
    csv_data: *const c_char,
    goal: u32,
    target: *const c_char,
    group: *const c_char,
) -> Result<ResultBundle, String> {
    let csv = unsafe { optional_str(csv_data, "csv_data") }?
        .ok_or_else(|| "null csv_data pointer".to_string())?;
    let goal = goal_from_code(goal).ok_or_else(|| format!("unknown goal code {goal}"))?;
    let params = AnalysisParams {
        target_column: unsafe { optional_str(target, "target") }?.map(str::to_string),
        group_column: unsafe { optional_str(group, "group") }?.map(str::to_string),
    };

    let table = CsvParser::new().parse_str(csv);
    analyze(&table, goal, &params).map_err(|e| e.to_string())
}

/// Shared wrapper: runs `render` on the analysis result and hands the
/// text back as an owned C string.
unsafe fn analysis_entry(
    name: &str,
    csv_data: *const c_char,
    goal: u32,
    target: *const c_char,
    group: *const c_char,
    render: fn(&ResultBundle) -> Result<String, String>,
) -> *mut c_char {
    let result = panic::catch_unwind(|| {
        let text = unsafe { run_analysis(csv_data, goal, target, group) }
            .and_then(|bundle| render(&bundle))
            .and_then(|s| CString::new(s).map_err(|e| e.to_string()));
        match text {
            Ok(c) => {
                lss_clear_error();
                c.into_raw()
            }
            Err(msg) => {
                set_last_error(&msg);
                ptr::null_mut()
            }
        }
    });

    match result {
        Ok(p) => p,
        Err(_) => {
            set_last_error(&format!("panic in {name}"));
            ptr::null_mut()
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────────────

/// Parses `csv_data`, runs the analysis and returns the result as JSON.
///
/// `target` and `group` name the comparison columns and may be null.
///
/// # Safety
/// - `csv_data` must be a valid null-terminated string.
/// - `target` and `group` must be null or valid null-terminated strings.
/// - A non-null result must be freed with `lss_string_free`.
#[no_mangle]
pub unsafe extern "C" fn lss_analyze_csv(
    csv_data: *const c_char,
    goal: u32,
    target: *const c_char,
    group: *const c_char,
) -> *mut c_char {
    unsafe {
        analysis_entry("lss_analyze_csv", csv_data, goal, target, group, |b| {
            to_json(b).map_err(|e| e.to_string())
        })
    }
}

/// Same inputs as `lss_analyze_csv`; returns the sectioned summary CSV.
///
/// # Safety
/// See `lss_analyze_csv`.
#[no_mangle]
pub unsafe extern "C" fn lss_summary_csv(
    csv_data: *const c_char,
    goal: u32,
    target: *const c_char,
    group: *const c_char,
) -> *mut c_char {
    unsafe {
        analysis_entry("lss_summary_csv", csv_data, goal, target, group, |b| {
            Ok(summary_csv(b))
        })
    }
}

/// Frees a string returned by this library.
///
/// # Safety
/// `s` must come from `lss_analyze_csv` / `lss_summary_csv`, or be null.
#[no_mangle]
pub unsafe extern "C" fn lss_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = unsafe { CString::from_raw(s) };
    }
}

// ── Version ──────────────────────────────────────────────────────────

/// Returns the version string of lss-stats.
///
/// # Safety
/// The returned string is a static string literal. Do not free it.
#[no_mangle]
pub extern "C" fn lss_version() -> *const c_char {
    c"0.1.0".as_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(p: *mut c_char) -> String {
        assert!(!p.is_null());
        let s = unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_string();
        unsafe { lss_string_free(p) };
        s
    }

    fn last_error() -> String {
        let p = lss_last_error();
        assert!(!p.is_null());
        unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_string()
    }

    #[test]
    fn ffi_version() {
        let v = lss_version();
        let s = unsafe { CStr::from_ptr(v) }.to_str().unwrap();
        assert_eq!(s, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn ffi_error_lifecycle() {
        lss_clear_error();
        assert!(lss_last_error().is_null());

        set_last_error("test error");
        assert_eq!(last_error(), "test error");

        lss_clear_error();
        assert!(lss_last_error().is_null());
    }

    #[test]
    fn ffi_compare_json() {
        let csv = CString::new("Weight,Line\n10.0,A\n12.0,A\n9.0,B\n11.0,B\n").unwrap();
        let target = CString::new("Weight").unwrap();
        let group = CString::new("Line").unwrap();
        let out = unsafe { lss_analyze_csv(csv.as_ptr(), 1, target.as_ptr(), group.as_ptr()) };
        let v: serde_json::Value = serde_json::from_str(&take(out)).unwrap();
        assert_eq!(v["groupSummary"]["groups"][0]["level"], "A");
        assert_eq!(v["groupSummary"]["groups"][0]["n"], 2);
    }

    #[test]
    fn ffi_describe_summary_csv() {
        let csv = CString::new("x\n1\n3\n").unwrap();
        let out = unsafe { lss_summary_csv(csv.as_ptr(), 0, ptr::null(), ptr::null()) };
        assert!(take(out).starts_with("--- Summary (numeric) ---"));
    }

    #[test]
    fn ffi_invalid_compare_reports_error() {
        let csv = CString::new("Weight,Line\n10,A\n").unwrap();
        let out = unsafe { lss_analyze_csv(csv.as_ptr(), 1, ptr::null(), ptr::null()) };
        assert!(out.is_null());
        assert!(last_error().contains("target column not set"));
    }

    #[test]
    fn ffi_error_with_interior_nul_is_kept() {
        set_last_error("unknown column: a\0b");
        assert_eq!(last_error(), "unknown column: a\u{fffd}b");
        lss_clear_error();
    }

    #[test]
    fn ffi_success_clears_stale_error() {
        set_last_error("stale");
        let csv = CString::new("x\n1\n2\n").unwrap();
        let out = unsafe { lss_analyze_csv(csv.as_ptr(), 0, ptr::null(), ptr::null()) };
        let _ = take(out);
        assert!(lss_last_error().is_null());
    }

    #[test]
    fn ffi_header_declares_entry_points() {
        let header = std::fs::read_to_string(concat!(env!("OUT_DIR"), "/lss_stats.h")).unwrap();
        for name in [
            "lss_analyze_csv",
            "lss_summary_csv",
            "lss_string_free",
            "lss_last_error",
            "lss_clear_error",
            "lss_version",
        ] {
            assert!(header.contains(name), "{name} missing from header");
        }
    }

    #[test]
    fn ffi_unknown_goal() {
        let csv = CString::new("x\n1\n").unwrap();
        let out = unsafe { lss_analyze_csv(csv.as_ptr(), 9, ptr::null(), ptr::null()) };
        assert!(out.is_null());
        assert_eq!(last_error(), "unknown goal code 9");
    }

    #[test]
    fn ffi_null_csv() {
        let out = unsafe { lss_analyze_csv(ptr::null(), 3, ptr::null(), ptr::null()) };
        assert!(out.is_null());
        assert_eq!(last_error(), "null csv_data pointer");
    }

    #[test]
    fn ffi_free_null_is_noop() {
        unsafe { lss_string_free(ptr::null_mut()) };
    }
}
