//! # `windowmatch` — Sliding-Window Matching Extension for `DuckDB`
//!
//! Two-pointer window scans over symbol sequences, usable as a Rust library
//! and as a loadable `DuckDB` extension.
//!
//! ## Functions
//!
//! | Function | Type | Description |
//! |----------|------|-------------|
//! | `unique_window_length(s)` | Scalar | Longest substring without a repeated character |
//! | `covering_window(s, t)` | Scalar | Shortest substring of `s` containing every character of `t` |
//! | `unique_run_length(ts, symbol)` | Aggregate | Longest time-ordered run of distinct symbols |
//! | `covering_run_length(target, ts, symbol)` | Aggregate | Fewest consecutive rows covering a target symbol list |
//! | `max_window_average(width, ts, value)` | Aggregate | Largest average over `width` consecutive rows |
//!
//! ## Rust API
//!
//! ```
//! use windowmatch::covering_window::shortest_covering_substring;
//! use windowmatch::unique_window::longest_unique_substring_length;
//!
//! assert_eq!(longest_unique_substring_length("abcabcbb"), 3);
//! assert_eq!(shortest_covering_substring("ADOBECODEBANC", "ABC"), Some("BANC"));
//! ```
//!
//! ## Installation
//!
//! ```sql
//! LOAD 'windowmatch.duckdb_extension';
//! ```

pub mod average_window;
pub mod common;
pub mod covering_window;
pub mod error;
pub mod unique_window;

mod ffi;

/// Extension entry point called by `DuckDB` when the extension is loaded.
///
/// This is a hand-written C entry point that bypasses `duckdb::Connection` entirely.
/// The raw `duckdb_connection` is obtained directly via the C API
/// (`duckdb_connect`), all functions are registered, and the connection is closed.
///
/// # Safety
///
/// Called by `DuckDB`'s extension loading mechanism via FFI.
/// `info` and `access` must be valid pointers provided by `DuckDB`.
#[no_mangle]
pub unsafe extern "C" fn windowmatch_init_c_api(
    info: libduckdb_sys::duckdb_extension_info,
    access: *const libduckdb_sys::duckdb_extension_access,
) -> bool {
    match windowmatch_init_internal(info, access) {
        Ok(result) => result,
        Err(e) => {
            let Some(set_error) = (*access).set_error else {
                return false;
            };
            match std::ffi::CString::new(e.to_string()) {
                Ok(err) => set_error(info, err.as_ptr()),
                Err(_) => set_error(
                    info,
                    c"Extension init failed and could not allocate error string".as_ptr(),
                ),
            }
            false
        }
    }
}

unsafe fn windowmatch_init_internal(
    info: libduckdb_sys::duckdb_extension_info,
    access: *const libduckdb_sys::duckdb_extension_access,
) -> Result<bool, Box<dyn std::error::Error>> {
    // Populates the extension API function pointers.
    let have_api = libduckdb_sys::duckdb_rs_extension_api_init(info, access, "v1.2.0")
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

    if !have_api {
        // DuckDB is older than the minimum C API version.
        return Ok(false);
    }

    let get_database = (*access)
        .get_database
        .ok_or("DuckDB did not provide get_database")?;
    let db_ptr = get_database(info);
    if db_ptr.is_null() {
        return Err("DuckDB returned a null database handle".into());
    }
    let db: libduckdb_sys::duckdb_database = *db_ptr;

    let mut raw_con: libduckdb_sys::duckdb_connection = std::ptr::null_mut();
    let rc = libduckdb_sys::duckdb_connect(db, &mut raw_con);
    if rc != libduckdb_sys::DuckDBSuccess {
        return Err("Failed to open DuckDB connection for extension registration".into());
    }

    ffi::register_all_raw(raw_con);

    libduckdb_sys::duckdb_disconnect(&mut raw_con);

    Ok(true)
}
