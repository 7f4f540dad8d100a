// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! FFI registration for the scalar string functions.
//!
//! - `unique_window_length(VARCHAR) -> BIGINT`
//! - `covering_window(VARCHAR, VARCHAR) -> VARCHAR`
//!
//! NULL in any argument yields NULL. `covering_window` also yields NULL when
//! no window covers the target, including for empty arguments.

use super::read_varchar;
use crate::covering_window::shortest_covering_substring;
use crate::unique_window::longest_unique_substring_length;
use libduckdb_sys::*;
use std::ffi::CStr;

/// Creates, registers and destroys a scalar function.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
unsafe fn register_scalar(
    con: duckdb_connection,
    name: &CStr,
    params: &[duckdb_type],
    return_type: duckdb_type,
    function: unsafe extern "C" fn(duckdb_function_info, duckdb_data_chunk, duckdb_vector),
) {
    unsafe {
        let func = duckdb_create_scalar_function();
        duckdb_scalar_function_set_name(func, name.as_ptr());

        for &type_id in params {
            let param_type = duckdb_create_logical_type(type_id);
            duckdb_scalar_function_add_parameter(func, param_type);
            duckdb_destroy_logical_type(&mut { param_type });
        }

        let ret_type = duckdb_create_logical_type(return_type);
        duckdb_scalar_function_set_return_type(func, ret_type);
        duckdb_destroy_logical_type(&mut { ret_type });

        duckdb_scalar_function_set_function(func, Some(function));

        let result = duckdb_register_scalar_function(con, func);
        if result != DuckDBSuccess {
            eprintln!(
                "windowmatch: failed to register {} function",
                name.to_string_lossy()
            );
        }

        duckdb_destroy_scalar_function(&mut { func });
    }
}

/// Registers `unique_window_length(VARCHAR) -> BIGINT`.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
pub unsafe fn register_unique_window_length(con: duckdb_connection) {
    unsafe {
        register_scalar(
            con,
            c"unique_window_length",
            &[DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR],
            DUCKDB_TYPE_DUCKDB_TYPE_BIGINT,
            unique_window_length_fn,
        );
    }
}

/// Registers `covering_window(VARCHAR, VARCHAR) -> VARCHAR`.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
pub unsafe fn register_covering_window(con: duckdb_connection) {
    unsafe {
        register_scalar(
            con,
            c"covering_window",
            &[
                DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR,
                DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR,
            ],
            DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR,
            covering_window_fn,
        );
    }
}

// SAFETY: `input` is a valid DuckDB data chunk with one VARCHAR column.
// `output` is a BIGINT vector with room for every input row.
unsafe extern "C" fn unique_window_length_fn(
    _info: duckdb_function_info,
    input: duckdb_data_chunk,
    output: duckdb_vector,
) {
    unsafe {
        let row_count = duckdb_data_chunk_get_size(input) as usize;
        let text_vec = duckdb_data_chunk_get_vector(input, 0);

        let data = duckdb_vector_get_data(output) as *mut i64;
        duckdb_vector_ensure_validity_writable(output);
        let validity = duckdb_vector_get_validity(output);

        for i in 0..row_count {
            match read_varchar(text_vec, i) {
                Some(text) => *data.add(i) = longest_unique_substring_length(text) as i64,
                None => duckdb_validity_set_row_invalid(validity, i as idx_t),
            }
        }
    }
}

// SAFETY: `input` is a valid DuckDB data chunk with two VARCHAR columns.
// `output` is a VARCHAR vector; strings are copied in by
// `duckdb_vector_assign_string_element_len`, so borrowing the input is sound.
unsafe extern "C" fn covering_window_fn(
    _info: duckdb_function_info,
    input: duckdb_data_chunk,
    output: duckdb_vector,
) {
    unsafe {
        let row_count = duckdb_data_chunk_get_size(input) as usize;
        let source_vec = duckdb_data_chunk_get_vector(input, 0);
        let target_vec = duckdb_data_chunk_get_vector(input, 1);

        duckdb_vector_ensure_validity_writable(output);
        let validity = duckdb_vector_get_validity(output);

        for i in 0..row_count {
            let window = read_varchar(source_vec, i)
                .zip(read_varchar(target_vec, i))
                .and_then(|(source, target)| shortest_covering_substring(source, target));

            match window {
                Some(text) => duckdb_vector_assign_string_element_len(
                    output,
                    i as idx_t,
                    text.as_ptr().cast(),
                    text.len() as idx_t,
                ),
                None => duckdb_validity_set_row_invalid(validity, i as idx_t),
            }
        }
    }
}
