// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! FFI registration for the `unique_run_length` aggregate function.

use super::{
    add_aggregate_parameter, read_varchar, row_is_valid, set_aggregate_return_type,
    state_combine, state_destroy, state_init, state_size, FfiState,
};
use crate::common::event::SymbolEvent;
use crate::unique_window::UniqueWindowState;
use libduckdb_sys::*;

/// Registers the `unique_run_length` function with `DuckDB`.
///
/// Signature: `unique_run_length(TIMESTAMP, VARCHAR) -> BIGINT`
///
/// Rows with a NULL timestamp or NULL symbol are skipped.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
pub unsafe fn register_unique_run_length(con: duckdb_connection) {
    unsafe {
        let func = duckdb_create_aggregate_function();
        duckdb_aggregate_function_set_name(func, c"unique_run_length".as_ptr());

        // Parameter 0: TIMESTAMP (row order)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP);
        // Parameter 1: VARCHAR (symbol)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR);
        // Return type: BIGINT (run length)
        set_aggregate_return_type(func, DUCKDB_TYPE_DUCKDB_TYPE_BIGINT);

        duckdb_aggregate_function_set_functions(
            func,
            Some(state_size::<UniqueWindowState>),
            Some(state_init::<UniqueWindowState>),
            Some(state_update),
            Some(state_combine::<UniqueWindowState>),
            Some(state_finalize),
        );

        duckdb_aggregate_function_set_destructor(func, Some(state_destroy::<UniqueWindowState>));

        let result = duckdb_register_aggregate_function(con, func);
        if result != DuckDBSuccess {
            eprintln!("windowmatch: failed to register unique_run_length function");
        }

        duckdb_destroy_aggregate_function(&mut { func });
    }
}

// SAFETY: `input` is a valid DuckDB data chunk with columns (TIMESTAMP, VARCHAR)
// as registered. `states` points to `row_count` aggregate state pointers, each
// initialized by `state_init`.
unsafe extern "C" fn state_update(
    _info: duckdb_function_info,
    input: duckdb_data_chunk,
    states: *mut duckdb_aggregate_state,
) {
    unsafe {
        let row_count = duckdb_data_chunk_get_size(input) as usize;

        // Vector 0: TIMESTAMP (i64 microseconds)
        let ts_vec = duckdb_data_chunk_get_vector(input, 0);
        let ts_data = duckdb_vector_get_data(ts_vec) as *const i64;
        let ts_validity = duckdb_vector_get_validity(ts_vec);

        // Vector 1: VARCHAR (symbol)
        let symbol_vec = duckdb_data_chunk_get_vector(input, 1);

        for i in 0..row_count {
            let Some(state) = FfiState::<UniqueWindowState>::inner_mut(*states.add(i)) else {
                continue;
            };

            if !row_is_valid(ts_validity, i) {
                continue;
            }
            let Some(symbol) = read_varchar(symbol_vec, i) else {
                continue;
            };

            state.update(SymbolEvent::new(*ts_data.add(i), symbol));
        }
    }
}

// SAFETY: `source` points to `count` aggregate state pointers. `result` is a
// valid DuckDB BIGINT vector with room for `offset + count` elements.
unsafe extern "C" fn state_finalize(
    _info: duckdb_function_info,
    source: *mut duckdb_aggregate_state,
    result: duckdb_vector,
    count: idx_t,
    offset: idx_t,
) {
    unsafe {
        let data = duckdb_vector_get_data(result) as *mut i64;
        duckdb_vector_ensure_validity_writable(result);
        let validity = duckdb_vector_get_validity(result);

        for i in 0..count as usize {
            let idx = offset as usize + i;
            match FfiState::<UniqueWindowState>::inner_mut(*source.add(i)) {
                Some(state) => *data.add(idx) = state.finalize(),
                None => duckdb_validity_set_row_invalid(validity, idx as idx_t),
            }
        }
    }
}
