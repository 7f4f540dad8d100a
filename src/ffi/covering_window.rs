// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! FFI registration for the `covering_run_length` aggregate function.

use super::{
    add_aggregate_parameter, read_varchar, row_is_valid, set_aggregate_return_type,
    state_combine, state_destroy, state_init, state_size, FfiState,
};
use crate::common::event::SymbolEvent;
use crate::covering_window::CoveringWindowState;
use libduckdb_sys::*;

/// Registers the `covering_run_length` function with `DuckDB`.
///
/// Signature: `covering_run_length(VARCHAR, TIMESTAMP, VARCHAR) -> BIGINT`
///
/// Parameters:
/// - `target`: comma-separated symbol list, repeats raise the required count
/// - `timestamp`: row order
/// - `symbol`: the row's symbol
///
/// Returns NULL when no run of rows covers the target.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
pub unsafe fn register_covering_run_length(con: duckdb_connection) {
    unsafe {
        let func = duckdb_create_aggregate_function();
        duckdb_aggregate_function_set_name(func, c"covering_run_length".as_ptr());

        // Parameter 0: VARCHAR (target list)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR);
        // Parameter 1: TIMESTAMP (row order)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP);
        // Parameter 2: VARCHAR (symbol)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR);
        // Return type: BIGINT (nullable run length)
        set_aggregate_return_type(func, DUCKDB_TYPE_DUCKDB_TYPE_BIGINT);

        duckdb_aggregate_function_set_functions(
            func,
            Some(state_size::<CoveringWindowState>),
            Some(state_init::<CoveringWindowState>),
            Some(state_update),
            Some(state_combine::<CoveringWindowState>),
            Some(state_finalize),
        );

        duckdb_aggregate_function_set_destructor(
            func,
            Some(state_destroy::<CoveringWindowState>),
        );

        let result = duckdb_register_aggregate_function(con, func);
        if result != DuckDBSuccess {
            eprintln!("windowmatch: failed to register covering_run_length function");
        }

        duckdb_destroy_aggregate_function(&mut { func });
    }
}

// SAFETY: `input` is a valid DuckDB data chunk with columns (VARCHAR, TIMESTAMP,
// VARCHAR) as registered. `states` points to `row_count` aggregate state pointers.
// String data is copied out before the chunk is released.
unsafe extern "C" fn state_update(
    _info: duckdb_function_info,
    input: duckdb_data_chunk,
    states: *mut duckdb_aggregate_state,
) {
    unsafe {
        let row_count = duckdb_data_chunk_get_size(input) as usize;

        // Vector 0: VARCHAR (target list)
        let target_vec = duckdb_data_chunk_get_vector(input, 0);

        // Vector 1: TIMESTAMP
        let ts_vec = duckdb_data_chunk_get_vector(input, 1);
        let ts_data = duckdb_vector_get_data(ts_vec) as *const i64;
        let ts_validity = duckdb_vector_get_validity(ts_vec);

        // Vector 2: VARCHAR (symbol)
        let symbol_vec = duckdb_data_chunk_get_vector(input, 2);

        for i in 0..row_count {
            let Some(state) = FfiState::<CoveringWindowState>::inner_mut(*states.add(i)) else {
                continue;
            };

            // Target list is constant per group; read it from the first row that has one.
            if state.target_str.is_none() {
                if let Some(target) = read_varchar(target_vec, i) {
                    state.set_target(target);
                }
            }

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
// valid DuckDB BIGINT vector. NULL is set via validity bitmap when not found.
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
            let span = FfiState::<CoveringWindowState>::inner_mut(*source.add(i))
                .and_then(CoveringWindowState::finalize);

            match span {
                Some(len) => *data.add(idx) = len,
                None => duckdb_validity_set_row_invalid(validity, idx as idx_t),
            }
        }
    }
}
