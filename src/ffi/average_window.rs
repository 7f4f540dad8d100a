// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! FFI registration for the `max_window_average` aggregate function.

use super::{
    add_aggregate_parameter, row_is_valid, set_aggregate_return_type, state_combine,
    state_destroy, state_init, state_size, FfiState,
};
use crate::average_window::AverageWindowState;
use crate::common::event::ValueEvent;
use libduckdb_sys::*;

/// Registers the `max_window_average` function with `DuckDB`.
///
/// Signature: `max_window_average(BIGINT, TIMESTAMP, DOUBLE) -> DOUBLE`
///
/// Rows with a NULL, NaN or infinite value are skipped. Returns NULL when
/// the width is not positive or exceeds the number of remaining rows.
///
/// # Safety
///
/// Requires a valid `duckdb_connection` handle.
pub unsafe fn register_max_window_average(con: duckdb_connection) {
    unsafe {
        let func = duckdb_create_aggregate_function();
        duckdb_aggregate_function_set_name(func, c"max_window_average".as_ptr());

        // Parameter 0: BIGINT (window width)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_BIGINT);
        // Parameter 1: TIMESTAMP (row order)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_TIMESTAMP);
        // Parameter 2: DOUBLE (value)
        add_aggregate_parameter(func, DUCKDB_TYPE_DUCKDB_TYPE_DOUBLE);
        // Return type: DOUBLE (nullable average)
        set_aggregate_return_type(func, DUCKDB_TYPE_DUCKDB_TYPE_DOUBLE);

        duckdb_aggregate_function_set_functions(
            func,
            Some(state_size::<AverageWindowState>),
            Some(state_init::<AverageWindowState>),
            Some(state_update),
            Some(state_combine::<AverageWindowState>),
            Some(state_finalize),
        );

        duckdb_aggregate_function_set_destructor(func, Some(state_destroy::<AverageWindowState>));

        let result = duckdb_register_aggregate_function(con, func);
        if result != DuckDBSuccess {
            eprintln!("windowmatch: failed to register max_window_average function");
        }

        duckdb_destroy_aggregate_function(&mut { func });
    }
}

// SAFETY: `input` is a valid DuckDB data chunk with columns (BIGINT, TIMESTAMP,
// DOUBLE) as registered. `states` points to `row_count` aggregate state pointers.
unsafe extern "C" fn state_update(
    _info: duckdb_function_info,
    input: duckdb_data_chunk,
    states: *mut duckdb_aggregate_state,
) {
    unsafe {
        let row_count = duckdb_data_chunk_get_size(input) as usize;

        // Vector 0: BIGINT (width)
        let width_vec = duckdb_data_chunk_get_vector(input, 0);
        let width_data = duckdb_vector_get_data(width_vec) as *const i64;
        let width_validity = duckdb_vector_get_validity(width_vec);

        // Vector 1: TIMESTAMP
        let ts_vec = duckdb_data_chunk_get_vector(input, 1);
        let ts_data = duckdb_vector_get_data(ts_vec) as *const i64;
        let ts_validity = duckdb_vector_get_validity(ts_vec);

        // Vector 2: DOUBLE
        let value_vec = duckdb_data_chunk_get_vector(input, 2);
        let value_data = duckdb_vector_get_data(value_vec) as *const f64;
        let value_validity = duckdb_vector_get_validity(value_vec);

        for i in 0..row_count {
            let Some(state) = FfiState::<AverageWindowState>::inner_mut(*states.add(i)) else {
                continue;
            };

            if state.width.is_none() && row_is_valid(width_validity, i) {
                state.set_width(*width_data.add(i));
            }

            if !row_is_valid(ts_validity, i) || !row_is_valid(value_validity, i) {
                continue;
            }

            state.update(ValueEvent::new(*ts_data.add(i), *value_data.add(i)));
        }
    }
}

// SAFETY: `source` points to `count` aggregate state pointers. `result` is a
// valid DuckDB DOUBLE vector. Precondition errors produce NULL output.
unsafe extern "C" fn state_finalize(
    _info: duckdb_function_info,
    source: *mut duckdb_aggregate_state,
    result: duckdb_vector,
    count: idx_t,
    offset: idx_t,
) {
    unsafe {
        let data = duckdb_vector_get_data(result) as *mut f64;
        duckdb_vector_ensure_validity_writable(result);
        let validity = duckdb_vector_get_validity(result);

        for i in 0..count as usize {
            let idx = offset as usize + i;
            let average = FfiState::<AverageWindowState>::inner_mut(*source.add(i))
                .and_then(|state| state.finalize().ok());

            match average {
                Some(avg) => *data.add(idx) = avg,
                None => duckdb_validity_set_row_invalid(validity, idx as idx_t),
            }
        }
    }
}
