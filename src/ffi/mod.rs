//! FFI bindings for registering the window functions with `DuckDB`.
//!
//! This module bridges the pure Rust implementations with `DuckDB`'s C Extension API.
//!
//! # Architecture
//!
//! Two kinds of functions are registered through the raw `libduckdb-sys` bindings:
//!
//! - **Scalar** (`scalar`): one call per data chunk over `VARCHAR` columns.
//! - **Aggregate** (`unique_window`, `covering_window`, `average_window`):
//!   the five callbacks `state_size`, `init`, `update`, `combine` and
//!   `finalize`, plus a destructor.
//!
//! Every aggregate stores a `#[repr(C)]` [`FfiState`] in `DuckDB`'s state
//! buffer pointing at a boxed Rust state. The size/init/combine/destroy
//! callbacks are identical across aggregates and are written once here,
//! generic over the state type; only `update` and `finalize` are specific.

pub mod average_window;
pub mod covering_window;
pub mod scalar;
pub mod unique_window;

use crate::average_window::AverageWindowState;
use crate::covering_window::CoveringWindowState;
use crate::unique_window::UniqueWindowState;
use libduckdb_sys::*;

/// Registers all window functions using a raw `duckdb_connection` handle.
///
/// This function is called from the custom C entry point in `lib.rs`, which obtains
/// the connection directly via `duckdb_connect`.
pub fn register_all_raw(raw_con: duckdb_connection) {
    // Safety: The raw connection handle is valid: obtained via duckdb_connect
    // in windowmatch_init_internal and will be disconnected after registration.
    unsafe {
        scalar::register_unique_window_length(raw_con);
        scalar::register_covering_window(raw_con);
        unique_window::register_unique_run_length(raw_con);
        covering_window::register_covering_run_length(raw_con);
        average_window::register_max_window_average(raw_con);
    }
}

/// Aggregate states that can absorb a partial state from another thread.
pub trait MergeState {
    /// Folds `other` into `self`.
    fn merge_from(&mut self, other: &Self);
}

impl MergeState for UniqueWindowState {
    fn merge_from(&mut self, other: &Self) {
        self.combine_in_place(other);
    }
}

impl MergeState for CoveringWindowState {
    fn merge_from(&mut self, other: &Self) {
        self.combine_in_place(other);
    }
}

impl MergeState for AverageWindowState {
    fn merge_from(&mut self, other: &Self) {
        self.combine_in_place(other);
    }
}

/// State stored in `DuckDB`'s aggregate state buffer.
/// Points to a heap-allocated Rust state.
#[repr(C)]
pub struct FfiState<S> {
    inner: *mut S,
}

impl<S> FfiState<S> {
    /// Borrows the Rust state behind an aggregate state pointer.
    ///
    /// # Safety
    ///
    /// `state` must point to an `FfiState<S>` initialized by [`state_init`]
    /// and not yet destroyed, with no other live borrow of its inner state.
    pub unsafe fn inner_mut<'a>(state: duckdb_aggregate_state) -> Option<&'a mut S> {
        unsafe {
            let ffi_state = &*(state as *const Self);
            ffi_state.inner.as_mut()
        }
    }
}

// SAFETY: Returns the byte size of FfiState for DuckDB's state allocation.
// Pure computation with no pointer dereferences.
pub unsafe extern "C" fn state_size<S>(_info: duckdb_function_info) -> idx_t {
    std::mem::size_of::<FfiState<S>>() as idx_t
}

// SAFETY: `state` is a DuckDB-allocated buffer of at least `state_size()` bytes.
// The inner pointer is a fresh Box, freed in `state_destroy`.
pub unsafe extern "C" fn state_init<S: Default>(
    _info: duckdb_function_info,
    state: duckdb_aggregate_state,
) {
    unsafe {
        let ffi_state = &mut *(state as *mut FfiState<S>);
        ffi_state.inner = Box::into_raw(Box::new(S::default()));
    }
}

// SAFETY: `source` and `target` point to `count` aggregate state pointers,
// each initialized by `state_init`. Null checks guard against uninitialized states.
pub unsafe extern "C" fn state_combine<S: MergeState>(
    _info: duckdb_function_info,
    source: *mut duckdb_aggregate_state,
    target: *mut duckdb_aggregate_state,
    count: idx_t,
) {
    unsafe {
        for i in 0..count as usize {
            let src_ffi = &*(*source.add(i) as *const FfiState<S>);
            let tgt_ffi = &mut *(*target.add(i) as *mut FfiState<S>);

            if src_ffi.inner.is_null() || tgt_ffi.inner.is_null() {
                continue;
            }

            (*tgt_ffi.inner).merge_from(&*src_ffi.inner);
        }
    }
}

// SAFETY: `state` points to `count` aggregate state pointers. Each inner pointer
// was allocated by `Box::into_raw` in `state_init`. We reclaim the Box to free
// heap memory, then null the pointer to prevent double-free.
pub unsafe extern "C" fn state_destroy<S>(state: *mut duckdb_aggregate_state, count: idx_t) {
    unsafe {
        for i in 0..count as usize {
            let ffi_state = &mut *(*state.add(i) as *mut FfiState<S>);
            if !ffi_state.inner.is_null() {
                drop(Box::from_raw(ffi_state.inner));
                ffi_state.inner = std::ptr::null_mut();
            }
        }
    }
}

/// Adds one parameter of the given type to an aggregate function.
///
/// # Safety
///
/// `func` must be a live aggregate function handle.
pub unsafe fn add_aggregate_parameter(func: duckdb_aggregate_function, type_id: duckdb_type) {
    unsafe {
        let logical_type = duckdb_create_logical_type(type_id);
        duckdb_aggregate_function_add_parameter(func, logical_type);
        duckdb_destroy_logical_type(&mut { logical_type });
    }
}

/// Sets the return type of an aggregate function.
///
/// # Safety
///
/// `func` must be a live aggregate function handle.
pub unsafe fn set_aggregate_return_type(func: duckdb_aggregate_function, type_id: duckdb_type) {
    unsafe {
        let logical_type = duckdb_create_logical_type(type_id);
        duckdb_aggregate_function_set_return_type(func, logical_type);
        duckdb_destroy_logical_type(&mut { logical_type });
    }
}

/// Returns true if row `row` of a vector with validity mask `validity` is non-NULL.
///
/// # Safety
///
/// `validity` must be null (all rows valid) or a validity mask covering `row`.
#[inline]
pub unsafe fn row_is_valid(validity: *mut u64, row: usize) -> bool {
    unsafe { validity.is_null() || duckdb_validity_row_is_valid(validity, row as idx_t) }
}

/// Reads a VARCHAR value from a `DuckDB` vector at the given row index.
///
/// Returns `None` for NULL or non-UTF-8 values. The returned slice borrows
/// `DuckDB`'s string storage and is only valid while the data chunk is.
///
/// # Safety
///
/// Requires a valid `DuckDB` vector with VARCHAR data covering `row`.
pub unsafe fn read_varchar<'a>(vec: duckdb_vector, row: usize) -> Option<&'a str> {
    unsafe {
        let data = duckdb_vector_get_data(vec);
        let validity = duckdb_vector_get_validity(vec);

        if !row_is_valid(validity, row) || data.is_null() {
            return None;
        }

        // VARCHAR is stored as duckdb_string_t: inlined for short strings,
        // pointer + length otherwise. duckdb_string_t_data handles both.
        let str_struct =
            data.add(row * std::mem::size_of::<duckdb_string_t>()) as *const duckdb_string_t;
        let str_ptr = duckdb_string_t_data(str_struct.cast_mut());
        if str_ptr.is_null() {
            return None;
        }

        let len = duckdb_string_t_length(*str_struct);
        let bytes = std::slice::from_raw_parts(str_ptr as *const u8, len as usize);
        std::str::from_utf8(bytes).ok()
    }
}
