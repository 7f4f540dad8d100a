// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! Common types and utilities shared across the window queries.

pub mod event;
pub mod frequency;
pub mod window;
