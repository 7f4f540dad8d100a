// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! Precondition violations reported by the window queries.
//!
//! "Not found" and zero-length results are ordinary outcomes and are modeled
//! as `Option` / `0`, never as errors.

use std::fmt;

/// Error returned when a query is called with arguments it cannot satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum WindowError {
    /// A fixed-width window of zero symbols was requested.
    ZeroWidth,
    /// The requested fixed width is larger than the input.
    WidthExceedsInput {
        /// Requested window width.
        width: usize,
        /// Length of the input sequence.
        len: usize,
    },
    /// The window width was negative or otherwise not representable.
    InvalidWidth(i64),
    /// A value to be summed was NaN or infinite.
    NonFiniteValue {
        /// Position of the first such value.
        index: usize,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWidth => write!(f, "window width must be at least 1"),
            Self::WidthExceedsInput { width, len } => {
                write!(f, "window width {width} exceeds input length {len}")
            }
            Self::InvalidWidth(width) => write!(f, "invalid window width {width}"),
            Self::NonFiniteValue { index } => write!(f, "value at index {index} is not finite"),
        }
    }
}

impl std::error::Error for WindowError {}
