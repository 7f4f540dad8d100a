// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! The `Window` index range shared by every query.

use std::ops::Range;

/// A contiguous half-open index range `[start, start + len)` into a sequence.
///
/// Produced by the window queries; callers slice their own input with
/// [`Window::range`]. A `Window` never outlives the query's borrow of the
/// sequence, so it stores plain indices rather than a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// Inclusive start index.
    pub start: usize,
    /// Number of symbols in the window.
    pub len: usize,
}

impl Window {
    /// Creates a window starting at `start` spanning `len` symbols.
    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Creates a window from inclusive `left` and inclusive `right` indices.
    #[must_use]
    #[inline]
    pub const fn from_bounds(left: usize, right: usize) -> Self {
        Self {
            start: left,
            len: right - left + 1,
        }
    }

    /// Exclusive end index.
    #[must_use]
    #[inline]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns true if the window covers no symbols.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The window as a `Range` usable for slicing.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Borrows the window's symbols out of `seq`.
    ///
    /// Returns `None` if the window does not fit inside `seq`.
    #[must_use]
    pub fn slice<'a, T>(&self, seq: &'a [T]) -> Option<&'a [T]> {
        seq.get(self.range())
    }
}

/// Slices `text` by a window expressed in `char` positions.
///
/// `char_starts` holds the byte offset of every `char` in `text`, as produced
/// by `text.char_indices()`. The window must lie within `char_starts`.
#[must_use]
pub fn str_window<'a>(text: &'a str, char_starts: &[usize], window: Window) -> &'a str {
    let byte_start = char_starts.get(window.start).copied().unwrap_or(text.len());
    let byte_end = char_starts.get(window.end()).copied().unwrap_or(text.len());
    &text[byte_start..byte_end]
}
