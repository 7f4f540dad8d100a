// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! `max_window_average` — Largest average over a fixed-width window.
//!
//! # SQL Usage
//!
//! ```sql
//! -- Best 7-reading stretch per sensor
//! SELECT sensor_id,
//!   max_window_average(7, reading_time, value) AS best_weekly_avg
//! FROM readings
//! GROUP BY sensor_id
//! ```
//!
//! # Implementation
//!
//! The first `width` values seed a running sum; each further step adds the
//! entering value and subtracts the leaving one, so the scan is O(n) however
//! wide the window is. The earliest window wins ties.
//!
//! The running sum is Neumaier-compensated. A plain `f64` accumulator loses
//! small values while a large one is inside the window and keeps that error
//! after the large value leaves. The returned sum is recomputed over the
//! chosen window alone.
//!
//! NaN and infinite values are rejected up front since either one poisons
//! every later window sum. The aggregate state drops such rows instead, the
//! same way NULL rows are dropped.

use crate::common::event::{sort_events, ValueEvent};
use crate::common::window::Window;
use crate::error::WindowError;

/// Compensated (Neumaier) running sum.
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn of(values: &[f64]) -> Self {
        let mut acc = Self::default();
        for &v in values {
            acc.add(v);
        }
        acc
    }

    #[inline]
    fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline]
    fn value(self) -> f64 {
        self.sum + self.compensation
    }
}

/// Finds the fixed-width window of `values` with the largest sum.
///
/// Returns the earliest such window and its sum.
///
/// # Errors
///
/// [`WindowError::ZeroWidth`] if `width` is 0,
/// [`WindowError::WidthExceedsInput`] if `width > values.len()` and
/// [`WindowError::NonFiniteValue`] if any value is NaN or infinite.
pub fn max_sum_window(values: &[f64], width: usize) -> Result<(Window, f64), WindowError> {
    if width == 0 {
        return Err(WindowError::ZeroWidth);
    }
    if width > values.len() {
        return Err(WindowError::WidthExceedsInput {
            width,
            len: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(WindowError::NonFiniteValue { index });
    }

    let mut running = CompensatedSum::of(&values[..width]);
    let mut best = (Window::new(0, width), running.value());

    // Step `start` drops values[start] and admits values[start + width].
    for (start, (&leaving, &entering)) in values.iter().zip(&values[width..]).enumerate() {
        running.add(entering);
        running.add(-leaving);
        let sum = running.value();
        if sum > best.1 {
            best = (Window::new(start + 1, width), sum);
        }
    }

    let (window, _) = best;
    Ok((window, CompensatedSum::of(&values[window.range()]).value()))
}

/// Finds the fixed-width window of `values` with the largest average.
///
/// # Errors
///
/// Same preconditions as [`max_sum_window`].
pub fn max_average_window(values: &[f64], width: usize) -> Result<(Window, f64), WindowError> {
    let (window, sum) = max_sum_window(values, width)?;
    Ok((window, sum / width as f64))
}

/// State for the `max_window_average` aggregate.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct AverageWindowState {
    /// Collected rows. Sorted in finalize.
    pub events: Vec<ValueEvent>,
    /// Window width as given in SQL. Validated in finalize.
    pub width: Option<i64>,
}

impl AverageWindowState {
    /// Creates a new empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            width: None,
        }
    }

    /// Sets the window width (called once during the first update).
    pub fn set_width(&mut self, width: i64) {
        if self.width.is_none() {
            self.width = Some(width);
        }
    }

    /// Adds a row to the state. NaN and infinite values are dropped.
    pub fn update(&mut self, event: ValueEvent) {
        if event.value.is_finite() {
            self.events.push(event);
        }
    }

    /// Combines two states by concatenating their rows, returning a new state.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let mut events = Vec::with_capacity(self.events.len() + other.events.len());
        events.extend_from_slice(&self.events);
        events.extend_from_slice(&other.events);
        Self {
            events,
            width: self.width.or(other.width),
        }
    }

    /// Appends `other`'s rows to `self`, adopting its width if `self` has none.
    pub fn combine_in_place(&mut self, other: &Self) {
        self.events.extend_from_slice(&other.events);
        if self.width.is_none() {
            self.width = other.width;
        }
    }

    /// Sorts the rows by timestamp and returns the best window average.
    ///
    /// # Errors
    ///
    /// [`WindowError::InvalidWidth`] for a negative width, otherwise the
    /// errors of [`max_sum_window`]. A group with no width behaves as width 0.
    pub fn finalize(&mut self) -> Result<f64, WindowError> {
        let raw = self.width.unwrap_or(0);
        let width = usize::try_from(raw).map_err(|_| WindowError::InvalidWidth(raw))?;
        sort_events(&mut self.events);
        let values: Vec<f64> = self.events.iter().map(|e| e.value).collect();
        max_average_window(&values, width).map(|(_, avg)| avg)
    }
}
