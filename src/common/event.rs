// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! Timestamped row types collected by the aggregate functions.
//!
//! The aggregate forms of the window queries receive rows in arbitrary order
//! and across parallel partial states. Each state buffers its rows, and
//! `finalize` restores timestamp order before scanning.
//!
//! Symbols are stored as `Arc<str>` so that `combine` can clone a row with a
//! reference-count bump instead of a string copy.

use std::sync::Arc;

/// A single timestamped symbol row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEvent {
    /// Timestamp in microseconds since Unix epoch.
    pub timestamp_us: i64,
    /// The row's symbol.
    pub symbol: Arc<str>,
}

impl SymbolEvent {
    /// Creates a new symbol event.
    #[must_use]
    pub fn new(timestamp_us: i64, symbol: impl Into<Arc<str>>) -> Self {
        Self {
            timestamp_us,
            symbol: symbol.into(),
        }
    }
}

/// A single timestamped numeric row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEvent {
    /// Timestamp in microseconds since Unix epoch.
    pub timestamp_us: i64,
    /// The row's value.
    pub value: f64,
}

impl ValueEvent {
    /// Creates a new value event.
    #[must_use]
    pub const fn new(timestamp_us: i64, value: f64) -> Self {
        Self {
            timestamp_us,
            value,
        }
    }
}

/// Anything carrying an ordering timestamp.
pub trait Timestamped {
    /// Timestamp in microseconds since Unix epoch.
    fn timestamp_us(&self) -> i64;
}

impl Timestamped for SymbolEvent {
    #[inline]
    fn timestamp_us(&self) -> i64 {
        self.timestamp_us
    }
}

impl Timestamped for ValueEvent {
    #[inline]
    fn timestamp_us(&self) -> i64 {
        self.timestamp_us
    }
}

/// Sorts events by timestamp (ascending).
///
/// Performs an O(n) presorted check first and skips the sort when rows
/// already arrive in order, which is the common case under `ORDER BY`.
///
/// The sort is stable: rows sharing a timestamp keep their arrival order.
/// Unlike a condition bitmask, a symbol stream is order-sensitive within a
/// timestamp (`"ab"` and `"ba"` have different windows), so arrival order is
/// the only tie-break available.
pub fn sort_events<E: Timestamped>(events: &mut [E]) {
    if events
        .windows(2)
        .all(|w| w[0].timestamp_us() <= w[1].timestamp_us())
    {
        return;
    }
    events.sort_by_key(Timestamped::timestamp_us);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_event_creation() {
        let e = SymbolEvent::new(1_000_000, "view");
        assert_eq!(e.timestamp_us, 1_000_000);
        assert_eq!(&*e.symbol, "view");
    }

    #[test]
    fn test_symbol_event_clone_shares_symbol() {
        let e = SymbolEvent::new(0, "cart");
        let c = e.clone();
        assert!(Arc::ptr_eq(&e.symbol, &c.symbol));
    }

    #[test]
    fn test_sort_events() {
        let mut events = vec![
            SymbolEvent::new(300, "c"),
            SymbolEvent::new(100, "a"),
            SymbolEvent::new(200, "b"),
        ];
        sort_events(&mut events);
        let order: Vec<&str> = events.iter().map(|e| &*e.symbol).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_sort_events_stable_on_ties() {
        let mut events = vec![
            SymbolEvent::new(200, "z"),
            SymbolEvent::new(100, "x"),
            SymbolEvent::new(100, "y"),
        ];
        sort_events(&mut events);
        let order: Vec<&str> = events.iter().map(|e| &*e.symbol).collect();
        assert_eq!(order, ["x", "y", "z"]);
    }

    #[test]
    fn test_sort_value_events() {
        let mut events = vec![ValueEvent::new(2, 2.0), ValueEvent::new(1, 1.0)];
        sort_events(&mut events);
        assert_eq!(events[0].value, 1.0);
        assert_eq!(events[1].value, 2.0);
    }

    #[test]
    fn test_sort_empty_and_single() {
        let mut empty: Vec<ValueEvent> = Vec::new();
        sort_events(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![SymbolEvent::new(5, "a")];
        sort_events(&mut single);
        assert_eq!(single[0].timestamp_us, 5);
    }
}
