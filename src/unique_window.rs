// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! `unique_window_length` / `unique_run_length` — Longest run without a repeated symbol.
//!
//! # SQL Usage
//!
//! ```sql
//! -- Over the characters of a string
//! SELECT unique_window_length('pwwkew');  -- 3
//!
//! -- Over a time-ordered stream of symbols per user
//! SELECT user_id,
//!   unique_run_length(event_time, page) AS longest_distinct_browse
//! FROM events
//! GROUP BY user_id
//! ```
//!
//! # Implementation
//!
//! One forward pass. `left` is the inclusive window start and `last_seen`
//! maps each symbol to its most recent index. When the symbol at `right` was
//! last seen inside the window, `left` jumps to one past that occurrence:
//! exactly the prefix that must go to restore uniqueness, never more. `left`
//! only moves forward, so the scan is O(n) time and O(alphabet) space.
//!
//! `last_seen` stores `index + 1` so that 0 can mean "never seen" in both
//! table kinds without an `Option` per slot.

use crate::common::event::{sort_events, SymbolEvent};
use crate::common::frequency::{ByteTable, FrequencyTable, SymbolTable};
use crate::common::window::{str_window, Window};
use std::hash::Hash;

/// Scans `seq` using `last_seen` as the position table.
///
/// Returns the earliest window of maximum length, or `None` for an empty
/// sequence. `last_seen` must start zeroed.
pub fn longest_unique_window_with<S, T>(seq: &[S], mut last_seen: T) -> Option<Window>
where
    S: Copy,
    T: SymbolTable<S>,
{
    let mut left = 0;
    let mut best: Option<Window> = None;

    for (right, &symbol) in seq.iter().enumerate() {
        // seen - 1 is the prior index, so `seen > left` means prior >= left.
        let seen = last_seen.get(symbol);
        if seen > left {
            left = seen;
        }
        last_seen.set(symbol, right + 1);

        let window = Window::from_bounds(left, right);
        if best.is_none_or(|w| window.len > w.len) {
            best = Some(window);
        }
    }

    best
}

/// Earliest longest window of `seq` in which no symbol repeats.
#[must_use]
pub fn longest_unique_window<S: Copy + Eq + Hash>(seq: &[S]) -> Option<Window> {
    longest_unique_window_with(seq, FrequencyTable::new())
}

/// Length of the longest window of `seq` in which no symbol repeats.
///
/// 0 for an empty sequence, `seq.len()` when every symbol is distinct and 1
/// when every symbol is the same.
#[must_use]
pub fn longest_unique_window_length<S: Copy + Eq + Hash>(seq: &[S]) -> usize {
    longest_unique_window(seq).map_or(0, |w| w.len)
}

/// Byte-alphabet variant of [`longest_unique_window`] backed by a [`ByteTable`].
#[must_use]
pub fn longest_unique_bytes(bytes: &[u8]) -> Option<Window> {
    longest_unique_window_with(bytes, ByteTable::new())
}

/// Earliest longest substring of `text` without a repeated `char`.
///
/// Returns `""` for empty input.
#[must_use]
pub fn longest_unique_substring(text: &str) -> &str {
    if text.is_ascii() {
        return longest_unique_bytes(text.as_bytes()).map_or("", |w| &text[w.range()]);
    }
    let (starts, chars): (Vec<usize>, Vec<char>) = text.char_indices().unzip();
    longest_unique_window(&chars).map_or("", |w| str_window(text, &starts, w))
}

/// Length in `char`s of the longest substring of `text` without a repeated `char`.
#[must_use]
pub fn longest_unique_substring_length(text: &str) -> usize {
    if text.is_ascii() {
        return longest_unique_bytes(text.as_bytes()).map_or(0, |w| w.len);
    }
    let chars: Vec<char> = text.chars().collect();
    longest_unique_window_length(&chars)
}

/// State for the `unique_run_length` aggregate.
///
/// Collects timestamped symbols during `update` and runs the scan over the
/// time-ordered stream during `finalize`.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct UniqueWindowState {
    /// Collected rows. Sorted in finalize.
    pub events: Vec<SymbolEvent>,
}

impl UniqueWindowState {
    /// Creates a new empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds a row to the state.
    pub fn update(&mut self, event: SymbolEvent) {
        self.events.push(event);
    }

    /// Combines two states by concatenating their rows, returning a new state.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let mut events = Vec::with_capacity(self.events.len() + other.events.len());
        events.extend_from_slice(&self.events);
        events.extend_from_slice(&other.events);
        Self { events }
    }

    /// Appends `other`'s rows to `self`.
    pub fn combine_in_place(&mut self, other: &Self) {
        self.events.extend_from_slice(&other.events);
    }

    /// Sorts the rows by timestamp and returns the longest unique run length.
    pub fn finalize(&mut self) -> i64 {
        sort_events(&mut self.events);
        let symbols: Vec<&str> = self.events.iter().map(|e| &*e.symbol).collect();
        longest_unique_window_length(&symbols) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(longest_unique_substring_length(""), 0);
        assert_eq!(longest_unique_substring(""), "");
        assert_eq!(longest_unique_window::<u32>(&[]), None);
    }

    #[test]
    fn test_abcabcbb() {
        assert_eq!(longest_unique_substring_length("abcabcbb"), 3);
        assert_eq!(longest_unique_substring("abcabcbb"), "abc");
    }

    #[test]
    fn test_bbbbb() {
        assert_eq!(longest_unique_substring_length("bbbbb"), 1);
        assert_eq!(longest_unique_substring("bbbbb"), "b");
    }

    #[test]
    fn test_pwwkew() {
        assert_eq!(longest_unique_substring_length("pwwkew"), 3);
        assert_eq!(longest_unique_substring("pwwkew"), "wke");
    }

    #[test]
    fn test_all_distinct() {
        assert_eq!(longest_unique_window_length(&[1, 2, 3, 4, 5]), 5);
    }

    #[test]
    fn test_single_symbol() {
        assert_eq!(longest_unique_window(&['x']), Some(Window::new(0, 1)));
    }

    #[test]
    fn test_stale_occurrence_does_not_pull_left_back() {
        // At right = 3, 'a' was last seen at 0, which is already left of the
        // window (left = 2 after the second 'b'). left must not move back to 1.
        assert_eq!(longest_unique_window(b"abba"), Some(Window::new(0, 2)));
        assert_eq!(longest_unique_window_length(b"abba"), 2);
        assert_eq!(longest_unique_substring_length("tmmzuxt"), 5);
    }

    #[test]
    fn test_jump_is_exactly_one_past_prior() {
        // "dvdf": at right=2 ('d'), left jumps to 1, giving "vdf".
        assert_eq!(longest_unique_substring("dvdf"), "vdf");
    }

    #[test]
    fn test_earliest_longest_wins() {
        // "ab" and "ba" and "ab" all have length 2; the first is reported.
        assert_eq!(longest_unique_bytes(b"abab"), Some(Window::new(0, 2)));
    }

    #[test]
    fn test_unicode() {
        assert_eq!(longest_unique_substring_length("ñañb"), 3);
        assert_eq!(longest_unique_substring("ñañb"), "añb");
        assert_eq!(longest_unique_substring_length("€€€"), 1);
    }

    #[test]
    fn test_whitespace_counts_as_symbol() {
        assert_eq!(longest_unique_substring_length("a b c"), 3);
        assert_eq!(longest_unique_substring_length("    "), 1);
    }

    #[test]
    fn test_str_symbols() {
        let pages = ["home", "search", "product", "search", "cart", "checkout"];
        assert_eq!(longest_unique_window(&pages), Some(Window::new(2, 4)));
    }

    #[test]
    fn test_idempotent() {
        let s = "abcaefgbxyz";
        assert_eq!(longest_unique_substring(s), longest_unique_substring(s));
    }

    // --- Aggregate state ---

    #[test]
    fn test_state_empty() {
        let mut state = UniqueWindowState::new();
        assert_eq!(state.finalize(), 0);
    }

    #[test]
    fn test_state_sorts_before_scan() {
        let mut state = UniqueWindowState::new();
        // Time order: a b c a b c b b
        for (ts, s) in [
            (7, "b"),
            (0, "a"),
            (3, "a"),
            (1, "b"),
            (6, "b"),
            (2, "c"),
            (4, "b"),
            (5, "c"),
        ] {
            state.update(SymbolEvent::new(ts, s));
        }
        assert_eq!(state.finalize(), 3);
    }

    #[test]
    fn test_state_combine() {
        let mut a = UniqueWindowState::new();
        a.update(SymbolEvent::new(0, "p"));
        a.update(SymbolEvent::new(2, "w"));

        let mut b = UniqueWindowState::new();
        b.update(SymbolEvent::new(1, "w"));
        b.update(SymbolEvent::new(3, "k"));
        b.update(SymbolEvent::new(4, "e"));
        b.update(SymbolEvent::new(5, "w"));

        assert_eq!(a.combine(&b).finalize(), 3);
        a.combine_in_place(&b);
        assert_eq!(a.events.len(), 6);
        assert_eq!(a.finalize(), 3);
    }

    #[test]
    fn test_state_combine_with_empty() {
        let mut a = UniqueWindowState::new();
        a.update(SymbolEvent::new(0, "x"));
        let empty = UniqueWindowState::new();
        assert_eq!(a.combine(&empty).finalize(), 1);
        assert_eq!(empty.combine(&a).finalize(), 1);
    }
}
