// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! `covering_window` / `covering_run_length` — Shortest window covering a target multiset.
//!
//! A window *covers* the target when, for every symbol the target requires,
//! the window holds at least as many occurrences as the target does.
//!
//! # SQL Usage
//!
//! ```sql
//! SELECT covering_window('ADOBECODEBANC', 'ABC');  -- 'BANC'
//!
//! -- Fewest consecutive events in which a user viewed twice and bought once
//! SELECT user_id,
//!   covering_run_length('view, view, purchase', event_time, event_type) AS span
//! FROM events
//! GROUP BY user_id
//! ```
//!
//! # Implementation
//!
//! The target is counted once into a [`TargetMultiset`]. `required` is its
//! number of distinct symbols and `satisfied` counts the distinct symbols
//! whose window count has reached the target count. `right` advances over
//! the source once; whenever `satisfied == required` the window is recorded
//! if strictly shorter than the best so far, then `left` advances, and the
//! contraction stops as soon as a leaving symbol drops below its requirement.
//!
//! `left` never passes `right` and never moves back, so across the whole scan
//! it advances at most n times: O(|source| + |target|) time and
//! O(distinct(target)) space. Only symbols in the target's domain are ever
//! counted.

use crate::common::event::{sort_events, SymbolEvent};
use crate::common::frequency::{ByteTable, FrequencyTable, SymbolTable, TargetMultiset};
use crate::common::window::{str_window, Window};
use std::hash::Hash;

/// Separator between symbols in a SQL target list.
pub const TARGET_SEPARATOR: char = ',';

/// Scans `source` for the shortest window covering `target`, counting with
/// tables of type `T`.
///
/// Returns `None` if either input is empty or no window covers the target.
/// Among windows of minimal length the earliest one is returned.
pub fn shortest_covering_window_with<S, T>(source: &[S], target: &[S]) -> Option<Window>
where
    S: Copy,
    T: SymbolTable<S> + Default,
{
    if source.is_empty() || target.is_empty() || target.len() > source.len() {
        return None;
    }

    let need: TargetMultiset<S, T> = TargetMultiset::from_symbols(target.iter().copied());
    let required = need.distinct();
    let mut counts = T::default();
    let mut satisfied = 0;
    let mut left = 0;
    let mut best: Option<Window> = None;

    for (right, &symbol) in source.iter().enumerate() {
        let want = need.required(symbol);
        if want == 0 {
            continue;
        }
        if counts.increment(symbol) == want {
            satisfied += 1;
        }

        while satisfied == required {
            let window = Window::from_bounds(left, right);
            if best.is_none_or(|w| window.len < w.len) {
                best = Some(window);
            }

            let leaving = source[left];
            let leaving_want = need.required(leaving);
            if leaving_want > 0 && counts.decrement(leaving) < leaving_want {
                satisfied -= 1;
            }
            left += 1;
        }
    }

    best
}

/// Shortest window of `source` covering every symbol of `target` with at
/// least the target's multiplicity.
#[must_use]
pub fn shortest_covering_window<S: Copy + Eq + Hash>(
    source: &[S],
    target: &[S],
) -> Option<Window> {
    shortest_covering_window_with::<S, FrequencyTable<S>>(source, target)
}

/// Byte-alphabet variant of [`shortest_covering_window`] backed by [`ByteTable`]s.
#[must_use]
pub fn shortest_covering_bytes(source: &[u8], target: &[u8]) -> Option<Window> {
    shortest_covering_window_with::<u8, ByteTable>(source, target)
}

/// Shortest substring of `source` containing every `char` of `target`,
/// repeats included.
///
/// Returns `None` if either string is empty or no substring covers `target`.
#[must_use]
pub fn shortest_covering_substring<'a>(source: &'a str, target: &str) -> Option<&'a str> {
    if source.is_ascii() && target.is_ascii() {
        return shortest_covering_bytes(source.as_bytes(), target.as_bytes())
            .map(|w| &source[w.range()]);
    }
    let (starts, chars): (Vec<usize>, Vec<char>) = source.char_indices().unzip();
    let target: Vec<char> = target.chars().collect();
    shortest_covering_window(&chars, &target).map(|w| str_window(source, &starts, w))
}

/// Splits a SQL target list such as `'view, view, purchase'` into symbols.
///
/// Pieces are trimmed and empty pieces are dropped. Repeated symbols stay
/// repeated, since they raise the required count.
#[must_use]
pub fn parse_target_list(list: &str) -> Vec<&str> {
    list.split(TARGET_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// State for the `covering_run_length` aggregate.
///
/// Collects timestamped symbols during `update`, then finds the shortest
/// run of consecutive (time-ordered) rows covering the target list during
/// `finalize`.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct CoveringWindowState {
    /// Collected rows. Sorted in finalize.
    pub events: Vec<SymbolEvent>,
    /// Target list as given in SQL. Parsed in finalize.
    pub target_str: Option<String>,
}

impl CoveringWindowState {
    /// Creates a new empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            target_str: None,
        }
    }

    /// Sets the target list (called once during the first update).
    pub fn set_target(&mut self, target: &str) {
        if self.target_str.is_none() {
            self.target_str = Some(target.to_string());
        }
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
        Self {
            events,
            target_str: self
                .target_str
                .clone()
                .or_else(|| other.target_str.clone()),
        }
    }

    /// Appends `other`'s rows to `self`, adopting its target if `self` has none.
    pub fn combine_in_place(&mut self, other: &Self) {
        self.events.extend_from_slice(&other.events);
        if self.target_str.is_none() {
            self.target_str.clone_from(&other.target_str);
        }
    }

    /// Sorts the rows and returns the row count of the shortest covering run,
    /// or `None` if no run covers the target.
    pub fn finalize(&mut self) -> Option<i64> {
        sort_events(&mut self.events);
        let target = parse_target_list(self.target_str.as_deref().unwrap_or(""));
        let symbols: Vec<&str> = self.events.iter().map(|e| &*e.symbol).collect();
        shortest_covering_window(&symbols, &target).map(|w| w.len as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adobecodebanc() {
        assert_eq!(shortest_covering_substring("ADOBECODEBANC", "ABC"), Some("BANC"));
        assert_eq!(
            shortest_covering_bytes(b"ADOBECODEBANC", b"ABC"),
            Some(Window::new(9, 4))
        );
    }

    #[test]
    fn test_single_symbol_match() {
        assert_eq!(shortest_covering_substring("a", "a"), Some("a"));
    }

    #[test]
    fn test_multiplicity_not_met() {
        assert_eq!(shortest_covering_substring("a", "aa"), None);
        assert_eq!(shortest_covering_substring("ab", "aa"), None);
    }

    #[test]
    fn test_multiplicity_met() {
        assert_eq!(shortest_covering_substring("abaxa", "aa"), Some("aba"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(shortest_covering_substring("", "a"), None);
        assert_eq!(shortest_covering_substring("abc", ""), None);
        assert_eq!(shortest_covering_substring("", ""), None);
    }

    #[test]
    fn test_target_longer_than_source() {
        assert_eq!(shortest_covering_substring("abc", "abcd"), None);
    }

    #[test]
    fn test_target_symbol_absent() {
        assert_eq!(shortest_covering_substring("abcdef", "az"), None);
    }

    #[test]
    fn test_ties_return_earliest() {
        // "ab" at 0 and "ba" at 1 and "ab" at 2 all have length 2.
        assert_eq!(shortest_covering_bytes(b"abab", b"ab"), Some(Window::new(0, 2)));
    }

    #[test]
    fn test_whole_source() {
        assert_eq!(shortest_covering_substring("cab", "abc"), Some("cab"));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(shortest_covering_substring("aAbB", "AB"), Some("AbB"));
    }

    #[test]
    fn test_unicode() {
        assert_eq!(shortest_covering_substring("x€yñz€", "€ñ"), Some("€yñ"));
        assert_eq!(shortest_covering_substring("x€yñ€", "€ñ"), Some("ñ€"));
        assert_eq!(shortest_covering_substring("ñ", "n"), None);
    }

    #[test]
    fn test_mixed_ascii_source_unicode_target() {
        assert_eq!(shortest_covering_substring("abc", "€"), None);
    }

    #[test]
    fn test_str_symbols() {
        let events = ["home", "view", "cart", "view", "home", "purchase"];
        let target = ["view", "purchase"];
        assert_eq!(shortest_covering_window(&events, &target), Some(Window::new(3, 3)));
    }

    #[test]
    fn test_parse_target_list() {
        assert_eq!(parse_target_list("view, view ,purchase"), ["view", "view", "purchase"]);
        assert_eq!(parse_target_list(" , ,"), Vec::<&str>::new());
        assert_eq!(parse_target_list(""), Vec::<&str>::new());
        assert_eq!(parse_target_list("a"), ["a"]);
    }

    // --- Aggregate state ---

    fn state_with(target: &str, rows: &[(i64, &str)]) -> CoveringWindowState {
        let mut state = CoveringWindowState::new();
        state.set_target(target);
        for &(ts, s) in rows {
            state.update(SymbolEvent::new(ts, s));
        }
        state
    }

    #[test]
    fn test_state_basic() {
        let mut state = state_with(
            "view, purchase",
            &[(0, "view"), (1, "home"), (2, "view"), (3, "cart"), (4, "purchase")],
        );
        assert_eq!(state.finalize(), Some(3));
    }

    #[test]
    fn test_state_unsorted_rows() {
        let mut state = state_with(
            "view,purchase",
            &[(4, "purchase"), (2, "view"), (0, "view"), (3, "cart"), (1, "home")],
        );
        assert_eq!(state.finalize(), Some(3));
    }

    #[test]
    fn test_state_not_found() {
        let mut state = state_with("view,view", &[(0, "view"), (1, "cart")]);
        assert_eq!(state.finalize(), None);
    }

    #[test]
    fn test_state_no_target() {
        let mut state = CoveringWindowState::new();
        state.update(SymbolEvent::new(0, "view"));
        assert_eq!(state.finalize(), None);
    }

    #[test]
    fn test_state_empty() {
        let mut state = CoveringWindowState::new();
        state.set_target("view");
        assert_eq!(state.finalize(), None);
    }

    #[test]
    fn test_set_target_first_wins() {
        let mut state = CoveringWindowState::new();
        state.set_target("a");
        state.set_target("b");
        assert_eq!(state.target_str.as_deref(), Some("a"));
    }

    #[test]
    fn test_state_combine_adopts_target() {
        let mut a = CoveringWindowState::new();
        a.update(SymbolEvent::new(0, "x"));
        let b = state_with("x,y", &[(1, "y")]);

        assert_eq!(a.combine(&b).finalize(), Some(2));
        a.combine_in_place(&b);
        assert_eq!(a.target_str.as_deref(), Some("x,y"));
        assert_eq!(a.finalize(), Some(2));
    }

    #[test]
    fn test_state_combine_order_irrelevant() {
        let a = state_with("a,b", &[(0, "a"), (5, "c")]);
        let b = state_with("a,b", &[(1, "c"), (2, "b")]);
        assert_eq!(a.combine(&b).finalize(), b.combine(&a).finalize());
        assert_eq!(a.combine(&b).finalize(), Some(3));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn count(seq: &[u8], symbol: u8) -> usize {
        seq.iter().filter(|&&x| x == symbol).count()
    }

    fn dominates(window: &[u8], target: &[u8]) -> bool {
        target.iter().all(|&t| count(window, t) >= count(target, t))
    }

    fn brute_force_len(source: &[u8], target: &[u8]) -> Option<usize> {
        if source.is_empty() || target.is_empty() {
            return None;
        }
        (1..=source.len()).find(|&len| source.windows(len).any(|w| dominates(w, target)))
    }

    proptest! {
        #[test]
        fn found_window_dominates_and_is_minimal(
            source in prop::collection::vec(0u8..4, 0..30),
            target in prop::collection::vec(0u8..4, 0..5),
        ) {
            let found = shortest_covering_window(&source, &target);
            prop_assert_eq!(found.map(|w| w.len), brute_force_len(&source, &target));
            if let Some(w) = found {
                prop_assert!(dominates(w.slice(&source).unwrap(), &target));
                // Earliest among minimal windows.
                let earliest = source.windows(w.len).position(|x| dominates(x, &target));
                prop_assert_eq!(earliest, Some(w.start));
            }
        }

        #[test]
        fn byte_and_hash_tables_agree(
            source in prop::collection::vec(any::<u8>(), 0..64),
            target in prop::collection::vec(any::<u8>(), 0..4),
        ) {
            prop_assert_eq!(
                shortest_covering_bytes(&source, &target),
                shortest_covering_window(&source, &target)
            );
        }

        #[test]
        fn idempotent(source in "[abc]{0,20}", target in "[abc]{0,4}") {
            prop_assert_eq!(
                shortest_covering_substring(&source, &target),
                shortest_covering_substring(&source, &target)
            );
        }

        #[test]
        fn appending_never_destroys_coverage(
            source in prop::collection::vec(0u8..4, 1..20),
            extra in prop::collection::vec(0u8..4, 0..10),
            target in prop::collection::vec(0u8..4, 1..4),
        ) {
            if let Some(before) = shortest_covering_window(&source, &target) {
                let mut longer = source.clone();
                longer.extend_from_slice(&extra);
                let after = shortest_covering_window(&longer, &target);
                prop_assert!(after.is_some_and(|w| w.len <= before.len));
            }
        }

        #[test]
        fn ascii_and_char_paths_agree(source in "[a-d]{0,24}", target in "[a-d]{0,4}") {
            let chars: Vec<char> = source.chars().collect();
            let target_chars: Vec<char> = target.chars().collect();
            let by_chars = shortest_covering_window(&chars, &target_chars)
                .map(|w| chars[w.range()].iter().collect::<String>());
            prop_assert_eq!(
                shortest_covering_substring(&source, &target).map(str::to_string),
                by_chars
            );
        }
    }
}
