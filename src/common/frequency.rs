// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-window-match)

//! Per-symbol count storage for the window scans.
//!
//! Both window queries keep a small `symbol -> usize` map that is updated
//! incrementally as the window bounds move. [`SymbolTable`] abstracts over
//! the backing store so the scans are written once:
//!
//! - [`FrequencyTable`]: hash map, for unbounded alphabets (`char`, `&str`, ids).
//! - [`ByteTable`]: fixed 256-slot array, for byte alphabets. No hashing and
//!   no allocation, which makes it the fast path for ASCII text.
//!
//! Both implementations must be observationally identical: a symbol that was
//! never written reads as `0`.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// A `symbol -> usize` map where absent symbols read as zero.
pub trait SymbolTable<S: Copy> {
    /// Returns the value stored for `symbol`, or 0 if none.
    fn get(&self, symbol: S) -> usize;

    /// Overwrites the value stored for `symbol`.
    fn set(&mut self, symbol: S, value: usize);

    /// Adds one to `symbol`'s value and returns the new value.
    #[inline]
    fn increment(&mut self, symbol: S) -> usize {
        let value = self.get(symbol) + 1;
        self.set(symbol, value);
        value
    }

    /// Subtracts one from `symbol`'s value (saturating at 0) and returns the new value.
    #[inline]
    fn decrement(&mut self, symbol: S) -> usize {
        let value = self.get(symbol).saturating_sub(1);
        self.set(symbol, value);
        value
    }
}

/// Hash-backed [`SymbolTable`] for arbitrary hashable symbols.
#[derive(Debug, Clone)]
pub struct FrequencyTable<S> {
    counts: HashMap<S, usize>,
}

impl<S: Eq + Hash> FrequencyTable<S> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Number of distinct symbols that have ever been written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<S: Eq + Hash> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy + Eq + Hash> SymbolTable<S> for FrequencyTable<S> {
    #[inline]
    fn get(&self, symbol: S) -> usize {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    #[inline]
    fn set(&mut self, symbol: S, value: usize) {
        self.counts.insert(symbol, value);
    }

    #[inline]
    fn increment(&mut self, symbol: S) -> usize {
        let slot = self.counts.entry(symbol).or_insert(0);
        *slot += 1;
        *slot
    }
}

/// Array-backed [`SymbolTable`] keyed by byte value.
///
/// 256 slots of `usize` (2 KiB). Cleared by construction, so a fresh table is
/// created per query like the hash-backed one.
#[derive(Debug, Clone)]
pub struct ByteTable {
    slots: [usize; 256],
}

impl ByteTable {
    /// Creates a zeroed table.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: [0; 256] }
    }
}

impl Default for ByteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable<u8> for ByteTable {
    #[inline]
    fn get(&self, symbol: u8) -> usize {
        self.slots[usize::from(symbol)]
    }

    #[inline]
    fn set(&mut self, symbol: u8, value: usize) {
        self.slots[usize::from(symbol)] = value;
    }
}

/// Required minimum count per symbol, derived once from a target collection.
///
/// Also records the number of distinct required symbols, which is the
/// `required` threshold the covering scan compares its `satisfied` counter
/// against.
#[derive(Debug, Clone)]
pub struct TargetMultiset<S, T> {
    counts: T,
    distinct: usize,
    total: usize,
    _symbol: PhantomData<fn(S)>,
}

impl<S: Copy, T: SymbolTable<S> + Default> TargetMultiset<S, T> {
    /// Builds the multiset by counting every symbol of `target`.
    pub fn from_symbols<I: IntoIterator<Item = S>>(target: I) -> Self {
        let mut counts = T::default();
        let mut distinct = 0;
        let mut total = 0;
        for symbol in target {
            if counts.increment(symbol) == 1 {
                distinct += 1;
            }
            total += 1;
        }
        Self {
            counts,
            distinct,
            total,
            _symbol: PhantomData,
        }
    }
}

impl<S: Copy, T: SymbolTable<S>> TargetMultiset<S, T> {
    /// Minimum number of occurrences of `symbol` a covering window must hold.
    #[inline]
    pub fn required(&self, symbol: S) -> usize {
        self.counts.get(symbol)
    }

    /// Returns true if `symbol` appears in the target at all.
    #[inline]
    pub fn contains(&self, symbol: S) -> bool {
        self.counts.get(symbol) > 0
    }

    /// Number of distinct symbols in the target.
    pub const fn distinct(&self) -> usize {
        self.distinct
    }

    /// Number of symbols in the target, counting repeats.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns true if the target had no symbols.
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}
