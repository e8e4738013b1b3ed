//! Canonical DTMF tones and the keypad symbol tables built on them.

use crate::error::{ConfigError, ToneGroup};
use std::sync::{Arc, OnceLock};

pub const LOW_TONES_HZ: [u32; 4] = [697, 770, 852, 941];
pub const HIGH_TONES_HZ: [u32; 3] = [1209, 1336, 1477];
pub const EXTENDED_HIGH_TONES_HZ: [u32; 4] = [1209, 1336, 1477, 1633];

const STANDARD_KEYS: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

const EXTENDED_KEYS: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

static DIGITS: OnceLock<Arc<ToneTable>> = OnceLock::new();
static STANDARD: OnceLock<Arc<ToneTable>> = OnceLock::new();
static EXTENDED: OnceLock<Arc<ToneTable>> = OnceLock::new();

/// Candidate tones for both bands plus the symbol for each (low, high) pair.
///
/// A pair may be left without a symbol, as in the digits-only keypad where
/// 941 Hz only pairs with 1336 Hz. Decoding such a pair emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneTable {
    low: Vec<u32>,
    high: Vec<u32>,
    // Row-major: keys[low_index * high.len() + high_index].
    keys: Vec<Option<char>>,
}

impl ToneTable {
    /// The 10-key digits-only keypad: `0`-`9`, no `*` or `#`.
    pub fn digits() -> Arc<Self> {
        DIGITS
            .get_or_init(|| {
                let mut table = Self::from_grid(&LOW_TONES_HZ, &HIGH_TONES_HZ, &STANDARD_KEYS);
                for key in &mut table.keys {
                    if matches!(key, Some('*' | '#')) {
                        *key = None;
                    }
                }
                Arc::new(table)
            })
            .clone()
    }

    /// The 12-key telephone keypad (`0`-`9`, `*`, `#`).
    pub fn standard() -> Arc<Self> {
        STANDARD
            .get_or_init(|| Arc::new(Self::from_grid(&LOW_TONES_HZ, &HIGH_TONES_HZ, &STANDARD_KEYS)))
            .clone()
    }

    /// The 16-key keypad with the 1633 Hz column (`A`-`D`).
    pub fn extended() -> Arc<Self> {
        EXTENDED
            .get_or_init(|| {
                Arc::new(Self::from_grid(
                    &LOW_TONES_HZ,
                    &EXTENDED_HIGH_TONES_HZ,
                    &EXTENDED_KEYS,
                ))
            })
            .clone()
    }

    /// Build a custom table from candidate lists and `(low, high, symbol)`
    /// entries. Pairs without an entry have no symbol.
    pub fn new(
        low: &[u32],
        high: &[u32],
        entries: &[(u32, u32, char)],
    ) -> Result<Self, ConfigError> {
        if low.is_empty() {
            return Err(ConfigError::EmptyToneGroup(ToneGroup::Low));
        }
        if high.is_empty() {
            return Err(ConfigError::EmptyToneGroup(ToneGroup::High));
        }

        let mut keys: Vec<Option<char>> = vec![None; low.len() * high.len()];
        for &(lo, hi, symbol) in entries {
            let (li, hi_idx) = match (
                low.iter().position(|&f| f == lo),
                high.iter().position(|&f| f == hi),
            ) {
                (Some(li), Some(hi_idx)) => (li, hi_idx),
                _ => return Err(ConfigError::UnknownTone { low: lo, high: hi }),
            };
            if keys.iter().flatten().any(|&k| k == symbol) {
                return Err(ConfigError::DuplicateSymbol(symbol));
            }
            keys[li * high.len() + hi_idx] = Some(symbol);
        }

        Ok(Self {
            low: low.to_vec(),
            high: high.to_vec(),
            keys,
        })
    }

    fn from_grid<const L: usize, const H: usize>(
        low: &[u32; L],
        high: &[u32; H],
        grid: &[[char; H]; L],
    ) -> Self {
        Self {
            low: low.to_vec(),
            high: high.to_vec(),
            keys: grid.iter().flatten().copied().map(Some).collect(),
        }
    }

    pub fn low_tones(&self) -> &[u32] {
        &self.low
    }

    pub fn high_tones(&self) -> &[u32] {
        &self.high
    }

    /// Symbol for a tone pair, if both tones are candidates of this table.
    pub fn symbol(&self, low_hz: u32, high_hz: u32) -> Option<char> {
        let li = self.low.iter().position(|&f| f == low_hz)?;
        let hi = self.high.iter().position(|&f| f == high_hz)?;
        self.keys.get(li * self.high.len() + hi).copied().flatten()
    }

    /// Tone pair for a symbol. Letters match case-insensitively.
    pub fn tones(&self, symbol: char) -> Option<(u32, u32)> {
        let upper = symbol.to_ascii_uppercase();
        let idx = self
            .keys
            .iter()
            .position(|&k| k == Some(symbol) || k == Some(upper))?;
        Some((self.low[idx / self.high.len()], self.high[idx % self.high.len()]))
    }

    /// All symbols in keypad order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.keys.iter().flatten().copied()
    }

    pub fn highest_tone(&self) -> u32 {
        self.high.iter().copied().max().unwrap_or(0)
    }
}
