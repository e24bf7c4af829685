use rustc_hash::FxHashMap;
use std::{fmt::Display, fmt::Formatter, str::FromStr};

/// A prefix code: a bit-string, first bit first. `false` is a 0 (left) bit, `true` a 1 (right) bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// True if self is a prefix of other (equal codes count as prefixes).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && other.bits.starts_with(&self.bits)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &bit in &self.bits {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = String;

    /// Parse a string of '0' and '1' characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(format!("invalid bit character {:?}", other)),
            })
            .collect::<Result<Vec<bool>, String>>()
            .map(Code::from_bits)
    }
}

/// Mapping from byte value to its code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: FxHashMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self {
            codes: FxHashMap::default(),
        }
    }

    /// Insert a code, returning the one it replaced, if any.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order. Headers are written in this order so that the same
    /// table always serializes to the same bytes.
    pub fn sorted(&self) -> Vec<(u8, &Code)> {
        let mut entries = self.codes.iter().map(|(&s, c)| (s, c)).collect::<Vec<_>>();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Dense lookup array used by the encoder's inner loop.
    pub fn to_lookup(&self) -> Vec<Option<&Code>> {
        let mut lookup = vec![None; 256];
        for (&s, code) in &self.codes {
            lookup[s as usize] = Some(code);
        }
        lookup
    }

    /// True if no code is empty and no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let entries = self.sorted();
        entries.iter().all(|(_, c)| !c.is_empty())
            && entries.iter().enumerate().all(|(i, (_, a))| {
                entries
                    .iter()
                    .enumerate()
                    .all(|(j, (_, b))| i == j || !a.is_prefix_of(b))
            })
    }
}

impl Display for CodeTable {
    /// One `symbol code` line per entry, in symbol order.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (symbol, code) in self.sorted() {
            writeln!(f, "{:#04x} {}", symbol, code)?;
        }
        Ok(())
    }
}

impl FromIterator<(u8, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, Code)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}
