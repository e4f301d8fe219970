//! Fixed-width bit patterns over an oracle's control qubits.
//!
//! An oracle is activated by every control-bit pattern listed in its truth
//! table. Patterns are written in control order, so the first character of
//! `"10"` refers to the first control. Nesting oracles inside oracles
//! concatenates the patterns of the outer and inner tables.

use std::{ fmt, ops::Add };
use itertools::Itertools;
use crate::error::GateError;

/// One activating pattern over `width` control qubits.
///
/// The first control maps to the most significant bit of `bits`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TruthTableEntry {
    bits: u64,
    width: u32,
}

impl TruthTableEntry {
    /// Maximum number of controls a single entry can describe.
    pub const MAX_WIDTH: usize = u64::BITS as usize;

    /// Parse a bit string for an oracle with `control_count` controls.
    ///
    /// Strings shorter than `control_count` are left-padded with zeros; longer
    /// strings are accepted only if the surplus leading characters are all
    /// `'0'`.
    pub fn parse(text: &str, control_count: usize) -> Result<Self, GateError> {
        let unrepresentable = || {
            GateError::GateTruthTableCanNotBeRepresentedWithGivenControlCount {
                entry: text.to_string(),
                control_count,
            }
        };
        if text.is_empty()
            || control_count == 0
            || control_count > Self::MAX_WIDTH
            || !text.chars().all(|c| c == '0' || c == '1')
        {
            return Err(unrepresentable());
        }
        let surplus = text.len().saturating_sub(control_count);
        if text[..surplus].contains('1') {
            return Err(unrepresentable());
        }
        let bits
            = text[surplus..].chars()
            .fold(0_u64, |acc, c| (acc << 1) | u64::from(c == '1'));
        Ok(Self { bits, width: control_count as u32 })
    }

    /// Build an entry directly from a bit pattern.
    ///
    /// *Panics if `width` exceeds [`Self::MAX_WIDTH`].*
    pub fn from_bits(bits: u64, width: usize) -> Self {
        assert!(width <= Self::MAX_WIDTH, "TruthTableEntry: width exceeds 64");
        let mask = mask(width as u32);
        Self { bits: bits & mask, width: width as u32 }
    }

    /// The single pattern with every control set.
    pub fn all_ones(width: usize) -> Self { Self::from_bits(u64::MAX, width) }

    pub fn bits(&self) -> u64 { self.bits }

    pub fn width(&self) -> usize { self.width as usize }

    /// Concatenate every entry of `outer` with every entry of `inner`.
    pub fn cartesian_concat(outer: &[Self], inner: &[Self]) -> Vec<Self> {
        outer.iter()
            .cartesian_product(inner.iter())
            .map(|(a, b)| *a + *b)
            .unique()
            .collect()
    }
}

fn mask(width: u32) -> u64 {
    if width >= u64::BITS { u64::MAX } else { (1_u64 << width) - 1 }
}

impl Add for TruthTableEntry {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let width = self.width + rhs.width;
        debug_assert!(width as usize <= Self::MAX_WIDTH);
        let bits = self.bits.checked_shl(rhs.width).unwrap_or(0) | rhs.bits;
        Self { bits, width }
    }
}

impl fmt::Display for TruthTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 { return Ok(()); }
        write!(f, "{:0width$b}", self.bits, width = self.width as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_pads_with_zeros() {
        let entry = TruthTableEntry::parse("1", 3).unwrap();
        assert_eq!(entry.bits(), 0b001);
        assert_eq!(entry.width(), 3);
        assert_eq!(entry.to_string(), "001");
    }

    #[test]
    fn parse_accepts_surplus_zeros_only() {
        assert_eq!(TruthTableEntry::parse("0011", 2).unwrap().bits(), 0b11);
        assert!(TruthTableEntry::parse("111", 2).is_err());
    }

    #[test]
    fn parse_rejects_non_binary() {
        assert_eq!(
            TruthTableEntry::parse("1a", 2).unwrap_err(),
            GateError::GateTruthTableCanNotBeRepresentedWithGivenControlCount {
                entry: "1a".to_string(),
                control_count: 2,
            },
        );
        assert!(TruthTableEntry::parse("", 2).is_err());
        assert!(TruthTableEntry::parse("0", 0).is_err());
    }

    #[test]
    fn concatenation() {
        let a = TruthTableEntry::parse("10", 2).unwrap();
        let b = TruthTableEntry::parse("1", 1).unwrap();
        let ab = a + b;
        assert_eq!(ab.to_string(), "101");
        assert_eq!(ab.width(), 3);
        assert_eq!(TruthTableEntry::all_ones(2) + b, TruthTableEntry::all_ones(3));
    }

    #[test]
    fn cartesian_concatenation() {
        let outer = [
            TruthTableEntry::parse("0", 1).unwrap(),
            TruthTableEntry::parse("1", 1).unwrap(),
        ];
        let inner = [TruthTableEntry::parse("11", 2).unwrap()];
        let combined: Vec<String>
            = TruthTableEntry::cartesian_concat(&outer, &inner)
            .into_iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(combined, vec!["011".to_string(), "111".to_string()]);
    }
}
