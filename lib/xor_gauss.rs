//! Homogeneous linear systems over GF(2).
//!
//! Each equation is the set of variables whose XOR must vanish. This is what
//! Simon's algorithm produces: every measured bit string `y` says `y · s = 0`
//! for the hidden period `s`.

use std::collections::BTreeSet;
use itertools::Itertools;
use crate::error::XorGaussError;

/// Bit-packed row of a GF(2) system.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Row(Vec<u64>);

impl Row {
    fn new(width: usize) -> Self { Self(vec![0; (width >> 6) + 1]) }

    fn get(&self, k: usize) -> bool { self.0[k >> 6] & (1 << (k & 63)) != 0 }

    fn set(&mut self, k: usize) { self.0[k >> 6] |= 1 << (k & 63); }

    fn xor_with(&mut self, other: &Self) {
        self.0.iter_mut().zip(other.0.iter())
            .for_each(|(a, b)| { *a ^= *b; });
    }
}

/// Gauss-Jordan elimination over GF(2).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct XorGaussianEliminationSolver;

impl XorGaussianEliminationSolver {
    pub fn new() -> Self { Self }

    /// Find every assignment of the variables named in `equations` for which
    /// all equations XOR to zero.
    ///
    /// Each solution lists the indices of the variables set to one, in
    /// increasing order; the trivial solution appears as an empty list.
    /// Solutions are returned sorted.
    ///
    /// Fails if the system has at least `usize::BITS` free variables.
    pub fn find_activated_variables<'a, I>(&self, equations: I)
        -> Result<Vec<Vec<usize>>, XorGaussError>
    where I: IntoIterator<Item = &'a BTreeSet<usize>>
    {
        let equations: Vec<&BTreeSet<usize>> = equations.into_iter().collect();
        let variables: Vec<usize>
            = equations.iter()
            .flat_map(|eq| eq.iter().copied())
            .sorted()
            .dedup()
            .collect();
        if variables.is_empty() { return Ok(vec![Vec::new()]); }
        let width = variables.len();
        let column = |var: &usize| variables.binary_search(var).unwrap_or_default();
        let mut rows: Vec<Row>
            = equations.iter()
            .map(|eq| {
                let mut row = Row::new(width);
                eq.iter().for_each(|var| { row.set(column(var)); });
                row
            })
            .collect();

        let pivots = rref(&mut rows, width);
        let free: Vec<usize>
            = (0..width).filter(|col| !pivots.iter().any(|(_, c)| c == col)).collect();
        if free.len() >= usize::BITS as usize {
            return Err(XorGaussError::TooManyFreeVariables(free.len()));
        }

        let mut solutions: Vec<Vec<usize>>
            = (0..1_usize << free.len())
            .map(|assignment| {
                let mut values = vec![false; width];
                free.iter().enumerate()
                    .for_each(|(k, col)| { values[*col] = (assignment >> k) & 1 == 1; });
                pivots.iter()
                    .for_each(|(row, col)| {
                        values[*col]
                            = free.iter()
                            .filter(|f| rows[*row].get(**f) && values[**f])
                            .count() % 2 == 1;
                    });
                values.iter().enumerate()
                    .filter(|(_, v)| **v)
                    .map(|(col, _)| variables[col])
                    .collect()
            })
            .collect();
        solutions.sort();
        Ok(solutions)
    }
}

// Reduce `rows` in place; returns `(row, column)` for every pivot.
fn rref(rows: &mut [Row], width: usize) -> Vec<(usize, usize)> {
    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut row_min: usize = 0;
    for col in 0..width {
        if row_min >= rows.len() { break; }
        let Some(k) = (row_min..rows.len()).find(|i| rows[*i].get(col)) else { continue; };
        rows.swap(k, row_min);
        let pivot = rows[row_min].clone();
        rows.iter_mut().enumerate()
            .filter(|(i, row)| *i != row_min && row.get(col))
            .for_each(|(_, row)| { row.xor_with(&pivot); });
        pivots.push((row_min, col));
        row_min += 1;
    }
    pivots
}
