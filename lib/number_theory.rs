//! Integer helpers for post-processing Shor-style measurements.

use num_rational::Ratio;

/// Greatest common divisors by Euclid's algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EuclideanSolver;

impl EuclideanSolver {
    /// `gcd(|a|, |b|)`; `gcd(0, 0) = 0`.
    pub fn find_greatest_common_divisor(a: i64, b: i64) -> u64 {
        let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
        while b != 0 {
            (a, b) = (b, a % b);
        }
        a
    }
}

/// Rational approximation by truncated continued fractions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContinuedFractionsSolver;

impl ContinuedFractionsSolver {
    /// Return the first convergent of `value` whose distance from `value` is
    /// at most `limit`.
    ///
    /// Returns `None` only for a negative `limit`; since the expansion of a
    /// rational ends at the value itself, some convergent always qualifies
    /// otherwise.
    pub fn find_approximation(value: Ratio<i64>, limit: Ratio<i64>) -> Option<Ratio<i64>> {
        if limit < Ratio::from_integer(0) { return None; }
        // convergents h/k from the recurrences h_n = a_n h_{n-1} + h_{n-2}
        let (mut h_prev, mut h) = (0_i64, 1_i64);
        let (mut k_prev, mut k) = (1_i64, 0_i64);
        let mut rest = value;
        loop {
            let a = rest.floor().to_integer();
            (h_prev, h) = (h, a * h + h_prev);
            (k_prev, k) = (k, a * k + k_prev);
            let approximation = Ratio::new(h, k);
            let fraction = rest - Ratio::from_integer(a);
            let error = value - approximation;
            let error = if error < Ratio::from_integer(0) { -error } else { error };
            if error <= limit || fraction == Ratio::from_integer(0) {
                return Some(approximation);
            }
            rest = fraction.recip();
        }
    }
}

/// `base^exponent mod modulus` by repeated squaring.
///
/// *Panics if `modulus` is zero.*
pub fn modular_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    assert!(modulus > 0, "modular_pow: modulus must be positive");
    if modulus == 1 { return 0; }
    let m = u128::from(modulus);
    let mut result: u128 = 1;
    let mut b = u128::from(base) % m;
    let mut e = exponent;
    while e > 0 {
        if e & 1 == 1 { result = result * b % m; }
        b = b * b % m;
        e >>= 1;
    }
    result as u64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn greatest_common_divisor() {
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(252, 105), 21);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(105, 252), 21);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(-12, 18), 6);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(7, 0), 7);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(0, 0), 0);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(i64::MIN, 0), 1 << 63);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(0, i64::MIN), 1 << 63);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(i64::MIN, 6), 2);
        assert_eq!(EuclideanSolver::find_greatest_common_divisor(i64::MIN, i64::MIN), 1 << 63);
    }

    #[test]
    fn continued_fractions() {
        // 0.75 = 3/4 exactly
        let value = Ratio::new(192, 256);
        let approx
            = ContinuedFractionsSolver::find_approximation(value, Ratio::new(1, 512))
            .unwrap();
        assert_eq!(approx, Ratio::new(3, 4));
        // 0.333... measured on 8 bits
        let value = Ratio::new(85, 256);
        let approx
            = ContinuedFractionsSolver::find_approximation(value, Ratio::new(1, 100))
            .unwrap();
        assert_eq!(approx, Ratio::new(1, 3));
        assert!(ContinuedFractionsSolver::find_approximation(value, Ratio::new(-1, 2)).is_none());
    }

    #[test]
    fn modular_exponentiation() {
        assert_eq!(modular_pow(7, 4, 15), 1);
        assert_eq!(modular_pow(2, 10, 1000), 24);
        assert_eq!(modular_pow(5, 0, 13), 1);
        assert_eq!(modular_pow(5, 3, 1), 0);
    }
}
