//! Functions to construct exact [`BigRational`]s and approximate floats, and the [`Num`] type
//! that unifies them during arithmetic.

use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::ops::{Add, Mul, Neg};

/// Creates an exact integer with the given value.
pub fn int<T>(n: T) -> BigRational
where
    BigInt: From<T>,
{
    BigRational::from_integer(BigInt::from(n))
}

/// Creates the exact rational `numer / denom`. The denominator must be non-zero.
pub fn rational(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Creates an exact integer from a string of decimal digits.
pub fn int_from_str(s: &str) -> Option<BigRational> {
    s.parse::<BigInt>().ok().map(BigRational::from_integer)
}

/// Creates a float from a decimal literal such as `2.5`, `.5`, or `3.`.
pub fn float_from_str(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Returns the integer `n`-th root of `value` if `value` is a perfect `n`-th power.
pub fn exact_root(value: &BigInt, n: u32) -> Option<BigInt> {
    if value.is_negative() {
        if n % 2 == 0 {
            return None;
        }
        return exact_root(&-value, n).map(|root| -root);
    }
    let root = value.nth_root(n);
    (num_traits::pow(root.clone(), n as usize) == *value).then_some(root)
}

/// Splits a non-negative integer `n` into `(a, r)` such that `n = a^2 * r`, removing as many
/// square factors as trial division up to a fixed bound can find.
pub fn split_square(n: &BigInt) -> (BigInt, BigInt) {
    const LIMIT: u32 = 10_000;

    let mut outside = BigInt::one();
    let mut inside = n.clone();
    if inside.is_zero() {
        return (BigInt::zero(), BigInt::one());
    }

    let mut p = BigInt::from(2);
    for _ in 2..LIMIT {
        if &p * &p > inside {
            break;
        }
        let square = &p * &p;
        while (&inside % &square).is_zero() {
            inside /= &square;
            outside *= &p;
        }
        p += 1;
    }

    if let Some(root) = exact_root(&inside, 2) {
        if !root.is_one() {
            outside *= &root;
            inside = BigInt::one();
        }
    }

    (outside, inside)
}

/// Returns true if the given integer is prime, using deterministic Miller-Rabin bases (exact below
/// `3.3 * 10^24`, probabilistic beyond).
pub fn is_prime(n: &BigInt) -> bool {
    const BASES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

    let two = BigInt::from(2);
    if n < &two {
        return false;
    }
    for base in BASES {
        let base = BigInt::from(base);
        if *n == base {
            return true;
        }
        if (n % &base).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - BigInt::one();
    let mut d = n_minus_one.clone();
    let mut s = 0;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    'witness: for base in BASES {
        let mut x = BigInt::from(base).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// A numeric coefficient. Arithmetic between two [`Num::Exact`] values stays exact; anything
/// involving a [`Num::Approx`] becomes approximate.
#[derive(Debug, Clone, PartialEq)]
pub enum Num {
    Exact(BigRational),
    Approx(f64),
}

impl Num {
    pub fn zero() -> Self {
        Self::Exact(BigRational::zero())
    }

    pub fn one() -> Self {
        Self::Exact(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(n) => n.is_zero(),
            Self::Approx(f) => *f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Self::Exact(n) => n.is_one(),
            Self::Approx(f) => *f == 1.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Self::Exact(n) => n.is_negative(),
            Self::Approx(f) => *f < 0.0,
        }
    }

    /// Returns the value as an `f64`, which may lose precision.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Exact(n) => n.to_f64().unwrap_or(f64::NAN),
            Self::Approx(f) => *f,
        }
    }

    /// Returns the multiplicative inverse, or [`None`] for zero.
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(match self {
            Self::Exact(n) => Self::Exact(n.recip()),
            Self::Approx(f) => Self::Approx(f.recip()),
        })
    }
}

impl Add for Num {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a + b),
            (a, b) => Self::Approx(a.to_f64() + b.to_f64()),
        }
    }
}

impl Mul for Num {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a * b),
            (a, b) => Self::Approx(a.to_f64() * b.to_f64()),
        }
    }
}

impl Neg for Num {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Exact(n) => Self::Exact(-n),
            Self::Approx(f) => Self::Approx(-f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn exact_roots() {
        assert_eq!(exact_root(&BigInt::from(144), 2), Some(BigInt::from(12)));
        assert_eq!(exact_root(&BigInt::from(-27), 3), Some(BigInt::from(-3)));
        assert_eq!(exact_root(&BigInt::from(10), 2), None);
        assert_eq!(exact_root(&BigInt::from(-4), 2), None);
    }

    #[test]
    fn square_split() {
        assert_eq!(split_square(&BigInt::from(8)), (BigInt::from(2), BigInt::from(2)));
        assert_eq!(split_square(&BigInt::from(72)), (BigInt::from(6), BigInt::from(2)));
        assert_eq!(split_square(&BigInt::from(49)), (BigInt::from(7), BigInt::from(1)));
        assert_eq!(split_square(&BigInt::from(15)), (BigInt::from(1), BigInt::from(15)));
    }

    #[test]
    fn primality() {
        let primes = [2, 3, 5, 97, 7919, 1_000_000_007];
        let composites = [0, 1, 4, 91, 561, 1_000_000_008];
        assert!(primes.iter().all(|&p| is_prime(&BigInt::from(p))));
        assert!(composites.iter().all(|&c| !is_prime(&BigInt::from(c))));
    }

    #[test]
    fn mixed_arithmetic() {
        assert_eq!(Num::Exact(rational(1, 2)) + Num::Exact(rational(1, 3)), Num::Exact(rational(5, 6)));
        assert_eq!(Num::Exact(int(2)) * Num::Approx(1.5), Num::Approx(3.0));
        assert_eq!(-Num::Approx(2.0), Num::Approx(-2.0));
    }
}
