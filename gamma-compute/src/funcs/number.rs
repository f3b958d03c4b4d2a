//! Number theory on exact integers.

use crate::builtin::{Args, Builtin, BuiltinError, BuiltinParam};
use crate::cancel::CancelToken;
use crate::error::Cancelled;
use crate::primitive::{int, is_prime};
use crate::symbolic::Expr;
use crate::value::Value;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::collections::BTreeMap;
use super::helper::{integer, take_integer};

/// The signature of builtins taking one integer.
const N: &[BuiltinParam] = &[integer("n")];

/// The signature of builtins combining two integers.
const A_B: &[BuiltinParam] = &[integer("a"), integer("b")];

/// Trial division is used for primes up to this bound before switching to Pollard's rho.
const TRIAL_DIVISION_LIMIT: u64 = 1_000_000;

/// Finds a non-trivial divisor of the odd composite `n` using Pollard's rho with Floyd cycle
/// detection, or [`None`] if cancelled.
fn pollard_rho(n: &BigInt, cancel: &CancelToken) -> Option<BigInt> {
    let mut c = BigInt::one();
    loop {
        let step = |x: &BigInt| (x * x + &c) % n;
        let mut x = BigInt::from(2);
        let mut y = x.clone();
        let mut d = BigInt::one();
        while d.is_one() {
            if cancel.is_cancelled() {
                return None;
            }
            x = step(&x);
            y = step(&step(&y));
            d = (&x - &y).abs().gcd(n);
        }
        if &d != n {
            return Some(d);
        }
        c += 1;
    }
}

/// Adds the prime factorization of `n > 1` to `factors`.
fn factor_large(n: BigInt, factors: &mut BTreeMap<BigInt, u32>, cancel: &CancelToken) -> Result<(), Cancelled> {
    if n.is_one() {
        return Ok(());
    }
    if is_prime(&n) {
        *factors.entry(n).or_default() += 1;
        return Ok(());
    }
    let d = pollard_rho(&n, cancel).ok_or(Cancelled)?;
    let rest = &n / &d;
    factor_large(d, factors, cancel)?;
    factor_large(rest, factors, cancel)
}

/// Returns the prime factorization of `n`, in ascending order of primes. Negative numbers include
/// `-1` as a factor, and zero factors as `{0: 1}`.
pub fn factorize(n: &BigInt, cancel: &CancelToken) -> Result<Vec<(BigInt, u32)>, Cancelled> {
    let mut factors = BTreeMap::new();
    if n.is_zero() {
        factors.insert(BigInt::zero(), 1);
        return Ok(factors.into_iter().collect());
    }
    if n.is_negative() {
        factors.insert(-BigInt::one(), 1);
    }

    let mut n = n.abs();
    let mut p = BigInt::from(2);
    while &p * &p <= n && p <= BigInt::from(TRIAL_DIVISION_LIMIT) {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        while (&n % &p).is_zero() {
            n /= &p;
            *factors.entry(p.clone()).or_default() += 1;
        }
        p += if p == BigInt::from(2) { 1 } else { 2 };
    }

    if &p * &p > n {
        if !n.is_one() {
            *factors.entry(n).or_default() += 1;
        }
    } else {
        factor_large(n, &mut factors, cancel)?;
    }
    Ok(factors.into_iter().collect())
}

/// Returns the prime factorization of an integer as a dictionary of primes to exponents.
#[derive(Debug)]
pub struct Factorint;

impl Builtin for Factorint {
    fn name(&self) -> &'static str {
        "factorint"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        N
    }

    fn sig_str(&self) -> &'static str {
        "n"
    }

    fn eval(&self, mut args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError> {
        let n = take_integer(&mut args, 0)?;
        let factors = factorize(&n, cancel).map_err(BuiltinError::Cancelled)?;
        Ok(Value::Dict(
            factors
                .into_iter()
                .map(|(p, k)| (Expr::number(int(p)).into(), Expr::integer(k.into()).into()))
                .collect(),
        ))
    }
}

/// Returns whether an integer is prime.
#[derive(Debug)]
pub struct Isprime;

impl Builtin for Isprime {
    fn name(&self) -> &'static str {
        "isprime"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        N
    }

    fn sig_str(&self) -> &'static str {
        "n"
    }

    fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
        let n = take_integer(&mut args, 0)?;
        Ok(Value::Bool(is_prime(&n)))
    }
}

/// Generates a builtin combining two integers.
macro_rules! binary_integer {
    ($(#[$meta:meta])* $upname:ident $name:literal => $method:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $upname;

        impl Builtin for $upname {
            fn name(&self) -> &'static str {
                $name
            }

            fn sig(&self) -> &'static [BuiltinParam] {
                A_B
            }

            fn sig_str(&self) -> &'static str {
                "a, b"
            }

            fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
                let a = take_integer(&mut args, 0)?;
                let b = take_integer(&mut args, 1)?;
                Ok(Value::Expr(Expr::number(int(a.$method(&b)))))
            }
        }
    };
}

binary_integer!(
    /// The greatest common divisor of two integers.
    Gcd "gcd" => gcd
);
binary_integer!(
    /// The least common multiple of two integers.
    Lcm "lcm" => lcm
);

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn factors(n: i64) -> String {
        let args = Args::bind(&Factorint, vec![Expr::integer(n).into()], vec![]).unwrap();
        Factorint.eval(args, &CancelToken::new()).unwrap().to_string()
    }

    #[test]
    fn small_factorizations() {
        assert_eq!(factors(360), "{2: 3, 3: 2, 5: 1}");
        assert_eq!(factors(1), "{}");
        assert_eq!(factors(0), "{0: 1}");
        assert_eq!(factors(-12), "{-1: 1, 2: 2, 3: 1}");
        assert_eq!(factors(97), "{97: 1}");
    }

    #[test]
    fn large_semiprime() {
        // 1000003 * 1000033
        let n = BigInt::from(1_000_003u64) * BigInt::from(1_000_033u64);
        let factors = factorize(&n, &CancelToken::new()).unwrap();
        assert_eq!(factors, vec![(BigInt::from(1_000_003), 1), (BigInt::from(1_000_033), 1)]);
    }

    #[test]
    fn isprime() {
        let args = Args::bind(&Isprime, vec![Expr::integer(7919).into()], vec![]).unwrap();
        assert_eq!(Isprime.eval(args, &CancelToken::new()).unwrap(), Value::Bool(true));
    }

    #[test]
    fn rejects_non_integers() {
        let args = Args::bind(&Isprime, vec![Expr::symbol("x").into()], vec![]).unwrap();
        let err = Isprime.eval(args, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, BuiltinError::TypeMismatch(_)));
    }

    #[test]
    fn gcd_lcm() {
        let args = Args::bind(&Gcd, vec![Expr::integer(12).into(), Expr::integer(18).into()], vec![]).unwrap();
        assert_eq!(Gcd.eval(args, &CancelToken::new()).unwrap(), Value::Expr(Expr::integer(6)));
        let args = Args::bind(&Lcm, vec![Expr::integer(4).into(), Expr::integer(6).into()], vec![]).unwrap();
        assert_eq!(Lcm.eval(args, &CancelToken::new()).unwrap(), Value::Expr(Expr::integer(12)));
    }
}
