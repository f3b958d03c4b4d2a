//! Evaluation of elementary functions at special values.

use crate::primitive::{int, rational, Num};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use super::build::mul;
use super::expr::{Constant, Expr, Primary};

/// The function classes understood by the engine.
pub const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc",
    "asin", "acos", "atan",
    "sinh", "cosh", "tanh",
    "exp", "log", "Abs", "factorial",
];

/// Functions with `f(-x) = -f(x)`.
const ODD: &[&str] = &["sin", "tan", "cot", "csc", "asin", "atan", "sinh", "tanh"];

/// Functions with `f(-x) = f(x)`.
const EVEN: &[&str] = &["cos", "sec", "cosh", "Abs"];

/// The largest argument for which `factorial` is computed exactly.
const MAX_FACTORIAL: u32 = 1000;

/// Applies the named function to the given arguments, evaluating it if the arguments are special
/// values. Unknown functions and other arguments produce an unevaluated call.
pub fn apply(name: &str, mut args: Vec<Expr>) -> Expr {
    if args.len() != 1 {
        return Expr::call(name, args);
    }
    let arg = args.remove(0);

    if let Some(value) = special_value(name, &arg) {
        return value;
    }

    if let Some(positive) = arg.negated_if_negative() {
        if ODD.contains(&name) {
            return -apply(name, vec![positive]);
        }
        if EVEN.contains(&name) {
            return apply(name, vec![positive]);
        }
    }

    if let Some(f) = arg.as_num().filter(|n| matches!(n, Num::Approx(_))) {
        if let Some(value) = approximate(name, f.to_f64()) {
            return Expr::float(value);
        }
    }

    Expr::call(name, vec![arg])
}

/// Returns the rational `k` such that `arg = k*pi`.
fn pi_multiple(arg: &Expr) -> Option<BigRational> {
    match arg {
        _ if arg.is_zero() => Some(BigRational::zero()),
        Expr::Primary(Primary::Constant(Constant::Pi)) => Some(BigRational::one()),
        Expr::Mul(factors) => match factors.as_slice() {
            [coefficient, pi] if pi.is_constant(Constant::Pi) => coefficient.as_number().cloned(),
            _ => None,
        },
        _ => None,
    }
}

/// Exact values of `sin(k*pi)` for `k` a multiple of `1/6` or `1/4`.
fn sin_pi_multiple(k: &BigRational) -> Option<Expr> {
    // reduce to [0, 2)
    let two = int(2);
    let k = k - (k / &two).floor() * &two;
    let (sign, k) = if k >= BigRational::one() {
        (-1, k - BigRational::one())
    } else {
        (1, k)
    };
    let k = if k > rational(1, 2) { BigRational::one() - k } else { k };

    let value = if k.is_zero() {
        Expr::zero()
    } else if k == rational(1, 6) {
        Expr::number(rational(1, 2))
    } else if k == rational(1, 4) {
        Expr::number(rational(1, 2)) * Expr::integer(2).sqrt()
    } else if k == rational(1, 3) {
        Expr::number(rational(1, 2)) * Expr::integer(3).sqrt()
    } else if k == rational(1, 2) {
        Expr::one()
    } else {
        return None;
    };
    Some(mul(vec![Expr::integer(sign), value]))
}

fn special_value(name: &str, arg: &Expr) -> Option<Expr> {
    match name {
        "sin" => sin_pi_multiple(&pi_multiple(arg)?),
        "cos" => sin_pi_multiple(&(pi_multiple(arg)? + rational(1, 2))),
        "tan" => {
            let k = pi_multiple(arg)?;
            let sin = sin_pi_multiple(&k)?;
            let cos = sin_pi_multiple(&(k + rational(1, 2)))?;
            if cos.is_zero() {
                return Some(Expr::constant(Constant::ComplexInfinity));
            }
            Some(sin / cos)
        },
        "sinh" | "tanh" | "asin" | "atan" if arg.is_zero() => Some(Expr::zero()),
        "cosh" if arg.is_zero() => Some(Expr::one()),
        "acos" if arg.is_zero() => Some(mul(vec![Expr::number(rational(1, 2)), Expr::constant(Constant::Pi)])),
        "acos" if arg.is_one() => Some(Expr::zero()),
        "asin" if arg.is_one() => Some(mul(vec![Expr::number(rational(1, 2)), Expr::constant(Constant::Pi)])),
        "atan" if arg.is_one() => Some(mul(vec![Expr::number(rational(1, 4)), Expr::constant(Constant::Pi)])),
        "exp" => {
            if arg.is_zero() {
                Some(Expr::one())
            } else if arg.is_one() {
                Some(Expr::constant(Constant::E))
            } else if let Some(("log", [inner])) = arg.as_call() {
                Some(inner.clone())
            } else {
                None
            }
        },
        "log" => {
            if arg.is_one() {
                Some(Expr::zero())
            } else if arg.is_zero() {
                Some(Expr::constant(Constant::ComplexInfinity))
            } else if arg.is_constant(Constant::E) {
                Some(Expr::one())
            } else if let Expr::Exp(base, exp) = arg {
                base.is_constant(Constant::E).then(|| (**exp).clone())
            } else {
                None
            }
        },
        "Abs" => match arg {
            Expr::Primary(Primary::Number(n)) => Some(Expr::number(n.abs())),
            Expr::Primary(Primary::Float(f)) => Some(Expr::float(f.abs())),
            Expr::Primary(Primary::Constant(Constant::Pi | Constant::E)) => Some(arg.clone()),
            Expr::Primary(Primary::Constant(Constant::I)) => Some(Expr::one()),
            _ => None,
        },
        "factorial" => {
            let n = arg.as_integer()?;
            if n.is_negative() {
                return Some(Expr::constant(Constant::ComplexInfinity));
            }
            let n = n.to_u32().filter(|n| *n <= MAX_FACTORIAL)?;
            let product = (1..=n).fold(BigInt::one(), |acc, k| acc * k);
            Some(Expr::number(BigRational::from_integer(product)))
        },
        _ => None,
    }
}

fn approximate(name: &str, x: f64) -> Option<f64> {
    let value = match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "cot" => x.tan().recip(),
        "sec" => x.cos().recip(),
        "csc" => x.sin().recip(),
        "asin" => x.asin(),
        "acos" => x.acos(),
        "atan" => x.atan(),
        "sinh" => x.sinh(),
        "cosh" => x.cosh(),
        "tanh" => x.tanh(),
        "exp" => x.exp(),
        "log" => x.ln(),
        "Abs" => x.abs(),
        _ => return None,
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn pi() -> Expr {
        Expr::constant(Constant::Pi)
    }

    #[test]
    fn trig_special_values() {
        assert_eq!(apply("sin", vec![Expr::zero()]), Expr::zero());
        assert_eq!(apply("cos", vec![pi()]), Expr::integer(-1));
        assert_eq!(apply("sin", vec![pi() * Expr::number(rational(1, 2))]), Expr::one());
        assert_eq!(apply("cos", vec![pi() * Expr::number(rational(1, 3))]), Expr::number(rational(1, 2)));
        assert_eq!(apply("tan", vec![pi()]), Expr::zero());
    }

    #[test]
    fn parity() {
        let x = Expr::symbol("x");
        assert_eq!(apply("sin", vec![-x.clone()]).to_string(), "-sin(x)");
        assert_eq!(apply("cos", vec![-x]).to_string(), "cos(x)");
    }

    #[test]
    fn exp_and_log() {
        assert_eq!(apply("exp", vec![Expr::one()]), Expr::constant(Constant::E));
        assert_eq!(apply("log", vec![Expr::one()]), Expr::zero());
        let x = Expr::symbol("x");
        assert_eq!(apply("exp", vec![apply("log", vec![x.clone()])]), x);
    }

    #[test]
    fn factorials() {
        assert_eq!(apply("factorial", vec![Expr::integer(5)]), Expr::integer(120));
        assert_eq!(apply("factorial", vec![Expr::zero()]), Expr::one());
        assert_eq!(apply("factorial", vec![Expr::symbol("n")]).to_string(), "factorial(n)");
    }

    #[test]
    fn unknown_function_stays_unevaluated() {
        let call = apply("f", vec![Expr::one()]);
        assert_eq!(call, Expr::call("f", vec![Expr::one()]));
    }
}
