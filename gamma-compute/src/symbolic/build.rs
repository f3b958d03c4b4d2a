//! Constructors that keep expressions in canonical form.
//!
//! Every arithmetic operation on [`Expr`] goes through [`add`], [`mul`], or [`pow`]. These fold
//! numbers, collect like terms (`x + x = 2*x`) and like factors (`x * x = x^2`), extract perfect
//! powers from roots (`sqrt(8) = 2*sqrt(2)`), and sort terms and factors into a stable order so
//! that equal expressions print identically.

use crate::primitive::{exact_root, split_square, Num};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::collections::HashMap;
use super::expr::{Constant, Expr, Primary};

/// Exponents beyond this magnitude are left unevaluated.
const MAX_EXACT_EXPONENT: u64 = 4096;

/// Adds the given terms together.
pub fn add(terms: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(terms.len());
    for term in terms {
        match term {
            Expr::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut constant = Num::zero();
    let mut collected: Vec<(Expr, Num)> = Vec::new();
    let mut slots: HashMap<u64, Vec<usize>> = HashMap::new();
    for term in flat {
        if let Some(n) = term.as_num() {
            constant = constant + n;
            continue;
        }
        if term.is_constant(Constant::ComplexInfinity) {
            return term;
        }

        let (coefficient, rest) = split_coefficient(term);
        let candidates = slots.entry(rest.fingerprint()).or_default();
        match candidates.iter().copied().find(|&i| collected[i].0 == rest) {
            Some(i) => collected[i].1 = collected[i].1.clone() + coefficient,
            None => {
                candidates.push(collected.len());
                collected.push((rest, coefficient));
            },
        }
    }

    let mut result = collected
        .into_iter()
        .filter(|(_, coefficient)| !coefficient.is_zero())
        .map(|(rest, coefficient)| with_coefficient(coefficient, rest))
        .collect::<Vec<_>>();
    sort_terms(&mut result);

    if !constant.is_zero() {
        result.push(Expr::from_num(constant));
    }
    Expr::Add(result).downgrade()
}

/// Multiplies the given factors together.
pub fn mul(factors: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(factors.len());
    for factor in factors {
        match factor {
            Expr::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut coefficient = Num::one();
    let mut powers: Vec<(Expr, Expr)> = Vec::new();
    for factor in flat {
        if let Some(n) = factor.as_num() {
            coefficient = coefficient * n;
            continue;
        }
        if factor.is_constant(Constant::ComplexInfinity) {
            return factor;
        }

        let (base, exp) = match factor {
            Expr::Exp(base, exp) => (*base, *exp),
            other => (other, Expr::one()),
        };
        match powers.iter_mut().find(|(existing, _)| *existing == base) {
            Some(entry) => entry.1 = add(vec![entry.1.clone(), exp]),
            None => powers.push((base, exp)),
        }
    }

    if coefficient.is_zero() {
        return Expr::zero();
    }

    let mut result = Vec::with_capacity(powers.len());
    let mut regroup = false;
    for (base, exp) in powers {
        match pow(base, exp) {
            power if power.is_number() => {
                if let Some(n) = power.as_num() {
                    coefficient = coefficient * n;
                }
            },
            Expr::Mul(inner) => {
                regroup = true;
                result.extend(inner);
            },
            power => result.push(power),
        }
    }

    if regroup {
        result.insert(0, Expr::from_num(coefficient));
        return mul(result);
    }
    if coefficient.is_zero() {
        return Expr::zero();
    }

    sort_factors(&mut result);

    // an exact number times a single sum distributes: 2*(x + 1) = 2*x + 2
    if let (Num::Exact(_), [Expr::Add(terms)]) = (&coefficient, result.as_slice()) {
        if !coefficient.is_one() {
            let terms = terms
                .iter()
                .map(|term| mul(vec![Expr::from_num(coefficient.clone()), term.clone()]))
                .collect();
            return add(terms);
        }
    }

    if !coefficient.is_one() {
        result.insert(0, Expr::from_num(coefficient));
    }
    Expr::Mul(result).downgrade()
}

/// Raises `base` to the power of `exp`.
pub fn pow(base: Expr, exp: Expr) -> Expr {
    if exp.is_zero() {
        return Expr::one();
    }
    if exp.is_one() {
        return base;
    }
    if base.is_one() {
        return Expr::one();
    }

    if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
        return pow_rational(b, e);
    }
    if let (Some(b), Some(e)) = (base.as_num(), exp.as_num()) {
        let result = b.to_f64().powf(e.to_f64());
        if result.is_finite() {
            return Expr::float(result);
        }
        return Expr::Exp(Box::new(base), Box::new(exp));
    }

    match base {
        Expr::Primary(Primary::Constant(Constant::I)) if exp.is_integer() => {
            exp.as_integer().map(|n| i_power(&n)).unwrap_or_else(|| Expr::constant(Constant::I))
        },
        Expr::Exp(inner_base, inner_exp) if exp.is_integer() => {
            pow(*inner_base, mul(vec![*inner_exp, exp]))
        },
        Expr::Mul(factors) if exp.is_integer() => {
            mul(factors.into_iter().map(|factor| pow(factor, exp.clone())).collect())
        },
        base => Expr::Exp(Box::new(base), Box::new(exp)),
    }
}

/// Computes `I^n`, which cycles through `1, I, -1, -I`.
fn i_power(n: &BigInt) -> Expr {
    let i = Expr::constant(Constant::I);
    match n.mod_floor(&BigInt::from(4)).to_u8() {
        Some(1) => i,
        Some(2) => Expr::integer(-1),
        Some(3) => Expr::Mul(vec![Expr::integer(-1), i]),
        _ => Expr::one(),
    }
}

/// Raises an exact rational to an exact rational power, extracting exact roots where possible.
fn pow_rational(base: &BigRational, exp: &BigRational) -> Expr {
    let unevaluated = || {
        Expr::Exp(Box::new(Expr::number(base.clone())), Box::new(Expr::number(exp.clone())))
    };

    if exp.is_integer() {
        let n = exp.to_integer();
        if base.is_zero() {
            return if n.is_negative() {
                Expr::constant(Constant::ComplexInfinity)
            } else {
                Expr::zero()
            };
        }
        if base.is_one() {
            return Expr::one();
        }
        if *base == -BigRational::one() {
            return if n.is_even() { Expr::one() } else { Expr::integer(-1) };
        }
        let Some(magnitude) = n.abs().to_u64().filter(|m| *m <= MAX_EXACT_EXPONENT) else {
            return unevaluated();
        };
        let power = num_traits::pow(base.clone(), magnitude as usize);
        return Expr::number(if n.is_negative() { power.recip() } else { power });
    }

    let numer = exp.numer();
    let denom = exp.denom();
    if base.is_zero() {
        return if numer.is_negative() {
            Expr::constant(Constant::ComplexInfinity)
        } else {
            Expr::zero()
        };
    }

    if base.is_negative() {
        // (-b)^(p/2) = I^p * b^(p/2)
        if *denom == BigInt::from(2) {
            return mul(vec![i_power(numer), pow_rational(&-base, exp)]);
        }
        return unevaluated();
    }

    let Some(root_degree) = denom.to_u32() else {
        return unevaluated();
    };
    if let (Some(root_numer), Some(root_denom)) = (
        exact_root(base.numer(), root_degree),
        exact_root(base.denom(), root_degree),
    ) {
        let root = BigRational::new(root_numer, root_denom);
        return pow_rational(&root, &BigRational::from_integer(numer.clone()));
    }

    if root_degree != 2 || base.numer().bits() > 128 || base.denom().bits() > 128 {
        return unevaluated();
    }

    // sqrt(n/d) = sqrt(n*d)/d = (a/d)*sqrt(r)
    let (outside, radicand) = split_square(&(base.numer() * base.denom()));
    let mut coefficient = BigRational::new(outside, base.denom().clone());
    let radicand = BigRational::from_integer(radicand);

    // b^(p/2) = b^((p-1)/2) * sqrt(b), or b^((p+1)/2) / sqrt(b) for negative p
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let sqrt_radicand = Expr::Exp(Box::new(Expr::number(radicand.clone())), Box::new(Expr::number(half)));
    let (whole, root_factor) = if numer.is_positive() {
        (BigRational::from_integer((numer - 1) / 2), sqrt_radicand)
    } else {
        coefficient = coefficient.recip() / &radicand;
        (BigRational::from_integer((numer + 1) / 2), sqrt_radicand)
    };
    if let Some(whole_power) = pow_rational(base, &whole).as_number() {
        coefficient *= whole_power;
    }

    if radicand.is_one() {
        return Expr::number(coefficient);
    }
    if coefficient.is_one() {
        return root_factor;
    }
    Expr::Mul(vec![Expr::number(coefficient), root_factor])
}

/// Splits a term into its numeric coefficient and the rest of the term.
pub(crate) fn split_coefficient(term: Expr) -> (Num, Expr) {
    match term {
        Expr::Mul(mut factors) => match factors.first().and_then(Expr::as_num) {
            Some(n) => {
                factors.remove(0);
                (n, Expr::Mul(factors).downgrade())
            },
            None => (Num::one(), Expr::Mul(factors)),
        },
        other => (Num::one(), other),
    }
}

/// Reattaches a coefficient to a term without re-evaluating the term.
fn with_coefficient(coefficient: Num, rest: Expr) -> Expr {
    if coefficient.is_one() {
        return rest;
    }
    match rest {
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::from_num(coefficient));
            Expr::Mul(factors)
        },
        other => Expr::Mul(vec![Expr::from_num(coefficient), other]),
    }
}

/// The polynomial degree of a term, used to order the terms of a sum.
fn degree(expr: &Expr) -> f64 {
    match expr {
        Expr::Primary(Primary::Symbol(_)) => 1.0,
        Expr::Primary(Primary::Call(..)) => 0.5,
        Expr::Primary(_) => 0.0,
        Expr::Add(terms) => terms.iter().map(degree).fold(0.0, f64::max),
        Expr::Mul(factors) => factors.iter().map(degree).sum(),
        Expr::Exp(base, exp) => match exp.as_num() {
            Some(n) => degree(base) * n.to_f64(),
            None => 1.0,
        },
    }
}

/// Sorts the terms of a sum by descending degree, then alphabetically ignoring coefficients.
pub(crate) fn sort_terms(terms: &mut [Expr]) {
    let mut keyed = terms
        .iter()
        .map(|term| {
            let (_, rest) = split_coefficient(term.clone());
            (degree(term), rest.to_string(), term.clone())
        })
        .collect::<Vec<_>>();
    keyed.sort_by(|(lhs_degree, lhs_text, _), (rhs_degree, rhs_text, _)| {
        rhs_degree
            .partial_cmp(lhs_degree)
            .unwrap_or(Ordering::Equal)
            .then_with(|| lhs_text.cmp(rhs_text))
    });
    for (slot, (_, _, term)) in terms.iter_mut().zip(keyed) {
        *slot = term;
    }
}

/// The rank of a factor's base, used to order the factors of a product.
fn factor_rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Exp(base, _) => factor_rank(base),
        Expr::Primary(Primary::Number(_) | Primary::Float(_)) => 0,
        Expr::Primary(Primary::Constant(_)) => 1,
        Expr::Primary(Primary::Symbol(_)) => 2,
        Expr::Primary(Primary::Call(..)) => 3,
        Expr::Add(_) | Expr::Mul(_) => 4,
    }
}

/// Sorts the factors of a product: roots of numbers, then constants, symbols, function calls, and
/// sums, each group alphabetically.
pub(crate) fn sort_factors(factors: &mut [Expr]) {
    let mut keyed = factors
        .iter()
        .map(|factor| (factor_rank(factor), factor.to_string(), factor.clone()))
        .collect::<Vec<_>>();
    keyed.sort_by(|(lhs_rank, lhs_text, _), (rhs_rank, rhs_text, _)| {
        lhs_rank.cmp(rhs_rank).then_with(|| lhs_text.cmp(rhs_text))
    });
    for (slot, (_, _, factor)) in factors.iter_mut().zip(keyed) {
        *slot = factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::primitive::rational;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn half() -> Expr {
        Expr::number(rational(1, 2))
    }

    #[test]
    fn like_terms() {
        assert_eq!(add(vec![x(), x()]), Expr::Mul(vec![Expr::integer(2), x()]));
        assert_eq!(add(vec![x(), -x()]), Expr::zero());
        assert_eq!(add(vec![Expr::integer(2), Expr::integer(3)]), Expr::integer(5));
    }

    #[test]
    fn like_factors() {
        assert_eq!(mul(vec![x(), x()]), Expr::Exp(Box::new(x()), Box::new(Expr::integer(2))));
        assert_eq!(mul(vec![x(), pow(x(), Expr::integer(-1))]), Expr::one());
        assert_eq!(mul(vec![Expr::zero(), x()]), Expr::zero());
    }

    #[test]
    fn distribute_coefficient() {
        let sum = add(vec![x(), Expr::one()]);
        assert_eq!(mul(vec![Expr::integer(2), sum]).to_string(), "2*x + 2");
    }

    #[test]
    fn square_roots() {
        assert_eq!(pow(Expr::integer(4), half()), Expr::integer(2));
        assert_eq!(pow(Expr::integer(8), half()).to_string(), "2*sqrt(2)");
        assert_eq!(pow(Expr::integer(-4), half()).to_string(), "2*I");
        assert_eq!(pow(Expr::number(rational(1, 4)), half()), Expr::number(rational(1, 2)));
        assert_eq!(pow(Expr::integer(2), Expr::number(rational(-1, 2))).to_string(), "sqrt(2)/2");
    }

    #[test]
    fn product_of_roots() {
        let root_two = pow(Expr::integer(2), half());
        assert_eq!(mul(vec![root_two.clone(), root_two]), Expr::integer(2));
    }

    #[test]
    fn imaginary_unit_cycles() {
        let i = Expr::constant(Constant::I);
        assert_eq!(pow(i.clone(), Expr::integer(2)), Expr::integer(-1));
        assert_eq!(pow(i.clone(), Expr::integer(4)), Expr::one());
        assert_eq!(mul(vec![i.clone(), i]), Expr::integer(-1));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(pow(Expr::zero(), Expr::integer(-1)), Expr::constant(Constant::ComplexInfinity));
    }

    #[test]
    fn unit_bases_ignore_the_exponent_cap() {
        let huge = Expr::integer(5000);
        assert_eq!(pow(Expr::zero(), huge.clone()), Expr::zero());
        assert_eq!(pow(Expr::one(), huge.clone()), Expr::one());
        assert_eq!(pow(Expr::integer(-1), huge), Expr::one());
        assert_eq!(pow(Expr::integer(-1), Expr::integer(5001)), Expr::integer(-1));
        assert_eq!(pow(Expr::integer(-1), Expr::integer(-5001)), Expr::integer(-1));
        assert_eq!(
            pow(Expr::zero(), Expr::integer(-5000)),
            Expr::constant(Constant::ComplexInfinity),
        );
        assert!(matches!(pow(Expr::integer(2), Expr::integer(5000)), Expr::Exp(..)));
    }

    #[test]
    fn term_order() {
        let expr = add(vec![Expr::one(), x(), pow(x(), Expr::integer(2))]);
        assert_eq!(expr.to_string(), "x^2 + x + 1");
        let expr = add(vec![Expr::symbol("y"), x()]);
        assert_eq!(expr.to_string(), "x + y");
    }
}
