//! Structural rewrites: expansion, substitution, normalization, and simplification.

use crate::cancel::CancelToken;
use crate::error::Cancelled;
use super::build::{add, mul, pow};
use super::elementary::apply;
use super::expr::{Expr, Primary};
use super::poly::factor;

/// Powers of sums with exponents beyond this are not multiplied out.
const MAX_EXPANDED_POWER: i64 = 64;

/// Multiplies out products and integer powers of sums.
///
/// The token is polled before every node and every row of a distributed product, so large
/// expansions stop promptly once it trips.
pub fn expand(expr: &Expr, cancel: &CancelToken) -> Result<Expr, Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }
    Ok(match expr {
        Expr::Primary(Primary::Call(name, args)) => apply(name, expand_all(args, cancel)?),
        Expr::Primary(_) => expr.clone(),
        Expr::Add(terms) => add(expand_all(terms, cancel)?),
        Expr::Mul(factors) => {
            let mut product = Expr::one();
            for factor in factors {
                product = distribute(&product, &expand(factor, cancel)?, cancel)?;
            }
            product
        },
        Expr::Exp(base, exp) => {
            let base = expand(base, cancel)?;
            let exp = expand(exp, cancel)?;
            match exp.as_small_integer() {
                Some(n) if (2..=MAX_EXPANDED_POWER).contains(&n) && matches!(base, Expr::Add(_)) => {
                    let mut power = base.clone();
                    for _ in 1..n {
                        power = distribute(&power, &base, cancel)?;
                    }
                    power
                },
                _ => pow(base, exp),
            }
        },
    })
}

fn expand_all(exprs: &[Expr], cancel: &CancelToken) -> Result<Vec<Expr>, Cancelled> {
    exprs.iter().map(|expr| expand(expr, cancel)).collect()
}

/// Multiplies two expanded expressions, distributing over any sums.
fn distribute(lhs: &Expr, rhs: &Expr, cancel: &CancelToken) -> Result<Expr, Cancelled> {
    let lhs_terms = lhs.terms();
    let rhs_terms = rhs.terms();
    let mut products = Vec::with_capacity(lhs_terms.len() * rhs_terms.len());
    for a in &lhs_terms {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        for b in &rhs_terms {
            products.push(mul(vec![a.clone(), b.clone()]));
        }
    }
    Ok(add(products))
}

/// Rebuilds the expression through the canonical constructors, re-evaluating every node.
pub fn normalize(expr: &Expr) -> Expr {
    map_symbols(expr, &|_| None)
}

/// Replaces every occurrence of the symbol `var` with `value` and re-evaluates the result.
pub fn subs(expr: &Expr, var: &str, value: &Expr) -> Expr {
    map_symbols(expr, &|name| (name == var).then(|| value.clone()))
}

fn map_symbols(expr: &Expr, replace: &dyn Fn(&str) -> Option<Expr>) -> Expr {
    match expr {
        Expr::Primary(Primary::Symbol(name)) => replace(name).unwrap_or_else(|| expr.clone()),
        Expr::Primary(Primary::Call(name, args)) => {
            apply(name, args.iter().map(|arg| map_symbols(arg, replace)).collect())
        },
        Expr::Primary(_) => expr.clone(),
        Expr::Add(terms) => add(terms.iter().map(|term| map_symbols(term, replace)).collect()),
        Expr::Mul(factors) => mul(factors.iter().map(|factor| map_symbols(factor, replace)).collect()),
        Expr::Exp(base, exp) => pow(map_symbols(base, replace), map_symbols(exp, replace)),
    }
}

/// Rewrites `c*sin(u)^2 + c*cos(u)^2` to `c` inside a sum.
fn pythagorean(expr: &Expr) -> Option<Expr> {
    let Expr::Add(terms) = expr else {
        return None;
    };

    let squared_call = |term: &Expr, function: &str| -> Option<(Expr, Expr)> {
        let (coefficient, rest) = super::build::split_coefficient(term.clone());
        let Expr::Exp(base, exp) = rest else {
            return None;
        };
        let (name, [arg]) = base.as_call()? else {
            return None;
        };
        (name == function && *exp == Expr::integer(2))
            .then(|| (Expr::from_num(coefficient), arg.clone()))
    };

    for (i, sin_term) in terms.iter().enumerate() {
        let Some((coefficient, arg)) = squared_call(sin_term, "sin") else {
            continue;
        };
        let matching = terms.iter().position(|term| {
            squared_call(term, "cos").is_some_and(|(c, a)| c == coefficient && a == arg)
        });
        if let Some(j) = matching {
            let mut rest = terms
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != i && *k != j)
                .map(|(_, term)| term.clone())
                .collect::<Vec<_>>();
            rest.push(coefficient);
            return Some(add(rest));
        }
    }
    None
}

/// Returns the least complex of several equivalent forms of the expression.
///
/// The candidates are the normalized expression, its expansion, and the factored expansion. Ties
/// keep the earliest candidate, so an expression that is already simplest comes back unchanged.
pub fn simplify(expr: &Expr, cancel: &CancelToken) -> Result<Expr, Cancelled> {
    let normalized = normalize(expr);
    let normalized = pythagorean(&normalized).unwrap_or(normalized);
    let expanded = expand(&normalized, cancel)?;
    let expanded = pythagorean(&expanded).unwrap_or(expanded);
    let factored = factor(&expanded, cancel)?;

    Ok([normalized, expanded, factored]
        .into_iter()
        .fold(None, |best: Option<Expr>, candidate| match best {
            Some(best) if best.complexity() <= candidate.complexity() => Some(best),
            _ => Some(candidate),
        })
        .unwrap_or_else(|| expr.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn expanded(expr: &Expr) -> String {
        expand(expr, &CancelToken::new()).unwrap().to_string()
    }

    fn simplified(expr: &Expr) -> Expr {
        simplify(expr, &CancelToken::new()).unwrap()
    }

    #[test]
    fn expand_square() {
        let expr = (x() + Expr::one()).pow(Expr::integer(2));
        assert_eq!(expanded(&expr), "x^2 + 2*x + 1");
    }

    #[test]
    fn expand_product() {
        let expr = Expr::Mul(vec![x() + Expr::one(), x() - Expr::one()]);
        assert_eq!(expanded(&expr), "x^2 - 1");
    }

    #[test]
    fn substitution() {
        let expr = x().pow(Expr::integer(2)) + x();
        assert_eq!(subs(&expr, "x", &Expr::integer(3)), Expr::integer(12));
        let sin = apply("sin", vec![x()]);
        assert_eq!(subs(&sin, "x", &Expr::zero()), Expr::zero());
    }

    #[test]
    fn simplify_picks_smallest_form() {
        let expr = Expr::Mul(vec![x() + Expr::one(), x() - Expr::one()]);
        assert_eq!(simplified(&expr).to_string(), "x^2 - 1");

        let expr = x().pow(Expr::integer(2)) + Expr::integer(2) * x() + Expr::one();
        assert_eq!(simplified(&expr).to_string(), "(x + 1)^2");
    }

    #[test]
    fn simplify_trig_identity() {
        let sin = apply("sin", vec![x()]).pow(Expr::integer(2));
        let cos = apply("cos", vec![x()]).pow(Expr::integer(2));
        assert_eq!(simplified(&(sin + cos)), Expr::one());
    }

    #[test]
    fn expansion_collects_like_terms() {
        let sum = x() + Expr::symbol("y") + Expr::symbol("z") + Expr::one();
        let expr = expand(&sum.pow(Expr::integer(6)), &CancelToken::new()).unwrap();
        // one term per monomial of degree at most 6 in three variables
        assert_eq!(expr.terms().len(), 84);
    }

    #[test]
    fn expansion_stops_when_cancelled() {
        let sum = x() + Expr::symbol("y") + Expr::symbol("z") + Expr::one();
        let token = CancelToken::with_timeout(Duration::from_millis(50));
        let start = Instant::now();
        assert_eq!(expand(&sum.pow(Expr::integer(60)), &token), Err(Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
