use crate::cancel::CancelToken;
use num_bigint::BigInt;
use num_rational::BigRational;
use super::algebra::subs;
use super::build::{add, mul, pow};
use super::derivative::{derivative, DerivativeError};
use super::expr::{Constant, Expr, Primary};

/// The reason a series expansion could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// A derivative of the expression could not be computed.
    Derivative(DerivativeError),

    /// The expression or one of its derivatives is not finite at the expansion point.
    Singular,

    /// The request was cancelled.
    Cancelled,
}

impl From<DerivativeError> for SeriesError {
    fn from(err: DerivativeError) -> Self {
        Self::Derivative(err)
    }
}

fn is_singular(expr: &Expr) -> bool {
    match expr {
        Expr::Primary(Primary::Constant(Constant::Infinity | Constant::ComplexInfinity)) => true,
        Expr::Primary(Primary::Call(_, args)) | Expr::Add(args) | Expr::Mul(args) => {
            args.iter().any(is_singular)
        },
        Expr::Exp(base, exp) => is_singular(base) || is_singular(exp),
        Expr::Primary(_) => false,
    }
}

/// Computes the Taylor expansion of `expr` in `var` about `x0`, up to but excluding the term of
/// order `n`.
///
/// The result is a sum in ascending order of powers, ending with an order term `O((x - x0)^n)`.
/// The sum is deliberately not re-sorted into the usual descending order.
pub fn series(
    expr: &Expr,
    var: &str,
    x0: &Expr,
    n: usize,
    cancel: &CancelToken,
) -> Result<Expr, SeriesError> {
    let shifted = add(vec![Expr::symbol(var), -x0.clone()]);
    let mut terms = Vec::with_capacity(n + 1);
    let mut current = expr.clone();
    let mut factorial = BigInt::from(1);

    for k in 0..n {
        if cancel.is_cancelled() {
            return Err(SeriesError::Cancelled);
        }
        if k > 0 {
            current = derivative(&current, var)?;
            factorial *= k;
        }

        let coefficient = subs(&current, var, x0);
        if is_singular(&coefficient) {
            return Err(SeriesError::Singular);
        }
        if coefficient.is_zero() {
            continue;
        }

        let scaled = mul(vec![
            coefficient,
            Expr::number(BigRational::new(BigInt::from(1), factorial.clone())),
        ]);
        let power = pow(shifted.clone(), Expr::integer(k as i64));
        // keep 2*(x - 1) as a product instead of distributing it
        if k > 0 && scaled.is_number() && !scaled.is_one() {
            terms.push(Expr::Mul(vec![scaled, power]));
        } else {
            terms.push(mul(vec![scaled, power]));
        }
    }

    terms.push(Expr::call("O", vec![pow(shifted, Expr::integer(n as i64))]));
    Ok(Expr::Add(terms).downgrade())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::symbolic::elementary::apply;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn sine() {
        let sin = apply("sin", vec![x()]);
        let result = series(&sin, "x", &Expr::zero(), 10, &CancelToken::new()).unwrap();
        assert_eq!(result.to_string(), "x - x^3/6 + x^5/120 - x^7/5040 + x^9/362880 + O(x^10)");
    }

    #[test]
    fn exponential() {
        let exp = apply("exp", vec![x()]);
        let result = series(&exp, "x", &Expr::zero(), 4, &CancelToken::new()).unwrap();
        assert_eq!(result.to_string(), "1 + x + x^2/2 + x^3/6 + O(x^4)");
    }

    #[test]
    fn polynomial_about_point() {
        let expr = x().pow(Expr::integer(2));
        let result = series(&expr, "x", &Expr::one(), 3, &CancelToken::new()).unwrap();
        assert_eq!(result.to_string(), "1 + 2*(x - 1) + (x - 1)^2 + O((x - 1)^3)");
    }

    #[test]
    fn high_power_vanishes_at_origin() {
        let expr = x().pow(Expr::integer(100000));
        let result = series(&expr, "x", &Expr::zero(), 10, &CancelToken::new()).unwrap();
        assert_eq!(result.to_string(), "O(x^10)");
    }

    #[test]
    fn singular_point() {
        let expr = x().pow(Expr::integer(-1));
        let err = series(&expr, "x", &Expr::zero(), 3, &CancelToken::new()).unwrap_err();
        assert_eq!(err, SeriesError::Singular);
    }

    #[test]
    fn cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let err = series(&x(), "x", &Expr::zero(), 3, &token).unwrap_err();
        assert_eq!(err, SeriesError::Cancelled);
    }
}
