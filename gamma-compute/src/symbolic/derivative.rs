use super::build::{add, mul, pow};
use super::elementary::apply;
use super::expr::{Expr, Primary};

/// The reason a derivative could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivativeError {
    /// The expression contains a function whose derivative is not known.
    Unsupported(String),
}

/// Computes the derivative of the expression with respect to the symbol `with`.
pub fn derivative(expr: &Expr, with: &str) -> Result<Expr, DerivativeError> {
    if !expr.has_symbol(with) {
        return Ok(Expr::zero());
    }

    match expr {
        Expr::Primary(Primary::Call(name, args)) => function_derivative(name, args, with),
        Expr::Primary(_) => Ok(Expr::one()),
        Expr::Add(terms) => Ok(add(terms
            .iter()
            .map(|term| derivative(term, with))
            .collect::<Result<_, _>>()?)),
        Expr::Mul(factors) => {
            // product rule: sum over i of f_i' * prod_{j != i} f_j
            let mut terms = Vec::new();
            for (i, factor) in factors.iter().enumerate() {
                if !factor.has_symbol(with) {
                    continue;
                }
                let mut product = factors.clone();
                product[i] = derivative(factor, with)?;
                terms.push(mul(product));
            }
            Ok(add(terms))
        },
        Expr::Exp(base, exp) => {
            let base = base.as_ref().clone();
            let exp = exp.as_ref().clone();
            if !exp.has_symbol(with) {
                // power rule
                let d_base = derivative(&base, with)?;
                let lowered = add(vec![exp.clone(), Expr::integer(-1)]);
                Ok(mul(vec![exp, pow(base, lowered), d_base]))
            } else {
                // d(b^e) = b^e * (e' log(b) + e b' / b)
                let d_base = derivative(&base, with)?;
                let d_exp = derivative(&exp, with)?;
                let log_base = apply("log", vec![base.clone()]);
                let inner = add(vec![
                    mul(vec![d_exp, log_base]),
                    mul(vec![exp.clone(), d_base, pow(base.clone(), Expr::integer(-1))]),
                ]);
                Ok(mul(vec![pow(base, exp), inner]))
            }
        },
    }
}

/// Computes the derivative of a supported function call and applies the chain rule.
fn function_derivative(name: &str, args: &[Expr], with: &str) -> Result<Expr, DerivativeError> {
    let [u] = args else {
        return Err(DerivativeError::Unsupported(name.to_string()));
    };
    let call = |function: &str| apply(function, vec![u.clone()]);
    let squared = |function: &str| pow(call(function), Expr::integer(2));
    let one_minus_square = || add(vec![Expr::one(), -pow(u.clone(), Expr::integer(2))]);
    let half = || Expr::number(crate::primitive::rational(1, 2));

    let outer = match name {
        "sin" => call("cos"),
        "cos" => -call("sin"),
        "tan" => add(vec![squared("tan"), Expr::one()]),
        "cot" => -add(vec![squared("cot"), Expr::one()]),
        "sec" => mul(vec![call("tan"), call("sec")]),
        "csc" => -mul(vec![call("cot"), call("csc")]),
        "asin" => pow(one_minus_square(), -half()),
        "acos" => -pow(one_minus_square(), -half()),
        "atan" => pow(add(vec![pow(u.clone(), Expr::integer(2)), Expr::one()]), Expr::integer(-1)),
        "sinh" => call("cosh"),
        "cosh" => call("sinh"),
        "tanh" => add(vec![Expr::one(), -squared("tanh")]),
        "exp" => call("exp"),
        "log" => pow(u.clone(), Expr::integer(-1)),
        "Abs" => mul(vec![u.clone(), pow(call("Abs"), Expr::integer(-1))]),
        _ => return Err(DerivativeError::Unsupported(name.to_string())),
    };

    Ok(mul(vec![outer, derivative(u, with)?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn d(expr: Expr) -> String {
        derivative(&expr, "x").unwrap().to_string()
    }

    #[test]
    fn polynomial() {
        assert_eq!(d(x().pow(Expr::integer(2))), "2*x");
        assert_eq!(d(Expr::integer(3) * x() + Expr::one()), "3");
        assert_eq!(d(Expr::symbol("y")), "0");
    }

    #[test]
    fn chain_rule() {
        assert_eq!(d(apply("sin", vec![x()])), "cos(x)");
        assert_eq!(d(apply("cos", vec![x()])), "-sin(x)");
        let exp = apply("exp", vec![Expr::integer(2) * x()]);
        assert_eq!(d(exp), "2*exp(2*x)");
        assert_eq!(d(apply("log", vec![x()])), "1/x");
    }

    #[test]
    fn product_rule() {
        let expr = x() * apply("sin", vec![x()]);
        assert_eq!(d(expr), "x*cos(x) + sin(x)");
    }

    #[test]
    fn partial_derivative() {
        let expr = x() * Expr::symbol("y") + Expr::symbol("y").pow(Expr::integer(2));
        assert_eq!(derivative(&expr, "y").unwrap().to_string(), "x + 2*y");
    }

    #[test]
    fn unknown_function() {
        let expr = Expr::call("f", vec![x()]);
        assert_eq!(derivative(&expr, "x"), Err(DerivativeError::Unsupported("f".to_string())));
    }
}
