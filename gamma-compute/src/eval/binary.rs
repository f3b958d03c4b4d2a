use gamma_error::Error;
use gamma_parser::parser::{ast::binary::Binary, token::op::BinOpKind};
use num_rational::BigRational;
use num_traits::Zero;
use crate::error::InvalidBinaryOperation;
use crate::namespace::Namespace;
use crate::symbolic::Expr;
use crate::value::Value;
use super::Eval;

/// Computes `left mod right`, taking the sign of `right`. Non-numeric operands produce an
/// unevaluated `Mod` call.
fn modulo(left: Expr, right: Expr) -> Expr {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) if !b.is_zero() => {
            let quotient = (a / b).floor();
            Expr::number(a - b * quotient)
        },
        _ => Expr::call("Mod", vec![left, right]),
    }
}

impl Eval for Binary {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        let left = self.lhs.eval(ns)?;
        let right = self.rhs.eval(ns)?;

        let (Value::Expr(left), Value::Expr(right)) = (&left, &right) else {
            return Err(Error::new(
                vec![self.lhs.span(), self.op.span.clone(), self.rhs.span()],
                InvalidBinaryOperation {
                    op: self.op.kind,
                    implicit: self.op.implicit,
                    left: left.typename(),
                    right: right.typename(),
                },
            ));
        };
        let (left, right) = (left.clone(), right.clone());

        Ok(Value::Expr(match self.op.kind {
            BinOpKind::Exp => left.pow(right),
            BinOpKind::Mul => left * right,
            BinOpKind::Div => left / right,
            BinOpKind::Mod => modulo(left, right),
            BinOpKind::Add => left + right,
            BinOpKind::Sub => left - right,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::primitive::int;
    use pretty_assertions::assert_eq;

    #[test]
    fn modulo_sign_follows_divisor() {
        assert_eq!(modulo(Expr::integer(-7), Expr::integer(3)), Expr::number(int(2)));
        assert_eq!(modulo(Expr::integer(7), Expr::integer(-3)), Expr::number(BigRational::from_integer((-2).into())));
    }

    #[test]
    fn modulo_symbolic() {
        let expr = modulo(Expr::symbol("x"), Expr::integer(3));
        assert_eq!(expr.to_string(), "Mod(x, 3)");
    }

    #[test]
    fn list_operand() {
        let ns = Namespace::default();
        let expr = gamma_parser::parse("[1] + 1", &ns).unwrap().unwrap();
        let err = expr.eval(&ns).unwrap_err();
        assert_eq!(err.message(), "cannot apply the `Add` operator to these operands");
    }

    #[test]
    fn integer_division_is_exact() {
        let ns = Namespace::default();
        let expr = gamma_parser::parse("6 / 4", &ns).unwrap().unwrap();
        assert_eq!(expr.eval(&ns).unwrap(), Value::Expr(Expr::number(BigRational::new(3.into(), 2.into()))));
    }
}
