use gamma_error::Error;
use gamma_parser::parser::{ast::unary::Unary, token::op::UnaryOpKind};
use crate::error::InvalidUnaryOperation;
use crate::namespace::Namespace;
use crate::symbolic::elementary::apply;
use crate::value::Value;
use super::Eval;

impl Eval for Unary {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        let operand = self.operand.eval(ns)?;
        let Value::Expr(expr) = operand else {
            return Err(Error::new(vec![self.operand.span(), self.op.span.clone()], InvalidUnaryOperation {
                op: self.op.kind,
                expr_type: operand.typename(),
            }));
        };

        Ok(Value::Expr(match self.op.kind {
            UnaryOpKind::Neg => -expr,
            UnaryOpKind::Pos => expr,
            UnaryOpKind::Factorial => apply("factorial", vec![expr]),
        }))
    }
}
