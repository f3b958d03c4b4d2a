use gamma_error::Error;
use gamma_parser::parser::ast::literal::Literal;
use crate::namespace::{Binding, Namespace};
use crate::primitive::{float_from_str, int_from_str};
use crate::symbolic::{Constant, Expr};
use crate::value::Value;
use super::Eval;

impl Eval for Literal {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        match self {
            Literal::Integer(int) => Ok(Value::Expr(
                int_from_str(&int.value).map_or_else(|| Expr::constant(Constant::Infinity), Expr::number),
            )),
            Literal::Float(float) => Ok(Value::Expr(
                float_from_str(&float.value).map_or_else(|| Expr::constant(Constant::Infinity), Expr::float),
            )),
            Literal::Symbol(sym) => Ok(match ns.get(&sym.name) {
                Some(Binding::Value(value)) => value.clone(),
                Some(Binding::Builtin(_)) => Value::Function(sym.name.clone()),
                None => Value::Expr(Expr::symbol(sym.name.as_str())),
            }),
            Literal::List(list) => list
                .values
                .iter()
                .map(|value| value.eval(ns))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }
}
