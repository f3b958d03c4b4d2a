//! Parameter declarations and argument conversions shared by the builtins.

use crate::builtin::{Args, BuiltinError, BuiltinParam, ParamKind};
use crate::symbolic::Expr;
use crate::value::Value;
use num_bigint::BigInt;

/// The expression a routine operates on.
pub const EXPR: BuiltinParam = BuiltinParam {
    name: "f",
    kind: ParamKind::Required,
    typename: Some("expression"),
};

/// An optional variable to operate with respect to.
pub const SYMBOL: BuiltinParam = BuiltinParam {
    name: "symbol",
    kind: ParamKind::Optional,
    typename: Some("symbol"),
};

/// A required integer.
pub const fn integer(name: &'static str) -> BuiltinParam {
    BuiltinParam {
        name,
        kind: ParamKind::Required,
        typename: Some("integer"),
    }
}

/// Picks the variable an operation should be performed with respect to when none was given.
///
/// An expression with exactly one symbol uses it. Constants fall back to `x`. Expressions with
/// several symbols are ambiguous.
pub fn infer_symbol(name: &str, expr: &Expr) -> Result<String, BuiltinError> {
    let symbols = expr.free_symbols();
    match symbols.len() {
        0 => Ok("x".to_string()),
        1 => Ok(symbols.into_iter().next().unwrap_or_default()),
        _ => Err(BuiltinError::unsupported(
            name,
            format!(
                "the expression has several variables ({}); specify which one to use",
                symbols.into_iter().collect::<Vec<_>>().join(", ")
            ),
        )),
    }
}

/// Converts a value into a symbol name, or returns [`None`] if it is not a symbol.
pub fn as_symbol(value: &Value) -> Option<String> {
    value.as_expr().and_then(Expr::as_symbol).map(str::to_string)
}

/// Takes an optional symbol parameter, inferring it from `expr` if it was not given.
pub fn take_symbol(args: &mut Args, index: usize, name: &str, expr: &Expr) -> Result<String, BuiltinError> {
    match args.take(index) {
        Some(value) => as_symbol(&value).ok_or_else(|| args.mismatch(index, value.typename())),
        None => infer_symbol(name, expr),
    }
}

/// Takes a required integer parameter.
pub fn take_integer(args: &mut Args, index: usize) -> Result<BigInt, BuiltinError> {
    let value = args.expr(index)?;
    value
        .as_integer()
        .ok_or_else(|| args.mismatch(index, Value::Expr(value).typename()))
}
