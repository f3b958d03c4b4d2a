pub mod error;

use crate::cancel::CancelToken;
use crate::error::{DuplicateArgument, MissingArgument, TooManyArguments, TypeMismatch, UnknownKeyword};
use crate::symbolic::Expr;
use crate::value::Value;
pub use error::BuiltinError;

/// A function parameter to a builtin function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinParam {
    /// The name of the parameter, which is also its keyword.
    pub name: &'static str,

    /// Whether the parameter is required, optional, or variadic.
    pub kind: ParamKind,

    /// The typename of the parameter.
    pub typename: Option<&'static str>,
}

/// The kind of the function parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Required,
    Optional,

    /// Absorbs every remaining positional argument. Must be the last parameter.
    Variadic,
}

/// Whether a builtin performs an operation on its arguments, or constructs a mathematical value.
///
/// `diff(x^2, x)` is a routine: it computes something. `sin(x)` is a function class: it is the
/// mathematical object `sin(x)`, and only evaluates at special arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinKind {
    Routine,
    FunctionClass,
}

/// A trait implemented by all builtin functions.
pub trait Builtin: std::fmt::Debug + Send + Sync {
    /// Returns the name of the function.
    fn name(&self) -> &'static str;

    fn kind(&self) -> BuiltinKind {
        BuiltinKind::Routine
    }

    /// The function's signature, indicating all parameters, whether they are required or optional,
    /// and the expected typenames.
    fn sig(&self) -> &'static [BuiltinParam];

    /// The function's signature as a string, used for error messages.
    fn sig_str(&self) -> &'static str;

    /// Returns true if keyword arguments that do not name a parameter are accepted, in which case
    /// they are available through [`Args::extra`].
    fn accepts_any_keyword(&self) -> bool {
        false
    }

    /// Evaluates the function. Long-running builtins poll `cancel` and return
    /// [`BuiltinError::Cancelled`] once it trips.
    fn eval(&self, args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError>;
}

/// Arguments bound to the parameters of a builtin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    name: &'static str,
    sig: &'static [BuiltinParam],
    slots: Vec<Option<Value>>,
    rest: Vec<Value>,
    extra: Vec<(String, Value)>,
    given: usize,
}

impl Args {
    /// Binds positional and keyword arguments to the parameters of the builtin.
    pub fn bind(
        builtin: &dyn Builtin,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<Self, BuiltinError> {
        let sig = builtin.sig();
        let variadic = sig.iter().position(|param| param.kind == ParamKind::Variadic);
        let given = positional.len();
        let mut args = Self {
            name: builtin.name(),
            sig,
            slots: vec![None; sig.len()],
            rest: Vec::new(),
            extra: Vec::new(),
            given,
        };

        for (i, value) in positional.into_iter().enumerate() {
            match variadic {
                Some(v) if i >= v => args.rest.push(value),
                _ if i < sig.len() => args.slots[i] = Some(value),
                _ => {
                    return Err(BuiltinError::TooManyArguments(TooManyArguments {
                        name: builtin.name().to_string(),
                        expected: sig.len(),
                        given,
                    }));
                },
            }
        }

        for (keyword, value) in keyword {
            let slot = sig
                .iter()
                .position(|param| param.name == keyword && param.kind != ParamKind::Variadic);
            match slot {
                Some(i) if args.slots[i].is_some() => {
                    return Err(BuiltinError::DuplicateArgument(DuplicateArgument {
                        name: builtin.name().to_string(),
                        param: keyword,
                    }));
                },
                Some(i) => args.slots[i] = Some(value),
                None if builtin.accepts_any_keyword() => args.extra.push((keyword, value)),
                None => {
                    return Err(BuiltinError::UnknownKeyword(UnknownKeyword {
                        name: builtin.name().to_string(),
                        keyword,
                    }));
                },
            }
        }

        let required = sig.iter().filter(|param| param.kind == ParamKind::Required).count();
        for (index, param) in sig.iter().enumerate() {
            if param.kind == ParamKind::Required && args.slots[index].is_none() {
                return Err(BuiltinError::MissingArgument(MissingArgument {
                    name: builtin.name().to_string(),
                    index,
                    expected: required,
                    given,
                }));
            }
        }

        Ok(args)
    }

    /// Returns the value bound to the parameter at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Takes the value bound to the parameter at `index`, if any.
    pub fn take(&mut self, index: usize) -> Option<Value> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Takes the parameter at `index` as an expression, failing with a type mismatch otherwise.
    /// Returns [`None`] if the parameter was not given.
    pub fn take_expr(&mut self, index: usize) -> Result<Option<Expr>, BuiltinError> {
        match self.take(index) {
            Some(Value::Expr(expr)) => Ok(Some(expr)),
            Some(other) => Err(self.mismatch(index, other.typename())),
            None => Ok(None),
        }
    }

    /// Takes a required parameter as an expression.
    pub fn expr(&mut self, index: usize) -> Result<Expr, BuiltinError> {
        self.take_expr(index)?.ok_or_else(|| {
            BuiltinError::MissingArgument(MissingArgument {
                name: self.name.to_string(),
                index,
                expected: index + 1,
                given: self.given,
            })
        })
    }

    /// Builds a type mismatch error for the parameter at `index`.
    pub fn mismatch(&self, index: usize, given: &'static str) -> BuiltinError {
        let expected = self
            .sig
            .get(index)
            .and_then(|param| param.typename)
            .unwrap_or("expression");
        BuiltinError::TypeMismatch(TypeMismatch {
            name: self.name.to_string(),
            index,
            expected,
            given,
        })
    }

    /// The positional arguments absorbed by a variadic parameter.
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Keyword arguments that did not name a parameter.
    pub fn extra(&self) -> &[(String, Value)] {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Pair;

    impl Builtin for Pair {
        fn name(&self) -> &'static str {
            "pair"
        }

        fn sig(&self) -> &'static [BuiltinParam] {
            &[
                BuiltinParam { name: "a", kind: ParamKind::Required, typename: None },
                BuiltinParam { name: "b", kind: ParamKind::Optional, typename: None },
            ]
        }

        fn sig_str(&self) -> &'static str {
            "a, b"
        }

        fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
            let a = args.expr(0)?;
            let b = args.take_expr(1)?.unwrap_or_else(Expr::zero);
            Ok(Value::Expr(a + b))
        }
    }

    fn one() -> Value {
        Value::Expr(Expr::one())
    }

    #[test]
    fn keyword_binds_by_name() {
        let args = Args::bind(&Pair, vec![one()], vec![("b".to_string(), one())]).unwrap();
        assert_eq!(args.get(1), Some(&one()));
        let value = Pair.eval(args, &CancelToken::new()).unwrap();
        assert_eq!(value, Value::Expr(Expr::integer(2)));
    }

    #[test]
    fn too_many() {
        let err = Args::bind(&Pair, vec![one(), one(), one()], vec![]).unwrap_err();
        assert!(matches!(err, BuiltinError::TooManyArguments(TooManyArguments { expected: 2, given: 3, .. })));
    }

    #[test]
    fn missing_and_unknown() {
        let err = Args::bind(&Pair, vec![], vec![]).unwrap_err();
        assert!(matches!(err, BuiltinError::MissingArgument(MissingArgument { index: 0, .. })));
        let err = Args::bind(&Pair, vec![one()], vec![("c".to_string(), one())]).unwrap_err();
        assert!(matches!(err, BuiltinError::UnknownKeyword(_)));
        let err = Args::bind(&Pair, vec![one()], vec![("a".to_string(), one())]).unwrap_err();
        assert!(matches!(err, BuiltinError::DuplicateArgument(_)));
    }
}
