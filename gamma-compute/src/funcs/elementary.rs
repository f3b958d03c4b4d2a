//! Elementary function classes.
//!
//! Unlike routines, these build the mathematical object they name. `sin(x)` stays `sin(x)`; only
//! special arguments such as `sin(0)` or `cos(pi)` evaluate.

use crate::builtin::{Args, Builtin, BuiltinError, BuiltinKind, BuiltinParam, ParamKind};
use crate::cancel::CancelToken;
use crate::primitive::rational;
use crate::symbolic::{elementary::apply, Expr};
use crate::value::Value;

const ARG: BuiltinParam = BuiltinParam {
    name: "x",
    kind: ParamKind::Required,
    typename: Some("expression"),
};

macro_rules! function_class {
    ($($upname:ident $name:literal),* $(,)?) => {
        $(
            #[derive(Debug)]
            pub struct $upname;

            impl Builtin for $upname {
                fn name(&self) -> &'static str {
                    $name
                }

                fn kind(&self) -> BuiltinKind {
                    BuiltinKind::FunctionClass
                }

                fn sig(&self) -> &'static [BuiltinParam] {
                    &[ARG]
                }

                fn sig_str(&self) -> &'static str {
                    "x"
                }

                fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
                    let x = args.expr(0)?;
                    Ok(Value::Expr(apply($name, vec![x])))
                }
            }
        )*
    };
}

function_class! {
    Sin "sin",
    Cos "cos",
    Tan "tan",
    Cot "cot",
    Sec "sec",
    Csc "csc",
    Asin "asin",
    Acos "acos",
    Atan "atan",
    Sinh "sinh",
    Cosh "cosh",
    Tanh "tanh",
    Exp "exp",
    Log "log",
    Abs "Abs",
    Factorial "factorial",
}

/// The principal square root, `x^(1/2)`.
#[derive(Debug)]
pub struct Sqrt;

impl Builtin for Sqrt {
    fn name(&self) -> &'static str {
        "sqrt"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[ARG]
    }

    fn sig_str(&self) -> &'static str {
        "x"
    }

    fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
        let x = args.expr(0)?;
        Ok(Value::Expr(x.pow(Expr::number(rational(1, 2)))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::symbolic::Constant;
    use pretty_assertions::assert_eq;

    fn call(builtin: &dyn Builtin, x: Expr) -> Value {
        let args = Args::bind(builtin, vec![x.into()], vec![]).unwrap();
        builtin.eval(args, &CancelToken::new()).unwrap()
    }

    #[test]
    fn special_values() {
        assert_eq!(call(&Sin, Expr::zero()), Value::Expr(Expr::zero()));
        assert_eq!(call(&Cos, Expr::constant(Constant::Pi)), Value::Expr(Expr::integer(-1)));
    }

    #[test]
    fn stays_symbolic() {
        assert_eq!(call(&Sin, Expr::symbol("x")).to_string(), "sin(x)");
        assert_eq!(Sin.kind(), BuiltinKind::FunctionClass);
    }

    #[test]
    fn square_roots() {
        assert_eq!(call(&Sqrt, Expr::integer(16)), Value::Expr(Expr::integer(4)));
        assert_eq!(call(&Sqrt, Expr::integer(8)).to_string(), "2*sqrt(2)");
        assert_eq!(Sqrt.kind(), BuiltinKind::Routine);
    }
}
