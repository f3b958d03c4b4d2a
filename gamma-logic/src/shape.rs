//! Decomposition of the parsed input into the function it calls and its arguments.

use gamma_compute::Value;
use gamma_parser::parser::ast::expr::Expr;
use crate::error::GammaError;
use crate::sandbox::Sandbox;

/// An argument of the top-level call.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// The argument as it was written, normalized by the parser.
    pub text: String,

    /// The evaluated argument.
    pub value: Value,
}

/// The syntactic shape of the input: which function the top level calls, and with what.
///
/// Input that is not a direct call has an empty function name, and the whole input as its only
/// argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallShape {
    /// The name of the called function, or empty if the input is not a call.
    pub function: String,

    /// The positional arguments, in order.
    pub args: Vec<Argument>,

    /// The keyword arguments, in order.
    pub kwargs: Vec<(String, Argument)>,
}

impl CallShape {
    /// Extracts the call shape of the parsed input. `evaluated` is the value of the whole input,
    /// which becomes the argument of input that is not a call.
    pub fn extract(parsed: &Expr, evaluated: &Value, sandbox: &Sandbox) -> Result<Self, GammaError> {
        let Some(call) = parsed.as_call() else {
            return Ok(Self {
                function: String::new(),
                args: vec![Argument { text: parsed.to_string(), value: evaluated.clone() }],
                kwargs: Vec::new(),
            });
        };

        let argument = |expr: &Expr| -> Result<Argument, GammaError> {
            Ok(Argument { text: expr.to_string(), value: sandbox.evaluate(expr)? })
        };
        Ok(Self {
            function: call.name.name.clone(),
            args: call.args.iter().map(argument).collect::<Result<_, _>>()?,
            kwargs: call
                .kwargs
                .iter()
                .map(|kwarg| Ok((kwarg.name.name.clone(), argument(&kwarg.value)?)))
                .collect::<Result<_, GammaError>>()?,
        })
    }

    /// Returns true if the input is a call.
    pub fn is_call(&self) -> bool {
        !self.function.is_empty()
    }

    /// Returns true if the call has at least one argument.
    pub fn is_applied(&self) -> bool {
        !self.args.is_empty() || !self.kwargs.is_empty()
    }

    /// The value of the positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index).map(|arg| &arg.value)
    }

    /// The value of the named keyword argument.
    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs
            .iter()
            .find(|(keyword, _)| keyword == name)
            .map(|(_, arg)| &arg.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gamma_compute::CancelToken;
    use pretty_assertions::assert_eq;

    fn shape(text: &str) -> CallShape {
        let mut sandbox = Sandbox::new(CancelToken::new());
        let (parsed, value) = sandbox.run(text).unwrap().unwrap();
        CallShape::extract(&parsed, &value, &sandbox).unwrap()
    }

    #[test]
    fn direct_call() {
        let shape = shape("diff(x^2, x)");
        assert_eq!(shape.function, "diff");
        assert_eq!(shape.args.len(), 2);
        assert_eq!(shape.args[0].text, "x^2");
        assert_eq!(shape.arg(1).map(ToString::to_string), Some("x".to_string()));
    }

    #[test]
    fn not_a_call() {
        let shape = shape("2+2");
        assert_eq!(shape.function, "");
        assert!(!shape.is_call());
        assert_eq!(shape.args.len(), 1);
        assert_eq!(shape.args[0].text, "2 + 2");
        assert_eq!(shape.arg(0).map(ToString::to_string), Some("4".to_string()));
    }

    #[test]
    fn keyword_arguments() {
        let shape = shape("series(sin(x), x, n=4)");
        assert_eq!(shape.kwarg("n").map(ToString::to_string), Some("4".to_string()));
        assert!(shape.is_applied());
    }

    #[test]
    fn bare_name_is_not_applied() {
        let shape = shape("factorint");
        assert!(!shape.is_call());
        assert_eq!(shape.arg(0), Some(&Value::Function("factorint".to_string())));
    }
}
