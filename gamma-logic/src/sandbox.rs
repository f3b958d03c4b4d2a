//! The request-scoped evaluation environment.

use gamma_compute::builtin::{Args, Builtin, BuiltinError, BuiltinParam, ParamKind};
use gamma_compute::eval::Eval;
use gamma_compute::{CancelToken, Namespace, Value};
use gamma_parser::parser::ast::expr::Expr;
use std::sync::Arc;
use crate::error::GammaError;

/// The name the evaluated input is bound to, so later expressions can refer to it.
pub const INPUT_EVALUATED: &str = "input_evaluated";

/// Accepts anything a plot request can contain and computes nothing. The parameters of a plot
/// are read from the call shape instead.
#[derive(Debug)]
pub struct Plot;

impl Builtin for Plot {
    fn name(&self) -> &'static str {
        "plot"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[BuiltinParam { name: "f", kind: ParamKind::Variadic, typename: None }]
    }

    fn sig_str(&self) -> &'static str {
        "*f, **kwargs"
    }

    fn accepts_any_keyword(&self) -> bool {
        true
    }

    fn eval(&self, _: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
        Ok(Value::None)
    }
}

/// Returns its argument unchanged.
#[derive(Debug)]
pub struct Help;

impl Builtin for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[BuiltinParam { name: "f", kind: ParamKind::Required, typename: None }]
    }

    fn sig_str(&self) -> &'static str {
        "f"
    }

    fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
        Ok(args.take(0).unwrap_or(Value::None))
    }
}

/// A namespace owned by one request, preloaded with every engine operation plus the `plot` and
/// `help` placeholders.
#[derive(Debug)]
pub struct Sandbox {
    ns: Namespace,
}

impl Sandbox {
    /// Creates a fresh sandbox whose evaluations stop once `cancel` trips.
    pub fn new(cancel: CancelToken) -> Self {
        let mut ns = Namespace::default();
        ns.add_builtin("plot", Arc::new(Plot));
        ns.add_builtin("help", Arc::new(Help));
        ns.set_cancel_token(cancel);
        Self { ns }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// Binds a value to a name.
    pub fn set(&mut self, name: &str, value: Value) {
        self.ns.add_var(name, value);
    }

    /// Returns the value bound to a name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.ns.get_var(name)
    }

    /// Fails with an evaluation error if the request was cancelled.
    pub fn check_cancelled(&self) -> Result<(), GammaError> {
        if self.ns.cancel_token().is_cancelled() {
            Err(GammaError::evaluation("evaluation was cancelled"))
        } else {
            Ok(())
        }
    }

    /// Parses text into an expression, resolving implicit calls against this sandbox. Returns
    /// [`None`] for empty input.
    pub fn parse(&self, text: &str) -> Result<Option<Expr>, GammaError> {
        gamma_parser::parse(text, &self.ns).map_err(GammaError::Parse)
    }

    /// Evaluates a parsed expression.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, GammaError> {
        expr.eval(&self.ns).map_err(GammaError::from_eval)
    }

    /// Parses and evaluates the input of a request, binding the result to [`INPUT_EVALUATED`].
    pub fn run(&mut self, text: &str) -> Result<Option<(Expr, Value)>, GammaError> {
        let Some(parsed) = self.parse(text)? else {
            return Ok(None);
        };
        let value = self.evaluate(&parsed)?;
        self.set(INPUT_EVALUATED, value.clone());
        Ok(Some((parsed, value)))
    }

    /// Calls an operation directly with already evaluated arguments.
    pub fn call(
        &self,
        function: &str,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<Value, GammaError> {
        self.ns
            .call(function, positional, keyword)
            .map_err(|err| GammaError::from_eval(err.into_detached_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gamma_compute::symbolic::Expr as SymExpr;
    use pretty_assertions::assert_eq;

    #[test]
    fn binds_input_evaluated() {
        let mut sandbox = Sandbox::new(CancelToken::new());
        let (_, value) = sandbox.run("x + x").unwrap().unwrap();
        assert_eq!(sandbox.get(INPUT_EVALUATED), Some(&value));

        let later = sandbox.parse("input_evaluated * 2").unwrap().unwrap();
        assert_eq!(sandbox.evaluate(&later).unwrap().to_string(), "4*x");
    }

    #[test]
    fn plot_accepts_anything() {
        let mut sandbox = Sandbox::new(CancelToken::new());
        let (_, value) = sandbox.run("plot(y = x^2, r = sin(t))").unwrap().unwrap();
        assert_eq!(value, Value::None);
    }

    #[test]
    fn empty_input() {
        let mut sandbox = Sandbox::new(CancelToken::new());
        assert!(sandbox.run("   ").unwrap().is_none());
    }

    #[test]
    fn parse_and_evaluation_errors_differ() {
        let mut sandbox = Sandbox::new(CancelToken::new());
        assert!(matches!(sandbox.run("2 +* 3"), Err(GammaError::Parse(_))));
        assert!(matches!(sandbox.run("factorint(x)"), Err(GammaError::Evaluation { .. })));
    }

    #[test]
    fn sandboxes_are_isolated() {
        let mut first = Sandbox::new(CancelToken::new());
        first.set("y", SymExpr::integer(3).into());
        let second = Sandbox::new(CancelToken::new());
        assert!(second.get("y").is_none());
    }

    #[test]
    fn cancellation_is_an_evaluation_error() {
        let token = CancelToken::new();
        token.cancel();
        let mut sandbox = Sandbox::new(token);
        assert!(matches!(sandbox.run("diff(x^2, x)"), Err(GammaError::Evaluation { .. })));
    }
}
