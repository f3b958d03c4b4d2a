use gamma_parser::transform::Bindings;
use levenshtein::levenshtein;
use std::{collections::HashMap, sync::Arc};
use crate::builtin::{Args, Builtin, BuiltinError, BuiltinKind};
use crate::cancel::CancelToken;
use crate::error::UndefinedFunction;
use crate::symbolic::{Constant, Expr};
use crate::value::Value;

/// Something a name in a [`Namespace`] is bound to.
#[derive(Debug, Clone)]
pub enum Binding {
    /// A plain value.
    Value(Value),

    /// A builtin operation.
    Builtin(Arc<dyn Builtin>),
}

impl Binding {
    /// Returns true if the binding can be called.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Returns true if the binding is a leaf value, such as a number or a symbol.
    pub fn is_atom(&self) -> bool {
        match self {
            Self::Value(value) => value.is_atom(),
            Self::Builtin(_) => false,
        }
    }

    /// Returns true if the binding is a function class, such as `sin`.
    pub fn is_function_class(&self) -> bool {
        match self {
            Self::Builtin(builtin) => builtin.kind() == BuiltinKind::FunctionClass,
            Self::Value(_) => false,
        }
    }
}

/// The names visible to an evaluated expression.
///
/// A namespace is owned by a single evaluation. The [`Default`] namespace is preloaded with every
/// builtin operation and the constants `pi`, `E`, `I`, and `oo`.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Everything bound in the namespace.
    bindings: HashMap<String, Binding>,

    /// Polled while evaluating; once it trips, evaluation stops with a cancellation error.
    cancel: CancelToken,
}

impl Default for Namespace {
    fn default() -> Self {
        let mut namespace = Self::new();
        for (name, builtin) in crate::funcs::all() {
            namespace.add_builtin(name, builtin);
        }
        for constant in [Constant::Pi, Constant::E, Constant::I, Constant::Infinity] {
            namespace.add_var(constant.name(), Expr::constant(constant).into());
        }
        namespace
    }
}

impl Namespace {
    /// Creates a new empty namespace.
    ///
    /// The empty namespace is rarely useful, as it contains no operations. Consider using the
    /// [`Default`] implementation instead.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            cancel: CancelToken::default(),
        }
    }

    /// Binds a value to a name, replacing any previous binding.
    pub fn add_var(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), Binding::Value(value));
    }

    /// Binds a builtin operation to a name, replacing any previous binding.
    pub fn add_builtin(&mut self, name: &str, builtin: Arc<dyn Builtin>) {
        self.bindings.insert(name.to_string(), Binding::Builtin(builtin));
    }

    /// Returns what the name is bound to.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Returns the value bound to the name, if it is bound to a value.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the builtin bound to the name, if it is bound to a builtin.
    pub fn get_builtin(&self, name: &str) -> Option<&Arc<dyn Builtin>> {
        match self.bindings.get(name) {
            Some(Binding::Builtin(builtin)) => Some(builtin),
            _ => None,
        }
    }

    /// Returns every bound name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Returns the names of callable bindings that are similar to the given name.
    pub fn get_similar_names<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut similar = self
            .bindings
            .iter()
            .filter(|(candidate, binding)| binding.is_callable() && levenshtein(candidate, name) < 2)
            .map(|(candidate, _)| candidate.as_str())
            .collect::<Vec<_>>();
        similar.sort_unstable();
        similar
    }

    /// Returns the cancellation token polled during evaluation.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Replaces the cancellation token polled during evaluation.
    pub fn set_cancel_token(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    /// Calls the named builtin with the given arguments.
    pub fn call(
        &self,
        name: &str,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<Value, BuiltinError> {
        let builtin = self.get_builtin(name).ok_or_else(|| {
            BuiltinError::UndefinedFunction(UndefinedFunction {
                name: name.to_string(),
                suggestions: self.get_similar_names(name).into_iter().map(str::to_string).collect(),
            })
        })?;
        let args = Args::bind(builtin.as_ref(), positional, keyword)?;
        builtin.eval(args, &self.cancel)
    }
}

impl Bindings for Namespace {
    fn is_callable(&self, name: &str) -> bool {
        self.get(name).is_some_and(Binding::is_callable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn default_contents() {
        let namespace = Namespace::default();
        assert!(namespace.is_callable("diff"));
        assert!(namespace.get("sin").is_some_and(Binding::is_function_class));
        assert!(namespace.get("pi").is_some_and(Binding::is_atom));
        assert!(!namespace.is_callable("x"));
    }

    #[test]
    fn call_by_name() {
        let namespace = Namespace::default();
        let value = namespace
            .call("gcd", vec![Expr::integer(8).into(), Expr::integer(12).into()], vec![])
            .unwrap();
        assert_eq!(value, Value::Expr(Expr::integer(4)));
    }

    #[test]
    fn undefined_suggests() {
        let namespace = Namespace::default();
        let err = namespace.call("dif", vec![], vec![]).unwrap_err();
        match err {
            BuiltinError::UndefinedFunction(e) => assert_eq!(e.suggestions, vec!["diff".to_string()]),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
