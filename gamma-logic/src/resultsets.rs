//! The classification table: which cards apply to which inputs, and how the input is
//! normalized for them.

use gamma_compute::symbolic::{Expr, Poly};
use gamma_compute::Value;
use once_cell::sync::Lazy;
use std::{collections::HashMap, sync::Arc};
use crate::components::Components;
use crate::shape::CallShape;

/// Turns the call shape and evaluated input into the components cards operate on.
pub type Normalizer = fn(&CallShape, &Value) -> Components;

/// A test on the evaluated input.
pub type Predicate = fn(&Value) -> bool;

/// A normalizer and the names of the cards it prepares components for.
#[derive(Debug, Clone)]
pub struct Entry {
    pub normalizer: Normalizer,
    pub cards: Vec<&'static str>,
}

impl Entry {
    pub fn new(normalizer: Normalizer, cards: &[&'static str]) -> Self {
        Self { normalizer, cards: cards.to_vec() }
    }
}

/// Maps the function called by the input to an [`Entry`].
///
/// Calls to functions without an entry, and input that is not a call, use the default entry: the
/// first rule whose predicate accepts the evaluated input, or the fallback entry if none does.
#[derive(Debug, Clone)]
pub struct ClassificationTable {
    functions: HashMap<String, Entry>,
    rules: Vec<(Predicate, Entry)>,
    fallback: Entry,
}

impl ClassificationTable {
    /// Creates a table with no function entries or rules.
    pub fn new(fallback: Entry) -> Self {
        Self {
            functions: HashMap::new(),
            rules: Vec::new(),
            fallback,
        }
    }

    /// Adds an entry for calls to the named function.
    pub fn with_function(mut self, name: &str, entry: Entry) -> Self {
        self.functions.insert(name.to_string(), entry);
        self
    }

    /// Adds a rule to the default entry. Rules are tried in the order they are added.
    pub fn with_rule(mut self, predicate: Predicate, entry: Entry) -> Self {
        self.rules.push((predicate, entry));
        self
    }

    /// Returns the entry for a call to `function` (or for input that is not a call, if [`None`])
    /// that evaluated to `value`.
    pub fn entry(&self, function: Option<&str>, value: &Value) -> &Entry {
        function
            .and_then(|name| self.functions.get(name))
            .unwrap_or_else(|| self.default_entry(value))
    }

    /// Returns the default entry for the evaluated input.
    pub fn default_entry(&self, value: &Value) -> &Entry {
        self.rules
            .iter()
            .find(|(predicate, _)| predicate(value))
            .map(|(_, entry)| entry)
            .unwrap_or(&self.fallback)
    }

    /// The table used by default.
    pub fn builtin() -> Self {
        Self::new(Entry::new(default_normalizer, &[]))
            .with_function("diff", Entry::new(extract_first, &["diff"]))
            .with_function("integrate", Entry::new(extract_first, &["integral"]))
            .with_function("series", Entry::new(extract_series, &["series"]))
            .with_function("solve", Entry::new(extract_first, &["roots"]))
            .with_function("factor", Entry::new(extract_first, &[]))
            .with_function("factorint", Entry::new(extract_first, &["factorization"]))
            .with_function("simplify", Entry::new(extract_variable, &[]))
            .with_function("plot", Entry::new(extract_plot, &["plot"]))
            .with_rule(is_integer, Entry::new(default_normalizer, &["factorization"]))
            .with_rule(is_univariate_polynomial, Entry::new(default_normalizer, &["roots", "diff", "integral", "plot"]))
            .with_rule(is_univariate, Entry::new(default_normalizer, &["diff", "integral", "series", "plot"]))
            .with_rule(is_multivariate, Entry::new(default_normalizer, &["roots", "diff", "integral"]))
    }
}

static TABLE: Lazy<Arc<ClassificationTable>> = Lazy::new(|| Arc::new(ClassificationTable::builtin()));

/// Returns the process-wide classification table.
pub fn global() -> Arc<ClassificationTable> {
    Arc::clone(&TABLE)
}

fn free_symbol_count(value: &Value) -> usize {
    match value {
        Value::Expr(expr) => expr.free_symbols().len(),
        _ => 0,
    }
}

/// The input is an exact integer.
pub fn is_integer(value: &Value) -> bool {
    value.is_integer()
}

/// The input is a polynomial of positive degree in its only variable.
pub fn is_univariate_polynomial(value: &Value) -> bool {
    let Value::Expr(expr) = value else {
        return false;
    };
    let symbols = expr.free_symbols();
    match (symbols.len(), symbols.first()) {
        (1, Some(var)) => Poly::from_expr(expr, var).is_some_and(|poly| poly.degree() > 0),
        _ => false,
    }
}

/// The input is an expression in exactly one variable.
pub fn is_univariate(value: &Value) -> bool {
    free_symbol_count(value) == 1
}

/// The input is an expression in several variables.
pub fn is_multivariate(value: &Value) -> bool {
    free_symbol_count(value) > 1
}

/// Returns the symbol named by the value, or by the first item of a `[x, a, b]` list.
fn symbol_of(value: &Value) -> Option<String> {
    match value {
        Value::Expr(expr) => expr.as_symbol().map(str::to_string),
        Value::List(items) => items.first().and_then(symbol_of),
        _ => None,
    }
}

/// The variable explicitly named by the call, as the second positional argument or a keyword.
fn explicit_variable(shape: &CallShape) -> Option<String> {
    shape
        .arg(1)
        .or_else(|| shape.kwarg("symbol"))
        .or_else(|| shape.kwarg("x"))
        .and_then(symbol_of)
}

/// Uses the evaluated input as-is.
pub fn default_normalizer(_: &CallShape, value: &Value) -> Components {
    Components::new(value.clone())
}

/// Uses the first argument of the call as the working value, respecting an explicit variable.
pub fn extract_first(shape: &CallShape, value: &Value) -> Components {
    let working = shape.arg(0).cloned().unwrap_or_else(|| value.clone());
    Components::new(working).with_variable(explicit_variable(shape))
}

/// Like [`extract_first`], and also keeps the expansion point and order given to the call, so
/// the series card repeats the expansion that was asked for.
pub fn extract_series(shape: &CallShape, value: &Value) -> Components {
    let mut components = extract_first(shape, value);
    for (index, name) in [(2, "x0"), (3, "n")] {
        if let Some(arg) = shape.arg(index).or_else(|| shape.kwarg(name)) {
            components = components.with_extra(name, arg.clone());
        }
    }
    components
}

/// Keeps the evaluated input, but takes the variables from the first argument.
pub fn extract_variable(shape: &CallShape, value: &Value) -> Components {
    let mut components = extract_first(shape, value);
    components.working = value.clone();
    components
}

/// Collects the functions to plot and the coordinate system of each.
///
/// `plot(f)` and `plot([f, g])` plot in cartesian coordinates. Keyword arguments name each
/// function, and names starting with `r` are plotted in polar coordinates.
pub fn extract_plot(shape: &CallShape, _: &Value) -> Components {
    let mut functions = Vec::new();
    let mut coordinates = Vec::new();
    for arg in &shape.args {
        let values = match &arg.value {
            Value::List(items) => items.clone(),
            other => vec![other.clone()],
        };
        coordinates.extend(values.iter().map(|_| Value::Str("cartesian".to_string())));
        functions.extend(values);
    }
    for (name, arg) in &shape.kwargs {
        let system = if name.starts_with('r') { "polar" } else { "cartesian" };
        functions.push(arg.value.clone());
        coordinates.push(Value::Str(system.to_string()));
    }

    Components::new(Value::List(functions)).with_extra("coordinates", Value::List(coordinates))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::shape::Argument;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn argument(value: Value) -> Argument {
        Argument { text: value.to_string(), value }
    }

    #[test]
    fn unknown_function_uses_default_entry() {
        let table = ClassificationTable::builtin();
        let value = Value::Expr(Expr::integer(12));
        let entry = table.entry(Some("no_such_function"), &value);
        assert_eq!(entry.cards, vec!["factorization"]);
        assert_eq!(table.entry(None, &value).cards, vec!["factorization"]);
    }

    #[test]
    fn default_rules_by_shape() {
        let table = ClassificationTable::builtin();
        let poly = Value::Expr(x().pow(Expr::integer(2)) - Expr::one());
        assert_eq!(table.entry(None, &poly).cards, vec!["roots", "diff", "integral", "plot"]);

        let sin = Value::Expr(Expr::call("sin", vec![x()]));
        assert_eq!(table.entry(None, &sin).cards, vec!["diff", "integral", "series", "plot"]);

        let product = Value::Expr(x() * Expr::symbol("y"));
        assert_eq!(table.entry(None, &product).cards, vec!["roots", "diff", "integral"]);

        assert!(table.entry(None, &Value::Bool(true)).cards.is_empty());
    }

    #[test]
    fn first_argument_becomes_working_value() {
        let shape = CallShape {
            function: "diff".to_string(),
            args: vec![argument((x() * Expr::symbol("y")).into()), argument(Expr::symbol("y").into())],
            kwargs: vec![],
        };
        let components = extract_first(&shape, &Value::Expr(x()));
        assert_eq!(components.working, Value::Expr(x() * Expr::symbol("y")));
        assert_eq!(components.variable.as_deref(), Some("y"));
    }

    #[test]
    fn series_call_keeps_point_and_order() {
        let shape = CallShape {
            function: "series".to_string(),
            args: vec![
                argument(Expr::call("cos", vec![x()]).into()),
                argument(x().into()),
                argument(Expr::integer(2).into()),
            ],
            kwargs: vec![("n".to_string(), argument(Expr::integer(3).into()))],
        };
        let components = extract_series(&shape, &Value::None);
        assert_eq!(components.get("x0"), Some(Expr::integer(2).into()));
        assert_eq!(components.get("n"), Some(Expr::integer(3).into()));
        assert_eq!(components.variable.as_deref(), Some("x"));
    }

    #[test]
    fn plot_coordinates() {
        let shape = CallShape {
            function: "plot".to_string(),
            args: vec![],
            kwargs: vec![
                ("y".to_string(), argument(x().into())),
                ("r".to_string(), argument(Expr::call("sin", vec![Expr::symbol("t")]).into())),
            ],
        };
        let components = extract_plot(&shape, &Value::None);
        assert_eq!(components.working.to_string(), "[x, sin(t)]");
        assert_eq!(components.get("coordinates").map(|c| c.to_string()), Some("['cartesian', 'polar']".to_string()));
    }
}
