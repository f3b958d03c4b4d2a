use gamma_parser::parser::fmt::Latex;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use crate::symbolic::Expr;

/// Represents any value that can be produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A symbolic expression, including plain numbers.
    Expr(Expr),

    /// A boolean, such as the result of `isprime`.
    Bool(bool),

    /// An ordered list of values, such as the solutions returned by `solve`.
    List(Vec<Value>),

    /// An ordered mapping, such as the prime factorization returned by `factorint`.
    Dict(Vec<(Value, Value)>),

    /// A string.
    Str(String),

    /// A reference to a builtin function by name.
    Function(String),

    /// The absence of a value.
    None,
}

impl Value {
    /// Returns the typename of this value.
    pub fn typename(&self) -> &'static str {
        match self {
            Self::Expr(expr) if expr.is_number() => "number",
            Self::Expr(_) => "expression",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Str(_) => "string",
            Self::Function(_) => "function",
            Self::None => "none",
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Self::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn into_expr(self) -> Option<Expr> {
        match self {
            Self::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Returns true if the value is an exact integer.
    pub fn is_integer(&self) -> bool {
        self.as_expr().is_some_and(Expr::is_integer)
    }

    /// Returns true if the value is a leaf expression: a number, symbol, or constant.
    pub fn is_atom(&self) -> bool {
        self.as_expr().is_some_and(Expr::is_atom)
    }

    /// Returns the symbols appearing anywhere in the value.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        match self {
            Self::Expr(expr) => expr.free_symbols(),
            Self::List(values) => values.iter().flat_map(Value::free_symbols).collect(),
            Self::Dict(entries) => entries
                .iter()
                .flat_map(|(key, value)| key.free_symbols().into_iter().chain(value.free_symbols()))
                .collect(),
            _ => BTreeSet::new(),
        }
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

fn fmt_joined<'a>(
    f: &mut Formatter,
    items: impl Iterator<Item = &'a Value>,
    item: impl Fn(&mut Formatter, &Value) -> std::fmt::Result,
) -> std::fmt::Result {
    for (i, value) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item(f, value)?;
    }
    Ok(())
}

/// Formats the value the way it would be typed back in: `[-1, 1]`, `{2: 3, 5: 1}`, `True`.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{}", expr),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::List(values) => {
                write!(f, "[")?;
                fmt_joined(f, values.iter(), |f, value| write!(f, "{}", value))?;
                write!(f, "]")
            },
            Self::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            },
            Self::Str(s) => write!(f, "'{}'", s),
            Self::Function(name) => write!(f, "{}", name),
            Self::None => write!(f, "None"),
        }
    }
}

impl Latex for Value {
    fn fmt_latex(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Expr(expr) => expr.fmt_latex(f),
            Self::Bool(true) => write!(f, "\\text{{True}}"),
            Self::Bool(false) => write!(f, "\\text{{False}}"),
            Self::List(values) => {
                write!(f, "\\left[ ")?;
                fmt_joined(f, values.iter(), |f, value| value.fmt_latex(f))?;
                write!(f, "\\right]")
            },
            Self::Dict(entries) => {
                write!(f, "\\left\\{{ ")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", \\  ")?;
                    }
                    write!(f, "{} : {}", key.as_display(), value.as_display())?;
                }
                write!(f, "\\right\\}}")
            },
            Self::Str(s) => write!(f, "\\text{{{}}}", s),
            Self::Function(name) => write!(f, "\\operatorname{{{}}}", name),
            Self::None => write!(f, "\\text{{None}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn typenames() {
        assert_eq!(Value::Expr(Expr::integer(2)).typename(), "number");
        assert_eq!(Value::Expr(Expr::symbol("x")).typename(), "expression");
        assert_eq!(Value::List(vec![]).typename(), "list");
    }

    #[test]
    fn display_collections() {
        let list = Value::List(vec![Expr::integer(-1).into(), Expr::integer(1).into()]);
        assert_eq!(list.to_string(), "[-1, 1]");
        let dict = Value::Dict(vec![
            (Expr::integer(2).into(), Expr::integer(3).into()),
            (Expr::integer(5).into(), Expr::integer(1).into()),
        ]);
        assert_eq!(dict.to_string(), "{2: 3, 5: 1}");
        assert_eq!(Value::Bool(true).to_string(), "True");
    }

    #[test]
    fn latex_list() {
        let list = Value::List(vec![Expr::integer(-1).into(), Expr::symbol("x").into()]);
        assert_eq!(list.as_display().to_string(), "\\left[ -1, x\\right]");
    }
}
