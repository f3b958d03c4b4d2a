//! The kinds of errors that can occur while evaluating an expression.

use ariadne::Fmt;
use gamma_attrs::ErrorKind;
use gamma_error::{ErrorKind, EXPR};
use gamma_parser::parser::token::op::{BinOpKind, UnaryOpKind};

/// The given binary operation cannot be applied to the given operands.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot apply the `{:?}` operator to these operands", op),
    labels = [
        format!("this operand has type `{}`", left),
        format!("this {}operator", if *implicit { "(implicit) " } else { "" }),
        format!("this operand has type `{}`", right),
    ],
)]
pub struct InvalidBinaryOperation {
    /// The operator that was used.
    pub op: BinOpKind,

    /// Whether the operator was implicitly inserted by the parser.
    pub implicit: bool,

    /// The type the left side evaluated to.
    pub left: &'static str,

    /// The type the right side evaluated to.
    pub right: &'static str,
}

/// The given unary operation cannot be applied to the given operand.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot apply the `{:?}` operator to this operand", op),
    labels = [
        "this operator".to_string(),
        format!("this operand has type `{}`", expr_type),
    ],
)]
pub struct InvalidUnaryOperation {
    /// The operator that was used.
    pub op: UnaryOpKind,

    /// The type the operand evaluated to.
    pub expr_type: &'static str,
}

/// The function is undefined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function does not exist", name),
    labels = ["this function"],
    help = if suggestions.is_empty() {
        "unknown names are treated as symbols, but cannot be called".to_string()
    } else if suggestions.len() == 1 {
        format!("did you mean the `{}` function?", (&*suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these functions? {}",
            suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UndefinedFunction {
    /// The name of the function that was undefined.
    pub name: String,

    /// A list of similarly named functions, if any.
    pub suggestions: Vec<String>,
}

/// A value that is not a function was called.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a function", name),
    labels = [format!("this has type `{}`", typename)],
)]
pub struct NotCallable {
    /// The name that was called.
    pub name: String,

    /// The type of the value bound to the name.
    pub typename: &'static str,
}

/// Too many arguments were given to a function call.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("too many arguments were given to the `{}` function", name),
    labels = ["this function call", ""],
    help = format!(
        "the `{}` function takes {} argument(s); there are {} argument(s) provided here",
        name.fg(EXPR),
        expected,
        given
    ),
)]
pub struct TooManyArguments {
    /// The name of the function that was called.
    pub name: String,

    /// The number of arguments that were expected.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A required argument was missing from a function call.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing required argument #{} for the `{}` function", index + 1, name),
    labels = ["this function call", ""],
    help = format!(
        "the `{}` function takes {} required argument(s); there are {} argument(s) provided here",
        name.fg(EXPR),
        expected,
        given
    ),
)]
pub struct MissingArgument {
    /// The name of the function that was called.
    pub name: String,

    /// The index of the missing argument.
    pub index: usize,

    /// The number of required arguments.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// An argument to a function call has the wrong type.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("mismatched types for argument #{} of the `{}` function", index + 1, name),
    labels = [
        "this function call".to_string(),
        String::new(),
        format!("this argument has type `{}`", given),
    ],
    help = format!("expected a value of type `{}`", expected.fg(EXPR)),
)]
pub struct TypeMismatch {
    /// The name of the function that was called.
    pub name: String,

    /// The index of the mismatched argument.
    pub index: usize,

    /// The type that was expected.
    pub expected: &'static str,

    /// The type that was given.
    pub given: &'static str,
}

/// A keyword argument does not match any parameter of the function.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function has no parameter named `{}`", name, keyword),
    labels = ["this keyword argument"],
)]
pub struct UnknownKeyword {
    /// The name of the function that was called.
    pub name: String,

    /// The keyword that was given.
    pub keyword: String,
}

/// A parameter was given both positionally and by keyword.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` parameter of the `{}` function was given more than once", param, name),
    labels = ["this keyword argument"],
)]
pub struct DuplicateArgument {
    /// The name of the function that was called.
    pub name: String,

    /// The parameter that was given twice.
    pub param: String,
}

/// The engine has no way to carry out the requested operation on these arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot compute `{}`: {}", name, reason),
    labels = ["this function call", ""],
)]
pub struct Unsupported {
    /// The name of the function that was called.
    pub name: String,

    /// Why the operation could not be carried out.
    pub reason: String,
}

/// Evaluation was cancelled because the request timed out or was aborted.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "evaluation was cancelled",
    labels = ["evaluation stopped here"],
    help = "the computation took too long; try a simpler input",
)]
pub struct Cancelled;
