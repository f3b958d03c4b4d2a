use gamma_error::{Error, ErrorKind};
use gamma_parser::parser::ast::call::Call;
use std::ops::Range;
use crate::error::{
    Cancelled,
    DuplicateArgument,
    MissingArgument,
    TooManyArguments,
    TypeMismatch,
    UndefinedFunction,
    UnknownKeyword,
    Unsupported,
};

/// Represents an error that can occur while evaluating a builtin function.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinError {
    /// No function with the given name exists.
    UndefinedFunction(UndefinedFunction),

    /// The function was called with too many arguments.
    TooManyArguments(TooManyArguments),

    /// An argument to the function call is missing.
    MissingArgument(MissingArgument),

    /// The function was called with a mismatched argument type.
    TypeMismatch(TypeMismatch),

    /// A keyword argument names no parameter.
    UnknownKeyword(UnknownKeyword),

    /// A parameter was given more than once.
    DuplicateArgument(DuplicateArgument),

    /// The engine cannot carry out the operation.
    Unsupported(Unsupported),

    /// Evaluation was cancelled.
    Cancelled(Cancelled),
}

impl BuiltinError {
    /// Creates an [`BuiltinError::Unsupported`] error for the named function.
    pub fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        Self::Unsupported(Unsupported {
            name: name.to_string(),
            reason: reason.into(),
        })
    }

    /// Returns true if this error is the result of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// The error message, without any source annotations.
    pub fn message(&self) -> String {
        self.kind_ref().message()
    }

    fn kind_ref(&self) -> &dyn ErrorKind {
        match self {
            Self::UndefinedFunction(e) => e,
            Self::TooManyArguments(e) => e,
            Self::MissingArgument(e) => e,
            Self::TypeMismatch(e) => e,
            Self::UnknownKeyword(e) => e,
            Self::DuplicateArgument(e) => e,
            Self::Unsupported(e) => e,
            Self::Cancelled(e) => e,
        }
    }

    fn into_kind(self) -> Box<dyn ErrorKind> {
        match self {
            Self::UndefinedFunction(e) => Box::new(e),
            Self::TooManyArguments(e) => Box::new(e),
            Self::MissingArgument(e) => Box::new(e),
            Self::TypeMismatch(e) => Box::new(e),
            Self::UnknownKeyword(e) => Box::new(e),
            Self::DuplicateArgument(e) => Box::new(e),
            Self::Unsupported(e) => Box::new(e),
            Self::Cancelled(e) => Box::new(e),
        }
    }

    /// Returns the source spans the error should point at within the given call.
    fn spans(&self, call: &Call) -> Vec<Range<usize>> {
        let keyword_span = |keyword: &str| {
            call.kwargs
                .iter()
                .find(|kwarg| kwarg.name.name == keyword)
                .map(|kwarg| vec![kwarg.span()])
                .unwrap_or_else(|| call.outer_span().to_vec())
        };

        match self {
            Self::UndefinedFunction(_) => vec![call.name.span.clone()],
            Self::TypeMismatch(e) => {
                let mut spans = call.outer_span().to_vec();
                if let Some(arg) = call.args.get(e.index) {
                    spans.push(arg.span());
                }
                spans
            },
            Self::UnknownKeyword(e) => keyword_span(&e.keyword),
            Self::DuplicateArgument(e) => keyword_span(&e.param),
            Self::TooManyArguments(_)
            | Self::MissingArgument(_)
            | Self::Unsupported(_)
            | Self::Cancelled(_) => call.outer_span().to_vec(),
        }
    }

    /// Convert the [`BuiltinError`] into an [`Error`], using the given function call to provide
    /// spans.
    pub fn into_error(self, call: &Call) -> Error {
        Error {
            spans: self.spans(call),
            kind: self.into_kind(),
        }
    }

    /// Convert the [`BuiltinError`] into an [`Error`] that is not attached to any source text.
    pub fn into_detached_error(self) -> Error {
        Error {
            spans: Vec::new(),
            kind: self.into_kind(),
        }
    }
}

impl std::fmt::Display for BuiltinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BuiltinError {}
