//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

extern crate self as gamma_error;

use ariadne::{Color, Report};
use std::{fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// The one-line message describing the error, without any source context.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// The message of the underlying error kind.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// The character offset at which the error was detected: the start of the first span.
    pub fn offset(&self) -> usize {
        self.spans.first().map(|span| span.start).unwrap_or(0)
    }

    /// The smallest range covering every span of the error.
    pub fn extent(&self) -> Range<usize> {
        let start = self.offset();
        let end = self.spans.iter().map(|span| span.end).max().unwrap_or(start);
        start..end.max(start)
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne::Source;
    use gamma_attrs::ErrorKind;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("cannot divide `{}` by zero", numerator),
        labels = ["this division", "is by zero"],
        help = "try a non-zero denominator",
    )]
    struct DivideByZero {
        numerator: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "unexpected end of input", labels = ["here"])]
    struct UnexpectedEnd;

    #[test]
    fn message_uses_fields() {
        let err = Error::new(vec![0..5, 4..5], DivideByZero { numerator: "x".to_string() });
        assert_eq!(err.message(), "cannot divide `x` by zero");
        assert_eq!(err.to_string(), "cannot divide `x` by zero");
        assert_eq!(err.offset(), 0);
        assert_eq!(err.extent(), 0..5);
    }

    #[test]
    fn offset_without_spans() {
        let err = Error::new(vec![], UnexpectedEnd);
        assert_eq!(err.offset(), 0);
        assert_eq!(err.extent(), 0..0);
    }

    #[test]
    fn report_contains_message_and_labels() {
        let src = "x / 0";
        let err = Error::new(vec![0..5, 4..5], DivideByZero { numerator: "x".to_string() });

        let mut buf = Vec::new();
        err.build_report("input")
            .write(("input", Source::from(src)), &mut buf)
            .unwrap();
        let rendered = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();

        assert!(rendered.contains("cannot divide `x` by zero"));
        assert!(rendered.contains("is by zero"));
        assert!(rendered.contains("try a non-zero denominator"));
    }
}
