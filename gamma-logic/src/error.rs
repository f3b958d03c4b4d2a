//! The ways a request can fail.

use serde::Serialize;
use thiserror::Error;

/// An error produced while processing a request.
#[derive(Debug, Error)]
pub enum GammaError {
    /// The input text could not be parsed.
    #[error("{0}")]
    Parse(gamma_error::Error),

    /// The parsed input could not be evaluated, or evaluation was cancelled.
    #[error("{message}")]
    Evaluation {
        message: String,

        /// The spanned error reported by the evaluator, if there is one.
        #[source]
        source: Option<gamma_error::Error>,
    },

    /// A single card could not be computed or rendered.
    #[error("card `{card}` failed: {message}")]
    Card { card: String, message: String },

    /// No card with the given name is registered.
    #[error("no card named `{card}` is registered")]
    Lookup { card: String },

    /// An unexpected failure, such as a panic inside the engine.
    #[error("{message}")]
    Unhandled { message: String, trace: String },
}

impl GammaError {
    /// Creates an [`GammaError::Evaluation`] error without an underlying spanned error.
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation { message: message.into(), source: None }
    }

    /// Creates an [`GammaError::Evaluation`] error from an evaluator error.
    pub fn from_eval(err: gamma_error::Error) -> Self {
        Self::Evaluation { message: err.message(), source: Some(err) }
    }

    /// Creates a [`GammaError::Card`] error for the named card.
    pub fn card(card: &str, message: impl Into<String>) -> Self {
        Self::Card { card: card.to_string(), message: message.into() }
    }

    /// Returns the spanned error behind this error, if any, for rendering against the source.
    pub fn spanned(&self) -> Option<&gamma_error::Error> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Evaluation { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

/// Where parsing failed, in the shape used by error sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseErrorInfo {
    /// The error message.
    pub msg: String,

    /// The character offset at which parsing failed.
    pub offset: usize,

    /// The input before the offset.
    pub input_start: String,

    /// The input from the offset onward.
    pub input_end: String,
}

impl ParseErrorInfo {
    /// Describes the parse error against the text that was parsed.
    pub fn new(err: &gamma_error::Error, text: &str) -> Self {
        let mut offset = err.offset().min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        Self {
            msg: err.message(),
            offset,
            input_start: text[..offset].to_string(),
            input_end: text[offset..].to_string(),
        }
    }
}
