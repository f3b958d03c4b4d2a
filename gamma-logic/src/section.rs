//! The sections a response is made of, in the shape they are serialized.

use gamma_compute::Value;
use serde::Serialize;
use crate::error::ParseErrorInfo;
use crate::learn_more::Link;

/// How the primary display of the input is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// On its own line, for calls.
    Block,

    /// Within the text, for values.
    Inline,
}

/// The variables of the input, attached to the primary display when a card handles several
/// variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableInfo {
    pub num_variables: usize,
    pub variables: Vec<String>,
    pub variable: String,
}

/// A card section: the presentation of one card, and its result if it was computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardRecord {
    /// The name of the card.
    pub card: String,

    /// The primary variable the card operates on.
    pub var: String,
    pub title: String,
    pub input: String,
    pub pre_output: String,

    /// The names of the card's parameters.
    pub parameters: Vec<String>,

    /// The card's bindings, as a JSON array.
    pub arguments: String,

    /// The computed result, in the form it would be typed back in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// The rendered result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// What went wrong, in an error section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDetail {
    /// A plain message.
    Error(String),

    /// Where parsing failed.
    ExceptionInfo(ParseErrorInfo),
}

/// One section of a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Section {
    /// Echoes the input.
    Input { title: String, input: String },

    /// Suggests that the input may mean something else.
    Ambiguity { ambiguity: String, description: String },

    /// The input as it was understood.
    Primary {
        title: String,
        input: String,
        output: String,
        display: Layout,
        #[serde(flatten)]
        variables: Option<VariableInfo>,
    },

    /// A titled result, such as the result of the call or its simplification.
    Basic { title: String, input: String, output: String },

    Card(CardRecord),

    LearnMore { title: String, input: String, output: Vec<Link> },

    Error {
        title: String,
        input: String,
        #[serde(flatten)]
        detail: ErrorDetail,
    },
}

impl Section {
    pub fn input(input: impl Into<String>) -> Self {
        Self::Input { title: "Input".to_string(), input: input.into() }
    }

    pub fn basic(title: &str, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Basic { title: title.to_string(), input: input.into(), output: output.into() }
    }

    pub fn error(input: impl Into<String>, detail: ErrorDetail) -> Self {
        Self::Error { title: "Error".to_string(), input: input.into(), detail }
    }

    pub fn learn_more(links: &[Link]) -> Self {
        Self::LearnMore { title: "Learn More".to_string(), input: String::new(), output: links.to_vec() }
    }

    /// The title of the section, if it has one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Input { title, .. }
            | Self::Primary { title, .. }
            | Self::Basic { title, .. }
            | Self::LearnMore { title, .. }
            | Self::Error { title, .. } => Some(title),
            Self::Card(record) => Some(&record.title),
            Self::Ambiguity { .. } => None,
        }
    }

    /// The name of the card, if this is a card section.
    pub fn card(&self) -> Option<&str> {
        match self {
            Self::Card(record) => Some(&record.card),
            _ => None,
        }
    }
}

/// Presentation of a card without its result, returned by [`Gamma::card_info`](crate::Gamma::card_info).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    pub var: String,
    pub title: String,
    pub input: String,
    pub pre_output: String,
}

/// The result of a card, returned by [`Gamma::eval_card`](crate::Gamma::eval_card).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardResult {
    /// The result, in the form it would be typed back in.
    pub value: String,

    /// The rendered result.
    pub output: String,
}

impl CardResult {
    pub fn new(value: &Value, output: String) -> Self {
        Self { value: value.to_string(), output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn error_sections() {
        let section = Section::error("2 +", ErrorDetail::Error("Invalid input".to_string()));
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({"title": "Error", "input": "2 +", "error": "Invalid input"}),
        );

        let info = ParseErrorInfo {
            msg: "unexpected end of file".to_string(),
            offset: 3,
            input_start: "2 +".to_string(),
            input_end: String::new(),
        };
        let section = Section::error("2 +", ErrorDetail::ExceptionInfo(info));
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({
                "title": "Error",
                "input": "2 +",
                "exception_info": {
                    "msg": "unexpected end of file",
                    "offset": 3,
                    "input_start": "2 +",
                    "input_end": "",
                },
            }),
        );
    }

    #[test]
    fn primary_with_variables() {
        let section = Section::Primary {
            title: "Interpretation".to_string(),
            input: "x*y".to_string(),
            output: "x y".to_string(),
            display: Layout::Inline,
            variables: Some(VariableInfo {
                num_variables: 2,
                variables: vec!["x".to_string(), "y".to_string()],
                variable: "x".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({
                "title": "Interpretation",
                "input": "x*y",
                "output": "x y",
                "display": "inline",
                "num_variables": 2,
                "variables": ["x", "y"],
                "variable": "x",
            }),
        );
    }

    #[test]
    fn lazy_card_omits_result() {
        let record = CardRecord {
            card: "diff".to_string(),
            var: "x".to_string(),
            title: "Derivative".to_string(),
            input: "diff(x^2, x)".to_string(),
            pre_output: "\\frac{d}{d x} \\left(x^{2}\\right)".to_string(),
            parameters: vec![],
            arguments: "[\"input_evaluated\"]".to_string(),
            value: None,
            output: None,
        };
        let json = serde_json::to_value(Section::Card(record)).unwrap();
        assert_eq!(json.get("value"), None);
        assert_eq!(json["card"], "diff");
    }
}
