//! Suggestions for input that likely means something other than what was typed.

use gamma_parser::tokenizer::{tokenize_complete, TokenKind};
use gamma_parser::transform::canonical_name;
use levenshtein::levenshtein;
use serde::Serialize;
use crate::shape::CallShape;

/// An alternative reading of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// The input as it was likely meant.
    pub text: String,

    /// Why the alternative is suggested. May be empty.
    pub explanation: String,
}

/// Applies the near-miss rules to the call shape of the input.
///
/// `factor` factors polynomials, so calling it on an integer most likely meant `factorint`.
pub fn disambiguate(shape: &CallShape) -> Option<Suggestion> {
    match (shape.function.as_str(), shape.args.as_slice()) {
        ("factor", [arg]) if arg.value.is_integer() => Some(Suggestion {
            text: format!("factorint({})", arg.value),
            explanation: "factor factors polynomials, while factorint factors integers.".to_string(),
        }),
        _ => None,
    }
}

/// Corrects names in the input that are a small edit away from a known name.
///
/// Only names longer than one character that are neither known nor a synonym are corrected, and
/// only by a name that differs in fewer than half of its characters. Returns the corrected input,
/// or [`None`] if nothing was corrected.
pub fn close_matches<'a>(
    text: &str,
    known: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Option<String> {
    let known = known.into_iter().collect::<Vec<_>>();
    let mut corrected = false;
    let mut output = String::with_capacity(text.len());

    for token in tokenize_complete(text) {
        let name = token.lexeme;
        if token.kind != TokenKind::Name
            || name.chars().count() < 2
            || known.contains(&name)
            || canonical_name(name).is_some()
        {
            output.push_str(name);
            continue;
        }

        let best = known
            .iter()
            .map(|candidate| (levenshtein(name, candidate), *candidate))
            .filter(|(distance, _)| *distance <= max_distance && distance * 2 < name.chars().count())
            .min();
        match best {
            Some((_, candidate)) => {
                corrected = true;
                output.push_str(candidate);
            },
            None => output.push_str(name),
        }
    }

    corrected.then_some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::shape::Argument;
    use gamma_compute::symbolic::Expr;
    use gamma_compute::Value;
    use pretty_assertions::assert_eq;

    const KNOWN: &[&str] = &["diff", "integrate", "factor", "factorint", "sin", "series"];

    fn call(function: &str, value: Value) -> CallShape {
        CallShape {
            function: function.to_string(),
            args: vec![Argument { text: value.to_string(), value }],
            kwargs: vec![],
        }
    }

    #[test]
    fn factor_on_integer() {
        let suggestion = disambiguate(&call("factor", Expr::integer(12).into())).unwrap();
        assert_eq!(suggestion.text, "factorint(12)");
        assert_eq!(suggestion.explanation, "factor factors polynomials, while factorint factors integers.");
    }

    #[test]
    fn factor_on_polynomial() {
        let poly = Expr::symbol("x").pow(Expr::integer(2)) - Expr::one();
        assert_eq!(disambiguate(&call("factor", poly.into())), None);
        assert_eq!(disambiguate(&call("factorint", Expr::integer(12).into())), None);
    }

    #[test]
    fn corrects_misspelled_names() {
        let corrected = close_matches("intgrate(x^2, x)", KNOWN.iter().copied(), 2);
        assert_eq!(corrected.as_deref(), Some("integrate(x^2, x)"));
    }

    #[test]
    fn leaves_known_and_short_names() {
        assert_eq!(close_matches("diff(sin(x), x)", KNOWN.iter().copied(), 2), None);
        assert_eq!(close_matches("x*y + z", KNOWN.iter().copied(), 2), None);
        assert_eq!(close_matches("derivative(x)", KNOWN.iter().copied(), 2), None);
    }
}
