//! Token rewrites applied between tokenizing and parsing.
//!
//! The passes always run in the same order:
//!
//! 1. [`synonyms::replace_synonyms`]: alternative operation names become canonical names.
//! 2. Whitespace is dropped; only the token boundaries it created remain.
//! 3. [`convert_caret`]: `^` is read as exponentiation, like `**`.
//! 4. [`implicit::insert_implicit_mul`]: juxtaposed operands get an explicit multiplication.
//!
//! Pass 4 depends on what names are bound in the environment (`sin(x)` is a call, `x(y)` is a
//! product), which is described by the [`Bindings`] trait.

pub mod implicit;
pub mod synonyms;

use crate::tokenizer::{tokenize_complete, Token, TokenKind};

pub use synonyms::{canonical_name, SYNONYMS};

/// Describes which names in the evaluation environment refer to callable objects.
pub trait Bindings {
    /// Returns true if `name` is bound to something that can be called.
    fn is_callable(&self, name: &str) -> bool;
}

/// An environment where nothing is callable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBindings;

impl Bindings for NoBindings {
    fn is_callable(&self, _: &str) -> bool {
        false
    }
}

impl<F: Fn(&str) -> bool> Bindings for F {
    fn is_callable(&self, name: &str) -> bool {
        self(name)
    }
}

/// Removes whitespace tokens.
fn strip_whitespace(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|token| !token.is_whitespace()).collect()
}

/// Treats the caret `^` as exponentiation.
pub fn convert_caret(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|mut token| {
            if token.kind == TokenKind::Caret {
                token.kind = TokenKind::Pow;
            }
            token
        })
        .collect()
}

/// Applies every transform pass, in order, to already tokenized input.
pub fn apply<'source>(tokens: Vec<Token<'source>>, bindings: &dyn Bindings) -> Vec<Token<'source>> {
    let tokens = synonyms::replace_synonyms(tokens);
    let tokens = strip_whitespace(tokens);
    let tokens = convert_caret(tokens);
    implicit::insert_implicit_mul(tokens, bindings)
}

/// Tokenizes the given source and applies every transform pass.
pub fn transform<'source>(source: &'source str, bindings: &dyn Bindings) -> Vec<Token<'source>> {
    apply(tokenize_complete(source), bindings)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Renders the transformed tokens back to text, writing inserted multiplications as `*`.
    fn render(source: &str, bindings: &dyn Bindings) -> String {
        transform(source, bindings)
            .iter()
            .map(|token| if token.is_synthetic() { "*" } else { token.lexeme })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn callable(name: &str) -> bool {
        matches!(name, "sin" | "diff")
    }

    #[test]
    fn number_then_name() {
        assert_eq!(render("2x", &NoBindings), "2 * x");
    }

    #[test]
    fn adjacent_groups() {
        assert_eq!(render("(x+1)(x-1)", &NoBindings), "( x + 1 ) * ( x - 1 )");
    }

    #[test]
    fn juxtaposed_names() {
        assert_eq!(render("x y", &NoBindings), "x * y");
    }

    #[test]
    fn callable_name_is_a_call() {
        assert_eq!(render("sin(x)", &callable), "sin ( x )");
        assert_eq!(render("y(x)", &callable), "y * ( x )");
    }

    #[test]
    fn caret_becomes_power() {
        let tokens = transform("x^2", &NoBindings);
        assert_eq!(tokens[1].kind, TokenKind::Pow);
        assert_eq!(tokens[1].lexeme, "^");
    }

    #[test]
    fn synonyms_run_before_implicit_multiplication() {
        let bindings = |name: &str| name == "diff";
        assert_eq!(render("derivative(x^2)", &bindings), "diff ( x ^ 2 )");
    }

    #[test]
    fn inserted_tokens_keep_offsets() {
        let tokens = transform("3 x", &NoBindings);
        let spans = tokens.iter().map(|token| token.span.clone()).collect::<Vec<_>>();
        assert_eq!(spans, vec![0..1, 1..1, 2..3]);
    }
}
