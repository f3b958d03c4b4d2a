use crate::tokenizer::{Token, TokenKind};

/// Alternative spellings of operation names, paired with the canonical name they stand for.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("derivative", "diff"),
    ("derive", "diff"),
    ("differentiate", "diff"),
    ("integral", "integrate"),
    ("antiderivative", "integrate"),
    ("factorize", "factor"),
    ("graph", "plot"),
    ("draw", "plot"),
];

/// Returns the canonical name for the given synonym, if it is one.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == name)
        .map(|(_, canonical)| *canonical)
}

/// Replaces every name token that is a known synonym with its canonical name. The span of the
/// token is kept, so errors still point at what the user typed.
pub fn replace_synonyms(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|mut token| {
            if token.kind == TokenKind::Name {
                if let Some(canonical) = canonical_name(token.lexeme) {
                    token.lexeme = canonical;
                }
            }
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::tokenizer::tokenize_complete;

    #[test]
    fn replaces_only_exact_names() {
        let tokens = replace_synonyms(tokenize_complete("derivative(x) + derivatives"));
        let names = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Name)
            .map(|token| (token.lexeme, token.span.clone()))
            .collect::<Vec<_>>();

        assert_eq!(names, vec![
            ("diff", 0..10),
            ("x", 11..12),
            ("derivatives", 16..27),
        ]);
    }

    #[test]
    fn canonical_lookup() {
        assert_eq!(canonical_name("integral"), Some("integrate"));
        assert_eq!(canonical_name("integrate"), None);
    }
}
