use crate::tokenizer::{Token, TokenKind};
use super::Bindings;

/// Returns true if a multiplication sign should be inserted between the two adjacent tokens.
fn needs_multiplication(left: &Token, right: &Token, bindings: &dyn Bindings) -> bool {
    use TokenKind::*;

    match (left.kind, right.kind) {
        // `2x`, `2(x + 1)`, `2 3`, `x!y`
        (Int | Float | Factorial, Name | OpenParen | Int | Float) => true,

        // `(x + 1)(x - 1)`, `(x + 1)x`, `(x + 1)2`
        (CloseParen, Name | OpenParen | Int | Float) => true,

        // `x y`, `x 2`
        (Name, Name | Int | Float) => true,

        // `x(x + 1)`, unless `x` names something that can be called, like `sin(x)`
        (Name, OpenParen) => !bindings.is_callable(left.lexeme),

        _ => false,
    }
}

/// Inserts a multiplication token wherever two operands are juxtaposed.
///
/// The inserted tokens are empty: they have an empty lexeme and an empty span positioned at the
/// end of the left token, so they never shift the offsets of the real tokens.
pub fn insert_implicit_mul<'source>(
    tokens: Vec<Token<'source>>,
    bindings: &dyn Bindings,
) -> Vec<Token<'source>> {
    let mut result: Vec<Token<'source>> = Vec::with_capacity(tokens.len());

    for token in tokens {
        if let Some(prev) = result.last() {
            if needs_multiplication(prev, &token, bindings) {
                let at = prev.span.end;
                result.push(Token {
                    span: at..at,
                    kind: TokenKind::Mul,
                    lexeme: "",
                });
            }
        }
        result.push(token);
    }

    result
}
