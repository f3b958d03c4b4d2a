pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns all of the tokens produced by the tokenizer, including whitespace.
///
/// Concatenating the lexemes of the returned tokens reproduces the input exactly.
pub fn tokenize_complete(input: &str) -> Vec<Token> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens
}
