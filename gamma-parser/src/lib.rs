//! Turns free-form mathematical text into an abstract syntax tree.
//!
//! Input goes through three stages:
//!
//! 1. [`tokenizer`]: the raw text is split into tokens with [`logos`].
//! 2. [`transform`]: a fixed sequence of token rewrites makes informal notation parseable
//!    (synonyms, `^` as power, implicit multiplication).
//! 3. [`parser`]: the rewritten tokens are parsed into an [`Expr`](parser::ast::Expr).
//!
//! Most users only need [`parse`], which runs all three stages.

pub mod parser;
pub mod tokenizer;
pub mod transform;

pub use parser::parse;
