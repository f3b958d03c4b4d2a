//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are trees of [`Expr`] nodes that **flatten** sums and products, so
//! that combining like terms only has to look at one level of the tree. Expressions are built with
//! the constructors in [`build`] (or the arithmetic operators on [`Expr`], which call them), and
//! are kept in a canonical form as they are built:
//!
//! ```
//! use gamma_compute::symbolic::Expr;
//!
//! let x = Expr::symbol("x");
//! let expr = x.clone() + x.clone() + Expr::integer(1);
//! assert_eq!(expr.to_string(), "2*x + 1");
//! ```
//!
//! # Operations
//!
//! The engine supports a deliberately small set of operations: [`derivative`], term-wise
//! [`integrate`], Taylor [`series`], univariate polynomial [`solve`] and [`factor`], [`expand`],
//! [`subs`], and a [`simplify`] that picks the least complex of a few equivalent forms.

pub mod algebra;
pub mod build;
pub mod derivative;
pub mod elementary;
pub mod expr;
mod fmt;
pub mod integrate;
pub mod poly;
pub mod series;

pub use algebra::{expand, normalize, simplify, subs};
pub use derivative::{derivative, DerivativeError};
pub use expr::{Constant, Expr, Primary, SymExpr};
pub use integrate::{integrate, IntegralError};
pub use poly::{factor, solve, Poly, SolveError};
pub use series::{series, SeriesError};
