//! The flattened expression tree.
//!
//! [`Expr`] differs from [`gamma_parser::parser::ast::Expr`] in that it **flattens** nested sums
//! and products: `x + (y + z)` is a single [`Expr::Add`] with three terms. Values of this type are
//! normally produced through the builders in [`super::build`], which keep the tree in a canonical
//! form (numbers folded, like terms collected, terms sorted). Constructing the variants directly
//! skips that step, which is occasionally what we want, e.g. to keep a factored product intact.
//!
//! The [`PartialEq`] implementation is **strict equality**: two expressions are equal if they
//! have the same shape, where the terms of a sum and the factors of a product may appear in any
//! order. `x + x` and `2*x` are not strictly equal; normalize both first if that matters.

use crate::primitive::{int, Num};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use super::build;

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Pi,
    E,
    I,
    Infinity,
    ComplexInfinity,
}

impl Constant {
    /// The name the constant is bound to in the namespace.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::I => "I",
            Self::Infinity => "oo",
            Self::ComplexInfinity => "zoo",
        }
    }

    /// The approximate real value of the constant, if it has one.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Pi => Some(std::f64::consts::PI),
            Self::E => Some(std::f64::consts::E),
            Self::I | Self::ComplexInfinity => None,
            Self::Infinity => Some(f64::INFINITY),
        }
    }
}

/// A single term / factor, such as a number, symbol, or function call.
#[derive(Debug, Clone)]
pub enum Primary {
    Number(BigRational),
    Float(f64),
    Symbol(String),
    Constant(Constant),
    Call(String, Vec<Expr>),
}

/// Floats compare by value. This module never produces non-finite floats.
impl PartialEq for Primary {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => lhs == rhs,
            (Self::Float(lhs), Self::Float(rhs)) => lhs == rhs,
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs == rhs,
            (Self::Constant(lhs), Self::Constant(rhs)) => lhs == rhs,
            (Self::Call(lhs_name, lhs_args), Self::Call(rhs_name, rhs_args)) => {
                lhs_name == rhs_name && lhs_args == rhs_args
            },
            _ => false,
        }
    }
}

impl Eq for Primary {}

/// A mathematical expression with information about its terms and factors.
#[derive(Debug, Clone, Eq)]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),
}

pub use Expr as SymExpr;

impl Expr {
    pub fn zero() -> Self {
        Self::number(BigRational::zero())
    }

    pub fn one() -> Self {
        Self::number(BigRational::one())
    }

    pub fn integer(n: i64) -> Self {
        Self::number(int(n))
    }

    pub fn number(n: BigRational) -> Self {
        Self::Primary(Primary::Number(n))
    }

    pub fn float(f: f64) -> Self {
        Self::Primary(Primary::Float(f))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    pub fn constant(constant: Constant) -> Self {
        Self::Primary(Primary::Constant(constant))
    }

    /// Creates an unevaluated function call. Use [`super::elementary::apply`] to evaluate known
    /// functions at special values.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Converts a numeric coefficient into an expression.
    pub fn from_num(num: Num) -> Self {
        match num {
            Num::Exact(n) => Self::number(n),
            Num::Approx(f) => Self::float(f),
        }
    }

    /// Returns the numeric value of a number or float.
    pub fn as_num(&self) -> Option<Num> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(Num::Exact(n.clone())),
            Self::Primary(Primary::Float(f)) => Some(Num::Approx(*f)),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns the value if this is an exact integer.
    pub fn as_integer(&self) -> Option<BigInt> {
        self.as_number()
            .filter(|n| n.is_integer())
            .map(|n| n.to_integer())
    }

    /// Returns the value if this is an exact integer that fits in an `i64`.
    pub fn as_small_integer(&self) -> Option<i64> {
        self.as_integer().and_then(|n| n.to_i64())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<(&str, &[Expr])> {
        match self {
            Self::Primary(Primary::Call(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_num().is_some_and(|n| n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        self.as_num().is_some_and(|n| n.is_one())
    }

    /// Returns true if this is a number or float.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Primary(Primary::Number(_) | Primary::Float(_)))
    }

    pub fn is_integer(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_integer())
    }

    /// Returns true if the expression is a leaf of the tree: a number, symbol, or constant.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Self::Primary(Primary::Number(_) | Primary::Float(_) | Primary::Symbol(_) | Primary::Constant(_))
        )
    }

    pub fn is_constant(&self, constant: Constant) -> bool {
        matches!(self, Self::Primary(Primary::Constant(c)) if *c == constant)
    }

    /// Returns the sorted set of symbol names appearing in the expression.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<String>) {
        match self {
            Self::Primary(Primary::Symbol(name)) => {
                symbols.insert(name.clone());
            },
            Self::Primary(Primary::Call(_, args)) | Self::Add(args) | Self::Mul(args) => {
                args.iter().for_each(|arg| arg.collect_symbols(symbols));
            },
            Self::Exp(base, exp) => {
                base.collect_symbols(symbols);
                exp.collect_symbols(symbols);
            },
            Self::Primary(_) => {},
        }
    }

    /// Returns true if the given symbol appears anywhere in the expression.
    pub fn has_symbol(&self, symbol: &str) -> bool {
        match self {
            Self::Primary(Primary::Symbol(name)) => name == symbol,
            Self::Primary(Primary::Call(_, args)) | Self::Add(args) | Self::Mul(args) => {
                args.iter().any(|arg| arg.has_symbol(symbol))
            },
            Self::Exp(base, exp) => base.has_symbol(symbol) || exp.has_symbol(symbol),
            Self::Primary(_) => false,
        }
    }

    /// Returns true if a call to the given function appears anywhere in the expression.
    pub fn has_call(&self, function: &str) -> bool {
        match self {
            Self::Primary(Primary::Call(name, args)) => {
                name == function || args.iter().any(|arg| arg.has_call(function))
            },
            Self::Add(args) | Self::Mul(args) => args.iter().any(|arg| arg.has_call(function)),
            Self::Exp(base, exp) => base.has_call(function) || exp.has_call(function),
            Self::Primary(_) => false,
        }
    }

    /// A hash consistent with strict equality for sums and products without repeated entries,
    /// which is every sum and product the builders produce. The order of terms and factors does
    /// not affect it.
    pub(crate) fn fingerprint(&self) -> u64 {
        let unordered = |exprs: &[Self]| exprs.iter().map(Self::fingerprint).fold(0u64, u64::wrapping_add);
        let mut hasher = DefaultHasher::new();
        match self {
            Self::Primary(Primary::Number(n)) => (0u8, n).hash(&mut hasher),
            // 0.0 and -0.0 are equal
            Self::Primary(Primary::Float(f)) => (1u8, if *f == 0.0 { 0 } else { f.to_bits() }).hash(&mut hasher),
            Self::Primary(Primary::Symbol(name)) => (2u8, name).hash(&mut hasher),
            Self::Primary(Primary::Constant(constant)) => (3u8, constant).hash(&mut hasher),
            Self::Primary(Primary::Call(name, args)) => {
                (4u8, name).hash(&mut hasher);
                args.iter().for_each(|arg| arg.fingerprint().hash(&mut hasher));
            },
            Self::Add(terms) => (5u8, unordered(terms)).hash(&mut hasher),
            Self::Mul(factors) => (6u8, unordered(factors)).hash(&mut hasher),
            Self::Exp(base, exp) => (7u8, base.fingerprint(), exp.fingerprint()).hash(&mut hasher),
        }
        hasher.finish()
    }

    /// The number of nodes in the expression tree.
    pub fn complexity(&self) -> usize {
        match self {
            Self::Primary(Primary::Call(_, args)) => {
                1 + args.iter().map(Self::complexity).sum::<usize>()
            },
            Self::Primary(Primary::Number(n)) if !n.is_integer() => 3,
            Self::Primary(_) => 1,
            Self::Add(terms) | Self::Mul(terms) => {
                terms.len() - 1 + terms.iter().map(Self::complexity).sum::<usize>()
            },
            Self::Exp(base, exp) => 1 + base.complexity() + exp.complexity(),
        }
    }

    /// If the expression is a negative number, or a product with a negative leading coefficient,
    /// returns the expression with the sign flipped. No other simplification is done.
    pub fn negated_if_negative(&self) -> Option<Self> {
        match self {
            Self::Primary(Primary::Number(n)) if n.is_negative() => Some(Self::number(-n)),
            Self::Primary(Primary::Float(f)) if *f < 0.0 => Some(Self::float(-f)),
            Self::Mul(factors) => {
                let coefficient = factors.first()?.as_num().filter(Num::is_negative)?;
                let flipped = -coefficient;
                let mut rest = factors[1..].to_vec();
                if !flipped.is_one() {
                    rest.insert(0, Self::from_num(flipped));
                }
                Some(Self::Mul(rest).downgrade())
            },
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Sums and products with zero or one entry collapse into the entry, or the integer `0` / `1`.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => match terms.len() {
                0 => Self::zero(),
                1 => terms.remove(0),
                _ => Self::Add(terms),
            },
            Self::Mul(mut factors) => match factors.len() {
                0 => Self::one(),
                1 => factors.remove(0),
                _ => Self::Mul(factors),
            },
            _ => self,
        }
    }

    /// Returns the terms of a sum, or the expression itself as a single term.
    pub fn terms(&self) -> Vec<Self> {
        match self {
            Self::Add(terms) => terms.clone(),
            other => vec![other.clone()],
        }
    }

    /// Raises the expression to the given power.
    pub fn pow(self, exp: Self) -> Self {
        build::pow(self, exp)
    }

    /// Returns the square root of this expression.
    pub fn sqrt(self) -> Self {
        build::pow(self, Self::number(BigRational::new(1.into(), 2.into())))
    }
}

/// Checks if two expressions are **strictly** equal. Terms and factors may appear in any order.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().all(|lhs| rhs.contains(lhs))
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        build::add(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        build::add(vec![self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        build::mul(vec![self, rhs])
    }
}

impl Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        build::mul(vec![self, build::pow(rhs, Self::integer(-1))])
    }
}

impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self {
        build::mul(vec![Self::integer(-1), self])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn strict_equality_ignores_order() {
        let lhs = Expr::Add(vec![x(), Expr::symbol("y")]);
        let rhs = Expr::Add(vec![Expr::symbol("y"), x()]);
        assert_eq!(lhs, rhs);
        assert_ne!(Expr::Add(vec![x(), x()]), Expr::Mul(vec![Expr::integer(2), x()]));
    }

    #[test]
    fn free_symbols_sorted() {
        let expr = Expr::Add(vec![
            Expr::symbol("y"),
            Expr::call("sin", vec![x()]),
            Expr::constant(Constant::Pi),
        ]);
        let symbols = expr.free_symbols().into_iter().collect::<Vec<_>>();
        assert_eq!(symbols, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn atoms() {
        assert!(x().is_atom());
        assert!(Expr::integer(3).is_atom());
        assert!(!Expr::call("sin", vec![x()]).is_atom());
        assert!(!(x() + Expr::one()).is_atom());
    }

    #[test]
    fn negation_of_leading_coefficient() {
        let term = Expr::Mul(vec![Expr::integer(-3), x()]);
        assert_eq!(term.negated_if_negative(), Some(Expr::Mul(vec![Expr::integer(3), x()])));
        let unit = Expr::Mul(vec![Expr::integer(-1), x()]);
        assert_eq!(unit.negated_if_negative(), Some(x()));
        assert_eq!(x().negated_if_negative(), None);
    }

    #[test]
    fn complexity_counts_nodes() {
        assert_eq!(x().complexity(), 1);
        assert_eq!(Expr::Add(vec![x(), Expr::one()]).complexity(), 3);
        assert_eq!(Expr::Exp(Box::new(x()), Box::new(Expr::integer(2))).complexity(), 3);
    }
}
