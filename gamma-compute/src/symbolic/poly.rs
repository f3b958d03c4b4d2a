//! Univariate polynomials with rational coefficients, plus the root finding and factoring built
//! on them.

use crate::cancel::CancelToken;
use crate::error::Cancelled;
use crate::primitive::Num;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use super::algebra::expand;
use super::build::{add, mul, pow};
use super::expr::{Expr, Primary};

/// Degrees beyond this are not treated as polynomials.
const MAX_DEGREE: usize = 256;

/// Integers beyond this magnitude are not searched for divisors.
const MAX_DIVISOR_SEARCH: u64 = 1_000_000_000_000;

/// A polynomial `c_0 + c_1 x + ... + c_n x^n` in a single variable. The coefficient list never has
/// trailing zeros, so the zero polynomial has no coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    coeffs: Vec<BigRational>,
}

impl Poly {
    pub fn new(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Interprets the expression as a polynomial in `var` with exact rational coefficients.
    ///
    /// Expressions mentioning any other symbol are rejected before expanding them, which keeps
    /// the expansion to a single variable.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        if expr.free_symbols().iter().any(|symbol| symbol != var) {
            return None;
        }
        let mut coeffs = Vec::new();
        for term in expand(expr, &CancelToken::new()).ok()?.terms() {
            let (degree, coeff) = monomial(&term, var)?;
            if degree > MAX_DEGREE {
                return None;
            }
            if coeffs.len() <= degree {
                coeffs.resize(degree + 1, BigRational::zero());
            }
            coeffs[degree] += coeff;
        }
        Some(Self::new(coeffs))
    }

    pub fn coeffs(&self) -> &[BigRational] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The degree of the polynomial. The zero polynomial is given degree zero.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn eval(&self, x: &BigRational) -> BigRational {
        self.coeffs
            .iter()
            .rev()
            .fold(BigRational::zero(), |acc, coeff| acc * x + coeff)
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: &BigRational) -> Self {
        Self::new(self.coeffs.iter().map(|coeff| coeff * factor).collect())
    }

    /// Divides by `x - root` with synthetic division, discarding the remainder.
    pub fn deflate(&self, root: &BigRational) -> Self {
        let mut quotient = vec![BigRational::zero(); self.degree()];
        let mut carry = BigRational::zero();
        for (i, coeff) in self.coeffs.iter().enumerate().rev().take(self.degree()) {
            carry = carry * root + coeff;
            quotient[i - 1] = carry.clone();
        }
        Self::new(quotient)
    }

    /// Removes the factor `x^k` for the largest possible `k`, returning `k`.
    fn strip_zero_roots(&mut self) -> usize {
        let k = self.coeffs.iter().take_while(|coeff| coeff.is_zero()).count();
        self.coeffs.drain(..k);
        k
    }

    /// Splits the polynomial into `content * primitive`, where the primitive part has coprime
    /// integer coefficients and a positive leading coefficient.
    pub fn primitive(&self) -> (BigRational, Self) {
        if self.is_zero() {
            return (BigRational::one(), self.clone());
        }
        let denom_lcm = self
            .coeffs
            .iter()
            .fold(BigInt::one(), |acc, coeff| acc.lcm(coeff.denom()));
        let numer_gcd = self
            .coeffs
            .iter()
            .map(|coeff| (coeff * BigRational::from_integer(denom_lcm.clone())).to_integer())
            .fold(BigInt::zero(), |acc, numer| acc.gcd(&numer));

        let mut content = BigRational::new(numer_gcd, denom_lcm);
        if self.coeffs.last().is_some_and(Signed::is_negative) {
            content = -content;
        }
        (content.clone(), self.scale(&content.recip()))
    }

    /// Returns the distinct rational roots, in ascending order.
    pub fn rational_roots(&self, cancel: &CancelToken) -> Result<Vec<BigRational>, Cancelled> {
        let (_, mut primitive) = self.primitive();
        let mut roots = Vec::new();
        if primitive.strip_zero_roots() > 0 {
            roots.push(BigRational::zero());
        }
        if primitive.degree() == 0 {
            return Ok(roots);
        }

        let constant = primitive.coeffs[0].to_integer();
        let leading = primitive.coeffs[primitive.degree()].to_integer();
        let (Some(numers), Some(denoms)) = (divisors(&constant), divisors(&leading)) else {
            return Ok(roots);
        };

        for p in &numers {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }
            for q in &denoms {
                for candidate in [BigRational::new(p.clone(), q.clone()), -BigRational::new(p.clone(), q.clone())] {
                    if !roots.contains(&candidate) && primitive.eval(&candidate).is_zero() {
                        roots.push(candidate);
                    }
                }
            }
        }
        roots.sort();
        Ok(roots)
    }

    /// Converts the polynomial back into an expression in `var`.
    pub fn to_expr(&self, var: &str) -> Expr {
        let x = Expr::symbol(var);
        add(self
            .coeffs
            .iter()
            .enumerate()
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(degree, coeff)| {
                mul(vec![Expr::number(coeff.clone()), pow(x.clone(), Expr::integer(degree as i64))])
            })
            .collect())
    }
}

/// Decomposes a single expanded term into `(degree, coefficient)`.
fn monomial(term: &Expr, var: &str) -> Option<(usize, BigRational)> {
    match term {
        Expr::Primary(Primary::Number(n)) => Some((0, n.clone())),
        Expr::Primary(Primary::Symbol(name)) if name == var => Some((1, BigRational::one())),
        Expr::Exp(base, exp) if base.as_symbol() == Some(var) => {
            let degree = exp.as_integer()?.to_usize()?;
            Some((degree, BigRational::one()))
        },
        Expr::Mul(factors) => factors.iter().try_fold((0, BigRational::one()), |(degree, coeff), factor| {
            let (d, c) = monomial(factor, var)?;
            Some((degree + d, coeff * c))
        }),
        _ => None,
    }
}

/// Returns the positive divisors of a non-zero integer small enough to search.
fn divisors(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.abs().to_u64().filter(|n| *n != 0 && *n <= MAX_DIVISOR_SEARCH)?;
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            small.push(BigInt::from(d));
            if d * d != n {
                large.push(BigInt::from(n / d));
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// The reason [`solve`] could not produce a solution set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The expression is not a polynomial in the variable.
    NotPolynomial,

    /// The polynomial has no rational roots left and its remaining degree is too high.
    DegreeTooHigh(usize),

    /// The request was cancelled.
    Cancelled,
}

impl From<Cancelled> for SolveError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Solves `expr = 0` for `var`, returning the distinct solutions.
///
/// Rational roots are listed first in ascending order, followed by the roots of a remaining
/// quadratic factor.
pub fn solve(expr: &Expr, var: &str, cancel: &CancelToken) -> Result<Vec<Expr>, SolveError> {
    let poly = Poly::from_expr(expr, var).ok_or(SolveError::NotPolynomial)?;
    if poly.degree() == 0 {
        return Ok(Vec::new());
    }

    let rational_roots = poly.rational_roots(cancel)?;
    let mut remaining = poly.primitive().1;
    for root in &rational_roots {
        while remaining.degree() > 0 && remaining.eval(root).is_zero() {
            remaining = remaining.deflate(root);
        }
    }

    let mut solutions = rational_roots.into_iter().map(Expr::number).collect::<Vec<_>>();
    match remaining.degree() {
        0 => {},
        1 => {
            let [c, b] = [&remaining.coeffs[0], &remaining.coeffs[1]];
            solutions.push(Expr::number(-c / b));
        },
        2 => {
            let [c, b, a] = [&remaining.coeffs[0], &remaining.coeffs[1], &remaining.coeffs[2]];
            let discriminant = b * b - BigRational::from_integer(4.into()) * a * c;
            let root = Expr::number(discriminant).sqrt();
            let scale = Expr::number((BigRational::from_integer(2.into()) * a).recip());
            let neg_b = Expr::number(-b);
            solutions.push(mul(vec![scale.clone(), add(vec![neg_b.clone(), -root.clone()])]));
            solutions.push(mul(vec![scale, add(vec![neg_b, root])]));
        },
        degree => return Err(SolveError::DegreeTooHigh(degree)),
    }

    let mut distinct = Vec::with_capacity(solutions.len());
    for solution in solutions {
        if !distinct.contains(&solution) {
            distinct.push(solution);
        }
    }
    Ok(distinct)
}

/// Factors a univariate polynomial over the rationals into linear factors and an irreducible
/// remainder. Expressions that are not univariate polynomials are returned unchanged.
///
/// Linear factors are ordered by descending root, after any power of the variable itself.
///
/// The result is built without re-evaluation, so `x^2 - 1` factors to `(x - 1)*(x + 1)` instead of
/// being multiplied back out.
pub fn factor(expr: &Expr, cancel: &CancelToken) -> Result<Expr, Cancelled> {
    let symbols = expr.free_symbols();
    let Some(var) = symbols.first().filter(|_| symbols.len() == 1) else {
        return Ok(expr.clone());
    };
    let Some(poly) = Poly::from_expr(expr, var) else {
        return Ok(expr.clone());
    };
    if poly.degree() == 0 {
        return Ok(expr.clone());
    }

    let x = Expr::symbol(var.as_str());
    let (mut content, mut remaining) = poly.primitive();
    let mut factors = Vec::new();

    let zero_roots = remaining.strip_zero_roots();
    if zero_roots > 0 {
        factors.push(pow(x.clone(), Expr::integer(zero_roots as i64)));
    }

    for root in remaining.rational_roots(cancel)?.into_iter().rev() {
        let mut multiplicity = 0;
        while remaining.degree() > 0 && remaining.eval(&root).is_zero() {
            remaining = remaining.deflate(&root);
            multiplicity += 1;
        }
        if multiplicity == 0 {
            continue;
        }

        // (x - p/q)^m = (q*x - p)^m / q^m
        let denom = BigRational::from_integer(root.denom().clone());
        let linear = add(vec![
            mul(vec![Expr::number(denom.clone()), x.clone()]),
            Expr::number(-BigRational::from_integer(root.numer().clone())),
        ]);
        factors.push(pow(linear, Expr::integer(multiplicity)));
        content /= num_traits::pow(denom, multiplicity as usize);
    }

    let (rest_content, rest) = remaining.primitive();
    content *= rest_content;
    if rest.degree() > 0 {
        factors.push(rest.to_expr(var));
    }

    if !content.is_one() {
        factors.insert(0, Expr::from_num(Num::Exact(content)));
    }
    Ok(Expr::Mul(factors).downgrade())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::primitive::{int, rational};
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn square(expr: Expr) -> Expr {
        expr.pow(Expr::integer(2))
    }

    fn solve_exact(expr: &Expr, var: &str) -> Result<Vec<Expr>, SolveError> {
        solve(expr, var, &CancelToken::new())
    }

    fn factor_exact(expr: &Expr) -> Expr {
        factor(expr, &CancelToken::new()).unwrap()
    }

    #[test]
    fn from_expression() {
        let expr = square(x() + Expr::one());
        let poly = Poly::from_expr(&expr, "x").unwrap();
        assert_eq!(poly.coeffs(), &[int(1), int(2), int(1)]);
        assert!(Poly::from_expr(&Expr::call("sin", vec![x()]), "x").is_none());
        assert!(Poly::from_expr(&(x() * Expr::symbol("y")), "x").is_none());
    }

    #[test]
    fn rational_roots() {
        // 2x^2 - 3x + 1 = (2x - 1)(x - 1)
        let poly = Poly::new(vec![int(1), int(-3), int(2)]);
        assert_eq!(poly.rational_roots(&CancelToken::new()).unwrap(), vec![rational(1, 2), int(1)]);
    }

    #[test]
    fn solve_quadratic() {
        let solutions = solve_exact(&(square(x()) - Expr::one()), "x").unwrap();
        assert_eq!(solutions, vec![Expr::integer(-1), Expr::integer(1)]);

        let solutions = solve_exact(&(square(x()) - Expr::integer(2)), "x").unwrap();
        let text = solutions.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(text, vec!["-sqrt(2)", "sqrt(2)"]);

        let solutions = solve_exact(&(square(x()) + Expr::one()), "x").unwrap();
        let text = solutions.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(text, vec!["-I", "I"]);
    }

    #[test]
    fn solve_repeated_root() {
        let solutions = solve_exact(&square(x() - Expr::integer(3)), "x").unwrap();
        assert_eq!(solutions, vec![Expr::integer(3)]);
    }

    #[test]
    fn solve_rejects_non_polynomials() {
        let err = solve_exact(&Expr::call("sin", vec![x()]), "x").unwrap_err();
        assert_eq!(err, SolveError::NotPolynomial);
    }

    #[test]
    fn factor_difference_of_squares() {
        let factored = factor_exact(&(square(x()) - Expr::one()));
        assert_eq!(factored.to_string(), "(x - 1)*(x + 1)");
    }

    #[test]
    fn factor_with_content_and_zero_root() {
        let expr = Expr::integer(2) * x().pow(Expr::integer(3)) - Expr::integer(2) * x();
        assert_eq!(factor_exact(&expr).to_string(), "2*x*(x - 1)*(x + 1)");
        let expr = square(x()) + Expr::integer(2) * x() + Expr::one();
        assert_eq!(factor_exact(&expr).to_string(), "(x + 1)^2");
    }

    #[test]
    fn factor_leaves_irreducible() {
        let expr = square(x()) + Expr::one();
        assert_eq!(factor_exact(&expr), expr);
    }

    #[test]
    fn other_symbols_are_not_coefficients() {
        let expr = (x() + Expr::symbol("y")).pow(Expr::integer(40));
        assert!(Poly::from_expr(&expr, "x").is_none());
    }

    #[test]
    fn cancelled_solve() {
        let token = CancelToken::new();
        token.cancel();
        // 720720 has 240 divisors, so the rational root search polls the token
        let expr = Expr::integer(720720) * x().pow(Expr::integer(5)) + Expr::integer(720720) * x() + Expr::integer(7);
        assert_eq!(solve(&expr, "x", &token), Err(SolveError::Cancelled));
    }
}
