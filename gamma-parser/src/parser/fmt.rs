use std::fmt::{Display, Formatter, Result};
use super::{ast::expr::Expr, Precedence};

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// Returns the LaTeX command for a well-known symbol name, such as `\pi` for `pi`.
pub fn symbol_latex(name: &str) -> Option<&'static str> {
    Some(match name {
        "pi" => "\\pi",
        "E" => "e",
        "I" => "i",
        "oo" => "\\infty",
        "zoo" => "\\tilde{\\infty}",
        "alpha" => "\\alpha",
        "beta" => "\\beta",
        "gamma" => "\\gamma",
        "delta" => "\\delta",
        "epsilon" => "\\epsilon",
        "theta" => "\\theta",
        "lambda" => "\\lambda",
        "mu" => "\\mu",
        "phi" => "\\phi",
        "psi" => "\\psi",
        "omega" => "\\omega",
        _ => return None,
    })
}

/// Returns the LaTeX command for a function that has one, such as `\sin` for `sin`.
pub fn function_latex(name: &str) -> Option<&'static str> {
    Some(match name {
        "sin" => "\\sin",
        "cos" => "\\cos",
        "tan" => "\\tan",
        "cot" => "\\cot",
        "sec" => "\\sec",
        "csc" => "\\csc",
        "asin" => "\\operatorname{asin}",
        "acos" => "\\operatorname{acos}",
        "atan" => "\\operatorname{atan}",
        "sinh" => "\\sinh",
        "cosh" => "\\cosh",
        "tanh" => "\\tanh",
        "log" => "\\log",
        "exp" => "\\exp",
        _ => return None,
    })
}

/// Helper to format powers.
pub fn fmt_pow(f: &mut Formatter, left: Option<&Expr>, right: Option<&Expr>) -> Result {
    if let Some(left) = left {
        let left = left.innermost();
        let needs_paren = match left {
            Expr::Unary(unary) => unary.op.precedence() <= Precedence::Exp,
            Expr::Binary(binary) => binary.op.precedence() <= Precedence::Exp,
            _ => false,
        };

        if needs_paren {
            write!(f, "\\left(")?;
            left.fmt_latex(f)?;
            write!(f, "\\right)")?;
        } else {
            left.fmt_latex(f)?;
        }
    }
    write!(f, "^{{")?;
    if let Some(right) = right {
        right.innermost().fmt_latex(f)?;
    }
    write!(f, "}}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::parser::Parser;

    fn callable(name: &str) -> bool {
        matches!(name, "sqrt" | "sin" | "diff" | "integrate" | "Abs")
    }

    fn latex(source: &str) -> String {
        let expr = Parser::with_bindings(source, &callable).try_parse_full::<Expr>().unwrap();
        expr.as_display().to_string()
    }

    #[test]
    fn fmt_display() {
        let expr = Parser::new("3x + 6").try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.to_string(), "3*x + 6");
    }

    #[test]
    fn fmt_display_nested_power() {
        let expr = Parser::new("x^(3(x + 6))^9").try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.to_string(), "x^(3*(x + 6))^9");
    }

    #[test]
    fn fmt_latex_sqrt() {
        assert_eq!(latex("sqrt(3x)^2"), "\\sqrt{3 x}^{2}");
    }

    #[test]
    fn fmt_latex_scientific() {
        assert_eq!(latex("1e5"), "1 \\cdot 10^{5}");
        assert_eq!(latex("2.5E+3"), "2.5 \\cdot 10^{3}");
        assert_eq!(latex("4e-2"), "4 \\cdot 10^{-2}");
    }

    #[test]
    fn fmt_latex_fractions() {
        assert_eq!(latex("1/x + 5/x^2"), "\\frac{1}{x} + \\frac{5}{x^{2}}");
    }

    #[test]
    fn fmt_latex_derivative() {
        assert_eq!(latex("diff(x^2, x)"), "\\frac{d}{d x} x^{2}");
    }

    #[test]
    fn fmt_latex_integral() {
        assert_eq!(latex("integrate(sin(x), x)"), "\\int \\sin{\\left(x \\right)}\\, dx");
    }

    #[test]
    fn fmt_latex_symbols() {
        assert_eq!(latex("2pi"), "2 \\pi");
        assert_eq!(latex("Abs(x)"), "\\left|x\\right|");
    }
}
