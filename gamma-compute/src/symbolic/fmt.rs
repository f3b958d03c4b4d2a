//! Plain-text and LaTeX rendering of [`Expr`].
//!
//! Plain text follows the conventions of Python-style computer algebra output with `^` for
//! powers: `x^2 + 2*x + 1`, `-x^3/6`, `sqrt(2)/2`. LaTeX output is meant for MathJax.

use gamma_parser::parser::fmt::{function_latex, symbol_latex, Latex};
use num_rational::BigRational;
use num_traits::{One, Signed};
use std::fmt::{Display, Formatter, Result};
use super::expr::{Expr, Primary};

/// Splits a float too large or too small to write out in full into a mantissa that always has
/// a decimal point and a power of ten.
fn scientific(value: f64) -> Option<(String, i32)> {
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return None;
    }
    let text = format!("{:e}", value);
    let (mantissa, exponent) = text.split_once('e')?;
    let mantissa = if mantissa.contains('.') {
        mantissa.to_string()
    } else {
        format!("{}.0", mantissa)
    };
    Some((mantissa, exponent.parse().ok()?))
}

/// Formats a float so that it never reads as an integer: `2.0`, `0.5`, `1.0e+25`.
fn fmt_float(f: &mut Formatter, value: f64) -> Result {
    match scientific(value) {
        Some((mantissa, exponent)) => write!(f, "{}e{:+}", mantissa, exponent),
        None if value.fract() == 0.0 => write!(f, "{:.1}", value),
        None => write!(f, "{}", value),
    }
}

fn fmt_float_latex(f: &mut Formatter, value: f64) -> Result {
    match scientific(value) {
        Some((mantissa, exponent)) => write!(f, "{} \\cdot 10^{{{}}}", mantissa, exponent),
        None => fmt_float(f, value),
    }
}

/// Returns the exponent if it is exactly `1/2`.
fn is_half(exp: &Expr) -> bool {
    exp.as_number()
        .is_some_and(|n| n.numer().is_one() && *n.denom() == 2.into())
}

/// A product split into its sign, numerator factors, and denominator factors.
struct Fraction {
    negative: bool,
    numer: Vec<Expr>,
    denom: Vec<Expr>,
}

impl Fraction {
    fn split(factors: &[Expr]) -> Self {
        let mut fraction = Self {
            negative: false,
            numer: Vec::new(),
            denom: Vec::new(),
        };

        for factor in factors {
            match factor {
                Expr::Primary(Primary::Number(n)) => {
                    let n = if n.is_negative() {
                        fraction.negative = !fraction.negative;
                        -n
                    } else {
                        n.clone()
                    };
                    if !n.numer().is_one() {
                        fraction.numer.push(Expr::number(BigRational::from_integer(n.numer().clone())));
                    }
                    if !n.denom().is_one() {
                        fraction.denom.push(Expr::number(BigRational::from_integer(n.denom().clone())));
                    }
                },
                Expr::Primary(Primary::Float(value)) if *value < 0.0 => {
                    fraction.negative = !fraction.negative;
                    fraction.numer.push(Expr::float(-value));
                },
                Expr::Exp(base, exp) => match exp.negated_if_negative() {
                    Some(positive) if positive.is_one() => fraction.denom.push((**base).clone()),
                    Some(positive) => fraction.denom.push(Expr::Exp(base.clone(), Box::new(positive))),
                    None => fraction.numer.push(factor.clone()),
                },
                other => fraction.numer.push(other.clone()),
            }
        }

        fraction
    }
}

/// Returns true if the expression must be parenthesized when it is the base of a power.
fn needs_parens_as_base(expr: &Expr) -> bool {
    match expr {
        Expr::Add(_) | Expr::Mul(_) | Expr::Exp(..) => true,
        Expr::Primary(Primary::Number(n)) => n.is_negative() || !n.is_integer(),
        Expr::Primary(Primary::Float(value)) => *value < 0.0,
        Expr::Primary(_) => false,
    }
}

impl Display for Primary {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Number(n) if n.is_integer() => write!(f, "{}", n.numer()),
            Self::Number(n) => write!(f, "{}/{}", n.numer(), n.denom()),
            Self::Float(value) => fmt_float(f, *value),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Constant(constant) => write!(f, "{}", constant.name()),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                }
                for term in iter {
                    match term.negated_if_negative() {
                        Some(positive) => write!(f, " - {}", positive)?,
                        None => write!(f, " + {}", term)?,
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let fraction = Fraction::split(factors);
                if fraction.negative {
                    write!(f, "-")?;
                }
                fmt_text_factors(f, &fraction.numer)?;
                match fraction.denom.as_slice() {
                    [] => Ok(()),
                    [single @ Self::Add(_)] => write!(f, "/({})", single),
                    [single] => write!(f, "/{}", single),
                    denom => {
                        write!(f, "/(")?;
                        fmt_text_factors(f, denom)?;
                        write!(f, ")")
                    },
                }
            },
            Self::Exp(base, exp) => {
                if is_half(exp) {
                    return write!(f, "sqrt({})", base);
                }
                if let Some(positive) = exp.negated_if_negative() {
                    let inverse = if positive.is_one() {
                        (**base).clone()
                    } else {
                        Self::Exp(base.clone(), Box::new(positive))
                    };
                    return match inverse {
                        Self::Add(_) | Self::Mul(_) => write!(f, "1/({})", inverse),
                        inverse => write!(f, "1/{}", inverse),
                    };
                }

                if needs_parens_as_base(base) {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                if needs_parens_as_base(exp) {
                    write!(f, "^({})", exp)
                } else {
                    write!(f, "^{}", exp)
                }
            },
        }
    }
}

fn fmt_text_factors(f: &mut Formatter, factors: &[Expr]) -> Result {
    if factors.is_empty() {
        return write!(f, "1");
    }
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            write!(f, "*")?;
        }
        if matches!(factor, Expr::Add(_)) {
            write!(f, "({})", factor)?;
        } else {
            write!(f, "{}", factor)?;
        }
    }
    Ok(())
}

fn fmt_latex_args(f: &mut Formatter, args: &[Expr]) -> Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        arg.fmt_latex(f)?;
    }
    Ok(())
}

impl Latex for Primary {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Number(n) if n.is_integer() => write!(f, "{}", n.numer()),
            Self::Number(n) => {
                if n.is_negative() {
                    write!(f, "- ")?;
                }
                write!(f, "\\frac{{{}}}{{{}}}", n.numer().abs(), n.denom())
            },
            Self::Float(value) => fmt_float_latex(f, *value),
            Self::Symbol(name) => write!(f, "{}", symbol_latex(name).unwrap_or(name)),
            Self::Constant(constant) => {
                write!(f, "{}", symbol_latex(constant.name()).unwrap_or(constant.name()))
            },
            Self::Call(name, args) => match (name.as_str(), args.as_slice()) {
                ("Abs", [arg]) => write!(f, "\\left|{}\\right|", arg.as_display()),
                ("factorial", [arg]) if arg.is_atom() => write!(f, "{}!", arg.as_display()),
                ("factorial", [arg]) => write!(f, "\\left({}\\right)!", arg.as_display()),
                ("O", args) => {
                    write!(f, "O\\left(")?;
                    fmt_latex_args(f, args)?;
                    write!(f, "\\right)")
                },
                (name, args) => {
                    match function_latex(name) {
                        Some(command) => write!(f, "{}", command)?,
                        None => write!(f, "\\operatorname{{{}}}", name)?,
                    }
                    write!(f, "{{\\left(")?;
                    fmt_latex_args(f, args)?;
                    write!(f, " \\right)}}")
                },
            },
        }
    }
}

fn fmt_latex_factors(f: &mut Formatter, factors: &[Expr]) -> Result {
    if factors.is_empty() {
        return write!(f, "1");
    }
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            if factor.is_number() && factors[i - 1].is_number() {
                write!(f, " \\cdot ")?;
            } else {
                write!(f, " ")?;
            }
        }
        if matches!(factor, Expr::Add(_)) {
            write!(f, "\\left({}\\right)", factor.as_display())?;
        } else {
            factor.fmt_latex(f)?;
        }
    }
    Ok(())
}

impl Latex for Expr {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Primary(primary) => primary.fmt_latex(f),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    term.fmt_latex(f)?;
                }
                for term in iter {
                    match term.negated_if_negative() {
                        Some(positive) => write!(f, " - {}", positive.as_display())?,
                        None => write!(f, " + {}", term.as_display())?,
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let fraction = Fraction::split(factors);
                if fraction.negative {
                    write!(f, "- ")?;
                }
                if fraction.denom.is_empty() {
                    return fmt_latex_factors(f, &fraction.numer);
                }
                write!(f, "\\frac{{")?;
                fmt_latex_factors(f, &fraction.numer)?;
                write!(f, "}}{{")?;
                fmt_latex_factors(f, &fraction.denom)?;
                write!(f, "}}")
            },
            Self::Exp(base, exp) => {
                if let Some(n) = exp.as_number() {
                    if n.numer().is_one() && *n.denom() == 2.into() {
                        return write!(f, "\\sqrt{{{}}}", base.as_display());
                    }
                    if n.numer().is_one() && !n.is_integer() {
                        return write!(f, "\\sqrt[{}]{{{}}}", n.denom(), base.as_display());
                    }
                }
                if let Some(positive) = exp.negated_if_negative() {
                    let inverse = if positive.is_one() {
                        (**base).clone()
                    } else {
                        Self::Exp(base.clone(), Box::new(positive))
                    };
                    return write!(f, "\\frac{{1}}{{{}}}", inverse.as_display());
                }

                if let Some((name, args)) = base.as_call() {
                    if let Some(command) = function_latex(name) {
                        write!(f, "{}^{{{}}}{{\\left(", command, exp.as_display())?;
                        fmt_latex_args(f, args)?;
                        return write!(f, " \\right)}}");
                    }
                }

                if needs_parens_as_base(base) {
                    write!(f, "\\left({}\\right)", base.as_display())?;
                } else {
                    base.fmt_latex(f)?;
                }
                write!(f, "^{{{}}}", exp.as_display())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::primitive::rational;
    use crate::symbolic::elementary::apply;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn text_fractions() {
        assert_eq!((x() / Expr::integer(2)).to_string(), "x/2");
        assert_eq!((Expr::integer(3) / x()).to_string(), "3/x");
        let expr = -(x().pow(Expr::integer(3)) / Expr::integer(6));
        assert_eq!(expr.to_string(), "-x^3/6");
        let expr = x() / (x() + Expr::one());
        assert_eq!(expr.to_string(), "x/(x + 1)");
    }

    #[test]
    fn text_subtraction() {
        let expr = x().pow(Expr::integer(2)) - Expr::one();
        assert_eq!(expr.to_string(), "x^2 - 1");
        let expr = x() - Expr::integer(3) * Expr::symbol("y");
        assert_eq!(expr.to_string(), "x - 3*y");
    }

    #[test]
    fn text_powers() {
        assert_eq!(x().sqrt().to_string(), "sqrt(x)");
        assert_eq!(x().pow(Expr::number(rational(1, 3))).to_string(), "x^(1/3)");
        assert_eq!((x() + Expr::one()).pow(Expr::integer(-1)).to_string(), "1/(x + 1)");
        assert_eq!(Expr::float(2.0).to_string(), "2.0");
    }

    #[test]
    fn floats_never_read_as_integers() {
        let large = Expr::float(9999999999999999999999999.5);
        assert_eq!(large.to_string(), "1.0e+25");
        assert_eq!(large.as_display().to_string(), "1.0 \\cdot 10^{25}");
        assert_eq!(Expr::float(2.5e-7).to_string(), "2.5e-7");
        assert_eq!(Expr::float(0.25).to_string(), "0.25");
        assert_eq!(Expr::float(1e15).to_string(), "1000000000000000.0");
    }

    #[test]
    fn latex_products() {
        let expr = -(x().pow(Expr::integer(3)) / Expr::integer(6));
        assert_eq!(expr.as_display().to_string(), "- \\frac{x^{3}}{6}");
        let expr = Expr::integer(2) * x();
        assert_eq!(expr.as_display().to_string(), "2 x");
        assert_eq!(Expr::number(rational(1, 2)).as_display().to_string(), "\\frac{1}{2}");
    }

    #[test]
    fn latex_functions() {
        let sin = apply("sin", vec![x()]);
        assert_eq!(sin.as_display().to_string(), "\\sin{\\left(x \\right)}");
        let squared = sin.pow(Expr::integer(2));
        assert_eq!(squared.as_display().to_string(), "\\sin^{2}{\\left(x \\right)}");
        assert_eq!(x().sqrt().as_display().to_string(), "\\sqrt{x}");
        let expr = x().pow(Expr::integer(2)) + Expr::one();
        assert_eq!(expr.as_display().to_string(), "x^{2} + 1");
    }
}
