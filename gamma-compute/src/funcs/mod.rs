//! All builtin operations available to evaluated expressions.
//!
//! Each operation is a unit `struct` implementing [`Builtin`]. Routines compute something from
//! their arguments, and function classes construct the mathematical function they name.
//!
//! # Example
//!
//! ```
//! use gamma_compute::builtin::{Args, Builtin};
//! use gamma_compute::cancel::CancelToken;
//! use gamma_compute::funcs::calculus::Diff;
//! use gamma_compute::symbolic::Expr;
//!
//! let x = Expr::symbol("x");
//! let args = Args::bind(&Diff, vec![x.clone().pow(Expr::integer(2)).into()], vec![]).unwrap();
//! let result = Diff.eval(args, &CancelToken::new()).unwrap();
//! assert_eq!(result.to_string(), "2*x");
//! ```

pub mod algebra;
pub mod calculus;
pub mod elementary;
mod helper;
pub mod number;

use crate::builtin::Builtin;
use std::collections::HashMap;
use std::sync::Arc;

/// Returns every builtin operation, keyed by name.
pub fn all() -> HashMap<&'static str, Arc<dyn Builtin>> {
    use algebra::*;
    use calculus::*;
    use elementary::*;
    use number::*;

    macro_rules! build {
        ($($name:literal $upname:ident),* $(,)?) => {
            [
                $(
                    ($name, Arc::new($upname) as Arc<dyn Builtin>),
                )*
            ]
                .into_iter()
                .collect()
        };
    }

    build! {
        "diff" Diff,
        "integrate" Integrate,
        "series" Series,
        "solve" Solve,
        "factor" Factor,
        "expand" Expand,
        "simplify" Simplify,
        "subs" Subs,
        "factorint" Factorint,
        "isprime" Isprime,
        "gcd" Gcd,
        "lcm" Lcm,
        "sqrt" Sqrt,
        "sin" Sin,
        "cos" Cos,
        "tan" Tan,
        "cot" Cot,
        "sec" Sec,
        "csc" Csc,
        "asin" Asin,
        "acos" Acos,
        "atan" Atan,
        "sinh" Sinh,
        "cosh" Cosh,
        "tanh" Tanh,
        "exp" Exp,
        "log" Log,
        "ln" Log, // alias for log
        "Abs" Abs,
        "factorial" Factorial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_keys() {
        for (name, builtin) in all() {
            if name != "ln" {
                assert_eq!(name, builtin.name());
            }
        }
    }
}
