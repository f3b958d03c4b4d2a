//! The symbolic engine behind Gamma: a small computer algebra system and an evaluator that runs
//! parsed expressions against a namespace of builtin operations.
//!
//! ```
//! use gamma_compute::eval::Eval;
//! use gamma_compute::namespace::Namespace;
//!
//! let ns = Namespace::default();
//! let expr = gamma_parser::parse("diff(sin(x), x)", &ns).unwrap().unwrap();
//! assert_eq!(expr.eval(&ns).unwrap().to_string(), "cos(x)");
//! ```

pub mod builtin;
pub mod cancel;
pub mod error;
pub mod eval;
pub mod funcs;
pub mod namespace;
pub mod primitive;
pub mod symbolic;
pub mod value;

pub use cancel::CancelToken;
pub use namespace::{Binding, Namespace};
pub use value::Value;
