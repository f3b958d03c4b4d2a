pub mod binary;
pub mod call;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod unary;

pub use binary::Binary;
pub use call::{Call, Kwarg};
pub use expr::{Expr, Primary};
pub use literal::{LitFloat, LitInt, LitList, LitSym, Literal};
pub use paren::Paren;
pub use unary::Unary;
