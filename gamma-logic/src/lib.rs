//! Turns mathematical text into an ordered list of sections explaining it: how the input was
//! understood, its result, and a set of cards with related results such as roots, derivatives,
//! and series expansions.
//!
//! A request goes through these steps:
//!
//! 1. The text is parsed and evaluated in a fresh [`Sandbox`](sandbox::Sandbox).
//! 2. The [`CallShape`](shape::CallShape) of the input is extracted: the function it calls, if
//!    any, and the arguments.
//! 3. The [`ClassificationTable`](resultsets::ClassificationTable) picks the cards that apply,
//!    and its normalizer prepares the [`Components`](components::Components) they operate on.
//! 4. The [`Gamma`] assembler lays the sections out, computing each card.
//!
//! ```
//! use gamma_logic::{Gamma, Section};
//!
//! let sections = Gamma::default().eval("factor(12)");
//! assert!(matches!(&sections[1], Section::Ambiguity { ambiguity, .. } if ambiguity == "factorint(12)"));
//! ```

pub mod assembler;
pub mod cards;
pub mod components;
pub mod config;
pub mod disambiguate;
pub mod error;
pub mod format;
pub mod learn_more;
mod queries;
pub mod resolver;
pub mod resultsets;
pub mod sandbox;
pub mod section;
pub mod shape;

pub use assembler::Gamma;
pub use cards::{Card, CardRegistry, Parameters};
pub use config::{CardMode, GammaConfig, GammaConfigBuilder};
pub use error::GammaError;
pub use section::{CardInfo, CardResult, Section};
