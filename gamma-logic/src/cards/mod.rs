//! Result cards: self-contained derived results, such as the roots or derivative of the input.
//!
//! A card is described by a [`CardDescriptor`]: the operation it performs, which components it
//! operates on, and its default parameters. The [`Card`] trait supplies the default way to
//! evaluate and present a card from its descriptor; each card overrides only the hooks it needs.

pub mod builtin;
pub mod registry;

use gamma_compute::symbolic::Expr;
use gamma_compute::Value;
use std::{collections::BTreeMap, fmt::Debug};
use crate::components::Components;
use crate::error::GammaError;
use crate::format;
use crate::sandbox::{Sandbox, INPUT_EVALUATED};

pub use registry::CardRegistry;

/// Parameters of a card, keyed by name.
pub type Parameters = BTreeMap<String, Value>;

/// Where an operand of a card's operation comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// The component named by the card binding at this index.
    Binding(usize),

    /// The primary variable.
    Variable,

    /// The named parameter.
    Parameter(&'static str),
}

/// An operation and the operands it is called with.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// The name of the operation in the sandbox.
    pub function: &'static str,

    /// The operands, in order.
    pub operands: Vec<Operand>,
}

/// Everything that describes a card apart from its behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDescriptor {
    /// The unique name of the card.
    pub name: &'static str,

    /// The title of the card's section.
    pub title: &'static str,

    /// The operation computing the card's result.
    pub operation: Operation,

    /// The names of the components that [`Operand::Binding`]s refer to.
    pub bindings: Vec<String>,

    /// Whether the card handles input with several variables.
    pub multivariate: bool,

    /// Parameters used when the caller does not supply them.
    pub parameters: Vec<(&'static str, Value)>,
}

impl CardDescriptor {
    /// Creates a descriptor operating on the working value, with no parameters.
    pub fn new(name: &'static str, title: &'static str, operation: Operation) -> Self {
        Self {
            name,
            title,
            operation,
            bindings: vec![INPUT_EVALUATED.to_string()],
            multivariate: false,
            parameters: Vec::new(),
        }
    }

    pub fn multivariate(mut self) -> Self {
        self.multivariate = true;
        self
    }

    pub fn parameter(mut self, name: &'static str, value: Value) -> Self {
        self.parameters.push((name, value));
        self
    }

    /// Merges parameters over the defaults: first those the input supplied through the
    /// components, then the caller's.
    pub fn merge_parameters(&self, components: &Components, overrides: &Parameters) -> Parameters {
        let mut parameters = self
            .parameters
            .iter()
            .map(|(name, default)| {
                let value = components.extra.get(*name).unwrap_or(default);
                (name.to_string(), value.clone())
            })
            .collect::<Parameters>();
        parameters.extend(overrides.iter().map(|(name, value)| (name.clone(), value.clone())));
        parameters
    }

    /// Resolves one operand against the components and parameters.
    fn resolve(&self, operand: &Operand, components: &Components, parameters: &Parameters) -> Result<Value, GammaError> {
        match operand {
            Operand::Binding(index) => {
                let key = self.bindings.get(*index).ok_or_else(|| {
                    GammaError::card(self.name, format!("operand #{} is not bound to a component", index + 1))
                })?;
                components
                    .get(key)
                    .ok_or_else(|| GammaError::card(self.name, format!("no component named `{}`", key)))
            },
            Operand::Variable => components
                .variable
                .as_deref()
                .map(|name| Expr::symbol(name).into())
                .ok_or_else(|| GammaError::card(self.name, "the input has no variable")),
            Operand::Parameter(name) => parameters
                .get(*name)
                .cloned()
                .ok_or_else(|| GammaError::card(self.name, format!("missing parameter `{}`", name))),
        }
    }

    /// Resolves every operand of the operation.
    pub fn operands(&self, components: &Components, parameters: &Parameters) -> Result<Vec<Value>, GammaError> {
        self.operation
            .operands
            .iter()
            .map(|operand| self.resolve(operand, components, parameters))
            .collect()
    }

    /// Writes the operation as a call, such as `diff(x^2, x)`. Operands that cannot be resolved
    /// are written as `None`.
    pub fn render_call(&self, components: &Components, parameters: &Parameters) -> String {
        let operands = self
            .operation
            .operands
            .iter()
            .map(|operand| {
                self.resolve(operand, components, parameters)
                    .unwrap_or(Value::None)
                    .to_string()
            })
            .collect::<Vec<_>>();
        format!("{}({})", self.operation.function, operands.join(", "))
    }
}

/// Lets a boxed card be cloned and identifies its concrete type.
pub trait CardClone {
    fn clone_box(&self) -> Box<dyn Card>;

    /// The name of the concrete card type.
    fn variant(&self) -> &'static str;
}

impl<T: Card + Clone + 'static> CardClone for T {
    fn clone_box(&self) -> Box<dyn Card> {
        Box::new(self.clone())
    }

    fn variant(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// The evaluation and presentation hooks of a card.
pub trait Card: CardClone + Debug + Send + Sync {
    fn descriptor(&self) -> &CardDescriptor;

    fn descriptor_mut(&mut self) -> &mut CardDescriptor;

    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Computes the card's result by calling its operation in the sandbox.
    fn evaluate(&self, sandbox: &Sandbox, components: &Components, overrides: &Parameters) -> Result<Value, GammaError> {
        let descriptor = self.descriptor();
        let parameters = descriptor.merge_parameters(components, overrides);
        let operands = descriptor.operands(components, &parameters)?;
        sandbox
            .call(descriptor.operation.function, operands, Vec::new())
            .map_err(|err| GammaError::card(descriptor.name, err.to_string()))
    }

    fn title_text(&self, _components: &Components) -> String {
        self.descriptor().title.to_string()
    }

    /// The operation as text, with the parameters supplied by the input or the defaults.
    fn input_text(&self, components: &Components) -> String {
        let descriptor = self.descriptor();
        descriptor.render_call(components, &descriptor.merge_parameters(components, &Parameters::new()))
    }

    /// LaTeX shown before the result, such as the integral being computed.
    fn pre_output(&self, _components: &Components) -> String {
        String::new()
    }

    /// Renders the result.
    fn output(&self, result: &Value) -> String {
        format::format_by_type(result)
    }

    /// Checks that the card can be computed for these components without computing it.
    fn check(&self, components: &Components) -> Result<(), GammaError> {
        let descriptor = self.descriptor();
        descriptor
            .operands(components, &descriptor.merge_parameters(components, &Parameters::new()))
            .map(|_| ())
    }
}

impl Clone for Box<dyn Card> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Cards are equal if they are the same kind of card with the same descriptor.
impl PartialEq for dyn Card {
    fn eq(&self, other: &Self) -> bool {
        self.variant() == other.variant() && {
            let (a, b) = (self.descriptor(), other.descriptor());
            a.title == b.title
                && a.operation == b.operation
                && a.multivariate == b.multivariate
                && a.bindings == b.bindings
        }
    }
}

/// Returns a copy of the card operating on the given components instead of its defaults.
pub fn bound_to(card: &dyn Card, bindings: Vec<String>) -> Box<dyn Card> {
    let mut card = card.clone_box();
    if !bindings.is_empty() {
        card.descriptor_mut().bindings = bindings;
    }
    card
}
