//! Picks the cards that apply to the input and prepares the components they operate on.

use gamma_compute::{Namespace, Value};
use std::sync::Arc;
use tracing::{debug, warn};
use crate::cards::{Card, CardRegistry};
use crate::components::Components;
use crate::config::GammaConfig;
use crate::resultsets::ClassificationTable;
use crate::sandbox::{Sandbox, INPUT_EVALUATED};
use crate::shape::CallShape;

/// What the resolver decided for one input.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The components the cards operate on.
    pub components: Components,

    /// The applicable cards, in registration order.
    pub cards: Vec<Arc<dyn Card>>,

    /// The working value, which replaces the evaluated input.
    pub evaluated: Value,

    /// Whether the input is an application of a function, such as `diff(x^2, x)`, rather than a
    /// value.
    pub is_function: bool,
}

/// Returns true if `name` is displayed like a function call: it names a callable operation
/// that is not a function class, starts with a lowercase letter, and is not configured to be
/// displayed like a value.
pub fn is_function(name: &str, ns: &Namespace, config: &GammaConfig) -> bool {
    let Some(binding) = ns.get(name) else {
        return false;
    };
    binding.is_callable()
        && !binding.is_function_class()
        && !binding.is_atom()
        && name.starts_with(|c: char| c.is_lowercase())
        && !config.non_function_like.contains(name)
}

/// Resolves the cards for the input and binds the working value to
/// [`INPUT_EVALUATED`](crate::sandbox::INPUT_EVALUATED).
///
/// Functions without an entry in the table, and input that is not a call, use the table's
/// default entry. Card names the registry does not know are skipped.
pub fn resolve(
    shape: &CallShape,
    evaluated: &Value,
    sandbox: &mut Sandbox,
    config: &GammaConfig,
    table: &ClassificationTable,
    registry: &CardRegistry,
) -> Resolution {
    let applied = shape.is_call() && shape.is_applied();
    let function = applied.then_some(shape.function.as_str());
    let entry = table.entry(function, evaluated);

    let components = (entry.normalizer)(shape, evaluated);
    let evaluated = components.working.clone();
    sandbox.set(INPUT_EVALUATED, evaluated.clone());

    let mut cards = entry
        .cards
        .iter()
        .filter_map(|name| {
            let card = registry.get(name);
            if card.is_none() {
                warn!(card = *name, "classification names a card that is not registered");
            }
            card.map(|card| (registry.position(name), Arc::clone(card)))
        })
        .collect::<Vec<_>>();
    cards.sort_by_key(|(position, _)| *position);
    let cards = cards.into_iter().map(|(_, card)| card).collect::<Vec<_>>();

    let is_function = applied && is_function(&shape.function, sandbox.namespace(), config);
    debug!(
        function = %shape.function,
        cards = cards.len(),
        variable = ?components.variable,
        is_function,
        "resolved input"
    );

    Resolution { components, cards, evaluated, is_function }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gamma_compute::CancelToken;
    use pretty_assertions::assert_eq;

    fn resolve_text(text: &str) -> (Resolution, Sandbox) {
        let mut sandbox = Sandbox::new(CancelToken::new());
        let (parsed, value) = sandbox.run(text).unwrap().unwrap();
        let shape = CallShape::extract(&parsed, &value, &sandbox).unwrap();
        let resolution = resolve(
            &shape,
            &value,
            &mut sandbox,
            &GammaConfig::default(),
            &ClassificationTable::builtin(),
            &CardRegistry::builtin(),
        );
        (resolution, sandbox)
    }

    fn names(resolution: &Resolution) -> Vec<&'static str> {
        resolution.cards.iter().map(|card| card.name()).collect()
    }

    #[test]
    fn function_detection() {
        let ns = Sandbox::new(CancelToken::new());
        let config = GammaConfig::default();
        assert!(is_function("diff", ns.namespace(), &config));
        assert!(!is_function("sin", ns.namespace(), &config));
        assert!(!is_function("sqrt", ns.namespace(), &config));
        assert!(!is_function("pi", ns.namespace(), &config));
        assert!(!is_function("Abs", ns.namespace(), &config));
        assert!(!is_function("undefined", ns.namespace(), &config));
    }

    #[test]
    fn call_replaces_working_value() {
        let (resolution, sandbox) = resolve_text("diff(x^3, x)");
        assert!(resolution.is_function);
        assert_eq!(names(&resolution), vec!["diff"]);
        assert_eq!(resolution.evaluated.to_string(), "x^3");
        assert_eq!(sandbox.get(INPUT_EVALUATED).map(ToString::to_string), Some("x^3".to_string()));
    }

    #[test]
    fn unmatched_function_uses_default_entry() {
        let (resolution, _) = resolve_text("expand((x + 1)^2)");
        assert!(resolution.is_function);
        assert_eq!(names(&resolution), vec!["roots", "diff", "integral", "plot"]);
        assert_eq!(resolution.components.variable.as_deref(), Some("x"));
    }

    #[test]
    fn value_input() {
        let (resolution, _) = resolve_text("12");
        assert!(!resolution.is_function);
        assert_eq!(names(&resolution), vec!["factorization"]);
        assert_eq!(resolution.components.variable, None);
    }

    #[test]
    fn single_variable_is_primary() {
        let (resolution, _) = resolve_text("sin(t)");
        assert!(!resolution.is_function);
        assert_eq!(resolution.components.variable.as_deref(), Some("t"));
        assert_eq!(names(&resolution), vec!["diff", "integral", "series", "plot"]);
    }

    #[test]
    fn unregistered_cards_are_skipped() {
        let mut sandbox = Sandbox::new(CancelToken::new());
        let (parsed, value) = sandbox.run("12").unwrap().unwrap();
        let shape = CallShape::extract(&parsed, &value, &sandbox).unwrap();
        let registry = CardRegistry::new();
        let resolution = resolve(
            &shape,
            &value,
            &mut sandbox,
            &GammaConfig::default(),
            &ClassificationTable::builtin(),
            &registry,
        );
        assert!(resolution.cards.is_empty());
    }
}
