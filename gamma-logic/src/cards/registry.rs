//! The process-wide set of cards, by name.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use crate::error::GammaError;
use super::{builtin, Card};

/// Every known card, in registration order. The order of cards in a response follows the order
/// they were registered in.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: Vec<Arc<dyn Card>>,
}

impl CardRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a card. A card with the same name as an existing one replaces it, keeping the
    /// original position.
    pub fn register(&mut self, card: impl Card + 'static) {
        let card: Arc<dyn Card> = Arc::new(card);
        match self.position(card.name()) {
            Some(index) => self.cards[index] = card,
            None => self.cards.push(card),
        }
    }

    /// Registers a card, for chaining.
    pub fn with(mut self, card: impl Card + 'static) -> Self {
        self.register(card);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Card>> {
        self.cards.iter().find(|card| card.name() == name)
    }

    /// Returns the named card, or a [`GammaError::Lookup`] error.
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Card>, GammaError> {
        self.get(name).ok_or_else(|| GammaError::Lookup { card: name.to_string() })
    }

    /// The registration index of the named card.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Card>> {
        self.cards.iter()
    }

    /// The registry holding every card shipped with the library.
    pub fn builtin() -> Self {
        Self::new()
            .with(builtin::Roots::default())
            .with(builtin::Diff::default())
            .with(builtin::Integral::default())
            .with(builtin::Series::default())
            .with(builtin::Factorization::default())
            .with(builtin::Plot::default())
    }
}

static REGISTRY: OnceCell<Arc<CardRegistry>> = OnceCell::new();

/// Installs the process-wide registry. This should happen once at startup, before any request is
/// processed. Returns the registry back if one was already installed.
pub fn install(registry: CardRegistry) -> Result<(), CardRegistry> {
    REGISTRY
        .set(Arc::new(registry))
        .map_err(|existing| (*existing).clone())
}

/// Returns the process-wide registry, installing the builtin one if none was installed.
pub fn global() -> Arc<CardRegistry> {
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(CardRegistry::builtin())))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn registration_order() {
        let registry = CardRegistry::builtin();
        let names = registry.iter().map(|card| card.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["roots", "diff", "integral", "series", "factorization", "plot"]);
    }

    #[test]
    fn replacing_keeps_position() {
        let mut registry = CardRegistry::builtin();
        let mut series = builtin::Series::default();
        series.descriptor_mut().title = "Taylor series";
        registry.register(series);
        assert_eq!(registry.position("series"), Some(3));
        assert_eq!(registry.lookup("series").unwrap().descriptor().title, "Taylor series");
        assert_eq!(registry.iter().count(), 6);
    }

    #[test]
    fn unknown_card() {
        let registry = CardRegistry::builtin();
        assert!(matches!(registry.lookup("limits"), Err(GammaError::Lookup { .. })));
    }

    #[test]
    fn equality_ignores_identity() {
        let a: Arc<dyn Card> = Arc::new(builtin::Diff::default());
        let b: Arc<dyn Card> = Arc::new(builtin::Diff::default());
        let c: Arc<dyn Card> = Arc::new(builtin::Integral::default());
        assert!(*a == *b);
        assert!(*a != *c);
    }
}
