//! Requests for a single card, used to load card results after the response.

use gamma_compute::symbolic::Expr;
use tracing::debug_span;
use crate::assembler::{Gamma, Prepared};
use crate::cards::{bound_to, Parameters};
use crate::components::Components;
use crate::error::GammaError;
use crate::section::{CardInfo, CardResult};

impl Gamma {
    /// Resolves the expression, then switches its primary variable to `variable` and binds the
    /// variable in the sandbox.
    fn prepare_for_card(&self, expression: &str, variable: &str) -> Result<(Prepared, Components), GammaError> {
        let mut prepared = self
            .prepare(expression)?
            .ok_or_else(|| GammaError::evaluation("the expression is empty"))?;
        let components = prepared
            .resolution
            .components
            .clone()
            .with_variable(Some(variable.to_string()));
        prepared.sandbox.set(variable, Expr::symbol(variable).into());
        Ok((prepared, components))
    }

    /// Describes the named card for the expression, without computing its result.
    ///
    /// Fails with [`GammaError::Lookup`] if no card has that name.
    pub fn card_info(&self, card: &str, expression: &str, variable: &str) -> Result<CardInfo, GammaError> {
        let span = debug_span!("card_info", card, expression, variable);
        let _enter = span.enter();
        let card = self.registry().lookup(card)?;

        self.guarded(|| {
            let (_, components) = self.prepare_for_card(expression, variable)?;
            Ok(CardInfo {
                var: variable.to_string(),
                title: card.title_text(&components),
                input: card.input_text(&components),
                pre_output: card.pre_output(&components),
            })
        })
    }

    /// Computes the named card for the expression.
    ///
    /// `parameters` override the card's default parameters, and `arguments`, if not empty, name
    /// the components the card operates on instead of its default bindings. Fails with
    /// [`GammaError::Lookup`] if no card has that name.
    pub fn eval_card(
        &self,
        card: &str,
        expression: &str,
        variable: &str,
        parameters: &Parameters,
        arguments: Vec<String>,
    ) -> Result<CardResult, GammaError> {
        let span = debug_span!("eval_card", card, expression, variable);
        let _enter = span.enter();
        let card = bound_to(self.registry().lookup(card)?.as_ref(), arguments);

        self.guarded(|| {
            let (prepared, components) = self.prepare_for_card(expression, variable)?;
            let value = card.evaluate(&prepared.sandbox, &components, parameters);
            prepared.sandbox.check_cancelled()?;
            let value = value?;
            Ok(CardResult::new(&value, card.output(&value)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cards::{builtin::Series, Card, CardRegistry};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn info_uses_the_given_variable() {
        let info = Gamma::default().card_info("diff", "x*y", "y").unwrap();
        assert_eq!(
            info,
            CardInfo {
                var: "y".to_string(),
                title: "Derivative".to_string(),
                input: "diff(x*y, y)".to_string(),
                pre_output: "\\frac{d}{d y} \\left(x y\\right)".to_string(),
            },
        );
    }

    #[test]
    fn eval_with_parameters() {
        let parameters = Parameters::from([("n".to_string(), Expr::integer(4).into())]);
        let result = Gamma::default()
            .eval_card("series", "exp(x)", "x", &parameters, vec![])
            .unwrap();
        assert_eq!(result.value, "1 + x + x^2/2 + x^3/6 + O(x^4)");
    }

    #[test]
    fn eval_factorization() {
        let result = Gamma::default()
            .eval_card("factorization", "360", "x", &Parameters::new(), vec![])
            .unwrap();
        assert_eq!(result.value, "{2: 3, 3: 2, 5: 1}");
        assert_eq!(result.output, "2^{3} \\cdot 3^{2} \\cdot 5");
    }

    #[test]
    fn unknown_cards() {
        let gamma = Gamma::default();
        assert!(matches!(gamma.card_info("limits", "x", "x"), Err(GammaError::Lookup { .. })));
        assert!(matches!(
            gamma.eval_card("limits", "x", "x", &Parameters::new(), vec![]),
            Err(GammaError::Lookup { .. }),
        ));
    }

    #[test]
    fn reregistered_card_is_used() {
        let mut series = Series::default();
        series.descriptor_mut().title = "Taylor series";
        let mut registry = CardRegistry::builtin();
        registry.register(series);
        let gamma = Gamma::default().with_registry(Arc::new(registry));

        let info = gamma.card_info("series", "sin(x)", "x").unwrap();
        assert_eq!(info.title, "Taylor series around 0, first 10 terms");
    }

    #[test]
    fn invalid_expression() {
        let err = Gamma::default().card_info("diff", "2 +", "x").unwrap_err();
        assert!(matches!(err, GammaError::Parse(_)));
    }
}
