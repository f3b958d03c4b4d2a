//! The cards shipped with the library.

use gamma_compute::symbolic::Expr;
use gamma_compute::Value;
use crate::components::Components;
use crate::error::GammaError;
use crate::format::latex;
use crate::sandbox::Sandbox;
use super::{Card, CardDescriptor, Operand, Operation, Parameters};

/// Implements the descriptor accessors of a card wrapping a [`CardDescriptor`].
macro_rules! descriptor {
    () => {
        fn descriptor(&self) -> &CardDescriptor {
            &self.0
        }

        fn descriptor_mut(&mut self) -> &mut CardDescriptor {
            &mut self.0
        }
    };
}

/// The first bound component in LaTeX, parenthesized unless it is an atom.
fn operand_latex(descriptor: &CardDescriptor, components: &Components) -> String {
    let value = descriptor
        .bindings
        .first()
        .and_then(|key| components.get(key))
        .unwrap_or_else(|| components.working.clone());
    if value.is_atom() {
        latex(&value)
    } else {
        format!("\\left({}\\right)", latex(&value))
    }
}

fn variable_latex(components: &Components) -> String {
    components
        .variable
        .as_deref()
        .map(|name| latex(&Expr::symbol(name).into()))
        .unwrap_or_default()
}

/// The solutions of `f = 0` in the primary variable.
#[derive(Debug, Clone)]
pub struct Roots(CardDescriptor);

impl Default for Roots {
    fn default() -> Self {
        Self(
            CardDescriptor::new(
                "roots",
                "Roots",
                Operation { function: "solve", operands: vec![Operand::Binding(0), Operand::Variable] },
            )
            .multivariate(),
        )
    }
}

impl Card for Roots {
    descriptor!();

    fn pre_output(&self, components: &Components) -> String {
        variable_latex(components)
    }
}

/// The derivative with respect to the primary variable.
#[derive(Debug, Clone)]
pub struct Diff(CardDescriptor);

impl Default for Diff {
    fn default() -> Self {
        Self(
            CardDescriptor::new(
                "diff",
                "Derivative",
                Operation { function: "diff", operands: vec![Operand::Binding(0), Operand::Variable] },
            )
            .multivariate(),
        )
    }
}

impl Card for Diff {
    descriptor!();

    fn pre_output(&self, components: &Components) -> String {
        format!("\\frac{{d}}{{d {}}} {}", variable_latex(components), operand_latex(&self.0, components))
    }
}

/// The antiderivative with respect to the primary variable.
#[derive(Debug, Clone)]
pub struct Integral(CardDescriptor);

impl Default for Integral {
    fn default() -> Self {
        Self(
            CardDescriptor::new(
                "integral",
                "Antiderivative forms",
                Operation { function: "integrate", operands: vec![Operand::Binding(0), Operand::Variable] },
            )
            .multivariate(),
        )
    }
}

impl Card for Integral {
    descriptor!();

    fn pre_output(&self, components: &Components) -> String {
        format!("\\int {}\\, d{}", operand_latex(&self.0, components), variable_latex(components))
    }
}

/// The leading terms of the power series around a point.
#[derive(Debug, Clone)]
pub struct Series(CardDescriptor);

impl Default for Series {
    fn default() -> Self {
        Self(
            CardDescriptor::new(
                "series",
                "Series expansion",
                Operation {
                    function: "series",
                    operands: vec![
                        Operand::Binding(0),
                        Operand::Variable,
                        Operand::Parameter("x0"),
                        Operand::Parameter("n"),
                    ],
                },
            )
            .parameter("x0", Expr::zero().into())
            .parameter("n", Expr::integer(10).into()),
        )
    }
}

impl Card for Series {
    descriptor!();

    fn title_text(&self, components: &Components) -> String {
        let parameters = self.0.merge_parameters(components, &Parameters::new());
        let describe = |name: &str| parameters.get(name).map(ToString::to_string).unwrap_or_default();
        format!("{} around {}, first {} terms", self.0.title, describe("x0"), describe("n"))
    }
}

/// The prime factorization of an integer.
#[derive(Debug, Clone)]
pub struct Factorization(CardDescriptor);

impl Default for Factorization {
    fn default() -> Self {
        Self(CardDescriptor::new(
            "factorization",
            "Integer factorization",
            Operation { function: "factorint", operands: vec![Operand::Binding(0)] },
        ))
    }
}

impl Card for Factorization {
    descriptor!();
}

/// A plot of one or more functions. The result is the plotting parameters themselves, to be
/// rendered by the client.
#[derive(Debug, Clone)]
pub struct Plot(CardDescriptor);

impl Default for Plot {
    fn default() -> Self {
        Self(
            CardDescriptor::new(
                "plot",
                "Plot",
                Operation { function: "plot", operands: vec![Operand::Binding(0)] },
            )
            .parameter("xmin", Expr::integer(-10).into())
            .parameter("xmax", Expr::integer(10).into()),
        )
    }
}

impl Card for Plot {
    descriptor!();

    fn evaluate(&self, _: &Sandbox, components: &Components, overrides: &Parameters) -> Result<Value, GammaError> {
        let mut parameters = self.0.merge_parameters(components, overrides);
        let functions = match self.0.operands(components, &parameters)?.pop() {
            Some(Value::List(functions)) => functions,
            Some(other) => vec![other],
            None => Vec::new(),
        };
        let coordinates = components
            .get("coordinates")
            .unwrap_or_else(|| Value::List(functions.iter().map(|_| Value::Str("cartesian".to_string())).collect()));
        if let Some(variable) = &components.variable {
            parameters.insert("variable".to_string(), Expr::symbol(variable.as_str()).into());
        }
        parameters.insert("functions".to_string(), Value::List(functions));
        parameters.insert("coordinates".to_string(), coordinates);

        Ok(Value::Dict(
            parameters
                .into_iter()
                .map(|(name, value)| (Value::Str(name), value))
                .collect(),
        ))
    }

    fn output(&self, result: &Value) -> String {
        result.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gamma_compute::CancelToken;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn square() -> Components {
        Components::new(x().pow(Expr::integer(2)).into())
    }

    fn run(card: &dyn Card, components: &Components) -> Value {
        let sandbox = Sandbox::new(CancelToken::new());
        card.evaluate(&sandbox, components, &Parameters::new()).unwrap()
    }

    #[test]
    fn roots_of_quadratic() {
        let card = Roots::default();
        let components = Components::new((x().pow(Expr::integer(2)) - Expr::one()).into());
        assert_eq!(card.input_text(&components), "solve(x^2 - 1, x)");
        assert_eq!(card.pre_output(&components), "x");
        assert_eq!(run(&card, &components).to_string(), "[-1, 1]");
    }

    #[test]
    fn derivative() {
        let card = Diff::default();
        assert_eq!(run(&card, &square()).to_string(), "2*x");
        assert_eq!(card.pre_output(&square()), "\\frac{d}{d x} \\left(x^{2}\\right)");
        assert_eq!(card.output(&run(&card, &square())), "2 x");
    }

    #[test]
    fn antiderivative() {
        let card = Integral::default();
        assert_eq!(run(&card, &square()).to_string(), "x^3/3");
        assert_eq!(card.pre_output(&Components::new(x().into())), "\\int x\\, dx");
    }

    #[test]
    fn series_parameters() {
        let card = Series::default();
        let components = Components::new(Expr::call("exp", vec![x()]).into());
        assert_eq!(card.title_text(&components), "Series expansion around 0, first 10 terms");
        assert_eq!(card.input_text(&components), "series(exp(x), x, 0, 10)");
        assert_eq!(card.pre_output(&components), "");

        let sandbox = Sandbox::new(CancelToken::new());
        let overrides = Parameters::from([("n".to_string(), Expr::integer(3).into())]);
        let value = card.evaluate(&sandbox, &components, &overrides).unwrap();
        assert_eq!(value.to_string(), "1 + x + x^2/2 + O(x^3)");
    }

    #[test]
    fn series_parameters_from_input() {
        let card = Series::default();
        let components = Components::new(Expr::call("cos", vec![x()]).into())
            .with_extra("x0", Expr::integer(1).into())
            .with_extra("n", Expr::integer(3).into());
        assert_eq!(card.title_text(&components), "Series expansion around 1, first 3 terms");
        assert_eq!(card.input_text(&components), "series(cos(x), x, 1, 3)");

        let components = Components::new(Expr::call("exp", vec![x()]).into())
            .with_extra("n", Expr::integer(3).into());
        assert_eq!(run(&card, &components).to_string(), "1 + x + x^2/2 + O(x^3)");

        let sandbox = Sandbox::new(CancelToken::new());
        let overrides = Parameters::from([("n".to_string(), Expr::integer(2).into())]);
        let value = card.evaluate(&sandbox, &components, &overrides).unwrap();
        assert_eq!(value.to_string(), "1 + x + O(x^2)");
    }

    #[test]
    fn factorization_output() {
        let card = Factorization::default();
        let components = Components::new(Expr::integer(12).into());
        let value = run(&card, &components);
        assert_eq!(card.output(&value), "2^{2} \\cdot 3");
    }

    #[test]
    fn missing_variable() {
        let card = Diff::default();
        let sandbox = Sandbox::new(CancelToken::new());
        let components = Components::new(Expr::integer(3).into());
        let err = card.evaluate(&sandbox, &components, &Parameters::new()).unwrap_err();
        assert!(matches!(err, GammaError::Card { .. }));
        assert_eq!(card.input_text(&components), "diff(3, None)");
    }

    #[test]
    fn plot_returns_parameters() {
        let card = Plot::default();
        let value = run(&card, &Components::new(Value::List(vec![x().into()])));
        assert_eq!(
            value.to_string(),
            "{'coordinates': ['cartesian'], 'functions': [x], 'variable': x, 'xmax': 10, 'xmin': -10}",
        );
    }
}
