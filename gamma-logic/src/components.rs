//! The per-request bundle of values that cards operate on.

use gamma_compute::symbolic::Expr;
use gamma_compute::Value;
use std::collections::BTreeMap;
use crate::sandbox::INPUT_EVALUATED;

/// The values cards draw their operands from.
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    /// The primary variable, if the working value has one.
    pub variable: Option<String>,

    /// Every free variable of the working value, sorted.
    variables: Vec<String>,

    /// The value the cards operate on.
    pub working: Value,

    /// Values added by the normalizer, keyed by name.
    pub extra: BTreeMap<String, Value>,
}

impl Components {
    /// Creates components for the given working value. The free variables are taken from the
    /// value, and the first of them becomes the primary variable.
    pub fn new(working: Value) -> Self {
        let variables = working.free_symbols().into_iter().collect::<Vec<_>>();
        Self {
            variable: variables.first().cloned(),
            variables,
            working,
            extra: BTreeMap::new(),
        }
    }

    /// Uses the given symbol as the primary variable, adding it to the variables if the working
    /// value does not contain it.
    pub fn with_variable(mut self, variable: Option<String>) -> Self {
        if let Some(variable) = variable {
            if let Err(index) = self.variables.binary_search(&variable) {
                self.variables.insert(index, variable.clone());
            }
            self.variable = Some(variable);
        }
        self
    }

    /// Adds a named value.
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Returns true if the working value has more than one free variable.
    pub fn is_multivariate(&self) -> bool {
        self.variables.len() > 1
    }

    /// Every free variable of the working value. Only cards that handle several variables should
    /// read this; everything else uses [`Components::variable`].
    pub fn variables(&self, multivariate: bool) -> Option<&[String]> {
        multivariate.then_some(self.variables.as_slice())
    }

    /// Looks up a component by name: the working value, the variable(s), or an added value.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            INPUT_EVALUATED => Some(self.working.clone()),
            "variable" => self.variable.as_deref().map(|name| Expr::symbol(name).into()),
            "variables" => Some(Value::List(
                self.variables.iter().map(|name| Expr::symbol(name.as_str()).into()).collect(),
            )),
            _ => self.extra.get(key).cloned(),
        }
    }
}
