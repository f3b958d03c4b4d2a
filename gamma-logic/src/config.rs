//! Options controlling how requests are processed.

use serde::Deserialize;
use std::{collections::BTreeSet, time::Duration};

/// Whether card sections carry their computed result.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardMode {
    /// Every card is evaluated while the response is assembled, and its section carries the
    /// result.
    ///
    /// This is the default option.
    #[default]
    Eager,

    /// Card sections only carry what is needed to request the result later with
    /// [`Gamma::eval_card`](crate::Gamma::eval_card).
    Lazy,
}

impl std::str::FromStr for CardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "lazy" => Ok(Self::Lazy),
            other => Err(format!("unknown card mode `{}`, expected `eager` or `lazy`", other)),
        }
    }
}

/// Options for the request pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GammaConfig {
    /// Lowercase operations that are nevertheless displayed like values rather than function
    /// calls, such as `sqrt`.
    pub non_function_like: BTreeSet<String>,

    /// Operations whose cards already show the result, so no separate "Result" section is
    /// emitted for them.
    pub self_explanatory: BTreeSet<String>,

    /// Whether card sections carry their computed result.
    pub card_mode: CardMode,

    /// The longest a single request may run before it is cancelled. [`None`] means no limit.
    pub timeout: Option<Duration>,

    /// The largest edit distance at which a misspelled name is corrected.
    pub max_edit_distance: usize,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            non_function_like: ["sqrt"].into_iter().map(String::from).collect(),
            self_explanatory: ["diff", "integrate", "series", "solve", "factorint", "simplify", "plot"]
                .into_iter()
                .map(String::from)
                .collect(),
            card_mode: CardMode::default(),
            timeout: None,
            max_edit_distance: 2,
        }
    }
}

impl GammaConfig {
    /// Wraps the given [`GammaConfig`] into a builder for further customization.
    pub fn into_builder(self) -> GammaConfigBuilder {
        GammaConfigBuilder(self)
    }
}

/// Helper struct to build a [`GammaConfig`] struct.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GammaConfigBuilder(GammaConfig);

impl GammaConfigBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operation that is displayed like a value.
    pub fn non_function_like(mut self, name: impl Into<String>) -> Self {
        self.0.non_function_like.insert(name.into());
        self
    }

    /// Adds an operation whose cards already show its result.
    pub fn self_explanatory(mut self, name: impl Into<String>) -> Self {
        self.0.self_explanatory.insert(name.into());
        self
    }

    /// Sets the card mode. See [`CardMode`] for more information.
    pub fn card_mode(mut self, card_mode: CardMode) -> Self {
        self.0.card_mode = card_mode;
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.0.timeout = Some(timeout);
        self
    }

    /// Sets the largest edit distance at which names are corrected.
    pub fn max_edit_distance(mut self, distance: usize) -> Self {
        self.0.max_edit_distance = distance;
        self
    }

    /// Builds the [`GammaConfig`] struct.
    pub fn build(self) -> GammaConfig {
        self.0
    }
}
