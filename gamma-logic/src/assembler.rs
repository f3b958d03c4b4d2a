//! Assembles the response to a request: the ordered list of sections shown for the input.

use gamma_compute::{Binding, CancelToken, Value};
use gamma_parser::parser::{ast::expr::Expr, fmt::Latex};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, debug_span, error, warn};
use crate::cards::{registry, Card, CardRegistry, Parameters};
use crate::components::Components;
use crate::config::{CardMode, GammaConfig};
use crate::disambiguate::{close_matches, disambiguate};
use crate::error::{GammaError, ParseErrorInfo};
use crate::format::{format_by_type, latex};
use crate::learn_more;
use crate::resolver::{resolve, Resolution};
use crate::resultsets::{self, ClassificationTable};
use crate::sandbox::Sandbox;
use crate::section::{CardRecord, ErrorDetail, Layout, Section, VariableInfo};
use crate::shape::CallShape;

/// Prefixes the diagnostic trace of an unexpected failure.
const TRACE_HEADER: &str = "There was an error in Gamma.\nFor reference, the stack trace is:\n\n";

/// Everything the pipeline knows about one input after resolving it.
pub(crate) struct Prepared {
    pub sandbox: Sandbox,
    pub parsed: Expr,

    /// The value of the whole input, before the normalizer replaced it.
    pub evaluated: Value,
    pub shape: CallShape,
    pub resolution: Resolution,
}

/// Turns mathematical text into sections.
///
/// Each request gets its own [`Sandbox`]; the only state shared between requests is the card
/// registry and the classification table, which are read-only.
///
/// # Example
///
/// ```
/// use gamma_logic::Gamma;
///
/// let sections = Gamma::default().eval("diff(x^3, x)");
/// assert!(sections.iter().any(|section| section.card() == Some("diff")));
/// ```
#[derive(Debug, Clone)]
pub struct Gamma {
    config: GammaConfig,
    registry: Arc<CardRegistry>,
    table: Arc<ClassificationTable>,
}

impl Default for Gamma {
    fn default() -> Self {
        Self::new(GammaConfig::default())
    }
}

impl Gamma {
    /// Creates a pipeline using the process-wide card registry and classification table.
    pub fn new(config: GammaConfig) -> Self {
        Self {
            config,
            registry: registry::global(),
            table: resultsets::global(),
        }
    }

    /// Uses the given card registry instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<CardRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Uses the given classification table instead of the process-wide one.
    pub fn with_table(mut self, table: Arc<ClassificationTable>) -> Self {
        self.table = table;
        self
    }

    pub fn config(&self) -> &GammaConfig {
        &self.config
    }

    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    fn cancel_token(&self) -> CancelToken {
        match self.config.timeout {
            Some(timeout) => CancelToken::with_timeout(timeout),
            None => CancelToken::new(),
        }
    }

    /// Processes the input, turning any failure into error sections. Empty input produces no
    /// sections.
    pub fn eval(&self, text: &str) -> Vec<Section> {
        self.try_eval(text)
            .unwrap_or_else(|err| self.error_sections(text, err))
    }

    /// Processes the input, returning the error if parsing or evaluating it fails.
    pub fn try_eval(&self, text: &str) -> Result<Vec<Section>, GammaError> {
        let span = debug_span!("eval", input = text);
        let _enter = span.enter();
        self.guarded(|| self.assemble(text))
    }

    /// Runs `f`, turning a panic into a [`GammaError::Unhandled`] error.
    pub(crate) fn guarded<T>(&self, f: impl FnOnce() -> Result<T, GammaError>) -> Result<T, GammaError> {
        catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|message| message.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let trace = format!("{}{}", TRACE_HEADER, message);
            error!(%message, "unhandled error while processing input");
            Err(GammaError::Unhandled { message, trace })
        })
    }

    /// The sections shown when processing the input failed.
    fn error_sections(&self, text: &str, err: GammaError) -> Vec<Section> {
        let detail = match err {
            GammaError::Parse(err) => {
                debug!(error = %err.message(), "input failed to parse");
                ErrorDetail::ExceptionInfo(ParseErrorInfo::new(&err, text))
            },
            GammaError::Unhandled { trace, .. } => ErrorDetail::Error(trace),
            other => {
                debug!(error = %other, "input failed to evaluate");
                ErrorDetail::Error(other.to_string())
            },
        };
        vec![Section::input(text), Section::error(text, detail)]
    }

    /// Parses, evaluates, and resolves the input. Returns [`None`] for empty input.
    pub(crate) fn prepare(&self, text: &str) -> Result<Option<Prepared>, GammaError> {
        let mut sandbox = Sandbox::new(self.cancel_token());
        let Some((parsed, evaluated)) = sandbox.run(text)? else {
            return Ok(None);
        };
        debug!(parsed = %parsed, "evaluated input");

        let shape = CallShape::extract(&parsed, &evaluated, &sandbox)?;
        let resolution = resolve(&shape, &evaluated, &mut sandbox, &self.config, &self.table, &self.registry);
        Ok(Some(Prepared { sandbox, parsed, evaluated, shape, resolution }))
    }

    fn assemble(&self, text: &str) -> Result<Vec<Section>, GammaError> {
        let Some(prepared) = self.prepare(text)? else {
            return Ok(Vec::new());
        };
        let Prepared { sandbox, parsed, evaluated, shape, resolution } = &prepared;
        let components = &resolution.components;
        let input = parsed.to_string();

        let mut sections = vec![Section::input(input.as_str())];
        sections.extend(self.ambiguities(text, shape, sandbox));
        sections.push(self.primary(parsed, resolution));

        if resolution.cards.is_empty() && components.variable.is_none() && resolution.is_function {
            sections.push(Section::basic("Result", input.as_str(), format_by_type(evaluated)));
        } else {
            if resolution.is_function && !self.config.self_explanatory.contains(&shape.function) {
                sections.push(Section::basic("Result", "", format_by_type(evaluated)));
            }
            sections.extend(self.simplification(shape, resolution, sandbox)?);

            for card in &resolution.cards {
                match self.card_record(card.as_ref(), sandbox, components) {
                    Ok(record) => sections.push(Section::Card(record)),
                    Err(err) => {
                        sandbox.check_cancelled()?;
                        warn!(card = card.name(), error = %err, "omitting card that failed");
                    },
                }
            }

            if resolution.is_function {
                sections.extend(learn_more::find(&shape.function).map(Section::learn_more));
            }
        }

        sandbox.check_cancelled()?;
        debug!(sections = sections.len(), "assembled response");
        Ok(sections)
    }

    /// Suggestions for input that likely means something else: corrected names first, then the
    /// near-miss rules.
    fn ambiguities(&self, text: &str, shape: &CallShape, sandbox: &Sandbox) -> Vec<Section> {
        let ns = sandbox.namespace();
        let known = ns
            .names()
            .filter(|name| ns.get(name).is_some_and(Binding::is_callable));
        let corrected = close_matches(text, known, self.config.max_edit_distance).map(|text| {
            Section::Ambiguity { ambiguity: text, description: String::new() }
        });
        let suggestion = disambiguate(shape).map(|suggestion| Section::Ambiguity {
            ambiguity: suggestion.text,
            description: suggestion.explanation,
        });
        corrected.into_iter().chain(suggestion).collect()
    }

    /// The input as it was understood: the call itself for functions, the value otherwise.
    fn primary(&self, parsed: &Expr, resolution: &Resolution) -> Section {
        let (output, display) = if resolution.is_function {
            (parsed.as_display().to_string(), Layout::Block)
        } else {
            (latex(&resolution.evaluated), Layout::Inline)
        };

        let components = &resolution.components;
        let variables = resolution
            .cards
            .iter()
            .any(|card| card.descriptor().multivariate)
            .then(|| components.variables(true))
            .flatten()
            .map(|variables| VariableInfo {
                num_variables: variables.len(),
                variables: variables.to_vec(),
                variable: components.variable.clone().unwrap_or_default(),
            });

        Section::Primary {
            title: "Interpretation".to_string(),
            input: parsed.to_string(),
            output,
            display,
            variables,
        }
    }

    /// Shows the simplified working value if simplifying it changes it, or the working value
    /// itself if the input asked for a simplification.
    fn simplification(
        &self,
        shape: &CallShape,
        resolution: &Resolution,
        sandbox: &Sandbox,
    ) -> Result<Option<Section>, GammaError> {
        let working = &resolution.evaluated;
        let simplified = match sandbox.call("simplify", vec![working.clone()], Vec::new()) {
            Ok(simplified) => Some(simplified),
            Err(err) => {
                sandbox.check_cancelled()?;
                debug!(error = %err, "value could not be simplified");
                None
            },
        };
        Ok(match simplified {
            Some(simplified) if &simplified != working && shape.arg(0).is_some_and(|arg| *arg != simplified) => {
                Some(Section::basic("Simplification", simplified.to_string(), latex(&simplified)))
            },
            _ if shape.function == "simplify" => Some(Section::basic("Simplification", "", latex(working))),
            _ => None,
        })
    }

    /// Presents a card, computing its result in eager mode.
    fn card_record(&self, card: &dyn Card, sandbox: &Sandbox, components: &Components) -> Result<CardRecord, GammaError> {
        let descriptor = card.descriptor();
        let arguments = serde_json::to_string(&descriptor.bindings)
            .map_err(|err| GammaError::card(descriptor.name, err.to_string()))?;

        let (value, output) = match self.config.card_mode {
            CardMode::Eager => {
                let value = card.evaluate(sandbox, components, &Parameters::new())?;
                (Some(value.to_string()), Some(card.output(&value)))
            },
            CardMode::Lazy => {
                card.check(components)?;
                (None, None)
            },
        };

        Ok(CardRecord {
            card: descriptor.name.to_string(),
            var: components.variable.clone().unwrap_or_default(),
            title: card.title_text(components),
            input: card.input_text(components),
            pre_output: card.pre_output(components),
            parameters: descriptor.parameters.iter().map(|(name, _)| name.to_string()).collect(),
            arguments,
            value,
            output,
        })
    }
}
