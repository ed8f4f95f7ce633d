//! Rule engine - pluggable strategies that turn metadata into declarations
//!
//! A [`Rule`] converts one metadata unit (a controller or a body schema) into
//! one generated declaration inside a [`CodeModel`]. `apply` takes `&self`,
//! so a single rule instance can be reused across every controller of a run
//! without one call observing state written by another.
//!
//! Rules that accept options additionally implement [`ConfigurableRule`] and
//! expose it through [`Rule::as_configurable`]. Rules are selected by name
//! through a [`RuleRegistry`]; unknown names fall back to the default rule.

mod client;
mod decorator;
mod interface;
mod model;
mod spring;
mod stub;

pub use client::RestTemplateClientRule;
pub use decorator::ControllerDecoratorRule;
pub use interface::ControllerInterfaceRule;
pub use model::ModelPojoRule;
pub use stub::ControllerStubRule;

use crate::codegen::{CodeModel, JavaType};
use crate::error::Result;
use crate::metadata::ControllerMetadata;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Free-form rule options; semantics are owned by each rule
pub type RuleConfiguration = BTreeMap<String, String>;

/// Strategy converting one metadata unit into one declaration
pub trait Rule<M>: Send + Sync {
    /// Registry identifier
    fn name(&self) -> &str;

    /// Write the declaration(s) for `metadata` into `model` and return the
    /// type of the primary declaration
    fn apply(&self, metadata: &M, model: &mut CodeModel) -> Result<JavaType>;

    /// Configuration capability, if this rule accepts options
    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableRule> {
        None
    }
}

/// Optional capability of rules that accept key/value options
pub trait ConfigurableRule {
    /// Called at most once, before any `apply`. Unknown keys are ignored.
    fn apply_configuration(&mut self, configuration: &RuleConfiguration) -> Result<()>;
}

pub type ControllerRule = Box<dyn Rule<ControllerMetadata>>;

/// Constructor registered under a rule name
pub type RuleFactory = fn() -> ControllerRule;

/// Identifier of the rule used when none is configured or resolution fails
pub const DEFAULT_RULE: &str = "spring4-controller-stub";

/// Why a named rule could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleResolutionError {
    #[error("unknown rule '{name}'")]
    Unknown { name: String },

    #[error("rule '{name}' rejected its configuration: {reason}")]
    Configuration { name: String, reason: String },
}

/// Outcome of [`RuleRegistry::resolve`]
pub struct ResolvedRule {
    pub rule: ControllerRule,
    /// Set when the requested rule was replaced by the default rule
    pub fallback: Option<RuleResolutionError>,
}

/// Explicit name -> factory table for controller rules
pub struct RuleRegistry {
    factories: BTreeMap<String, RuleFactory>,
    default: RuleFactory,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RuleRegistry {
    /// Empty registry with the given fallback rule
    pub fn new(default: RuleFactory) -> Self {
        Self {
            factories: BTreeMap::new(),
            default,
        }
    }

    /// Registry populated with the built-in Spring rules
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(stub_rule);
        registry.register(DEFAULT_RULE, stub_rule);
        registry.register("spring4-controller-interface", interface_rule);
        registry.register("spring4-controller-decorator", decorator_rule);
        registry.register("spring4-rest-template-client", client_rule);
        registry
    }

    pub fn register(&mut self, name: &str, factory: RuleFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Option<ControllerRule> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn default_rule(&self) -> ControllerRule {
        (self.default)()
    }

    /// Instantiate and configure a rule by name.
    ///
    /// Never fails: when the name is unknown or the rule rejects its
    /// configuration, the default rule is returned unconfigured and the
    /// cause is logged and reported in [`ResolvedRule::fallback`].
    pub fn resolve(&self, name: &str, configuration: &RuleConfiguration) -> ResolvedRule {
        match self.try_resolve(name, configuration) {
            Ok(rule) => ResolvedRule {
                rule,
                fallback: None,
            },
            Err(err) => {
                error!(
                    rule = name,
                    error = %err,
                    "could not instantiate rule, the default rule will be used for code generation"
                );
                ResolvedRule {
                    rule: self.default_rule(),
                    fallback: Some(err),
                }
            }
        }
    }

    fn try_resolve(
        &self,
        name: &str,
        configuration: &RuleConfiguration,
    ) -> std::result::Result<ControllerRule, RuleResolutionError> {
        let mut rule = self.create(name).ok_or_else(|| RuleResolutionError::Unknown {
            name: name.to_string(),
        })?;

        if configuration.is_empty() {
            return Ok(rule);
        }
        match rule.as_configurable() {
            Some(configurable) => {
                debug!(rule = name, keys = ?configuration.keys().collect::<Vec<_>>(), "applying rule configuration");
                configurable.apply_configuration(configuration).map_err(|e| {
                    RuleResolutionError::Configuration {
                        name: name.to_string(),
                        reason: e.to_string(),
                    }
                })?;
            }
            None => {
                warn!(rule = name, "rule does not accept configuration, options ignored");
            }
        }
        Ok(rule)
    }
}

fn stub_rule() -> ControllerRule {
    Box::new(ControllerStubRule)
}

fn interface_rule() -> ControllerRule {
    Box::new(ControllerInterfaceRule)
}

fn decorator_rule() -> ControllerRule {
    Box::new(ControllerDecoratorRule::default())
}

fn client_rule() -> ControllerRule {
    Box::new(RestTemplateClientRule::default())
}

/// Log configuration keys a rule does not understand
pub(crate) fn ignore_unknown_keys(rule: &str, configuration: &RuleConfiguration, known: &[&str]) {
    for key in configuration.keys() {
        if !known.contains(&key.as_str()) {
            debug!(rule, key = %key, "ignoring unknown rule option");
        }
    }
}

/// Whether `s` is a usable Java identifier
pub(crate) fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !crate::metadata::naming::is_java_keyword(s)
}
