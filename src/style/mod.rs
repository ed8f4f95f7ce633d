//! Style checking - walk contract trees and collect categorized issues
//!
//! A [`StyleCheckCoordinator`] walks the published contract (and, unless
//! code style is ignored, the implementation-derived contract) and asks every
//! registered [`StyleChecker`] about every resource, action and parameter.
//! Each call to [`StyleCheckCoordinator::check`] owns its own accumulator,
//! so a coordinator can be reused and repeated runs yield identical reports.

mod checkers;

pub use checkers::{
    ActionBodyChecker, NameCase, ParameterNamingChecker, ResourceCollectionPluralisationChecker,
    ResourceUrlStyleChecker,
};

use crate::contract::{Action, ContractModel, ContractVisitor, Parameter, Resource, Verb};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Warning,
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Which tree an issue was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueLocation {
    /// The published contract
    Contract,
    /// The contract derived from the implementation
    Source,
}

impl std::fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueLocation::Contract => write!(f, "CONTRACT"),
            IssueLocation::Source => write!(f, "SOURCE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Style,
    Semantic,
    /// Present on one side only
    Missing,
    /// Present on both sides with different shape
    Different,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::Style => write!(f, "STYLE"),
            IssueType::Semantic => write!(f, "SEMANTIC"),
            IssueType::Missing => write!(f, "MISSING"),
            IssueType::Different => write!(f, "DIFFERENT"),
        }
    }
}

/// A reported finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub location: IssueLocation,
    pub issue_type: IssueType,
    pub description: String,
    /// Document path the issue refers to, e.g. `/users/{id}`
    pub pointer: String,
}

impl Issue {
    pub fn new(
        severity: IssueSeverity,
        location: IssueLocation,
        issue_type: IssueType,
        description: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            location,
            issue_type,
            description: description.into(),
            pointer: pointer.into(),
        }
    }

    /// WARNING/STYLE issue, the only kind the built-in checkers raise
    pub fn style(
        location: IssueLocation,
        description: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        Self::new(
            IssueSeverity::Warning,
            location,
            IssueType::Style,
            description,
            pointer,
        )
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}/{}] {}: {}",
            self.severity, self.location, self.issue_type, self.pointer, self.description
        )
    }
}

/// Failure of one checker while evaluating one node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CheckerError {
    pub message: String,
}

impl CheckerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type CheckResult = std::result::Result<Vec<Issue>, CheckerError>;

/// Strategy consulted for every node of a walked contract.
///
/// Checkers hold no run state; the same instance may be registered more
/// than once and is then invoked once per registration.
pub trait StyleChecker: Send + Sync {
    fn name(&self) -> &str;

    /// `key` is the resource's path segment as written, e.g. `/{id}`
    fn check_resource_style(
        &self,
        _key: &str,
        _resource: &Resource,
        _location: IssueLocation,
    ) -> CheckResult {
        Ok(Vec::new())
    }

    fn check_action_style(&self, _verb: Verb, _action: &Action, _location: IssueLocation) -> CheckResult {
        Ok(Vec::new())
    }

    fn check_parameter_style(
        &self,
        _name: &str,
        _parameter: &Parameter,
        _location: IssueLocation,
    ) -> CheckResult {
        Ok(Vec::new())
    }
}

/// Progress of a single check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPhase {
    Initial,
    WalkingContract,
    WalkingSource,
    Done,
}

/// A checker that failed on a node; the node counts as having no issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerFailure {
    pub checker: String,
    pub pointer: String,
    pub message: String,
}

/// Outcome of one [`StyleCheckCoordinator::check`] call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub warnings: Vec<Issue>,
    pub errors: Vec<Issue>,
    pub failures: Vec<CheckerFailure>,
    /// Checker calls made, one per checker per applicable node
    pub invocations: usize,
    pub phase: CheckPhase,
}

impl Default for CheckReport {
    fn default() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
            failures: Vec::new(),
            invocations: 0,
            phase: CheckPhase::Initial,
        }
    }
}

impl CheckReport {
    /// Warnings followed by errors
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.warnings.iter().chain(self.errors.iter())
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    fn enter(&mut self, phase: CheckPhase) {
        debug!(from = ?self.phase, to = ?phase, "style check phase");
        self.phase = phase;
    }

    fn record(&mut self, issues: Vec<Issue>) {
        for issue in issues {
            match issue.severity {
                IssueSeverity::Warning => self.warnings.push(issue),
                IssueSeverity::Error => self.errors.push(issue),
            }
        }
    }
}

/// Runs every registered checker over the published and implemented trees
#[derive(Clone)]
pub struct StyleCheckCoordinator {
    checkers: Vec<Arc<dyn StyleChecker>>,
    ignore_code_style: bool,
}

impl StyleCheckCoordinator {
    pub fn new(checkers: Vec<Arc<dyn StyleChecker>>) -> Self {
        Self {
            checkers,
            ignore_code_style: true,
        }
    }

    /// Build from configuration, skipping unknown checker names
    pub fn from_config(config: &StyleConfig) -> Result<Self> {
        let mut checkers: Vec<Arc<dyn StyleChecker>> = Vec::new();
        for name in &config.checkers {
            match name.as_str() {
                ParameterNamingChecker::NAME => {
                    checkers.push(Arc::new(ParameterNamingChecker::new(config.parameter_case)?))
                }
                ResourceUrlStyleChecker::NAME => checkers.push(Arc::new(ResourceUrlStyleChecker::new()?)),
                ResourceCollectionPluralisationChecker::NAME => {
                    checkers.push(Arc::new(ResourceCollectionPluralisationChecker))
                }
                ActionBodyChecker::NAME => checkers.push(Arc::new(ActionBodyChecker)),
                unknown => warn!(checker = unknown, "unknown style checker, skipping"),
            }
        }
        Ok(Self::new(checkers).with_ignore_code_style(config.ignore_code_style))
    }

    /// When false, the implementation-derived tree is checked too
    pub fn with_ignore_code_style(mut self, ignore: bool) -> Self {
        self.ignore_code_style = ignore;
        self
    }

    pub fn with_checker(mut self, checker: Arc<dyn StyleChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub fn ignore_code_style(&self) -> bool {
        self.ignore_code_style
    }

    pub fn checker_names(&self) -> Vec<&str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// Check both trees. Contract issues come first, each tree in pre-order.
    pub fn check(&self, published: &ContractModel, implemented: &ContractModel) -> CheckReport {
        let mut report = CheckReport::default();

        report.enter(CheckPhase::WalkingContract);
        self.walk(published, IssueLocation::Contract, &mut report);

        if !self.ignore_code_style {
            report.enter(CheckPhase::WalkingSource);
            self.walk(implemented, IssueLocation::Source, &mut report);
        }

        report.enter(CheckPhase::Done);
        debug!(
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            failures = report.failures.len(),
            invocations = report.invocations,
            "style check finished"
        );
        report
    }

    fn walk(&self, contract: &ContractModel, location: IssueLocation, report: &mut CheckReport) {
        let mut pass = CheckPass {
            checkers: &self.checkers,
            location,
            report,
        };
        contract.walk(&mut pass);
    }
}

/// One walk over one tree, writing into the run's report
struct CheckPass<'a> {
    checkers: &'a [Arc<dyn StyleChecker>],
    location: IssueLocation,
    report: &'a mut CheckReport,
}

impl CheckPass<'_> {
    fn each(&mut self, pointer: &str, call: impl Fn(&dyn StyleChecker) -> CheckResult) {
        for checker in self.checkers {
            self.report.invocations += 1;
            match call(checker.as_ref()) {
                Ok(issues) => self.report.record(issues),
                Err(err) => {
                    warn!(checker = checker.name(), pointer, error = %err, "style checker failed");
                    self.report.failures.push(CheckerFailure {
                        checker: checker.name().to_string(),
                        pointer: pointer.to_string(),
                        message: err.message,
                    });
                }
            }
        }
    }
}

impl ContractVisitor for CheckPass<'_> {
    fn visit_resource(&mut self, resource: &Resource, _ancestors: &[&Resource]) {
        let location = self.location;
        self.each(&resource.uri, |c| {
            c.check_resource_style(&resource.relative_uri, resource, location)
        });
    }

    fn visit_uri_parameter(&mut self, _resource: &Resource, parameter: &Parameter) {
        let location = self.location;
        self.each(&parameter.pointer, |c| {
            c.check_parameter_style(&parameter.name, parameter, location)
        });
    }

    fn visit_action(&mut self, _resource: &Resource, _ancestors: &[&Resource], action: &Action) {
        let location = self.location;
        self.each(&action.location(), |c| {
            c.check_action_style(action.verb, action, location)
        });
    }

    fn visit_query_parameter(&mut self, _action: &Action, parameter: &Parameter) {
        let location = self.location;
        self.each(&parameter.pointer, |c| {
            c.check_parameter_style(&parameter.name, parameter, location)
        });
    }
}

/// `check` section of the project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    /// Skip style checks of the implementation-derived contract
    pub ignore_code_style: bool,

    /// Naming convention enforced on URI and query parameters
    pub parameter_case: NameCase,

    /// Checkers to run, in order
    pub checkers: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            ignore_code_style: true,
            parameter_case: NameCase::Camel,
            checkers: vec![
                ResourceUrlStyleChecker::NAME.to_string(),
                ResourceCollectionPluralisationChecker::NAME.to_string(),
                ActionBodyChecker::NAME.to_string(),
                ParameterNamingChecker::NAME.to_string(),
            ],
        }
    }
}
