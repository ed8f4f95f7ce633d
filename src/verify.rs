//! Verification - compare a published contract with the implementation
//!
//! Resources are matched by uri (URI parameter names are ignored, so
//! `/users/{id}` matches `/users/{userId}`) and actions by verb. Anything
//! the contract promises but the implementation lacks is an error; anything
//! the implementation exposes without documenting is a warning. Style issues
//! from a [`StyleCheckCoordinator`] are merged into the same report.

use crate::contract::{Action, ContractModel, Resource};
use crate::style::{
    CheckReport, CheckerFailure, Issue, IssueLocation, IssueSeverity, IssueType,
    StyleCheckCoordinator,
};
use crate::util::{is_uri_parameter_segment, path_segments};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Compare two contracts structurally with `config`; no style checks run
pub fn verify_contract(
    published: &ContractModel,
    implemented: &ContractModel,
    config: &VerifyConfig,
) -> VerificationReport {
    ContractVerifier::new(config.clone()).verify(published, implemented)
}

/// Verification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyConfig {
    /// Treat warnings as failures
    pub fail_on_warnings: bool,
    /// Report query parameters the implementation does not accept
    pub compare_query_parameters: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            fail_on_warnings: false,
            compare_query_parameters: true,
        }
    }
}

/// Result of verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// No errors, and no warnings when `fail_on_warnings` is set
    pub passed: bool,
    pub warnings: Vec<Issue>,
    pub errors: Vec<Issue>,
    /// Style checkers that failed on a node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checker_failures: Vec<CheckerFailure>,
    pub resources_compared: usize,
    pub actions_compared: usize,
}

impl VerificationReport {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.errors.iter().chain(self.warnings.iter())
    }
}

/// Contract verifier
pub struct ContractVerifier {
    config: VerifyConfig,
    style: Option<StyleCheckCoordinator>,
}

impl ContractVerifier {
    pub fn new(config: VerifyConfig) -> Self {
        Self {
            config,
            style: None,
        }
    }

    /// Also run style checks and merge their issues
    pub fn with_style(mut self, coordinator: StyleCheckCoordinator) -> Self {
        self.style = Some(coordinator);
        self
    }

    pub fn verify(&self, published: &ContractModel, implemented: &ContractModel) -> VerificationReport {
        let mut run = Comparison::default();

        let contract_side = index(published);
        let source_side = index(implemented);

        for (key, resource) in &contract_side {
            match lookup(&source_side, key) {
                Some(other) => run.compare_resource(resource, other, &self.config),
                None => run.push(
                    IssueSeverity::Error,
                    IssueLocation::Source,
                    IssueType::Missing,
                    "Resource is not implemented",
                    &resource.uri,
                ),
            }
        }
        for (key, resource) in &source_side {
            if lookup(&contract_side, key).is_none() {
                run.push(
                    IssueSeverity::Warning,
                    IssueLocation::Contract,
                    IssueType::Missing,
                    "Resource is implemented but not documented in the contract",
                    &resource.uri,
                );
            }
        }

        if let Some(coordinator) = &self.style {
            run.merge_style(coordinator.check(published, implemented));
        }

        let passed = run.errors.is_empty() && !(self.config.fail_on_warnings && !run.warnings.is_empty());
        info!(
            passed,
            errors = run.errors.len(),
            warnings = run.warnings.len(),
            "contract verification finished"
        );
        VerificationReport {
            passed,
            warnings: run.warnings,
            errors: run.errors,
            checker_failures: run.failures,
            resources_compared: run.resources,
            actions_compared: run.actions,
        }
    }
}

/// `/users/{userId}` -> `/users/{}`
fn match_key(uri: &str) -> String {
    let segments: Vec<&str> = path_segments(uri)
        .into_iter()
        .map(|s| if is_uri_parameter_segment(s) { "{}" } else { s })
        .collect();
    format!("/{}", segments.join("/"))
}

fn index(contract: &ContractModel) -> Vec<(String, &Resource)> {
    contract
        .flatten()
        .into_iter()
        .map(|r| (match_key(&r.uri), r))
        .collect()
}

fn lookup<'a>(side: &[(String, &'a Resource)], key: &str) -> Option<&'a Resource> {
    side.iter().find(|(k, _)| k == key).map(|(_, r)| *r)
}

#[derive(Default)]
struct Comparison {
    warnings: Vec<Issue>,
    errors: Vec<Issue>,
    failures: Vec<CheckerFailure>,
    resources: usize,
    actions: usize,
}

impl Comparison {
    fn push(
        &mut self,
        severity: IssueSeverity,
        location: IssueLocation,
        issue_type: IssueType,
        description: impl Into<String>,
        pointer: &str,
    ) {
        let issue = Issue::new(severity, location, issue_type, description, pointer);
        debug!(%issue, "verification issue");
        match severity {
            IssueSeverity::Warning => self.warnings.push(issue),
            IssueSeverity::Error => self.errors.push(issue),
        }
    }

    fn compare_resource(&mut self, published: &Resource, implemented: &Resource, config: &VerifyConfig) {
        self.resources += 1;
        for action in &published.actions {
            match implemented.action(action.verb) {
                Some(other) => self.compare_action(published, action, other, config),
                None => self.push(
                    IssueSeverity::Error,
                    IssueLocation::Source,
                    IssueType::Missing,
                    format!("{} is not implemented", action.verb),
                    &published.uri,
                ),
            }
        }
        for action in &implemented.actions {
            if published.action(action.verb).is_none() {
                self.push(
                    IssueSeverity::Warning,
                    IssueLocation::Contract,
                    IssueType::Missing,
                    format!("{} is implemented but not documented in the contract", action.verb),
                    &published.uri,
                );
            }
        }
    }

    fn compare_action(
        &mut self,
        resource: &Resource,
        published: &Action,
        implemented: &Action,
        config: &VerifyConfig,
    ) {
        self.actions += 1;
        if !config.compare_query_parameters {
            return;
        }
        for parameter in &published.query_parameters {
            if implemented.query_parameter(&parameter.name).is_none() {
                self.push(
                    IssueSeverity::Warning,
                    IssueLocation::Source,
                    IssueType::Different,
                    format!(
                        "Query parameter '{}' of {} is not accepted by the implementation",
                        parameter.name, published.verb
                    ),
                    &resource.uri,
                );
            }
        }
    }

    fn merge_style(&mut self, report: CheckReport) {
        self.warnings.extend(report.warnings);
        self.errors.extend(report.errors);
        self.failures.extend(report.failures);
    }
}
