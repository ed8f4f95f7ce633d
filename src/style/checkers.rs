//! Built-in style checkers. All of them report WARNING/STYLE issues.

use super::{CheckResult, Issue, IssueLocation, StyleChecker};
use crate::contract::{Action, Parameter, Resource, Verb};
use crate::error::{Error, Result};
use crate::util::{is_plural, is_uri_parameter_segment, path_segments};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Naming convention for parameter names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// `pageSize`
    #[default]
    Camel,
    /// `page_size`
    Snake,
    /// `page-size`
    Kebab,
    /// No convention enforced
    Any,
}

impl NameCase {
    fn pattern(&self) -> Option<&'static str> {
        match self {
            NameCase::Camel => Some(r"^[a-z][a-zA-Z0-9]*$"),
            NameCase::Snake => Some(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$"),
            NameCase::Kebab => Some(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$"),
            NameCase::Any => None,
        }
    }
}

impl std::fmt::Display for NameCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameCase::Camel => write!(f, "camelCase"),
            NameCase::Snake => write!(f, "snake_case"),
            NameCase::Kebab => write!(f, "kebab-case"),
            NameCase::Any => write!(f, "any case"),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid pattern {}: {}", pattern, e)))
}

/// Flags URI and query parameter names that break the configured [`NameCase`]
#[derive(Debug, Clone)]
pub struct ParameterNamingChecker {
    case: NameCase,
    pattern: Option<Regex>,
}

impl ParameterNamingChecker {
    pub const NAME: &'static str = "parameter-naming";

    pub fn new(case: NameCase) -> Result<Self> {
        let pattern = case.pattern().map(compile).transpose()?;
        Ok(Self { case, pattern })
    }

    pub fn case(&self) -> NameCase {
        self.case
    }
}

impl StyleChecker for ParameterNamingChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check_parameter_style(
        &self,
        name: &str,
        parameter: &Parameter,
        location: IssueLocation,
    ) -> CheckResult {
        match &self.pattern {
            Some(pattern) if !pattern.is_match(name) => Ok(vec![Issue::style(
                location,
                format!("Parameter '{}' should be {}", name, self.case),
                parameter.pointer.clone(),
            )]),
            _ => Ok(Vec::new()),
        }
    }
}

/// Resource path segments should be lowercase words joined by hyphens
#[derive(Debug, Clone)]
pub struct ResourceUrlStyleChecker {
    segment: Regex,
}

impl ResourceUrlStyleChecker {
    pub const NAME: &'static str = "resource-url-style";

    pub fn new() -> Result<Self> {
        Ok(Self {
            segment: compile(r"^[a-z0-9]+(-[a-z0-9]+)*$")?,
        })
    }
}

impl StyleChecker for ResourceUrlStyleChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check_resource_style(
        &self,
        key: &str,
        resource: &Resource,
        location: IssueLocation,
    ) -> CheckResult {
        Ok(path_segments(key)
            .into_iter()
            .filter(|s| !is_uri_parameter_segment(s) && !self.segment.is_match(s))
            .map(|s| {
                Issue::style(
                    location,
                    format!(
                        "Resource segment '{}' should use lowercase letters, digits and hyphens",
                        s
                    ),
                    resource.uri.clone(),
                )
            })
            .collect())
    }
}

/// A resource addressed by an id child (`/users/{id}`) is a collection
/// and should have a plural name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceCollectionPluralisationChecker;

impl ResourceCollectionPluralisationChecker {
    pub const NAME: &'static str = "collection-pluralisation";
}

impl StyleChecker for ResourceCollectionPluralisationChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check_resource_style(
        &self,
        key: &str,
        resource: &Resource,
        location: IssueLocation,
    ) -> CheckResult {
        let Some(last) = path_segments(key).pop() else {
            return Ok(Vec::new());
        };
        if is_uri_parameter_segment(last) {
            return Ok(Vec::new());
        }
        let has_item_child = resource.resources.iter().any(|child| {
            matches!(path_segments(&child.relative_uri).first(), Some(s) if is_uri_parameter_segment(s))
        });
        if has_item_child && !is_plural(last) {
            return Ok(vec![Issue::style(
                location,
                format!("Collection resource '{}' should be plural", last),
                resource.uri.clone(),
            )]);
        }
        Ok(Vec::new())
    }
}

/// Request bodies and responses that do not fit the verb
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionBodyChecker;

impl ActionBodyChecker {
    pub const NAME: &'static str = "action-body";
}

impl StyleChecker for ActionBodyChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check_action_style(&self, verb: Verb, action: &Action, location: IssueLocation) -> CheckResult {
        let mut issues = Vec::new();
        let pointer = action.location();
        match verb {
            Verb::Get | Verb::Delete if action.has_body() => issues.push(Issue::style(
                location,
                format!("{} requests should not carry a body", verb),
                pointer.clone(),
            )),
            Verb::Post | Verb::Put | Verb::Patch if !action.has_body() => issues.push(Issue::style(
                location,
                format!("{} request declares no body", verb),
                pointer.clone(),
            )),
            _ => {}
        }
        if verb == Verb::Get && action.success_response().is_none() {
            issues.push(Issue::style(
                location,
                "GET declares no successful (2xx) response",
                pointer,
            ));
        }
        Ok(issues)
    }
}
