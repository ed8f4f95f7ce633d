//! Published contract vs implementation-derived contract

use pretty_assertions::assert_eq;
use ramlsync::style::{CheckResult, CheckerError, StyleChecker};
use ramlsync::*;
use std::path::Path;
use std::sync::Arc;

fn fixture() -> ContractModel {
    ContractModel::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.raml"))
        .unwrap()
}

/// What a scan of the running service might report back
const IMPLEMENTED: &str = r#"
/users:
  get:
    responses:
      200:
  post:
    body:
      application/json:
  /{userId}:
    get:
      responses:
        200:
    put:
      body:
        application/json:
/Orders:
  get:
    responses:
      200:
"#;

/// Fails on every action, as a checker with a bug would
struct Broken;

impl StyleChecker for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn check_action_style(&self, _verb: Verb, action: &Action, _location: IssueLocation) -> CheckResult {
        Err(CheckerError::new(format!("cannot read {}", action.location())))
    }
}

#[test]
fn test_fixture_against_itself_passes() {
    let contract = fixture();
    let report = verify_contract(&contract, &contract, &VerifyConfig::default());
    assert!(report.passed);
    assert_eq!(report.issues().count(), 0);
    assert_eq!(report.resources_compared, 3);
    assert_eq!(report.actions_compared, 5);
}

#[test]
fn test_structural_differences() {
    let implemented = ContractModel::from_yaml(IMPLEMENTED).unwrap();
    let report = verify_contract(&fixture(), &implemented, &VerifyConfig::default());

    assert!(!report.passed);
    let errors: Vec<String> = report.errors.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        errors,
        vec![
            "ERROR [SOURCE/MISSING] /users/{id}: DELETE is not implemented",
            "ERROR [SOURCE/MISSING] /orders: Resource is not implemented",
        ]
    );
    let warnings: Vec<String> = report.warnings.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        warnings,
        vec![
            "WARNING [SOURCE/DIFFERENT] /users: Query parameter 'verbose' of GET is not accepted by the implementation",
            "WARNING [CONTRACT/MISSING] /users/{id}: PUT is implemented but not documented in the contract",
            "WARNING [CONTRACT/MISSING] /Orders: Resource is implemented but not documented in the contract",
        ]
    );
}

#[test]
fn test_query_parameter_comparison_can_be_disabled() {
    let implemented = ContractModel::from_yaml(IMPLEMENTED).unwrap();
    let config = VerifyConfig {
        compare_query_parameters: false,
        ..VerifyConfig::default()
    };
    let report = verify_contract(&fixture(), &implemented, &config);
    assert!(report
        .issues()
        .all(|i| i.issue_type != IssueType::Different));
}

#[test]
fn test_source_style_merged_when_code_style_checked() {
    let implemented = ContractModel::from_yaml(IMPLEMENTED).unwrap();
    let style = StyleConfig {
        ignore_code_style: false,
        ..StyleConfig::default()
    };
    let report = ContractVerifier::new(VerifyConfig::default())
        .with_style(StyleCheckCoordinator::from_config(&style).unwrap())
        .verify(&fixture(), &implemented);

    let source_style: Vec<String> = report
        .warnings
        .iter()
        .filter(|i| i.issue_type == IssueType::Style)
        .map(|i| i.to_string())
        .collect();
    assert_eq!(
        source_style,
        vec![
            "WARNING [SOURCE/STYLE] /Orders: Resource segment 'Orders' should use lowercase letters, digits and hyphens",
        ]
    );
}

#[test]
fn test_checker_failures_are_carried_over() {
    let contract = fixture();
    let coordinator = StyleCheckCoordinator::new(vec![Arc::new(Broken)]);
    let report = ContractVerifier::new(VerifyConfig::default())
        .with_style(coordinator)
        .verify(&contract, &contract);

    // a broken checker never fails verification on its own
    assert!(report.passed);
    assert_eq!(report.checker_failures.len(), 5);
    assert_eq!(report.checker_failures[0].checker, "broken");
    assert_eq!(report.checker_failures[0].pointer, "GET /users");
    assert_eq!(report.checker_failures[0].message, "cannot read GET /users");
}
