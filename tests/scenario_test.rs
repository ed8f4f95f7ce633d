//! End-to-end scenarios over small contracts
//!
//! Extraction and style checking of the same document, the way a build
//! plugin runs them one after the other.

use pretty_assertions::assert_eq;
use ramlsync::style::{NameCase, ParameterNamingChecker};
use ramlsync::*;
use rstest::rstest;
use std::path::Path;
use std::sync::Arc;

fn users_contract(query_parameter: &str) -> ContractModel {
    ContractModel::from_yaml(&format!(
        r#"
title: Users
/users:
  get:
    queryParameters:
      {}:
        type: boolean
  /{{id}}:
    get:
"#,
        query_parameter
    ))
    .unwrap()
}

fn naming_only(case: NameCase) -> StyleCheckCoordinator {
    StyleCheckCoordinator::new(vec![Arc::new(ParameterNamingChecker::new(case).unwrap())])
}

#[test]
fn test_users_scenario_extracts_one_controller() {
    let contract = users_contract("verbose");
    let extraction = extract(&contract, &ExtractorConfig::new("com.acme"));

    assert!(extraction.errors.is_empty());
    assert_eq!(extraction.controllers.len(), 1);

    let controller = &extraction.controllers[0];
    assert_eq!(controller.name, "UserController");
    assert_eq!(controller.url, "/users");
    let endpoints: Vec<_> = controller.endpoints.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(endpoints, vec!["getUsers", "getUserById"]);
    assert_eq!(controller.endpoints[0].query_parameters[0].name, "verbose");
}

#[rstest]
#[case("verbose", NameCase::Camel, 0)]
#[case("verbose_output", NameCase::Camel, 1)]
#[case("verboseOutput", NameCase::Snake, 1)]
#[case("verbose-output", NameCase::Kebab, 0)]
#[case("Verbose", NameCase::Kebab, 1)]
#[case("Verbose_Output", NameCase::Any, 0)]
fn test_users_scenario_naming(
    #[case] parameter: &str,
    #[case] case: NameCase,
    #[case] expected: usize,
) {
    let contract = users_contract(parameter);
    let report = naming_only(case).check(&contract, &contract);

    assert_eq!(report.warnings.len(), expected, "{} under {}", parameter, case);
    assert!(report.errors.is_empty());
    for issue in &report.warnings {
        assert_eq!(issue.severity, IssueSeverity::Warning);
        assert_eq!(issue.location, IssueLocation::Contract);
        assert_eq!(issue.issue_type, IssueType::Style);
        assert_eq!(issue.pointer, "/users");
    }
}

#[test]
fn test_empty_contract() {
    let contract = ContractModel::from_yaml("title: Nothing here\n").unwrap();
    assert!(contract.is_empty());

    let extraction = extract(&contract, &ExtractorConfig::default());
    assert!(extraction.controllers.is_empty());
    assert!(extraction.errors.is_empty());

    let coordinator = StyleCheckCoordinator::from_config(&StyleConfig::default()).unwrap();
    let report = coordinator.check(&contract, &contract);
    assert!(report.is_clean());
    assert_eq!(report.invocations, 0);

    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        output_dir: dir.path().to_path_buf(),
        ..GeneratorConfig::default()
    };
    let generated = generate(&contract, &config).unwrap();
    assert_eq!(generated.controllers, 0);
    assert!(generated.files.is_empty());
}

#[test]
fn test_fixture_contract_is_clean_under_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.raml");
    let contract = ContractModel::load(&path).unwrap();

    let extraction = extract(&contract, &ExtractorConfig::new("com.acme"));
    let names: Vec<_> = extraction.controllers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["UserController", "OrderController"]);
    // `{version}` is substituted and the host dropped
    assert_eq!(extraction.controllers[0].url, "/v1/users");
    assert_eq!(extraction.endpoint_count(), 5);

    let coordinator = StyleCheckCoordinator::from_config(&StyleConfig::default()).unwrap();
    let report = coordinator.check(&contract, &contract);
    assert!(report.is_clean(), "{:?}", report.warnings);
}

#[test]
fn test_contract_issues_precede_source_issues() {
    let published = users_contract("verbose_output");
    let implemented = users_contract("also_bad");
    let report = naming_only(NameCase::Camel)
        .with_ignore_code_style(false)
        .check(&published, &implemented);

    let lines: Vec<String> = report.issues().map(|i| i.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "WARNING [CONTRACT/STYLE] /users: Parameter 'verbose_output' should be camelCase",
            "WARNING [SOURCE/STYLE] /users: Parameter 'also_bad' should be camelCase",
        ]
    );
}
