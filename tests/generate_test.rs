//! Generation through the rule registry, down to files on disk

use pretty_assertions::assert_eq;
use ramlsync::*;
use rstest::rstest;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn fixture() -> ContractModel {
    ContractModel::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.raml"))
        .unwrap()
}

fn config(dir: &Path, rule: &str) -> GeneratorConfig {
    GeneratorConfig {
        extractor: ExtractorConfig::new("com.acme"),
        output_dir: dir.to_path_buf(),
        rule: rule.to_string(),
        provenance: false,
        ..GeneratorConfig::default()
    }
}

fn relative_files(report: &GenerationReport) -> Vec<String> {
    let mut files: Vec<String> = report
        .files
        .iter()
        .map(|f| {
            f.strip_prefix(&report.output_dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

/// Every file below `dir`, keyed by relative path
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, String> {
    fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                collect(root, &path, out);
            } else {
                let content = std::fs::read_to_string(&path).unwrap();
                out.insert(path.strip_prefix(root).unwrap().to_path_buf(), content);
            }
        }
    }
    let mut out = BTreeMap::new();
    collect(dir, dir, &mut out);
    out
}

#[test]
fn test_stub_rule_build_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = generate(&fixture(), &config(dir.path(), DEFAULT_RULE)).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.controllers, 2);
    assert_eq!(
        relative_files(&report),
        vec![
            "com/acme/OrderController.java",
            "com/acme/UserController.java",
            "com/acme/model/User.java",
        ]
    );

    let controller = std::fs::read_to_string(dir.path().join("com/acme/UserController.java")).unwrap();
    assert!(controller.starts_with("package com.acme;"));
    assert!(controller.contains("@RestController"));
    assert!(controller.contains("@RequestMapping(\"/v1/users\")"));
    assert!(controller.contains("public ResponseEntity<User> getUsers("));
    assert!(controller.contains("import com.acme.model.User;"));
    assert!(controller.contains("return new ResponseEntity<>(HttpStatus.OK);"));

    let model = std::fs::read_to_string(dir.path().join("com/acme/model/User.java")).unwrap();
    assert!(model.contains("private Integer id;"));
    assert!(model.contains("public String getName()"));
}

#[rstest]
#[case(DEFAULT_RULE, 2, 0)]
#[case("spring4-controller-interface", 2, 0)]
#[case("spring4-controller-decorator", 4, 0)]
#[case("spring4-rest-template-client", 2, 0)]
#[case("com.example.NoSuchRule", 2, 1)]
fn test_each_rule_writes_every_controller(
    #[case] rule: &str,
    #[case] controller_files: usize,
    #[case] fallbacks: usize,
) {
    let dir = tempfile::tempdir().unwrap();
    let report = generate(&fixture(), &config(dir.path(), rule)).unwrap();

    assert_eq!(report.controllers, 2);
    assert!(report.application_errors.is_empty());
    assert_eq!(report.rule_fallback.iter().count(), fallbacks);
    if fallbacks > 0 {
        assert_eq!(report.rule, DEFAULT_RULE);
    } else {
        assert_eq!(report.rule, rule);
    }
    // plus the single shared body class
    assert_eq!(report.files.len(), controller_files + 1);
}

#[test]
fn test_rejected_configuration_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), "spring4-controller-decorator");
    config
        .rule_configuration
        .insert("delegateFieldName".into(), "not a field".into());

    let report = generate(&fixture(), &config).unwrap();
    assert_eq!(report.rule, DEFAULT_RULE);
    assert!(matches!(
        report.rule_fallback,
        Some(RuleResolutionError::Configuration { ref name, .. }) if name == "spring4-controller-decorator"
    ));
    assert_eq!(report.controllers, 2);
}

#[test]
fn test_rule_configuration_reaches_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), "spring4-controller-decorator");
    config
        .rule_configuration
        .insert("delegateFieldName".into(), "userService".into());

    let report = generate(&fixture(), &config).unwrap();
    assert!(report.rule_fallback.is_none());
    let decorator =
        std::fs::read_to_string(dir.path().join("com/acme/UserControllerDecorator.java")).unwrap();
    assert!(decorator.contains("private UserController userService;"));
    assert!(decorator.contains("return this.userService.getUsers("));
}

#[test]
fn test_generation_is_repeatable() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    generate(&fixture(), &config(first.path(), "spring4-rest-template-client")).unwrap();
    generate(&fixture(), &config(second.path(), "spring4-rest-template-client")).unwrap();

    let a = snapshot(first.path());
    assert_eq!(a.len(), 3);
    assert_eq!(a, snapshot(second.path()));
}

#[rstest]
#[case(DEFAULT_RULE)]
#[case("spring4-controller-interface")]
#[case("spring4-controller-decorator")]
#[case("spring4-rest-template-client")]
fn test_rule_instance_reuse_does_not_leak(#[case] rule_name: &str) {
    let extraction = extract(&fixture(), &ExtractorConfig::new("com.acme"));
    let registry = RuleRegistry::with_defaults();
    let (users, orders) = (&extraction.controllers[0], &extraction.controllers[1]);

    // one instance for both controllers, users first
    let shared = registry.create(rule_name).unwrap();
    let mut first = CodeModel::new();
    shared.apply(users, &mut first).unwrap();
    let mut reused = CodeModel::new();
    shared.apply(orders, &mut reused).unwrap();

    let mut fresh = CodeModel::new();
    registry.create(rule_name).unwrap().apply(orders, &mut fresh).unwrap();

    assert_eq!(reused.to_source_string().unwrap(), fresh.to_source_string().unwrap());
}

#[test]
fn test_report_serializes_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let report = generate(&fixture(), &config(dir.path(), "missing")).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rule_fallback"]["kind"], "unknown");
    assert_eq!(json["rule_fallback"]["name"], "missing");
}

#[test]
fn test_resources_with_the_same_controller_noun_get_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let contract = ContractModel::from_yaml("/users:\n  get:\n/user:\n  delete:\n").unwrap();
    let report = generate(&contract, &config(dir.path(), DEFAULT_RULE)).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.controllers, 2);
    assert_eq!(
        relative_files(&report),
        vec!["com/acme/User2Controller.java", "com/acme/UserController.java"]
    );
    let users = std::fs::read_to_string(dir.path().join("com/acme/UserController.java")).unwrap();
    let user = std::fs::read_to_string(dir.path().join("com/acme/User2Controller.java")).unwrap();
    assert!(users.contains("getUsers("));
    assert!(user.contains("deleteUser("));
    assert!(!user.contains("getUsers("));
}

#[test]
fn test_schemas_with_the_same_class_name_keep_the_controller() {
    let dir = tempfile::tempdir().unwrap();
    let contract = ContractModel::from_yaml(
        r#"
schemas:
  - user-profile: '{"type": "object", "properties": {"name": {"type": "string"}}}'
  - userProfile: '{"type": "object", "properties": {"nick": {"type": "string"}}}'
/users:
  get:
    responses:
      200:
        body:
          application/json:
            schema: user-profile
  post:
    body:
      application/json:
        schema: userProfile
"#,
    )
    .unwrap();
    let report = generate(&contract, &config(dir.path(), DEFAULT_RULE)).unwrap();

    assert!(report.application_errors.is_empty(), "{:?}", report.application_errors);
    assert_eq!(report.controllers, 1);
    assert_eq!(
        relative_files(&report),
        vec![
            "com/acme/UserController.java",
            "com/acme/model/UserProfile.java",
            "com/acme/model/UserProfile2.java",
        ]
    );
    let second =
        std::fs::read_to_string(dir.path().join("com/acme/model/UserProfile2.java")).unwrap();
    assert!(second.contains("private String nick;"));
}

#[test]
fn test_parameter_names_are_valid_java() {
    let dir = tempfile::tempdir().unwrap();
    let contract = ContractModel::from_yaml(
        r#"
/users:
  /{id}:
    get:
      queryParameters:
        id:
        class:
"#,
    )
    .unwrap();
    let report = generate(&contract, &config(dir.path(), DEFAULT_RULE)).unwrap();
    assert!(report.is_clean());

    let source = std::fs::read_to_string(dir.path().join("com/acme/UserController.java")).unwrap();
    assert!(source.contains("String id,"));
    assert!(source.contains("String id2,"));
    assert!(source.contains("String classParam)"));
    assert!(source.contains("\"class\""));
    assert!(!source.contains("String class)"));
}

#[test]
fn test_long_integers_reach_model_classes() {
    let dir = tempfile::tempdir().unwrap();
    let contract = ContractModel::from_yaml(
        r#"
schemas:
  - counter: '{"type": "object", "properties": {"count": {"type": "integer"}}}'
/counters:
  get:
    responses:
      200:
        body:
          application/json:
            schema: counter
"#,
    )
    .unwrap();
    let mut config = config(dir.path(), DEFAULT_RULE);
    config.extractor.use_long_integers = true;
    generate(&contract, &config).unwrap();

    let source = std::fs::read_to_string(dir.path().join("com/acme/model/Counter.java")).unwrap();
    assert!(source.contains("private Long count;"));
}
