//! Generation driver - contract to Spring MVC sources on disk
//!
//! Extracts controller metadata, resolves the configured rule once and
//! applies it to every controller. Body classes are generated with the
//! `model-pojo` rule the first time a controller depends on them. A failing
//! controller is reported and skipped; only an unusable output directory
//! aborts the run.

use crate::codegen::CodeModel;
use crate::contract::ContractModel;
use crate::error::{Error, Result};
use crate::metadata::{extract, ControllerMetadata, ExtractionError, ExtractorConfig};
use crate::rules::{ModelPojoRule, Rule, RuleConfiguration, RuleRegistry, RuleResolutionError, DEFAULT_RULE};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Generation settings (`generate` section of `ramlsync.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(flatten)]
    pub extractor: ExtractorConfig,

    /// Root directory for generated sources
    pub output_dir: PathBuf,

    /// Write into a fresh `<output_dir>/<epoch millis>` folder
    pub add_timestamp_folder: bool,

    /// Controller rule identifier
    pub rule: String,

    /// Options handed to the rule before it is applied
    pub rule_configuration: RuleConfiguration,

    /// Generate classes for request/response bodies
    pub generate_models: bool,

    /// Prefix every file with a provenance header
    pub provenance: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            output_dir: PathBuf::from("target/generated-sources/spring-mvc"),
            add_timestamp_folder: false,
            rule: DEFAULT_RULE.to_string(),
            rule_configuration: RuleConfiguration::new(),
            generate_models: true,
            provenance: true,
        }
    }
}

impl GeneratorConfig {
    /// Directory this run writes into
    pub fn resolve_output_dir(&self) -> PathBuf {
        if self.add_timestamp_folder {
            self.output_dir
                .join(Utc::now().timestamp_millis().to_string())
        } else {
            self.output_dir.clone()
        }
    }
}

/// A controller whose code could not be generated or written
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("could not generate {controller}: {message}")]
pub struct RuleApplicationError {
    pub controller: String,
    pub message: String,
}

/// Outcome of [`generate`]
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    /// Rule actually applied
    pub rule: String,
    /// Why the configured rule was replaced by the default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_fallback: Option<RuleResolutionError>,
    /// Controllers generated successfully
    pub controllers: usize,
    pub files: Vec<PathBuf>,
    pub extraction_errors: Vec<ExtractionError>,
    pub application_errors: Vec<RuleApplicationError>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.rule_fallback.is_none()
            && self.extraction_errors.is_empty()
            && self.application_errors.is_empty()
    }
}

/// Generate sources for every controller of `contract`
pub fn generate(contract: &ContractModel, config: &GeneratorConfig) -> Result<GenerationReport> {
    generate_with_registry(contract, config, &RuleRegistry::with_defaults())
}

/// [`generate`] with a caller-supplied rule registry
pub fn generate_with_registry(
    contract: &ContractModel,
    config: &GeneratorConfig,
    registry: &RuleRegistry,
) -> Result<GenerationReport> {
    let output_dir = config.resolve_output_dir();
    std::fs::create_dir_all(&output_dir).map_err(Error::Io)?;

    let extraction = extract(contract, &config.extractor);
    let resolved = registry.resolve(&config.rule, &config.rule_configuration);
    let body_rule = ModelPojoRule::new(config.extractor.use_long_integers);
    let header = if config.provenance {
        provenance_header(contract)?
    } else {
        Vec::new()
    };
    info!(
        rule = resolved.rule.name(),
        controllers = extraction.controllers.len(),
        output = %output_dir.display(),
        "generating controllers"
    );

    let mut report = GenerationReport {
        output_dir: output_dir.clone(),
        rule: resolved.rule.name().to_string(),
        rule_fallback: resolved.fallback,
        controllers: 0,
        files: Vec::new(),
        extraction_errors: extraction.errors,
        application_errors: Vec::new(),
    };

    let mut emitted_bodies: HashSet<String> = HashSet::new();
    for controller in &extraction.controllers {
        let mut model = CodeModel::new().with_header(header.clone());
        let bodies = if config.generate_models {
            pending_bodies(controller, &emitted_bodies)
        } else {
            Vec::new()
        };

        let outcome = apply_controller(
            controller,
            &bodies,
            resolved.rule.as_ref(),
            &body_rule,
            &mut model,
            &output_dir,
        );
        match outcome {
            Ok(files) => {
                debug!(controller = %controller.name, files = files.len(), "controller written");
                emitted_bodies.extend(bodies);
                report.controllers += 1;
                report.files.extend(files);
            }
            Err(err) => {
                let failure = RuleApplicationError {
                    controller: controller.qualified_name(),
                    message: err.to_string(),
                };
                error!(error = %failure, "skipping controller");
                report.application_errors.push(failure);
            }
        }
    }

    Ok(report)
}

/// Keys of dependencies not yet written by an earlier controller
fn pending_bodies(controller: &ControllerMetadata, emitted: &HashSet<String>) -> Vec<String> {
    controller
        .dependencies
        .iter()
        .filter(|b| !emitted.contains(&b.key))
        .map(|b| b.key.clone())
        .collect()
}

fn apply_controller(
    controller: &ControllerMetadata,
    bodies: &[String],
    rule: &dyn Rule<ControllerMetadata>,
    body_rule: &ModelPojoRule,
    model: &mut CodeModel,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    for body in controller
        .dependencies
        .iter()
        .filter(|b| bodies.contains(&b.key))
    {
        body_rule.apply(body, model)?;
    }
    rule.apply(controller, model)?;
    model.build(output_dir)
}

/// Comment lines identifying the contract a file was generated from
fn provenance_header(contract: &ContractModel) -> Result<Vec<String>> {
    let digest = Sha256::digest(contract.to_json()?.as_bytes());
    let title = contract.title.as_deref().unwrap_or("untitled contract");
    Ok(vec![
        format!("GENERATED FROM: {}", title),
        format!("CONTRACT HASH: sha256:{}", hex::encode(&digest[..8])),
        format!("GENERATED: {}", Utc::now().to_rfc3339()),
        "DO NOT EDIT - regenerate from the contract".to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = r#"
title: Shop
baseUri: /api
schemas:
  - item: '{"type": "object", "properties": {"sku": {"type": "string"}}}'
/items:
  get:
    responses:
      200:
        body:
          application/json:
            schema: item
/orders:
  post:
    body:
      application/json:
        schema: item
"#;

    fn config(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            extractor: ExtractorConfig::new("com.shop"),
            output_dir: dir.to_path_buf(),
            provenance: false,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_generate_writes_controllers_and_models_once() {
        let dir = tempfile::tempdir().unwrap();
        let contract = ContractModel::from_yaml(CONTRACT).unwrap();
        let report = generate(&contract, &config(dir.path())).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.controllers, 2);
        assert_eq!(report.rule, DEFAULT_RULE);
        // Item is shared by both controllers but written once
        assert_eq!(report.files.len(), 3);
        assert!(dir.path().join("com/shop/model/Item.java").exists());
        assert!(dir.path().join("com/shop/ItemController.java").exists());
        assert!(dir.path().join("com/shop/OrderController.java").exists());
    }

    #[test]
    fn test_timestamp_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            add_timestamp_folder: true,
            ..config(dir.path())
        };
        let resolved = config.resolve_output_dir();
        assert_eq!(resolved.parent(), Some(dir.path()));
        let millis: i64 = resolved
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap()
            .parse()
            .unwrap();
        assert!(millis > 0);
    }

    #[test]
    fn test_provenance_header() {
        let dir = tempfile::tempdir().unwrap();
        let contract = ContractModel::from_yaml(CONTRACT).unwrap();
        let config = GeneratorConfig {
            provenance: true,
            generate_models: false,
            ..config(dir.path())
        };
        let report = generate(&contract, &config).unwrap();
        assert_eq!(report.files.len(), 2);
        let source = std::fs::read_to_string(&report.files[0]).unwrap();
        assert!(source.contains("// GENERATED FROM: Shop"));
        assert!(source.contains("// DO NOT EDIT"));
        assert!(source.contains("// CONTRACT HASH: sha256:"));
    }

    struct FailOnOrders;

    impl Rule<ControllerMetadata> for FailOnOrders {
        fn name(&self) -> &str {
            "fail-on-orders"
        }

        fn apply(&self, controller: &ControllerMetadata, model: &mut CodeModel) -> Result<crate::codegen::JavaType> {
            if controller.name == "OrderController" {
                return Err(Error::Rule("orders are not supported".into()));
            }
            let decl = model.declare(&controller.base_package, &controller.name, crate::codegen::DeclarationKind::Class)?;
            Ok(decl.as_type())
        }
    }

    fn fail_on_orders() -> crate::rules::ControllerRule {
        Box::new(FailOnOrders)
    }

    #[test]
    fn test_failing_controller_is_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let contract = ContractModel::from_yaml(CONTRACT).unwrap();
        let mut registry = RuleRegistry::with_defaults();
        registry.register("fail-on-orders", fail_on_orders);
        let config = GeneratorConfig {
            rule: "fail-on-orders".into(),
            ..config(dir.path())
        };

        let report = generate_with_registry(&contract, &config, &registry).unwrap();
        assert_eq!(report.controllers, 1);
        assert_eq!(
            report.application_errors,
            vec![RuleApplicationError {
                controller: "com.shop.OrderController".into(),
                message: "Rule error: orders are not supported".into(),
            }]
        );
        assert!(dir.path().join("com/shop/ItemController.java").exists());
        assert!(!dir.path().join("com/shop/OrderController.java").exists());
    }

    #[test]
    fn test_unknown_rule_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let contract = ContractModel::from_yaml(CONTRACT).unwrap();
        let config = GeneratorConfig {
            rule: "no-such-rule".into(),
            ..config(dir.path())
        };
        let report = generate(&contract, &config).unwrap();
        assert_eq!(report.rule, DEFAULT_RULE);
        assert!(matches!(report.rule_fallback, Some(RuleResolutionError::Unknown { .. })));
        assert_eq!(report.controllers, 2);
    }

    #[test]
    fn test_unwritable_output_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let contract = ContractModel::from_yaml(CONTRACT).unwrap();
        let err = generate(&contract, &config(&blocker.join("out"))).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
