//! Project configuration
//!
//! Handles loading of `ramlsync.yaml`. Every section and field has a
//! default, so an empty file (or no file at all) is a valid configuration.

use crate::error::{Error, Result};
use crate::generate::GeneratorConfig;
use crate::style::StyleConfig;
use crate::verify::VerifyConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default configuration file name
pub const CONFIG_FILE: &str = "ramlsync.yaml";

/// Current configuration schema version
pub const CONFIG_VERSION: u32 = 1;

/// Root project configuration (`ramlsync.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProjectConfig {
    /// Schema version for migrations
    pub version: u32,

    /// Code generation settings
    pub generate: GeneratorConfig,

    /// Style checking settings
    pub check: StyleConfig,

    /// Contract verification settings
    pub verify: VerifyConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            generate: GeneratorConfig::default(),
            check: StyleConfig::default(),
            verify: VerifyConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProjectConfig = serde_norway::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;

        if config.version != CONFIG_VERSION {
            return Err(Error::Config(format!(
                "Unsupported {} version: {}",
                CONFIG_FILE, config.version
            )));
        }
        Ok(config)
    }

    /// Load an explicit configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        debug!(path = %path.display(), "loading configuration");
        Self::from_yaml(&content)
    }

    /// Load `ramlsync.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(CONFIG_FILE);
        if !file.exists() {
            return Ok(None);
        }
        Self::load_from_file(&file).map(Some)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }
}

/// JSON schema of `ramlsync.yaml`, pretty-printed
pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(ProjectConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::NameCase;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ProjectConfig::from_yaml("").unwrap(), ProjectConfig::default());
        assert_eq!(ProjectConfig::from_yaml("{}").unwrap(), ProjectConfig::default());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = ProjectConfig::from_yaml(
            r#"
generate:
  basePackage: com.acme.api
  outputDir: build/generated
  rule: spring4-controller-decorator
  ruleConfiguration:
    delegateFieldName: impl
  useLongIntegers: true
check:
  ignoreCodeStyle: false
  parameterCase: snake
verify:
  failOnWarnings: true
"#,
        )
        .unwrap();

        assert_eq!(config.generate.extractor.base_package, "com.acme.api");
        assert!(config.generate.extractor.use_long_integers);
        assert_eq!(config.generate.output_dir, PathBuf::from("build/generated"));
        assert_eq!(config.generate.rule, "spring4-controller-decorator");
        assert_eq!(
            config.generate.rule_configuration.get("delegateFieldName").map(String::as_str),
            Some("impl")
        );
        // untouched fields keep their defaults
        assert!(config.generate.generate_models);
        assert!(!config.check.ignore_code_style);
        assert_eq!(config.check.parameter_case, NameCase::Snake);
        assert_eq!(config.check.checkers, StyleConfig::default().checkers);
        assert!(config.verify.fail_on_warnings);
        assert!(config.verify.compare_query_parameters);
    }

    #[test]
    fn test_unsupported_version() {
        let err = ProjectConfig::from_yaml("version: 7").unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "check:\n  parameterCase: kebab\n").unwrap();
        let config = ProjectConfig::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.check.parameter_case, NameCase::Kebab);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ProjectConfig::default();
        let parsed = ProjectConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_schema_names_sections() {
        let schema = config_schema().unwrap();
        assert!(schema.contains("\"generate\""));
        assert!(schema.contains("\"ignoreCodeStyle\""));
        assert!(schema.contains("\"basePackage\""));
    }
}
