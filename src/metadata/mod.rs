//! Controller metadata derived from a contract
//!
//! The extractor turns a [`ContractModel`](crate::contract::ContractModel)
//! into one [`ControllerMetadata`] per top-level resource. Every action
//! becomes an [`EndpointMetadata`]; request and response schemas become
//! [`BodyMetadata`] shared between the endpoints (and controllers) that
//! reference the same schema.

mod extract;
pub mod naming;

pub use extract::{extract, resolve_base_path, Extraction, ExtractionError, MetadataExtractor};

use crate::codegen::JavaType;
use crate::contract::{ParamType, Parameter, ParameterKind, Verb};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Java package of generated controllers
    pub base_package: String,

    /// Overrides the document `baseUri`; `/` means no base path
    pub base_uri: Option<String>,

    /// Generate one method per request content type
    pub separate_methods_by_content_type: bool,

    /// Map `integer` parameters to `Long` instead of `Integer`
    pub use_long_integers: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_package: "com.gen".to_string(),
            base_uri: None,
            separate_methods_by_content_type: false,
            use_long_integers: false,
        }
    }
}

impl ExtractorConfig {
    pub fn new(base_package: impl Into<String>) -> Self {
        Self {
            base_package: base_package.into(),
            ..Self::default()
        }
    }

    /// Package for generated body classes
    pub fn model_package(&self) -> String {
        if self.base_package.is_empty() {
            "model".to_string()
        } else {
            format!("{}.model", self.base_package)
        }
    }
}

/// A request/response schema, shared by every endpoint that references it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyMetadata {
    /// Interning key: `schema:<name>` or `sha256:<digest>` of inline text
    pub key: String,
    /// Java class name
    pub name: String,
    pub package: String,
    /// Resolved schema text
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl BodyMetadata {
    pub fn java_type(&self) -> JavaType {
        JavaType::new(&self.package, &self.name)
    }
}

/// A URI or query parameter of an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    /// Name as declared in the contract
    pub name: String,
    /// Java identifier, unique within the endpoint's method signature
    pub java_name: String,
    pub java_type: JavaType,
    pub kind: ParameterKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterMetadata {
    pub fn from_parameter(parameter: &Parameter, use_long_integers: bool) -> Self {
        Self {
            name: parameter.name.clone(),
            java_name: naming::parameter_name(&parameter.name),
            java_type: java_type_for(parameter.param_type, use_long_integers),
            kind: parameter.kind,
            required: parameter.required,
            default: parameter.default.clone(),
            description: parameter.description.clone(),
        }
    }
}

/// Java type used for a contract parameter type
pub fn java_type_for(param_type: ParamType, use_long_integers: bool) -> JavaType {
    match param_type {
        ParamType::String => JavaType::lang("String"),
        ParamType::Integer if use_long_integers => JavaType::lang("Long"),
        ParamType::Integer => JavaType::lang("Integer"),
        ParamType::Number => JavaType::new("java.math", "BigDecimal"),
        ParamType::Boolean => JavaType::lang("Boolean"),
        ParamType::Date => JavaType::new("java.util", "Date"),
        ParamType::File => JavaType::new("org.springframework.web.multipart", "MultipartFile"),
    }
}

/// One mapped method, derived from one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointMetadata {
    /// Java method name
    pub name: String,
    pub verb: Verb,
    /// Full uri of the originating resource
    pub resource_uri: String,
    /// Path relative to the controller url, empty for the controller root
    pub relative_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub uri_parameters: Vec<ParameterMetadata>,
    pub query_parameters: Vec<ParameterMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Arc<BodyMetadata>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Arc<BodyMetadata>>,
    /// Position in the contract, e.g. `GET /users/{id}`
    pub location: String,
}

impl EndpointMetadata {
    /// Whether the action declares a request payload
    pub fn has_request_body(&self) -> bool {
        self.request_content_type.is_some()
    }

    /// Java type of the request payload; untyped bodies map to `Object`
    pub fn request_type(&self) -> Option<JavaType> {
        if !self.has_request_body() {
            return None;
        }
        Some(
            self.request_body
                .as_ref()
                .map(|b| b.java_type())
                .unwrap_or_else(|| JavaType::lang("Object")),
        )
    }

    /// Java type of the success payload; `?` when untyped
    pub fn response_type(&self) -> JavaType {
        self.response_body
            .as_ref()
            .map(|b| b.java_type())
            .unwrap_or_else(JavaType::wildcard)
    }

    /// URI parameters followed by query parameters
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterMetadata> {
        self.uri_parameters.iter().chain(self.query_parameters.iter())
    }
}

/// One generated controller, grouping the endpoints of a top-level resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerMetadata {
    /// Java class name, e.g. `UserController`
    pub name: String,
    pub base_package: String,
    pub model_package: String,
    /// Base path plus the top-level resource uri
    pub url: String,
    pub resource_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub endpoints: Vec<EndpointMetadata>,
    /// Distinct bodies referenced by the endpoints, first reference first
    pub dependencies: Vec<Arc<BodyMetadata>>,
}

impl ControllerMetadata {
    pub fn qualified_name(&self) -> String {
        self.java_type().qualified_name()
    }

    pub fn java_type(&self) -> JavaType {
        JavaType::new(&self.base_package, &self.name)
    }

    pub fn endpoint(&self, name: &str) -> Option<&EndpointMetadata> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    fn add_dependency(&mut self, body: &Arc<BodyMetadata>) {
        if !self.dependencies.iter().any(|d| d.key == body.key) {
            self.dependencies.push(Arc::clone(body));
        }
    }
}
