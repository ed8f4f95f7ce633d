//! Contract model - typed view over a parsed RAML document
//!
//! A contract is a tree of [`Resource`]s keyed by path segment. Every
//! resource holds its [`Action`]s (one per HTTP verb) and every action
//! holds its query [`Parameter`]s. All child collections keep document
//! order so that traversals and the diagnostics they produce are
//! reproducible.
//!
//! Each node carries a `pointer` (the full resource uri) that is used as
//! the location token in reported issues.

mod load;
mod walk;

pub use walk::{walk_resources, ContractVisitor};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP verb of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Head,
        Verb::Options,
    ];

    /// Parse a verb key, case-insensitive
    pub fn parse(s: &str) -> Option<Verb> {
        Verb::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
    }

    /// Lowercase key as written in a RAML document
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
            Verb::Head => "head",
            Verb::Options => "options",
        }
    }

    /// Whether requests with this verb conventionally carry a body
    pub fn expects_body(&self) -> bool {
        matches!(self, Verb::Post | Verb::Put | Verb::Patch)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Where a parameter is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Uri,
    Query,
}

/// Declared parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Date,
    File,
}

impl ParamType {
    pub fn parse(s: &str) -> Option<ParamType> {
        match s.trim().to_lowercase().as_str() {
            "string" => Some(ParamType::String),
            "integer" => Some(ParamType::Integer),
            "number" => Some(ParamType::Number),
            "boolean" => Some(ParamType::Boolean),
            "date" => Some(ParamType::Date),
            "file" => Some(ParamType::File),
            _ => None,
        }
    }
}

/// A URI or query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Uri of the owning resource
    pub pointer: String,
}

impl Parameter {
    /// Required string URI parameter
    pub fn uri(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::new(name.into(), ParameterKind::Uri, true, pointer.into())
    }

    /// Optional string query parameter
    pub fn query(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::new(name.into(), ParameterKind::Query, false, pointer.into())
    }

    fn new(name: String, kind: ParameterKind, required: bool, pointer: String) -> Self {
        Self {
            name,
            kind,
            display_name: None,
            description: None,
            param_type: ParamType::String,
            required,
            default: None,
            example: None,
            pattern: None,
            enum_values: Vec::new(),
            pointer,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }
}

/// A request or response payload for one media type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MimeBody {
    pub media_type: String,
    /// Schema name (declared at the root) or inline schema text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl MimeBody {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            schema: None,
            example: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// A response declaration for one status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bodies: Vec<MimeBody>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.starts_with('2')
    }
}

/// One HTTP verb handler under a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub verb: Verb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bodies: Vec<MimeBody>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<Response>,
    /// Uri of the owning resource
    pub pointer: String,
}

impl Action {
    pub fn new(verb: Verb, pointer: impl Into<String>) -> Self {
        Self {
            verb,
            description: None,
            query_parameters: Vec::new(),
            bodies: Vec::new(),
            responses: Vec::new(),
            pointer: pointer.into(),
        }
    }

    pub fn with_query_parameter(mut self, parameter: Parameter) -> Self {
        self.query_parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, body: MimeBody) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.responses.push(response);
        self
    }

    pub fn query_parameter(&self, name: &str) -> Option<&Parameter> {
        self.query_parameters.iter().find(|p| p.name == name)
    }

    pub fn has_body(&self) -> bool {
        !self.bodies.is_empty()
    }

    /// First 2xx response, in document order
    pub fn success_response(&self) -> Option<&Response> {
        self.responses.iter().find(|r| r.is_success())
    }

    /// Display location such as `GET /users/{id}`
    pub fn location(&self) -> String {
        format!("{} {}", self.verb, self.pointer)
    }
}

/// A node in the API path hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Path segment key, e.g. `/{id}`
    pub relative_uri: String,
    /// Full path from the document root, e.g. `/users/{id}`
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uri_parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl Resource {
    /// Create a resource under `parent_uri` (empty for top-level resources)
    pub fn new(parent_uri: &str, relative_uri: impl Into<String>) -> Self {
        let relative_uri = relative_uri.into();
        Self {
            uri: format!("{}{}", parent_uri, relative_uri),
            relative_uri,
            display_name: None,
            description: None,
            uri_parameters: Vec::new(),
            actions: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_uri_parameter(mut self, parameter: Parameter) -> Self {
        self.uri_parameters.push(parameter);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn action(&self, verb: Verb) -> Option<&Action> {
        self.actions.iter().find(|a| a.verb == verb)
    }

    pub fn resource(&self, relative_uri: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.relative_uri == relative_uri)
    }

    pub fn uri_parameter(&self, name: &str) -> Option<&Parameter> {
        self.uri_parameters.iter().find(|p| p.name == name)
    }
}

/// A root-level named schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSchema {
    pub name: String,
    pub schema: String,
}

/// The parsed contract document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<NamedSchema>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl ContractModel {
    /// Parse a RAML document from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: serde_norway::Value =
            serde_norway::from_str(yaml).map_err(|e| Error::ContractParse(e.to_string()))?;
        Self::from_document(&document)
    }

    /// Load a RAML document from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content).map_err(|e| match e {
            Error::ContractParse(msg) => {
                Error::ContractParse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Build the model from an already-parsed document tree
    pub fn from_document(document: &serde_norway::Value) -> Result<Self> {
        load::contract_from_document(document)
    }

    /// Serialize the model to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Json)
    }

    /// Look up a root-level schema by name
    pub fn schema(&self, name: &str) -> Option<&str> {
        self.schemas
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.schema.as_str())
    }

    /// Find a resource anywhere in the tree by its full uri
    pub fn find_resource(&self, uri: &str) -> Option<&Resource> {
        fn find<'a>(resources: &'a [Resource], uri: &str) -> Option<&'a Resource> {
            for resource in resources {
                if resource.uri == uri {
                    return Some(resource);
                }
                if uri.starts_with(resource.uri.as_str()) {
                    if let Some(found) = find(&resource.resources, uri) {
                        return Some(found);
                    }
                }
            }
            None
        }
        find(&self.resources, uri)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_parse_is_case_insensitive() {
        assert_eq!(Verb::parse("GET"), Some(Verb::Get));
        assert_eq!(Verb::parse("patch"), Some(Verb::Patch));
        assert_eq!(Verb::parse("fetch"), None);
        assert_eq!(Verb::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_resource_builder_computes_uri() {
        let child = Resource::new("/users", "/{id}");
        assert_eq!(child.uri, "/users/{id}");
        let top = Resource::new("", "/users").with_resource(child);
        assert!(top.resource("/{id}").is_some());
    }

    #[test]
    fn test_find_resource() {
        let model = ContractModel {
            resources: vec![Resource::new("", "/users")
                .with_resource(Resource::new("/users", "/{id}"))],
            ..Default::default()
        };
        assert!(model.find_resource("/users/{id}").is_some());
        assert!(model.find_resource("/orders").is_none());
    }

    #[test]
    fn test_success_response() {
        let action = Action::new(Verb::Get, "/users")
            .with_response(Response {
                status: "404".into(),
                description: None,
                bodies: vec![],
            })
            .with_response(Response {
                status: "200".into(),
                description: None,
                bodies: vec![],
            });
        assert_eq!(action.success_response().map(|r| r.status.as_str()), Some("200"));
        assert_eq!(action.location(), "GET /users");
    }
}
