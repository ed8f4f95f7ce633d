//! Metadata extraction - contract tree to controller metadata

use super::naming::{
    claim_unique, controller_noun, inline_body_class_name, method_name, schema_class_name,
};
use super::*;
use crate::contract::{Action, ContractModel, ContractVisitor, MimeBody, Resource};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A recoverable failure while deriving one endpoint; the endpoint is skipped
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ExtractionError {
    #[error("{location}: schema '{schema}' is neither declared nor an inline schema")]
    UnresolvedSchema { location: String, schema: String },

    #[error("{location}: method {method} is already mapped in {controller}")]
    AmbiguousMapping {
        location: String,
        controller: String,
        method: String,
    },
}

/// Result of one extraction run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub controllers: Vec<ControllerMetadata>,
    pub errors: Vec<ExtractionError>,
}

impl Extraction {
    pub fn endpoint_count(&self) -> usize {
        self.controllers.iter().map(|c| c.endpoints.len()).sum()
    }

    pub fn controller(&self, name: &str) -> Option<&ControllerMetadata> {
        self.controllers.iter().find(|c| c.name == name)
    }
}

/// Extract controllers with the given configuration
pub fn extract(contract: &ContractModel, config: &ExtractorConfig) -> Extraction {
    MetadataExtractor::new(config.clone()).extract(contract)
}

/// Derives controller metadata from contract models
pub struct MetadataExtractor {
    config: ExtractorConfig,
}

impl MetadataExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&self, contract: &ContractModel) -> Extraction {
        let base_path = resolve_base_path(
            self.config.base_uri.as_deref(),
            contract.base_uri.as_deref(),
            contract.version.as_deref(),
        );
        debug!(base_path = %base_path, "resolved base path");

        let mut visitor = ExtractVisitor {
            config: &self.config,
            contract,
            base_path,
            model_package: self.config.model_package(),
            bodies: HashMap::new(),
            body_names: HashSet::new(),
            controller_names: HashSet::new(),
            extraction: Extraction::default(),
        };
        contract.walk(&mut visitor);

        let extraction = visitor.extraction;
        info!(
            controllers = extraction.controllers.len(),
            endpoints = extraction.endpoint_count(),
            errors = extraction.errors.len(),
            "extracted controller metadata"
        );
        extraction
    }
}

/// Resolve the path every controller url is prefixed with.
///
/// An explicitly configured base uri wins over the document's `baseUri`.
/// Scheme and host are dropped, `{version}` is substituted and a lone `/`
/// means no base path at all.
pub fn resolve_base_path(
    configured: Option<&str>,
    document: Option<&str>,
    version: Option<&str>,
) -> String {
    let Some(base) = configured.or(document) else {
        return String::new();
    };
    let mut base = base.trim().to_string();
    if let Some(version) = version {
        base = base.replace("{version}", version);
    }

    let path = match base.find("://") {
        Some(idx) => {
            let rest = &base[idx + 3..];
            rest.find('/')
                .map(|i| rest[i..].to_string())
                .unwrap_or_default()
        }
        None => base,
    };

    let path = path.trim_end_matches('/');
    if path.is_empty() {
        String::new()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

struct ExtractVisitor<'a> {
    config: &'a ExtractorConfig,
    contract: &'a ContractModel,
    base_path: String,
    model_package: String,
    /// Interned bodies for the whole run, keyed by schema identity
    bodies: HashMap<String, Arc<BodyMetadata>>,
    /// Body class names handed out so far
    body_names: HashSet<String>,
    controller_names: HashSet<String>,
    extraction: Extraction,
}

impl ContractVisitor for ExtractVisitor<'_> {
    fn visit_resource(&mut self, resource: &Resource, ancestors: &[&Resource]) {
        if !ancestors.is_empty() {
            return;
        }
        let noun = controller_noun(resource);
        let name = claim_unique(&mut self.controller_names, &noun, "Controller");
        let controller = ControllerMetadata {
            name,
            base_package: self.config.base_package.clone(),
            model_package: self.model_package.clone(),
            url: format!("{}{}", self.base_path, resource.uri),
            resource_uri: resource.uri.clone(),
            description: resource.description.clone(),
            endpoints: Vec::new(),
            dependencies: Vec::new(),
        };
        debug!(controller = %controller.name, url = %controller.url, "new controller");
        self.extraction.controllers.push(controller);
    }

    fn visit_action(&mut self, resource: &Resource, ancestors: &[&Resource], action: &Action) {
        let top_uri = ancestors.first().map_or(resource.uri.as_str(), |r| r.uri.as_str());

        let mut uri_parameters = Vec::new();
        for owner in ancestors.iter().copied().chain(std::iter::once(resource)) {
            for parameter in &owner.uri_parameters {
                uri_parameters.push(ParameterMetadata::from_parameter(
                    parameter,
                    self.config.use_long_integers,
                ));
            }
        }

        let request_bodies: Vec<Option<&MimeBody>> = if action.bodies.is_empty() {
            vec![None]
        } else if self.config.separate_methods_by_content_type && action.bodies.len() > 1 {
            action.bodies.iter().map(Some).collect()
        } else {
            vec![action.bodies.first()]
        };
        let split = request_bodies.len() > 1;

        for request in request_bodies {
            let content_suffix = request.filter(|_| split).map(|b| b.media_type.as_str());
            let result = self.endpoint(
                resource,
                action,
                top_uri,
                uri_parameters.clone(),
                request,
                content_suffix,
            );
            match result {
                Ok(endpoint) => self.add_endpoint(endpoint),
                Err(err) => {
                    warn!(error = %err, "skipping endpoint");
                    self.extraction.errors.push(err);
                }
            }
        }
    }
}

impl ExtractVisitor<'_> {
    fn endpoint(
        &mut self,
        resource: &Resource,
        action: &Action,
        top_uri: &str,
        mut uri_parameters: Vec<ParameterMetadata>,
        request: Option<&MimeBody>,
        content_suffix: Option<&str>,
    ) -> std::result::Result<EndpointMetadata, ExtractionError> {
        let location = action.location();
        let base_name = method_name(action.verb, &resource.uri, None);
        let name = match content_suffix {
            Some(media_type) => method_name(action.verb, &resource.uri, Some(media_type)),
            None => base_name.clone(),
        };

        let request_body = match request {
            Some(body) => self.resolve_body(body, &location, || {
                inline_body_class_name(&name, true)
            })?,
            None => None,
        };

        let response = action
            .success_response()
            .and_then(|r| r.bodies.first());
        let response_body = match response {
            Some(body) => self.resolve_body(body, &location, || {
                inline_body_class_name(&base_name, false)
            })?,
            None => None,
        };

        let mut query_parameters: Vec<ParameterMetadata> = action
            .query_parameters
            .iter()
            .map(|p| ParameterMetadata::from_parameter(p, self.config.use_long_integers))
            .collect();
        let mut taken = HashSet::new();
        for parameter in uri_parameters.iter_mut().chain(query_parameters.iter_mut()) {
            parameter.java_name = claim_unique(&mut taken, &parameter.java_name, "");
        }

        Ok(EndpointMetadata {
            name,
            verb: action.verb,
            resource_uri: resource.uri.clone(),
            relative_path: resource
                .uri
                .strip_prefix(top_uri)
                .unwrap_or(&resource.uri)
                .to_string(),
            description: action.description.clone(),
            uri_parameters,
            query_parameters,
            request_content_type: request.map(|b| b.media_type.clone()),
            request_body,
            response_content_type: response.map(|b| b.media_type.clone()),
            response_body,
            location,
        })
    }

    /// Resolve a body schema to its shared metadata; `None` when untyped
    fn resolve_body(
        &mut self,
        body: &MimeBody,
        location: &str,
        inline_name: impl FnOnce() -> String,
    ) -> std::result::Result<Option<Arc<BodyMetadata>>, ExtractionError> {
        let Some(schema) = body.schema.as_deref().map(str::trim) else {
            return Ok(None);
        };

        let (key, name, text) = if let Some(declared) = self.contract.schema(schema) {
            (
                format!("schema:{}", schema),
                schema_class_name(schema),
                declared.to_string(),
            )
        } else if schema.starts_with('{') || schema.starts_with('<') {
            let digest = Sha256::digest(schema.as_bytes());
            (
                format!("sha256:{}", hex::encode(&digest[..8])),
                inline_name(),
                schema.to_string(),
            )
        } else {
            return Err(ExtractionError::UnresolvedSchema {
                location: location.to_string(),
                schema: schema.to_string(),
            });
        };

        if let Some(interned) = self.bodies.get(&key) {
            return Ok(Some(Arc::clone(interned)));
        }
        let interned = Arc::new(BodyMetadata {
            key: key.clone(),
            name: claim_unique(&mut self.body_names, &name, ""),
            package: self.model_package.clone(),
            schema: text,
            example: body.example.clone(),
        });
        self.bodies.insert(key, Arc::clone(&interned));
        Ok(Some(interned))
    }

    fn add_endpoint(&mut self, endpoint: EndpointMetadata) {
        let Some(controller) = self.extraction.controllers.last_mut() else {
            return;
        };
        if controller.endpoint(&endpoint.name).is_some() {
            let err = ExtractionError::AmbiguousMapping {
                location: endpoint.location,
                controller: controller.name.clone(),
                method: endpoint.name,
            };
            warn!(error = %err, "skipping endpoint");
            self.extraction.errors.push(err);
            return;
        }

        for body in endpoint.request_body.iter().chain(endpoint.response_body.iter()) {
            controller.add_dependency(body);
        }
        debug!(controller = %controller.name, method = %endpoint.name, "mapped endpoint");
        controller.endpoints.push(endpoint);
    }
}
