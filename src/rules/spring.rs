//! Spring MVC types and the annotation/signature helpers shared by the
//! controller rules

use crate::codegen::{Annotation, JavaType, Method, MethodParam, Snippet};
use crate::contract::{ParameterKind, Verb};
use crate::metadata::{ControllerMetadata, EndpointMetadata, ParameterMetadata};

const WEB_BIND: &str = "org.springframework.web.bind.annotation";
const HTTP: &str = "org.springframework.http";

pub(crate) fn web(name: &str) -> JavaType {
    JavaType::new(WEB_BIND, name)
}

pub(crate) fn http(name: &str) -> JavaType {
    JavaType::new(HTTP, name)
}

pub(crate) fn rest_controller() -> Annotation {
    Annotation::new(web("RestController"))
}

pub(crate) fn component() -> Annotation {
    Annotation::new(JavaType::new("org.springframework.stereotype", "Component"))
}

pub(crate) fn autowired() -> Annotation {
    Annotation::new(JavaType::new(
        "org.springframework.beans.factory.annotation",
        "Autowired",
    ))
}

pub(crate) fn qualifier(bean: &str) -> Annotation {
    Annotation::new(JavaType::new(
        "org.springframework.beans.factory.annotation",
        "Qualifier",
    ))
    .with_value(Snippet::quoted(bean))
}

pub(crate) fn value(expression: &str) -> Annotation {
    Annotation::new(JavaType::new(
        "org.springframework.beans.factory.annotation",
        "Value",
    ))
    .with_value(Snippet::quoted(expression))
}

pub(crate) fn rest_template() -> JavaType {
    JavaType::new("org.springframework.web.client", "RestTemplate")
}

pub(crate) fn uri_components_builder() -> JavaType {
    JavaType::new("org.springframework.web.util", "UriComponentsBuilder")
}

/// `ResponseEntity<T>` for the endpoint's success payload
pub(crate) fn response_entity(endpoint: &EndpointMetadata) -> JavaType {
    http("ResponseEntity").with_arg(endpoint.response_type())
}

/// `@RequestMapping("/url")` placed on a controller declaration
pub(crate) fn controller_mapping(controller: &ControllerMetadata) -> Annotation {
    Annotation::new(web("RequestMapping")).with_value(Snippet::quoted(controller.url.clone()))
}

/// `@RequestMapping(value = ..., method = RequestMethod.X, ...)` for one endpoint
pub(crate) fn endpoint_mapping(endpoint: &EndpointMetadata) -> Annotation {
    let mut mapping = Annotation::new(web("RequestMapping"));
    if !endpoint.relative_path.is_empty() {
        mapping = mapping.with_arg("value", Snippet::quoted(endpoint.relative_path.clone()));
    }
    mapping = mapping.with_arg("method", request_method(endpoint.verb));
    if let Some(consumes) = &endpoint.request_content_type {
        mapping = mapping.with_arg("consumes", Snippet::quoted(consumes.clone()));
    }
    if let Some(produces) = &endpoint.response_content_type {
        mapping = mapping.with_arg("produces", Snippet::quoted(produces.clone()));
    }
    mapping
}

pub(crate) fn request_method(verb: Verb) -> Snippet {
    Snippet::new()
        .ty(web("RequestMethod"))
        .text(format!(".{}", verb))
}

pub(crate) fn http_method(verb: Verb) -> Snippet {
    Snippet::new()
        .ty(http("HttpMethod"))
        .text(format!(".{}", verb))
}

fn parameter_annotation(param: &ParameterMetadata) -> Annotation {
    match param.kind {
        ParameterKind::Uri => {
            Annotation::new(web("PathVariable")).with_value(Snippet::quoted(param.name.clone()))
        }
        ParameterKind::Query => {
            let mut annotation = Annotation::new(web("RequestParam"))
                .with_arg("value", Snippet::quoted(param.name.clone()));
            if !param.required {
                annotation = annotation.with_arg("required", Snippet::from("false"));
            }
            if let Some(default) = &param.default {
                annotation = annotation.with_arg("defaultValue", Snippet::quoted(default.clone()));
            }
            annotation
        }
    }
}

/// Java parameters of an endpoint: URI params, query params, then the body.
///
/// With `annotated`, each parameter carries its Spring binding annotation.
pub(crate) fn endpoint_params(endpoint: &EndpointMetadata, annotated: bool) -> Vec<MethodParam> {
    let mut params: Vec<MethodParam> = endpoint
        .parameters()
        .map(|p| {
            let param = MethodParam::new(p.java_type.clone(), p.java_name.clone());
            if annotated {
                param.annotated(parameter_annotation(p))
            } else {
                param
            }
        })
        .collect();

    if let Some(body_type) = endpoint.request_type() {
        let body = MethodParam::new(body_type, body_param_name(endpoint));
        params.push(if annotated {
            body.annotated(Annotation::new(web("RequestBody")))
        } else {
            body
        });
    }
    params
}

/// Name of the request body parameter, never clashing with a path or query name
pub(crate) fn body_param_name(endpoint: &EndpointMetadata) -> String {
    let mut name = endpoint
        .request_body
        .as_ref()
        .map(|b| crate::util::to_camel_case(&b.name))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "body".to_string());
    while endpoint.parameters().any(|p| p.java_name == name) {
        name.push_str("Body");
    }
    name
}

pub(crate) fn endpoint_doc(endpoint: &EndpointMetadata) -> Vec<String> {
    let mut doc = vec![endpoint
        .description
        .clone()
        .unwrap_or_else(|| format!("No description for {}", endpoint.location))];
    for param in endpoint.parameters() {
        if let Some(description) = &param.description {
            doc.push(format!("@param {} {}", param.java_name, description));
        }
    }
    doc
}

/// Public method signature shared by every controller style
pub(crate) fn endpoint_method(endpoint: &EndpointMetadata, annotated: bool) -> Method {
    let mut method = Method::new(response_entity(endpoint), endpoint.name.clone()).public();
    for line in endpoint_doc(endpoint) {
        method = method.with_doc(line);
    }
    if annotated {
        method = method.annotated(endpoint_mapping(endpoint));
    }
    for param in endpoint_params(endpoint, annotated) {
        method = method.with_param(param);
    }
    method
}

/// Javadoc lines for a generated controller
pub(crate) fn controller_doc(controller: &ControllerMetadata) -> Vec<String> {
    let mut doc = Vec::new();
    if let Some(description) = &controller.description {
        doc.push(description.clone());
        doc.push(String::new());
    }
    doc.push(format!(
        "Generated for resource {} ({} endpoints)",
        controller.resource_uri,
        controller.endpoints.len()
    ));
    doc
}
