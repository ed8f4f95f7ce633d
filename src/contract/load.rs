//! Extraction of the typed contract model from a RAML document tree

use super::*;
use serde_norway::{Mapping, Value};

const DEFAULT_MEDIA_TYPE: &str = "application/json";

pub(super) fn contract_from_document(document: &Value) -> Result<ContractModel> {
    let root = match document {
        Value::Null => return Ok(ContractModel::default()),
        Value::Mapping(m) => m,
        _ => {
            return Err(Error::ContractParse(
                "document root must be a mapping".into(),
            ))
        }
    };

    let media_type = field_string(root, "mediaType");
    let default_media = media_type
        .clone()
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

    let mut model = ContractModel {
        title: field_string(root, "title"),
        version: field_string(root, "version"),
        base_uri: field_string(root, "baseUri"),
        media_type,
        schemas: parse_schemas(root.get("schemas")),
        resources: Vec::new(),
    };

    for (key, value) in root {
        let Some(key) = scalar_string(key) else {
            continue;
        };
        if key.starts_with('/') {
            model
                .resources
                .push(parse_resource("", &key, value, &default_media)?);
        }
    }

    Ok(model)
}

/// Render a scalar YAML value as text
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        _ => None,
    }
}

fn field_string(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_string)
}

fn parse_schemas(value: Option<&Value>) -> Vec<NamedSchema> {
    let mut schemas = Vec::new();
    let mut push_all = |map: &Mapping| {
        for (name, schema) in map {
            if let (Some(name), Some(schema)) = (scalar_string(name), scalar_string(schema)) {
                schemas.push(NamedSchema { name, schema });
            }
        }
    };

    match value {
        Some(Value::Sequence(entries)) => {
            for entry in entries {
                if let Value::Mapping(map) = entry {
                    push_all(map);
                }
            }
        }
        Some(Value::Mapping(map)) => push_all(map),
        _ => {}
    }
    schemas
}

fn parse_resource(
    parent_uri: &str,
    relative_uri: &str,
    value: &Value,
    default_media: &str,
) -> Result<Resource> {
    let mut resource = Resource::new(parent_uri, relative_uri);
    let map = match value {
        Value::Null => {
            add_implicit_uri_parameters(&mut resource);
            return Ok(resource);
        }
        Value::Mapping(m) => m,
        _ => {
            return Err(Error::ContractParse(format!(
                "resource {} must be a mapping",
                resource.uri
            )))
        }
    };

    resource.display_name = field_string(map, "displayName");
    resource.description = field_string(map, "description");
    resource.uri_parameters =
        parse_parameters(map.get("uriParameters"), ParameterKind::Uri, &resource.uri);
    add_implicit_uri_parameters(&mut resource);

    for (key, value) in map {
        let Some(key) = scalar_string(key) else {
            continue;
        };
        if key.starts_with('/') {
            let child = parse_resource(&resource.uri, &key, value, default_media)?;
            resource.resources.push(child);
        } else if let Some(verb) = Verb::parse(&key) {
            if resource.action(verb).is_some() {
                return Err(Error::ContractParse(format!(
                    "resource {} declares {} more than once",
                    resource.uri,
                    verb.as_str().to_uppercase()
                )));
            }
            let action = parse_action(verb, &resource.uri, value, default_media)?;
            resource.actions.push(action);
        }
    }

    Ok(resource)
}

/// Placeholders in the relative uri that were not declared explicitly
fn add_implicit_uri_parameters(resource: &mut Resource) {
    let mut rest = resource.relative_uri.as_str();
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        if !name.is_empty() && resource.uri_parameter(name).is_none() {
            let param = Parameter::uri(name, resource.uri.clone());
            resource.uri_parameters.push(param);
        }
        rest = &rest[start + len + 1..];
    }
}

fn parse_action(verb: Verb, pointer: &str, value: &Value, default_media: &str) -> Result<Action> {
    let mut action = Action::new(verb, pointer);
    let map = match value {
        Value::Null => return Ok(action),
        Value::Mapping(m) => m,
        _ => {
            return Err(Error::ContractParse(format!(
                "action {} {} must be a mapping",
                verb, pointer
            )))
        }
    };

    action.description = field_string(map, "description");
    action.query_parameters =
        parse_parameters(map.get("queryParameters"), ParameterKind::Query, pointer);
    action.bodies = parse_bodies(map.get("body"), default_media);

    if let Some(Value::Mapping(responses)) = map.get("responses") {
        for (status, response) in responses {
            let Some(status) = scalar_string(status) else {
                continue;
            };
            let response_map = response.as_mapping();
            action.responses.push(Response {
                status,
                description: response_map.and_then(|m| field_string(m, "description")),
                bodies: parse_bodies(response_map.and_then(|m| m.get("body")), default_media),
            });
        }
    }

    Ok(action)
}

fn parse_bodies(value: Option<&Value>, default_media: &str) -> Vec<MimeBody> {
    let Some(Value::Mapping(map)) = value else {
        return Vec::new();
    };

    // `body: { schema: ... }` without an explicit media type
    if map.get("schema").is_some() || map.get("example").is_some() {
        return vec![body_from_map(default_media, map)];
    }

    let mut bodies = Vec::new();
    for (media_type, body) in map {
        let Some(media_type) = scalar_string(media_type) else {
            continue;
        };
        match body {
            Value::Mapping(body_map) => bodies.push(body_from_map(&media_type, body_map)),
            _ => bodies.push(MimeBody::new(media_type)),
        }
    }
    bodies
}

fn body_from_map(media_type: &str, map: &Mapping) -> MimeBody {
    MimeBody {
        media_type: media_type.to_string(),
        schema: field_string(map, "schema"),
        example: field_string(map, "example"),
    }
}

fn parse_parameters(value: Option<&Value>, kind: ParameterKind, pointer: &str) -> Vec<Parameter> {
    let Some(Value::Mapping(map)) = value else {
        return Vec::new();
    };

    let mut parameters = Vec::new();
    for (name, definition) in map {
        let Some(name) = scalar_string(name) else {
            continue;
        };
        let mut param = match kind {
            ParameterKind::Uri => Parameter::uri(name, pointer),
            ParameterKind::Query => Parameter::query(name, pointer),
        };
        if let Value::Mapping(definition) = definition {
            param.display_name = field_string(definition, "displayName");
            param.description = field_string(definition, "description");
            param.param_type = field_string(definition, "type")
                .and_then(|t| ParamType::parse(&t))
                .unwrap_or_default();
            if let Some(required) = definition.get("required").and_then(Value::as_bool) {
                param.required = required;
            }
            param.default = field_string(definition, "default");
            param.example = field_string(definition, "example");
            param.pattern = field_string(definition, "pattern");
            if let Some(Value::Sequence(values)) = definition.get("enum") {
                param.enum_values = values.iter().filter_map(scalar_string).collect();
            }
        }
        parameters.push(param);
    }
    parameters
}
