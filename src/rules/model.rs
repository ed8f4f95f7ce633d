use super::Rule;
use crate::codegen::{CodeModel, DeclarationKind, Field, JavaType, Method, MethodParam, Snippet};
use crate::error::Result;
use crate::metadata::BodyMetadata;
use crate::util::{to_camel_case, to_pascal_case};
use serde_json::Value;
use tracing::debug;

/// Generates a POJO for a JSON schema body: one private field per
/// top-level property with a getter and setter.
///
/// XML schemas and documents that are not JSON objects produce an empty class
/// so that endpoint signatures still compile. Integer properties follow the
/// extractor's `useLongIntegers` setting, as parameters do.
#[derive(Debug, Clone, Default)]
pub struct ModelPojoRule {
    use_long_integers: bool,
}

impl ModelPojoRule {
    pub fn new(use_long_integers: bool) -> Self {
        Self { use_long_integers }
    }

    fn property_type(&self, property: &Value) -> JavaType {
        let ty = property.get("type").and_then(Value::as_str).unwrap_or("");
        match ty {
            "string" => JavaType::lang("String"),
            "integer" if self.use_long_integers => JavaType::lang("Long"),
            "integer" => JavaType::lang("Integer"),
            "number" => JavaType::new("java.math", "BigDecimal"),
            "boolean" => JavaType::lang("Boolean"),
            "array" => {
                let item = property
                    .get("items")
                    .map(|items| self.property_type(items))
                    .unwrap_or_else(|| JavaType::lang("Object"));
                JavaType::new("java.util", "List").with_arg(item)
            }
            _ => JavaType::lang("Object"),
        }
    }
}

/// Top-level properties of a JSON object schema, ordered by name
fn schema_properties(schema: &str) -> Vec<(String, Value)> {
    match serde_json::from_str::<Value>(schema) {
        Ok(Value::Object(root)) => match root.get("properties") {
            Some(Value::Object(properties)) => properties
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        },
        Ok(_) => Vec::new(),
        Err(err) => {
            debug!(error = %err, "schema is not JSON, generating an empty class");
            Vec::new()
        }
    }
}

impl Rule<BodyMetadata> for ModelPojoRule {
    fn name(&self) -> &str {
        "model-pojo"
    }

    fn apply(&self, body: &BodyMetadata, model: &mut CodeModel) -> Result<JavaType> {
        let decl = model.declare(&body.package, &body.name, DeclarationKind::Class)?;
        decl.add_doc(format!("Body type {}", body.key));

        let properties = schema_properties(&body.schema);
        let mut accessors = Vec::with_capacity(properties.len() * 2);
        for (property, definition) in &properties {
            let field_name = to_camel_case(property);
            if field_name.is_empty() || decl.field(&field_name).is_some() {
                continue;
            }
            let ty = self.property_type(definition);
            let accessor = to_pascal_case(property);

            decl.add_field(Field::private(ty.clone(), field_name.clone()));

            let mut getter = Method::new(ty.clone(), format!("get{}", accessor))
                .public()
                .with_body(vec![Snippet::from(format!("return this.{};", field_name))]);
            if let Some(description) = definition.get("description").and_then(Value::as_str) {
                getter = getter.with_doc(description.to_string());
            }
            accessors.push(getter);
            accessors.push(
                Method::new(JavaType::void(), format!("set{}", accessor))
                    .public()
                    .with_param(MethodParam::new(ty, field_name.clone()))
                    .with_body(vec![Snippet::from(format!(
                        "this.{0} = {0};",
                        field_name
                    ))]),
            );
        }
        for method in accessors {
            decl.add_method(method);
        }
        Ok(decl.as_type())
    }
}
