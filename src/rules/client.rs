use super::spring;
use super::{ignore_unknown_keys, is_java_identifier, ConfigurableRule, Rule, RuleConfiguration};
use crate::codegen::{CodeModel, DeclarationKind, Field, JavaType, Method, Snippet};
use crate::error::{Error, Result};
use crate::metadata::{ControllerMetadata, EndpointMetadata};

const REST_TEMPLATE_FIELD_NAME: &str = "restTemplateFieldName";
const BASE_URL_CONFIGURATION_PATH: &str = "baseUrlConfigurationPath";
const REST_TEMPLATE_QUALIFIER_BEAN_NAME: &str = "restTemplateQualifierBeanName";

const BASE_URL_FIELD: &str = "baseUrl";

/// Generates a `@Component` HTTP client calling the contract's endpoints
/// through Spring's `RestTemplate`.
///
/// Options:
/// - `restTemplateFieldName`: name of the injected template field (`restTemplate`)
/// - `baseUrlConfigurationPath`: property expression for the base url (`${client.url}`)
/// - `restTemplateQualifierBeanName`: adds `@Qualifier` to the template field
#[derive(Debug, Clone)]
pub struct RestTemplateClientRule {
    rest_template_field_name: String,
    base_url_configuration_path: String,
    rest_template_qualifier: Option<String>,
}

impl Default for RestTemplateClientRule {
    fn default() -> Self {
        Self {
            rest_template_field_name: "restTemplate".to_string(),
            base_url_configuration_path: "${client.url}".to_string(),
            rest_template_qualifier: None,
        }
    }
}

impl RestTemplateClientRule {
    /// `UserController` -> `UserClient`
    pub fn client_name(controller: &ControllerMetadata) -> String {
        let noun = controller
            .name
            .strip_suffix("Controller")
            .filter(|n| !n.is_empty())
            .unwrap_or(&controller.name);
        format!("{}Client", noun)
    }

    fn fields(&self) -> Vec<Field> {
        let mut template = Field::private(spring::rest_template(), self.rest_template_field_name.clone())
            .annotated(spring::autowired());
        if let Some(bean) = &self.rest_template_qualifier {
            template = template.annotated(spring::qualifier(bean));
        }
        let base_url = Field::private(JavaType::lang("String"), BASE_URL_FIELD)
            .annotated(spring::value(&self.base_url_configuration_path));
        vec![template, base_url]
    }

    fn client_method(&self, controller: &ControllerMetadata, endpoint: &EndpointMetadata) -> Method {
        let mut body = vec![Snippet::new()
            .ty(spring::http("HttpHeaders"))
            .text(" httpHeaders = new ")
            .ty(spring::http("HttpHeaders"))
            .text("();")];
        if let Some(content_type) = &endpoint.request_content_type {
            body.push(
                Snippet::new()
                    .text("httpHeaders.setContentType(")
                    .ty(spring::http("MediaType"))
                    .text(".valueOf(")
                    .string(content_type.clone())
                    .text("));"),
            );
        }
        if let Some(accept) = &endpoint.response_content_type {
            body.push(
                Snippet::new()
                    .text("httpHeaders.setAccept(")
                    .ty(JavaType::new("java.util", "Collections"))
                    .text(".singletonList(")
                    .ty(spring::http("MediaType"))
                    .text(".valueOf(")
                    .string(accept.clone())
                    .text(")));"),
            );
        }

        body.push(
            Snippet::new()
                .ty(spring::uri_components_builder())
                .text(" builder = ")
                .ty(spring::uri_components_builder())
                .text(format!(".fromHttpUrl(this.{} + ", BASE_URL_FIELD))
                .string(format!("{}{}", controller.url, endpoint.relative_path))
                .text(");"),
        );
        for param in &endpoint.query_parameters {
            body.push(
                Snippet::new()
                    .text(format!("if ({} != null) builder.queryParam(", param.java_name))
                    .string(param.name.clone())
                    .text(format!(", {});", param.java_name)),
            );
        }
        let uri_args: Vec<&str> = endpoint
            .uri_parameters
            .iter()
            .map(|p| p.java_name.as_str())
            .collect();
        body.push(
            Snippet::new()
                .ty(JavaType::new("java.net", "URI"))
                .text(format!(
                    " uri = builder.buildAndExpand({}).toUri();",
                    uri_args.join(", ")
                )),
        );

        let entity_type = spring::http("HttpEntity")
            .with_arg(endpoint.request_type().unwrap_or_else(|| JavaType::lang("Object")));
        let entity_args = if endpoint.has_request_body() {
            format!("{}, httpHeaders", spring::body_param_name(endpoint))
        } else {
            "httpHeaders".to_string()
        };
        body.push(
            Snippet::new()
                .ty(entity_type)
                .text(" httpEntity = new ")
                .ty(spring::http("HttpEntity"))
                .text(format!("<>({});", entity_args)),
        );

        let response_class = endpoint
            .response_body
            .as_ref()
            .map(|b| b.java_type())
            .unwrap_or_else(|| JavaType::lang("Object"));
        body.push(
            Snippet::new()
                .text(format!(
                    "return this.{}.exchange(uri, ",
                    self.rest_template_field_name
                ))
                .append(spring::http_method(endpoint.verb))
                .text(", httpEntity, ")
                .ty(response_class)
                .text(".class);"),
        );

        spring::endpoint_method(endpoint, false).with_body(body)
    }
}

impl Rule<ControllerMetadata> for RestTemplateClientRule {
    fn name(&self) -> &str {
        "spring4-rest-template-client"
    }

    fn apply(&self, controller: &ControllerMetadata, model: &mut CodeModel) -> Result<JavaType> {
        let decl = model.declare(
            &controller.base_package,
            &Self::client_name(controller),
            DeclarationKind::Class,
        )?;
        decl.add_doc(format!("Client for {}", controller.url))
            .annotate(spring::component());
        for field in self.fields() {
            decl.add_field(field);
        }
        for endpoint in &controller.endpoints {
            decl.add_method(self.client_method(controller, endpoint));
        }
        Ok(decl.as_type())
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableRule> {
        Some(self)
    }
}

impl ConfigurableRule for RestTemplateClientRule {
    fn apply_configuration(&mut self, configuration: &RuleConfiguration) -> Result<()> {
        ignore_unknown_keys(
            self.name(),
            configuration,
            &[
                REST_TEMPLATE_FIELD_NAME,
                BASE_URL_CONFIGURATION_PATH,
                REST_TEMPLATE_QUALIFIER_BEAN_NAME,
            ],
        );

        if let Some(name) = configuration.get(REST_TEMPLATE_FIELD_NAME) {
            if !is_java_identifier(name) || name == BASE_URL_FIELD {
                return Err(Error::Rule(format!(
                    "{} '{}' is not a usable field name",
                    REST_TEMPLATE_FIELD_NAME, name
                )));
            }
            self.rest_template_field_name = name.clone();
        }
        if let Some(path) = configuration.get(BASE_URL_CONFIGURATION_PATH) {
            if path.trim().is_empty() {
                return Err(Error::Rule(format!("{} must not be empty", BASE_URL_CONFIGURATION_PATH)));
            }
            self.base_url_configuration_path = path.clone();
        }
        if let Some(bean) = configuration.get(REST_TEMPLATE_QUALIFIER_BEAN_NAME) {
            self.rest_template_qualifier = (!bean.trim().is_empty()).then(|| bean.clone());
        }
        Ok(())
    }
}
