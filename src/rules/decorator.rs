use super::spring;
use super::{ignore_unknown_keys, is_java_identifier, ConfigurableRule, Rule, RuleConfiguration};
use crate::codegen::{Annotation, CodeModel, DeclarationKind, Field, JavaType, Snippet};
use crate::error::{Error, Result};
use crate::metadata::ControllerMetadata;

const DELEGATE_FIELD_NAME: &str = "delegateFieldName";

/// Generates a plain interface `<Name>` for the business logic plus a
/// `<Name>Decorator` `@RestController` that owns the HTTP mapping and
/// forwards every call to an injected implementation of that interface.
#[derive(Debug, Clone)]
pub struct ControllerDecoratorRule {
    delegate_field_name: String,
}

impl Default for ControllerDecoratorRule {
    fn default() -> Self {
        Self {
            delegate_field_name: "delegate".to_string(),
        }
    }
}

impl ControllerDecoratorRule {
    pub fn delegate_field_name(&self) -> &str {
        &self.delegate_field_name
    }
}

impl Rule<ControllerMetadata> for ControllerDecoratorRule {
    fn name(&self) -> &str {
        "spring4-controller-decorator"
    }

    fn apply(&self, controller: &ControllerMetadata, model: &mut CodeModel) -> Result<JavaType> {
        let interface = model.declare(
            &controller.base_package,
            &controller.name,
            DeclarationKind::Interface,
        )?;
        for line in spring::controller_doc(controller) {
            interface.add_doc(line);
        }
        for endpoint in &controller.endpoints {
            interface.add_method(spring::endpoint_method(endpoint, false));
        }
        let interface_type = interface.as_type();

        let decorator = model.declare(
            &controller.base_package,
            &format!("{}Decorator", controller.name),
            DeclarationKind::Class,
        )?;
        decorator
            .add_doc(format!("HTTP mapping for {{@link {}}}", controller.name))
            .annotate(spring::rest_controller())
            .annotate(spring::controller_mapping(controller))
            .add_field(
                Field::private(interface_type.clone(), self.delegate_field_name.clone())
                    .annotated(spring::autowired()),
            );
        decorator.implements.push(interface_type.clone());

        for endpoint in &controller.endpoints {
            let args: Vec<String> = spring::endpoint_params(endpoint, false)
                .into_iter()
                .map(|p| p.name)
                .collect();
            let call = Snippet::from(format!(
                "return this.{}.{}({});",
                self.delegate_field_name,
                endpoint.name,
                args.join(", ")
            ));
            let method = spring::endpoint_method(endpoint, true)
                .annotated(Annotation::new(JavaType::lang("Override")))
                .with_body(vec![call]);
            decorator.add_method(method);
        }

        Ok(interface_type)
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableRule> {
        Some(self)
    }
}

impl ConfigurableRule for ControllerDecoratorRule {
    fn apply_configuration(&mut self, configuration: &RuleConfiguration) -> Result<()> {
        ignore_unknown_keys(self.name(), configuration, &[DELEGATE_FIELD_NAME]);
        if let Some(name) = configuration.get(DELEGATE_FIELD_NAME) {
            if !is_java_identifier(name) {
                return Err(Error::Rule(format!(
                    "{} '{}' is not a valid Java identifier",
                    DELEGATE_FIELD_NAME, name
                )));
            }
            self.delegate_field_name = name.clone();
        }
        Ok(())
    }
}
