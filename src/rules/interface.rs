use super::spring;
use super::Rule;
use crate::codegen::{CodeModel, DeclarationKind, JavaType};
use crate::error::Result;
use crate::metadata::ControllerMetadata;

/// Generates a Java interface carrying every mapping annotation; the
/// application supplies the implementing `@RestController`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerInterfaceRule;

impl Rule<ControllerMetadata> for ControllerInterfaceRule {
    fn name(&self) -> &str {
        "spring4-controller-interface"
    }

    fn apply(&self, controller: &ControllerMetadata, model: &mut CodeModel) -> Result<JavaType> {
        let decl = model.declare(
            &controller.base_package,
            &controller.name,
            DeclarationKind::Interface,
        )?;
        for line in spring::controller_doc(controller) {
            decl.add_doc(line);
        }
        decl.annotate(spring::controller_mapping(controller));
        for endpoint in &controller.endpoints {
            decl.add_method(spring::endpoint_method(endpoint, true));
        }
        Ok(decl.as_type())
    }
}
