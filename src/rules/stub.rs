//! Default rule: a runnable `@RestController` skeleton

use super::spring;
use super::Rule;
use crate::codegen::{CodeModel, DeclarationKind, JavaType, Snippet};
use crate::error::Result;
use crate::metadata::ControllerMetadata;

/// Generates a `@RestController` class whose methods answer `200 OK` with
/// an empty body, ready to be filled in by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerStubRule;

impl Rule<ControllerMetadata> for ControllerStubRule {
    fn name(&self) -> &str {
        "spring4-controller-stub"
    }

    fn apply(&self, controller: &ControllerMetadata, model: &mut CodeModel) -> Result<JavaType> {
        let decl = model.declare(
            &controller.base_package,
            &controller.name,
            DeclarationKind::Class,
        )?;
        for line in spring::controller_doc(controller) {
            decl.add_doc(line);
        }
        decl.annotate(spring::rest_controller())
            .annotate(spring::controller_mapping(controller));

        for endpoint in &controller.endpoints {
            let ok = Snippet::new()
                .text("return new ")
                .ty(spring::http("ResponseEntity"))
                .text("<>(")
                .ty(spring::http("HttpStatus"))
                .text(".OK);");
            decl.add_method(spring::endpoint_method(endpoint, true).with_body(vec![ok]));
        }
        Ok(decl.as_type())
    }
}
