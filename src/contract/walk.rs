//! Depth-first traversal of the resource tree
//!
//! Visit order for every resource is pre-order: the resource itself, its
//! URI parameters, then each action immediately followed by that action's
//! query parameters, and only then the nested resources. Siblings are
//! visited in document order.

use super::{Action, ContractModel, Parameter, Resource};

/// Callbacks invoked by [`ContractModel::walk`]. All methods default to no-ops.
pub trait ContractVisitor {
    /// `ancestors` lists the enclosing resources, outermost first
    fn visit_resource(&mut self, _resource: &Resource, _ancestors: &[&Resource]) {}

    fn visit_uri_parameter(&mut self, _resource: &Resource, _parameter: &Parameter) {}

    fn visit_action(&mut self, _resource: &Resource, _ancestors: &[&Resource], _action: &Action) {}

    fn visit_query_parameter(&mut self, _action: &Action, _parameter: &Parameter) {}
}

impl ContractModel {
    /// Walk every resource, action and parameter exactly once
    pub fn walk<V: ContractVisitor + ?Sized>(&self, visitor: &mut V) {
        walk_resources(&self.resources, &mut Vec::new(), visitor);
    }

    /// Every resource in walk order
    pub fn flatten(&self) -> Vec<&Resource> {
        fn collect<'a>(resources: &'a [Resource], out: &mut Vec<&'a Resource>) {
            for resource in resources {
                out.push(resource);
                collect(&resource.resources, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.resources, &mut out);
        out
    }
}

/// Walk a resource forest below the given ancestor chain
pub fn walk_resources<'a, V: ContractVisitor + ?Sized>(
    resources: &'a [Resource],
    ancestors: &mut Vec<&'a Resource>,
    visitor: &mut V,
) {
    for resource in resources {
        visitor.visit_resource(resource, ancestors);

        for parameter in &resource.uri_parameters {
            visitor.visit_uri_parameter(resource, parameter);
        }

        for action in &resource.actions {
            visitor.visit_action(resource, ancestors, action);
            for parameter in &action.query_parameters {
                visitor.visit_query_parameter(action, parameter);
            }
        }

        ancestors.push(resource);
        walk_resources(&resource.resources, ancestors, visitor);
        ancestors.pop();
    }
}
