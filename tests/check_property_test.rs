//! Property-based tests for the style check walk
//!
//! Uses proptest to build random resource trees and checks that every node
//! reaches every checker exactly once per walked tree.

use proptest::prelude::*;
use ramlsync::contract::{Action, ContractModel, Parameter, Resource, Verb};
use ramlsync::style::{CheckResult, IssueLocation, StyleCheckCoordinator, StyleChecker};
use ramlsync::Issue;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Counts calls and remembers which node each call was about
#[derive(Default)]
struct Recorder {
    calls: AtomicUsize,
    seen: Mutex<BTreeMap<String, usize>>,
}

impl Recorder {
    fn record(&self, node: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap().entry(node).or_default() += 1;
    }
}

impl StyleChecker for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn check_resource_style(&self, _key: &str, resource: &Resource, _: IssueLocation) -> CheckResult {
        self.record(format!("R {}", resource.uri));
        Ok(Vec::new())
    }

    fn check_action_style(&self, _verb: Verb, action: &Action, _: IssueLocation) -> CheckResult {
        self.record(format!("A {}", action.location()));
        Ok(Vec::new())
    }

    fn check_parameter_style(&self, name: &str, parameter: &Parameter, _: IssueLocation) -> CheckResult {
        self.record(format!("P {:?} {} {}", parameter.kind, parameter.pointer, name));
        Ok(Vec::new())
    }
}

/// Flags every resource, so issue counts are predictable
struct EveryResource;

impl StyleChecker for EveryResource {
    fn name(&self) -> &str {
        "every-resource"
    }

    fn check_resource_style(&self, _key: &str, resource: &Resource, location: IssueLocation) -> CheckResult {
        Ok(vec![Issue::style(location, "flagged", resource.uri.clone())])
    }
}

/// (verbs, query parameter count per action, has a `{id}` child, children)
#[derive(Debug, Clone)]
struct Shape {
    verbs: Vec<Verb>,
    query_parameters: usize,
    item_child: bool,
    children: Vec<Shape>,
}

fn leaf_shape() -> impl Strategy<Value = Shape> {
    (
        prop::sample::subsequence(Verb::ALL.to_vec(), 0..=3),
        0usize..3,
        any::<bool>(),
    )
        .prop_map(|(verbs, query_parameters, item_child)| Shape {
            verbs,
            query_parameters,
            item_child,
            children: Vec::new(),
        })
}

fn any_shape() -> impl Strategy<Value = Shape> {
    leaf_shape().prop_recursive(3, 24, 3, |inner| {
        (leaf_shape(), prop::collection::vec(inner, 0..3)).prop_map(|(mut shape, children)| {
            shape.children = children;
            shape
        })
    })
}

fn any_contract() -> impl Strategy<Value = ContractModel> {
    prop::collection::vec(any_shape(), 0..4).prop_map(|shapes| ContractModel {
        resources: shapes
            .iter()
            .enumerate()
            .map(|(i, s)| build("", &format!("/r{}", i), s))
            .collect(),
        ..ContractModel::default()
    })
}

fn build(parent: &str, relative: &str, shape: &Shape) -> Resource {
    let mut resource = Resource::new(parent, relative);
    for verb in &shape.verbs {
        let mut action = Action::new(*verb, resource.uri.clone());
        for q in 0..shape.query_parameters {
            let name = format!("{}{}", verb.as_str(), q);
            action = action.with_query_parameter(Parameter::query(name, resource.uri.clone()));
        }
        resource = resource.with_action(action);
    }
    if shape.item_child {
        let uri = resource.uri.clone();
        let item = Resource::new(&uri, "/{id}")
            .with_uri_parameter(Parameter::uri("id", format!("{}/{{id}}", uri)));
        resource = resource.with_resource(item);
    }
    for (i, child) in shape.children.iter().enumerate() {
        let uri = resource.uri.clone();
        resource = resource.with_resource(build(&uri, &format!("/c{}", i), child));
    }
    resource
}

/// Resources + uri parameters + actions + query parameters
fn node_count(contract: &ContractModel) -> usize {
    contract
        .flatten()
        .iter()
        .map(|r| {
            1 + r.uri_parameters.len()
                + r.actions.len()
                + r.actions.iter().map(|a| a.query_parameters.len()).sum::<usize>()
        })
        .sum()
}

fn coordinator(k: usize) -> (StyleCheckCoordinator, Vec<Arc<Recorder>>) {
    let recorders: Vec<Arc<Recorder>> = (0..k).map(|_| Arc::new(Recorder::default())).collect();
    let checkers = recorders
        .iter()
        .map(|r| r.clone() as Arc<dyn StyleChecker>)
        .collect();
    (StyleCheckCoordinator::new(checkers), recorders)
}

proptest! {
    #[test]
    fn test_every_node_visited_once(contract in any_contract()) {
        let (coordinator, recorders) = coordinator(1);
        coordinator.check(&contract, &ContractModel::default());

        let nodes = node_count(&contract);
        prop_assert_eq!(recorders[0].calls.load(Ordering::SeqCst), nodes);
        // pointers are unique per node in these trees
        let seen = recorders[0].seen.lock().unwrap();
        prop_assert_eq!(seen.len(), nodes);
        prop_assert!(seen.values().all(|&n| n == 1));
    }

    #[test]
    fn test_invocations_are_checkers_times_nodes(contract in any_contract(), k in 0usize..4) {
        let (coordinator, recorders) = coordinator(k);
        let nodes = node_count(&contract);

        let report = coordinator.check(&contract, &contract);
        prop_assert_eq!(report.invocations, k * nodes);

        let report = coordinator.with_ignore_code_style(false).check(&contract, &contract);
        prop_assert_eq!(report.invocations, 2 * k * nodes);
        for recorder in &recorders {
            prop_assert_eq!(recorder.calls.load(Ordering::SeqCst), 3 * nodes);
        }
    }

    #[test]
    fn test_repeated_checks_are_identical(contract in any_contract()) {
        let coordinator = StyleCheckCoordinator::new(vec![Arc::new(EveryResource)])
            .with_ignore_code_style(false);
        let first = coordinator.check(&contract, &contract);
        let second = coordinator.check(&contract, &contract);
        prop_assert_eq!(first.warnings.len(), 2 * contract.flatten().len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_ignored_code_style_reports_no_source_issues(
        published in any_contract(),
        implemented in any_contract(),
    ) {
        let coordinator = StyleCheckCoordinator::new(vec![Arc::new(EveryResource)]);
        let report = coordinator.check(&published, &implemented);
        prop_assert!(report.issues().all(|i| i.location == IssueLocation::Contract));
        prop_assert_eq!(report.warnings.len(), published.flatten().len());
    }
}
