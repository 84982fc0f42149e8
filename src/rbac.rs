//! # RBAC rule composition
//!
//! Each optional feature contributes its own rule set. The cluster agent role is the base rules
//! followed by the rules of every enabled feature, in [Feature] order. Rules repeated across
//! features are kept as they are: the API server treats a role as the union of its rules.

pub mod admission_controller;
pub mod external_metrics;
pub mod orchestrator_explorer;

use crate::api::{DatadogAgent, Features};
use crate::config::ImageDefaults;
use crate::defaults::CLUSTER_AGENT_SUFFIX;
use crate::k8s::labels::Labels;
use crate::synthesis::{instance_ref, ComponentContext, ComponentKind, SynthesisError};
use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

// Verbs
pub const GET_VERB: &str = "get";
pub const LIST_VERB: &str = "list";
pub const WATCH_VERB: &str = "watch";
pub const CREATE_VERB: &str = "create";
pub const UPDATE_VERB: &str = "update";
pub const DELETE_VERB: &str = "delete";

// API groups
pub const CORE_API_GROUP: &str = "";
pub const APPS_API_GROUP: &str = "apps";
pub const BATCH_API_GROUP: &str = "batch";

// Resources
pub const SECRETS_RESOURCE: &str = "secrets";
pub const EVENTS_RESOURCE: &str = "events";

/// Optional features owning a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    AdmissionController,
    ExternalMetricsServer,
    OrchestratorExplorer,
}

impl Feature {
    pub const ALL: [Feature; 3] = [
        Self::AdmissionController,
        Self::ExternalMetricsServer,
        Self::OrchestratorExplorer,
    ];

    pub fn rules(self) -> Vec<PolicyRule> {
        match self {
            Self::AdmissionController => admission_controller::rules(),
            Self::ExternalMetricsServer => external_metrics::rules(),
            Self::OrchestratorExplorer => orchestrator_explorer::rules(),
        }
    }

    fn is_enabled(self, features: &Features) -> bool {
        match self {
            Self::AdmissionController => features.admission_controller,
            Self::ExternalMetricsServer => features.external_metrics_server,
            Self::OrchestratorExplorer => features.orchestrator_explorer,
        }
    }
}

/// Features with a rule set that are switched on in `features`.
pub fn enabled_features(features: &Features) -> BTreeSet<Feature> {
    Feature::ALL
        .into_iter()
        .filter(|feature| feature.is_enabled(features))
        .collect()
}

pub fn rule(api_groups: &[&str], resources: &[&str], verbs: &[&str]) -> PolicyRule {
    PolicyRule {
        api_groups: Some(to_strings(api_groups)),
        resources: Some(to_strings(resources)),
        verbs: to_strings(verbs),
        ..Default::default()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Rules the cluster agent needs whatever the enabled features.
pub fn base_rules() -> Vec<PolicyRule> {
    vec![
        rule(
            &[CORE_API_GROUP],
            &[SECRETS_RESOURCE],
            &[GET_VERB, LIST_VERB, WATCH_VERB, CREATE_VERB, UPDATE_VERB],
        ),
        rule(&[CORE_API_GROUP], &[EVENTS_RESOURCE], &[CREATE_VERB]),
    ]
}

/// Base rules followed by the rules of each feature. The result does not depend on the order
/// or multiplicity of `features`.
pub fn compose(features: impl IntoIterator<Item = Feature>) -> Vec<PolicyRule> {
    let features: BTreeSet<Feature> = features.into_iter().collect();
    let mut rules = base_rules();
    for feature in &features {
        rules.extend(feature.rules());
    }
    debug!(?features, rules = rules.len(), "composed rbac rules");
    rules
}

/// Wraps the rules of `features` in the cluster agent `ClusterRole` of the instance.
pub fn cluster_role(
    agent: &DatadogAgent,
    features: &BTreeSet<Feature>,
    images: &ImageDefaults,
) -> Result<ClusterRole, SynthesisError> {
    let ctx = ComponentContext::new(agent, ComponentKind::ClusterAgent, images)?;
    let labels = Labels::new(ctx.namespace, ctx.name, CLUSTER_AGENT_SUFFIX, ctx.version());

    debug!(instance = %instance_ref(agent), "building cluster agent role");

    Ok(ClusterRole {
        metadata: ObjectMeta {
            name: Some(ctx.resource_name()),
            labels: Some(labels.get()),
            ..Default::default()
        },
        rules: Some(compose(features.iter().copied())),
        aggregation_rule: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn contains_all(composed: &[PolicyRule], expected: &[PolicyRule]) -> bool {
        expected.iter().all(|rule| composed.contains(rule))
    }

    #[test]
    fn no_features_only_base_rules() {
        assert_eq!(compose(Vec::<Feature>::new()), base_rules());
    }

    #[test]
    fn union_law() {
        for a in Feature::ALL {
            for b in Feature::ALL {
                let composed = compose([a, b]);
                assert!(contains_all(&composed, &base_rules()));
                assert!(contains_all(&composed, &a.rules()), "{a:?} missing");
                assert!(contains_all(&composed, &b.rules()), "{b:?} missing");
            }
        }
    }

    #[test]
    fn enabling_a_feature_never_removes_rules() {
        let mut enabled = BTreeSet::new();
        let mut previous = compose(enabled.clone());
        for feature in Feature::ALL {
            enabled.insert(feature);
            let next = compose(enabled.clone());
            assert!(contains_all(&next, &previous));
            previous = next;
        }
    }

    #[test]
    fn composition_order_is_stable() {
        let forward = compose(Feature::ALL);
        let mut reversed = Feature::ALL;
        reversed.reverse();
        assert_eq!(forward, compose(reversed));
        assert_eq!(
            forward,
            compose([
                Feature::OrchestratorExplorer,
                Feature::AdmissionController,
                Feature::OrchestratorExplorer,
                Feature::ExternalMetricsServer,
            ])
        );
    }

    #[rstest]
    #[case::defaults(Features::default(), vec![Feature::OrchestratorExplorer])]
    #[case::all(
        Features {
            admission_controller: true,
            orchestrator_explorer: true,
            external_metrics_server: true,
            cluster_checks: true,
        },
        Feature::ALL.to_vec()
    )]
    #[case::none(
        Features {
            admission_controller: false,
            orchestrator_explorer: false,
            external_metrics_server: false,
            cluster_checks: true,
        },
        vec![]
    )]
    fn features_from_toggles(#[case] features: Features, #[case] expected: Vec<Feature>) {
        assert_eq!(
            enabled_features(&features).into_iter().collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn cluster_role_object() {
        let agent = DatadogAgent::new("bar", "foo", Default::default());
        let features = enabled_features(&agent.spec.features);

        let role = cluster_role(&agent, &features, &ImageDefaults::default()).unwrap();
        assert_eq!(role.metadata.name.as_deref(), Some("foo-cluster-agent"));
        assert_eq!(role.metadata.namespace, None);
        assert_eq!(
            role.metadata.labels.unwrap()["app.kubernetes.io/component"],
            "cluster-agent"
        );
        assert_eq!(role.rules, Some(compose(features)));
    }

    #[test]
    fn cluster_role_version_follows_resolved_image() {
        let mut agent = DatadogAgent::new("bar", "foo", Default::default());
        agent.spec.cluster_agent.image.name = Some("custom/cluster-agent:1.0".to_string());
        agent.spec.cluster_agent.image.tag = Some("2.0".to_string());

        let role = cluster_role(&agent, &BTreeSet::new(), &ImageDefaults::default()).unwrap();
        assert_eq!(
            role.metadata.labels.unwrap()["app.kubernetes.io/version"],
            "1.0"
        );
    }

    #[test]
    fn cluster_role_requires_name() {
        assert_matches!(
            cluster_role(
                &DatadogAgent::default(),
                &BTreeSet::new(),
                &ImageDefaults::default()
            ),
            Err(SynthesisError::MissingMetadata("metadata.name"))
        );
    }
}
