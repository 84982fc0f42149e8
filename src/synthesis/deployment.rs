use super::{instance_ref, pod, ComponentContext, ComponentKind, SynthesisError, Synthesized};
use crate::api::{
    ComponentConfig, ComponentSpec, Credentials, DatadogAgent, Features, ImageConfig,
};
use crate::config::ImageDefaults;
use crate::fingerprint::Fingerprint;
use crate::k8s::labels::{identity_labels, Labels};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Affinity, Toleration};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    LabelSelector, LabelSelectorRequirement, ObjectMeta,
};
use kube::Resource;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Synthesizes the Deployment of one component together with the fingerprint of the spec slice
/// that produced it.
///
/// The fingerprint is attached to both the object and its pod template under the
/// `agent.datadoghq.com/agentspechash` annotation. The only failures are structural: missing
/// instance metadata or a selector override that cannot select the generated pods.
pub fn synthesize(
    agent: &DatadogAgent,
    kind: ComponentKind,
    selector_override: Option<&LabelSelector>,
    images: &ImageDefaults,
) -> Result<Synthesized, SynthesisError> {
    let ctx = ComponentContext::new(agent, kind, images)?;
    let component = ctx.component;

    let mut labels = Labels::new(ctx.namespace, ctx.name, kind.suffix(), ctx.version());
    let selector = resolve_selector(&ctx, &mut labels, selector_override)?;

    let fingerprint = Fingerprint::of(&RenderedSpec::new(&ctx, selector_override))?;
    let annotations = fingerprint.annotations();

    let template = pod::assemble(&ctx, kind.pod_shape(&ctx), &labels, &annotations);

    let deployment = Deployment {
        metadata: ObjectMeta {
            name: Some(ctx.resource_name()),
            namespace: Some(ctx.namespace.to_string()),
            labels: Some(labels.get()),
            annotations: Some(annotations.get()),
            owner_references: agent.controller_owner_ref(&()).map(|owner| vec![owner]),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: component.replicas,
            selector,
            template,
            ..Default::default()
        }),
        status: None,
    };

    debug!(
        instance = %instance_ref(agent),
        component = %kind,
        %fingerprint,
        "synthesized deployment"
    );

    Ok(Synthesized {
        kind,
        deployment,
        fingerprint,
    })
}

/// Uses the override when given, merging its labels into `labels`, or selects on the identity
/// labels of the component.
fn resolve_selector(
    ctx: &ComponentContext<'_>,
    labels: &mut Labels,
    selector_override: Option<&LabelSelector>,
) -> Result<LabelSelector, SynthesisError> {
    let Some(selector) = selector_override else {
        return Ok(LabelSelector {
            match_labels: Some(identity_labels(ctx.name, ctx.kind.suffix())),
            ..Default::default()
        });
    };

    let match_labels = selector.match_labels.clone().unwrap_or_default();
    let has_expressions = selector
        .match_expressions
        .as_ref()
        .is_some_and(|expressions| !expressions.is_empty());
    if match_labels.is_empty() && !has_expressions {
        return Err(SynthesisError::EmptySelector);
    }

    for (key, value) in &match_labels {
        let conflict = labels
            .value(key)
            .filter(|expected| *expected != value.as_str());
        if let Some(expected) = conflict {
            return Err(SynthesisError::ConflictingSelector {
                key: key.clone(),
                expected: expected.to_string(),
                found: value.clone(),
            });
        }
    }
    for (key, value) in &match_labels {
        labels.insert(key, value);
    }

    let unsatisfied = selector
        .match_expressions
        .iter()
        .flatten()
        .find(|requirement| !matches_requirement(labels, requirement));
    if let Some(requirement) = unsatisfied {
        return Err(SynthesisError::UnsatisfiedSelector {
            key: requirement.key.clone(),
            operator: requirement.operator.clone(),
        });
    }

    Ok(selector.clone())
}

/// Evaluates one set-based requirement against the pod labels. Unknown operators never match.
fn matches_requirement(labels: &Labels, requirement: &LabelSelectorRequirement) -> bool {
    let value = labels.value(&requirement.key);
    let values = requirement.values.as_deref().unwrap_or_default();
    let listed = value.is_some_and(|value| values.iter().any(|candidate| candidate == value));
    match requirement.operator.as_str() {
        "In" => listed,
        "NotIn" => !listed,
        "Exists" => value.is_some(),
        "DoesNotExist" => value.is_none(),
        _ => false,
    }
}

/// The inputs that shape a synthesized component and nothing else. The `enabled` toggle and the
/// free-form notes are left out: neither changes the rendered object.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedSpec<'a> {
    namespace: &'a str,
    name: &'a str,
    component: ComponentKind,
    credentials: &'a Credentials,
    #[serde(skip_serializing_if = "Option::is_none")]
    site: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registry: Option<&'a str>,
    features: RenderedFeatures,
    spec: RenderedComponent<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<&'a LabelSelector>,
}

/// The feature toggles a component reads. Toggles the component ignores are left unset.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    admission_controller: Option<bool>,
    orchestrator_explorer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_metrics_server: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_checks: Option<bool>,
}

impl RenderedFeatures {
    fn new(kind: ComponentKind, features: &Features) -> Self {
        match kind {
            ComponentKind::ClusterAgent => Self {
                admission_controller: Some(features.admission_controller),
                orchestrator_explorer: features.orchestrator_explorer,
                external_metrics_server: Some(features.external_metrics_server),
                cluster_checks: Some(features.cluster_checks),
            },
            ComponentKind::ClusterChecksRunner => Self {
                admission_controller: None,
                orchestrator_explorer: features.orchestrator_explorer,
                external_metrics_server: None,
                cluster_checks: None,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedComponent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<i32>,
    image: &'a ImageConfig,
    config: &'a ComponentConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    affinity: Option<&'a Affinity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tolerations: Option<&'a Vec<Toleration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_selector: Option<&'a BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority_class_name: Option<&'a str>,
}

impl<'a> RenderedSpec<'a> {
    fn new(ctx: &ComponentContext<'a>, selector: Option<&'a LabelSelector>) -> Self {
        let spec = ctx.spec;
        Self {
            namespace: ctx.namespace,
            name: ctx.name,
            component: ctx.kind,
            credentials: &spec.credentials,
            site: spec.site.as_deref(),
            cluster_name: spec.cluster_name.as_deref(),
            registry: spec.registry.as_deref(),
            features: RenderedFeatures::new(ctx.kind, &spec.features),
            spec: RenderedComponent::new(ctx.component),
            selector,
        }
    }
}

impl<'a> RenderedComponent<'a> {
    fn new(component: &'a ComponentSpec) -> Self {
        Self {
            replicas: component.replicas,
            image: &component.image,
            config: &component.config,
            affinity: component.affinity.as_ref(),
            tolerations: (!component.tolerations.is_empty()).then_some(&component.tolerations),
            node_selector: (!component.node_selector.is_empty())
                .then_some(&component.node_selector),
            priority_class_name: component.priority_class_name.as_deref(),
        }
    }
}
