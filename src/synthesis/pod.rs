use super::{affinity, ComponentContext};
use crate::defaults::{
    DEFAULT_IMAGE_PULL_POLICY, LIVENESS_PROBE_PATH, PROBE_FAILURE_THRESHOLD,
    PROBE_INITIAL_DELAY_SECONDS, PROBE_PERIOD_SECONDS, PROBE_SUCCESS_THRESHOLD,
    PROBE_TIMEOUT_SECONDS, READINESS_PROBE_PATH,
};
use crate::k8s::annotations::Annotations;
use crate::k8s::labels::Labels;
use k8s_openapi::api::core::v1::{
    Container, EnvVar, HTTPGetAction, PodSpec, PodTemplateSpec, Probe, SecurityContext, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Env vars, volumes and mounts of one component: platform defaults followed by user extras.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodInputs {
    pub env: Vec<EnvVar>,
    pub volumes: Vec<Volume>,
    pub volume_mounts: Vec<VolumeMount>,
}

/// Component specific part of a pod spec.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodShape {
    pub init_containers: Vec<Container>,
    pub containers: Vec<Container>,
    pub volumes: Vec<Volume>,
}

/// Container with the image, pull policy, resources, env and mounts of the component.
pub fn container(ctx: &ComponentContext<'_>, name: &str, inputs: &PodInputs) -> Container {
    Container {
        name: name.to_string(),
        image: Some(ctx.image.clone()),
        image_pull_policy: Some(
            ctx.component
                .image
                .pull_policy
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_PULL_POLICY.to_string()),
        ),
        resources: ctx.component.config.resources.clone(),
        env: Some(inputs.env.clone()),
        volume_mounts: Some(inputs.volume_mounts.clone()),
        ..Default::default()
    }
}

/// Long running container: [container] plus probes on the health port and a security context.
pub fn main_container(ctx: &ComponentContext<'_>, name: &str, inputs: &PodInputs) -> Container {
    let health_port = ctx.component.config.health_port;
    Container {
        liveness_probe: Some(http_probe(LIVENESS_PROBE_PATH, health_port)),
        readiness_probe: Some(http_probe(READINESS_PROBE_PATH, health_port)),
        security_context: Some(
            ctx.component
                .config
                .container_security_context
                .clone()
                .unwrap_or_else(default_security_context),
        ),
        ..container(ctx, name, inputs)
    }
}

pub fn http_probe(path: &str, port: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path.to_string()),
            port: IntOrString::Int(port),
            ..Default::default()
        }),
        initial_delay_seconds: Some(PROBE_INITIAL_DELAY_SECONDS),
        period_seconds: Some(PROBE_PERIOD_SECONDS),
        timeout_seconds: Some(PROBE_TIMEOUT_SECONDS),
        success_threshold: Some(PROBE_SUCCESS_THRESHOLD),
        failure_threshold: Some(PROBE_FAILURE_THRESHOLD),
        ..Default::default()
    }
}

/// Read-only root filesystem and no privilege escalation.
pub fn default_security_context() -> SecurityContext {
    SecurityContext {
        read_only_root_filesystem: Some(true),
        allow_privilege_escalation: Some(false),
        ..Default::default()
    }
}

/// Builds the pod template of a component from its shape and the shared scheduling settings.
pub fn assemble(
    ctx: &ComponentContext<'_>,
    shape: PodShape,
    labels: &Labels,
    annotations: &Annotations,
) -> PodTemplateSpec {
    let component = ctx.component;
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels.get()),
            annotations: Some(annotations.get()),
            ..Default::default()
        }),
        spec: Some(PodSpec {
            affinity: Some(affinity::resolve(
                component.affinity.as_ref(),
                ctx.kind.suffix(),
            )),
            service_account_name: Some(ctx.resource_name()),
            init_containers: non_empty(shape.init_containers),
            containers: shape.containers,
            volumes: non_empty(shape.volumes),
            security_context: component.config.security_context.clone(),
            tolerations: non_empty(component.tolerations.clone()),
            node_selector: (!component.node_selector.is_empty())
                .then(|| component.node_selector.clone()),
            priority_class_name: component.priority_class_name.clone(),
            image_pull_secrets: non_empty(component.image.pull_secrets.clone()),
            ..Default::default()
        }),
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
