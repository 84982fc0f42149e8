//! Environment variable builders.
//!
//! Values are either literals or descriptors resolved by the kubelet at pod start (downward API
//! fields, secret keys). Nothing here reads the referenced values.

use crate::api::SecretRef;
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector, SecretKeySelector};

pub const DD_API_KEY: &str = "DD_API_KEY";
pub const DD_CLUSTER_AGENT_AUTH_TOKEN: &str = "DD_CLUSTER_AGENT_AUTH_TOKEN";
pub const DD_CLUSTER_AGENT_KUBERNETES_SERVICE_NAME: &str =
    "DD_CLUSTER_AGENT_KUBERNETES_SERVICE_NAME";
pub const DD_CLUSTER_CHECKS_ENABLED: &str = "DD_CLUSTER_CHECKS_ENABLED";
pub const DD_CLUSTER_NAME: &str = "DD_CLUSTER_NAME";
pub const DD_EXTRA_CONFIG_PROVIDERS: &str = "DD_EXTRA_CONFIG_PROVIDERS";
pub const DD_HEALTH_PORT: &str = "DD_HEALTH_PORT";
pub const DD_HOSTNAME: &str = "DD_HOSTNAME";
pub const DD_LOG_LEVEL: &str = "DD_LOG_LEVEL";
pub const DD_ORCHESTRATOR_EXPLORER_ENABLED: &str = "DD_ORCHESTRATOR_EXPLORER_ENABLED";
pub const DD_ORCHESTRATOR_EXPLORER_CONTAINER_SCRUBBING_ENABLED: &str =
    "DD_ORCHESTRATOR_EXPLORER_CONTAINER_SCRUBBING_ENABLED";
pub const DD_SITE: &str = "DD_SITE";

pub fn literal(name: &str, value: impl Into<String>) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.into()),
        value_from: None,
    }
}

pub fn flag(name: &str, enabled: bool) -> EnvVar {
    literal(name, enabled.to_string())
}

/// Env var resolved from a field of the running pod, such as `status.podIP`.
pub fn field_ref(name: &str, field_path: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: field_path.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

/// Env var resolved from a key of a secret. The secret value never appears in the object.
pub fn secret_ref(name: &str, secret: &SecretRef) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret.secret_name.clone(),
                key: secret.key_name.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

/// Site and cluster name are only emitted when set.
pub fn optional_globals(site: Option<&str>, cluster_name: Option<&str>) -> Vec<EnvVar> {
    [(DD_SITE, site), (DD_CLUSTER_NAME, cluster_name)]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| literal(name, v)))
        .collect()
}
