//! # DatadogAgent resource
//!
//! In-memory representation of the `DatadogAgent` custom resource. The values reaching this crate
//! are assumed to be already validated and defaulted, so no field is re-checked here.

use crate::defaults::{DEFAULT_API_KEY_KEY, DEFAULT_HEALTH_PORT, DEFAULT_LOG_LEVEL, DEFAULT_TOKEN_KEY};
use k8s_openapi::api::core::v1::{
    Affinity, EnvVar, LocalObjectReference, PodSecurityContext, ResourceRequirements,
    SecurityContext, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::NamespaceResourceScope;
use kube::Resource;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const DATADOG_AGENT_GROUP: &str = "datadoghq.com";
pub const DATADOG_AGENT_VERSION: &str = "v1alpha1";
pub const DATADOG_AGENT_KIND: &str = "DatadogAgent";
pub const DATADOG_AGENT_PLURAL: &str = "datadogagents";

/// The `DatadogAgent` custom resource.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct DatadogAgent {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DatadogAgentSpec,
}

impl Resource for DatadogAgent {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        DATADOG_AGENT_KIND.into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        DATADOG_AGENT_GROUP.into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        DATADOG_AGENT_VERSION.into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        DATADOG_AGENT_PLURAL.into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl DatadogAgent {
    pub fn new(namespace: &str, name: &str, spec: DatadogAgentSpec) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec,
        }
    }
}

/// Desired state of every agent component.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatadogAgentSpec {
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Registry prepended to image names that do not carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub cluster_agent: ComponentSpec,
    #[serde(default)]
    pub cluster_checks_runner: ComponentSpec,
}

/// Secrets holding the agent credentials.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<SecretRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<SecretRef>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    pub secret_name: String,
    pub key_name: String,
}

impl Credentials {
    /// Secret holding the API key. Defaults to the secret named after the instance.
    pub fn api_key_ref(&self, instance_name: &str) -> SecretRef {
        self.api_secret.clone().unwrap_or_else(|| SecretRef {
            secret_name: instance_name.to_string(),
            key_name: DEFAULT_API_KEY_KEY.to_string(),
        })
    }

    /// Secret holding the cluster agent auth token. Defaults to the secret named after the instance.
    pub fn token_ref(&self, instance_name: &str) -> SecretRef {
        self.token_secret.clone().unwrap_or_else(|| SecretRef {
            secret_name: instance_name.to_string(),
            key_name: DEFAULT_TOKEN_KEY.to_string(),
        })
    }
}

/// Named feature toggles.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default)]
    pub admission_controller: bool,
    #[serde(default = "enabled_by_default")]
    pub orchestrator_explorer: bool,
    #[serde(default)]
    pub external_metrics_server: bool,
    #[serde(default = "enabled_by_default")]
    pub cluster_checks: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for Features {
    fn default() -> Self {
        Self {
            admission_controller: false,
            orchestrator_explorer: true,
            external_metrics_server: false,
            cluster_checks: true,
        }
    }
}

/// Configuration of one synthesizable component.
///
/// Sequences (`env`, `volumes`, `volume_mounts`) are ordered: they are rendered and fingerprinted
/// in the order supplied, so callers must not reorder them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    #[serde(default)]
    pub enabled: bool,
    /// `None` leaves scaling to the platform, `Some` is copied through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub config: ComponentConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,
    /// Free-form operator notes. Never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pull_secrets: Vec<LocalObjectReference>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
    /// Pod level security context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<PodSecurityContext>,
    /// Replaces the hardened default of the main container when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_security_context: Option<SecurityContext>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_health_port")]
    pub health_port: i32,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_health_port() -> i32 {
    DEFAULT_HEALTH_PORT
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            env: Vec::new(),
            volumes: Vec::new(),
            volume_mounts: Vec::new(),
            resources: None,
            security_context: None,
            container_security_context: None,
            log_level: default_log_level(),
            health_port: default_health_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::ResourceExt;

    #[test]
    fn deserialize_applies_defaults() {
        let yaml = r#"
metadata:
  name: foo
  namespace: bar
spec:
  clusterChecksRunner:
    enabled: true
    replicas: 3
"#;
        let agent: DatadogAgent = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(agent.name_any(), "foo");
        assert_eq!(agent.namespace().as_deref(), Some("bar"));
        assert_eq!(agent.spec.features, Features::default());
        assert_eq!(agent.spec.cluster_checks_runner.replicas, Some(3));
        assert_eq!(
            agent.spec.cluster_checks_runner.config,
            ComponentConfig::default()
        );
        assert!(!agent.spec.cluster_agent.enabled);
    }

    #[test]
    fn credentials_default_to_instance_secret() {
        let credentials = Credentials::default();
        assert_eq!(
            credentials.api_key_ref("foo"),
            SecretRef {
                secret_name: "foo".to_string(),
                key_name: "api_key".to_string()
            }
        );
        assert_eq!(credentials.token_ref("foo").key_name, "token");

        let credentials = Credentials {
            api_secret: Some(SecretRef {
                secret_name: "external".to_string(),
                key_name: "key".to_string(),
            }),
            token_secret: None,
        };
        assert_eq!(credentials.api_key_ref("foo").secret_name, "external");
    }

    #[test]
    fn resource_identity() {
        assert_eq!(DatadogAgent::api_version(&()), "datadoghq.com/v1alpha1");
        assert_eq!(DatadogAgent::kind(&()), "DatadogAgent");
    }
}
