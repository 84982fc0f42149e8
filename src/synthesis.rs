//! # Workload synthesis
//!
//! Pure transformations from a [DatadogAgent] into the workload objects its components need.
//!
//! ```text
//! DatadogAgent ─► env / volumes ─┐
//!              ─► affinity ──────┼─► pod template ─► Deployment + Fingerprint
//!              ─► image ─────────┘
//! ```
//!
//! Every function here is side-effect free and safe to call concurrently.

pub mod affinity;
pub mod components;
pub mod deployment;
pub mod env;
pub mod image;
pub mod pod;
pub mod volumes;

use crate::api::{ComponentSpec, DatadogAgent, DatadogAgentSpec};
use crate::config::ImageDefaults;
use crate::defaults::{CLUSTER_AGENT_SUFFIX, CLUSTER_CHECKS_RUNNER_SUFFIX};
use crate::fingerprint::{Fingerprint, FingerprintError};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use deployment::synthesize;

#[derive(thiserror::Error, Debug)]
pub enum SynthesisError {
    #[error("selector override sets label `{key}` to `{found}` but the component requires `{expected}`")]
    ConflictingSelector {
        key: String,
        expected: String,
        found: String,
    },

    #[error("selector override selects nothing")]
    EmptySelector,

    #[error("selector override requirement `{key} {operator}` does not match the component labels")]
    UnsatisfiedSelector { key: String, operator: String },

    #[error("the DatadogAgent has no `{0}`")]
    MissingMetadata(&'static str),

    #[error("{0}")]
    Fingerprint(#[from] FingerprintError),
}

#[derive(thiserror::Error, Debug)]
#[error("unknown component `{0}`")]
pub struct UnknownComponent(String);

/// The closed catalog of synthesizable components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    ClusterAgent,
    ClusterChecksRunner,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 2] = [Self::ClusterAgent, Self::ClusterChecksRunner];

    /// Suffix appended to the instance name, also used as the component label value.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::ClusterAgent => CLUSTER_AGENT_SUFFIX,
            Self::ClusterChecksRunner => CLUSTER_CHECKS_RUNNER_SUFFIX,
        }
    }

    pub fn spec(self, spec: &DatadogAgentSpec) -> &ComponentSpec {
        match self {
            Self::ClusterAgent => &spec.cluster_agent,
            Self::ClusterChecksRunner => &spec.cluster_checks_runner,
        }
    }

    pub fn default_image(self, images: &ImageDefaults) -> &str {
        match self {
            Self::ClusterAgent => &images.cluster_agent,
            Self::ClusterChecksRunner => &images.agent,
        }
    }

    fn pod_shape(self, ctx: &ComponentContext<'_>) -> pod::PodShape {
        match self {
            Self::ClusterAgent => components::cluster_agent::pod_shape(ctx),
            Self::ClusterChecksRunner => components::cluster_checks_runner::pod_shape(ctx),
        }
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for ComponentKind {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.suffix() == s)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

/// Everything a component shape function reads. Built once per synthesis call.
#[derive(Debug)]
pub struct ComponentContext<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub kind: ComponentKind,
    pub spec: &'a DatadogAgentSpec,
    pub component: &'a ComponentSpec,
    pub image: String,
}

impl<'a> ComponentContext<'a> {
    pub fn new(
        agent: &'a DatadogAgent,
        kind: ComponentKind,
        images: &ImageDefaults,
    ) -> Result<Self, SynthesisError> {
        let name = agent
            .metadata
            .name
            .as_deref()
            .ok_or(SynthesisError::MissingMetadata("metadata.name"))?;
        let namespace = agent
            .metadata
            .namespace
            .as_deref()
            .ok_or(SynthesisError::MissingMetadata("metadata.namespace"))?;
        let component = kind.spec(&agent.spec);
        let image = image::resolve_image(
            &component.image,
            agent.spec.registry.as_deref(),
            kind.default_image(images),
        );
        Ok(Self {
            namespace,
            name,
            kind,
            spec: &agent.spec,
            component,
            image,
        })
    }

    /// Name shared by the workload object and the component service account.
    pub fn resource_name(&self) -> String {
        format!("{}-{}", self.name, self.kind.suffix())
    }

    pub fn instance_resource_name(&self, suffix: &str) -> String {
        format!("{}-{}", self.name, suffix)
    }

    /// Value of the version label: the tag of the image actually deployed.
    pub fn version(&self) -> &str {
        image::image_tag(&self.image).unwrap_or_default()
    }
}

/// Output of one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub kind: ComponentKind,
    pub deployment: Deployment,
    pub fingerprint: Fingerprint,
}

/// Synthesizes every enabled component of `agent`, in catalog order.
pub fn synthesize_enabled(
    agent: &DatadogAgent,
    images: &ImageDefaults,
) -> Result<Vec<Synthesized>, SynthesisError> {
    ComponentKind::ALL
        .into_iter()
        .filter(|kind| kind.spec(&agent.spec).enabled)
        .map(|kind| synthesize(agent, kind, None::<&LabelSelector>, images))
        .collect()
}

/// Appends the user supplied items, verbatim and in order, after the platform defaults. Name
/// clashes are left for the API server to reject.
pub fn with_extras<T: Clone>(mut defaults: Vec<T>, extras: &[T]) -> Vec<T> {
    defaults.extend_from_slice(extras);
    defaults
}

/// Name used in log lines for an instance.
pub(crate) fn instance_ref(agent: &DatadogAgent) -> String {
    format!(
        "{}/{}",
        agent.namespace().unwrap_or_default(),
        agent.name_any()
    )
}
