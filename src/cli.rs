use crate::api::DatadogAgent;
use crate::config::{ConfigError, ImageDefaults};
use crate::logging::LoggingError;
use crate::rbac::{cluster_role, enabled_features};
use crate::synthesis::{synthesize, synthesize_enabled, ComponentKind, SynthesisError};
use clap::Parser;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read synthesizer config: `{0}`")]
    ConfigRead(#[from] ConfigError),
    #[error("could not initialize logging: `{0}`")]
    LoggingInit(#[from] LoggingError),
    #[error("could not read `{path}`: `{err}`")]
    AgentRead { path: PathBuf, err: std::io::Error },
    #[error("invalid DatadogAgent manifest: `{0}`")]
    AgentParse(serde_yaml::Error),
    #[error("{0}")]
    Synthesis(#[from] SynthesisError),
    #[error("could not render objects: `{0}`")]
    Render(serde_yaml::Error),
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Cli {
    /// Synthesizer configuration file. Defaults and `AGENT_SYNTH_*` variables apply without it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// `DatadogAgent` manifest to synthesize.
    #[arg(short, long)]
    agent: PathBuf,

    /// Render only this component, whether enabled or not.
    #[arg(long)]
    component: Option<ComponentKind>,
}

impl Cli {
    /// Parses command line arguments
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn component(&self) -> Option<ComponentKind> {
        self.component
    }

    pub fn read_agent(&self) -> Result<DatadogAgent, CliError> {
        let content = std::fs::read_to_string(&self.agent).map_err(|err| CliError::AgentRead {
            path: self.agent.clone(),
            err,
        })?;
        serde_yaml::from_str(&content).map_err(CliError::AgentParse)
    }
}

/// Renders the Deployments of `component` (or of every enabled component) followed by the cluster
/// agent `ClusterRole`, as a multi-document YAML stream.
pub fn render(
    agent: &DatadogAgent,
    component: Option<ComponentKind>,
    images: &ImageDefaults,
) -> Result<String, CliError> {
    let synthesized = match component {
        Some(kind) => vec![synthesize(agent, kind, None::<&LabelSelector>, images)?],
        None => synthesize_enabled(agent, images)?,
    };
    let role = cluster_role(agent, &enabled_features(&agent.spec.features), images)?;

    let mut documents = Vec::with_capacity(synthesized.len() + 1);
    for s in &synthesized {
        info!(component = %s.kind, fingerprint = %s.fingerprint, "rendering deployment");
        documents.push(to_document(&s.deployment)?);
    }
    documents.push(to_document(&role)?);
    Ok(documents.concat())
}

fn to_document<T: Serialize>(object: &T) -> Result<String, CliError> {
    let yaml = serde_yaml::to_string(object).map_err(CliError::Render)?;
    Ok(format!("---\n{yaml}"))
}
