//! Process configuration of the synthesizer: logging and the platform image defaults.
//!
//! Loaded from an optional YAML file with environment overrides on top. Variables use the
//! `AGENT_SYNTH_` prefix and `__` as separator, e.g. `AGENT_SYNTH_IMAGES__AGENT=agent:7.52.0`.

use crate::defaults::{CONFIG_ENV_VAR_PREFIX, DEFAULT_AGENT_IMAGE, DEFAULT_CLUSTER_AGENT_IMAGE};
use crate::logging::config::LoggingConfig;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("loading synthesizer config: `{0}`")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct SynthesizerConfig {
    #[serde(default)]
    pub log: LoggingConfig,
    #[serde(default)]
    pub images: ImageDefaults,
}

/// Images used by components whose spec does not name one. Upgrading these changes the rendered
/// objects but never the fingerprints.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ImageDefaults {
    #[serde(default = "default_agent_image")]
    pub agent: String,
    #[serde(default = "default_cluster_agent_image")]
    pub cluster_agent: String,
}

fn default_agent_image() -> String {
    DEFAULT_AGENT_IMAGE.to_string()
}

fn default_cluster_agent_image() -> String {
    DEFAULT_CLUSTER_AGENT_IMAGE.to_string()
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            agent: default_agent_image(),
            cluster_agent: default_cluster_agent_image(),
        }
    }
}

impl SynthesizerConfig {
    /// Loads the config from `path` when given, then applies the environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }

        Ok(builder
            // Eg.. `AGENT_SYNTH_LOG__LEVEL=debug` sets the `log.level` key. Double underscore
            // because the keys are snake_case.
            .add_source(
                Environment::with_prefix(CONFIG_ENV_VAR_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<SynthesizerConfig>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;
    use std::{env, io::Write};
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn load_without_file_uses_defaults() {
        let config = SynthesizerConfig::load(None).unwrap();
        assert_eq!(config, SynthesizerConfig::default());
    }

    #[test]
    #[serial]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let content = r#"
log:
  level: debug
images:
  agent: registry.local/agent:7.52.0
"#;
        write!(file, "{}", content).unwrap();

        let config = SynthesizerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.images.agent, "registry.local/agent:7.52.0");
        assert_eq!(config.images.cluster_agent, DEFAULT_CLUSTER_AGENT_IMAGE);
        assert_eq!(config.log.level.as_level(), tracing::Level::DEBUG);
    }

    #[test]
    #[serial]
    fn env_vars_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "images:\n  cluster_agent: from-file:1\n").unwrap();

        env::set_var("AGENT_SYNTH_IMAGES__CLUSTER_AGENT", "from-env:2");
        let config = SynthesizerConfig::load(Some(file.path()));
        env::remove_var("AGENT_SYNTH_IMAGES__CLUSTER_AGENT");

        assert_eq!(config.unwrap().images.cluster_agent, "from-env:2");
    }

    #[test]
    #[serial]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SynthesizerConfig::load(Some(&dir.path().join("absent.yaml")));
        assert_matches!(result, Err(ConfigError::Load(_)));
    }
}
