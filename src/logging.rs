pub mod config;

use config::LoggingConfig;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::PrettyFields;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured level with any `EnvFilter` directive.
pub const LOG_LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// An enum representing possible errors during the logging initialization.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("init logging error: `{0}`")]
    TryInitError(String),
    #[error("invalid logging directive: `{0}`")]
    InvalidDirective(String),
}

impl LoggingConfig {
    /// Attempts to initialize the global logging subscriber with the inner configuration.
    ///
    /// Logs are written to stderr, stdout is reserved for the rendered objects.
    pub fn try_init(&self) -> Result<(), LoggingError> {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(self.format.target)
            .with_env_filter(self.logging_filter()?)
            .with_timer(ChronoLocal::new(self.format.timestamp.0.clone()))
            .fmt_fields(PrettyFields::new())
            .try_init()
            .map_err(|_| {
                LoggingError::TryInitError("unable to set global logging subscriber".to_string())
            })?;

        debug!("Logging initialized successfully");
        Ok(())
    }

    fn logging_filter(&self) -> Result<EnvFilter, LoggingError> {
        let level = self.level.as_level().to_string().to_lowercase();
        let crate_directive = format!("agent_synthesis={level}")
            .parse::<Directive>()
            .map_err(|err| LoggingError::InvalidDirective(err.to_string()))?;

        Ok(EnvFilter::builder()
            .with_default_directive(crate_directive)
            .with_env_var(LOG_LEVEL_ENV_VAR)
            .from_env_lossy())
    }
}
