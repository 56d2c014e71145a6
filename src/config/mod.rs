// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{ConfigError, UrlError};
use crate::url_builder::UrlSpec;

static ENV_VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches `${VAR_NAME}` placeholders.
fn env_var_pattern() -> &'static Regex {
    ENV_VAR_PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("Invalid env var regex")
    })
}

fn default_secure() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sources: Vec<SourceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_source: Option<String>,
}

/// One image delivery host and its signing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl SourceConfig {
    /// Build a spec for an asset on this source.
    pub fn url_spec(&self, path: impl Into<String>) -> Result<UrlSpec, UrlError> {
        let spec = UrlSpec::new(path, self.host.clone())?.with_secure(self.secure);
        Ok(match &self.token {
            Some(token) => spec.with_token(token.clone()),
            None => spec,
        })
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        let re = env_var_pattern();

        // Check every referenced variable first so the error names the missing one
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let config: Config = serde_yaml::from_str(&substituted)?;
        tracing::debug!(sources = config.sources.len(), "Parsed source configuration");
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one source must be configured".to_string(),
            ));
        }

        let mut seen_names = HashSet::new();

        for source in &self.sources {
            if source.name.is_empty() {
                return Err(ConfigError::Invalid(
                    "Source name cannot be empty".to_string(),
                ));
            }

            if source.host.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Source '{}' has empty host",
                    source.name
                )));
            }

            if source.host.contains("://") || source.host.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "Source '{}' host '{}' must be a bare hostname without scheme or path",
                    source.name, source.host
                )));
            }

            if !seen_names.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate source name '{}'",
                    source.name
                )));
            }
        }

        if let Some(default) = &self.default_source {
            if self.source(default).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "default_source '{}' does not name a configured source",
                    default
                )));
            }
        }

        Ok(())
    }

    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// The named default, or the only source when exactly one is configured.
    pub fn default_source(&self) -> Option<&SourceConfig> {
        match &self.default_source {
            Some(name) => self.source(name),
            None if self.sources.len() == 1 => self.sources.first(),
            None => None,
        }
    }
}
