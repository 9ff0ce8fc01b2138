use crate::utils::error::{ProviderError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for the TeamCity server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub host: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProviderFile {
    provider: ProviderConfig,
}

impl ProviderConfig {
    pub fn with_token(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: Some(token.into()),
            username: None,
            password: None,
            timeout_seconds: None,
        }
    }

    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProviderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses the `[provider]` section of a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let file: ProviderFile = toml::from_str(&processed_content).map_err(|e| {
            ProviderError::config(format!("TOML parsing error: {}", e))
        })?;
        Ok(file.provider)
    }

    /// Loads settings from the `TEAMCITY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.overlay_env(lookup)?;
        if config.host.is_empty() {
            return Err(ProviderError::MissingConfigError {
                field: "TEAMCITY_HOST".to_string(),
            });
        }
        Ok(config)
    }

    /// Replaces each field whose `TEAMCITY_*` variable is set; unset
    /// variables leave the current value alone.
    pub fn overlay_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TEAMCITY_HOST") {
            self.host = host;
        }
        if let Some(token) = lookup("TEAMCITY_TOKEN") {
            self.token = Some(token);
        }
        if let Some(username) = lookup("TEAMCITY_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("TEAMCITY_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(raw) = lookup("TEAMCITY_TIMEOUT") {
            let timeout = raw
                .parse::<u64>()
                .map_err(|e| ProviderError::InvalidConfigValueError {
                    field: "TEAMCITY_TIMEOUT".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            self.timeout_seconds = Some(timeout);
        }
        Ok(())
    }

    /// Expands `${VAR}` references from the process environment.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ProviderError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    /// REST base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.host.trim_end_matches('/')
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<()> {
        validate_url("host", &self.host)?;
        validate_range("timeout_seconds", self.timeout_seconds(), 1, 600)?;

        match (&self.token, &self.username) {
            (Some(token), _) => validate_non_empty_string("token", token),
            (None, Some(username)) => {
                validate_non_empty_string("username", username)?;
                let password = validate_required_field("password", &self.password)?;
                validate_non_empty_string("password", password)
            }
            (None, None) => Err(ProviderError::config(
                "either `token` or `username`/`password` must be set",
            )),
        }
    }
}
