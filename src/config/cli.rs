use crate::config::ProviderConfig;
use crate::utils::error::{ProviderError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "teamcity-cleanup")]
#[command(about = "Manage the TeamCity build cleanup policy")]
pub struct CliConfig {
    /// Provider settings file with a `[provider]` section
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// TeamCity server URL; overrides the config file and TEAMCITY_HOST
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Access token; overrides the config file and TEAMCITY_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the resource schema as JSON
    Schema,
    /// Check a resource configuration file without contacting the server
    Validate { file: PathBuf },
    /// Validate, plan and apply a resource configuration file
    Apply {
        file: PathBuf,
        /// Previously saved state, used to keep the resource id stable
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Read the current settings from the server
    Read,
    /// Forget the resource; the server settings are left untouched
    Delete {
        /// State file to remove
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

impl CliConfig {
    /// Resolves provider settings: config file, then environment, then flags.
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        self.provider_config_with(|name| std::env::var(name).ok())
    }

    /// Like `provider_config`, reading environment variables through `lookup`.
    pub fn provider_config_with<F>(&self, lookup: F) -> Result<ProviderConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => ProviderConfig::from_file(path)?,
            None => ProviderConfig::default(),
        };

        config.overlay_env(lookup)?;

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }

        if config.host.is_empty() {
            return Err(ProviderError::MissingConfigError {
                field: "host".to_string(),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_apply_command() {
        let cli = CliConfig::parse_from([
            "teamcity-cleanup",
            "apply",
            "cleanup.json",
            "--state",
            "state.json",
            "--verbose",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Apply { file, state } => {
                assert_eq!(file, PathBuf::from("cleanup.json"));
                assert_eq!(state, Some(PathBuf::from("state.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[provider]\nhost = \"https://tc.example.com\"\ntoken = \"file-token\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "teamcity-cleanup",
            "--config",
            path.as_str(),
            "--token",
            "flag-token",
            "read",
        ]);

        let config = cli.provider_config_with(|_| None).unwrap();
        assert_eq!(config.host, "https://tc.example.com");
        assert_eq!(config.token.as_deref(), Some("flag-token"));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_host_flag_keeps_env_credentials() {
        let cli = CliConfig::parse_from(["teamcity-cleanup", "--host", "http://tc:8111", "read"]);

        let config = cli
            .provider_config_with(lookup_from(&[
                ("TEAMCITY_TOKEN", "env-token"),
                ("TEAMCITY_TIMEOUT", "12"),
            ]))
            .unwrap();

        assert_eq!(config.host, "http://tc:8111");
        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.timeout_seconds(), 12);
    }

    #[test]
    fn test_env_overrides_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[provider]\nhost = \"https://tc.example.com\"\ntoken = \"file-token\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from(["teamcity-cleanup", "--config", path.as_str(), "read"]);
        let config = cli
            .provider_config_with(lookup_from(&[("TEAMCITY_TOKEN", "env-token")]))
            .unwrap();

        assert_eq!(config.host, "https://tc.example.com");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_missing_host_everywhere() {
        let cli = CliConfig::parse_from(["teamcity-cleanup", "read"]);
        let err = cli
            .provider_config_with(lookup_from(&[("TEAMCITY_TOKEN", "env-token")]))
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_parse_delete_with_state() {
        let cli = CliConfig::parse_from(["teamcity-cleanup", "delete", "--state", "state.json"]);
        match cli.command {
            Command::Delete { state } => assert_eq!(state, Some(PathBuf::from("state.json"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
