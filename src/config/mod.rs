#[cfg(feature = "cli")]
pub mod cli;
pub mod provider_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use provider_config::ProviderConfig;
