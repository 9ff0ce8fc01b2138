pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ProviderConfig;

pub use adapters::TeamCityClient;
pub use self::core::{cleanup::CleanupResource, diagnostics::Diagnostics, provider::Provider};
pub use utils::error::{ProviderError, Result};
