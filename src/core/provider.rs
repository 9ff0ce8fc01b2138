use crate::adapters::TeamCityClient;
use crate::config::ProviderConfig;
use crate::core::cleanup::CleanupResource;
use crate::domain::ports::{CleanupClient, Resource};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

pub const PROVIDER_TYPE_NAME: &str = "teamcity";

/// Entry point for the host runtime: builds the client once and hands it to
/// every resource.
pub struct Provider {
    version: String,
    client: Option<Arc<dyn CleanupClient>>,
}

impl Provider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            client: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        PROVIDER_TYPE_NAME
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn configure(&mut self, config: &ProviderConfig) -> Result<()> {
        config.validate()?;
        let client = TeamCityClient::new(config)?;
        tracing::debug!("configured TeamCity client for {}", config.base_url());
        self.client = Some(Arc::new(client));
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn cleanup_resource(&self) -> CleanupResource {
        match &self.client {
            Some(client) => CleanupResource::new(Arc::clone(client)),
            None => CleanupResource::unconfigured(),
        }
    }

    pub fn resource_types(&self) -> Vec<String> {
        vec![self.cleanup_resource().type_name(self.type_name())]
    }

    pub fn resource(&self, type_name: &str) -> Option<Box<dyn Resource>> {
        let cleanup = self.cleanup_resource();
        if cleanup.type_name(self.type_name()) == type_name {
            return Some(Box::new(cleanup));
        }
        None
    }
}
