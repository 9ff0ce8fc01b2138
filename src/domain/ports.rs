use crate::core::schema::Schema;
use crate::core::tfsdk::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, PlanRequest, PlanResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse, ValidateConfigRequest,
    ValidateConfigResponse,
};
use crate::domain::model::CleanupSettings;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Network access to the server's cleanup settings.
#[async_trait]
pub trait CleanupClient: Send + Sync {
    async fn read_cleanup_settings(&self) -> Result<CleanupSettings>;
    async fn write_cleanup_settings(&self, settings: &CleanupSettings) -> Result<CleanupSettings>;
}

/// Lifecycle entry points the host runtime calls on a resource.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self, provider_type_name: &str) -> String;
    fn schema(&self) -> Schema;
    fn validate_config(&self, req: ValidateConfigRequest) -> ValidateConfigResponse;
    fn plan(&self, req: PlanRequest) -> PlanResponse;
    async fn create(&self, req: CreateRequest) -> CreateResponse;
    async fn read(&self, req: ReadRequest) -> ReadResponse;
    async fn update(&self, req: UpdateRequest) -> UpdateResponse;
    async fn delete(&self, req: DeleteRequest) -> DeleteResponse;
}
