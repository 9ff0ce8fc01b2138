use crate::core::diagnostics::Diagnostics;
use crate::core::schema::{Attribute, AttributeType, AttributeValidator, PlanModifier, Schema};
use crate::core::tfsdk::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Plan, PlanRequest,
    PlanResponse, ReadRequest, ReadResponse, State, UpdateRequest, UpdateResponse,
    ValidateConfigRequest, ValidateConfigResponse,
};
use crate::domain::model::CleanupResourceModel;
use crate::domain::ports::{CleanupClient, Resource};
use crate::utils::error::ProviderError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Server-wide build cleanup policy. The settings always exist on the
/// server, so create and update both overwrite them and delete does nothing.
pub struct CleanupResource {
    client: Option<Arc<dyn CleanupClient>>,
}

impl CleanupResource {
    pub fn new(client: Arc<dyn CleanupClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A resource with no client. Schema and validation work; every remote
    /// operation reports an error diagnostic instead.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    fn client(&self, diags: &mut Diagnostics) -> Option<&Arc<dyn CleanupClient>> {
        if self.client.is_none() {
            diags.add_error(
                "Unconfigured client",
                "The provider has not been configured; cannot reach the TeamCity server.",
            );
        }
        self.client.as_ref()
    }

    async fn apply(&self, plan: &Plan) -> (State, Diagnostics) {
        let mut diags = Diagnostics::new();

        let model: CleanupResourceModel = match plan.get() {
            Ok(model) => model,
            Err(decode_diags) => return (State::empty(), decode_diags),
        };

        let settings = match model.to_settings() {
            Ok(settings) => settings,
            Err(e) => {
                diags.add_error("Invalid Attribute Combination", e.to_string());
                return (State::empty(), diags);
            }
        };

        let Some(client) = self.client(&mut diags) else {
            return (State::empty(), diags);
        };

        tracing::debug!("writing cleanup settings: {:?}", settings);
        let result = match client.write_cleanup_settings(&settings).await {
            Ok(result) => result,
            Err(e) => {
                let e = ProviderError::RemoteWriteError(e.to_string());
                tracing::error!("{}", e);
                diags.add_error("Error setting cleanup", e.to_string());
                return (State::empty(), diags);
            }
        };

        let new_state = CleanupResourceModel::from_settings(result);
        let mut state = State::empty();
        diags.append(state.set(&new_state));
        if diags.has_error() {
            return (State::empty(), diags);
        }

        tracing::info!(
            enabled = new_state.enabled,
            max_duration = new_state.max_duration,
            "cleanup settings applied"
        );
        (state, diags)
    }
}

pub fn cleanup_schema() -> Schema {
    let daily = BTreeMap::from([
        ("hour".to_string(), Attribute::required(AttributeType::Int64)),
        ("minute".to_string(), Attribute::required(AttributeType::Int64)),
    ]);

    let cron = BTreeMap::from([
        ("minute".to_string(), Attribute::required(AttributeType::String)),
        ("hour".to_string(), Attribute::required(AttributeType::String)),
        ("day".to_string(), Attribute::required(AttributeType::String)),
        ("month".to_string(), Attribute::required(AttributeType::String)),
        ("day_week".to_string(), Attribute::required(AttributeType::String)),
    ]);

    Schema::new()
        .attribute(
            "id",
            Attribute::computed(AttributeType::String)
                .with_plan_modifier(PlanModifier::UseStateForUnknown),
        )
        .attribute("enabled", Attribute::required(AttributeType::Bool))
        .attribute("max_duration", Attribute::required(AttributeType::Int64))
        .attribute("daily", Attribute::optional_nested(daily))
        .attribute(
            "cron",
            Attribute::optional_nested(cron).with_validator(AttributeValidator::ExactlyOneOf {
                paths: vec!["daily".to_string(), "cron".to_string()],
            }),
        )
}

#[async_trait]
impl Resource for CleanupResource {
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_cleanup", provider_type_name)
    }

    fn schema(&self) -> Schema {
        cleanup_schema()
    }

    fn validate_config(&self, req: ValidateConfigRequest) -> ValidateConfigResponse {
        ValidateConfigResponse {
            diagnostics: cleanup_schema().validate(req.config.raw()),
        }
    }

    fn plan(&self, req: PlanRequest) -> PlanResponse {
        let diagnostics = cleanup_schema().validate(req.config.raw());
        let planned = cleanup_schema().plan(req.config.raw(), req.prior_state.raw());

        PlanResponse {
            planned: Plan::new(planned),
            diagnostics,
        }
    }

    async fn create(&self, req: CreateRequest) -> CreateResponse {
        let (state, diagnostics) = self.apply(&req.plan).await;
        CreateResponse { state, diagnostics }
    }

    async fn read(&self, _req: ReadRequest) -> ReadResponse {
        let mut diagnostics = Diagnostics::new();

        let Some(client) = self.client(&mut diagnostics) else {
            return ReadResponse {
                state: State::empty(),
                diagnostics,
            };
        };

        let result = match client.read_cleanup_settings().await {
            Ok(result) => result,
            Err(e) => {
                let e = ProviderError::RemoteReadError(e.to_string());
                tracing::error!("{}", e);
                diagnostics.add_error("Error Reading Cleanup", e.to_string());
                return ReadResponse {
                    state: State::empty(),
                    diagnostics,
                };
            }
        };

        if result.daily.is_some() && result.cron.is_some() {
            diagnostics.add_warning(
                "Conflicting cleanup schedules",
                "The server reports both a daily and a cron schedule; both are kept in state.",
            );
        }

        let mut state = State::empty();
        diagnostics.append(state.set(&CleanupResourceModel::from_settings(result)));
        if diagnostics.has_error() {
            state.remove();
        }

        ReadResponse { state, diagnostics }
    }

    async fn update(&self, req: UpdateRequest) -> UpdateResponse {
        let (state, diagnostics) = self.apply(&req.plan).await;
        UpdateResponse { state, diagnostics }
    }

    async fn delete(&self, _req: DeleteRequest) -> DeleteResponse {
        tracing::debug!("cleanup settings cannot be deleted; removing from state only");
        DeleteResponse::default()
    }
}
