use httpmock::prelude::*;
use serde_json::json;
use teamcity_provider::core::tfsdk::{
    Config, CreateRequest, DeleteRequest, Plan, PlanRequest, ReadRequest, State, UpdateRequest,
    ValidateConfigRequest,
};
use teamcity_provider::core::Resource;
use teamcity_provider::{Provider, ProviderConfig};

const CLEANUP_PATH: &str = "/app/rest/server/cleanup";

fn provider_for(server: &MockServer) -> Provider {
    let mut provider = Provider::new("test");
    provider
        .configure(&ProviderConfig::with_token(server.base_url(), "test-token"))
        .unwrap();
    provider
}

fn cleanup(provider: &Provider) -> Box<dyn Resource> {
    provider.resource("teamcity_cleanup").unwrap()
}

/// Daily schedule: the payload carries `daily` only and the state mirrors the input.
#[tokio::test]
async fn test_create_with_daily_schedule() {
    let server = MockServer::start();
    let payload = json!({
        "enabled": true,
        "maxCleanupDuration": 600,
        "daily": {"hour": 2, "minute": 30}
    });
    let api_mock = server.mock(|when, then| {
        when.method(PUT)
            .path(CLEANUP_PATH)
            .header("Authorization", "Bearer test-token")
            .json_body(payload.clone());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(payload.clone());
    });

    let provider = provider_for(&server);
    let resource = cleanup(&provider);

    let config = Config::new(json!({
        "enabled": true,
        "max_duration": 600,
        "daily": {"hour": 2, "minute": 30}
    }));
    let planned = resource.plan(PlanRequest {
        config,
        prior_state: State::empty(),
    });
    assert!(planned.diagnostics.is_empty(), "{:?}", planned.diagnostics);

    let resp = resource
        .create(CreateRequest {
            plan: planned.planned,
        })
        .await;

    api_mock.assert();
    assert!(resp.diagnostics.is_empty(), "{:?}", resp.diagnostics);
    assert_eq!(
        resp.state.raw().unwrap(),
        &json!({
            "id": "placeholder",
            "enabled": true,
            "max_duration": 600,
            "daily": {"hour": 2, "minute": 30},
            "cron": null
        })
    );
}

/// Cron schedule: the five fields are sent verbatim and `daily` is absent.
#[tokio::test]
async fn test_update_with_cron_schedule() {
    let server = MockServer::start();
    let payload = json!({
        "enabled": false,
        "maxCleanupDuration": 0,
        "cron": {"minute": "0", "hour": "3", "day": "*", "month": "*", "dayWeek": "*"}
    });
    let api_mock = server.mock(|when, then| {
        when.method(PUT).path(CLEANUP_PATH).json_body(payload.clone());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(payload.clone());
    });

    let provider = provider_for(&server);
    let resource = cleanup(&provider);

    let prior_state = State::new(json!({
        "id": "placeholder",
        "enabled": true,
        "max_duration": 600,
        "daily": {"hour": 2, "minute": 30},
        "cron": null
    }));
    let planned = resource.plan(PlanRequest {
        config: Config::new(json!({
            "enabled": false,
            "max_duration": 0,
            "cron": {"minute": "0", "hour": "3", "day": "*", "month": "*", "day_week": "*"}
        })),
        prior_state: prior_state.clone(),
    });
    assert!(planned.diagnostics.is_empty());
    assert_eq!(planned.planned.raw()["id"], json!("placeholder"));

    let resp = resource
        .update(UpdateRequest {
            plan: planned.planned,
            state: prior_state,
        })
        .await;

    api_mock.assert();
    assert!(resp.diagnostics.is_empty());
    let state = resp.state.raw().unwrap();
    assert_eq!(state["daily"], json!(null));
    assert_eq!(
        state["cron"],
        json!({"minute": "0", "hour": "3", "day": "*", "month": "*", "day_week": "*"})
    );
}

/// Both schedules set: validation fails and the server is never contacted.
#[tokio::test]
async fn test_conflicting_schedules_rejected_before_any_call() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.path(CLEANUP_PATH);
        then.status(200);
    });

    let provider = provider_for(&server);
    let resource = cleanup(&provider);
    let raw = json!({
        "enabled": true,
        "max_duration": 60,
        "daily": {"hour": 1, "minute": 0},
        "cron": {"minute": "0", "hour": "3", "day": "*", "month": "*", "day_week": "*"}
    });

    let validated = resource.validate_config(ValidateConfigRequest {
        config: Config::new(raw.clone()),
    });
    assert!(validated.diagnostics.has_error());

    // Even if a host skipped validation, create refuses the plan.
    let resp = resource
        .create(CreateRequest {
            plan: Plan::new(raw),
        })
        .await;
    assert!(resp.diagnostics.has_error());
    assert!(resp.state.is_empty());

    api_mock.assert_hits(0);
}

/// No schedule at all is also rejected by validation.
#[test]
fn test_missing_schedule_rejected() {
    let provider = Provider::new("test");
    let resource = cleanup(&provider);

    let resp = resource.validate_config(ValidateConfigRequest {
        config: Config::new(json!({"enabled": true, "max_duration": 60})),
    });

    let errors: Vec<_> = resp.diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].detail.contains("one (and only one) of [daily,cron]"));
}

/// A failed read reports the underlying error text and no state.
#[tokio::test]
async fn test_read_failure_surfaces_error_detail() {
    // Nothing listens on the discard port.
    let mut provider = Provider::new("test");
    provider
        .configure(&ProviderConfig {
            host: "http://127.0.0.1:9".to_string(),
            token: Some("test-token".to_string()),
            username: None,
            password: None,
            timeout_seconds: Some(2),
        })
        .unwrap();
    let resource = cleanup(&provider);

    let resp = resource.read(ReadRequest::default()).await;

    assert!(resp.state.is_empty());
    let error = resp.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Error Reading Cleanup");
    assert!(error.detail.starts_with("Could not read cleanup settings: "));
    assert!(error.detail.len() > "Could not read cleanup settings: ".len());
}

#[tokio::test]
async fn test_read_server_error_includes_status_and_body() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(CLEANUP_PATH);
        then.status(500).body("connection refused by upstream");
    });

    let provider = provider_for(&server);
    let resp = cleanup(&provider).read(ReadRequest::default()).await;

    api_mock.assert();
    assert!(resp.state.is_empty());
    let error = resp.diagnostics.errors().next().unwrap();
    assert!(error.detail.contains("500"));
    assert!(error.detail.contains("connection refused by upstream"));
}

#[tokio::test]
async fn test_read_leaves_absent_schedules_absent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(CLEANUP_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"enabled": true, "maxCleanupDuration": 45}));
    });

    let provider = provider_for(&server);
    let resp = cleanup(&provider).read(ReadRequest::default()).await;

    api_mock.assert();
    assert_eq!(
        resp.state.raw().unwrap(),
        &json!({
            "id": "placeholder",
            "enabled": true,
            "max_duration": 45,
            "daily": null,
            "cron": null
        })
    );
}

#[tokio::test]
async fn test_write_failure_reports_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(PUT).path(CLEANUP_PATH);
        then.status(400).body("Invalid hour: 25");
    });

    let provider = provider_for(&server);
    let resp = cleanup(&provider)
        .create(CreateRequest {
            plan: Plan::new(json!({
                "enabled": true,
                "max_duration": 60,
                "daily": {"hour": 25, "minute": 0}
            })),
        })
        .await;

    api_mock.assert();
    assert!(resp.state.is_empty());
    let error = resp.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Error setting cleanup");
    assert!(error
        .detail
        .starts_with("Cannot set cleanup, unexpected error: "));
    assert!(error.detail.contains("Invalid hour: 25"));
}

#[tokio::test]
async fn test_delete_never_contacts_server() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.path(CLEANUP_PATH);
        then.status(200);
    });

    let provider = provider_for(&server);
    let resp = cleanup(&provider)
        .delete(DeleteRequest {
            state: State::new(json!({"id": "placeholder"})),
        })
        .await;

    assert!(resp.diagnostics.is_empty());
    api_mock.assert_hits(0);
}
