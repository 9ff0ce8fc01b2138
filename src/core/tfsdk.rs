//! Plan/state containers and the request/response shapes for each lifecycle
//! call. Values are kept as JSON objects keyed by attribute name; `null`
//! means unset or unknown.

use crate::core::diagnostics::Diagnostics;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

fn decode<T: DeserializeOwned>(what: &str, raw: &Value) -> std::result::Result<T, Diagnostics> {
    serde_json::from_value(raw.clone()).map_err(|e| {
        let mut diags = Diagnostics::new();
        diags.add_error(
            format!("Invalid {} value", what),
            format!("Could not decode {}: {}", what, e),
        );
        diags
    })
}

/// Raw user configuration, before planning.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    raw: Value,
}

impl Config {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Proposed new state for create/update.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    raw: Value,
}

impl Plan {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn get<T: DeserializeOwned>(&self) -> std::result::Result<T, Diagnostics> {
        decode("plan", &self.raw)
    }
}

/// Persisted state. `None` when the resource is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    raw: Option<Value>,
}

impl State {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(raw: Value) -> Self {
        Self { raw: Some(raw) }
    }

    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_none()
    }

    pub fn get<T: DeserializeOwned>(&self) -> std::result::Result<Option<T>, Diagnostics> {
        match &self.raw {
            Some(raw) => decode("state", raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&mut self, value: &T) -> Diagnostics {
        let mut diags = Diagnostics::new();
        match serde_json::to_value(value) {
            Ok(raw) => self.raw = Some(raw),
            Err(e) => diags.add_error("Invalid state value", format!("Could not encode state: {}", e)),
        }
        diags
    }

    pub fn remove(&mut self) {
        self.raw = None;
    }
}

#[derive(Debug, Clone)]
pub struct ValidateConfigRequest {
    pub config: Config,
}

#[derive(Debug, Clone, Default)]
pub struct ValidateConfigResponse {
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub config: Config,
    pub prior_state: State,
}

#[derive(Debug, Clone)]
pub struct PlanResponse {
    pub planned: Plan,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub plan: Plan,
}

#[derive(Debug, Clone, Default)]
pub struct CreateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct ReadRequest {
    pub state: State,
}

#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub plan: Plan,
    pub state: State,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub state: State,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteResponse {
    pub diagnostics: Diagnostics,
}
