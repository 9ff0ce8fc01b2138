//! Schema declaration for resources and the validation/planning passes
//! that run over raw configuration before any lifecycle call.

use crate::core::diagnostics::Diagnostics;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int64,
}

impl AttributeType {
    fn matches(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int64 => value.is_i64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Int64 => "integer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Primitive(AttributeType),
    SingleNested(BTreeMap<String, Attribute>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Keep the prior state value while the new one is unknown.
    UseStateForUnknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeValidator {
    /// Exactly one of the named root attributes must be set.
    ExactlyOneOf { paths: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<AttributeValidator>,
}

impl Attribute {
    fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            plan_modifiers: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn required(ty: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(AttributeKind::Primitive(ty))
        }
    }

    pub fn computed(ty: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(AttributeKind::Primitive(ty))
        }
    }

    pub fn optional_nested(attributes: BTreeMap<String, Attribute>) -> Self {
        Self {
            optional: true,
            ..Self::new(AttributeKind::SingleNested(attributes))
        }
    }

    pub fn with_plan_modifier(mut self, modifier: PlanModifier) -> Self {
        self.plan_modifiers.push(modifier);
        self
    }

    pub fn with_validator(mut self, validator: AttributeValidator) -> Self {
        self.validators.push(validator);
        self
    }

    fn is_config_settable(&self) -> bool {
        self.required || self.optional
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Checks a raw configuration object: unknown arguments, required
    /// arguments, value types, nested objects and attribute validators.
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let Some(object) = config.as_object() else {
            diags.add_error(
                "Invalid configuration",
                format!("expected an object, got {}", json_kind(config)),
            );
            return diags;
        };

        validate_object(&self.attributes, object, "", &mut diags);

        for (name, attribute) in &self.attributes {
            for validator in &attribute.validators {
                run_validator(name, validator, object, &mut diags);
            }
        }

        diags
    }

    /// Builds the planned value from configuration. Computed attributes
    /// are unknown (`null`) unless a plan modifier carries the prior value.
    pub fn plan(&self, config: &Value, prior_state: Option<&Value>) -> Value {
        let mut planned = config.as_object().cloned().unwrap_or_default();

        for (name, attribute) in &self.attributes {
            if !attribute.computed || planned.get(name).is_some_and(|v| !v.is_null()) {
                continue;
            }

            let prior = prior_state
                .and_then(|state| state.get(name))
                .filter(|v| !v.is_null());

            let value = match prior {
                Some(prior)
                    if attribute
                        .plan_modifiers
                        .contains(&PlanModifier::UseStateForUnknown) =>
                {
                    prior.clone()
                }
                _ => Value::Null,
            };
            planned.insert(name.clone(), value);
        }

        Value::Object(planned)
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn validate_object(
    attributes: &BTreeMap<String, Attribute>,
    object: &Map<String, Value>,
    prefix: &str,
    diags: &mut Diagnostics,
) {
    for key in object.keys() {
        if !attributes.contains_key(key) {
            diags.add_attribute_error(
                join_path(prefix, key),
                "Unsupported argument",
                format!("An argument named \"{}\" is not expected here.", key),
            );
        }
    }

    for (name, attribute) in attributes {
        let path = join_path(prefix, name);
        let value = object.get(name).unwrap_or(&Value::Null);

        if value.is_null() {
            if attribute.required {
                diags.add_attribute_error(
                    path,
                    "Missing required argument",
                    format!("The argument \"{}\" is required, but no definition was found.", name),
                );
            }
            continue;
        }

        if !attribute.is_config_settable() {
            diags.add_attribute_error(
                path,
                "Invalid configuration",
                format!("\"{}\" is computed and cannot be set in configuration.", name),
            );
            continue;
        }

        match &attribute.kind {
            AttributeKind::Primitive(ty) => {
                if !ty.matches(value) {
                    diags.add_attribute_error(
                        path,
                        "Incorrect attribute value type",
                        format!("expected {}, got {}", ty.describe(), json_kind(value)),
                    );
                }
            }
            AttributeKind::SingleNested(nested) => match value.as_object() {
                Some(inner) => validate_object(nested, inner, &path, diags),
                None => diags.add_attribute_error(
                    path,
                    "Incorrect attribute value type",
                    format!("expected object, got {}", json_kind(value)),
                ),
            },
        }
    }
}

fn run_validator(
    owner: &str,
    validator: &AttributeValidator,
    object: &Map<String, Value>,
    diags: &mut Diagnostics,
) {
    match validator {
        AttributeValidator::ExactlyOneOf { paths } => {
            let set = paths
                .iter()
                .filter(|p| object.get(p.as_str()).is_some_and(|v| !v.is_null()))
                .count();
            let listed = paths.join(",");

            if set == 0 {
                diags.add_attribute_error(
                    owner,
                    "Invalid Attribute Combination",
                    format!(
                        "No attribute specified when one (and only one) of [{}] is required",
                        listed
                    ),
                );
            } else if set > 1 {
                diags.add_attribute_error(
                    owner,
                    "Invalid Attribute Combination",
                    format!(
                        "{} attributes specified when one (and only one) of [{}] is required",
                        set, listed
                    ),
                );
            }
        }
    }
}
