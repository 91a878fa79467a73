//! Parameter declaration and binding
//!
//! The profile declares its parameters once, then binds caller overrides on
//! top of the declared defaults. Binding only coerces by declared type: there
//! are no range checks and no cross-parameter rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::{ProfileError, Result};
use crate::types::ParameterType;

/// Name of the OS image parameter
pub const OS_IMAGE: &str = "osImage";
/// Name of the setup toggle
pub const RUN_SETUP: &str = "runSetup";
/// Name of the data store toggle
pub const REQUEST_DATA_STORE: &str = "requestDataStore";

/// Ubuntu 22.04 standard image published by the Utah cluster
pub const DEFAULT_OS_IMAGE: &str =
    "urn:publicid:IDN+utah.cloudlab.us+image+emulab-ops:UBUNTU22-64-STD";

/// A typed parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    String(String),
    Boolean(bool),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A single declared parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Stable name used in bindings
    pub name: String,
    /// Label shown by the portal front end
    pub label: String,
    /// Declared type
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Value used when the caller supplies no override
    pub default_value: ParameterValue,
}

impl Parameter {
    /// Declare a string parameter
    pub fn string(name: &str, label: &str, default_value: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            param_type: ParameterType::String,
            default_value: ParameterValue::String(default_value.to_string()),
        }
    }

    /// Declare a boolean parameter
    pub fn boolean(name: &str, label: &str, default_value: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            param_type: ParameterType::Boolean,
            default_value: ParameterValue::Boolean(default_value),
        }
    }

    /// Coerce a JSON value. The JSON type must match the declared type.
    pub fn coerce_json(&self, value: &Value) -> Result<ParameterValue> {
        match (self.param_type, value) {
            (ParameterType::String, Value::String(s)) => Ok(ParameterValue::String(s.clone())),
            (ParameterType::Boolean, Value::Bool(b)) => Ok(ParameterValue::Boolean(*b)),
            _ => Err(ProfileError::type_mismatch(
                &self.name,
                self.param_type,
                value.to_string(),
            )),
        }
    }

    /// Coerce a textual value by declared type.
    ///
    /// Strings are taken verbatim. Booleans accept only `true` or `false`,
    /// ignoring ASCII case.
    pub fn coerce_text(&self, text: &str) -> Result<ParameterValue> {
        match self.param_type {
            ParameterType::String => Ok(ParameterValue::String(text.to_string())),
            ParameterType::Boolean => {
                if text.eq_ignore_ascii_case("true") {
                    Ok(ParameterValue::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(ParameterValue::Boolean(false))
                } else {
                    Err(ProfileError::type_mismatch(
                        &self.name,
                        self.param_type,
                        format!("{:?}", text),
                    ))
                }
            }
        }
    }
}

/// A caller-supplied override before coercion
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    /// From a bindings file; must already carry the right JSON type
    Json(Value),
    /// From a NAME=VALUE pair; coerced by declared type
    Text(String),
}

/// Ordered list of overrides. Later entries win.
#[derive(Debug, Clone, Default)]
pub struct ParameterBindings {
    entries: Vec<(String, BindingValue)>,
}

impl ParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add a JSON-typed override
    pub fn push_json(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), BindingValue::Json(value)));
    }

    /// Add a textual override
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), BindingValue::Text(value.into())));
    }

    /// Parse and add a `NAME=VALUE` pair. Only the first `=` splits and
    /// neither side is trimmed.
    pub fn push_pair(&mut self, pair: &str) -> Result<()> {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| ProfileError::malformed_binding(pair))?;
        if name.is_empty() {
            return Err(ProfileError::malformed_binding(pair));
        }
        self.push_text(name, value);
        Ok(())
    }

    /// Add every entry of a JSON object map
    pub fn extend_json(&mut self, values: &BTreeMap<String, Value>) {
        for (name, value) in values {
            self.push_json(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, BindingValue)> {
        self.entries.iter()
    }
}

/// Declared parameters of the profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub parameters: Vec<Parameter>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            parameters: vec![
                Parameter::string(OS_IMAGE, "OS Image", DEFAULT_OS_IMAGE),
                Parameter::boolean(RUN_SETUP, "Run /local/repository/setup.sh on boot", true),
                Parameter::boolean(
                    REQUEST_DATA_STORE,
                    "Create and mount a local data store at /data (best effort).",
                    true,
                ),
            ],
        }
    }
}

impl ParameterSet {
    /// Look up a declared parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Bind overrides on top of the declared defaults.
    ///
    /// Fails on the first unknown name or type mismatch.
    pub fn bind(&self, bindings: &ParameterBindings) -> Result<BoundParameters> {
        let mut values: BTreeMap<String, ParameterValue> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.default_value.clone()))
            .collect();

        for (name, raw) in bindings.iter() {
            let param = self
                .get(name)
                .ok_or_else(|| ProfileError::unknown_parameter(name.as_str()))?;
            let value = match raw {
                BindingValue::Json(v) => param.coerce_json(v)?,
                BindingValue::Text(t) => param.coerce_text(t)?,
            };
            debug!("Bound {} = {}", name, value);
            values.insert(name.clone(), value);
        }

        BoundParameters::from_values(&values)
    }

    /// Bind with no overrides
    pub fn bind_defaults(&self) -> Result<BoundParameters> {
        self.bind(&ParameterBindings::new())
    }

    /// Pretty JSON of the declarations, for a portal front end
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The immutable, typed result of binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundParameters {
    pub os_image: String,
    pub run_setup: bool,
    pub request_data_store: bool,
}

impl Default for BoundParameters {
    fn default() -> Self {
        Self {
            os_image: DEFAULT_OS_IMAGE.to_string(),
            run_setup: true,
            request_data_store: true,
        }
    }
}

impl BoundParameters {
    fn from_values(values: &BTreeMap<String, ParameterValue>) -> Result<Self> {
        Ok(Self {
            os_image: required_str(values, OS_IMAGE)?,
            run_setup: required_bool(values, RUN_SETUP)?,
            request_data_store: required_bool(values, REQUEST_DATA_STORE)?,
        })
    }

    /// Bound values as a name -> JSON value map, suitable for a bindings file
    pub fn to_json_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert(OS_IMAGE.to_string(), Value::String(self.os_image.clone()));
        map.insert(RUN_SETUP.to_string(), Value::Bool(self.run_setup));
        map.insert(
            REQUEST_DATA_STORE.to_string(),
            Value::Bool(self.request_data_store),
        );
        map
    }
}

fn required_str(values: &BTreeMap<String, ParameterValue>, name: &str) -> Result<String> {
    match values.get(name) {
        Some(ParameterValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(ProfileError::type_mismatch(
            name,
            ParameterType::String,
            other.to_string(),
        )),
        None => Err(ProfileError::unknown_parameter(name)),
    }
}

fn required_bool(values: &BTreeMap<String, ParameterValue>, name: &str) -> Result<bool> {
    match values.get(name) {
        Some(ParameterValue::Boolean(b)) => Ok(*b),
        Some(other) => Err(ProfileError::type_mismatch(
            name,
            ParameterType::Boolean,
            other.to_string(),
        )),
        None => Err(ProfileError::unknown_parameter(name)),
    }
}
