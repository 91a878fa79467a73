//! Parameter bindings files.
//!
//! A bindings file is a JSON object mapping parameter names to values, the
//! same shape the portal front end submits:
//!
//! ```json
//! { "osImage": "urn:publicid:IDN+...", "runSetup": false }
//! ```
//!
//! Values keep their JSON types so that binding can reject a string where a
//! boolean was declared.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::params::{BoundParameters, ParameterBindings};

/// Parameter overrides that can be saved/loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingsFile {
    pub values: BTreeMap<String, Value>,
}

impl BindingsFile {
    /// Save bindings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize bindings to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write bindings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load bindings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read bindings from {:?}", path.as_ref()))?;

        let bindings: Self =
            serde_json::from_str(&content).context("Failed to parse bindings JSON")?;

        Ok(bindings)
    }

    /// Append these values to an override list
    pub fn apply_to(&self, bindings: &mut ParameterBindings) {
        bindings.extend_json(&self.values);
    }
}

impl From<&BoundParameters> for BindingsFile {
    fn from(bound: &BoundParameters) -> Self {
        Self {
            values: bound.to_json_map(),
        }
    }
}
