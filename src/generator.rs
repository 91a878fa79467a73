//! Request generation pipeline
//!
//! Declare → bind → build → serialize, in one pass. Any error aborts before
//! anything is written.

use std::io::Write;
use tracing::{debug, info};

use crate::error::Result;
use crate::params::{BoundParameters, ParameterBindings, ParameterSet};
use crate::request::{build_request, RequestDocument};
use crate::rspec;
use crate::types::OutputFormat;

/// Profile generator holding the declared parameters
#[derive(Debug, Clone, Default)]
pub struct Generator {
    parameters: ParameterSet,
}

impl Generator {
    /// Create a generator with the profile's parameter declarations
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Bind overrides and build the descriptor tree
    pub fn build(&self, bindings: &ParameterBindings) -> Result<(BoundParameters, RequestDocument)> {
        debug!("Binding {} override(s)", bindings.len());
        let bound = self.parameters.bind(bindings)?;
        let doc = build_request(&bound);
        info!("{}", doc.summary());
        Ok((bound, doc))
    }

    /// Bind, build and render to a string
    pub fn generate(&self, bindings: &ParameterBindings, format: OutputFormat) -> Result<String> {
        let (_, doc) = self.build(bindings)?;
        rspec::render(&doc, format)
    }

    /// Bind, build and write the rendered document
    pub fn generate_to<W: Write>(
        &self,
        bindings: &ParameterBindings,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<BoundParameters> {
        let (bound, doc) = self.build(bindings)?;
        rspec::write_document(&doc, format, out)?;
        Ok(bound)
    }
}
