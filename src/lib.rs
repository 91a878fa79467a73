//! rspec-profile Library
//!
//! Builds the request RSpec for a single r7525 GPU node at CloudLab Clemson
//! from three profile parameters.

pub mod bindings_file;
pub mod cli;
pub mod error;
pub mod generator;
pub mod params;
pub mod request;
pub mod rspec;
pub mod types;

// Re-export main types for convenience
pub use bindings_file::BindingsFile;
pub use error::{ProfileError, Result};
pub use generator::Generator;
pub use params::{BoundParameters, Parameter, ParameterBindings, ParameterSet, ParameterValue};
pub use request::{build_request, BootAction, NodeRequest, RequestDocument, StorageRequest};
pub use types::{OutputFormat, ParameterType};
