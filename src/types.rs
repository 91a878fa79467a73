//! Type-safe enums for parameter declarations and output selection.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Declared type of a profile parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterType {
    String,
    Boolean,
}

/// Serialization format for the request document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// GENI v3 request RSpec
    #[default]
    Xml,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parameter_type_display() {
        assert_eq!(ParameterType::String.to_string(), "string");
        assert_eq!(ParameterType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_parameter_type_serde_matches_display() {
        for ty in ParameterType::iter() {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty));
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::from_str("xml").unwrap(), OutputFormat::Xml);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("yaml").is_err());
    }

    #[test]
    fn test_output_format_default_is_xml() {
        assert_eq!(OutputFormat::default(), OutputFormat::Xml);
    }
}
