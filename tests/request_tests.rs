//! End-to-end tests for request generation
//!
//! These tests verify:
//! - The default document
//! - All four toggle combinations
//! - Bindings files feeding the generator
//! - Type mismatches abort generation

use std::io::Write;
use tempfile::NamedTempFile;

use rspec_profile::params::{DEFAULT_OS_IMAGE, ParameterBindings};
use rspec_profile::{BindingsFile, Generator, OutputFormat, ProfileError, RequestDocument};

fn generate_json(bindings: &ParameterBindings) -> RequestDocument {
    let json = Generator::new()
        .generate(bindings, OutputFormat::Json)
        .expect("generation should succeed");
    serde_json::from_str(&json).expect("JSON output should parse back")
}

// =============================================================================
// Default Invocation
// =============================================================================

#[test]
fn test_default_invocation() {
    let doc = generate_json(&ParameterBindings::new());
    assert_eq!(doc.nodes.len(), 1);

    let node = &doc.nodes[0];
    assert_eq!(node.hardware_type, "r7525");
    assert!(node.component_manager_id.contains("clemson.cloudlab.us"));
    assert_eq!(node.disk_image, DEFAULT_OS_IMAGE);

    let bs = node.blockstore.as_ref().unwrap();
    assert_eq!(bs.mount_point, "/data");
    assert_eq!(bs.size, "2000GB");
    assert!(bs.best_effort);
    assert!(!bs.readonly);

    assert_eq!(node.services.len(), 1);
    assert_eq!(node.services[0].command, "sudo -E bash /local/repository/setup.sh");
}

#[test]
fn test_default_xml_mentions_everything() {
    let xml = Generator::new()
        .generate(&ParameterBindings::new(), OutputFormat::Xml)
        .unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"type="request""#));
    assert!(xml.contains("urn:publicid:IDN+clemson.cloudlab.us+authority+cm"));
    assert!(xml.contains(r#"<hardware_type name="r7525"/>"#));
    assert!(xml.contains(r#"mountpoint="/data""#));
    assert!(xml.contains(r#"command="sudo -E bash /local/repository/setup.sh""#));
}

// =============================================================================
// Toggle Combinations
// =============================================================================

#[test]
fn test_all_toggle_combinations() {
    let mut seen = Vec::new();
    for data_store in ["true", "false"] {
        for run_setup in ["true", "false"] {
            let mut bindings = ParameterBindings::new();
            bindings.push_pair(&format!("requestDataStore={}", data_store)).unwrap();
            bindings.push_pair(&format!("runSetup={}", run_setup)).unwrap();

            let xml = Generator::new().generate(&bindings, OutputFormat::Xml).unwrap();
            assert_eq!(xml.contains("emulab:blockstore"), data_store == "true");
            assert_eq!(xml.contains("<execute "), run_setup == "true");
            assert_eq!(xml.matches("<node ").count(), 1);
            seen.push(xml);
        }
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4, "Each combination should render differently");
}

#[test]
fn test_custom_os_image() {
    let mut bindings = ParameterBindings::new();
    bindings.push_pair("osImage=X").unwrap();
    let doc = generate_json(&bindings);
    assert_eq!(doc.nodes[0].disk_image, "X");
}

// =============================================================================
// Bindings Files
// =============================================================================

#[test]
fn test_bindings_file_then_cli_pair() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(br#"{"osImage": "urn:from-file", "runSetup": false}"#)
        .unwrap();
    temp_file.flush().unwrap();

    let mut bindings = ParameterBindings::new();
    BindingsFile::load_from_file(temp_file.path())
        .unwrap()
        .apply_to(&mut bindings);
    bindings.push_pair("osImage=urn:from-cli").unwrap();

    let doc = generate_json(&bindings);
    assert_eq!(doc.nodes[0].disk_image, "urn:from-cli");
    assert!(doc.nodes[0].services.is_empty());
    assert!(doc.nodes[0].blockstore.is_some());
}

// =============================================================================
// Binding Failures
// =============================================================================

#[test]
fn test_non_boolean_run_setup_fails() {
    let mut bindings = ParameterBindings::new();
    bindings.push_json("runSetup", serde_json::json!("yes"));

    let result = Generator::new().generate(&bindings, OutputFormat::Xml);
    match result {
        Err(ProfileError::TypeMismatch { name, .. }) => assert_eq!(name, "runSetup"),
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_unknown_parameter_fails() {
    let mut bindings = ParameterBindings::new();
    bindings.push_pair("hardwareType=d430").unwrap();
    assert!(matches!(
        Generator::new().generate(&bindings, OutputFormat::Xml),
        Err(ProfileError::UnknownParameter(_))
    ));
}
