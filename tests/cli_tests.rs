//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;
use vnfd_convert::documents::{from_json_str, from_yaml_str};
use vnfd_convert::paths::resolve;

fn vnfd_convert_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vnfd-convert"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_str().unwrap().to_string()
}

// ============================================================================
// to-sol6 Command Tests
// ============================================================================

#[test]
fn test_cli_to_sol6_yaml() {
    let output = Command::new(vnfd_convert_bin())
        .args(["to-sol6", &fixture("vnf_tosca.yaml")])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "to-sol6 should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = std::fs::read_to_string(fixtures_dir().join("vnf_sol6.yaml")).unwrap();
    assert_eq!(from_yaml_str(&stdout).unwrap(), from_yaml_str(&expected).unwrap());
}

#[test]
fn test_cli_to_sol6_json_with_input() {
    let output = Command::new(vnfd_convert_bin())
        .args([
            "to-sol6",
            "--json",
            "--input",
            "FLAVOR_VAR=xl-flavor",
            &fixture("vnf_tosca.yaml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "to-sol6 --json should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tree = from_json_str(&stdout).expect("Output should be valid JSON");
    let names: Vec<_> = resolve("vnfd.virtual-compute-descriptor", &tree)
        .unwrap()
        .as_seq()
        .unwrap()
        .iter()
        .filter_map(|d| d.get("flavor-name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["small", "xl-flavor"]);
}

#[test]
fn test_cli_to_sol6_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("vnfd.yaml");

    let status = Command::new(vnfd_convert_bin())
        .args(["to-sol6", &fixture("vnf_tosca.yaml"), "-o", out.to_str().unwrap()])
        .status()
        .expect("Failed to execute command");

    assert!(status.success());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("acme-router"));
}

#[test]
fn test_cli_verbose_logs_dialects() {
    let output = Command::new(vnfd_convert_bin())
        .env_remove("RUST_LOG")
        .args(["-v", "to-sol6", &fixture("vnf_tosca.yaml")])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("converting descriptor"), "stderr: {}", stderr);
    assert!(stderr.contains("tosca") && stderr.contains("sol6"), "stderr: {}", stderr);
}

#[test]
fn test_cli_bad_input_argument() {
    let output = Command::new(vnfd_convert_bin())
        .args(["to-sol6", "--input", "novalue", &fixture("vnf_tosca.yaml")])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "NAME=VALUE is required");
}

#[test]
fn test_cli_missing_file() {
    let output = Command::new(vnfd_convert_bin())
        .args(["to-sol6", "/nonexistent/vnf.yaml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "should report the error");
}

// ============================================================================
// to-sol1 and find Command Tests
// ============================================================================

#[test]
fn test_cli_to_sol1() {
    let output = Command::new(vnfd_convert_bin())
        .args(["to-sol1", &fixture("vnf_sol6.yaml")])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "to-sol1 should succeed");
    let tree = from_yaml_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(
        resolve("topology_template.node_templates.c1.type", &tree)
            .unwrap()
            .as_str(),
        Some("tosca.nodes.nfv.Vdu.Compute")
    );
}

#[test]
fn test_cli_find() {
    let output = Command::new(vnfd_convert_bin())
        .args([
            "find",
            &fixture("vnf_tosca.yaml"),
            "--key",
            "type",
            "--value",
            "tosca.nodes.nfv.VduCp",
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "find should succeed");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["c1_mgmt", "c1_orch", "c2_orch"]);
}

#[test]
fn test_cli_keys() {
    let output = Command::new(vnfd_convert_bin())
        .args(["keys"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vdu_type: tosca.nodes.nfv.Vdu.Compute"));
}
