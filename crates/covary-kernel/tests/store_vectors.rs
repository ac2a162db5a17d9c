//! Integration tests: run the store scenario vectors.
//!
//! Each fixture in tests/fixtures/ has:
//! - case.json: the store scenario
//! - expect.json: the expected result
//!
//! These tests load the fixtures, run the store on a fresh array from the
//! standard universe, and compare the serialized result to the expectation.

use covary_kernel::{StoreCase, Universe, run_store_case};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let case_path = dir.join("case.json");
    let case_json = read_json(&case_path);
    let expected = read_json(&dir.join("expect.json"));

    let case = StoreCase::from_fixture(&case_json)
        .unwrap_or_else(|e| panic!("failed to parse case from {}: {e}", case_path.display()));

    let result = run_store_case(&Universe::standard(), &case);
    let result_json = serde_json::to_value(&result).expect("failed to serialize result");

    assert_eq!(
        result_json,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&result_json).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
}

#[test]
fn identity_array_accepts_null() {
    run_fixture("identity_array_accepts_null");
}

#[test]
fn interface_array_rejects_identity() {
    run_fixture("interface_array_rejects_identity");
}

#[test]
fn primitive_array_rejects_null() {
    run_fixture("primitive_array_rejects_null");
}

#[test]
fn value_array_bounds_before_success() {
    run_fixture("value_array_bounds_before_success");
}

#[test]
fn primitive_array_accepts_primitive() {
    run_fixture("primitive_array_accepts_primitive");
}

#[test]
fn primitive_array_bounds_before_null() {
    run_fixture("primitive_array_bounds_before_null");
}

#[test]
fn null_declared_primitive_not_applicable() {
    run_fixture("null_declared_primitive_not_applicable");
}

#[test]
fn interface_array_accepts_value_class() {
    run_fixture("interface_array_accepts_value_class");
}

#[test]
fn every_fixture_has_a_test() {
    let mut names: Vec<String> = std::fs::read_dir(fixtures_dir())
        .expect("fixtures dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "identity_array_accepts_null",
            "interface_array_accepts_value_class",
            "interface_array_rejects_identity",
            "null_declared_primitive_not_applicable",
            "primitive_array_accepts_primitive",
            "primitive_array_bounds_before_null",
            "primitive_array_rejects_null",
            "value_array_bounds_before_success",
        ]
    );
}
