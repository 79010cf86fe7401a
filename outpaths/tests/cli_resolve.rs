//! CLI tests for `outpaths resolve` and `outpaths check`.
//!
//! Spawns the binary and checks exit codes and the JSON it prints.

use std::process::{Command, Output};

use outpaths::exit_codes;
use outpaths::test_support::{cyclic_tool, suffix_tool, write_catalog, write_fixture};
use serde_json::Value;

fn outpaths(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_outpaths"))
        .args(args)
        .output()
        .expect("run outpaths")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

#[test]
fn resolve_bet_with_mask() {
    let output = outpaths(&[
        "resolve",
        "BET",
        "--set",
        "in_file=/data/sub-01_T1w.nii.gz",
        "--set",
        "mask=true",
        "--out-dir",
        "/work",
    ]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let json = stdout_json(&output);
    assert_eq!(json["out_file"], "/work/sub-01_T1w_brain.nii.gz");
    assert_eq!(json["mask_file"], "/work/sub-01_T1w_brain_mask.nii.gz");
    assert!(json.get("meshfile").is_none());
}

#[test]
fn resolve_reads_inputs_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let inputs = write_fixture(
        temp.path(),
        "inputs.json",
        r#"{"in_file": "/data/epi.nii", "outputtype": "NIFTI"}"#,
    );
    let inputs = inputs.to_str().expect("utf-8 path");
    let output = outpaths(&["resolve", "Automask", "--inputs", inputs, "--out-dir", "/w"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let json = stdout_json(&output);
    assert_eq!(json["out_file"], "/w/epi_mask.nii");
}

#[test]
fn resolve_single_field() {
    let output = outpaths(&[
        "resolve",
        "MRIConvert",
        "--set",
        "in_file=/d/orig.mgz",
        "--set",
        "out_type=mgz",
        "--field",
        "out_file",
        "--out-dir",
        "/w",
    ]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout_json(&output), Value::from("/w/orig_out.mgz"));
}

#[test]
fn unknown_output_type_is_config_error() {
    let output = outpaths(&[
        "resolve",
        "BET",
        "--set",
        "in_file=/d/T1w.nii.gz",
        "--set",
        "output_type=ANALYZE",
    ]);
    assert_eq!(output.status.code(), Some(exit_codes::CONFIG));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ANALYZE"), "stderr: {stderr}");
}

#[test]
fn undeclared_field_is_invalid() {
    let output = outpaths(&["resolve", "BET", "--set", "bogus=1"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn cyclic_catalog_fails_at_resolution() {
    let temp = tempfile::tempdir().expect("tempdir");
    let catalog = write_catalog(temp.path(), "loop.yaml", vec![cyclic_tool("Loop")]);
    let catalog = catalog.to_str().expect("utf-8 path");
    let output = outpaths(&["resolve", "Loop", "--catalog", catalog]);
    assert_eq!(output.status.code(), Some(exit_codes::CONFIG));
}

#[test]
fn check_accepts_extra_catalog() {
    let temp = tempfile::tempdir().expect("tempdir");
    let catalog = write_catalog(temp.path(), "extra.yaml", vec![suffix_tool("Reorient", "_r")]);
    let catalog = catalog.to_str().expect("utf-8 path");
    let output = outpaths(&["check", "--catalog", catalog]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let output = outpaths(&["list", "--catalog", catalog]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|line| line.starts_with("Reorient\tfsl\t")));
}

#[test]
fn presuffix_keeps_compound_extension() {
    let output = outpaths(&["presuffix", "/d/foo.nii.gz", "--prefix", "a", "--suffix", "b"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "/d/afoob.nii.gz");
}
