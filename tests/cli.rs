//! Tests for the zoptable binary

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn zoptable(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zoptable"))
        .args(args)
        .output()
        .expect("failed to run zoptable")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("zoptable-cli-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_default_run_prints_both_tables() {
    let output = zoptable(&[]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("STD_OPCODE_TABLE = [\n  [ // 0\n"));
    assert!(stdout.contains("\nEXT_OPCODE_TABLE = [\n"));
    assert!(stdout.ends_with("]\n"));
}

#[test]
fn test_help_exits_nonzero_without_output() {
    let output = zoptable(&["--help"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("USAGE"));
}

#[test]
fn test_version_flag() {
    let output = zoptable(&["-V"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("zoptable "));
}

#[test]
fn test_unknown_argument() {
    let output = zoptable(&["--frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown argument: --frobnicate"));
}

#[test]
fn test_missing_input_file() {
    let output = zoptable(&["--input", "/nonexistent/opcodes.adoc"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Input file not found"));
}

#[test]
fn test_malformed_row_reports_line() {
    let dir = scratch_dir("malformed");
    let input = dir.join("opcodes.adoc");
    fs::write(
        &input,
        "   |0OP |  0 |176 |`b0` |`10110000` |S | |   |   |   | xref:x.adoc#rtrue[`*rtrue*`]\n\
         \n\
         |0OP | 1 | 177\n",
    )
    .unwrap();

    let output = zoptable(&["-i", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid row 3"), "{}", stderr);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_config_names_and_output_file() {
    let dir = scratch_dir("config");
    let config = dir.join("zoptable.toml");
    let out = dir.join("opcodes.src");
    fs::write(
        &config,
        "standard_table_name = \"OPS\"\nextended_table_name = \"EXT_OPS\"\nslot_comments = false\n",
    )
    .unwrap();

    let output = zoptable(&["-c", config.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("OPS = [\n  [],\n"));
    assert!(text.contains("\nEXT_OPS = [\n"));
    assert!(!text.contains("//"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_config_source_is_relative_to_config() {
    let dir = scratch_dir("source");
    fs::write(
        dir.join("opcodes.adoc"),
        "   |0OP |  10 |186 |`ba` |`10111010` |S | |   |   |   | xref:x.adoc#quit[`*quit*`]\n",
    )
    .unwrap();
    let config = dir.join("zoptable.toml");
    fs::write(&config, "source = \"opcodes.adoc\"\ntrim_trailing_empty_slots = true\n").unwrap();

    let output = zoptable(&["--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("  [ // 186\n    [1, \"quit_v1\", [], false, false],\n  ],\n]\n"));
    assert!(stdout.ends_with("EXT_OPCODE_TABLE = [\n]\n"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_invalid_config() {
    let dir = scratch_dir("badconfig");
    let config = dir.join("zoptable.toml");
    fs::write(&config, "standard_table_name = 42\n").unwrap();

    let output = zoptable(&["-c", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config"));

    fs::remove_dir_all(&dir).unwrap();
}
