use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};

fn script(dir: &TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, src).expect("write script");
    path
}

fn gsm() -> Command {
    Command::cargo_bin("gsm").expect("gsm binary")
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn run_prints_each_assigned_value() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "count.gsm", "int i;\nloop i < 3: begin i = i + 1 end\n");

    let assert = gsm().arg("run").arg(&file).assert().success();
    assert_eq!(stdout_of(assert.get_output()), "1\n2\n3\n");
}

#[test]
fn build_prints_the_ir_listing() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "sum.gsm", "int x = 2; x = x + 3;");

    let assert = gsm().arg("build").arg(&file).assert().success();
    let listing = stdout_of(assert.get_output());
    assert!(listing.contains("declare void @gsm_write(i32)"), "{}", listing);
    assert!(listing.contains("define i32 @main(i32 %argc, ptr %argv) {"), "{}", listing);
    assert!(listing.contains("call void @gsm_write(i32 %1)"), "{}", listing);
}

#[test]
fn build_writes_to_output_file() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "sum.gsm", "int x = 2; x = x + 3;");
    let out = td.path().join("sum.ll");

    let assert = gsm().arg("build").arg(&file).arg("-o").arg(&out).assert().success();
    assert!(stdout_of(assert.get_output()).is_empty());
    let written = fs::read_to_string(&out).expect("read output");
    assert!(written.starts_with("; ModuleID = 'gsm.expr'"));
}

#[test]
fn build_can_dump_the_tree_as_source() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "prec.gsm", "int x; x += 1 + 2 * 3;");

    let assert = gsm().args(["build", "--dump", "ast"]).arg(&file).assert().success();
    assert_eq!(stdout_of(assert.get_output()), "int x;\nx = x + (1 + (2 * 3));\n");
}

#[test]
fn build_can_dump_symbols_as_json() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "syms.gsm", "int a, b = 1; int a;");

    let assert = gsm()
        .args(["build", "--dump", "symbols", "--format", "json"])
        .arg(&file)
        .assert()
        .success();
    let rows: serde_json::Value = serde_json::from_str(&stdout_of(assert.get_output())).expect("json");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["name"], "a");
    assert_eq!(rows[2]["bound"], true);
    assert_eq!(rows[0]["bound"], false);
}

#[test]
fn syntax_errors_are_reported_and_fail() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "bad.gsm", "int a, b = 1, 2, 3;");

    let assert = gsm().arg("build").arg(&file).assert().code(1);
    let output = assert.get_output();
    assert!(stdout_of(output).is_empty());
    let stderr = stderr_of(output);
    assert!(stderr.contains("Unexpected: ,"), "{}", stderr);
    assert!(stderr.contains("bad.gsm:1:16"), "{}", stderr);
}

#[test]
fn undeclared_names_fail_lowering() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "undeclared.gsm", "if a > b: begin x = 1 end elif c: begin x = 2 end");

    let assert = gsm().arg("run").arg(&file).assert().code(1);
    let stderr = stderr_of(assert.get_output());
    assert!(stderr.contains("use of undeclared name 'a'"), "{}", stderr);
}

#[test]
fn step_limit_stops_endless_loops() {
    let td = tempdir().expect("tempdir");
    let file = script(&td, "spin.gsm", "int i; loop 1: begin i = i + 1 end");

    let assert = gsm()
        .args(["run", "--step-limit", "100"])
        .arg(&file)
        .assert()
        .code(1);
    let stderr = stderr_of(assert.get_output());
    assert!(stderr.contains("step limit of 100"), "{}", stderr);
}

#[test]
fn missing_script_fails() {
    let td = tempdir().expect("tempdir");
    let assert = gsm().arg("run").arg(td.path().join("absent.gsm")).assert().code(1);
    assert!(stderr_of(assert.get_output()).contains("Missing script"));
}
