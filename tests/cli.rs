//! End-to-end tests driving the built `r9cc` binary.

use std::process::{Command, Output};

fn run(args: &[&str], target: &str) -> Output {
  Command::new(env!("CARGO_BIN_EXE_r9cc"))
    .args(args)
    .env("R9CC_TARGET", target)
    .env_remove("RUST_LOG")
    .output()
    .expect("failed to spawn r9cc")
}

fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn compiles_to_stdout() {
  let output = run(&["1+2*3"], "aarch64");
  assert!(output.status.success());
  let expected = r9cc::generate_assembly_for("1+2*3", r9cc::Target::Aarch64).unwrap();
  assert_eq!(stdout(&output), expected);
  assert!(stderr(&output).is_empty());
}

#[test]
fn honours_target_variable() {
  let output = run(&["7"], "x86_64");
  assert!(output.status.success());
  assert!(stdout(&output).contains("    mov $7, %rax\n"));
}

#[test]
fn wrong_argument_count_prints_usage() {
  for args in [&[][..], &["1", "2"][..]] {
    let output = run(args, "aarch64");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("invalid number of arguments"));
    assert!(stderr(&output).contains("usage:"));
  }
}

#[test]
fn syntax_error_exits_without_output() {
  let output = run(&["1+"], "aarch64");
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert_eq!(stderr(&output), "1+\n  ^ expected a number, but got \"EOF\"\n");
}

#[test]
fn lexical_error_points_at_character() {
  let output = run(&["1&2"], "aarch64");
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert_eq!(stderr(&output), "1&2\n ^ invalid token: '&'\n");
}

#[test]
fn empty_argument_is_a_syntax_error() {
  let output = run(&[""], "aarch64");
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(stderr(&output), "\n^ expression is empty\n");
}

#[test]
fn unknown_target_is_rejected() {
  let output = run(&["1"], "mips");
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert!(stderr(&output).contains("unknown target \"mips\""));
}
