use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const GIT_DEFINITION: &str = r#"name: git
error_code: 2
arguments:
  - name: verbose
    short: v
    type: boolean
subcommands:
  - name: commit
    error_code: 3
    arguments:
      - name: message
        short: m
        required: true
      - name: paths
        type: strings
        min_values: 1
        max_values: 3
"#;

fn write_definition(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write definition");
    path
}

fn argweave(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_argweave"))
        .args(args)
        .output()
        .expect("failed to run argweave")
}

fn parse(definition: &Path, extra: &[&str]) -> Output {
    let definition = definition.to_str().unwrap();
    let mut args = vec!["parse", "--definition", definition];
    args.extend_from_slice(extra);
    argweave(&args)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn parse_prints_result_tree() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yaml", GIT_DEFINITION);

    let output = parse(&definition, &["--", "-v commit -m 'first commit' --paths [a b]"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["error_code"], 0);
    assert_eq!(json["arguments"]["arguments"]["verbose"], true);
    let commit = &json["arguments"]["subcommand"];
    assert_eq!(commit["command"], "commit");
    assert_eq!(commit["arguments"]["message"], "first commit");
    assert_eq!(commit["arguments"]["paths"], serde_json::json!(["a", "b"]));
    assert!(output.stderr.is_empty());
}

#[test]
fn parse_failure_uses_innermost_error_code() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yaml", GIT_DEFINITION);

    let output = parse(&definition, &["--", "commit", "--paths", "[a", "b", "c", "d]"]);
    assert_eq!(output.status.code(), Some(3));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("incorrect number of values: expected from 1 to 3 values, received 4"));
    assert!(stderr.contains("required argument not used"));

    let json = stdout_json(&output);
    assert_eq!(json["error_code"], 3);
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(2));
}

#[test]
fn parse_display_level_filters_stderr() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yaml", GIT_DEFINITION);

    let output = parse(
        &definition,
        &["--display-level", "error", "--format", "yaml", "--", "stray"],
    );
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("token does not match any argument (command 'git', token 1 \"stray\")"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("error_code: 2"));
}

#[test]
fn parse_fail_on_accepts_only_warning_and_error() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yaml", GIT_DEFINITION);

    let output = parse(&definition, &["--fail-on", "info", "--", "-v"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value 'info'"));

    let output = parse(&definition, &["--fail-on", "warning", "--", "-v"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn parse_argv_mode_keeps_elements_whole() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yaml", GIT_DEFINITION);

    let output = parse(
        &definition,
        &["--argv", "--", "commit", "-m", "two words", "--paths", "it's"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    let commit = &json["arguments"]["subcommand"]["arguments"];
    assert_eq!(commit["message"], "two words");
    assert_eq!(commit["paths"], serde_json::json!(["it's"]));
}

#[test]
fn parse_accepts_json_definitions() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(
        &dir,
        "tool.json",
        r#"{"name":"tool","arguments":[{"name":"count","short":"c","type":"integer","default":"5"}]}"#,
    );

    let output = parse(&definition, &[]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["arguments"]["arguments"]["count"], 5);

    let output = parse(&definition, &["--", "-c x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid integer value: \"x\""));
}

#[test]
fn tokens_prints_levels() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yaml", GIT_DEFINITION);

    let output = argweave(&[
        "tokens",
        "--definition",
        definition.to_str().unwrap(),
        "--",
        "-v commit --message=hi",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("git (depth 0)"));
    assert!(stdout.contains("SubCommandMarker"));
    assert!(stdout.contains("  commit (depth 1)"));
    assert!(stdout.contains("ArgumentAlias"));
    assert!(stdout.contains("\"hi\""));
}

#[test]
fn check_prints_command_tree() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "git.yml", GIT_DEFINITION);

    let output = argweave(&["check", "--definition", definition.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("git [error code 2]\n"));
    assert!(stdout.contains("  commit [error code 3]"));
    assert!(stdout.contains("--message, -m  (1 value) required"));
}

#[test]
fn check_rejects_invalid_definitions() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(
        &dir,
        "dup.yaml",
        "name: tool\narguments:\n  - name: alpha\n    short: a\n  - name: again\n    short: a\n",
    );

    let output = argweave(&["check", "--definition", definition.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid definition: duplicate argument identifier \"a\""));
}

#[test]
fn missing_definition_is_an_error() {
    let output = argweave(&["check", "--definition", "/nonexistent/definition.yaml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: I/O error"));
}
