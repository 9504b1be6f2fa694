use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("argbind-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn argbind() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argbind"))
}

const TAC_DECL: &str = r#"{
  "name": "tac",
  "description": "Write each FILE to standard output, last line first.",
  "args": [
    { "kind": "flag", "names": "-b,--before", "help": "attach the separator before instead of after" },
    { "kind": "flag", "names": "-r,--regex", "help": "interpret the separator as a regular expression" },
    { "kind": "option", "names": "-s,--separator", "value-help": "STRING", "help": "use STRING as the separator instead of newline" },
    { "kind": "positional", "name": "files", "value-help": "FILE" }
  ]
}"#;

fn write_decl(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write declaration");
    path
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

#[test]
fn help_works() {
    let out = argbind()
        .arg("--help")
        .output()
        .expect("failed to run argbind --help");
    assert_success(&out, "argbind --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argbind") && stdout.contains("run") && stdout.contains("usage"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn run_prints_parsed_values() {
    let dir = make_temp_dir("run-text");
    let decl = write_decl(&dir, "tac.json", TAC_DECL);

    let out = argbind()
        .arg("run")
        .arg("--decl")
        .arg(&decl)
        .arg("--")
        .args(["-b", "--separator=,", "a.txt", "-"])
        .output()
        .expect("failed to run argbind run");
    assert_success(&out, "argbind run");

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("b     = true"), "stdout:\n{stdout}");
    assert!(stdout.contains("r     = false"), "stdout:\n{stdout}");
    assert!(stdout.contains("s     = ,"), "stdout:\n{stdout}");
    assert!(stdout.contains("files = [a.txt, -]"), "stdout:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_json_output() {
    let dir = make_temp_dir("run-json");
    let decl = write_decl(&dir, "tac.json", TAC_DECL);

    let out = argbind()
        .args(["run", "--json", "--decl"])
        .arg(&decl)
        .args(["--", "-rs", "+", "x"])
        .output()
        .expect("failed to run argbind run --json");
    assert_success(&out, "argbind run --json");

    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(json["b"], serde_json::json!(false));
    assert_eq!(json["r"], serde_json::json!(true));
    assert_eq!(json["s"], serde_json::json!("+"));
    assert_eq!(json["files"], serde_json::json!(["x"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_reports_parse_errors_with_the_program_name() {
    let dir = make_temp_dir("run-error");
    let decl = write_decl(&dir, "tac.json", TAC_DECL);

    let out = argbind()
        .arg("run")
        .arg("--decl")
        .arg(&decl)
        .args(["--", "-x"])
        .output()
        .expect("failed to run argbind run");
    assert_eq!(out.status.code(), Some(2), "status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("tac: invalid option -- -x"), "stderr:\n{stderr}");

    let out = argbind()
        .arg("run")
        .arg("--decl")
        .arg(&decl)
        .args(["--", "-s"])
        .output()
        .expect("failed to run argbind run");
    assert_eq!(out.status.code(), Some(2), "status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("tac: option requires an argument -- -s"),
        "stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unknown_option_mode_from_the_declaration() {
    let dir = make_temp_dir("run-unknown");
    let decl = write_decl(
        &dir,
        "echo.json",
        r#"{
  "name": "echo",
  "unknown-option-as-positional": true,
  "args": [
    { "kind": "flag", "names": "n" },
    { "kind": "flag", "names": "E,!e", "default": true },
    { "kind": "positional", "name": "others" }
  ]
}"#,
    );

    let out = argbind()
        .args(["run", "--json", "--decl"])
        .arg(&decl)
        .args(["--", "--test", "-n", "123456"])
        .output()
        .expect("failed to run argbind run");
    assert_success(&out, "argbind run (echo)");

    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(json["n"], serde_json::json!(false));
    assert_eq!(json["E"], serde_json::json!(true));
    assert_eq!(json["others"], serde_json::json!(["--test", "-n", "123456"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_renders_the_declared_parser() {
    let dir = make_temp_dir("usage");
    let decl = write_decl(&dir, "tac.json", TAC_DECL);

    let out = argbind()
        .arg("usage")
        .arg("--decl")
        .arg(&decl)
        .output()
        .expect("failed to run argbind usage");
    assert_success(&out, "argbind usage");

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("Usage: tac [OPTION]... [FILE]..."),
        "stdout:\n{stdout}"
    );
    assert!(stdout.contains("-s, --separator <STRING>"), "stdout:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_rejects_conflicting_names() {
    let dir = make_temp_dir("check-conflict");
    let decl = write_decl(
        &dir,
        "bad.json",
        r#"{ "args": [
  { "kind": "flag", "names": "v,verbose" },
  { "kind": "option", "names": "verbose" }
] }"#,
    );

    let out = argbind()
        .arg("check")
        .arg("--decl")
        .arg(&decl)
        .output()
        .expect("failed to run argbind check");
    assert!(!out.status.success(), "check unexpectedly succeeded");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("name conflict: '--verbose' is already registered"),
        "stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_lists_arguments() {
    let dir = make_temp_dir("check-ok");
    let decl = write_decl(&dir, "tac.json", TAC_DECL);

    let out = argbind()
        .arg("check")
        .arg("--json")
        .arg("--decl")
        .arg(&decl)
        .output()
        .expect("failed to run argbind check");
    assert_success(&out, "argbind check");

    let rows: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    let rows = rows.as_array().expect("expected a JSON array");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2]["name"], serde_json::json!("-s"));
    assert_eq!(rows[2]["type"], serde_json::json!("string"));
    assert_eq!(rows[3]["kind"], serde_json::json!("positional"));

    let _ = fs::remove_dir_all(&dir);
}
