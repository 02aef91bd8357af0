use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use std::path::Path;
use std::process::{Command, Output};

const FOO_KT: &str = include_str!("../fixtures/Foo.kt");
const SHAPES_JAVA: &str = include_str!("../fixtures/Shapes.java");

fn adx(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_adx"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn extract_prints_json_report() {
    let temp = TempDir::new().unwrap();
    temp.child("src/Foo.kt").write_str(FOO_KT).unwrap();

    let output = adx(temp.path(), &["extract", "src"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(predicate::str::contains("Foo demo class").eval(&text));

    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    let declarations = &report["files"][0]["declarations"];
    assert_eq!(declarations[0]["name"], "Foo");
    assert_eq!(declarations[1]["name"], "FooA");
}

#[test]
fn extract_writes_output_file() {
    let temp = TempDir::new().unwrap();
    temp.child("Shapes.java").write_str(SHAPES_JAVA).unwrap();

    let output = adx(temp.path(), &["extract", "Shapes.java", "--output", "docs/shapes.json"]);
    assert!(output.status.success());

    let report = temp.child("docs/shapes.json");
    report.assert(predicate::path::exists());
    report.assert(predicate::str::contains("\"unknown-parameter\""));
}

#[test]
fn extract_unknown_extension_fails() {
    let temp = TempDir::new().unwrap();
    temp.child("main.go").write_str("package main\n").unwrap();

    let output = adx(temp.path(), &["extract", "main.go"]);
    assert!(!output.status.success());
    assert!(predicate::str::contains("go").eval(&String::from_utf8_lossy(&output.stderr)));
}

#[test]
fn check_fails_only_in_strict_mode_on_warnings() {
    let temp = TempDir::new().unwrap();
    temp.child("Shapes.java").write_str(SHAPES_JAVA).unwrap();

    let relaxed = adx(temp.path(), &["check", "Shapes.java"]);
    assert!(relaxed.status.success());
    assert!(predicate::str::contains("0 errors, 2 warnings").eval(&stdout(&relaxed)));

    let strict = adx(temp.path(), &["check", "--strict", "Shapes.java"]);
    assert!(!strict.status.success());
}

#[test]
fn check_fails_on_malformed_comment() {
    let temp = TempDir::new().unwrap();
    temp.child("Broken.kt").write_str("class Ok {\n}\n/** never closed\n").unwrap();

    let output = adx(temp.path(), &["check", "Broken.kt"]);
    assert!(!output.status.success());
    assert!(predicate::str::contains("Broken.kt:3").eval(&stdout(&output)));
}

#[test]
fn languages_lists_builtin_adapters() {
    let temp = TempDir::new().unwrap();

    let output = adx(temp.path(), &["languages"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for language in ["kotlin", "swift", "java", "cpp"] {
        assert!(text.contains(language), "missing {} in {}", language, text);
    }
    assert!(text.contains(".kt"));
}

#[test]
fn init_creates_config_once() {
    let temp = TempDir::new().unwrap();

    let first = adx(temp.path(), &["init"]);
    assert!(first.status.success());
    temp.child("adx.toml").assert(predicate::str::contains("lookahead_lines = 3"));

    let second = adx(temp.path(), &["init"]);
    assert!(!second.status.success());
}

#[test]
fn config_adds_custom_adapter() {
    let temp = TempDir::new().unwrap();
    temp.child("adx.toml")
        .write_str(
            r#"
[project]
name = "scripts"
source_dirs = ["."]
ignore_patterns = []

[parsing]
languages = []
max_file_size = 65536

[output]
pretty = false
include_diagnostics = true

[[adapters]]
id = "groovy"
extensions = ["groovy"]
block_comment = { open = "/**", middle = "*", close = "*/" }
type_keywords = ["class"]
function_keywords = ["def"]
"#,
        )
        .unwrap();
    temp.child("Greeter.groovy")
        .write_str("/** Says hello. */\nclass Greeter {\n}\n")
        .unwrap();

    let languages = adx(temp.path(), &["languages"]);
    assert_eq!(stdout(&languages).trim_end(), format!("{:<10} {}", "groovy", ".groovy"));

    let output = adx(temp.path(), &["extract"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["files"][0]["language"], "groovy");
    assert_eq!(report["files"][0]["declarations"][0]["summary"], "Says hello.");
}
