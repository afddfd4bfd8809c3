//! Integration tests for the nb2md binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

/// Run nb2md in `dir` with the given arguments
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nb2md"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run nb2md")
}

#[test]
fn test_convert_to_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(
        dir.path(),
        &["--src", &fixture("quick.json"), "--dst", "out/quick.md"],
    );
    assert!(output.status.success(), "nb2md failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("out/quick.md"));
    assert!(stdout.contains("Operation completed."));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported paragraph type: '%unknown f...'"));

    let content = fs::read_to_string(dir.path().join("out/quick.md")).unwrap();
    insta::assert_snapshot!(content, @r#"
**hi**

---

### [#1]


```
%pyspark print(1)
```
Output:

```
1
```
"#);
}

#[test]
fn test_auto_destination_for_jupyter() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["--src", &fixture("quick.json"), "--to", "ipynb"]);
    assert!(output.status.success(), "nb2md failed: {:?}", output);

    let written = dir.path().join("Quick.ipynb");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(value["metadata"]["name"], "Quick");
    assert_eq!(value["cells"].as_array().unwrap().len(), 2);
    assert_eq!(value["cells"][1]["execution_count"], 1);
}

#[test]
fn test_auto_destination_defaults_to_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["--src", &fixture("quick.json"), "-q"]);
    assert!(output.status.success(), "nb2md failed: {:?}", output);
    assert!(output.stdout.is_empty());
    assert!(dir.path().join("Quick.nb.md").exists());
}

#[test]
fn test_config_sets_target_format() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("_nb2md.toml"),
        "[output]\nformat = \"ipynb\"\n",
    )
    .unwrap();

    let output = run_in(dir.path(), &["--src", &fixture("quick.json")]);
    assert!(output.status.success(), "nb2md failed: {:?}", output);
    assert!(dir.path().join("Quick.ipynb").exists());
}

#[test]
fn test_auto_destination_needs_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["--src", &fixture("unnamed.ipynb")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("notebook name"));
}

#[test]
fn test_unsupported_destination() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(
        dir.path(),
        &["--src", &fixture("quick.json"), "--dst", "quick.html"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown output format: quick.html"));
}

#[test]
fn test_malformed_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["--src", &fixture("broken.json")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Parse error"));
}

#[test]
fn test_missing_src_is_a_zero_exit_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["--dst", "auto"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Required input pathname is required; exiting."));
}

#[test]
fn test_no_arguments_prints_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--src"));
}

#[test]
fn test_init_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["init"]);
    assert!(output.status.success(), "nb2md init failed: {:?}", output);

    let content = fs::read_to_string(dir.path().join("_nb2md.toml")).unwrap();
    assert!(content.starts_with("#:schema ./nb2md.schema.json"));
    assert!(content.contains("[output]"));
    assert!(content.contains("[fetch]"));
    assert!(content.contains("timeout_secs = 30"));

    // refuses to overwrite
    let output = run_in(dir.path(), &["init"]);
    assert!(!output.status.success());
}

#[test]
fn test_init_schema() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["init", "--schema"]);
    assert!(output.status.success(), "nb2md init --schema failed");

    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("schema is valid JSON");
    assert_eq!(schema["title"], "Config");
}
