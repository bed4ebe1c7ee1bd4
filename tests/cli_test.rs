// Integration tests for the uri-params command line

use std::path::Path;

use uri_params::cli::{build_cli, execute};

fn run(args: &[&str]) -> (anyhow::Result<()>, String) {
    let mut argv = vec!["uri-params"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();

    let mut out = Vec::new();
    let result = execute(&matches, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn write_file(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_params_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");

    let (result, out) = run(&["params", "/api/my-route/{/path*}{?foo:8}", "--config", &config]);
    assert!(result.is_ok());

    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({ "path": "composite", "foo": "any" }));
}

#[test]
fn test_params_yaml_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");

    let (result, out) = run(&["params", "{a}{?b*}", "--format", "yaml", "--config", &config]);
    assert!(result.is_ok());
    assert!(out.contains("a: any"));
    assert!(out.contains("b: composite"));
}

#[test]
fn test_settings_choose_format_and_merge() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "settings.yml", "format: yaml\nmerge: restrictive\n");

    let (result, out) = run(&["--config", &config, "params", "{q*}{q}"]);
    assert!(result.is_ok());
    assert_eq!(out.trim(), "q: composite");

    // Flags beat the settings file
    let (result, out) = run(&[
        "params", "{q*}{q}", "--merge", "last-wins", "--format", "json", "--config", &config,
    ]);
    assert!(result.is_ok());
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({ "q": "any" }));
}

#[test]
fn test_check_ok() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");
    let values = write_file(dir.path(), "values.json", r#"{"path": ["a", "b"], "foo": "bar"}"#);

    let args: [&str; 6] = ["check", "{/path*}{?foo:8}", "--values", &values, "--config", &config];
    let (result, out) = run(&args);
    assert!(result.is_ok());
    assert_eq!(out.trim(), "ok");
}

#[test]
fn test_check_reports_violations() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");
    let values = write_file(dir.path(), "values.yml", "path: simpleValue\nfoo: true\n");

    let args: [&str; 6] = ["check", "{/path*}{?foo:8}", "--values", &values, "--config", &config];
    let (result, out) = run(&args);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("2 invalid parameter value(s)"));

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("'foo'"));
    assert!(lines[1].contains("'path'"));
}

#[test]
fn test_check_permissive_mode_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "settings.yml", "mode: permissive\n");
    let values = write_file(dir.path(), "values.yml", "foo: null\n");

    let (result, _) = run(&["check", "{foo}", "--values", &values, "--config", &config]);
    assert!(result.is_ok());

    let args: [&str; 7] = ["check", "{foo}", "--values", &values, "--strict", "--config", &config];
    let (result, _) = run(&args);
    assert!(result.is_err());
}

#[test]
fn test_check_without_template_is_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");
    let values = write_file(dir.path(), "values.json", r#"{"x": [[1]], "y": false}"#);

    let (result, out) = run(&["check", "--values", &values, "--config", &config]);
    assert!(result.is_ok());
    assert_eq!(out.trim(), "ok");
}

#[test]
fn test_json_values_file_uses_json_rules() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");

    // Duplicate keys are legal JSON (last one wins) but rejected by YAML
    let values = write_file(dir.path(), "values.json", r#"{"a": true, "a": "x"}"#);
    let (result, out) = run(&["check", "{a}", "--values", &values, "--config", &config]);
    assert!(result.is_ok());
    assert_eq!(out.trim(), "ok");

    // YAML-only syntax is not accepted in a .json file
    let values = write_file(dir.path(), "bad.json", "a: .inf\n");
    let (result, _) = run(&["check", "{a}", "--values", &values, "--config", &config]);
    assert!(result.unwrap_err().to_string().contains("Invalid values file"));
}

#[test]
fn test_check_rejects_non_object_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "empty.yml", "");
    let values = write_file(dir.path(), "values.json", "[1, 2, 3]");

    let (result, _) = run(&["check", "{a}", "--values", &values, "--config", &config]);
    assert!(result.unwrap_err().to_string().contains("must hold an object"));
}

#[test]
fn test_missing_settings_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yml");

    let (result, _) = run(&["params", "{a}", "--config", missing.to_str().unwrap()]);
    assert!(result.is_err());
}
