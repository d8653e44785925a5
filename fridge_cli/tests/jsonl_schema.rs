use assert_cmd::Command;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[filter]
window_size = 4

[presence]
enabled = false

[flush]
interval_ms = 20
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
fn json_events_have_topic_and_payload() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut input = String::from("devlol/h19/fridge/door CLOSE\n");
    for _ in 0..6 {
        input.push_str("devlol/h19/fridge/rawsamples 5.000\n");
    }
    input.push_str("devlol/h19/fridge/door OPEN\ndevlol/h19/fridge/door CLOSE\n");
    for _ in 0..6 {
        input.push_str("devlol/h19/fridge/rawsamples 3.240\n");
    }

    let out = Command::cargo_bin("fridge_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("run")
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "stdout: {stdout}");

    let v: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON line");
    assert_eq!(v["topic"], "devlol/h19/fridge/bottles/out");
    assert_eq!(v["payload"], "2");

    // Logs go to stderr as JSON too
    let stderr = String::from_utf8(out.stderr).unwrap();
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        let _: serde_json::Value = serde_json::from_str(line).expect("stderr log line is JSON");
    }
}

#[rstest]
fn json_self_check_line() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("fridge_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("self-check")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(v["self_check"], "ok");
    assert_eq!(v["events"], 3);
}

#[rstest]
fn json_error_schema_on_bad_config() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "[items]\nitem_weight_kg = -1.0\n").unwrap();

    let out = Command::cargo_bin("fridge_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("self-check")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));

    let stderr = String::from_utf8(out.stderr).unwrap();
    let last = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .expect("some stderr");
    let v: serde_json::Value = serde_json::from_str(last).expect("valid JSON error");
    assert_eq!(v["reason"], "Config");
    assert_eq!(v["exit_code"], 2);
    assert!(v["message"].as_str().unwrap().contains("item_weight_kg"));
}
