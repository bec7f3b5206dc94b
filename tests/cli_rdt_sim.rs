use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "rdt-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rdt_sim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run rdt_sim")
}

#[test]
fn every_protocol_delivers_all_messages_over_lossy_channel() {
    for protocol in ["abt", "gbn", "sr"] {
        let output = run(&[
            "--protocol",
            protocol,
            "--messages",
            "15",
            "--loss",
            "0.2",
            "--corrupt",
            "0.2",
            "--seed",
            "7",
        ]);
        assert!(
            output.status.success(),
            "rdt_sim --protocol {protocol} failed: stderr={}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains(&format!("{protocol}: delivered=15/15")),
            "unexpected summary: {stdout}"
        );
    }
}

#[test]
fn config_file_with_flag_override_writes_trace_with_meta_first() {
    let dir = unique_temp_dir("trace");
    let config = write_file(
        &dir,
        "run.json",
        r#"
{
    "protocol": "gbn",
    "messages": 50,
    "window_size": 4,
    "loss_prob": 0.1
}
        "#,
    );
    let out_json = dir.join("trace.json");

    let output = run(&[
        "--config",
        config.to_str().unwrap(),
        "--messages",
        "6",
        "--trace-json",
        out_json.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "rdt_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gbn: delivered=6/6"), "unexpected summary: {stdout}");

    let raw = fs::read_to_string(&out_json).expect("read trace.json");
    let v: Value = serde_json::from_str(&raw).expect("parse trace.json");
    let arr = v.as_array().expect("trace.json must be a JSON array");
    assert_eq!(
        arr[0].get("kind").and_then(|k| k.as_str()),
        Some("meta"),
        "expected first trace event to be meta"
    );
    assert_eq!(arr[0].get("window_size").and_then(|w| w.as_u64()), Some(4));
    let delivers = arr
        .iter()
        .filter(|e| e.get("kind").and_then(|k| k.as_str()) == Some("deliver"))
        .count();
    assert_eq!(delivers, 6);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn dead_channel_reports_failed_sender() {
    let output = run(&[
        "--protocol",
        "sr",
        "--messages",
        "3",
        "--loss",
        "1",
        "--max-retransmits",
        "2",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delivered=0/3"), "unexpected summary: {stdout}");
    assert!(stdout.contains("state=Failed"), "unexpected summary: {stdout}");
}

#[test]
fn rejects_bad_configuration() {
    for args in [
        &["--protocol", "tcp"][..],
        &["--loss", "1"][..],
        &["--window", "0"][..],
        &["--config", "/nonexistent/rdt-sim.json"][..],
    ] {
        let output = run(args);
        assert_eq!(output.status.code(), Some(2), "args {args:?} should be rejected");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("error:"), "args {args:?}: stderr={stderr}");
    }
}
