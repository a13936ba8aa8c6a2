#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "varintprims-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn varintprims() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_varintprims"));
    cmd.env_remove("RUST_LOG")
        .env_remove("VARINTPRIMS_LOG_LEVEL")
        .arg("--log-level")
        .arg("error");
    cmd
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn encode_outputs_canonical_stream() {
    let output = varintprims()
        .args(["--format", "json", "encode", "1", "150", "300"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["stream_hex"], "019601ac02");
    assert_eq!(payload["stream_len"], 5);
    assert_eq!(payload["values"][1]["hex"], "9601");
}

#[test]
fn encode_max_value_is_ten_bytes() {
    let output = varintprims()
        .args(["--format", "json", "encode", "18446744073709551615"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["stream_hex"], "ffffffffffffffffff01");
    assert_eq!(payload["values"][0]["len"], 10);
}

#[test]
fn encode_raw_writes_binary_stream() {
    let output = varintprims()
        .args(["--format", "raw", "encode", "0", "128"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0x00, 0x80, 0x01]);
}

#[test]
fn encode_uint64_file() {
    let dir = unique_temp_dir("encode-file");
    let path = dir.join("150.uint64");
    std::fs::write(&path, 150u64.to_be_bytes()).expect("fixture should be writable");

    let output = varintprims()
        .args(["--format", "json", "encode", "--file"])
        .arg(&path)
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["stream_hex"], "9601");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn encode_rejects_invalid_value() {
    let output = varintprims()
        .args(["encode", "not-a-number"])
        .output()
        .expect("encode should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn decode_hex_stream() {
    let output = varintprims()
        .args(["--format", "json", "decode", "01 96 01 ac 02"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let payload = json_stdout(&output);
    assert_eq!(payload["count"], 3);
    assert_eq!(payload["bytes"], 5);
    let values: Vec<u64> = payload["values"]
        .as_array()
        .expect("values should be an array")
        .iter()
        .map(|v| v["value"].as_u64().expect("value should be u64"))
        .collect();
    assert_eq!(values, vec![1, 150, 300]);
}

#[test]
fn decode_signed_from_stdin() {
    let mut child = varintprims()
        .args(["--format", "raw", "decode", "--signed"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("decode should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&[0x01, 0x02, 0x03])
        .expect("stdin should be writable");
    let output = child.wait_with_output().expect("decode should finish");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "-1\n1\n-2\n");
}

#[test]
fn decode_truncated_returns_60() {
    let output = varintprims()
        .args(["decode", "0196"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("truncated"));
}

#[test]
fn decode_overflow_returns_60() {
    let wire = "80".repeat(11);
    let output = varintprims()
        .args(["decode", wire.as_str()])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("overflows"));
}

#[test]
fn zigzag_roundtrip() {
    let output = varintprims()
        .args(["--format", "raw", "zigzag", "-2", "--width", "32"])
        .output()
        .expect("zigzag should run");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3");

    let output = varintprims()
        .args(["--format", "raw", "zigzag", "3", "--decode"])
        .output()
        .expect("zigzag should run");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "-2");
}

#[test]
fn version_reports_package_version() {
    let output = varintprims()
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn clap_usage_errors_return_64() {
    let output = varintprims()
        .args(["decode", "9601", "--file", "/tmp/stream.bin"])
        .output()
        .expect("decode should run");
    assert_eq!(output.status.code(), Some(64));

    let output = varintprims()
        .args(["zigzag", "5", "--width", "16"])
        .output()
        .expect("zigzag should run");
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("16"));
}

#[test]
fn help_exits_zero() {
    let output = varintprims()
        .arg("--help")
        .output()
        .expect("help should run");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("zigzag"));
}

#[cfg(target_os = "linux")]
#[test]
fn stdout_write_failure_is_reported() {
    for format in ["raw", "json", "table"] {
        let full = std::fs::OpenOptions::new()
            .write(true)
            .open("/dev/full")
            .expect("/dev/full should open");
        let output = varintprims()
            .args(["--format", format, "encode", "1", "150", "300"])
            .stdout(Stdio::from(full))
            .output()
            .expect("encode should run");

        assert_eq!(output.status.code(), Some(125), "format {format}");
        assert!(String::from_utf8_lossy(&output.stderr).contains("failed writing output"));
    }
}
