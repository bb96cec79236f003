use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "clicker-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_clicker-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    assert!(content.contains("best-return"));
}

#[test]
fn cli_json_report_covers_requested_strategies() {
    let exe = env!("CARGO_BIN_EXE_clicker-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--strategies",
            "cheapest,none",
            "--duration",
            "1000",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let runs: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(runs[0]["strategy"], "cheapest");
    assert_eq!(runs[1]["strategy"], "none");
    assert_eq!(runs[1]["purchases"], 0);
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_clicker-tester");
    let output = Command::new(exe)
        .args(["--strategies", "lucky", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lucky"));
}

#[test]
fn cli_csv_report_starts_with_header() {
    let exe = env!("CARGO_BIN_EXE_clicker-tester");
    let output = Command::new(exe)
        .args(["--strategies", "expensive", "--duration", "500", "--report", "csv"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("strategy,time,item,cost,total_produced"));
}
