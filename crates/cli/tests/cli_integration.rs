use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

fn bringup() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bringup"))
}

fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

fn report_line(stdout: &str) -> serde_json::Value {
    let line = stdout
        .lines()
        .rfind(|l| l.starts_with('{') && l.contains("\"state\""))
        .unwrap_or_else(|| panic!("Run report JSON not found in output. Stdout: {}", stdout));
    serde_json::from_str(line).expect("Failed to parse JSON")
}

#[test]
fn test_reference_board_passes() {
    let output = bringup()
        .args(["--json"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let json = report_line(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(json["state"], "pass_signal");
    assert_eq!(json["gpio_before_signal"], 0x10);
    assert_eq!(json["blink"]["mode"], "pass");
    assert_eq!(json["blink"]["cycles"], 4);
}

#[test]
fn test_stuck_bit_board_fails_with_exit_1() {
    let output = bringup()
        .args(["--json", "--cycles", "2", "--config"])
        .arg(configs_dir().join("ram-stuck-bit.yaml"))
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));

    let json = report_line(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(json["state"], "fail_signal");
    assert_eq!(json["mismatch"]["check"]["ram"], "zeros");
    assert_eq!(json["mismatch"]["address"], 0x20008);
    assert_eq!(json["blink"]["mode"], "fail");
    assert_eq!(json["blink"]["cycles"], 2);
}

#[test]
fn test_gpio_fault_probe_flag() {
    let output = bringup()
        .args(["--gpio-fault-probe"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_status_uart_is_echoed_unless_disabled() {
    let output = bringup()
        .args(["--status-uart", "--name", "ram_gpio"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "ram_gpio..OK\n");
    // Logs stay on stderr.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PASS"), "Stderr: {}", stderr);

    let quiet = bringup()
        .args(["--status-uart", "--name", "ram_gpio", "--no-uart-stdout"])
        .output()
        .expect("Failed to execute command");
    assert!(quiet.status.success());
    let stdout = String::from_utf8_lossy(&quiet.stdout);
    assert!(!stdout.contains("ram_gpio"), "Stdout: {}", stdout);
}

#[test]
fn test_report_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/report.json");

    let output = bringup()
        .arg("--output")
        .arg(&path)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let text = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["soc"], "reference");
    assert_eq!(json["signal"]["high_iterations"], 100);
}

#[test]
fn test_bad_config_exits_2() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name: tiny\nram: {{ base: 0x20000, size: \"64B\" }}\ngpio: {{ address: 0x20000000 }}\nstatus_uart: {{ address: 0x2000000c }}"
    )
    .unwrap();

    let output = bringup()
        .arg("--config")
        .arg(file.path())
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(2));

    let mut huge = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        huge,
        "name: huge\nram: {{ base: 0x20000, size: \"2TB\", fill: 0xAA }}\ngpio: {{ address: 0x20000000 }}\nstatus_uart: {{ address: 0x2000000c }}"
    )
    .unwrap();
    let output = bringup()
        .arg("--config")
        .arg(huge.path())
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(2));

    let missing = bringup()
        .args(["--config", "does/not/exist.yaml"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(missing.status.code(), Some(2));
}
