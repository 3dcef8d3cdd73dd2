/// Integration tests driving the `pantilt` binary in dry-run mode
use std::{fs, path::Path, process::Command};

const FAST_RIG: &str = r#"{
    "pan": { "channel": 0, "lower_limit": 0, "upper_limit": 10 },
    "tilt": { "channel": 1, "lower_limit": 0, "upper_limit": 10 },
    "motion": {
        "base_interval": 0.001,
        "initial_interval": 0.001,
        "idle_interval": 0.005,
        "settle_delay": 0.05
    }
}"#;

fn pantilt(args: &[&str], config: &Path) -> (String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pantilt"))
        .args(&args[..1])
        .arg(config)
        .args(&args[1..])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run pantilt");
    assert!(
        output.status.success(),
        "pantilt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

fn positions(stdout: &str, channel: &str) -> Vec<i32> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(ch, _)| *ch == channel)
        .map(|(_, pos)| pos.parse().unwrap())
        .collect()
}

#[test]
fn goto_dry_run_prints_commands() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rig.json");
    fs::write(&config, FAST_RIG).unwrap();

    let (stdout, _) = pantilt(&["goto", "--pan", "9", "--tilt", "-4", "--dry-run"], &config);
    assert_eq!(positions(&stdout, "0"), vec![6, 7, 8, 9]);
    assert_eq!(positions(&stdout, "1"), vec![6, 5, 4, 3, 2, 1, 0]);
}

#[test]
fn nudge_dry_run_moves_one_axis() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rig.json");
    fs::write(&config, FAST_RIG).unwrap();

    let (stdout, _) = pantilt(&["nudge", "up", "2", "--dry-run"], &config);
    assert_eq!(positions(&stdout, "0"), vec![6]);
    assert_eq!(positions(&stdout, "1"), vec![6, 5, 4]);
}

#[test]
fn check_prints_resolved_axes() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rig.json");
    fs::write(&config, FAST_RIG).unwrap();

    let (stdout, _) = pantilt(&["check"], &config);
    assert!(stdout.contains("pan: channel 0 limits 0..=10 home 5"), "{stdout}");
    assert!(stdout.contains("tilt: channel 1 limits 0..=10 home 5"), "{stdout}");
}

#[test]
fn check_rejects_shared_channel() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rig.json");
    fs::write(&config, FAST_RIG.replace("\"channel\": 1", "\"channel\": 0")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pantilt"))
        .arg("check")
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot share channel 0"));
}

#[cfg(target_os = "linux")]
#[test]
fn goto_reports_device_write_failure() {
    // every write to /dev/full fails with ENOSPC
    if !Path::new("/dev/full").exists() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rig.json");
    let rig = FAST_RIG.replacen('{', r#"{ "device": { "path": "/dev/full" },"#, 1);
    fs::write(&config, rig).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pantilt"))
        .args(["goto", "--pan", "9"])
        .arg(&config)
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("consecutive attempts"), "{stderr}");
    assert!(stderr.contains("No space left on device"), "{stderr}");
}

#[test]
fn nudge_by_zero_writes_nothing_past_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rig.json");
    fs::write(&config, FAST_RIG).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pantilt"))
        .args(["nudge"])
        .arg(&config)
        .args(["left", "0", "--dry-run"])
        .env("RUST_LOG", "info")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(positions(&stdout, "0"), vec![6]);
    assert_eq!(positions(&stdout, "1"), vec![6]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no motion needed"), "{stderr}");
}
