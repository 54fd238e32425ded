//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against an explicit config file so the
//! user's own configuration never leaks in.

use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

struct Env {
    _dir: tempfile::TempDir,
    config: PathBuf,
}

fn env_with(config: &str) -> Env {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, config).expect("write config");
    Env {
        _dir: dir,
        config: path,
    }
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(env: &Env, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_breathring"))
        .arg("--config")
        .arg(&env.config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("every line is JSON"))
        .collect()
}

fn types(lines: &[Value]) -> Vec<&str> {
    lines.iter().map(|l| l["type"].as_str().unwrap_or("")).collect()
}

#[test]
fn test_simulate_runs_to_completion() {
    let env = env_with("");
    let (stdout, stderr, code) = run_cli(&env, &["simulate", "--duration-secs", "5"]);
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let lines = json_lines(&stdout);
    assert_eq!(types(&lines), ["timer_started", "timer_completed", "summary"]);

    let completed = &lines[1];
    assert_eq!(completed["total_ms"], 5000);
    assert_eq!(completed["laps"], 0);
    assert_eq!(completed["session_id"], lines[0]["session_id"]);

    let summary = &lines[2];
    assert_eq!(summary["final_state"], "complete");
    assert_eq!(summary["frames"], 50);
    assert_eq!(summary["completions"], 1);
    assert_eq!(summary["elapsed_ms"], 5000);
    assert_eq!(summary["wall_ms"], 5000);
}

#[test]
fn test_simulate_pause_then_stop() {
    let env = env_with("");
    let (stdout, stderr, code) = run_cli(
        &env,
        &[
            "simulate",
            "--duration-secs",
            "60",
            "--step-ms",
            "1000",
            "--pause-at",
            "3000",
            "--pause-for",
            "10000",
            "--stop-at",
            "4000",
        ],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let lines = json_lines(&stdout);
    assert_eq!(
        types(&lines),
        [
            "timer_started",
            "timer_paused",
            "timer_resumed",
            "timer_stopped",
            "summary"
        ]
    );
    assert_eq!(lines[1]["elapsed_ms"], 3000);
    assert_eq!(lines[2]["elapsed_ms"], 3000);
    assert_eq!(lines[3]["elapsed_ms"], 4000);

    let summary = &lines[4];
    assert_eq!(summary["final_state"], "initial");
    assert_eq!(summary["frames"], 4);
    assert_eq!(summary["completions"], 0);
    assert_eq!(summary["wall_ms"], 14000);
}

#[test]
fn test_simulate_prints_frames() {
    let env = env_with("");
    let (stdout, _, code) = run_cli(
        &env,
        &["simulate", "--duration-secs", "2", "--step-ms", "500", "--frames"],
    );
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    let frames: Vec<&Value> = lines.iter().filter(|l| l["type"] == "frame").collect();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0]["state"], "running");
    assert_eq!(frames[0]["elapsed_ms"], 500);
    assert_eq!(frames[3]["state"], "complete");
    assert_eq!(frames[3]["formatted_remaining"], "00:00");
    assert_eq!(frames[3]["fraction_of_total"], 1.0);
}

#[test]
fn test_config_file_drives_simulation() {
    let env = env_with("[timer]\ntotal_duration_ms = 3000\n");
    let (stdout, _, code) = run_cli(&env, &["simulate", "--step-ms", "1000"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["total_ms"], 3000);
    assert_eq!(lines.last().map(|l| &l["frames"]), Some(&Value::from(3)));
}

#[test]
fn test_invalid_ratios_are_rejected() {
    let env = env_with("");
    let (stdout, stderr, code) = run_cli(
        &env,
        &["simulate", "--min-ratio", "0.9", "--max-ratio", "0.6"],
    );
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("min_radius_ratio"), "stderr: {stderr}");
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let env = env_with("[timer]\ninhale_ms = 0\n");
    let (_, stderr, code) = run_cli(&env, &["config", "show"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("timer.inhale_ms"), "stderr: {stderr}");
}

#[test]
fn test_config_get() {
    let env = env_with("[timer]\ninhale_ms = 4000\n");
    let (stdout, _, code) = run_cli(&env, &["config", "get", "timer.inhale_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4000");

    let (stdout, _, code) = run_cli(&env, &["config", "get", "ring.size"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "244.0");
}

#[test]
fn test_config_get_unknown_key() {
    let env = env_with("");
    let (_, stderr, code) = run_cli(&env, &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_show_round_trips() {
    let env = env_with("[timer]\nexhale_ms = 7000\n");
    let (stdout, _, code) = run_cli(&env, &["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("exhale_ms = 7000"));
    assert!(stdout.contains("[ring]"));
}

#[test]
fn test_run_json_completes() {
    let env = env_with("");
    let (stdout, stderr, code) =
        run_cli(&env, &["run", "--duration-secs", "1", "--json", "--fps", "50"]);
    assert_eq!(code, 0, "run failed: {stderr}");

    let lines = json_lines(&stdout);
    assert_eq!(lines.first().map(|l| &l["type"]), Some(&Value::from("timer_started")));
    assert_eq!(lines.last().map(|l| &l["type"]), Some(&Value::from("timer_completed")));
    assert!(lines.iter().any(|l| l["type"] == "frame"));
}
