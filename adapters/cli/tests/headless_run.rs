use std::{fs, process::Command};

fn tile_siege() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tile-siege"));
    let _ = command.env("RUST_LOG", "warn");
    command
}

#[test]
fn headless_run_prints_summary_and_records_score() {
    let dir = tempfile::tempdir().expect("temp dir");
    let level = dir.path().join("level.txt");
    let scores = dir.path().join("scores.json");
    fs::write(&level, "S...C\n").expect("write level");

    let output = tile_siege()
        .args(["--level", level.to_str().expect("utf-8 path")])
        .args(["--wave", "1", "--tick-ms", "100", "--ticks", "200"])
        .args(["--scores", scores.to_str().expect("utf-8 path")])
        .args(["--player", "ada"])
        .output()
        .expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Tile Siege."));
    assert!(stdout.contains("wave cleared"));
    assert!(stdout.contains("high score #1 for ada"));

    let saved = fs::read_to_string(&scores).expect("scores written");
    assert!(saved.contains("\"ada\""));
    assert!(saved.contains("190"));
}

#[test]
fn exported_level_can_be_replayed() {
    let export = tile_siege().arg("--export").output().expect("binary runs");
    assert!(export.status.success());
    let transfer = String::from_utf8_lossy(&export.stdout).trim().to_owned();
    assert!(transfer.starts_with("siege:v1:25x19:"));

    let replay = tile_siege()
        .args(["--level", &transfer, "--wave", "0", "--ticks", "1"])
        .output()
        .expect("binary runs");
    assert!(replay.status.success());
}

#[test]
fn unplayable_level_fails_with_context() {
    let output = tile_siege()
        .args(["--level", "siege:v1:2x2:not-base64!"])
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to decode level string"));
}
