use assert_cmd::Command;
use std::fs;

// The --history flag reads the persisted log and exits without a TTY,
// so it can be driven end-to-end from a plain test process.

#[test]
fn history_flag_reports_empty_history() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("tappa")
        .unwrap()
        .env("HOME", home.path())
        .arg("--history")
        .assert()
        .success()
        .stdout("no attempts recorded yet\n");
}

#[test]
fn history_flag_prints_recorded_attempts_newest_first() {
    let home = tempfile::tempdir().unwrap();
    let state_dir = home.path().join(".local/state/tappa");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(
        state_dir.join("history.json"),
        r#"[
            {"wpm":40,"accuracy":90,"correctChars":200,"incorrectChars":22,"timeTaken":60,"date":"2024-03-01T12:00:00Z"},
            {"wpm":61,"accuracy":98,"correctChars":305,"incorrectChars":6,"timeTaken":45,"date":"2024-03-02T12:00:00Z"}
        ]"#,
    )
    .unwrap();

    let output = Command::cargo_bin("tappa")
        .unwrap()
        .env("HOME", home.path())
        .arg("--history")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let newest = stdout.find("61 wpm").expect("newest attempt printed");
    let oldest = stdout.find("40 wpm").expect("oldest attempt printed");
    assert!(newest < oldest, "attempts should print newest first");
}

#[test]
fn refuses_to_run_the_tui_without_a_tty() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("tappa")
        .unwrap()
        .env("HOME", home.path())
        .assert()
        .failure();
}
