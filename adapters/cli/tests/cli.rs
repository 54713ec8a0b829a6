use std::process::{Command, Output};

fn maze_rampage(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-rampage"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch the maze-rampage binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn export_prints_a_share_string() {
    let output = maze_rampage(&["--seed", "7", "--level", "3", "--export"]);
    assert!(output.status.success());
    let line = stdout(&output);
    assert!(line.trim().starts_with("rampage:v1:20x15:"), "got {line}");
}

#[test]
fn mobile_layout_is_picked_from_the_viewport() {
    let output = maze_rampage(&["--seed", "7", "--viewport-width", "400", "--export"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("rampage:v1:9x16:"));
}

#[test]
fn exported_levels_can_be_imported_and_played() {
    let exported = stdout(&maze_rampage(&["--seed", "21", "--export"]));
    let output = maze_rampage(&["--seed", "21", "--frames", "30", "--import", exported.trim()]);
    assert!(output.status.success());

    let printed = stdout(&output);
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 16, "15 maze rows and a summary: {printed}");
    assert!(lines[..15].iter().all(|line| line.chars().count() == 20));
    assert!(lines[15].contains("after 30 frames"));
}

#[test]
fn garbage_imports_fail() {
    let output = maze_rampage(&["--import", "rampage:v1:20x15:???"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to import level"), "got {stderr}");
}

#[test]
fn level_zero_is_rejected() {
    assert!(!maze_rampage(&["--level", "0"]).status.success());
}
