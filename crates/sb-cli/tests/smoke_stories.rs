use std::process::Command;

use sb_test_example::{project_path, story_names};

#[test]
fn agent_start_runs_all_bundled_stories() {
    let bin = env!("CARGO_BIN_EXE_sb-cli");
    let names = story_names();
    assert!(!names.is_empty(), "expected bundled stories");

    for name in names {
        let state_out = std::env::temp_dir().join(format!("storyboard-rs-smoke-{}.json", name));

        let output = Command::new(bin)
            .arg("agent")
            .arg("start")
            .arg("--project")
            .arg(project_path(&name))
            .arg("--state-out")
            .arg(&state_out)
            .output()
            .expect("cli should execute");

        if !output.status.success() {
            panic!(
                "story {} failed\nstdout:\n{}\nstderr:\n{}",
                name,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.starts_with("RESULT:OK\nEVENT:"),
            "unexpected protocol header for {}:\n{}",
            name,
            stdout
        );
        assert!(
            stdout.lines().any(|line| line.starts_with("STATE_OUT:")),
            "stdout missing STATE_OUT for {}",
            name
        );
    }
}

#[test]
fn agent_round_trip_through_state_file() {
    let bin = env!("CARGO_BIN_EXE_sb-cli");
    let dir = std::env::temp_dir();
    let first = dir.join("storyboard-rs-roundtrip-1.json");
    let second = dir.join("storyboard-rs-roundtrip-2.json");

    let start = Command::new(bin)
        .args(["agent", "start", "--project"])
        .arg(project_path("02-branch-logic"))
        .arg("--state-out")
        .arg(&first)
        .output()
        .expect("cli should execute");
    let stdout = String::from_utf8_lossy(&start.stdout);
    assert!(stdout.contains("CHOICE:0|\"Take it\"|take"), "{}", stdout);

    let choose = Command::new(bin)
        .args(["agent", "choose", "--state-in"])
        .arg(&first)
        .args(["--choice", "0", "--state-out"])
        .arg(&second)
        .output()
        .expect("cli should execute");
    let stdout = String::from_utf8_lossy(&choose.stdout);
    assert!(stdout.contains("NODE:take"), "{}", stdout);
    assert!(stdout.contains("CAN_GO_BACK:true"), "{}", stdout);

    let bad = Command::new(bin)
        .args(["agent", "choose", "--state-in"])
        .arg(&second)
        .args(["--choice", "5", "--state-out"])
        .arg(&second)
        .output()
        .expect("cli should execute");
    assert_eq!(bad.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&bad.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:API_CHOICE_INDEX"));
}
