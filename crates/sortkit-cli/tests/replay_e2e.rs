#![forbid(unsafe_code)]

//! Replay scripts loaded from disk, end to end through the command layer.
//!
//! Run:
//!   cargo test -p sortkit-cli --test replay_e2e

use std::io::Write;
use std::path::{Path, PathBuf};

use sortkit_cli::error::{EXIT_CONFIG, EXIT_USAGE};
use sortkit_cli::replay::{ReplayArgs, run_replay};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(content.as_bytes()).expect("write file");
    path
}

fn args(script: PathBuf) -> ReplayArgs {
    ReplayArgs {
        script,
        config: None,
        json: false,
        fail_on_reject: false,
    }
}

fn run(args: ReplayArgs) -> Result<String, sortkit_cli::CliError> {
    let mut out = Vec::new();
    run_replay(args, &mut out)?;
    Ok(String::from_utf8(out).expect("utf8"))
}

// Default strip: item i covers x in [9i, 9i+8) on row 0.
const TWO_DRAGS: &str = r#"{
  "items": ["X", "Y", "Z", "W"],
  "events": [
    { "kind": "down", "x": 28, "y": 0 },
    { "kind": "move", "x": 10, "y": 0 },
    { "kind": "move", "x": 1, "y": 0 },
    { "kind": "up", "x": 1, "y": 0 },
    { "kind": "down", "x": 1, "y": 0 },
    { "kind": "move", "x": 1, "y": 4 },
    { "kind": "up", "x": 1, "y": 4 }
  ]
}"#;

#[test]
fn json_report_tracks_commits_and_rejections() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_file(dir.path(), "drags.json", TWO_DRAGS);
    let mut replay = args(script);
    replay.json = true;
    let report: serde_json::Value = serde_json::from_str(&run(replay).expect("replay")).expect("json");

    assert_eq!(report["order"], serde_json::json!(["W", "X", "Y", "Z"]));
    assert_eq!(report["acknowledged"], serde_json::json!(["W"]));
    let drops = report["drops"].as_array().expect("drops");
    assert_eq!(drops.len(), 2);
    assert_eq!(drops[0]["status"], "committed");
    assert_eq!(drops[0]["moved"], "W");
    assert_eq!(drops[0]["event"], 3);
    assert_eq!(drops[1]["status"], "rejected");
    assert_eq!(drops[1]["reason"], "no_target");
}

#[test]
fn fail_on_reject_exits_with_one_after_printing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_file(dir.path(), "drags.json", TWO_DRAGS);
    let mut replay = args(script);
    replay.fail_on_reject = true;
    let err = run(replay).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.to_string(), "1 drop(s) rejected");
}

#[test]
fn config_file_replaces_script_policy() {
    let dir = tempfile::tempdir().expect("temp dir");
    // Three-cell rows stacked vertically: a [0,3), b [3,6), c [6,9).
    let script = write_file(
        dir.path(),
        "vertical.json",
        r#"{
  "items": ["a", "b", "c"],
  "policy": { "axis": "horizontal" },
  "events": [
    { "kind": "down", "x": 0, "y": 0 },
    { "kind": "move", "x": 0, "y": 8 },
    { "kind": "up", "x": 0, "y": 8 }
  ]
}"#,
    );
    let config = write_file(
        dir.path(),
        "vertical.toml",
        "axis = \"vertical\"\nallowed_edges = [\"top\", \"bottom\"]\nitem_extent = 3\ngap = 0\n",
    );
    let mut replay = args(script);
    replay.config = Some(config);
    let text = run(replay).expect("replay");
    assert!(text.ends_with("order: [b, c, a]\nacknowledged: a\n"), "{text}");
}

#[test]
fn missing_script_is_usage_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = run(args(dir.path().join("absent.json"))).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_USAGE);
}

#[test]
fn duplicate_items_in_script_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_file(dir.path(), "dup.json", r#"{ "items": ["A", "A"], "events": [] }"#);
    let err = run(args(script)).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_USAGE);
    assert!(err.to_string().contains("duplicate item id"));
}

#[test]
fn invalid_config_is_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = write_file(dir.path(), "one.json", r#"{ "items": ["A"] }"#);
    let config = write_file(dir.path(), "bad.toml", "drag_threshold = 0\nmax_items = 0\n");
    let mut replay = args(script);
    replay.config = Some(config);
    let err = run(replay).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_CONFIG);
}
